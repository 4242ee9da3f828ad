//! Assignee workload

use crate::auth::{ActionKind, Capability, Module};
use crate::context::KanbanContext;
use crate::error::KanbanError;
use crate::exec;
use crate::types::{ActorId, ProjectId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use taskdeck_operations::{async_trait, Execute, ExecutionResult, Operation};

/// How an assignee's open-task count compares to the team average
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkloadLevel {
    Low,
    Normal,
    High,
    Overloaded,
}

/// Classify a load ratio. A zero team average means nobody has work, which
/// is not an overload signal.
pub fn workload_level(ratio: f64) -> WorkloadLevel {
    if ratio < 0.5 {
        WorkloadLevel::Low
    } else if ratio < 1.2 {
        WorkloadLevel::Normal
    } else if ratio < 1.5 {
        WorkloadLevel::High
    } else {
        WorkloadLevel::Overloaded
    }
}

/// One assignee's share of the open work
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkloadEntry {
    pub assignee: ActorId,
    pub open_tasks: usize,
    pub ratio: f64,
    pub level: WorkloadLevel,
}

/// Workload distribution across a project's assignees
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkloadReport {
    pub project_id: ProjectId,
    pub team_average: f64,
    pub entries: Vec<WorkloadEntry>,
}

/// Count open tasks per assignee across a project and flag imbalances
/// against the team average.
#[derive(Debug, Deserialize, Serialize)]
pub struct GetWorkload {
    /// The project ID
    pub project_id: ProjectId,
    /// Acting user, for the delegated permission check
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<ActorId>,
}

impl GetWorkload {
    /// Create a new GetWorkload command
    pub fn new(project_id: impl Into<ProjectId>) -> Self {
        Self {
            project_id: project_id.into(),
            actor: None,
        }
    }

    /// Set the acting user
    pub fn with_actor(mut self, actor: impl Into<ActorId>) -> Self {
        self.actor = Some(actor.into());
        self
    }
}

impl Operation for GetWorkload {
    fn verb(&self) -> &'static str {
        "workload"
    }
    fn noun(&self) -> &'static str {
        "analytics"
    }
    fn description(&self) -> &'static str {
        "Compute workload distribution for a project"
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for GetWorkload {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, KanbanError> {
        let result = async {
            ctx.read_project(&self.project_id).await?;
            ctx.authorize(
                self.actor.as_ref(),
                &self.project_id,
                Capability::new(Module::Analytics, ActionKind::Read),
            )
            .await?;

            // BTreeMap keeps the report order deterministic
            let mut counts: BTreeMap<ActorId, usize> = BTreeMap::new();
            for task in ctx.read_project_tasks(&self.project_id).await? {
                if !task.status.is_open_work() {
                    continue;
                }
                for assignee in &task.assignees {
                    *counts.entry(assignee.clone()).or_default() += 1;
                }
            }

            let team_average = if counts.is_empty() {
                0.0
            } else {
                counts.values().sum::<usize>() as f64 / counts.len() as f64
            };

            let entries = counts
                .into_iter()
                .map(|(assignee, open_tasks)| {
                    let ratio = if team_average == 0.0 {
                        0.0
                    } else {
                        open_tasks as f64 / team_average
                    };
                    let level = if team_average == 0.0 {
                        WorkloadLevel::Normal
                    } else {
                        workload_level(ratio)
                    };
                    WorkloadEntry {
                        assignee,
                        open_tasks,
                        ratio,
                        level,
                    }
                })
                .collect();

            let report = WorkloadReport {
                project_id: self.project_id.clone(),
                team_average,
                entries,
            };
            Ok(serde_json::to_value(&report)?)
        }
        .await;

        exec::unlogged(result)
    }
}
