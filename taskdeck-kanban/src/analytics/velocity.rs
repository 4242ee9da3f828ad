//! Project velocity

use crate::auth::{ActionKind, Capability, Module};
use crate::context::KanbanContext;
use crate::error::KanbanError;
use crate::exec;
use crate::types::{ActorId, ProjectId, VelocityRecord};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use taskdeck_operations::{async_trait, Execute, ExecutionResult, Operation};

/// Velocity history and rolling average for a project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VelocityReport {
    pub project_id: ProjectId,
    /// Records considered, oldest first
    pub records: Vec<VelocityRecord>,
    /// Mean completed points over the considered records, 0.0 with no history
    pub average_points: f64,
}

/// Average completed points over the last completed sprints of a project.
/// Cancelled sprints never wrote a record, so they dilute nothing.
#[derive(Debug, Deserialize, Serialize)]
pub struct GetVelocity {
    /// The project ID
    pub project_id: ProjectId,
    /// Consider only the most recent N records; all history when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_n: Option<usize>,
    /// Acting user, for the delegated permission check
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<ActorId>,
}

impl GetVelocity {
    /// Create a new GetVelocity command
    pub fn new(project_id: impl Into<ProjectId>) -> Self {
        Self {
            project_id: project_id.into(),
            last_n: None,
            actor: None,
        }
    }

    /// Limit to the most recent N completed sprints
    pub fn with_last_n(mut self, n: usize) -> Self {
        self.last_n = Some(n);
        self
    }

    /// Set the acting user
    pub fn with_actor(mut self, actor: impl Into<ActorId>) -> Self {
        self.actor = Some(actor.into());
        self
    }
}

impl Operation for GetVelocity {
    fn verb(&self) -> &'static str {
        "velocity"
    }
    fn noun(&self) -> &'static str {
        "analytics"
    }
    fn description(&self) -> &'static str {
        "Compute rolling velocity for a project"
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for GetVelocity {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, KanbanError> {
        let result = async {
            ctx.read_project(&self.project_id).await?;
            ctx.authorize(
                self.actor.as_ref(),
                &self.project_id,
                Capability::new(Module::Analytics, ActionKind::Read),
            )
            .await?;

            let mut records = ctx.read_velocity_records(&self.project_id).await?;
            if let Some(n) = self.last_n {
                let skip = records.len().saturating_sub(n);
                records.drain(..skip);
            }

            let average = if records.is_empty() {
                0.0
            } else {
                let total: u32 = records.iter().map(|r| r.completed_points).sum();
                f64::from(total) / records.len() as f64
            };

            let report = VelocityReport {
                project_id: self.project_id.clone(),
                records,
                average_points: average,
            };
            Ok(serde_json::to_value(&report)?)
        }
        .await;

        exec::unlogged(result)
    }
}
