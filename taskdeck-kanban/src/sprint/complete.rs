//! CompleteSprint command

use crate::auth::{ActionKind, Capability, Module};
use crate::context::KanbanContext;
use crate::error::KanbanError;
use crate::exec;
use crate::types::{ActorId, SprintId, SprintStatus, TaskStatus, VelocityRecord};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use taskdeck_operations::{async_trait, Execute, ExecutionResult, Operation};

/// Transition an active sprint to completed, tally the points of its
/// completed member tasks, and persist the immutable velocity record.
#[derive(Debug, Deserialize, Serialize)]
pub struct CompleteSprint {
    /// The sprint ID
    pub id: SprintId,
    /// Optional retrospective notes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retrospective: Option<String>,
    /// Acting user, for the delegated permission check
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<ActorId>,
}

impl CompleteSprint {
    /// Create a new CompleteSprint command
    pub fn new(id: impl Into<SprintId>) -> Self {
        Self {
            id: id.into(),
            retrospective: None,
            actor: None,
        }
    }

    /// Attach retrospective notes
    pub fn with_retrospective(mut self, notes: impl Into<String>) -> Self {
        self.retrospective = Some(notes.into());
        self
    }

    /// Set the acting user
    pub fn with_actor(mut self, actor: impl Into<ActorId>) -> Self {
        self.actor = Some(actor.into());
        self
    }
}

impl Operation for CompleteSprint {
    fn verb(&self) -> &'static str {
        "complete"
    }
    fn noun(&self) -> &'static str {
        "sprint"
    }
    fn description(&self) -> &'static str {
        "Complete an active sprint and record its velocity"
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for CompleteSprint {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, KanbanError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);

        let result = async {
            let mut sprint = ctx.read_sprint(&self.id).await?;
            ctx.authorize(
                self.actor.as_ref(),
                &sprint.project_id,
                Capability::new(Module::Sprint, ActionKind::Transition),
            )
            .await?;

            if sprint.status != SprintStatus::Active {
                return Err(KanbanError::InvalidStateTransition {
                    from: format!("{:?}", sprint.status).to_lowercase(),
                    to: "completed".to_string(),
                });
            }

            let completed: u32 = ctx
                .read_sprint_tasks(&self.id)
                .await?
                .iter()
                .filter(|t| t.status == TaskStatus::Completed)
                .filter_map(|t| t.story_points)
                .sum();

            let now = Utc::now();
            sprint.status = SprintStatus::Completed;
            sprint.completed_points = Some(completed);
            sprint.retrospective = self.retrospective.clone();
            if sprint.end_date.is_none() {
                sprint.end_date = Some(now);
            }
            ctx.write_sprint(&sprint).await?;

            let record = VelocityRecord {
                sprint_id: sprint.id.clone(),
                project_id: sprint.project_id.clone(),
                completed_points: completed,
                capacity_points: sprint.capacity_points,
                completed_at: now,
            };
            ctx.write_velocity_record(&record).await?;

            Ok(serde_json::to_value(&sprint)?)
        }
        .await;

        exec::logged(self, input, result, start)
    }
}
