//! StartSprint command

use crate::auth::{ActionKind, Capability, Module};
use crate::context::KanbanContext;
use crate::error::KanbanError;
use crate::exec;
use crate::types::{ActorId, SprintId, SprintStatus};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use taskdeck_operations::{async_trait, Execute, ExecutionResult, Operation};

/// Transition a sprint from planning to active and freeze its committed
/// point baseline from the current member tasks.
#[derive(Debug, Deserialize, Serialize)]
pub struct StartSprint {
    /// The sprint ID
    pub id: SprintId,
    /// Acting user, for the delegated permission check
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<ActorId>,
}

impl StartSprint {
    /// Create a new StartSprint command
    pub fn new(id: impl Into<SprintId>) -> Self {
        Self {
            id: id.into(),
            actor: None,
        }
    }

    /// Set the acting user
    pub fn with_actor(mut self, actor: impl Into<ActorId>) -> Self {
        self.actor = Some(actor.into());
        self
    }
}

impl Operation for StartSprint {
    fn verb(&self) -> &'static str {
        "start"
    }
    fn noun(&self) -> &'static str {
        "sprint"
    }
    fn description(&self) -> &'static str {
        "Activate a planning sprint and snapshot its commitment"
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for StartSprint {
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

            if sprint.status != SprintStatus::Planning {
                return Err(KanbanError::InvalidStateTransition {
                    from: format!("{:?}", sprint.status).to_lowercase(),
                    to: "active".to_string(),
                });
            }

            if ctx.policy().single_active_sprint {
                let active = ctx
                    .read_project_sprints(&sprint.project_id)
                    .await?
                    .into_iter()
                    .find(|s| s.status == SprintStatus::Active);
                if let Some(active) = active {
                    return Err(KanbanError::SprintAlreadyActive {
                        project: sprint.project_id.to_string(),
                        active: active.id.to_string(),
                    });
                }
            }

            let committed: u32 = ctx
                .read_sprint_tasks(&self.id)
                .await?
                .iter()
                .filter_map(|t| t.story_points)
                .sum();

            sprint.status = SprintStatus::Active;
            sprint.committed_points = Some(committed);
            if sprint.start_date.is_none() {
                sprint.start_date = Some(Utc::now());
            }
            ctx.write_sprint(&sprint).await?;

            Ok(serde_json::to_value(&sprint)?)
        }
        .await;

        exec::logged(self, input, result, start)
    }
}
