//! CancelSprint command

use crate::auth::{ActionKind, Capability, Module};
use crate::context::KanbanContext;
use crate::error::KanbanError;
use crate::exec;
use crate::types::{ActorId, SprintId, SprintStatus};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use taskdeck_operations::{async_trait, Execute, ExecutionResult, Operation};

/// Cancel a planning or active sprint. No velocity record is written; a
/// cancelled sprint never contributes to forecasts.
#[derive(Debug, Deserialize, Serialize)]
pub struct CancelSprint {
    /// The sprint ID
    pub id: SprintId,
    /// Why the sprint was abandoned
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Acting user, for the delegated permission check
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<ActorId>,
}

impl CancelSprint {
    /// Create a new CancelSprint command
    pub fn new(id: impl Into<SprintId>) -> Self {
        Self {
            id: id.into(),
            reason: None,
            actor: None,
        }
    }

    /// Record the cancellation reason
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Set the acting user
    pub fn with_actor(mut self, actor: impl Into<ActorId>) -> Self {
        self.actor = Some(actor.into());
        self
    }
}

impl Operation for CancelSprint {
    fn verb(&self) -> &'static str {
        "cancel"
    }
    fn noun(&self) -> &'static str {
        "sprint"
    }
    fn description(&self) -> &'static str {
        "Cancel a planning or active sprint"
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for CancelSprint {
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

            if sprint.status.is_terminal() {
                return Err(KanbanError::InvalidStateTransition {
                    from: format!("{:?}", sprint.status).to_lowercase(),
                    to: "cancelled".to_string(),
                });
            }

            sprint.status = SprintStatus::Cancelled;
            sprint.cancel_reason = self.reason.clone();
            ctx.write_sprint(&sprint).await?;

            Ok(serde_json::to_value(&sprint)?)
        }
        .await;

        exec::logged(self, input, result, start)
    }
}
