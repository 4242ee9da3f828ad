//! CreateBoard command

use crate::auth::{ActionKind, Capability, Module};
use crate::context::KanbanContext;
use crate::error::KanbanError;
use crate::exec;
use crate::types::{ActorId, Board, ProjectId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use taskdeck_operations::{async_trait, Execute, ExecutionResult, Operation};

/// Create a new board in a project
#[derive(Debug, Deserialize, Serialize)]
pub struct CreateBoard {
    /// The owning project
    pub project_id: ProjectId,
    /// The board name
    pub name: String,
    /// Acting user, for the delegated permission check
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<ActorId>,
}

impl CreateBoard {
    /// Create a new CreateBoard command
    pub fn new(project_id: impl Into<ProjectId>, name: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            name: name.into(),
            actor: None,
        }
    }

    /// Set the acting user
    pub fn with_actor(mut self, actor: impl Into<ActorId>) -> Self {
        self.actor = Some(actor.into());
        self
    }
}

impl Operation for CreateBoard {
    fn verb(&self) -> &'static str {
        "create"
    }
    fn noun(&self) -> &'static str {
        "board"
    }
    fn description(&self) -> &'static str {
        "Create a new board in a project"
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for CreateBoard {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, KanbanError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);

        let result = async {
            let project = ctx.read_project(&self.project_id).await?;
            ctx.authorize(
                self.actor.as_ref(),
                &project.id,
                Capability::new(Module::Board, ActionKind::Create),
            )
            .await?;

            let board = Board::new(project.id, &self.name);
            ctx.write_board(&board).await?;
            Ok(serde_json::to_value(&board)?)
        }
        .await;

        exec::logged(self, input, result, start)
    }
}
