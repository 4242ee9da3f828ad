//! CreateColumn command

use crate::auth::{ActionKind, Capability, Module};
use crate::context::KanbanContext;
use crate::error::KanbanError;
use crate::exec;
use crate::types::{ActorId, BoardId, Column};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use taskdeck_operations::{async_trait, Execute, ExecutionResult, Operation};

/// Add a new column at the end of the board
#[derive(Debug, Deserialize, Serialize)]
pub struct CreateColumn {
    /// The owning board
    pub board_id: BoardId,
    /// The column display name
    pub name: String,
    /// Optional advisory WIP limit
    pub wip_limit: Option<usize>,
    /// Mark as a conceptually-terminal column
    #[serde(default)]
    pub is_done_column: bool,
    /// Acting user, for the delegated permission check
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<ActorId>,
}

impl CreateColumn {
    /// Create a new CreateColumn command
    pub fn new(board_id: impl Into<BoardId>, name: impl Into<String>) -> Self {
        Self {
            board_id: board_id.into(),
            name: name.into(),
            wip_limit: None,
            is_done_column: false,
            actor: None,
        }
    }

    /// Set the WIP limit
    pub fn with_wip_limit(mut self, limit: usize) -> Self {
        self.wip_limit = Some(limit);
        self
    }

    /// Mark as a done column
    pub fn with_done_marker(mut self) -> Self {
        self.is_done_column = true;
        self
    }

    /// Set the acting user
    pub fn with_actor(mut self, actor: impl Into<ActorId>) -> Self {
        self.actor = Some(actor.into());
        self
    }
}

impl Operation for CreateColumn {
    fn verb(&self) -> &'static str {
        "create"
    }
    fn noun(&self) -> &'static str {
        "column"
    }
    fn description(&self) -> &'static str {
        "Add a new column at the end of the board"
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for CreateColumn {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, KanbanError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);

        let result = async {
            let board = ctx.read_board(&self.board_id).await?;
            ctx.authorize(
                self.actor.as_ref(),
                &board.project_id,
                Capability::new(Module::Column, ActionKind::Create),
            )
            .await?;

            // Appending races with reorders; serialize on the board lock
            let _lock = ctx.lock_board_with_retry(&board.id).await?;
            let position = ctx.read_board_columns(&board.id).await?.len();

            let mut column = Column::new(board.id, &self.name, position);
            if let Some(limit) = self.wip_limit {
                column = column.with_wip_limit(limit);
            }
            if self.is_done_column {
                column = column.with_done_marker();
            }

            ctx.write_column(&column).await?;
            Ok(serde_json::to_value(&column)?)
        }
        .await;

        exec::logged(self, input, result, start)
    }
}
