//! UpdateColumn command

use crate::auth::{ActionKind, Capability, Module};
use crate::context::KanbanContext;
use crate::error::KanbanError;
use crate::exec;
use crate::types::{ActorId, ColumnId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use taskdeck_operations::{async_trait, Execute, ExecutionResult, Operation};

/// Update non-positional column fields. `position` is owned by the reorder
/// and delete commands and is never touched here.
#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateColumn {
    /// The column ID
    pub id: ColumnId,
    /// New display name
    pub name: Option<String>,
    /// New WIP limit
    pub wip_limit: Option<usize>,
    /// New done-column marker
    pub is_done_column: Option<bool>,
    /// Acting user, for the delegated permission check
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<ActorId>,
}

impl UpdateColumn {
    /// Create a new UpdateColumn command
    pub fn new(id: impl Into<ColumnId>) -> Self {
        Self {
            id: id.into(),
            name: None,
            wip_limit: None,
            is_done_column: None,
            actor: None,
        }
    }

    /// Set the name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the WIP limit
    pub fn with_wip_limit(mut self, limit: usize) -> Self {
        self.wip_limit = Some(limit);
        self
    }

    /// Set the done-column marker
    pub fn with_done_marker(mut self, is_done: bool) -> Self {
        self.is_done_column = Some(is_done);
        self
    }

    /// Set the acting user
    pub fn with_actor(mut self, actor: impl Into<ActorId>) -> Self {
        self.actor = Some(actor.into());
        self
    }
}

impl Operation for UpdateColumn {
    fn verb(&self) -> &'static str {
        "update"
    }
    fn noun(&self) -> &'static str {
        "column"
    }
    fn description(&self) -> &'static str {
        "Update non-positional column fields"
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for UpdateColumn {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, KanbanError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);

        let result = async {
            let mut column = ctx.read_column(&self.id).await?;
            let board = ctx.read_board(&column.board_id).await?;
            ctx.authorize(
                self.actor.as_ref(),
                &board.project_id,
                Capability::new(Module::Column, ActionKind::Update),
            )
            .await?;

            if let Some(name) = &self.name {
                column.name = name.clone();
            }
            if let Some(limit) = self.wip_limit {
                column.wip_limit = Some(limit);
            }
            if let Some(is_done) = self.is_done_column {
                column.is_done_column = is_done;
            }

            ctx.write_column(&column).await?;
            Ok(serde_json::to_value(&column)?)
        }
        .await;

        exec::logged(self, input, result, start)
    }
}
