//! DeleteColumn command

use crate::auth::{ActionKind, Capability, Module};
use crate::context::KanbanContext;
use crate::error::KanbanError;
use crate::exec;
use crate::types::{ActorId, ColumnId, TaskMoveEvent};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use taskdeck_operations::{async_trait, Execute, ExecutionResult, Operation};

/// Soft-delete a column.
///
/// Fails `ColumnNotEmpty` if active tasks remain and no migration target was
/// given. With `migrate_to`, the tasks are appended to the target column in
/// their original relative order (each relocation recorded as a move event)
/// before the column is deleted. Remaining sibling columns are renumbered to
/// stay dense.
#[derive(Debug, Deserialize, Serialize)]
pub struct DeleteColumn {
    /// The column ID to delete
    pub id: ColumnId,
    /// Column to migrate remaining tasks into
    pub migrate_to: Option<ColumnId>,
    /// Acting user, for the delegated permission check and move events
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<ActorId>,
}

impl DeleteColumn {
    /// Create a new DeleteColumn command
    pub fn new(id: impl Into<ColumnId>) -> Self {
        Self {
            id: id.into(),
            migrate_to: None,
            actor: None,
        }
    }

    /// Migrate remaining tasks to the given column before deleting
    pub fn with_migration(mut self, dest: impl Into<ColumnId>) -> Self {
        self.migrate_to = Some(dest.into());
        self
    }

    /// Set the acting user
    pub fn with_actor(mut self, actor: impl Into<ActorId>) -> Self {
        self.actor = Some(actor.into());
        self
    }
}

impl Operation for DeleteColumn {
    fn verb(&self) -> &'static str {
        "delete"
    }
    fn noun(&self) -> &'static str {
        "column"
    }
    fn description(&self) -> &'static str {
        "Delete a column, optionally migrating its tasks"
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for DeleteColumn {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, KanbanError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);

        let result = async {
            let mut column = ctx.read_column(&self.id).await?;
            let board = ctx.read_board(&column.board_id).await?;
            ctx.authorize(
                self.actor.as_ref(),
                &board.project_id,
                Capability::new(Module::Column, ActionKind::Delete),
            )
            .await?;

            let _lock = ctx.lock_board_with_retry(&board.id).await?;

            let tasks = ctx.read_column_tasks(&self.id).await?;
            let mut migrated = 0usize;

            if !tasks.is_empty() {
                let Some(dest_id) = &self.migrate_to else {
                    return Err(KanbanError::ColumnNotEmpty {
                        id: self.id.to_string(),
                        count: tasks.len(),
                    });
                };

                let dest = ctx.read_column(dest_id).await?;
                if dest.id == self.id {
                    return Err(KanbanError::invalid_value(
                        "migrate_to",
                        "cannot migrate tasks into the column being deleted",
                    ));
                }
                if dest.board_id != column.board_id {
                    return Err(KanbanError::invalid_value(
                        "migrate_to",
                        "migration target must belong to the same board",
                    ));
                }

                // Append in original relative order, recording each move
                let mut next = ctx.read_column_tasks(&dest.id).await?.len();
                for mut task in tasks {
                    let event = TaskMoveEvent::new(
                        task.id.clone(),
                        task.column_id.clone(),
                        task.position,
                        dest.id.clone(),
                        next,
                        self.actor.clone(),
                    );
                    task.column_id = dest.id.clone();
                    task.position = next;
                    ctx.write_task(&task).await?;
                    ctx.append_move_event(&board.id, &event).await?;
                    next += 1;
                    migrated += 1;
                }
            }

            column.deleted_at = Some(chrono::Utc::now());
            ctx.write_column(&column).await?;

            // Renumber surviving siblings to stay dense
            for (index, mut sibling) in ctx
                .read_board_columns(&board.id)
                .await?
                .into_iter()
                .enumerate()
            {
                if sibling.position != index {
                    sibling.position = index;
                    ctx.write_column(&sibling).await?;
                }
            }

            Ok(serde_json::json!({
                "deleted": true,
                "id": self.id.to_string(),
                "migrated_tasks": migrated,
            }))
        }
        .await;

        exec::logged(self, input, result, start)
    }
}
