//! MoveTask command
//!
//! The drag-and-drop primitive. A move is atomic under the board lock:
//! either the task lands at its destination with both affected columns
//! dense, or nothing changes.

use crate::auth::{ActionKind, Capability, Module};
use crate::context::KanbanContext;
use crate::error::KanbanError;
use crate::exec;
use crate::types::{ActorId, ColumnId, TaskId, TaskMoveEvent};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use taskdeck_operations::{async_trait, Execute, ExecutionResult, Operation};

/// Move a task to a position in a column on the same board.
///
/// Out-of-range destinations clamp to the end of the column rather than
/// failing, so a stale client drop still produces a sensible placement.
#[derive(Debug, Deserialize, Serialize)]
pub struct MoveTask {
    /// The task ID
    pub id: TaskId,
    /// Destination column, may be the task's current column
    pub dest_column_id: ColumnId,
    /// Desired zero-based position in the destination column
    pub dest_position: usize,
    /// Acting user, recorded on the move event
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<ActorId>,
}

impl MoveTask {
    /// Create a new MoveTask command
    pub fn new(
        id: impl Into<TaskId>,
        dest_column_id: impl Into<ColumnId>,
        dest_position: usize,
    ) -> Self {
        Self {
            id: id.into(),
            dest_column_id: dest_column_id.into(),
            dest_position,
            actor: None,
        }
    }

    /// Set the acting user
    pub fn with_actor(mut self, actor: impl Into<ActorId>) -> Self {
        self.actor = Some(actor.into());
        self
    }
}

impl Operation for MoveTask {
    fn verb(&self) -> &'static str {
        "move"
    }
    fn noun(&self) -> &'static str {
        "task"
    }
    fn description(&self) -> &'static str {
        "Move a task to a position in a column"
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for MoveTask {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, KanbanError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);

        let result = async {
            let task = ctx.read_task(&self.id).await?;
            let source_column = ctx.read_column(&task.column_id).await?;
            let dest_column = ctx.read_column(&self.dest_column_id).await?;

            if source_column.board_id != dest_column.board_id {
                return Err(KanbanError::CrossBoardMove {
                    task: task.id.to_string(),
                    source_board: source_column.board_id.to_string(),
                    dest_board: dest_column.board_id.to_string(),
                });
            }

            let board = ctx.read_board(&dest_column.board_id).await?;
            ctx.authorize(
                self.actor.as_ref(),
                &board.project_id,
                Capability::new(Module::Task, ActionKind::Move),
            )
            .await?;

            let _lock = ctx.lock_board_with_retry(&board.id).await?;

            // Re-read under the lock; a concurrent move may have relocated
            // the task, so the source column must come from the fresh record,
            // not the pre-lock read.
            let mut task = ctx.read_task(&self.id).await?;
            let source_column = ctx.read_column(&task.column_id).await?;
            if source_column.board_id != dest_column.board_id {
                return Err(KanbanError::CrossBoardMove {
                    task: task.id.to_string(),
                    source_board: source_column.board_id.to_string(),
                    dest_board: dest_column.board_id.to_string(),
                });
            }
            let source_position = task.position;

            if task.column_id == dest_column.id {
                let siblings = ctx.read_column_tasks(&dest_column.id).await?;
                // The moving task is among the siblings, so the last valid
                // slot is len - 1
                let new_position = self.dest_position.min(siblings.len().saturating_sub(1));

                if new_position == source_position {
                    return Ok(serde_json::to_value(&task)?);
                }

                if new_position > source_position {
                    for mut sibling in siblings {
                        if sibling.id == task.id {
                            continue;
                        }
                        if sibling.position > source_position && sibling.position <= new_position {
                            sibling.position -= 1;
                            ctx.write_task(&sibling).await?;
                        }
                    }
                } else {
                    for mut sibling in siblings {
                        if sibling.id == task.id {
                            continue;
                        }
                        if sibling.position >= new_position && sibling.position < source_position {
                            sibling.position += 1;
                            ctx.write_task(&sibling).await?;
                        }
                    }
                }

                task.position = new_position;
                ctx.write_task(&task).await?;

                let event = TaskMoveEvent::new(
                    task.id.clone(),
                    source_column.id.clone(),
                    source_position,
                    dest_column.id.clone(),
                    new_position,
                    self.actor.clone(),
                );
                ctx.append_move_event(&board.id, &event).await?;

                return Ok(serde_json::to_value(&task)?);
            }

            // Cross-column
            let dest_tasks = ctx.read_column_tasks(&dest_column.id).await?;
            if ctx.policy().enforce_wip_limit {
                if let Some(limit) = dest_column.wip_limit {
                    if dest_tasks.len() >= limit {
                        return Err(KanbanError::WipLimitExceeded {
                            column: dest_column.id.to_string(),
                            limit,
                        });
                    }
                }
            }

            // Insertion slot, so one past the last task is valid
            let new_position = self.dest_position.min(dest_tasks.len());

            for mut sibling in ctx.read_column_tasks(&source_column.id).await? {
                if sibling.id != task.id && sibling.position > source_position {
                    sibling.position -= 1;
                    ctx.write_task(&sibling).await?;
                }
            }
            for mut occupant in dest_tasks {
                if occupant.position >= new_position {
                    occupant.position += 1;
                    ctx.write_task(&occupant).await?;
                }
            }

            task.column_id = dest_column.id.clone();
            task.position = new_position;
            ctx.write_task(&task).await?;

            let event = TaskMoveEvent::new(
                task.id.clone(),
                source_column.id.clone(),
                source_position,
                dest_column.id.clone(),
                new_position,
                self.actor.clone(),
            );
            ctx.append_move_event(&board.id, &event).await?;

            Ok(serde_json::to_value(&task)?)
        }
        .await;

        exec::logged(self, input, result, start)
    }
}
