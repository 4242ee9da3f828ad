//! ReorderColumns command

use crate::auth::{ActionKind, Capability, Module};
use crate::context::KanbanContext;
use crate::error::KanbanError;
use crate::exec;
use crate::types::{ActorId, BoardId, ColumnId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use taskdeck_operations::{async_trait, Execute, ExecutionResult, Operation};

/// Atomically reassign column positions from a full permutation of the
/// board's columns. Partial reorders are rejected so a column can never be
/// silently dropped or orphaned.
#[derive(Debug, Deserialize, Serialize)]
pub struct ReorderColumns {
    /// The board ID
    pub board_id: BoardId,
    /// Every active column of the board, in the desired order
    pub ordered_column_ids: Vec<ColumnId>,
    /// Acting user, for the delegated permission check
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<ActorId>,
}

impl ReorderColumns {
    /// Create a new ReorderColumns command
    pub fn new(board_id: impl Into<BoardId>, ordered_column_ids: Vec<ColumnId>) -> Self {
        Self {
            board_id: board_id.into(),
            ordered_column_ids,
            actor: None,
        }
    }

    /// Set the acting user
    pub fn with_actor(mut self, actor: impl Into<ActorId>) -> Self {
        self.actor = Some(actor.into());
        self
    }
}

impl Operation for ReorderColumns {
    fn verb(&self) -> &'static str {
        "reorder"
    }
    fn noun(&self) -> &'static str {
        "column"
    }
    fn description(&self) -> &'static str {
        "Reorder all columns of a board"
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for ReorderColumns {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, KanbanError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);

        let result = async {
            let board = ctx.read_board(&self.board_id).await?;
            ctx.authorize(
                self.actor.as_ref(),
                &board.project_id,
                Capability::new(Module::Column, ActionKind::Move),
            )
            .await?;

            let _lock = ctx.lock_board_with_retry(&board.id).await?;
            let columns = ctx.read_board_columns(&board.id).await?;

            // The supplied ids must be exactly the board's columns, once each
            let existing: HashSet<&ColumnId> = columns.iter().map(|c| &c.id).collect();
            let supplied: HashSet<&ColumnId> = self.ordered_column_ids.iter().collect();
            if supplied.len() != self.ordered_column_ids.len()
                || supplied != existing
            {
                return Err(KanbanError::IncompletePermutation {
                    board: board.id.to_string(),
                    expected: columns.len(),
                    got: self.ordered_column_ids.len(),
                });
            }

            let mut reordered = Vec::with_capacity(columns.len());
            for (index, id) in self.ordered_column_ids.iter().enumerate() {
                // Lookup cannot fail after the permutation check
                let mut column = columns
                    .iter()
                    .find(|c| &c.id == id)
                    .cloned()
                    .ok_or_else(|| KanbanError::ColumnNotFound { id: id.to_string() })?;
                if column.position != index {
                    column.position = index;
                    ctx.write_column(&column).await?;
                }
                reordered.push(column);
            }

            Ok(serde_json::to_value(&reordered)?)
        }
        .await;

        exec::logged(self, input, result, start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::CreateBoard;
    use crate::column::CreateColumn;
    use crate::project::CreateProject;
    use tempfile::TempDir;

    async fn setup() -> (TempDir, KanbanContext, BoardId, Vec<ColumnId>) {
        let temp = TempDir::new().unwrap();
        let ctx = KanbanContext::new(temp.path().join(".taskdeck"));
        let project = CreateProject::new("P")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let board = CreateBoard::new(project["id"].as_str().unwrap(), "B")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let board_id = BoardId::from_string(board["id"].as_str().unwrap());

        let mut ids = Vec::new();
        for name in ["Backlog", "Doing", "Done"] {
            let col = CreateColumn::new(board_id.clone(), name)
                .execute(&ctx)
                .await
                .into_result()
                .unwrap();
            ids.push(ColumnId::from_string(col["id"].as_str().unwrap()));
        }
        (temp, ctx, board_id, ids)
    }

    #[tokio::test]
    async fn test_full_permutation_succeeds() {
        let (_temp, ctx, board_id, ids) = setup().await;

        let reversed = vec![ids[2].clone(), ids[1].clone(), ids[0].clone()];
        ReorderColumns::new(board_id.clone(), reversed)
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        let columns = ctx.read_board_columns(&board_id).await.unwrap();
        assert_eq!(columns[0].name, "Done");
        assert_eq!(columns[2].name, "Backlog");
        let positions: Vec<_> = columns.iter().map(|c| c.position).collect();
        assert_eq!(positions, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_partial_permutation_rejected() {
        let (_temp, ctx, board_id, ids) = setup().await;

        let partial = vec![ids[0].clone(), ids[1].clone()];
        let result = ReorderColumns::new(board_id, partial)
            .execute(&ctx)
            .await
            .into_result();
        assert!(matches!(
            result,
            Err(KanbanError::IncompletePermutation { expected: 3, got: 2, .. })
        ));
    }

    #[tokio::test]
    async fn test_foreign_id_rejected() {
        let (_temp, ctx, board_id, ids) = setup().await;

        let foreign = vec![ids[0].clone(), ids[1].clone(), ColumnId::new()];
        let result = ReorderColumns::new(board_id, foreign)
            .execute(&ctx)
            .await
            .into_result();
        assert!(matches!(result, Err(KanbanError::IncompletePermutation { .. })));
    }

    #[tokio::test]
    async fn test_duplicate_id_rejected() {
        let (_temp, ctx, board_id, ids) = setup().await;

        let duped = vec![ids[0].clone(), ids[0].clone(), ids[1].clone()];
        let result = ReorderColumns::new(board_id, duped)
            .execute(&ctx)
            .await
            .into_result();
        assert!(matches!(result, Err(KanbanError::IncompletePermutation { .. })));
    }
}
