//! GetBoard command

use crate::auth::{ActionKind, Capability, Module};
use crate::context::KanbanContext;
use crate::error::KanbanError;
use crate::exec;
use crate::types::{ActorId, BoardId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use taskdeck_operations::{async_trait, Execute, ExecutionResult, Operation};

/// Get the full board: ordered columns, each with its ordered tasks and
/// current occupancy so callers can render WIP-limit warnings.
#[derive(Debug, Deserialize, Serialize)]
pub struct GetBoard {
    /// The board ID
    pub id: BoardId,
    /// Acting user, for the delegated permission check
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<ActorId>,
}

impl GetBoard {
    /// Create a new GetBoard command
    pub fn new(id: impl Into<BoardId>) -> Self {
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

impl Operation for GetBoard {
    fn verb(&self) -> &'static str {
        "get"
    }
    fn noun(&self) -> &'static str {
        "board"
    }
    fn description(&self) -> &'static str {
        "Retrieve the board with ordered columns and tasks"
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for GetBoard {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, KanbanError> {
        let result = async {
            let board = ctx.read_board(&self.id).await?;
            ctx.authorize(
                self.actor.as_ref(),
                &board.project_id,
                Capability::new(Module::Board, ActionKind::Read),
            )
            .await?;
            let columns = ctx.read_board_columns(&board.id).await?;

            let mut column_views = Vec::with_capacity(columns.len());
            for column in &columns {
                let tasks = ctx.read_column_tasks(&column.id).await?;
                let mut view = serde_json::to_value(column)?;
                view["occupancy"] = serde_json::json!(tasks.len());
                view["tasks"] = serde_json::to_value(&tasks)?;
                column_views.push(view);
            }

            let mut result = serde_json::to_value(&board)?;
            result["columns"] = Value::Array(column_views);
            Ok(result)
        }
        .await;

        exec::unlogged(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::CreateBoard;
    use crate::column::CreateColumn;
    use crate::project::CreateProject;
    use crate::task::AddTask;
    use crate::types::ColumnId;
    use tempfile::TempDir;

    async fn setup() -> (TempDir, KanbanContext, BoardId) {
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
        (temp, ctx, board_id)
    }

    #[tokio::test]
    async fn test_get_board_ordered_view() {
        let (_temp, ctx, board_id) = setup().await;

        let todo = CreateColumn::new(board_id.clone(), "Todo")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        CreateColumn::new(board_id.clone(), "Done")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        let todo_id = ColumnId::from_string(todo["id"].as_str().unwrap());
        AddTask::new(todo_id.clone(), "A").execute(&ctx).await.into_result().unwrap();
        AddTask::new(todo_id, "B").execute(&ctx).await.into_result().unwrap();

        let view = GetBoard::new(board_id).execute(&ctx).await.into_result().unwrap();
        let columns = view["columns"].as_array().unwrap();
        assert_eq!(columns.len(), 2);
        assert_eq!(columns[0]["name"], "Todo");
        assert_eq!(columns[0]["occupancy"], 2);
        assert_eq!(columns[1]["occupancy"], 0);

        let tasks = columns[0]["tasks"].as_array().unwrap();
        assert_eq!(tasks[0]["title"], "A");
        assert_eq!(tasks[0]["position"], 0);
        assert_eq!(tasks[1]["position"], 1);
    }

    #[tokio::test]
    async fn test_get_board_delegates_permission_check() {
        use crate::auth::Authorizer;
        use crate::types::{ActorId, ProjectId};
        use std::sync::Arc;

        struct DenyAll;

        #[async_trait]
        impl Authorizer for DenyAll {
            async fn check(
                &self,
                _actor: &ActorId,
                _project: &ProjectId,
                _capability: Capability,
            ) -> bool {
                false
            }
        }

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

        let ctx = ctx.with_authorizer(Arc::new(DenyAll));
        let result = GetBoard::new(board_id.clone())
            .with_actor("mallory")
            .execute(&ctx)
            .await
            .into_result();
        assert!(matches!(result, Err(KanbanError::PermissionDenied { .. })));

        // Actorless embedded callers are still allowed
        GetBoard::new(board_id).execute(&ctx).await.into_result().unwrap();
    }

    #[tokio::test]
    async fn test_get_missing_board() {
        let temp = TempDir::new().unwrap();
        let ctx = KanbanContext::new(temp.path().join(".taskdeck"));
        ctx.create_directories().await.unwrap();

        let result = GetBoard::new("nope").execute(&ctx).await.into_result();
        assert!(matches!(result, Err(KanbanError::BoardNotFound { .. })));
    }
}
