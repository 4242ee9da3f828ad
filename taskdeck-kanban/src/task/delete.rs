//! DeleteTask command

use crate::auth::{ActionKind, Capability, Module};
use crate::context::KanbanContext;
use crate::error::KanbanError;
use crate::exec;
use crate::types::{ActorId, TaskId};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use taskdeck_operations::{async_trait, Execute, ExecutionResult, Operation};

/// Soft-delete a task and close the positional gap it leaves behind. The
/// task record stays on disk for audit history; reads treat it as gone.
#[derive(Debug, Deserialize, Serialize)]
pub struct DeleteTask {
    /// The task ID
    pub id: TaskId,
    /// Acting user, for the delegated permission check
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<ActorId>,
}

impl DeleteTask {
    /// Create a new DeleteTask command
    pub fn new(id: impl Into<TaskId>) -> Self {
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

impl Operation for DeleteTask {
    fn verb(&self) -> &'static str {
        "delete"
    }
    fn noun(&self) -> &'static str {
        "task"
    }
    fn description(&self) -> &'static str {
        "Soft-delete a task and reindex its column"
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for DeleteTask {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, KanbanError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);

        let result = async {
            let mut task = ctx.read_task(&self.id).await?;
            let column = ctx.read_column(&task.column_id).await?;
            let board = ctx.read_board(&column.board_id).await?;
            ctx.authorize(
                self.actor.as_ref(),
                &board.project_id,
                Capability::new(Module::Task, ActionKind::Delete),
            )
            .await?;

            let _lock = ctx.lock_board_with_retry(&board.id).await?;

            let vacated = task.position;
            task.deleted_at = Some(Utc::now());
            ctx.write_task(&task).await?;

            // Shift everything after the vacated slot down by one
            for mut sibling in ctx.read_column_tasks(&column.id).await? {
                if sibling.position > vacated {
                    sibling.position -= 1;
                    ctx.write_task(&sibling).await?;
                }
            }

            Ok(json!({
                "deleted": true,
                "id": task.id,
                "column_id": column.id,
            }))
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
    use crate::task::AddTask;
    use crate::types::ColumnId;
    use tempfile::TempDir;

    async fn setup() -> (TempDir, KanbanContext, ColumnId, Vec<TaskId>) {
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
        let column = CreateColumn::new(board["id"].as_str().unwrap(), "Todo")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let column_id = ColumnId::from_string(column["id"].as_str().unwrap());

        let mut ids = Vec::new();
        for title in ["a", "b", "c"] {
            let task = AddTask::new(column_id.clone(), title)
                .execute(&ctx)
                .await
                .into_result()
                .unwrap();
            ids.push(TaskId::from_string(task["id"].as_str().unwrap()));
        }
        (temp, ctx, column_id, ids)
    }

    #[tokio::test]
    async fn test_delete_middle_reindexes_column() {
        let (_temp, ctx, column_id, ids) = setup().await;

        DeleteTask::new(ids[1].clone())
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        let tasks = ctx.read_column_tasks(&column_id).await.unwrap();
        assert_eq!(tasks.len(), 2);
        let view: Vec<_> = tasks.iter().map(|t| (t.title.as_str(), t.position)).collect();
        assert_eq!(view, vec![("a", 0), ("c", 1)]);
    }

    #[tokio::test]
    async fn test_deleted_task_reads_as_missing() {
        let (_temp, ctx, _column_id, ids) = setup().await;

        DeleteTask::new(ids[0].clone())
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        let result = ctx.read_task(&ids[0]).await;
        assert!(matches!(result, Err(KanbanError::TaskNotFound { .. })));
    }

    #[tokio::test]
    async fn test_double_delete_fails() {
        let (_temp, ctx, _column_id, ids) = setup().await;

        DeleteTask::new(ids[2].clone())
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let result = DeleteTask::new(ids[2].clone()).execute(&ctx).await.into_result();
        assert!(matches!(result, Err(KanbanError::TaskNotFound { .. })));
    }
}
