//! RemoveTasksFromSprint command

use crate::auth::{ActionKind, Capability, Module};
use crate::context::KanbanContext;
use crate::error::KanbanError;
use crate::exec;
use crate::types::{ActorId, SprintId, Task, TaskId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use taskdeck_operations::{async_trait, Execute, ExecutionResult, Operation};

/// Remove tasks from a planning or active sprint. Tasks not currently in
/// the sprint are left untouched.
#[derive(Debug, Deserialize, Serialize)]
pub struct RemoveTasksFromSprint {
    /// The sprint ID
    pub sprint_id: SprintId,
    /// Tasks to withdraw
    pub task_ids: Vec<TaskId>,
    /// Acting user, for the delegated permission check
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<ActorId>,
}

impl RemoveTasksFromSprint {
    /// Create a new RemoveTasksFromSprint command
    pub fn new(sprint_id: impl Into<SprintId>, task_ids: Vec<TaskId>) -> Self {
        Self {
            sprint_id: sprint_id.into(),
            task_ids,
            actor: None,
        }
    }

    /// Set the acting user
    pub fn with_actor(mut self, actor: impl Into<ActorId>) -> Self {
        self.actor = Some(actor.into());
        self
    }
}

impl Operation for RemoveTasksFromSprint {
    fn verb(&self) -> &'static str {
        "unassign"
    }
    fn noun(&self) -> &'static str {
        "sprint"
    }
    fn description(&self) -> &'static str {
        "Remove tasks from a sprint"
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for RemoveTasksFromSprint {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, KanbanError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);

        let result = async {
            let sprint = ctx.read_sprint(&self.sprint_id).await?;
            ctx.authorize(
                self.actor.as_ref(),
                &sprint.project_id,
                Capability::new(Module::Sprint, ActionKind::Update),
            )
            .await?;

            if !sprint.status.accepts_members() {
                return Err(KanbanError::SprintClosed {
                    id: sprint.id.to_string(),
                    status: format!("{:?}", sprint.status).to_lowercase(),
                });
            }

            let mut tasks: Vec<Task> = Vec::with_capacity(self.task_ids.len());
            for task_id in &self.task_ids {
                tasks.push(ctx.read_task(task_id).await?);
            }

            let mut withdrawn = 0usize;
            for mut task in tasks {
                if task.sprint_id.as_ref() == Some(&sprint.id) {
                    task.sprint_id = None;
                    ctx.write_task(&task).await?;
                    withdrawn += 1;
                }
            }

            Ok(serde_json::json!({
                "sprint_id": sprint.id,
                "withdrawn": withdrawn,
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
    use crate::sprint::{AddTasksToSprint, CreateSprint, StartSprint};
    use crate::task::AddTask;
    use crate::types::ColumnId;
    use tempfile::TempDir;

    async fn setup() -> (TempDir, KanbanContext, SprintId, Vec<TaskId>) {
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
        let sprint = CreateSprint::new(project["id"].as_str().unwrap(), "S")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let sprint_id = SprintId::from_string(sprint["id"].as_str().unwrap());

        let mut task_ids = Vec::new();
        for title in ["a", "b"] {
            let task = AddTask::new(column_id.clone(), title)
                .execute(&ctx)
                .await
                .into_result()
                .unwrap();
            task_ids.push(TaskId::from_string(task["id"].as_str().unwrap()));
        }
        AddTasksToSprint::new(sprint_id.clone(), task_ids.clone())
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        (temp, ctx, sprint_id, task_ids)
    }

    #[tokio::test]
    async fn test_withdraws_members() {
        let (_temp, ctx, sprint_id, task_ids) = setup().await;

        let value = RemoveTasksFromSprint::new(sprint_id.clone(), vec![task_ids[0].clone()])
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(value["withdrawn"], 1);

        let members = ctx.read_sprint_tasks(&sprint_id).await.unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].id, task_ids[1]);
    }

    #[tokio::test]
    async fn test_active_sprint_still_accepts_changes() {
        let (_temp, ctx, sprint_id, task_ids) = setup().await;

        StartSprint::new(sprint_id.clone())
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        RemoveTasksFromSprint::new(sprint_id.clone(), task_ids)
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert!(ctx.read_sprint_tasks(&sprint_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_non_member_is_noop() {
        let (_temp, ctx, sprint_id, _task_ids) = setup().await;

        let result = RemoveTasksFromSprint::new(sprint_id, vec![TaskId::new()])
            .execute(&ctx)
            .await
            .into_result();
        assert!(matches!(result, Err(KanbanError::TaskNotFound { .. })));
    }
}
