//! AddTasksToSprint command

use crate::auth::{ActionKind, Capability, Module};
use crate::context::KanbanContext;
use crate::error::KanbanError;
use crate::exec;
use crate::types::{ActorId, SprintId, Task, TaskId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use taskdeck_operations::{async_trait, Execute, ExecutionResult, Operation};

/// Add tasks to a planning or active sprint.
///
/// All-or-nothing: every task must exist and belong to the sprint's project,
/// otherwise no membership changes.
#[derive(Debug, Deserialize, Serialize)]
pub struct AddTasksToSprint {
    /// The sprint ID
    pub sprint_id: SprintId,
    /// Tasks to enroll
    pub task_ids: Vec<TaskId>,
    /// Acting user, for the delegated permission check
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<ActorId>,
}

impl AddTasksToSprint {
    /// Create a new AddTasksToSprint command
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

impl Operation for AddTasksToSprint {
    fn verb(&self) -> &'static str {
        "assign"
    }
    fn noun(&self) -> &'static str {
        "sprint"
    }
    fn description(&self) -> &'static str {
        "Add tasks to a sprint"
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for AddTasksToSprint {
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

            // Validate the whole batch before writing anything
            let mut tasks: Vec<Task> = Vec::with_capacity(self.task_ids.len());
            for task_id in &self.task_ids {
                let task = ctx.read_task(task_id).await?;
                let column = ctx.read_column(&task.column_id).await?;
                let board = ctx.read_board(&column.board_id).await?;
                if board.project_id != sprint.project_id {
                    return Err(KanbanError::invalid_value(
                        "task_ids",
                        format!("task {task_id} belongs to another project"),
                    ));
                }
                tasks.push(task);
            }

            let mut enrolled = 0usize;
            for mut task in tasks {
                if task.sprint_id.as_ref() != Some(&sprint.id) {
                    task.sprint_id = Some(sprint.id.clone());
                    ctx.write_task(&task).await?;
                    enrolled += 1;
                }
            }

            Ok(serde_json::json!({
                "sprint_id": sprint.id,
                "enrolled": enrolled,
            }))
        }
        .await;

        exec::logged(self, input, result, start)
    }
}
