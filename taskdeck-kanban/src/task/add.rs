//! AddTask command

use crate::auth::{ActionKind, Capability, Module};
use crate::context::KanbanContext;
use crate::error::KanbanError;
use crate::exec;
use crate::types::{ActorId, ColumnId, Priority, Task};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use taskdeck_operations::{async_trait, Execute, ExecutionResult, Operation};

/// Create a task at the end of a column.
#[derive(Debug, Deserialize, Serialize)]
pub struct AddTask {
    /// The destination column ID
    pub column_id: ColumnId,
    /// Task title
    pub title: String,
    /// Optional longer description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Priority, defaults to none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    /// Estimated story points
    #[serde(skip_serializing_if = "Option::is_none")]
    pub story_points: Option<u32>,
    /// Due date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    /// Initial assignees
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assignees: Vec<ActorId>,
    /// Acting user, for the delegated permission check
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<ActorId>,
}

impl AddTask {
    /// Create a new AddTask command
    pub fn new(column_id: impl Into<ColumnId>, title: impl Into<String>) -> Self {
        Self {
            column_id: column_id.into(),
            title: title.into(),
            description: None,
            priority: None,
            story_points: None,
            due_date: None,
            assignees: Vec::new(),
            actor: None,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the priority
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Set the story point estimate
    pub fn with_story_points(mut self, points: u32) -> Self {
        self.story_points = Some(points);
        self
    }

    /// Set the due date
    pub fn with_due_date(mut self, due: DateTime<Utc>) -> Self {
        self.due_date = Some(due);
        self
    }

    /// Set the initial assignees
    pub fn with_assignees(mut self, assignees: Vec<ActorId>) -> Self {
        self.assignees = assignees;
        self
    }

    /// Set the acting user
    pub fn with_actor(mut self, actor: impl Into<ActorId>) -> Self {
        self.actor = Some(actor.into());
        self
    }
}

impl Operation for AddTask {
    fn verb(&self) -> &'static str {
        "add"
    }
    fn noun(&self) -> &'static str {
        "task"
    }
    fn description(&self) -> &'static str {
        "Create a task at the end of a column"
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for AddTask {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, KanbanError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);

        let result = async {
            if self.title.trim().is_empty() {
                return Err(KanbanError::invalid_value("title", "must not be empty"));
            }

            let column = ctx.read_column(&self.column_id).await?;
            let board = ctx.read_board(&column.board_id).await?;
            ctx.authorize(
                self.actor.as_ref(),
                &board.project_id,
                Capability::new(Module::Task, ActionKind::Create),
            )
            .await?;

            let _lock = ctx.lock_board_with_retry(&board.id).await?;
            let position = ctx.read_column_tasks(&column.id).await?.len();

            let mut task = Task::new(column.id.clone(), self.title.trim(), position);
            if let Some(description) = &self.description {
                task = task.with_description(description.clone());
            }
            if let Some(priority) = self.priority {
                task = task.with_priority(priority);
            }
            if let Some(points) = self.story_points {
                task = task.with_story_points(points);
            }
            if let Some(due) = self.due_date {
                task = task.with_due_date(due);
            }
            if !self.assignees.is_empty() {
                task = task.with_assignees(self.assignees.clone());
            }
            ctx.write_task(&task).await?;

            if !task.assignees.is_empty() {
                ctx.notify_assignment(&task.id, &task.assignees);
            }

            Ok(serde_json::to_value(&task)?)
        }
        .await;

        exec::logged(self, input, result, start)
    }
}
