//! UpdateTask command

use crate::auth::{ActionKind, Capability, Module};
use crate::context::KanbanContext;
use crate::error::KanbanError;
use crate::exec;
use crate::types::{ActorId, LabelId, Priority, TaskId, TaskStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use taskdeck_operations::{async_trait, Execute, ExecutionResult, Operation};

/// Update the non-positional fields of a task. Column and position are owned
/// by [`MoveTask`](crate::task::MoveTask); sprint membership by the sprint
/// commands.
#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateTask {
    /// The task ID
    pub id: TaskId,
    /// New title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New workflow status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    /// New priority
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    /// New story point estimate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub story_points: Option<u32>,
    /// New due date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    /// Replacement assignee list
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignees: Option<Vec<ActorId>>,
    /// Replacement label list
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<LabelId>>,
    /// Acting user, for the delegated permission check
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<ActorId>,
}

impl UpdateTask {
    /// Create a new UpdateTask command
    pub fn new(id: impl Into<TaskId>) -> Self {
        Self {
            id: id.into(),
            title: None,
            description: None,
            status: None,
            priority: None,
            story_points: None,
            due_date: None,
            assignees: None,
            labels: None,
            actor: None,
        }
    }

    /// Set a new title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set a new description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set a new workflow status
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Set a new priority
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Set a new story point estimate
    pub fn with_story_points(mut self, points: u32) -> Self {
        self.story_points = Some(points);
        self
    }

    /// Set a new due date
    pub fn with_due_date(mut self, due: DateTime<Utc>) -> Self {
        self.due_date = Some(due);
        self
    }

    /// Replace the assignee list
    pub fn with_assignees(mut self, assignees: Vec<ActorId>) -> Self {
        self.assignees = Some(assignees);
        self
    }

    /// Replace the label list
    pub fn with_labels(mut self, labels: Vec<LabelId>) -> Self {
        self.labels = Some(labels);
        self
    }

    /// Set the acting user
    pub fn with_actor(mut self, actor: impl Into<ActorId>) -> Self {
        self.actor = Some(actor.into());
        self
    }
}

impl Operation for UpdateTask {
    fn verb(&self) -> &'static str {
        "update"
    }
    fn noun(&self) -> &'static str {
        "task"
    }
    fn description(&self) -> &'static str {
        "Update the non-positional fields of a task"
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for UpdateTask {
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
                Capability::new(Module::Task, ActionKind::Update),
            )
            .await?;

            if let Some(title) = &self.title {
                if title.trim().is_empty() {
                    return Err(KanbanError::invalid_value("title", "must not be empty"));
                }
                task.title = title.trim().to_string();
            }
            if let Some(description) = &self.description {
                task.description = description.clone();
            }
            if let Some(status) = self.status {
                task.set_status(status);
            }
            if let Some(priority) = self.priority {
                task.priority = priority;
            }
            if let Some(points) = self.story_points {
                task.story_points = Some(points);
            }
            if let Some(due) = self.due_date {
                task.due_date = Some(due);
            }
            let mut new_assignees = Vec::new();
            if let Some(assignees) = &self.assignees {
                new_assignees = assignees
                    .iter()
                    .filter(|a| !task.assignees.contains(a))
                    .cloned()
                    .collect();
                task.assignees = assignees.clone();
            }
            if let Some(labels) = &self.labels {
                task.labels = labels.clone();
            }

            ctx.write_task(&task).await?;

            if !new_assignees.is_empty() {
                ctx.notify_assignment(&task.id, &new_assignees);
            }

            Ok(serde_json::to_value(&task)?)
        }
        .await;

        exec::logged(self, input, result, start)
    }
}
