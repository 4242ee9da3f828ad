//! Task types

use super::ids::{ActorId, ColumnId, LabelId, SprintId, TaskId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Workflow status of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Open,
    InProgress,
    Blocked,
    Review,
    Completed,
    Cancelled,
}

impl TaskStatus {
    /// Statuses that count as open work for workload purposes
    pub fn is_open_work(&self) -> bool {
        !matches!(self, Self::Completed | Self::Cancelled)
    }
}

/// Priority of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
    None,
}

/// A task/card on a board.
///
/// A task belongs to exactly one column at any instant; its `position` is
/// unique and dense within that column (0..m-1) at every committed state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub column_id: ColumnId,
    pub position: usize,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: TaskStatus,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub story_points: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sprint_id: Option<SprintId>,
    #[serde(default)]
    pub assignees: Vec<ActorId>,
    #[serde(default)]
    pub labels: Vec<LabelId>,
    pub created_at: DateTime<Utc>,
    /// Set when status enters `completed`, cleared when it leaves.
    /// Burndown "actual" lines are derived from this.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Create a new open task at the given column position
    pub fn new(column_id: ColumnId, title: impl Into<String>, position: usize) -> Self {
        Self {
            id: TaskId::new(),
            column_id,
            position,
            title: title.into(),
            description: String::new(),
            status: TaskStatus::Open,
            priority: Priority::None,
            story_points: None,
            due_date: None,
            sprint_id: None,
            assignees: Vec::new(),
            labels: Vec::new(),
            created_at: Utc::now(),
            completed_at: None,
            deleted_at: None,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the priority
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Set the story points
    pub fn with_story_points(mut self, points: u32) -> Self {
        self.story_points = Some(points);
        self
    }

    /// Set the due date
    pub fn with_due_date(mut self, due: DateTime<Utc>) -> Self {
        self.due_date = Some(due);
        self
    }

    /// Set the assignees
    pub fn with_assignees(mut self, assignees: Vec<ActorId>) -> Self {
        self.assignees = assignees;
        self
    }

    /// Apply a status change, maintaining the completion timestamp
    pub fn set_status(&mut self, status: TaskStatus) {
        if status == TaskStatus::Completed && self.status != TaskStatus::Completed {
            self.completed_at = Some(Utc::now());
        } else if status != TaskStatus::Completed {
            self.completed_at = None;
        }
        self.status = status;
    }

    /// Whether the task is not soft-deleted
    pub fn is_active_record(&self) -> bool {
        self.deleted_at.is_none()
    }
}
