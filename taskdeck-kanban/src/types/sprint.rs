//! Sprint types and the completed-sprint velocity record

use super::ids::{ProjectId, SprintId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a sprint.
///
/// Transitions are one-way: planning -> active -> completed, with
/// planning|active -> cancelled as the only escapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SprintStatus {
    Planning,
    Active,
    Completed,
    Cancelled,
}

impl SprintStatus {
    /// Terminal states accept no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Whether task membership may still change
    pub fn accepts_members(&self) -> bool {
        matches!(self, Self::Planning | Self::Active)
    }
}

/// A time-boxed work period within a project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sprint {
    pub id: SprintId,
    pub project_id: ProjectId,
    pub name: String,
    pub status: SprintStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity_points: Option<u32>,
    /// Snapshot of member story points taken at start; the burndown baseline.
    /// Immutable once set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub committed_points: Option<u32>,
    /// Sum of completed member points, computed once at completion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_points: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retrospective: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Sprint {
    /// Create a new sprint in planning
    pub fn new(project_id: ProjectId, name: impl Into<String>) -> Self {
        Self {
            id: SprintId::new(),
            project_id,
            name: name.into(),
            status: SprintStatus::Planning,
            start_date: None,
            end_date: None,
            capacity_points: None,
            committed_points: None,
            completed_points: None,
            retrospective: None,
            cancel_reason: None,
            created_at: Utc::now(),
        }
    }

    /// Set the planned dates
    pub fn with_dates(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    /// Set the capacity target
    pub fn with_capacity(mut self, points: u32) -> Self {
        self.capacity_points = Some(points);
        self
    }

    /// Sprint duration in whole days, when both dates are set
    pub fn duration_days(&self) -> Option<i64> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => Some((end - start).num_days()),
            _ => None,
        }
    }
}

/// Immutable record of a completed sprint, consumed by velocity analytics.
/// Written exactly once by sprint completion and never updated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VelocityRecord {
    pub sprint_id: SprintId,
    pub project_id: ProjectId,
    pub completed_points: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity_points: Option<u32>,
    pub completed_at: DateTime<Utc>,
}
