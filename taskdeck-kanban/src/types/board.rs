//! Board and column types
//!
//! Columns never embed tasks: a column carries only its own fields and its
//! dense `position` within the board. Board views are assembled from the flat
//! task store, which keeps ownership acyclic.

use super::ids::{BoardId, ColumnId, ProjectId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A board: an ordered set of columns belonging to one project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    pub id: BoardId,
    pub project_id: ProjectId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Board {
    /// Create a new board for the given project
    pub fn new(project_id: ProjectId, name: impl Into<String>) -> Self {
        Self {
            id: BoardId::new(),
            project_id,
            name: name.into(),
            created_at: Utc::now(),
            deleted_at: None,
        }
    }

    /// Whether the board is not soft-deleted
    pub fn is_active_record(&self) -> bool {
        self.deleted_at.is_none()
    }
}

/// A workflow stage on a board.
///
/// `position` is unique and dense within the board (0..n-1). `wip_limit` is
/// advisory unless the engine policy turns enforcement on; `is_done_column`
/// marks conceptually-terminal columns and is not enforced unique.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Column {
    pub id: ColumnId,
    pub board_id: BoardId,
    pub name: String,
    pub position: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wip_limit: Option<usize>,
    #[serde(default)]
    pub is_done_column: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Column {
    /// Create a new column at the given position
    pub fn new(board_id: BoardId, name: impl Into<String>, position: usize) -> Self {
        Self {
            id: ColumnId::new(),
            board_id,
            name: name.into(),
            position,
            wip_limit: None,
            is_done_column: false,
            created_at: Utc::now(),
            deleted_at: None,
        }
    }

    /// Set the WIP limit
    pub fn with_wip_limit(mut self, limit: usize) -> Self {
        self.wip_limit = Some(limit);
        self
    }

    /// Mark as a done column
    pub fn with_done_marker(mut self) -> Self {
        self.is_done_column = true;
        self
    }

    /// Whether the column is not soft-deleted
    pub fn is_active_record(&self) -> bool {
        self.deleted_at.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_creation() {
        let project = ProjectId::new();
        let board = Board::new(project.clone(), "Delivery");
        assert_eq!(board.project_id, project);
        assert!(board.is_active_record());
    }

    #[test]
    fn test_column_creation() {
        let column = Column::new(BoardId::new(), "In Progress", 1)
            .with_wip_limit(3)
            .with_done_marker();
        assert_eq!(column.position, 1);
        assert_eq!(column.wip_limit, Some(3));
        assert!(column.is_done_column);
    }

    #[test]
    fn test_column_serialization_defaults() {
        let column = Column::new(BoardId::new(), "Todo", 0);
        let json = serde_json::to_string(&column).unwrap();
        // No wip_limit key when unset
        assert!(!json.contains("wip_limit"));
        let parsed: Column = serde_json::from_str(&json).unwrap();
        assert!(!parsed.is_done_column);
        assert!(parsed.deleted_at.is_none());
    }
}
