//! Task move events
//!
//! The append-only history behind cycle-time and move analytics. Events are
//! never mutated or deleted, which is why entities are soft-deleted rather
//! than removed.

use super::ids::{ActorId, ColumnId, EventId, TaskId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One committed task relocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskMoveEvent {
    pub id: EventId,
    pub task_id: TaskId,
    pub source_column_id: ColumnId,
    pub source_position: usize,
    pub dest_column_id: ColumnId,
    pub dest_position: usize,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<ActorId>,
}

impl TaskMoveEvent {
    /// Record a move that just committed
    pub fn new(
        task_id: TaskId,
        source_column_id: ColumnId,
        source_position: usize,
        dest_column_id: ColumnId,
        dest_position: usize,
        actor: Option<ActorId>,
    ) -> Self {
        Self {
            id: EventId::new(),
            task_id,
            source_column_id,
            source_position,
            dest_column_id,
            dest_position,
            timestamp: Utc::now(),
            actor,
        }
    }

    /// Whether the move crossed columns
    pub fn is_cross_column(&self) -> bool {
        self.source_column_id != self.dest_column_id
    }
}
