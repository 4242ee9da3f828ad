//! Core types for the kanban engine

mod board;
mod event;
mod ids;
mod project;
mod sprint;
mod task;

// Re-export all types
pub use board::{Board, Column};
pub use event::TaskMoveEvent;
pub use ids::{ActorId, BoardId, ColumnId, EventId, LabelId, ProjectId, SprintId, TaskId};
pub use project::{Project, ProjectStatus, Visibility};
pub use sprint::{Sprint, SprintStatus, VelocityRecord};
pub use task::{Priority, Task, TaskStatus};
