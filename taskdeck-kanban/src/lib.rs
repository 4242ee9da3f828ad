//! File-backed kanban engine with dense ordering and sprint analytics.
//!
//! Every entity is a JSON file under a `.taskdeck/` directory; histories are
//! append-only JSONL. Commands implement [`Execute`] against a
//! [`KanbanContext`] and run under a per-board advisory lock, so concurrent
//! writers serialize and columns stay densely numbered from zero.
//!
//! Storage layout:
//!
//! ```text
//! .taskdeck/
//! ├── projects/{project_id}.json
//! ├── boards/{board_id}.json
//! ├── columns/{column_id}.json
//! ├── tasks/{task_id}.json
//! ├── tasks/{task_id}.jsonl        # per-task audit trail
//! ├── sprints/{sprint_id}.json
//! ├── velocity/{sprint_id}.json    # immutable completed-sprint records
//! ├── events/{board_id}.jsonl      # append-only task move history
//! ├── activity/current.jsonl       # global operation log
//! └── locks/{board_id}.lock
//! ```
//!
//! Typical use:
//!
//! ```no_run
//! use taskdeck_kanban::{Execute, KanbanContext};
//! use taskdeck_kanban::task::MoveTask;
//!
//! # async fn demo(ctx: &KanbanContext) -> Result<(), taskdeck_kanban::KanbanError> {
//! let moved = MoveTask::new("task-id", "done-column-id", 0)
//!     .with_actor("alice")
//!     .execute(ctx)
//!     .await
//!     .into_result()?;
//! # Ok(())
//! # }
//! ```

pub mod analytics;
pub mod auth;
pub mod board;
pub mod column;
pub mod project;
pub mod sprint;
pub mod task;
pub mod types;

mod context;
mod error;
mod exec;
mod processor;

pub use context::{BoardLock, EnginePolicy, KanbanContext};
pub use error::{ErrorKind, KanbanError, Result};
pub use processor::KanbanOperationProcessor;

pub use taskdeck_operations::{
    async_trait, Execute, ExecutionResult, LogEntry, Operation, OperationProcessor,
};
