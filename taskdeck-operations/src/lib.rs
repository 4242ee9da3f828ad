//! # Taskdeck Operations
//!
//! This crate provides the `Execute` and `Operation` traits for defining
//! engine operations. Operations are structs where the fields ARE the
//! parameters - no duplication.
//!
//! ## Example
//!
//! ```ignore
//! use taskdeck_operations::*;
//!
//! #[derive(Debug, Deserialize)]
//! pub struct AddTask {
//!     /// The task title
//!     pub title: String,
//! }
//!
//! impl Operation for AddTask {
//!     fn verb(&self) -> &'static str { "add" }
//!     fn noun(&self) -> &'static str { "task" }
//!     fn description(&self) -> &'static str { "Create a new task" }
//! }
//!
//! #[async_trait]
//! impl Execute<KanbanContext, KanbanError> for AddTask {
//!     async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, KanbanError> {
//!         // implementation returns ExecutionResult::Logged or Unlogged
//!     }
//! }
//! ```

mod execution_result;
mod log;
mod operation;

pub use execution_result::ExecutionResult;
pub use log::LogEntry;
pub use operation::{Execute, Operation, OperationProcessor};

// Re-export for use in implementations
pub use async_trait::async_trait;
pub use serde_json::Value;
