//! Error types for the kanban engine

use std::path::PathBuf;
use thiserror::Error;

/// Result type for kanban operations
pub type Result<T> = std::result::Result<T, KanbanError>;

/// Stable error classification for transport status mapping.
///
/// Every `KanbanError` variant maps onto exactly one kind; `Conflict` is the
/// only kind a caller may retry (with backoff, bounded attempts).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Validation,
    Conflict,
    InvalidTransition,
    PermissionDenied,
    Internal,
}

/// Errors that can occur in kanban operations
#[derive(Debug, Error)]
pub enum KanbanError {
    /// Store not initialized at the given path
    #[error("store not initialized at {path}")]
    NotInitialized { path: PathBuf },

    /// Project not found
    #[error("project not found: {id}")]
    ProjectNotFound { id: String },

    /// Board not found
    #[error("board not found: {id}")]
    BoardNotFound { id: String },

    /// Column not found
    #[error("column not found: {id}")]
    ColumnNotFound { id: String },

    /// Task not found (or soft-deleted)
    #[error("task not found: {id}")]
    TaskNotFound { id: String },

    /// Sprint not found
    #[error("sprint not found: {id}")]
    SprintNotFound { id: String },

    /// Column has tasks and cannot be deleted without migration
    #[error("column '{id}' has {count} tasks and cannot be deleted")]
    ColumnNotEmpty { id: String, count: usize },

    /// Moves may not cross board boundaries
    #[error("cannot move task {task} across boards ({source_board} -> {dest_board})")]
    CrossBoardMove {
        task: String,
        source_board: String,
        dest_board: String,
    },

    /// Column reorder did not name every column exactly once
    #[error("column reorder for board {board} must permute all {expected} columns, got {got}")]
    IncompletePermutation {
        board: String,
        expected: usize,
        got: usize,
    },

    /// Duplicate ID
    #[error("duplicate {item_type} ID: {id}")]
    DuplicateId { item_type: String, id: String },

    /// Invalid field value
    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    /// Sprint lifecycle misuse
    #[error("invalid sprint transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    /// Sprint membership change on a closed sprint
    #[error("sprint {id} is {status} and no longer accepts membership changes")]
    SprintClosed { id: String, status: String },

    /// Another sprint is already active in the project
    #[error("project {project} already has an active sprint: {active}")]
    SprintAlreadyActive { project: String, active: String },

    /// WIP limit exceeded (only when enforcement policy is on)
    #[error("column '{column}' is at its WIP limit of {limit}")]
    WipLimitExceeded { column: String, limit: usize },

    /// The delegated authorization check denied the action
    #[error("permission denied for {actor}: {action}")]
    PermissionDenied { actor: String, action: String },

    /// Lock is held by another operation
    #[error("lock busy - another operation in progress")]
    LockBusy,

    /// Lock acquisition gave up after bounded retries
    #[error("lock timeout after {elapsed_ms}ms")]
    LockTimeout { elapsed_ms: u64 },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl KanbanError {
    /// Create an invalid value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a duplicate ID error
    pub fn duplicate_id(item_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::DuplicateId {
            item_type: item_type.into(),
            id: id.into(),
        }
    }

    /// Classify this error for transport status mapping
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ProjectNotFound { .. }
            | Self::BoardNotFound { .. }
            | Self::ColumnNotFound { .. }
            | Self::TaskNotFound { .. }
            | Self::SprintNotFound { .. }
            | Self::NotInitialized { .. } => ErrorKind::NotFound,

            Self::CrossBoardMove { .. }
            | Self::IncompletePermutation { .. }
            | Self::DuplicateId { .. }
            | Self::WipLimitExceeded { .. }
            | Self::InvalidValue { .. } => ErrorKind::Validation,

            Self::ColumnNotEmpty { .. }
            | Self::SprintAlreadyActive { .. }
            | Self::LockBusy
            | Self::LockTimeout { .. } => ErrorKind::Conflict,

            Self::InvalidStateTransition { .. } | Self::SprintClosed { .. } => {
                ErrorKind::InvalidTransition
            }

            Self::PermissionDenied { .. } => ErrorKind::PermissionDenied,

            Self::Io(_) | Self::Json(_) => ErrorKind::Internal,
        }
    }

    /// Check if this is a retryable error.
    ///
    /// Only serialization conflicts are safe to retry; every other failure is
    /// terminal for the request.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::LockBusy | Self::LockTimeout { .. })
    }
}
