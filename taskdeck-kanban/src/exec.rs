//! Shared wrapping of command bodies into `ExecutionResult`s

use crate::error::KanbanError;
use serde_json::Value;
use std::time::Instant;
use taskdeck_operations::{ExecutionResult, LogEntry, Operation};

/// Wrap a mutating command body's outcome: success becomes `Logged` with an
/// audit entry, failure becomes `Failed` with the error recorded.
pub(crate) fn logged(
    op: &dyn Operation,
    input: Value,
    result: Result<Value, KanbanError>,
    start: Instant,
) -> ExecutionResult<Value, KanbanError> {
    let duration_ms = start.elapsed().as_millis() as u64;
    match result {
        Ok(value) => ExecutionResult::Logged {
            value: value.clone(),
            log_entry: LogEntry::new(op.op_string(), input, value, None, duration_ms),
        },
        Err(error) => {
            let error_msg = error.to_string();
            ExecutionResult::Failed {
                error,
                log_entry: Some(LogEntry::new(
                    op.op_string(),
                    input,
                    serde_json::json!({ "error": error_msg }),
                    None,
                    duration_ms,
                )),
            }
        }
    }
}

/// Wrap a read-only command body's outcome: success is `Unlogged`, failure is
/// `Failed` without an audit entry.
pub(crate) fn unlogged(
    result: Result<Value, KanbanError>,
) -> ExecutionResult<Value, KanbanError> {
    match result {
        Ok(value) => ExecutionResult::Unlogged { value },
        Err(error) => ExecutionResult::Failed {
            error,
            log_entry: None,
        },
    }
}
