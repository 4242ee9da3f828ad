//! The Operation, Execute and OperationProcessor traits

use crate::ExecutionResult;
use async_trait::async_trait;
use serde_json::Value;

/// Metadata describing an operation as a canonical `verb noun` pair.
///
/// The op string appears in audit logs, so verbs and nouns are stable
/// identifiers, not display text.
pub trait Operation {
    /// The verb (e.g. "add", "move", "reorder")
    fn verb(&self) -> &'static str;

    /// The noun (e.g. "task", "column", "sprint")
    fn noun(&self) -> &'static str;

    /// Human-readable description of the operation
    fn description(&self) -> &'static str;

    /// Canonical op string used in logs (e.g. "move task")
    fn op_string(&self) -> String {
        format!("{} {}", self.verb(), self.noun())
    }
}

/// An executable operation against a context of type `C`
#[async_trait]
pub trait Execute<C, E>
where
    C: Sync,
    E: Send,
{
    /// Execute the operation, returning the result and logging intent
    async fn execute(&self, ctx: &C) -> ExecutionResult<Value, E>;
}

/// Drives operations to completion: executes, persists audit log entries,
/// and hands back the plain result
#[async_trait]
pub trait OperationProcessor<C, E>
where
    C: Sync,
    E: Send,
{
    /// Process a single operation against the context
    async fn process<O>(&self, op: &O, ctx: &C) -> Result<Value, E>
    where
        O: Execute<C, E> + Operation + Sync;
}
