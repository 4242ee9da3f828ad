//! KanbanOperationProcessor - executes commands and persists their audit trail

use crate::context::KanbanContext;
use crate::error::{KanbanError, Result};
use crate::types::TaskId;
use async_trait::async_trait;
use serde_json::Value;
use taskdeck_operations::{Execute, Operation, OperationProcessor};

/// Drives command execution: runs the command, attributes the audit entry to
/// the processor's actor, and appends it to the global activity log plus the
/// per-task log when the operation targeted a task.
pub struct KanbanOperationProcessor {
    actor: Option<String>,
}

impl KanbanOperationProcessor {
    /// Processor without actor attribution
    pub fn new() -> Self {
        Self { actor: None }
    }

    /// Processor attributing all operations to the given actor.
    /// Format: "user_id" or "agent_name[session_id]".
    pub fn with_actor(actor: impl Into<String>) -> Self {
        Self {
            actor: Some(actor.into()),
        }
    }
}

impl Default for KanbanOperationProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OperationProcessor<KanbanContext, KanbanError> for KanbanOperationProcessor {
    async fn process<O>(&self, op: &O, ctx: &KanbanContext) -> Result<Value>
    where
        O: Execute<KanbanContext, KanbanError> + Operation + Sync,
    {
        let noun = op.noun();
        let (result, log_entry) = op.execute(ctx).await.split();

        if let Some(mut entry) = log_entry {
            if let Some(actor) = &self.actor {
                entry = entry.with_actor(actor.clone());
            }
            ctx.ensure_directories().await?;
            ctx.append_activity(&entry).await?;

            if noun == "task" {
                let task_id = entry
                    .output
                    .get("id")
                    .or_else(|| entry.input.get("id"))
                    .and_then(|v| v.as_str())
                    .map(TaskId::from_string);
                if let Some(task_id) = task_id {
                    ctx.append_task_log(&task_id, &entry).await?;
                }
            }
        }

        result
    }
}
