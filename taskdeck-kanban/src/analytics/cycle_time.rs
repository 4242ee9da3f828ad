//! Column cycle time
//!
//! Reconstructs how long tasks sat in each column from the append-only move
//! event log. A task's first stay starts at its creation; every cross-column
//! move closes one stay and opens the next.

use crate::auth::{ActionKind, Capability, Module};
use crate::context::KanbanContext;
use crate::error::KanbanError;
use crate::exec;
use crate::types::{ActorId, BoardId, ColumnId, Task, TaskId, TaskMoveEvent};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use taskdeck_operations::{async_trait, Execute, ExecutionResult, Operation};

/// One continuous residence of a task in a column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stay {
    pub task_id: TaskId,
    pub column_id: ColumnId,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl Stay {
    fn seconds(&self) -> f64 {
        (self.to - self.from).num_milliseconds() as f64 / 1000.0
    }

    fn intersects(&self, since: Option<DateTime<Utc>>, until: DateTime<Utc>) -> bool {
        self.from <= until && since.is_none_or(|s| self.to >= s)
    }
}

/// Mean residence time for one column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnCycleTime {
    pub column_id: ColumnId,
    pub column_name: String,
    pub samples: usize,
    pub mean_seconds: f64,
}

/// Cycle-time breakdown for a board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleTimeReport {
    pub board_id: BoardId,
    pub columns: Vec<ColumnCycleTime>,
}

/// Rebuild every column stay for the given tasks from their move events.
/// Only cross-column events open and close stays; reshuffles within a
/// column leave the residence unbroken. Open stays end at `until`.
pub fn column_stays(tasks: &[Task], events: &[TaskMoveEvent], until: DateTime<Utc>) -> Vec<Stay> {
    let mut per_task: HashMap<&TaskId, Vec<&TaskMoveEvent>> = HashMap::new();
    for event in events.iter().filter(|e| e.is_cross_column()) {
        per_task.entry(&event.task_id).or_default().push(event);
    }

    let mut stays = Vec::new();
    for task in tasks {
        match per_task.get(&task.id) {
            None => stays.push(Stay {
                task_id: task.id.clone(),
                column_id: task.column_id.clone(),
                from: task.created_at,
                to: until,
            }),
            Some(moves) => {
                let mut from = task.created_at;
                for event in moves {
                    stays.push(Stay {
                        task_id: task.id.clone(),
                        column_id: event.source_column_id.clone(),
                        from,
                        to: event.timestamp,
                    });
                    from = event.timestamp;
                }
                // Last known destination holds the task until the horizon
                let last = moves[moves.len() - 1];
                stays.push(Stay {
                    task_id: task.id.clone(),
                    column_id: last.dest_column_id.clone(),
                    from,
                    to: until,
                });
            }
        }
    }
    stays
}

/// Mean time tasks spend in each column of a board, optionally restricted
/// to stays overlapping a time window.
#[derive(Debug, Deserialize, Serialize)]
pub struct GetCycleTime {
    /// The board ID
    pub board_id: BoardId,
    /// Only count stays overlapping this point onward
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since: Option<DateTime<Utc>>,
    /// Window end, defaults to now
    #[serde(skip_serializing_if = "Option::is_none")]
    pub until: Option<DateTime<Utc>>,
    /// Acting user, for the delegated permission check
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<ActorId>,
}

impl GetCycleTime {
    /// Create a new GetCycleTime command
    pub fn new(board_id: impl Into<BoardId>) -> Self {
        Self {
            board_id: board_id.into(),
            since: None,
            until: None,
            actor: None,
        }
    }

    /// Restrict to stays overlapping the window starting here
    pub fn with_since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    /// Set the window end
    pub fn with_until(mut self, until: DateTime<Utc>) -> Self {
        self.until = Some(until);
        self
    }

    /// Set the acting user
    pub fn with_actor(mut self, actor: impl Into<ActorId>) -> Self {
        self.actor = Some(actor.into());
        self
    }
}

impl Operation for GetCycleTime {
    fn verb(&self) -> &'static str {
        "cycle-time"
    }
    fn noun(&self) -> &'static str {
        "analytics"
    }
    fn description(&self) -> &'static str {
        "Compute per-column cycle time for a board"
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for GetCycleTime {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, KanbanError> {
        let result = async {
            let board = ctx.read_board(&self.board_id).await?;
            ctx.authorize(
                self.actor.as_ref(),
                &board.project_id,
                Capability::new(Module::Analytics, ActionKind::Read),
            )
            .await?;

            let columns = ctx.read_board_columns(&board.id).await?;
            let mut tasks = Vec::new();
            for column in &columns {
                tasks.extend(ctx.read_column_tasks(&column.id).await?);
            }
            let events = ctx.read_move_events(&board.id).await?;

            let until = self.until.unwrap_or_else(Utc::now);
            let stays = column_stays(&tasks, &events, until);

            let report = CycleTimeReport {
                board_id: board.id,
                columns: columns
                    .iter()
                    .map(|column| {
                        let durations: Vec<f64> = stays
                            .iter()
                            .filter(|s| {
                                s.column_id == column.id && s.intersects(self.since, until)
                            })
                            .map(Stay::seconds)
                            .collect();
                        let mean = if durations.is_empty() {
                            0.0
                        } else {
                            durations.iter().sum::<f64>() / durations.len() as f64
                        };
                        ColumnCycleTime {
                            column_id: column.id.clone(),
                            column_name: column.name.clone(),
                            samples: durations.len(),
                            mean_seconds: mean,
                        }
                    })
                    .collect(),
            };
            Ok(serde_json::to_value(&report)?)
        }
        .await;

        exec::unlogged(result)
    }
}
