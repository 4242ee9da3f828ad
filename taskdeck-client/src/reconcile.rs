//! Optimistic move reconciliation
//!
//! A drag is applied to the local view immediately and confirmed (or rolled
//! back) when the engine responds. Responses are matched to moves by a
//! per-ticket sequence number: a newer drag of the same task supersedes an
//! older in-flight one, and the superseded response is simply ignored.

use crate::view::{BoardView, ColumnView};
use std::collections::HashMap;
use thiserror::Error;

/// Reconciliation failures surfaced to the caller
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClientError {
    #[error("task not on board: {id}")]
    UnknownTask { id: String },

    #[error("column not on board: {id}")]
    UnknownColumn { id: String },
}

/// Handle for one in-flight move, returned by [`ClientBoard::begin_move`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveTicket {
    task_id: String,
    seq: u64,
}

/// What a server response did to the local state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The response matched the newest move and the view was reconciled
    Applied,
    /// The response belonged to a superseded move and was ignored
    Stale,
    /// Local state may have diverged; the caller must refetch the board
    RefetchRequired,
}

/// Pre-drag state kept for rollback
#[derive(Debug)]
struct PendingMove {
    seq: u64,
    /// Affected columns as they looked before the first optimistic apply
    snapshot: Vec<ColumnView>,
}

impl PendingMove {
    fn has_column(&self, column_id: &str) -> bool {
        self.snapshot.iter().any(|c| c.id == column_id)
    }
}

/// Client-side board state: the last confirmed view plus an optimistic
/// overlay of in-flight moves, keyed by task.
#[derive(Debug)]
pub struct ClientBoard {
    view: BoardView,
    pending: HashMap<String, PendingMove>,
    next_seq: u64,
}

impl ClientBoard {
    /// Start from a fetched board view
    pub fn new(view: BoardView) -> Self {
        Self {
            view,
            pending: HashMap::new(),
            next_seq: 0,
        }
    }

    /// The view to render, optimistic moves included
    pub fn view(&self) -> &BoardView {
        &self.view
    }

    /// Whether any move is still awaiting a response
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Apply a drag optimistically and return the ticket to reconcile its
    /// response with. A second drag of the same task before the first
    /// response supersedes the earlier ticket.
    pub fn begin_move(
        &mut self,
        task_id: &str,
        dest_column_id: &str,
        dest_position: usize,
    ) -> Result<MoveTicket, ClientError> {
        let source_column = self
            .view
            .locate(task_id)
            .map(|(column, _)| column.to_string())
            .ok_or_else(|| ClientError::UnknownTask {
                id: task_id.to_string(),
            })?;
        if self.view.column(dest_column_id).is_none() {
            return Err(ClientError::UnknownColumn {
                id: dest_column_id.to_string(),
            });
        }

        let seq = self.next_seq;
        self.next_seq += 1;

        // Hold the task's columns as of the drag start. On a coalesced drag
        // the original snapshot stays; only columns it has not seen yet are
        // added, at their current (pre-this-drag) state.
        match self.pending.get_mut(task_id) {
            Some(pending) => {
                for column_id in [source_column.as_str(), dest_column_id] {
                    if !pending.has_column(column_id) {
                        if let Some(column) = self.view.column(column_id) {
                            pending.snapshot.push(column.clone());
                        }
                    }
                }
                pending.seq = seq;
            }
            None => {
                let mut snapshot = Vec::new();
                for column_id in [source_column.as_str(), dest_column_id] {
                    if !snapshot.iter().any(|c: &ColumnView| c.id == column_id) {
                        if let Some(column) = self.view.column(column_id) {
                            snapshot.push(column.clone());
                        }
                    }
                }
                self.pending
                    .insert(task_id.to_string(), PendingMove { seq, snapshot });
            }
        }

        self.view.remove_task(task_id);
        self.view
            .insert_task(dest_column_id, dest_position, task_id.to_string());

        Ok(MoveTicket {
            task_id: task_id.to_string(),
            seq,
        })
    }

    /// Reconcile a successful engine response. The engine may have clamped
    /// the requested position; the view is silently corrected to the
    /// authoritative placement.
    pub fn on_success(
        &mut self,
        ticket: &MoveTicket,
        authoritative_column_id: &str,
        authoritative_position: usize,
    ) -> Outcome {
        match self.pending.get(&ticket.task_id) {
            Some(pending) if pending.seq == ticket.seq => {}
            _ => return Outcome::Stale,
        }

        self.view.remove_task(&ticket.task_id);
        if !self.view.insert_task(
            authoritative_column_id,
            authoritative_position,
            ticket.task_id.clone(),
        ) {
            // The server placed the task in a column we have never seen
            self.pending.remove(&ticket.task_id);
            return Outcome::RefetchRequired;
        }
        self.pending.remove(&ticket.task_id);
        Outcome::Applied
    }

    /// Reconcile a failed engine response: the overlay is discarded and the
    /// drag-start snapshot restored. Local state may still be behind the
    /// server's, so the caller must refetch.
    pub fn on_failure(&mut self, ticket: &MoveTicket) -> Outcome {
        match self.pending.get(&ticket.task_id) {
            Some(pending) if pending.seq == ticket.seq => {}
            _ => return Outcome::Stale,
        }

        if let Some(pending) = self.pending.remove(&ticket.task_id) {
            for saved in pending.snapshot {
                if let Some(column) = self.view.column_mut(&saved.id) {
                    *column = saved;
                }
            }
        }
        Outcome::RefetchRequired
    }

    /// Replace all local state with a freshly fetched view. Every pending
    /// overlay is dropped; in-flight responses will reconcile as stale.
    pub fn refetch(&mut self, view: BoardView) {
        self.view = view;
        self.pending.clear();
    }
}
