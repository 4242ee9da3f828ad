//! Client-side board state for taskdeck.
//!
//! Pure state machine, no I/O: the caller fetches board views and submits
//! moves through whatever transport it has, and this crate keeps the local
//! picture coherent while responses are in flight. Drags apply immediately,
//! a newer drag of the same task supersedes an older unanswered one, a
//! success silently corrects server-clamped positions, and a failure rolls
//! back to the drag-start snapshot and demands a refetch.

mod reconcile;
mod view;

pub use reconcile::{ClientBoard, ClientError, MoveTicket, Outcome};
pub use view::{BoardView, ColumnView};
