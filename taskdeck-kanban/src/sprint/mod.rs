//! Sprint lifecycle operations
//!
//! A sprint moves planning -> active -> completed, with cancellation as the
//! only escape from planning or active. Starting snapshots the committed
//! point baseline; completing freezes the outcome into a velocity record.

mod assign;
mod cancel;
mod complete;
mod create;
mod start;
mod unassign;

pub use assign::AddTasksToSprint;
pub use cancel::CancelSprint;
pub use complete::CompleteSprint;
pub use create::CreateSprint;
pub use start::StartSprint;
pub use unassign::RemoveTasksFromSprint;
