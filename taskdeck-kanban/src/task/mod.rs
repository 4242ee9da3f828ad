//! Task operations
//!
//! Tasks live inside columns at dense zero-based positions. Every operation
//! that touches a position runs under the board lock and leaves the affected
//! columns dense again before releasing it.

mod add;
mod delete;
mod mv;
mod update;

pub use add::AddTask;
pub use delete::DeleteTask;
pub use mv::MoveTask;
pub use update::UpdateTask;
