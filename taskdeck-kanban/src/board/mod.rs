//! Board commands

mod create;
mod get;

pub use create::CreateBoard;
pub use get::GetBoard;
