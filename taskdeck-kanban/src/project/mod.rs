//! Project commands

mod create;
mod update;

pub use create::CreateProject;
pub use update::UpdateProject;
