//! Typed entity identifiers (ULID-backed)

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Generate a fresh ULID-based id
            pub fn new() -> Self {
                Self(ulid::Ulid::new().to_string())
            }

            /// Wrap an existing id string (e.g. restored from a filename)
            pub fn from_string(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            /// The id as a string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

id_type!(
    /// Identifies a project
    ProjectId
);
id_type!(
    /// Identifies a board within a project
    BoardId
);
id_type!(
    /// Identifies a column within a board
    ColumnId
);
id_type!(
    /// Identifies a task
    TaskId
);
id_type!(
    /// Identifies a sprint
    SprintId
);
id_type!(
    /// Identifies a user or agent acting on the board
    ActorId
);
id_type!(
    /// Identifies a label attachable to tasks
    LabelId
);
id_type!(
    /// Identifies a task move event
    EventId
);
