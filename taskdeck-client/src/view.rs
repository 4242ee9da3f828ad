//! Board view types
//!
//! The flat, id-indexed shape a client renders from. Task ordering is
//! carried by the position of ids inside each column's `task_ids`; there
//! are no embedded task objects and no duplicated position fields to drift
//! out of sync.

use serde::{Deserialize, Serialize};

/// One column's ordered task ids
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnView {
    pub id: String,
    pub name: String,
    /// Task ids in render order; the index IS the position
    pub task_ids: Vec<String>,
}

impl ColumnView {
    /// Create an empty column view
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            task_ids: Vec::new(),
        }
    }

    /// Create a column view with tasks already in order
    pub fn with_tasks(
        id: impl Into<String>,
        name: impl Into<String>,
        task_ids: Vec<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            task_ids,
        }
    }
}

/// A full board as the client last saw it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardView {
    pub board_id: String,
    /// Columns in board order
    pub columns: Vec<ColumnView>,
}

impl BoardView {
    /// Create a board view
    pub fn new(board_id: impl Into<String>, columns: Vec<ColumnView>) -> Self {
        Self {
            board_id: board_id.into(),
            columns,
        }
    }

    /// Locate a task, returning its column id and position
    pub fn locate(&self, task_id: &str) -> Option<(&str, usize)> {
        self.columns.iter().find_map(|column| {
            column
                .task_ids
                .iter()
                .position(|t| t == task_id)
                .map(|pos| (column.id.as_str(), pos))
        })
    }

    /// Find a column by id
    pub fn column(&self, column_id: &str) -> Option<&ColumnView> {
        self.columns.iter().find(|c| c.id == column_id)
    }

    pub(crate) fn column_mut(&mut self, column_id: &str) -> Option<&mut ColumnView> {
        self.columns.iter_mut().find(|c| c.id == column_id)
    }

    /// Remove a task from whichever column holds it
    pub(crate) fn remove_task(&mut self, task_id: &str) -> bool {
        for column in &mut self.columns {
            if let Some(pos) = column.task_ids.iter().position(|t| t == task_id) {
                column.task_ids.remove(pos);
                return true;
            }
        }
        false
    }

    /// Insert a task into a column, clamping the position to the end
    pub(crate) fn insert_task(&mut self, column_id: &str, position: usize, task_id: String) -> bool {
        match self.column_mut(column_id) {
            Some(column) => {
                let position = position.min(column.task_ids.len());
                column.task_ids.insert(position, task_id);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> BoardView {
        BoardView::new(
            "b1",
            vec![
                ColumnView::with_tasks("todo", "Todo", vec!["x".into(), "y".into()]),
                ColumnView::new("done", "Done"),
            ],
        )
    }

    #[test]
    fn test_locate() {
        let v = view();
        assert_eq!(v.locate("y"), Some(("todo", 1)));
        assert_eq!(v.locate("missing"), None);
    }

    #[test]
    fn test_insert_clamps() {
        let mut v = view();
        assert!(v.insert_task("done", 99, "x".into()));
        assert_eq!(v.column("done").unwrap().task_ids, vec!["x"]);
    }

    #[test]
    fn test_remove_task() {
        let mut v = view();
        assert!(v.remove_task("x"));
        assert!(!v.remove_task("x"));
        assert_eq!(v.column("todo").unwrap().task_ids, vec!["y"]);
    }
}
