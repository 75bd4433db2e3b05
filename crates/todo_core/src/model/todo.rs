//! Todo domain model.
//!
//! # Invariants
//! - `id` is `None` until the store assigns one, then stable for the record lifetime.
//! - `created_at` is fixed at construction and never rewritten.
//! - Title trimming/non-empty checks belong to the add use case, not to this type.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Store-assigned identity of a persisted todo.
pub type TodoId = i64;

/// A titled task with an optional description and a completion flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    /// Absent before persistence.
    pub id: Option<TodoId>,
    pub title: String,
    /// Free text, may be empty.
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_completed: bool,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

impl Todo {
    /// Creates an unsaved, not-completed todo stamped with the current time.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            description: description.into(),
            is_completed: false,
            created_at: now_epoch_ms(),
        }
    }

    /// Returns a copy carrying the given store identity.
    pub fn with_id(mut self, id: TodoId) -> Self {
        self.id = Some(id);
        self
    }

    /// Returns a copy with `is_completed` inverted; identity and timestamp are kept.
    pub fn toggled(&self) -> Self {
        Self {
            is_completed: !self.is_completed,
            ..self.clone()
        }
    }
}

/// Current wall-clock time in Unix epoch milliseconds.
///
/// Falls back to `0` when the system clock is set before the epoch.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::Todo;

    #[test]
    fn new_todo_is_unsaved_and_open() {
        let todo = Todo::new("Buy milk", "2%");
        assert_eq!(todo.id, None);
        assert!(!todo.is_completed);
        assert!(todo.created_at > 0);
    }

    #[test]
    fn toggled_keeps_identity_and_timestamp() {
        let todo = Todo::new("Buy milk", "").with_id(7);
        let toggled = todo.toggled();
        assert_eq!(toggled.id, Some(7));
        assert_eq!(toggled.created_at, todo.created_at);
        assert!(toggled.is_completed);
        assert_eq!(toggled.toggled(), todo);
    }
}
