//! Domain error taxonomy surfaced to use cases and the view state holder.

use crate::store::todo_store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub type TodoResult<T> = Result<T, TodoError>;

/// Failure of a todo operation.
///
/// Cloneable so one storage failure can be fanned out to every live subscriber.
#[derive(Debug, Clone)]
pub enum TodoError {
    /// Input rejected by a use case before reaching storage.
    Validation(String),
    /// Any underlying persistence failure.
    Storage(Arc<StoreError>),
}

impl TodoError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl Display for TodoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(message) => write!(f, "{message}"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TodoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(_) => None,
            Self::Storage(err) => Some(err.as_ref()),
        }
    }
}

impl From<StoreError> for TodoError {
    fn from(value: StoreError) -> Self {
        Self::Storage(Arc::new(value))
    }
}
