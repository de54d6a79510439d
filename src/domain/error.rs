use thiserror::Error;

use super::task::TaskId;

/// Rejected user input. Never reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Title and date are required!")]
    MissingTitle,
    #[error("Title and date are required!")]
    MissingDueDate,
    #[error("Invalid date format. Use YYYY-MM-DD")]
    InvalidDueDate(String),
    #[error("Invalid status '{0}'. Use pending, in_progress or completed")]
    InvalidStatus(String),
}

#[derive(Debug, Error)]
pub enum TaskError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("task {0} not found")]
    NotFound(TaskId),

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

impl TaskError {
    pub fn is_not_found(&self) -> bool { matches!(self, TaskError::NotFound(_)) }

    pub fn is_storage(&self) -> bool { matches!(self, TaskError::Storage(_)) }
}
