use async_trait::async_trait;

use super::error::TaskError;
use super::task::{NewTask, Task, TaskId, TaskStatus};

/// Durable storage for tasks.
///
/// Implementations own their connection; callers release it with `close`.
#[async_trait]
pub trait TaskRepository: Send + Sync + 'static {
    /// Creates the schema if needed. Safe to call on an existing store.
    async fn init(&self) -> Result<(), TaskError>;
    async fn add(&self, input: NewTask) -> Result<TaskId, TaskError>;
    async fn get(&self, id: TaskId) -> Result<Option<Task>, TaskError>;
    /// Every task, oldest first.
    async fn list_all(&self) -> Result<Vec<Task>, TaskError>;
    /// Fails with `TaskError::NotFound` when no task has this id.
    async fn set_status(&self, id: TaskId, status: TaskStatus) -> Result<(), TaskError>;
    /// Returns whether a task was removed.
    async fn delete(&self, id: TaskId) -> Result<bool, TaskError>;
    async fn close(&self);

    async fn mark_complete(&self, id: TaskId) -> Result<(), TaskError> {
        self.set_status(id, TaskStatus::Completed).await
    }
}
