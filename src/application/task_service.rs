use tokio::sync::broadcast;
use tracing::{debug, info};

use super::events::{TaskChange, TaskEvents, TasksChanged};
use crate::domain::error::TaskError;
use crate::domain::repository::TaskRepository;
use crate::domain::task::{NewTask, Task, TaskId, TaskStatus};

/// Validates input, delegates to the store and announces changes.
pub struct TaskService<R: TaskRepository> {
    repo: R,
    events: TaskEvents,
}

impl<R: TaskRepository> TaskService<R> {
    pub fn new(repo: R) -> Self { Self::with_events(repo, TaskEvents::default()) }

    pub fn with_events(repo: R, events: TaskEvents) -> Self { Self { repo, events } }

    pub fn subscribe(&self) -> broadcast::Receiver<TasksChanged> { self.events.subscribe() }

    /// Validates the raw fields before anything touches the store.
    pub async fn add(&self, title: &str, description: &str, due_date: &str) -> Result<TaskId, TaskError> {
        let input = NewTask::parse(title, description, due_date).inspect_err(|err| debug!(%err, "rejected new task"))?;
        self.add_validated(input).await
    }

    pub async fn add_validated(&self, input: NewTask) -> Result<TaskId, TaskError> {
        let id = self.repo.add(input).await?;
        self.events.publish(TaskChange::Added(id));
        Ok(id)
    }

    pub async fn get(&self, id: TaskId) -> Result<Option<Task>, TaskError> { self.repo.get(id).await }

    pub async fn list_all(&self) -> Result<Vec<Task>, TaskError> { self.repo.list_all().await }

    pub async fn set_status(&self, id: TaskId, status: TaskStatus) -> Result<(), TaskError> {
        self.repo.set_status(id, status).await?;
        self.events.publish(TaskChange::StatusChanged(id, status));
        Ok(())
    }

    /// Accepts the status as text, the way the UI reports it.
    pub async fn set_status_str(&self, id: TaskId, status: &str) -> Result<(), TaskError> {
        let status: TaskStatus = status.trim().parse()?;
        self.set_status(id, status).await
    }

    pub async fn mark_complete(&self, id: TaskId) -> Result<(), TaskError> {
        self.repo.mark_complete(id).await?;
        self.events.publish(TaskChange::StatusChanged(id, TaskStatus::Completed));
        Ok(())
    }

    /// Deleting an unknown id is a no-op reported as `Ok(false)`.
    pub async fn delete(&self, id: TaskId) -> Result<bool, TaskError> {
        let deleted = self.repo.delete(id).await?;
        if deleted {
            self.events.publish(TaskChange::Deleted(id));
        } else {
            info!(%id, "delete ignored, task does not exist");
        }
        Ok(deleted)
    }

    pub async fn close(&self) { self.repo.close().await }
}
