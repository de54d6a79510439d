//! Change notifications for the task list.
//!
//! The service publishes after every successful mutation; screens that show
//! tasks subscribe and refresh when something arrives.

use tokio::sync::broadcast;

use crate::domain::task::{TaskId, TaskStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskChange {
    Added(TaskId),
    StatusChanged(TaskId, TaskStatus),
    Deleted(TaskId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TasksChanged {
    pub change: TaskChange,
}

#[derive(Clone)]
pub struct TaskEvents {
    tx: broadcast::Sender<TasksChanged>,
}

impl TaskEvents {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Having no subscribers is fine; the store stays the source of truth.
    pub fn publish(&self, change: TaskChange) {
        let _ = self.tx.send(TasksChanged { change });
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TasksChanged> {
        self.tx.subscribe()
    }
}

impl Default for TaskEvents {
    fn default() -> Self { Self::new(64) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscribers_receive_published_changes() {
        let events = TaskEvents::default();
        let mut rx = events.subscribe();
        events.publish(TaskChange::Deleted(TaskId(4)));
        assert_eq!(rx.try_recv().unwrap().change, TaskChange::Deleted(TaskId(4)));
    }

    #[test]
    fn publish_without_subscribers_is_silent() {
        TaskEvents::new(1).publish(TaskChange::Added(TaskId(1)));
    }
}
