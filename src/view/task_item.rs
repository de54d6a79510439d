use chrono::{Local, NaiveDate};

use crate::application::task_service::TaskService;
use crate::domain::error::TaskError;
use crate::domain::repository::TaskRepository;
use crate::domain::task::{parse_due_date, Task, TaskId, TaskStatus};

/// Read-only snapshot of one task for the list screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskViewModel {
    id: TaskId,
    title: String,
    due_date: String,
    status: TaskStatus,
}

impl TaskViewModel {
    /// `status` may be absent or in any legacy spelling; it is normalized.
    pub fn new(id: TaskId, title: impl Into<String>, due_date: impl Into<String>, status: Option<&str>) -> Self {
        Self { id, title: title.into(), due_date: due_date.into(), status: TaskStatus::normalize(status) }
    }

    pub fn id(&self) -> TaskId { self.id }
    pub fn title(&self) -> &str { &self.title }
    pub fn due_date(&self) -> &str { &self.due_date }
    pub fn status(&self) -> TaskStatus { self.status }

    /// True when the due date lies strictly before today (local calendar).
    ///
    /// Fails open: an empty or unparseable due date is never overdue. Status
    /// is not consulted, so completed tasks can still report overdue.
    pub fn is_overdue(&self) -> bool { self.is_overdue_on(Local::now().date_naive()) }

    pub fn is_overdue_on(&self, today: NaiveDate) -> bool {
        match parse_due_date(self.due_date.trim()) {
            Some(due) => due < today,
            None => false,
        }
    }

    /// Asks the store to change this task's status. The snapshot itself is
    /// left as is; the list is rebuilt from the change notification.
    pub async fn request_status_change<R: TaskRepository>(&self, service: &TaskService<R>, new_status: &str) -> Result<(), TaskError> {
        service.set_status_str(self.id, new_status).await
    }

    pub async fn request_delete<R: TaskRepository>(&self, service: &TaskService<R>) -> Result<bool, TaskError> {
        service.delete(self.id).await
    }
}

impl From<Task> for TaskViewModel {
    fn from(task: Task) -> Self {
        Self { id: task.id, title: task.title, due_date: task.due_date, status: task.status }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate { NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap() }

    #[test]
    fn status_defaults_to_pending() {
        assert_eq!(TaskViewModel::new(TaskId(1), "T", "", None).status(), TaskStatus::Pending);
        assert_eq!(TaskViewModel::new(TaskId(1), "T", "", Some("1")).status(), TaskStatus::Completed);
        assert_eq!(TaskViewModel::new(TaskId(1), "T", "", Some("false")).status(), TaskStatus::Pending);
    }

    #[test]
    fn overdue_compares_dates_only() {
        let today = date("2025-06-15");
        assert!(TaskViewModel::new(TaskId(1), "T", "2025-06-14", None).is_overdue_on(today));
        assert!(!TaskViewModel::new(TaskId(1), "T", "2025-06-15", None).is_overdue_on(today));
        assert!(!TaskViewModel::new(TaskId(1), "T", "2025-06-16", None).is_overdue_on(today));
    }

    #[test]
    fn overdue_fails_open_on_bad_dates() {
        assert!(!TaskViewModel::new(TaskId(1), "T", "", None).is_overdue());
        assert!(!TaskViewModel::new(TaskId(1), "T", "tomorrow", None).is_overdue());
        assert!(!TaskViewModel::new(TaskId(1), "T", "2000-13-01", None).is_overdue());
    }

    #[test]
    fn old_dates_are_overdue_regardless_of_status() {
        assert!(TaskViewModel::new(TaskId(1), "T", "2000-01-01", None).is_overdue());
        assert!(TaskViewModel::new(TaskId(1), "T", "2000-01-01", Some("completed")).is_overdue());
    }
}
