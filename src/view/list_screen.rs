use crate::domain::task::{Task, TaskId};

use super::task_item::TaskViewModel;

pub const EMPTY_PLACEHOLDER: &str = "No tasks found. Add a new task!";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ListState {
    #[default]
    Empty,
    Populated(Vec<TaskViewModel>),
}

/// The task list. Rebuilt wholesale from the store on every refresh.
#[derive(Debug, Default)]
pub struct ListScreen {
    state: ListState,
}

impl ListScreen {
    pub fn state(&self) -> &ListState { &self.state }

    pub fn items(&self) -> &[TaskViewModel] {
        match &self.state {
            ListState::Empty => &[],
            ListState::Populated(items) => items.as_slice(),
        }
    }

    pub fn placeholder(&self) -> Option<&'static str> {
        matches!(self.state, ListState::Empty).then_some(EMPTY_PLACEHOLDER)
    }

    pub fn find(&self, id: TaskId) -> Option<&TaskViewModel> {
        self.items().iter().find(|item| item.id() == id)
    }

    pub(crate) fn rebuild(&mut self, tasks: Vec<Task>) {
        self.state = if tasks.is_empty() {
            ListState::Empty
        } else {
            ListState::Populated(tasks.into_iter().map(TaskViewModel::from).collect())
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::task::TaskStatus;

    #[test]
    fn empty_list_shows_placeholder() {
        let mut screen = ListScreen::default();
        screen.rebuild(vec![]);
        assert_eq!(screen.placeholder(), Some(EMPTY_PLACEHOLDER));
        assert!(screen.items().is_empty());
    }

    #[test]
    fn rebuild_keeps_store_order() {
        let mut screen = ListScreen::default();
        let task = |id, title: &str| Task { id: TaskId(id), title: title.into(), description: String::new(), due_date: "2025-01-01".into(), status: TaskStatus::Pending };
        screen.rebuild(vec![task(1, "a"), task(2, "b")]);
        assert_eq!(screen.placeholder(), None);
        let titles: Vec<_> = screen.items().iter().map(|i| i.title()).collect();
        assert_eq!(titles, ["a", "b"]);
        assert_eq!(screen.find(TaskId(2)).map(|i| i.title()), Some("b"));
    }
}
