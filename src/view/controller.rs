use std::time::{Duration, Instant};

use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{debug, error, info};

use super::add_screen::{AddTaskScreen, FormState};
use super::list_screen::ListScreen;
use crate::application::events::TasksChanged;
use crate::application::task_service::TaskService;
use crate::domain::error::TaskError;
use crate::domain::repository::TaskRepository;
use crate::domain::task::TaskId;

pub const GENERIC_FAILURE: &str = "Something went wrong. Your tasks were not changed.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    List,
    AddTask,
}

/// Discrete events the rendering layer feeds in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    ScreenEntered(Screen),
    SubmitPressed,
    StatusChanged { id: TaskId, value: String },
    DeletePressed(TaskId),
}

/// Binds store operations to UI events and owns both screens' state.
pub struct ScreenController<R: TaskRepository> {
    service: TaskService<R>,
    changes: broadcast::Receiver<TasksChanged>,
    current: Screen,
    list: ListScreen,
    add: AddTaskScreen,
    notice: Option<String>,
    failure: Option<String>,
}

impl<R: TaskRepository> ScreenController<R> {
    pub fn new(service: TaskService<R>, error_display: Duration) -> Self {
        let changes = service.subscribe();
        Self {
            service,
            changes,
            current: Screen::List,
            list: ListScreen::default(),
            add: AddTaskScreen::new(error_display),
            notice: None,
            failure: None,
        }
    }

    pub fn current_screen(&self) -> Screen { self.current }
    pub fn list(&self) -> &ListScreen { &self.list }
    pub fn add_screen(&self) -> &AddTaskScreen { &self.add }
    pub fn add_screen_mut(&mut self) -> &mut AddTaskScreen { &mut self.add }
    pub fn service(&self) -> &TaskService<R> { &self.service }

    /// Informational message for no-op actions, e.g. an id that is gone.
    pub fn notice(&self) -> Option<&str> { self.notice.as_deref() }

    /// Set when the store failed; prior list contents are kept.
    pub fn last_failure(&self) -> Option<&str> { self.failure.as_deref() }

    pub async fn handle(&mut self, event: UiEvent, now: Instant) {
        debug!(?event, "ui event");
        self.notice = None;
        self.failure = None;
        match event {
            UiEvent::ScreenEntered(Screen::List) => self.enter_list().await,
            UiEvent::ScreenEntered(Screen::AddTask) => self.current = Screen::AddTask,
            UiEvent::SubmitPressed => self.submit(now).await,
            UiEvent::StatusChanged { id, value } => {
                let result = match self.list.find(id) {
                    Some(item) => item.request_status_change(&self.service, &value).await,
                    None => self.service.set_status_str(id, &value).await,
                };
                if let Err(err) = result {
                    self.report(err, now);
                }
            }
            UiEvent::DeletePressed(id) => {
                let result = match self.list.find(id) {
                    Some(item) => item.request_delete(&self.service).await,
                    None => self.service.delete(id).await,
                };
                match result {
                    Ok(true) => {}
                    Ok(false) => self.notice = Some(format!("Task {id} no longer exists")),
                    Err(err) => self.report(err, now),
                }
            }
        }
        if self.drain_changes() {
            self.refresh().await;
        }
    }

    /// Expires the add form's error message.
    pub fn tick(&mut self, now: Instant) { self.add.tick(now); }

    pub async fn shutdown(self) { self.service.close().await; }

    async fn enter_list(&mut self) {
        self.current = Screen::List;
        self.refresh().await;
    }

    async fn submit(&mut self, now: Instant) {
        let input = match self.add.validate() {
            Ok(input) => input,
            Err(err) => {
                debug!(%err, "add form rejected");
                self.add.show_error(err.to_string(), now);
                return;
            }
        };
        self.add.begin_submit();
        match self.service.add_validated(input).await {
            Ok(id) => {
                info!(%id, "task created");
                self.add.finish_submit();
                self.enter_list().await;
            }
            Err(err) => self.report(err, now),
        }
    }

    async fn refresh(&mut self) {
        self.drain_changes();
        match self.service.list_all().await {
            Ok(tasks) => self.list.rebuild(tasks),
            Err(err) => self.report(err, Instant::now()),
        }
    }

    fn drain_changes(&mut self) -> bool {
        let mut changed = false;
        loop {
            match self.changes.try_recv() {
                Ok(_) | Err(TryRecvError::Lagged(_)) => changed = true,
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return changed,
            }
        }
    }

    fn report(&mut self, err: TaskError, now: Instant) {
        match err {
            TaskError::Validation(err) => {
                debug!(%err, "rejected input");
                match self.current {
                    Screen::AddTask => self.add.show_error(err.to_string(), now),
                    Screen::List => self.notice = Some(err.to_string()),
                }
            }
            TaskError::NotFound(id) => {
                info!(%id, "ignored action on missing task");
                self.notice = Some(format!("Task {id} no longer exists"));
            }
            TaskError::Storage(err) => {
                error!(%err, "task store failure");
                self.failure = Some(GENERIC_FAILURE.to_string());
                if self.current == Screen::AddTask || self.add.state() == FormState::Submitting {
                    self.add.show_error(GENERIC_FAILURE, now);
                }
            }
        }
    }
}
