use std::time::{Duration, Instant};

use crate::domain::error::ValidationError;
use crate::domain::task::NewTask;

pub const DEFAULT_ERROR_DISPLAY: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Editing,
    Submitting,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ErrorBanner {
    message: String,
    expires_at: Instant,
}

/// Bound fields, submit state and the single error slot of the add form.
#[derive(Debug)]
pub struct AddTaskScreen {
    pub title: String,
    pub description: String,
    pub due_date: String,
    state: FormState,
    error: Option<ErrorBanner>,
    error_display: Duration,
}

impl AddTaskScreen {
    pub fn new(error_display: Duration) -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            due_date: String::new(),
            state: FormState::Editing,
            error: None,
            error_display,
        }
    }

    pub fn state(&self) -> FormState { self.state }

    pub fn error_message(&self) -> Option<&str> { self.error.as_ref().map(|e| e.message.as_str()) }

    pub(crate) fn validate(&self) -> Result<NewTask, ValidationError> {
        NewTask::parse(&self.title, &self.description, &self.due_date)
    }

    pub(crate) fn begin_submit(&mut self) { self.state = FormState::Submitting; }

    pub(crate) fn finish_submit(&mut self) {
        self.reset();
        self.error = None;
        self.state = FormState::Editing;
    }

    /// Replaces any visible error; the previous one's expiry no longer applies.
    pub fn show_error(&mut self, message: impl Into<String>, now: Instant) {
        self.error = Some(ErrorBanner { message: message.into(), expires_at: now + self.error_display });
        self.state = FormState::Error;
    }

    /// Clears the error once its display time has passed.
    pub fn tick(&mut self, now: Instant) {
        if self.error.as_ref().is_some_and(|e| now >= e.expires_at) {
            self.error = None;
            if self.state == FormState::Error {
                self.state = FormState::Editing;
            }
        }
    }

    pub fn reset(&mut self) {
        self.title.clear();
        self.description.clear();
        self.due_date.clear();
    }
}

impl Default for AddTaskScreen {
    fn default() -> Self { Self::new(DEFAULT_ERROR_DISPLAY) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_clears_after_display_time() {
        let start = Instant::now();
        let mut screen = AddTaskScreen::default();
        screen.show_error("boom", start);
        screen.tick(start + Duration::from_secs(2));
        assert_eq!(screen.error_message(), Some("boom"));
        screen.tick(start + Duration::from_secs(3));
        assert_eq!(screen.error_message(), None);
        assert_eq!(screen.state(), FormState::Editing);
    }

    #[test]
    fn newer_error_replaces_older_and_keeps_its_own_deadline() {
        let start = Instant::now();
        let mut screen = AddTaskScreen::default();
        screen.show_error("first", start);
        screen.show_error("second", start + Duration::from_secs(2));
        screen.tick(start + Duration::from_secs(3));
        assert_eq!(screen.error_message(), Some("second"));
        screen.tick(start + Duration::from_secs(5));
        assert_eq!(screen.error_message(), None);
    }

    #[test]
    fn fields_stay_editable_while_error_is_shown() {
        let mut screen = AddTaskScreen::default();
        screen.show_error("Title and date are required!", Instant::now());
        screen.title.push_str("Write report");
        assert_eq!(screen.title, "Write report");
        assert_eq!(screen.state(), FormState::Error);
    }
}
