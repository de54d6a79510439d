use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::ValidationError;

/// Due dates are plain calendar dates, no time or zone.
pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(pub i64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
        }
    }

    /// Maps any stored or legacy representation onto one of the three states.
    ///
    /// Absent values and the legacy `completed` flag spellings (`0`/`false`)
    /// become `Pending`; `1`/`true` become `Completed`. Anything unrecognised
    /// also falls back to `Pending`.
    pub fn normalize(raw: Option<&str>) -> Self {
        let Some(raw) = raw else { return TaskStatus::Pending };
        let raw = raw.trim();
        if let Ok(status) = raw.parse::<TaskStatus>() {
            return status;
        }
        match raw.to_ascii_lowercase().as_str() {
            "1" | "true" => TaskStatus::Completed,
            _ => TaskStatus::Pending,
        }
    }

    /// Legacy `completed` column value for this status.
    pub fn completed_flag(&self) -> i64 {
        i64::from(matches!(self, TaskStatus::Completed))
    }
}

impl FromStr for TaskStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TaskStatus::Pending),
            "in_progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            other => Err(ValidationError::InvalidStatus(other.to_string())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// A stored task as read back from the store.
///
/// `due_date` keeps the stored text verbatim; rows written before validation
/// existed may hold anything there.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub due_date: String,
    pub status: TaskStatus,
}

/// Input for a new task that has already passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    title: String,
    description: String,
    due_date: NaiveDate,
}

impl NewTask {
    /// Validates raw form input. Fields are trimmed first.
    pub fn parse(title: &str, description: &str, due_date: &str) -> Result<Self, ValidationError> {
        let title = title.trim();
        let due_date = due_date.trim();
        if title.is_empty() {
            return Err(ValidationError::MissingTitle);
        }
        if due_date.is_empty() {
            return Err(ValidationError::MissingDueDate);
        }
        let due_date = parse_due_date(due_date)
            .ok_or_else(|| ValidationError::InvalidDueDate(due_date.to_string()))?;
        Ok(Self { title: title.to_string(), description: description.trim().to_string(), due_date })
    }

    pub fn title(&self) -> &str { &self.title }
    pub fn description(&self) -> &str { &self.description }
    pub fn due_date(&self) -> NaiveDate { self.due_date }

    pub fn due_date_text(&self) -> String { self.due_date.format(DUE_DATE_FORMAT).to_string() }
}

/// Parses `YYYY-MM-DD`. The year must be exactly four digits; month and day
/// may be one or two.
pub fn parse_due_date(raw: &str) -> Option<NaiveDate> {
    if !has_due_date_shape(raw) {
        return None;
    }
    NaiveDate::parse_from_str(raw, DUE_DATE_FORMAT).ok()
}

fn has_due_date_shape(raw: &str) -> bool {
    let digits = |part: &str, min: usize, max: usize| {
        (min..=max).contains(&part.len()) && part.bytes().all(|b| b.is_ascii_digit())
    };
    let mut parts = raw.split('-');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(year), Some(month), Some(day), None) => digits(year, 4, 4) && digits(month, 1, 2) && digits(day, 1, 2),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_only_canonical_spellings() {
        assert_eq!("in_progress".parse::<TaskStatus>().unwrap(), TaskStatus::InProgress);
        assert_eq!("completed".parse::<TaskStatus>().unwrap(), TaskStatus::Completed);
        assert!(matches!("done".parse::<TaskStatus>(), Err(ValidationError::InvalidStatus(s)) if s == "done"));
    }

    #[test]
    fn normalize_maps_legacy_flags() {
        assert_eq!(TaskStatus::normalize(None), TaskStatus::Pending);
        assert_eq!(TaskStatus::normalize(Some("0")), TaskStatus::Pending);
        assert_eq!(TaskStatus::normalize(Some("1")), TaskStatus::Completed);
        assert_eq!(TaskStatus::normalize(Some("True")), TaskStatus::Completed);
        assert_eq!(TaskStatus::normalize(Some("in_progress")), TaskStatus::InProgress);
        assert_eq!(TaskStatus::normalize(Some("garbage")), TaskStatus::Pending);
    }

    #[test]
    fn new_task_requires_title_and_valid_date() {
        assert_eq!(NewTask::parse("", "d", "2025-01-01"), Err(ValidationError::MissingTitle));
        assert_eq!(NewTask::parse("   ", "d", "2025-01-01"), Err(ValidationError::MissingTitle));
        assert_eq!(NewTask::parse("T", "d", ""), Err(ValidationError::MissingDueDate));
        assert_eq!(
            NewTask::parse("T", "d", "not-a-date"),
            Err(ValidationError::InvalidDueDate("not-a-date".into()))
        );
        assert!(NewTask::parse("T", "", "2025-02-30").is_err());
        for raw in ["-0001-01-01", "+2025-01-01", "99-01-01", "20250-01-01", "2025-001-01"] {
            assert_eq!(NewTask::parse("T", "", raw), Err(ValidationError::InvalidDueDate(raw.into())), "{raw}");
        }
    }

    #[test]
    fn short_month_and_day_are_accepted_and_padded() {
        let task = NewTask::parse("T", "", "2025-1-5").unwrap();
        assert_eq!(task.due_date_text(), "2025-01-05");
        assert_eq!(parse_due_date("0999-12-31"), NaiveDate::from_ymd_opt(999, 12, 31));
    }

    #[test]
    fn new_task_trims_fields() {
        let task = NewTask::parse("  Buy milk ", " two litres ", " 2025-03-04 ").unwrap();
        assert_eq!(task.title(), "Buy milk");
        assert_eq!(task.description(), "two litres");
        assert_eq!(task.due_date_text(), "2025-03-04");
    }
}
