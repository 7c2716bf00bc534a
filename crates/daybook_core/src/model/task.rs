//! To-do task domain model.
//!
//! # Responsibility
//! - Define the task record held by `TaskStore`.
//! - Own deadline time validation (24-hour `HH:MM`).
//!
//! # Invariants
//! - `id` is stable and never reused for another task.
//! - `deadline` is only built from a time string accepted by
//!   `parse_deadline_time`.
//! - `memo` is `None` rather than an empty string.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Accepts `H:MM` and `HH:MM` on a 24-hour clock. ASCII digits only.
static DEADLINE_TIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([01]?[0-9]|2[0-3]):([0-5][0-9])$").expect("valid deadline time regex")
});

/// Stable identifier for one task inside a store.
pub type TaskId = Uuid;

/// Task priority selected by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    /// All priorities in ascending order, as offered by the entry form.
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    /// Display label used by the presentation layer.
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "低",
            Self::Medium => "中",
            Self::High => "高",
        }
    }

    /// Parses either the display label or the snake_case name.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "低" | "low" => Some(Self::Low),
            "中" | "medium" => Some(Self::Medium),
            "高" | "high" => Some(Self::High),
            _ => None,
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Reference to an image attachment whose bytes live outside the store.
///
/// The store never reads or writes the referenced content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Combined calendar date and time-of-day a task is due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Deadline(NaiveDateTime);

impl Deadline {
    /// Validates `time` and combines it with `date`.
    pub fn from_parts(date: NaiveDate, time: &str) -> Result<Self, TaskValidationError> {
        let time = parse_deadline_time(time)?;
        Ok(Self(date.and_time(time)))
    }

    pub fn date(&self) -> NaiveDate {
        self.0.date()
    }

    pub fn time(&self) -> NaiveTime {
        self.0.time()
    }

    pub fn as_datetime(&self) -> NaiveDateTime {
        self.0
    }
}

impl Display for Deadline {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M"))
    }
}

/// Validation failures raised while building task fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Task text is empty or whitespace only.
    EmptyText,
    /// Time string is not a 24-hour `HH:MM` value.
    InvalidTime(String),
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "task text cannot be empty"),
            Self::InvalidTime(value) => {
                write!(f, "invalid deadline time `{value}`; expected HH:MM (24-hour)")
            }
        }
    }
}

impl Error for TaskValidationError {}

/// Parses a 24-hour `HH:MM` (or `H:MM`) string into a time of day.
///
/// # Errors
/// - Returns `InvalidTime` for anything outside `00:00..=23:59`, including
///   single-digit minutes (`9:5`) and surrounding whitespace.
pub fn parse_deadline_time(value: &str) -> Result<NaiveTime, TaskValidationError> {
    let invalid = || TaskValidationError::InvalidTime(value.to_string());
    let caps = DEADLINE_TIME_RE.captures(value).ok_or_else(invalid)?;
    let hour = caps[1].parse::<u32>().map_err(|_| invalid())?;
    let minute = caps[2].parse::<u32>().map_err(|_| invalid())?;
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(invalid)
}

/// One to-do entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    pub done: bool,
    pub priority: Priority,
    pub deadline: Deadline,
    /// Name of a category present in the owning store.
    pub category: String,
    pub memo: Option<String>,
    pub image: Option<ImageRef>,
}

impl Task {
    /// Builds a not-yet-done task with a generated id.
    ///
    /// Category membership is checked by the store, not here.
    pub fn new(
        text: impl Into<String>,
        priority: Priority,
        deadline: Deadline,
        category: impl Into<String>,
    ) -> Result<Self, TaskValidationError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(TaskValidationError::EmptyText);
        }

        Ok(Self {
            id: Uuid::new_v4(),
            text,
            done: false,
            priority,
            deadline,
            category: category.into(),
            memo: None,
            image: None,
        })
    }

    /// Sets the memo, dropping blank values.
    pub fn with_memo(mut self, memo: Option<String>) -> Self {
        self.memo = memo.filter(|value| !value.trim().is_empty());
        self
    }

    pub fn with_image(mut self, image: Option<ImageRef>) -> Self {
        self.image = image;
        self
    }
}
