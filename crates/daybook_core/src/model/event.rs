//! Offline event log domain model.
//!
//! # Responsibility
//! - Define venue-visit records and their image attachments.
//! - Own tag parsing and stored image naming rules.
//!
//! # Invariants
//! - `spending` is never negative.
//! - Stored image names are `{event_id}_{original_name}`.
//! - Tags are persisted as one raw whitespace-delimited string.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned, monotonically increasing record identifier.
pub type EventId = i64;

/// How long the visit involved waiting. Stored as its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitTime {
    None,
    Under15Min,
    Under30Min,
    Under1Hour,
    Over1Hour,
}

impl WaitTime {
    pub const ALL: [WaitTime; 5] = [
        WaitTime::None,
        WaitTime::Under15Min,
        WaitTime::Under30Min,
        WaitTime::Under1Hour,
        WaitTime::Over1Hour,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::None => "なし",
            Self::Under15Min => "15分未満",
            Self::Under30Min => "30分未満",
            Self::Under1Hour => "1時間未満",
            Self::Over1Hour => "1時間以上",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|option| option.label() == value)
    }
}

impl Display for WaitTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One uploaded image as handed over by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub original_name: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(original_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            original_name: original_name.into(),
            bytes: bytes.into(),
        }
    }
}

/// Input for creating one event record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEventRecord {
    pub date: NaiveDate,
    pub venue: String,
    pub companion: String,
    pub spending: i64,
    pub items: String,
    pub tags: String,
    pub wait_time: WaitTime,
    pub notes: String,
    /// Attachments in upload order.
    pub images: Vec<ImageUpload>,
}

impl NewEventRecord {
    /// Creates a record input with empty text fields and no images.
    pub fn new(date: NaiveDate, spending: i64) -> Self {
        Self {
            date,
            venue: String::new(),
            companion: String::new(),
            spending,
            items: String::new(),
            tags: String::new(),
            wait_time: WaitTime::None,
            notes: String::new(),
            images: Vec::new(),
        }
    }

    /// Checks record-level constraints before anything is written.
    pub fn validate(&self) -> Result<(), EventValidationError> {
        if self.spending < 0 {
            return Err(EventValidationError::InvalidAmount(self.spending));
        }
        let mut seen = HashSet::with_capacity(self.images.len());
        for image in &self.images {
            validate_image_name(&image.original_name)?;
            if !seen.insert(image.original_name.as_str()) {
                return Err(EventValidationError::DuplicateImageName(
                    image.original_name.clone(),
                ));
            }
        }
        Ok(())
    }
}

/// Persisted event record with its owned image filenames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: EventId,
    pub date: NaiveDate,
    pub venue: String,
    pub companion: String,
    pub spending: i64,
    pub items: String,
    /// Raw tag string exactly as entered.
    pub tags: String,
    pub wait_time: WaitTime,
    pub notes: String,
    /// Stored filenames in upload order.
    pub images: Vec<String>,
}

impl EventRecord {
    /// Tag tokens parsed from the raw tag string.
    pub fn tag_list(&self) -> Vec<&str> {
        parse_tags(&self.tags)
    }
}

/// Validation failures for event input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventValidationError {
    /// Spending is negative.
    InvalidAmount(i64),
    /// Original filename is empty or would escape the content directory.
    InvalidImageName(String),
    /// Two attachments of one record share an original filename.
    DuplicateImageName(String),
}

impl Display for EventValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidAmount(value) => {
                write!(f, "spending must be a non-negative integer, got {value}")
            }
            Self::InvalidImageName(value) => write!(f, "invalid image filename `{value}`"),
            Self::DuplicateImageName(value) => {
                write!(f, "image filename `{value}` is attached more than once")
            }
        }
    }
}

impl Error for EventValidationError {}

/// Splits a raw tag string on whitespace.
pub fn parse_tags(raw: &str) -> Vec<&str> {
    raw.split_whitespace().collect()
}

/// Flattens raw tag strings into a sorted, deduplicated tag list.
pub fn distinct_tags<'a>(raw_tags: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut unique = BTreeSet::new();
    for raw in raw_tags {
        for tag in parse_tags(raw) {
            unique.insert(tag.to_string());
        }
    }
    unique.into_iter().collect()
}

/// Storage filename for an attachment of `event_id`.
pub fn stored_image_name(event_id: EventId, original_name: &str) -> String {
    format!("{event_id}_{original_name}")
}

/// Rejects names that are empty or carry path components.
pub fn validate_image_name(original_name: &str) -> Result<(), EventValidationError> {
    let trimmed = original_name.trim();
    let has_separator = original_name.contains(['/', '\\']);
    if trimmed.is_empty() || has_separator || trimmed == "." || trimmed == ".." {
        return Err(EventValidationError::InvalidImageName(
            original_name.to_string(),
        ));
    }
    Ok(())
}
