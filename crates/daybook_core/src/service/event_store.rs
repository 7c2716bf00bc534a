//! Event log use-case service.
//!
//! # Responsibility
//! - Combine record persistence with image file storage.
//! - Provide add/list/tag/delete entry points for the presentation layer.
//!
//! # Invariants
//! - Input is validated before any row or file is written.
//! - A failed image write leaves neither rows nor files behind.
//! - Deletion removes image files best-effort; only failures other than
//!   "already absent" are reported, and they do not block metadata
//!   removal.

use crate::model::event::{
    distinct_tags, EventId, EventRecord, EventValidationError, NewEventRecord,
};
use crate::repo::event_repo::{EventListQuery, EventRepository, RepoError};
use crate::repo::image_dir::{ImageDir, ImageDirError, RemoveOutcome};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for event log use-cases.
#[derive(Debug)]
pub enum EventStoreError {
    /// Spending is negative.
    InvalidAmount(i64),
    /// Attachment filename cannot be stored safely.
    InvalidImageName(String),
    /// Two attachments of one record share an original filename.
    DuplicateImageName(String),
    /// Target record does not exist.
    EventNotFound(EventId),
    /// Image bytes could not be written.
    Image(ImageDirError),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for EventStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidAmount(value) => {
                write!(f, "spending must be a non-negative integer, got {value}")
            }
            Self::InvalidImageName(name) => write!(f, "invalid image filename `{name}`"),
            Self::DuplicateImageName(name) => {
                write!(f, "image filename `{name}` is attached more than once")
            }
            Self::EventNotFound(id) => write!(f, "event record not found: {id}"),
            Self::Image(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for EventStoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Image(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<EventValidationError> for EventStoreError {
    fn from(value: EventValidationError) -> Self {
        match value {
            EventValidationError::InvalidAmount(amount) => Self::InvalidAmount(amount),
            EventValidationError::InvalidImageName(name) => Self::InvalidImageName(name),
            EventValidationError::DuplicateImageName(name) => Self::DuplicateImageName(name),
        }
    }
}

impl From<RepoError> for EventStoreError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::EventNotFound(id),
            RepoError::Validation(err) => err.into(),
            other => Self::Repo(other),
        }
    }
}

impl From<ImageDirError> for EventStoreError {
    fn from(value: ImageDirError) -> Self {
        Self::Image(value)
    }
}

/// One image file that could not be removed during deletion.
#[derive(Debug)]
pub struct ImageCleanupWarning {
    pub filename: String,
    pub error: ImageDirError,
}

/// Outcome of `EventStore::delete_record`.
#[derive(Debug, Default)]
pub struct DeleteReport {
    /// Files that existed and were removed.
    pub removed_files: Vec<String>,
    /// Files that were already gone.
    pub missing_files: Vec<String>,
    /// Files that could not be removed.
    pub warnings: Vec<ImageCleanupWarning>,
}

impl DeleteReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Event log facade over a repository and a content directory.
pub struct EventStore<R: EventRepository> {
    repo: R,
    images: ImageDir,
}

impl<R: EventRepository> EventStore<R> {
    pub fn new(repo: R, images: ImageDir) -> Self {
        Self { repo, images }
    }

    pub fn image_dir(&self) -> &ImageDir {
        &self.images
    }

    /// Stores one record and its attachments; returns the new id.
    ///
    /// # Errors
    /// - `InvalidAmount` when spending is negative.
    /// - `InvalidImageName` when an attachment name has path components.
    /// - `DuplicateImageName` when two attachments share an original name.
    /// - `Image` when an attachment cannot be written; the record is rolled
    ///   back first.
    pub fn add_record(&mut self, record: NewEventRecord) -> Result<EventId, EventStoreError> {
        record.validate()?;

        let created = self.repo.create_event(&record)?;
        let mut written: Vec<&str> = Vec::with_capacity(created.images.len());
        for (stored_name, upload) in created.images.iter().zip(&record.images) {
            if let Err(err) = self.images.write(stored_name, &upload.bytes) {
                error!(
                    "event=event_add module=event_store status=error error_code=image_write_failed event_id={} error={}",
                    created.id, err
                );
                self.roll_back_created(created.id, &written);
                return Err(err.into());
            }
            written.push(stored_name);
        }

        info!(
            "event=event_add module=event_store status=ok event_id={} image_count={}",
            created.id,
            created.images.len()
        );
        Ok(created.id)
    }

    /// Records ordered by date descending, optionally filtered by tag.
    ///
    /// The filter is a substring match on the raw tag string, so `a`
    /// also matches `#ab`. Blank filters are ignored.
    pub fn list_records(
        &self,
        tag_filter: Option<&str>,
    ) -> Result<Vec<EventRecord>, EventStoreError> {
        let tag = tag_filter
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string);
        Ok(self.repo.list_events(&EventListQuery { tag })?)
    }

    pub fn get_record(&self, id: EventId) -> Result<EventRecord, EventStoreError> {
        self.repo
            .get_event(id)?
            .ok_or(EventStoreError::EventNotFound(id))
    }

    /// Every tag token across all records, deduplicated and sorted.
    pub fn list_distinct_tags(&self) -> Result<Vec<String>, EventStoreError> {
        let raw = self.repo.list_raw_tags()?;
        Ok(distinct_tags(raw.iter().map(String::as_str)))
    }

    /// Removes a record, its image rows and its image files.
    ///
    /// # Errors
    /// - `EventNotFound` when no record has `id`; nothing is touched.
    pub fn delete_record(&mut self, id: EventId) -> Result<DeleteReport, EventStoreError> {
        let record = self.get_record(id)?;

        let mut report = DeleteReport::default();
        for filename in record.images {
            match self.images.remove(&filename) {
                Ok(RemoveOutcome::Removed) => report.removed_files.push(filename),
                Ok(RemoveOutcome::AlreadyAbsent) => report.missing_files.push(filename),
                Err(error) => report.warnings.push(ImageCleanupWarning { filename, error }),
            }
        }

        self.repo.delete_event(id)?;

        if report.is_clean() {
            info!(
                "event=event_delete module=event_store status=ok event_id={} removed={} missing={}",
                id,
                report.removed_files.len(),
                report.missing_files.len()
            );
        } else {
            warn!(
                "event=event_delete module=event_store status=partial event_id={} warnings={}",
                id,
                report.warnings.len()
            );
        }
        Ok(report)
    }

    fn roll_back_created(&mut self, id: EventId, written: &[&str]) {
        for stored_name in written {
            if let Err(err) = self.images.remove(stored_name) {
                warn!(
                    "event=event_add_rollback module=event_store status=error error_code=image_remove_failed event_id={} error={}",
                    id, err
                );
            }
        }
        if let Err(err) = self.repo.delete_event(id) {
            error!(
                "event=event_add_rollback module=event_store status=error error_code=metadata_remove_failed event_id={} error={}",
                id, err
            );
        }
    }
}
