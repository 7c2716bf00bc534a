//! Core domain logic for Daybook.
//! This crate is the single source of truth for store invariants; form
//! rendering and uploads live in the presentation layer that calls it.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use config::DaybookConfig;
pub use logging::{
    default_log_level, init_logging, init_logging_from_config, logging_status, LoggingError,
};
pub use model::event::{
    EventId, EventRecord, EventValidationError, ImageUpload, NewEventRecord, WaitTime,
};
pub use model::mood::Mood;
pub use model::task::{
    parse_deadline_time, Deadline, ImageRef, Priority, Task, TaskId, TaskValidationError,
};
pub use repo::event_repo::{
    EventListQuery, EventRepository, RepoError, RepoResult, SqliteEventRepository,
};
pub use repo::image_dir::{ImageDir, ImageDirError, RemoveOutcome};
pub use service::event_store::{DeleteReport, EventStore, EventStoreError, ImageCleanupWarning};
pub use store::mood_log::{MoodCounts, MoodLog};
pub use store::task_store::{
    CategoryFilter, NewTask, TaskProgress, TaskStore, TaskStoreError, TaskStoreResult,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
