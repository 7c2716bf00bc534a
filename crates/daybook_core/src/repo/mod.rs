//! Persistence for the event log.
//!
//! # Responsibility
//! - Define data access contracts for event records.
//! - Isolate SQLite queries and content-directory file I/O from the
//!   orchestrating service.
//!
//! # Invariants
//! - Repository writes enforce `NewEventRecord::validate()` first.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod event_repo;
pub mod image_dir;
