//! Domain models for tasks, event records and mood entries.
//!
//! # Responsibility
//! - Define canonical data structures used by stores and services.
//! - Keep field-level validation next to the types it protects.
//!
//! # Invariants
//! - Models never perform I/O.

pub mod event;
pub mod mood;
pub mod task;
