//! In-memory, session-owned stores.
//!
//! # Responsibility
//! - Hold process-local collections that the presentation layer mutates
//!   through explicit store values.
//!
//! # Invariants
//! - Stores start empty unless a seeding constructor is used.
//! - Stores perform no I/O.

pub mod mood_log;
pub mod task_store;
