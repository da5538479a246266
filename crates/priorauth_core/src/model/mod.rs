//! Domain model for prior-authorization entries.
//!
//! # Responsibility
//! - Define the persisted record and the form draft it is built from.
//! - Keep ordering and id rules in one place for every backend.
//!
//! # Invariants
//! - Every stored record is identified by a unique, never-reused `id`.
//! - Records are only removed by bulk clear.

pub mod authorization;
