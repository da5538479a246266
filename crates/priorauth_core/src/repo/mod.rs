//! Repository layer: storage-capability contract and its backends.
//!
//! # Responsibility
//! - Define the fallible record persistence interface.
//! - Isolate SQLite and key-value storage details from the store facade.
//!
//! # Invariants
//! - Repositories report failures; converting them to safe defaults is the
//!   store facade's job.

pub mod kv_repo;
pub mod record_repo;
pub mod sqlite_repo;
