//! Use-case services over the record repositories.
//!
//! # Responsibility
//! - Provide the fail-soft record store facade.
//! - Orchestrate draft submission and the history projection.

pub mod entry_service;
pub mod history;
pub mod record_store;
