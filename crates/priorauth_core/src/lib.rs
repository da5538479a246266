//! Prior-authorization entry core.
//!
//! Records insurance prior-authorization decisions and serves the history
//! of past entries from a durable record store.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, StoreBackend, StoreConfig};
pub use logging::{
    default_log_level, init_logging, init_logging_from_config, logging_status, LoggingError,
};
pub use model::authorization::{
    format_timestamp, new_record_id, parse_timestamp, sort_newest_first, ApprovalStatus,
    AuthorizationRecord, Decision, DraftField, DraftRecord, DraftValidationError,
};
pub use repo::kv_repo::{
    FileKeyValueStorage, KeyValueStorage, KvRecordRepository, MemoryKeyValueStorage,
    StorageError,
};
pub use repo::record_repo::{RecordRepository, RepoError, RepoResult};
pub use repo::sqlite_repo::SqliteRecordRepository;
pub use service::entry_service::{EntryService, SubmitOutcome, SAVE_SUCCESS_MESSAGE};
pub use service::history::{HistoryRow, HistoryView, EMPTY_HISTORY_MESSAGE};
pub use service::record_store::{open_record_store, RecordStore};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
