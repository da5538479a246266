//! Fail-soft record store facade.
//!
//! # Responsibility
//! - Expose list/save/clear over any `RecordRepository`.
//! - Catch, log and replace storage failures with safe defaults.
//!
//! # Invariants
//! - No storage error ever reaches the caller.
//! - `save` always answers with a fresh `list()`, so a failed write returns
//!   the collection as it was before the call.
//! - Log events carry ids and counts only, never record contents.

use crate::config::{ConfigError, StoreBackend, StoreConfig};
use crate::model::authorization::AuthorizationRecord;
use crate::repo::kv_repo::{FileKeyValueStorage, KvRecordRepository, MemoryKeyValueStorage};
use crate::repo::record_repo::RecordRepository;
use crate::repo::sqlite_repo::SqliteRecordRepository;
use log::{error, info, warn};
use std::time::Instant;

/// Record store over a repository selected at composition time.
pub struct RecordStore<R: RecordRepository> {
    repo: R,
}

impl<R: RecordRepository> RecordStore<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Returns every stored record, newest first.
    ///
    /// Yields an empty list when storage is unavailable or unreadable.
    pub fn list(&self) -> Vec<AuthorizationRecord> {
        let started_at = Instant::now();
        match self.repo.list_records() {
            Ok(records) => {
                info!(
                    "event=records_list module=store status=ok backend={} count={} duration_ms={}",
                    self.repo.backend_name(),
                    records.len(),
                    started_at.elapsed().as_millis()
                );
                records
            }
            Err(err) => {
                error!(
                    "event=records_list module=store status=error backend={} duration_ms={} error_code={} error={}",
                    self.repo.backend_name(),
                    started_at.elapsed().as_millis(),
                    err.code(),
                    err
                );
                Vec::new()
            }
        }
    }

    /// Upserts `record` by id and returns the refreshed collection.
    ///
    /// On write failure the error is logged and the current (unchanged)
    /// collection is returned.
    pub fn save(&self, record: &AuthorizationRecord) -> Vec<AuthorizationRecord> {
        let started_at = Instant::now();
        match self.repo.put_record(record) {
            Ok(()) => info!(
                "event=record_save module=store status=ok backend={} record_id={} duration_ms={}",
                self.repo.backend_name(),
                record.id,
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=record_save module=store status=error backend={} record_id={} duration_ms={} error_code={} error={}",
                self.repo.backend_name(),
                record.id,
                started_at.elapsed().as_millis(),
                err.code(),
                err
            ),
        }
        self.list()
    }

    /// Removes every record at once.
    pub fn clear(&self) {
        let started_at = Instant::now();
        match self.repo.clear_records() {
            Ok(()) => info!(
                "event=records_clear module=store status=ok backend={} duration_ms={}",
                self.repo.backend_name(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=records_clear module=store status=error backend={} duration_ms={} error_code={} error={}",
                self.repo.backend_name(),
                started_at.elapsed().as_millis(),
                err.code(),
                err
            ),
        }
    }
}

/// Builds the store for `config.backend`.
///
/// Storage itself is opened lazily, so an unreachable location still yields
/// a store; its reads come back empty until the location works.
pub fn open_record_store(
    config: &StoreConfig,
) -> Result<RecordStore<Box<dyn RecordRepository>>, ConfigError> {
    config.validate()?;

    let repo: Box<dyn RecordRepository> = match config.backend {
        StoreBackend::Sqlite => Box::new(SqliteRecordRepository::open(config.db_path())),
        StoreBackend::KeyValue => Box::new(KvRecordRepository::with_key(
            FileKeyValueStorage::new(&config.data_dir),
            config.records_key.as_str(),
        )),
        StoreBackend::Memory => {
            warn!("event=store_open module=store status=ok backend=memory persistent=false");
            Box::new(KvRecordRepository::with_key(
                MemoryKeyValueStorage::new(),
                config.records_key.as_str(),
            ))
        }
    };

    info!(
        "event=store_open module=store status=ok backend={} data_dir={}",
        config.backend.as_str(),
        config.data_dir.display()
    );
    Ok(RecordStore::new(repo))
}
