//! Record repository contract and error taxonomy.
//!
//! # Responsibility
//! - Define the storage-capability interface shared by every backend.
//! - Classify storage failures as unavailable, write or read errors.
//!
//! # Invariants
//! - `list_records` returns the collection newest first.
//! - `put_record` upserts by `id`; a stored id never maps to two records.
//! - `clear_records` either removes every record or leaves them all.

use crate::db::DbError;
use crate::model::authorization::AuthorizationRecord;
use crate::repo::kv_repo::StorageError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Underlying failure carried by a [`RepoError`].
#[derive(Debug)]
pub enum RepoErrorSource {
    Db(DbError),
    Storage(StorageError),
    Serde(serde_json::Error),
}

impl Display for RepoErrorSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "{err}"),
            Self::Serde(err) => write!(f, "{err}"),
        }
    }
}

impl RepoErrorSource {
    fn as_error(&self) -> &(dyn Error + 'static) {
        match self {
            Self::Db(err) => err,
            Self::Storage(err) => err,
            Self::Serde(err) => err,
        }
    }
}

/// Repository error for record persistence operations.
#[derive(Debug)]
pub enum RepoError {
    /// Storage cannot be opened or is not supported by the host.
    Unavailable(RepoErrorSource),
    /// A write was rejected (quota, serialization, constraint).
    Write(RepoErrorSource),
    /// A stored value could not be read back (corruption).
    Read(RepoErrorSource),
}

impl RepoError {
    /// Stable code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unavailable(_) => "storage_unavailable",
            Self::Write(_) => "write_failed",
            Self::Read(_) => "read_failed",
        }
    }

    pub fn unavailable(source: impl Into<RepoErrorSource>) -> Self {
        Self::Unavailable(source.into())
    }

    pub fn write(source: impl Into<RepoErrorSource>) -> Self {
        Self::Write(source.into())
    }

    pub fn read(source: impl Into<RepoErrorSource>) -> Self {
        Self::Read(source.into())
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(source) => write!(f, "record storage unavailable: {source}"),
            Self::Write(source) => write!(f, "record write failed: {source}"),
            Self::Read(source) => write!(f, "record read failed: {source}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Unavailable(source) | Self::Write(source) | Self::Read(source) => {
                Some(source.as_error())
            }
        }
    }
}

impl From<DbError> for RepoErrorSource {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoErrorSource {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<StorageError> for RepoErrorSource {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

impl From<serde_json::Error> for RepoErrorSource {
    fn from(value: serde_json::Error) -> Self {
        Self::Serde(value)
    }
}

/// Storage-capability interface for the authorization record collection.
pub trait RecordRepository {
    /// Short backend name used in log events.
    fn backend_name(&self) -> &'static str;
    fn list_records(&self) -> RepoResult<Vec<AuthorizationRecord>>;
    fn put_record(&self, record: &AuthorizationRecord) -> RepoResult<()>;
    fn clear_records(&self) -> RepoResult<()>;
}

impl<R: RecordRepository + ?Sized> RecordRepository for Box<R> {
    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }

    fn list_records(&self) -> RepoResult<Vec<AuthorizationRecord>> {
        (**self).list_records()
    }

    fn put_record(&self, record: &AuthorizationRecord) -> RepoResult<()> {
        (**self).put_record(record)
    }

    fn clear_records(&self) -> RepoResult<()> {
        (**self).clear_records()
    }
}
