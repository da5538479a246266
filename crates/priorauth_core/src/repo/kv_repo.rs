//! Simple record backend over a string key-value storage.
//!
//! # Responsibility
//! - Provide the key-value storage seam (`KeyValueStorage`) with file and
//!   in-memory implementations.
//! - Persist the whole record collection as one JSON array under one key.
//!
//! # Invariants
//! - The stored array is newest first.
//! - A key is replaced as a whole; readers never see a partially written
//!   value.

use crate::model::authorization::{sort_newest_first, AuthorizationRecord};
use crate::repo::record_repo::{RecordRepository, RepoError, RepoResult};
use std::cell::RefCell;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Default key holding the serialized record collection.
pub const DEFAULT_RECORDS_KEY: &str = "records";

const KV_FILE_EXTENSION: &str = "json";

/// Key-value storage failure.
#[derive(Debug)]
pub enum StorageError {
    /// Backing medium is missing or cannot be prepared.
    Unsupported(String),
    Io { key: String, source: io::Error },
    InvalidKey(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unsupported(message) => write!(f, "storage not supported: {message}"),
            Self::Io { key, source } => write!(f, "storage io error for key `{key}`: {source}"),
            Self::InvalidKey(key) => write!(f, "invalid storage key `{key}`"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

/// String key-value storage with whole-value replacement semantics.
pub trait KeyValueStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;
    fn remove_item(&self, key: &str) -> StorageResult<()>;
}

/// Directory-backed storage: one `<key>.json` file per key.
#[derive(Debug, Clone)]
pub struct FileKeyValueStorage {
    dir: PathBuf,
}

impl FileKeyValueStorage {
    /// Storage rooted at `dir`; the directory is created on first write.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn item_path(&self, key: &str) -> StorageResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.{KV_FILE_EXTENSION}")))
    }
}

impl KeyValueStorage for FileKeyValueStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.item_path(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.item_path(key)?;
        let staging = path.with_extension(format!("{KV_FILE_EXTENSION}.tmp"));
        fs::create_dir_all(&self.dir).map_err(|err| {
            StorageError::Unsupported(format!(
                "cannot create storage directory `{}`: {err}",
                self.dir.display()
            ))
        })?;
        let io_error = |source| StorageError::Io {
            key: key.to_string(),
            source,
        };
        fs::write(&staging, value).map_err(io_error)?;
        fs::rename(&staging, &path).map_err(io_error)
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        let path = self.item_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }
}

/// Process-local storage; contents vanish with the value.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStorage {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryKeyValueStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryKeyValueStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

/// Record repository storing the whole collection under one key.
pub struct KvRecordRepository<S: KeyValueStorage> {
    storage: S,
    key: String,
}

impl<S: KeyValueStorage> KvRecordRepository<S> {
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, DEFAULT_RECORDS_KEY)
    }

    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn load(&self) -> RepoResult<Vec<AuthorizationRecord>> {
        let raw = self
            .storage
            .get_item(&self.key)
            .map_err(RepoError::read)?;
        match raw {
            Some(raw) => serde_json::from_str(&raw).map_err(RepoError::read),
            None => Ok(Vec::new()),
        }
    }
}

impl<S: KeyValueStorage> RecordRepository for KvRecordRepository<S> {
    fn backend_name(&self) -> &'static str {
        "key_value"
    }

    fn list_records(&self) -> RepoResult<Vec<AuthorizationRecord>> {
        self.load()
    }

    fn put_record(&self, record: &AuthorizationRecord) -> RepoResult<()> {
        let mut records = self.load()?;
        match records.iter_mut().find(|existing| existing.id == record.id) {
            Some(existing) => *existing = record.clone(),
            None => records.insert(0, record.clone()),
        }
        sort_newest_first(&mut records);

        let serialized = serde_json::to_string(&records).map_err(RepoError::write)?;
        self.storage
            .set_item(&self.key, &serialized)
            .map_err(storage_write_error)
    }

    fn clear_records(&self) -> RepoResult<()> {
        self.storage
            .remove_item(&self.key)
            .map_err(storage_write_error)
    }
}

fn storage_write_error(err: StorageError) -> RepoError {
    match err {
        StorageError::Unsupported(_) => RepoError::unavailable(err),
        other => RepoError::write(other),
    }
}

#[cfg(test)]
mod tests {
    use super::{FileKeyValueStorage, KeyValueStorage, StorageError};

    #[test]
    fn file_storage_round_trips_and_removes_values() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileKeyValueStorage::new(dir.path().join("kv"));

        assert_eq!(storage.get_item("records").unwrap(), None);
        storage.set_item("records", "[]").unwrap();
        assert_eq!(storage.get_item("records").unwrap().as_deref(), Some("[]"));

        storage.remove_item("records").unwrap();
        storage.remove_item("records").unwrap();
        assert_eq!(storage.get_item("records").unwrap(), None);
    }

    #[test]
    fn file_storage_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileKeyValueStorage::new(dir.path());

        let err = storage.set_item("../escape", "x").unwrap_err();
        assert!(matches!(err, StorageError::InvalidKey(key) if key == "../escape"));
    }
}
