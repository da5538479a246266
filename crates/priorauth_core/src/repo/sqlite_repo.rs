//! Transactional record backend on SQLite.
//!
//! # Responsibility
//! - Store one row per record in `records`, keyed by `id`.
//! - Run every mutation in its own transaction.
//!
//! # Invariants
//! - The connection is opened lazily; a failed open is retried next call.
//! - Upserting an existing id keeps its insertion sequence, so ties on
//!   `timestamp` stay in first-saved order.

use crate::db::{open_db, open_db_in_memory, DbResult};
use crate::model::authorization::{sort_newest_first, AuthorizationRecord};
use crate::repo::record_repo::{RecordRepository, RepoError, RepoResult};
use once_cell::unsync::OnceCell;
use rusqlite::{params, Connection, Row};
use std::path::{Path, PathBuf};

const RECORD_SELECT_SQL: &str = "SELECT
    id,
    patient_name,
    insurance_company_name,
    diagnosis_code,
    approval_status,
    notes,
    timestamp
FROM records
ORDER BY seq DESC;";

const RECORD_UPSERT_SQL: &str = "INSERT INTO records (
    id,
    patient_name,
    insurance_company_name,
    diagnosis_code,
    approval_status,
    notes,
    timestamp
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
ON CONFLICT(id) DO UPDATE SET
    patient_name = excluded.patient_name,
    insurance_company_name = excluded.insurance_company_name,
    diagnosis_code = excluded.diagnosis_code,
    approval_status = excluded.approval_status,
    notes = excluded.notes,
    timestamp = excluded.timestamp;";

#[derive(Debug, Clone, PartialEq, Eq)]
enum DbLocation {
    File(PathBuf),
    Memory,
}

/// SQLite-backed record repository.
pub struct SqliteRecordRepository {
    location: DbLocation,
    conn: OnceCell<Connection>,
}

impl SqliteRecordRepository {
    /// Repository over a database file, created on first use.
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self {
            location: DbLocation::File(path.as_ref().to_path_buf()),
            conn: OnceCell::new(),
        }
    }

    /// Repository over a private in-memory database.
    pub fn in_memory() -> Self {
        Self {
            location: DbLocation::Memory,
            conn: OnceCell::new(),
        }
    }

    /// Repository over an already opened and migrated connection.
    pub fn with_connection(conn: Connection) -> Self {
        Self {
            location: DbLocation::Memory,
            conn: OnceCell::with_value(conn),
        }
    }

    /// Database file path, `None` for in-memory repositories.
    pub fn path(&self) -> Option<&Path> {
        match &self.location {
            DbLocation::File(path) => Some(path.as_path()),
            DbLocation::Memory => None,
        }
    }

    fn connection(&self) -> RepoResult<&Connection> {
        self.conn
            .get_or_try_init(|| self.connect())
            .map_err(RepoError::unavailable)
    }

    fn connect(&self) -> DbResult<Connection> {
        match &self.location {
            DbLocation::File(path) => open_db(path),
            DbLocation::Memory => open_db_in_memory(),
        }
    }
}

impl RecordRepository for SqliteRecordRepository {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    fn list_records(&self) -> RepoResult<Vec<AuthorizationRecord>> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(RECORD_SELECT_SQL).map_err(RepoError::read)?;
        let mut rows = stmt.query([]).map_err(RepoError::read)?;
        let mut records = Vec::new();

        while let Some(row) = rows.next().map_err(RepoError::read)? {
            records.push(parse_record_row(row).map_err(RepoError::read)?);
        }

        sort_newest_first(&mut records);
        Ok(records)
    }

    fn put_record(&self, record: &AuthorizationRecord) -> RepoResult<()> {
        let conn = self.connection()?;
        let tx = conn.unchecked_transaction().map_err(RepoError::write)?;
        tx.execute(
            RECORD_UPSERT_SQL,
            params![
                record.id.as_str(),
                record.patient_name.as_str(),
                record.insurance_company_name.as_str(),
                record.diagnosis_code.as_str(),
                record.approval_status.as_str(),
                record.notes.as_str(),
                record.timestamp.as_str(),
            ],
        )
        .map_err(RepoError::write)?;
        tx.commit().map_err(RepoError::write)
    }

    fn clear_records(&self) -> RepoResult<()> {
        let conn = self.connection()?;
        let tx = conn.unchecked_transaction().map_err(RepoError::write)?;
        tx.execute("DELETE FROM records;", [])
            .map_err(RepoError::write)?;
        tx.commit().map_err(RepoError::write)
    }
}

fn parse_record_row(row: &Row<'_>) -> rusqlite::Result<AuthorizationRecord> {
    Ok(AuthorizationRecord {
        id: row.get("id")?,
        patient_name: row.get("patient_name")?,
        insurance_company_name: row.get("insurance_company_name")?,
        diagnosis_code: row.get("diagnosis_code")?,
        approval_status: row.get("approval_status")?,
        notes: row.get("notes")?,
        timestamp: row.get("timestamp")?,
    })
}
