//! Entry form use-case service.
//!
//! # Responsibility
//! - Validate a submitted draft, stamp it with id and timestamp, persist it.
//! - Hand back the refreshed history and a reset draft.
//!
//! # Invariants
//! - An invalid draft never reaches the store.
//! - Storage failures are absorbed by `RecordStore`; validation is the only
//!   error a caller sees.

use crate::model::authorization::{
    new_record_id, AuthorizationRecord, DraftRecord, DraftValidationError,
};
use crate::repo::record_repo::RecordRepository;
use crate::service::history::HistoryView;
use crate::service::record_store::RecordStore;
use chrono::{Local, NaiveDateTime};
use log::{info, warn};

pub const SAVE_SUCCESS_MESSAGE: &str = "Record Saved Successfully";

/// Result of a successful submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    /// The record handed to the store.
    pub record: AuthorizationRecord,
    pub history: HistoryView,
    /// Fresh form value to show after submit.
    pub next_draft: DraftRecord,
    pub message: &'static str,
}

/// Use-case service wrapping a record store.
pub struct EntryService<R: RecordRepository> {
    store: RecordStore<R>,
}

impl<R: RecordRepository> EntryService<R> {
    pub fn new(store: RecordStore<R>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &RecordStore<R> {
        &self.store
    }

    /// Loads the history table for the initial view.
    pub fn load_history(&self) -> HistoryView {
        HistoryView::from_records(self.store.list())
    }

    /// Submits a draft stamped with the current local time.
    pub fn submit(&self, draft: &DraftRecord) -> Result<SubmitOutcome, DraftValidationError> {
        self.submit_at(draft, Local::now().naive_local())
    }

    /// Submits a draft with an explicit clock reading.
    ///
    /// # Errors
    /// - Returns `DraftValidationError` when a required field is blank; the
    ///   store is not touched in that case.
    pub fn submit_at(
        &self,
        draft: &DraftRecord,
        created_at: NaiveDateTime,
    ) -> Result<SubmitOutcome, DraftValidationError> {
        if let Err(err) = draft.validate() {
            warn!(
                "event=entry_submit module=entry status=rejected missing_fields={}",
                err.missing.len()
            );
            return Err(err);
        }

        let record = AuthorizationRecord::from_draft(draft, new_record_id(), created_at);
        let records = self.store.save(&record);
        info!(
            "event=entry_submit module=entry status=ok record_id={} total={}",
            record.id,
            records.len()
        );

        Ok(SubmitOutcome {
            record,
            history: HistoryView::from_records(records),
            next_draft: DraftRecord::default(),
            message: SAVE_SUCCESS_MESSAGE,
        })
    }

    /// Clears every record and returns the resulting history.
    pub fn clear_history(&self) -> HistoryView {
        self.store.clear();
        self.load_history()
    }
}
