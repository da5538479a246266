//! History table projection.
//!
//! Turns the ordered record list into display rows so a UI only has to
//! draw them.

use crate::model::authorization::{AuthorizationRecord, Decision};

/// Shown in place of the table when there are no records.
pub const EMPTY_HISTORY_MESSAGE: &str = "No records found.";
/// Shown in the notes column for records without notes.
pub const EMPTY_NOTES_PLACEHOLDER: &str = "-";

/// One row of the history table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRow {
    /// Positional id (`row_0`, `row_1`, ...), stable for a given ordering.
    pub row_id: String,
    pub record: AuthorizationRecord,
    pub decision: Decision,
    pub notes_display: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HistoryView {
    pub rows: Vec<HistoryRow>,
    pub total_records: usize,
}

impl HistoryView {
    /// Projects records in the order given (the store's newest-first order).
    pub fn from_records(records: Vec<AuthorizationRecord>) -> Self {
        let total_records = records.len();
        let rows = records
            .into_iter()
            .enumerate()
            .map(|(index, record)| {
                let notes_display = if record.notes.is_empty() {
                    EMPTY_NOTES_PLACEHOLDER.to_string()
                } else {
                    record.notes.clone()
                };
                HistoryRow {
                    row_id: format!("row_{index}"),
                    decision: record.decision(),
                    notes_display,
                    record,
                }
            })
            .collect();

        Self {
            rows,
            total_records,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &AuthorizationRecord> {
        self.rows.iter().map(|row| &row.record)
    }
}
