//! Prior-authorization record model.
//!
//! # Responsibility
//! - Define the persisted `AuthorizationRecord` and the immutable form draft
//!   it is built from.
//! - Own id generation, timestamp formatting and newest-first ordering so
//!   every storage backend agrees on them.
//!
//! # Invariants
//! - `id` is generated once at creation and never reassigned.
//! - Records are immutable after creation; field values are stored exactly
//!   as entered.
//! - Newest-first ordering compares parsed timestamps; unparseable values
//!   sort last and ties keep their incoming order.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Display layout of `timestamp`, matching en-US locale rendering.
pub const TIMESTAMP_DISPLAY_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";
const TIMESTAMP_PARSE_FORMAT: &str = "%m/%d/%Y, %I:%M:%S %p";

/// Conventional approval status values offered by the entry form.
pub struct ApprovalStatus;

impl ApprovalStatus {
    pub const APPROVED: &'static str = "Approved";
    pub const DECLINED: &'static str = "Declined";
}

/// Classification of a stored `approval_status` string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Approved,
    Declined,
    /// Any status outside the conventional set, kept verbatim.
    Other(String),
}

impl Decision {
    pub fn classify(status: &str) -> Self {
        match status {
            ApprovalStatus::APPROVED => Self::Approved,
            ApprovalStatus::DECLINED => Self::Declined,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Approved => ApprovalStatus::APPROVED,
            Self::Declined => ApprovalStatus::DECLINED,
            Self::Other(value) => value.as_str(),
        }
    }
}

/// One persisted prior-authorization decision entry.
///
/// Serialized with camelCase field names; this is the layout stored by the
/// key-value backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationRecord {
    pub id: String,
    pub patient_name: String,
    pub insurance_company_name: String,
    pub diagnosis_code: String,
    /// `Approved` or `Declined` by convention; any string is accepted.
    pub approval_status: String,
    pub notes: String,
    /// Human-readable local creation time; see [`TIMESTAMP_DISPLAY_FORMAT`].
    pub timestamp: String,
}

impl AuthorizationRecord {
    /// Builds a record from a draft with a caller-provided id and clock
    /// reading.
    ///
    /// Does not validate; callers run [`DraftRecord::validate`] first.
    pub fn from_draft(
        draft: &DraftRecord,
        id: impl Into<String>,
        created_at: NaiveDateTime,
    ) -> Self {
        Self {
            id: id.into(),
            patient_name: draft.patient_name.clone(),
            insurance_company_name: draft.insurance_company_name.clone(),
            diagnosis_code: draft.diagnosis_code.clone(),
            approval_status: draft.approval_status.clone(),
            notes: draft.notes.clone(),
            timestamp: format_timestamp(created_at),
        }
    }

    /// Parsed creation time, `None` when `timestamp` is not recognized.
    pub fn created_at(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.timestamp)
    }

    pub fn decision(&self) -> Decision {
        Decision::classify(&self.approval_status)
    }
}

/// Required form fields, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    PatientName,
    InsuranceCompanyName,
    DiagnosisCode,
    ApprovalStatus,
}

impl DraftField {
    pub fn label(self) -> &'static str {
        match self {
            Self::PatientName => "Patient Name",
            Self::InsuranceCompanyName => "Insurance Company",
            Self::DiagnosisCode => "Diagnosis Code",
            Self::ApprovalStatus => "Decision",
        }
    }
}

/// Validation failure for a draft; lists every missing required field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftValidationError {
    pub missing: Vec<DraftField>,
}

impl Display for DraftValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Validation Error: Please fill in all required fields.")?;
        if !self.missing.is_empty() {
            let labels = self
                .missing
                .iter()
                .map(|field| field.label())
                .collect::<Vec<_>>()
                .join(", ");
            write!(f, " Missing: {labels}")?;
        }
        Ok(())
    }
}

impl Error for DraftValidationError {}

/// Immutable value of the entry form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftRecord {
    pub patient_name: String,
    pub insurance_company_name: String,
    pub diagnosis_code: String,
    pub approval_status: String,
    #[serde(default)]
    pub notes: String,
}

impl Default for DraftRecord {
    /// The reset form: empty fields with `Approved` preselected.
    fn default() -> Self {
        Self {
            patient_name: String::new(),
            insurance_company_name: String::new(),
            diagnosis_code: String::new(),
            approval_status: ApprovalStatus::APPROVED.to_string(),
            notes: String::new(),
        }
    }
}

impl DraftRecord {
    /// Checks that every required field is non-empty.
    pub fn validate(&self) -> Result<(), DraftValidationError> {
        let required = [
            (DraftField::PatientName, &self.patient_name),
            (DraftField::InsuranceCompanyName, &self.insurance_company_name),
            (DraftField::DiagnosisCode, &self.diagnosis_code),
            (DraftField::ApprovalStatus, &self.approval_status),
        ];
        let missing = required
            .into_iter()
            .filter(|(_, value)| value.is_empty())
            .map(|(field, _)| field)
            .collect::<Vec<_>>();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(DraftValidationError { missing })
        }
    }
}

/// Generates a collision-resistant record id.
pub fn new_record_id() -> String {
    Uuid::new_v4().to_string()
}

pub fn format_timestamp(value: NaiveDateTime) -> String {
    value.format(TIMESTAMP_DISPLAY_FORMAT).to_string()
}

/// Parses a display timestamp, falling back to RFC 3339.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    NaiveDateTime::parse_from_str(trimmed, TIMESTAMP_PARSE_FORMAT)
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .map(|parsed| parsed.naive_local())
        })
}

/// Stable sort by creation time, newest first.
pub fn sort_newest_first(records: &mut [AuthorizationRecord]) {
    records.sort_by(|left, right| compare_newest_first(left.created_at(), right.created_at()));
}

fn compare_newest_first(left: Option<NaiveDateTime>, right: Option<NaiveDateTime>) -> Ordering {
    match (left, right) {
        (Some(left), Some(right)) => right.cmp(&left),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
