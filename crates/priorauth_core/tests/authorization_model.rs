use chrono::NaiveDate;
use priorauth_core::{
    format_timestamp, new_record_id, ApprovalStatus, AuthorizationRecord, Decision, DraftField,
    DraftRecord,
};

#[test]
fn default_draft_preselects_approved() {
    let draft = DraftRecord::default();
    assert_eq!(draft.approval_status, ApprovalStatus::APPROVED);
    assert!(draft.patient_name.is_empty());
    assert!(draft.notes.is_empty());
}

#[test]
fn validate_lists_every_empty_required_field_in_form_order() {
    let draft = DraftRecord {
        patient_name: String::new(),
        insurance_company_name: "Acme Health".to_string(),
        diagnosis_code: String::new(),
        approval_status: String::new(),
        notes: String::new(),
    };

    let err = draft.validate().unwrap_err();
    assert_eq!(
        err.missing,
        vec![
            DraftField::PatientName,
            DraftField::DiagnosisCode,
            DraftField::ApprovalStatus,
        ]
    );
    assert!(err.to_string().ends_with("Missing: Patient Name, Diagnosis Code, Decision"));
}

#[test]
fn whitespace_only_values_count_as_filled_in() {
    let draft = DraftRecord {
        patient_name: " ".to_string(),
        insurance_company_name: "Acme Health".to_string(),
        diagnosis_code: "E11.9".to_string(),
        ..DraftRecord::default()
    };
    assert!(draft.validate().is_ok());

    let blank_code = DraftRecord {
        diagnosis_code: "\t".to_string(),
        ..draft
    };
    assert!(blank_code.validate().is_ok());
}

#[test]
fn notes_are_optional() {
    let draft = DraftRecord {
        patient_name: "John Doe".to_string(),
        insurance_company_name: "Acme Health".to_string(),
        diagnosis_code: "E11.9".to_string(),
        ..DraftRecord::default()
    };
    assert!(draft.validate().is_ok());
}

#[test]
fn from_draft_copies_fields_verbatim_and_stamps_time() {
    let draft = DraftRecord {
        patient_name: " John Doe ".to_string(),
        insurance_company_name: "Acme Health".to_string(),
        diagnosis_code: "e11.9".to_string(),
        approval_status: "Declined".to_string(),
        notes: "see chart".to_string(),
    };
    let at = NaiveDate::from_ymd_opt(2026, 10, 18)
        .unwrap()
        .and_hms_opt(0, 5, 30)
        .unwrap();

    let record = AuthorizationRecord::from_draft(&draft, "rec-1", at);
    assert_eq!(record.id, "rec-1");
    assert_eq!(record.patient_name, " John Doe ");
    assert_eq!(record.diagnosis_code, "e11.9");
    assert_eq!(record.timestamp, "10/18/2026, 12:05:30 AM");
    assert_eq!(record.timestamp, format_timestamp(at));
    assert_eq!(record.created_at(), Some(at));
    assert_eq!(record.decision(), Decision::Declined);
}

#[test]
fn generated_ids_are_unique_and_non_empty() {
    let first = new_record_id();
    let second = new_record_id();
    assert!(!first.is_empty());
    assert_ne!(first, second);
}

#[test]
fn record_serialization_uses_camel_case_wire_fields() {
    let value = serde_json::json!({
        "id": "1700000000000",
        "patientName": "John Doe",
        "insuranceCompanyName": "Acme Health",
        "diagnosisCode": "E11.9",
        "approvalStatus": "Approved",
        "notes": "",
        "timestamp": "11/14/2023, 10:13:20 PM"
    });

    let record: AuthorizationRecord = serde_json::from_value(value.clone()).unwrap();
    assert_eq!(record.patient_name, "John Doe");
    assert!(record.created_at().is_some());
    assert_eq!(serde_json::to_value(&record).unwrap(), value);
}
