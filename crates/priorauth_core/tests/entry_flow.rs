use chrono::NaiveDate;
use priorauth_core::{
    open_record_store, Decision, DraftField, DraftRecord, EntryService, KvRecordRepository,
    MemoryKeyValueStorage, RecordStore, SqliteRecordRepository, StoreBackend, StoreConfig,
    EMPTY_HISTORY_MESSAGE, SAVE_SUCCESS_MESSAGE,
};

fn john_doe_draft() -> DraftRecord {
    DraftRecord {
        patient_name: "John Doe".to_string(),
        insurance_company_name: "Acme Health".to_string(),
        diagnosis_code: "E11.9".to_string(),
        approval_status: "Approved".to_string(),
        notes: String::new(),
    }
}

#[test]
fn submit_valid_draft_stores_one_stamped_record_listed_first() {
    let service = EntryService::new(RecordStore::new(SqliteRecordRepository::in_memory()));

    let outcome = service.submit(&john_doe_draft()).unwrap();

    let stored = service.store().list();
    assert_eq!(stored.len(), 1);
    let record = &stored[0];
    assert_eq!(record, &outcome.record);
    assert_eq!(record.patient_name, "John Doe");
    assert_eq!(record.insurance_company_name, "Acme Health");
    assert_eq!(record.diagnosis_code, "E11.9");
    assert_eq!(record.approval_status, "Approved");
    assert_eq!(record.notes, "");
    assert!(!record.id.is_empty());
    assert!(!record.timestamp.is_empty());
    assert!(record.created_at().is_some());

    assert_eq!(outcome.message, SAVE_SUCCESS_MESSAGE);
    assert_eq!(outcome.next_draft, DraftRecord::default());
    assert_eq!(outcome.history.total_records, 1);
    assert_eq!(outcome.history.rows[0].row_id, "row_0");
    assert_eq!(outcome.history.rows[0].record.id, record.id);
}

#[test]
fn later_submission_is_listed_first() {
    let service = EntryService::new(RecordStore::new(KvRecordRepository::new(
        MemoryKeyValueStorage::new(),
    )));
    let morning = NaiveDate::from_ymd_opt(2026, 5, 4)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap();
    let afternoon = morning + chrono::Duration::hours(5);

    let first = service.submit_at(&john_doe_draft(), morning).unwrap();
    let mut second_draft = john_doe_draft();
    second_draft.patient_name = "Jane Roe".to_string();
    second_draft.approval_status = "Declined".to_string();
    let second = service.submit_at(&second_draft, afternoon).unwrap();

    let ids = second
        .history
        .records()
        .map(|r| r.id.clone())
        .collect::<Vec<_>>();
    assert_eq!(ids, vec![second.record.id.clone(), first.record.id.clone()]);
    assert_eq!(second.history.rows[0].decision, Decision::Declined);
    assert_eq!(second.history.rows[1].decision, Decision::Approved);
}

#[test]
fn empty_patient_name_is_rejected_without_touching_the_store() {
    let service = EntryService::new(RecordStore::new(SqliteRecordRepository::in_memory()));
    service.submit(&john_doe_draft()).unwrap();
    let before = service.store().list();

    let mut draft = john_doe_draft();
    draft.patient_name = String::new();
    let err = service.submit(&draft).unwrap_err();

    assert_eq!(err.missing, vec![DraftField::PatientName]);
    assert!(err
        .to_string()
        .starts_with("Validation Error: Please fill in all required fields."));
    assert_eq!(service.store().list(), before);
}

#[test]
fn rapid_submissions_get_distinct_ids() {
    let service = EntryService::new(RecordStore::new(SqliteRecordRepository::in_memory()));
    let at = NaiveDate::from_ymd_opt(2026, 1, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();

    for _ in 0..50 {
        service.submit_at(&john_doe_draft(), at).unwrap();
    }

    let history = service.load_history();
    assert_eq!(history.total_records, 50);
    let mut ids = history.records().map(|r| r.id.clone()).collect::<Vec<_>>();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 50);
}

#[test]
fn clear_history_leaves_an_empty_view() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::new(StoreBackend::Sqlite, dir.path());
    let service = EntryService::new(open_record_store(&config).unwrap());
    service.submit(&john_doe_draft()).unwrap();

    let history = service.clear_history();
    assert!(history.is_empty());
    assert_eq!(history.total_records, 0);
    assert_eq!(EMPTY_HISTORY_MESSAGE, "No records found.");
}

#[test]
fn history_rows_show_placeholder_for_missing_notes() {
    let service = EntryService::new(RecordStore::new(KvRecordRepository::new(
        MemoryKeyValueStorage::new(),
    )));
    let mut with_notes = john_doe_draft();
    with_notes.notes = "Prior step therapy failed.".to_string();
    with_notes.approval_status = "Pending".to_string();
    let at = NaiveDate::from_ymd_opt(2026, 2, 1)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap();

    service.submit_at(&john_doe_draft(), at).unwrap();
    let outcome = service
        .submit_at(&with_notes, at + chrono::Duration::minutes(1))
        .unwrap();

    let rows = &outcome.history.rows;
    assert_eq!(rows[0].notes_display, "Prior step therapy failed.");
    assert_eq!(rows[0].decision, Decision::Other("Pending".to_string()));
    assert_eq!(rows[0].decision.label(), "Pending");
    assert_eq!(rows[1].notes_display, "-");
    assert_eq!(rows[1].row_id, "row_1");
}
