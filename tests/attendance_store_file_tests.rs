// End to end tests for the data store over the file system adapter.
//
// Responsibilities
// - Open the store on a temporary directory, mutate it, reopen it from disk.
// - Assert that what a fresh store sees matches what the previous one wrote.

use attendance_tracker::modules::attendance::core::calendar::MonthKey;
use attendance_tracker::modules::attendance::core::stats::CollectiveStats;
use attendance_tracker::modules::attendance::store::{DOCUMENT_KEY, DataStore};
use attendance_tracker::shared::infrastructure::document_storage::file_system::FileDocumentStorage;
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::fs;
use tempfile::TempDir;

const LEGACY_DOCUMENT: &str = r#"{
  "employees": [
    {"id": "emp-1", "name": "Ada", "role": "Operator", "department": "General"}
  ],
  "attendance": {
    "emp-1": {
      "2024-03-05": {"status": "absent"},
      "2024-03-06": {"statuses": []}
    }
  },
  "theme": "dark"
}"#;

type BeforeEachReturn = (TempDir, FileDocumentStorage);

fn temp_storage() -> BeforeEachReturn {
    let dir = TempDir::new().unwrap();
    let storage = FileDocumentStorage::new(dir.path());
    (dir, storage)
}

#[fixture]
fn before_each() -> BeforeEachReturn {
    temp_storage()
}

fn reopen(dir: &TempDir) -> DataStore<FileDocumentStorage> {
    DataStore::open(FileDocumentStorage::new(dir.path())).unwrap()
}

fn stored_json(storage: &FileDocumentStorage) -> Value {
    let raw = fs::read_to_string(storage.path_for(DOCUMENT_KEY)).unwrap();
    serde_json::from_str(&raw).unwrap()
}

fn march() -> MonthKey {
    "2024-03".parse().unwrap()
}

#[rstest]
fn it_should_start_seeded_and_write_nothing_until_a_mutation(before_each: BeforeEachReturn) {
    let (dir, storage) = before_each;
    let store = DataStore::open(storage).unwrap();
    assert!(store.employees().is_empty());
    assert_eq!(store.status_types().len(), 4);
    assert!(!dir.path().join(format!("{DOCUMENT_KEY}.json")).exists());
}

#[rstest]
fn it_should_survive_a_reopen(before_each: BeforeEachReturn) {
    let (dir, storage) = before_each;
    let mut store = DataStore::open(storage).unwrap();
    let id = store.add_employee("Ada", "Operator").unwrap();
    store.toggle_attendance_status(&id, "2024-03-05", "late").unwrap();
    store.add_status_type("Overtime", "#0af").unwrap();

    let reopened = reopen(&dir);
    assert_eq!(reopened.employees(), store.employees());
    assert_eq!(reopened.attendance(&id), store.attendance(&id));
    assert!(reopened.status_type("overtime").is_some());
}

#[rstest]
fn it_should_return_a_cell_to_absent_after_toggling_twice(before_each: BeforeEachReturn) {
    let (dir, storage) = before_each;
    let mut store = DataStore::open(storage).unwrap();
    let id = store.add_employee("Ada", "Operator").unwrap();
    store.toggle_attendance_status(&id, "2024-03-05", "late").unwrap();
    store.toggle_attendance_status(&id, "2024-03-05", "late").unwrap();

    assert!(store.cell(&id, "2024-03-05").is_none());
    assert!(!reopen(&dir).attendance(&id).contains_key("2024-03-05"));
}

#[rstest]
fn it_should_cascade_employee_removal_to_disk(before_each: BeforeEachReturn) {
    let (dir, storage) = before_each;
    let mut store = DataStore::open(storage).unwrap();
    let ids: Vec<String> = ["Ada", "Grace", "Linus"]
        .iter()
        .map(|name| store.add_employee(name, "Operator").unwrap())
        .collect();
    for id in &ids {
        store.mark_attendance(id, "2024-03-05", Some("absent")).unwrap();
    }
    for id in &ids {
        assert!(store.remove_employee(id).unwrap());
    }

    let stored = stored_json(&FileDocumentStorage::new(dir.path()));
    assert_eq!(stored["attendance"], json!({}));
    assert_eq!(stored["employees"], json!([]));
}

#[rstest]
fn it_should_dedupe_labels_and_protect_defaults(before_each: BeforeEachReturn) {
    let (_dir, storage) = before_each;
    let mut store = DataStore::open(storage).unwrap();
    assert!(store.add_status_type("Late Arrival", "#f00").unwrap());
    assert!(!store.add_status_type("late arrival", "#0f0").unwrap());
    let matching: Vec<_> = store
        .status_types()
        .iter()
        .filter(|s| s.id == "late_arrival")
        .collect();
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0].color, "#f00");

    let before = store.status_types().to_vec();
    assert!(!store.delete_status_type("late").unwrap());
    assert_eq!(store.status_types(), before.as_slice());
}

#[rstest]
fn it_should_migrate_legacy_cells_and_store_the_canonical_shape_on_the_next_write(
    before_each: BeforeEachReturn,
) {
    let (dir, storage) = before_each;
    fs::write(storage.path_for(DOCUMENT_KEY), LEGACY_DOCUMENT).unwrap();

    let mut store = DataStore::open(storage).unwrap();
    assert_eq!(store.cell("emp-1", "2024-03-05").unwrap().statuses(), ["absent"]);
    assert!(store.cell("emp-1", "2024-03-06").is_none());

    let untouched = stored_json(&FileDocumentStorage::new(dir.path()));
    assert_eq!(untouched["attendance"]["emp-1"]["2024-03-05"], json!({"status": "absent"}));

    store.add_employee("Grace", "Operator").unwrap();
    let stored = stored_json(&FileDocumentStorage::new(dir.path()));
    assert_eq!(stored["attendance"]["emp-1"]["2024-03-05"], json!({"statuses": ["absent"]}));
    assert_eq!(stored["attendance"]["emp-1"].get("2024-03-06"), None);
    assert_eq!(stored["statusTypes"].as_array().unwrap().len(), 4);
    assert_eq!(stored["theme"], json!("dark"));
}

#[rstest]
fn it_should_count_monthly_statistics(before_each: BeforeEachReturn) {
    let (dir, storage) = before_each;
    let mut store = DataStore::open(storage).unwrap();
    let id = store.add_employee("Ada", "Operator").unwrap();
    store.toggle_attendance_status(&id, "2024-03-05", "late").unwrap();
    store.toggle_attendance_status(&id, "2024-03-05", "absent").unwrap();
    store.toggle_attendance_status(&id, "2024-03-12", "late").unwrap();
    store.toggle_attendance_status(&id, "2024-04-01", "late").unwrap();

    let reopened = reopen(&dir);
    let expected = BTreeMap::from([("late".to_string(), 2), ("absent".to_string(), 1)]);
    assert_eq!(reopened.employee_month_stats(&id, &march()), expected);
    assert_eq!(
        reopened.collective_month_stats(&march()),
        CollectiveStats { late: 2, absent: 1 }
    );
}

#[rstest]
fn it_should_round_trip_a_backup_into_a_fresh_directory(before_each: BeforeEachReturn) {
    let (_dir, storage) = before_each;
    let mut store = DataStore::open(storage).unwrap();
    let id = store.add_employee("Ada", "Operator").unwrap();
    store.mark_attendance(&id, "2024-03-05", Some("night_shift")).unwrap();
    let backup = store.export_data().unwrap();

    let (target_dir, target_storage) = temp_storage();
    let mut target = DataStore::open(target_storage).unwrap();
    assert!(target.import_data(&backup).unwrap());
    assert_eq!(target.export_data().unwrap(), backup);
    assert_eq!(reopen(&target_dir).export_data().unwrap(), backup);
}

#[rstest]
fn it_should_reject_unreadable_imports_without_touching_disk(before_each: BeforeEachReturn) {
    let (dir, storage) = before_each;
    let mut store = DataStore::open(storage).unwrap();
    store.add_employee("Ada", "Operator").unwrap();
    let before = store.employees().to_vec();

    assert!(!store.import_data("not json").unwrap());
    assert_eq!(store.employees(), before.as_slice());
    assert_eq!(reopen(&dir).employees(), before.as_slice());
}
