// Shared test fixtures for persisted documents and ready-made stores.
// Included in the crate only during tests, see `src/lib.rs`.

use crate::modules::attendance::store::{DOCUMENT_KEY, DataStore};
use crate::shared::infrastructure::document_storage::in_memory::InMemoryDocumentStorage;
use std::fs;
use std::sync::Arc;

pub const LEGACY_EMPLOYEE_ID: &str = "emp-legacy-0001";

/// Document written before status types, cylinders and rules existed, with legacy cells.
pub fn legacy_document_json() -> String {
    fs::read_to_string("./src/test_support/fixtures/documents/json/legacy_document.json").unwrap()
}

pub fn empty_store() -> (Arc<InMemoryDocumentStorage>, DataStore<Arc<InMemoryDocumentStorage>>) {
    let storage = Arc::new(InMemoryDocumentStorage::new());
    let store = DataStore::open(storage.clone()).unwrap();
    (storage, store)
}

pub fn legacy_store() -> (Arc<InMemoryDocumentStorage>, DataStore<Arc<InMemoryDocumentStorage>>) {
    let storage = Arc::new(InMemoryDocumentStorage::with_document(
        DOCUMENT_KEY,
        legacy_document_json(),
    ));
    let store = DataStore::open(storage.clone()).unwrap();
    (storage, store)
}
