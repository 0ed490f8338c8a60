// In memory implementation of the DocumentStorage port.
//
// Purpose
// - Support store tests and local runs without touching the disk.
//
// Responsibilities
// - Keep one blob per key.
// - Count successful writes so tests can assert when the store persisted.
// - Simulate an unavailable medium through `toggle_offline`.

use crate::shared::infrastructure::document_storage::{DocumentStorage, StorageError};
use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

#[derive(Default)]
pub struct InMemoryDocumentStorage {
    blobs: RwLock<HashMap<String, String>>,
    writes: AtomicUsize,
    is_offline: AtomicBool,
}

impl InMemoryDocumentStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(key: &str, contents: impl Into<String>) -> Self {
        let storage = Self::new();
        storage
            .blobs
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.to_string(), contents.into());
        storage
    }

    pub fn toggle_offline(&self) {
        self.is_offline.fetch_xor(true, Ordering::SeqCst);
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.blobs
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(key)
            .cloned()
    }

    fn ensure_online(&self) -> Result<(), StorageError> {
        if self.is_offline.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(
                "Document storage offline".to_string(),
            ));
        }
        Ok(())
    }
}

impl DocumentStorage for InMemoryDocumentStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.ensure_online()?;
        Ok(self.raw(key))
    }

    fn write(&self, key: &str, contents: &str) -> Result<(), StorageError> {
        self.ensure_online()?;
        self.blobs
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.to_string(), contents.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod in_memory_document_storage_tests {
    use super::*;
    use rstest::{fixture, rstest};

    const KEY: &str = "attendance_tracker_v1";

    #[fixture]
    fn before_each() -> InMemoryDocumentStorage {
        InMemoryDocumentStorage::new()
    }

    #[rstest]
    fn it_should_return_none_for_a_missing_key(before_each: InMemoryDocumentStorage) {
        let storage = before_each;
        assert_eq!(storage.read(KEY).unwrap(), None);
    }

    #[rstest]
    fn it_should_write_and_read_back_a_blob(before_each: InMemoryDocumentStorage) {
        let storage = before_each;
        storage.write(KEY, "{\"employees\":[]}").unwrap();
        assert_eq!(
            storage.read(KEY).unwrap(),
            Some("{\"employees\":[]}".to_string())
        );
        assert_eq!(storage.writes(), 1);
    }

    #[rstest]
    fn it_should_seed_a_document_without_counting_a_write() {
        let storage = InMemoryDocumentStorage::with_document(KEY, "{}");
        assert_eq!(storage.raw(KEY), Some("{}".to_string()));
        assert_eq!(storage.writes(), 0);
    }

    #[rstest]
    fn it_should_fail_to_write_if_the_storage_is_offline(before_each: InMemoryDocumentStorage) {
        let storage = before_each;
        storage.toggle_offline();
        let result = storage.write(KEY, "{}");
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Document storage offline")
        );
        assert_eq!(storage.writes(), 0);
    }

    #[rstest]
    fn it_should_fail_to_read_if_the_storage_is_offline(before_each: InMemoryDocumentStorage) {
        let storage = before_each;
        storage.toggle_offline();
        assert!(matches!(
            storage.read(KEY),
            Err(StorageError::Unavailable(_))
        ));
        storage.toggle_offline();
        assert!(storage.read(KEY).is_ok());
    }
}
