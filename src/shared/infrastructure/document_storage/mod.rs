// Port for the persistence medium behind the document store.
//
// Purpose
// - Describe a synchronous key-value blob store: one key holds one serialized document.
//
// Boundaries
// - No document knowledge here. The store serializes, the medium only keeps text.
// - A failed write is reported, never retried and never swallowed.

use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("storage io error for key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
}

pub trait DocumentStorage: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn write(&self, key: &str, contents: &str) -> Result<(), StorageError>;
}

impl<TStorage> DocumentStorage for Arc<TStorage>
where
    TStorage: DocumentStorage + ?Sized,
{
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, contents: &str) -> Result<(), StorageError> {
        (**self).write(key, contents)
    }
}

pub mod file_system;
pub mod in_memory;
