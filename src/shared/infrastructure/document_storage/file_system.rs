// File system implementation of the DocumentStorage port.
//
// Purpose
// - Keep each document in `<dir>/<key>.json` for the server binary.
//
// Responsibilities
// - Create the directory on first write.
// - Replace the file atomically: write a temp file next to it, then persist over the target.

use crate::shared::infrastructure::document_storage::{DocumentStorage, StorageError};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct FileDocumentStorage {
    dir: PathBuf,
}

impl FileDocumentStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn atomic_write(&self, key: &str, path: &Path, contents: &str) -> Result<(), StorageError> {
        let io_error = |source: std::io::Error| StorageError::Io {
            key: key.to_string(),
            source,
        };
        fs::create_dir_all(&self.dir).map_err(io_error)?;
        let mut temp = tempfile::NamedTempFile::new_in(&self.dir).map_err(io_error)?;
        temp.write_all(contents.as_bytes()).map_err(io_error)?;
        temp.as_file().sync_all().map_err(io_error)?;
        temp.persist(path).map_err(|e| io_error(e.error))?;
        Ok(())
    }
}

impl DocumentStorage for FileDocumentStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn write(&self, key: &str, contents: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        self.atomic_write(key, &path, contents)?;
        tracing::debug!(path = %path.display(), bytes = contents.len(), "document written");
        Ok(())
    }
}

#[cfg(test)]
mod file_document_storage_tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    const KEY: &str = "attendance_tracker_v1";

    #[fixture]
    fn before_each() -> (TempDir, FileDocumentStorage) {
        let temp = TempDir::new().unwrap();
        let storage = FileDocumentStorage::new(temp.path().join("data"));
        (temp, storage)
    }

    #[rstest]
    fn it_should_return_none_before_the_first_write(before_each: (TempDir, FileDocumentStorage)) {
        let (_temp, storage) = before_each;
        assert_eq!(storage.read(KEY).unwrap(), None);
    }

    #[rstest]
    fn it_should_create_the_directory_and_persist_the_document(
        before_each: (TempDir, FileDocumentStorage),
    ) {
        let (_temp, storage) = before_each;
        storage.write(KEY, "{\"employees\":[]}").unwrap();
        assert!(storage.path_for(KEY).exists());
        assert_eq!(
            storage.read(KEY).unwrap(),
            Some("{\"employees\":[]}".to_string())
        );
    }

    #[rstest]
    fn it_should_replace_the_previous_contents(before_each: (TempDir, FileDocumentStorage)) {
        let (_temp, storage) = before_each;
        storage.write(KEY, "first").unwrap();
        storage.write(KEY, "second").unwrap();
        assert_eq!(storage.read(KEY).unwrap(), Some("second".to_string()));
        let leftovers = fs::read_dir(storage.path_for(KEY).parent().unwrap())
            .unwrap()
            .count();
        assert_eq!(leftovers, 1);
    }

    #[rstest]
    fn it_should_fail_when_the_directory_is_a_file() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();
        let storage = FileDocumentStorage::new(&blocker);
        let result = storage.write(KEY, "{}");
        assert!(matches!(result, Err(StorageError::Io { .. })));
    }
}
