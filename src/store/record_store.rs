//! Whole-collection record store
//!
//! This module contains the RecordStore struct which loads a full collection from a
//! CSV file and rewrites it atomically.

use super::codec::{self, Record};
use super::StoreError;
use std::fmt;
use std::fs;
use std::io::{ErrorKind, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Case-insensitive comparison used for every identity key
pub fn key_matches(stored: &str, requested: &str) -> bool {
    stored.to_lowercase() == requested.to_lowercase()
}

/// File-backed collection of records of a single type
pub struct RecordStore<T> {
    path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T> fmt::Debug for RecordStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordStore").field("path", &self.path).finish()
    }
}

impl<T> Clone for RecordStore<T> {
    fn clone(&self) -> Self {
        Self { path: self.path.clone(), _marker: PhantomData }
    }
}

impl<T: Record> RecordStore<T> {
    /// Create a store backed by the given file. Nothing is touched on disk.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), _marker: PhantomData }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check whether the collection has ever been written
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Load every record in file order.
    ///
    /// A collection that has never been written loads as empty.
    #[instrument(skip(self), fields(kind = T::KIND, path = %self.path.display()))]
    pub fn load(&self) -> Result<Vec<T>, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Collection not written yet, starting empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };

        let records = codec::decode::<T>(&content)?;
        debug!(rows = records.len(), "Loaded collection");
        Ok(records)
    }

    /// Replace the whole collection.
    ///
    /// The rows are written to a temporary file next to the target which is then
    /// renamed over it, so a reader sees either the old or the new collection.
    #[instrument(skip(self, records), fields(kind = T::KIND, path = %self.path.display(), rows = records.len()))]
    pub fn save_all(&self, records: &[T]) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;

        let mut temp = tempfile::NamedTempFile::new_in(&dir).map_err(|e| StoreError::io(&dir, e))?;
        temp.as_file_mut()
            .write_all(codec::encode(records).as_bytes())
            .map_err(|e| StoreError::io(temp.path(), e))?;
        temp.as_file().sync_all().map_err(|e| StoreError::io(temp.path(), e))?;
        temp.persist(&self.path)
            .map_err(|e| StoreError::Persist { path: self.path.clone(), source: e.error })?;

        debug!("Collection rewritten");
        Ok(())
    }

    /// Append one record by rewriting the collection
    pub fn append(&self, record: T) -> Result<(), StoreError> {
        let mut records = self.load()?;
        records.push(record);
        self.save_all(&records)
    }

    /// Find the first record whose key matches case-insensitively
    pub fn find_by<F>(&self, key: &str, key_of: F) -> Result<Option<T>, StoreError>
    where
        F: Fn(&T) -> &str,
    {
        Ok(self.load()?.into_iter().find(|record| key_matches(key_of(record), key)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Guest, ParkingRecord};
    use chrono::NaiveDate;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 2, 10).unwrap()
    }

    #[test]
    fn test_key_matches_ignores_case() {
        assert!(key_matches("JDoe", "jdoe"));
        assert!(key_matches("Tony Stark", "TONY STARK"));
        assert!(!key_matches("jdoe", "jdoe2"));
    }

    #[test]
    fn test_missing_collection_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store: RecordStore<ParkingRecord> = RecordStore::new(dir.path().join("parking.csv"));
        assert!(!store.exists());
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_all_creates_directory_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store: RecordStore<Guest> = RecordStore::new(dir.path().join("nested/guests.csv"));

        store
            .save_all(&[Guest::new("A B", "ab", date()), Guest::new("C D", "cd", date())])
            .unwrap();
        assert!(store.exists());
        assert_eq!(store.load().unwrap().len(), 2);

        store.save_all(&[Guest::new("E F", "ef", date())]).unwrap();
        let guests = store.load().unwrap();
        assert_eq!(guests.len(), 1);
        assert_eq!(guests[0].alias, "ef");
    }

    #[test]
    fn test_append_and_find_by() {
        let dir = tempfile::tempdir().unwrap();
        let store: RecordStore<Guest> = RecordStore::new(dir.path().join("guests.csv"));

        store.append(Guest::new("Tony Stark", "tstark", date())).unwrap();
        store.append(Guest::new("Pepper Potts", "ppotts", date())).unwrap();

        let found = store.find_by("tony stark", |g| g.name.as_str()).unwrap();
        assert_eq!(found.map(|g| g.alias), Some("tstark".to_string()));
        assert!(store.find_by("Happy Hogan", |g| g.name.as_str()).unwrap().is_none());
    }

    #[test]
    fn test_corrupt_collection_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("guests.csv");
        fs::write(&path, "name,alias\nA B,ab\n").unwrap();

        let store: RecordStore<Guest> = RecordStore::new(path);
        let error = store.load().unwrap_err();
        assert!(error.is_corrupt());
    }
}
