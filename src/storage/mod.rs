//! Durable key-value storage behind the diary.
//!
//! The diary persists a handful of string records (the entry map, the theme
//! preference) under well-known keys. `KeyValueStorage` is the seam: the
//! binary uses `FileStorage`, one file per record inside the data directory,
//! while tests and embedders can use the in-process `MemoryStorage`.
//!
//! Every `set` replaces the whole record. `FileStorage` writes the new value to
//! a temporary file in the same directory and renames it over the old record,
//! so readers observe either the previous value or the new one, never a mix.


use crate::constants;
use crate::errors::StorageError;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
#[cfg(unix)]
use std::fs::Permissions;
use std::io::{self, Write};
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Whole-record string storage addressed by key.
///
/// # Examples
///
/// ```
/// use daybook::storage::{KeyValueStorage, MemoryStorage};
///
/// let storage = MemoryStorage::new();
/// storage.set("greeting", "hello").unwrap();
/// assert_eq!(storage.get("greeting").unwrap().as_deref(), Some("hello"));
///
/// storage.remove("greeting").unwrap();
/// assert_eq!(storage.get("greeting").unwrap(), None);
/// ```
pub trait KeyValueStorage {
    /// Returns the record stored under `key`, or `None` if there is none.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replaces the record stored under `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Deletes the record stored under `key`. Deleting a missing record succeeds.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStorage + ?Sized> KeyValueStorage for &S {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// Stores each record as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Opens storage rooted at `dir`, creating the directory if necessary.
    ///
    /// A newly created directory gets owner-only permissions on unix.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::DirectoryUnavailable` if `dir` is relative or
    /// cannot be created.
    pub fn open(dir: &Path) -> Result<Self, StorageError> {
        if !dir.is_absolute() {
            return Err(StorageError::DirectoryUnavailable {
                path: dir.to_path_buf(),
                source: io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "storage directory must be an absolute path",
                ),
            });
        }

        if !dir.exists() {
            let unavailable = |source| StorageError::DirectoryUnavailable {
                path: dir.to_path_buf(),
                source,
            };

            fs::create_dir_all(dir).map_err(unavailable)?;

            #[cfg(unix)]
            {
                let permissions = Permissions::from_mode(constants::DEFAULT_DIR_PERMISSIONS);
                fs::set_permissions(dir, permissions).map_err(unavailable)?;
                debug!("Set 0o700 permissions on data directory");
            }
        } else if !dir.is_dir() {
            return Err(StorageError::DirectoryUnavailable {
                path: dir.to_path_buf(),
                source: io::Error::new(io::ErrorKind::AlreadyExists, "path is not a directory"),
            });
        }

        Ok(FileStorage {
            dir: dir.to_path_buf(),
        })
    }

    /// Directory holding the record files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    pub fn record_path(&self, key: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{}", key, constants::RECORD_FILE_EXTENSION))
    }

    fn unavailable(key: &str, source: io::Error) -> StorageError {
        StorageError::Unavailable {
            key: key.to_string(),
            source,
        }
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.record_path(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Self::unavailable(key, e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.record_path(key);

        // NamedTempFile is created 0o600 on unix, and rename keeps the mode.
        let mut temp = NamedTempFile::new_in(&self.dir).map_err(|e| Self::unavailable(key, e))?;
        temp.write_all(value.as_bytes())
            .and_then(|_| temp.as_file().sync_all())
            .map_err(|e| Self::unavailable(key, e))?;
        temp.persist(&path)
            .map_err(|e| Self::unavailable(key, e.error))?;

        debug!(key, bytes = value.len(), "Record written");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.record_path(key)) {
            Ok(()) => {
                debug!(key, "Record removed");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Self::unavailable(key, e)),
        }
    }
}

/// In-process storage. Nothing survives the value being dropped.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    records: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Creates empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates storage pre-populated with one record.
    pub fn with_record(key: &str, value: &str) -> Self {
        let storage = Self::new();
        storage
            .records
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        storage
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.records.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.records
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.records.borrow_mut().remove(key);
        Ok(())
    }
}
