//! Diary entries and their persistence.
//!
//! `DiaryStore` is the in-memory value of the whole diary: date → text, ordered
//! by date. `EntryStore` is the only way entries reach durable storage. Every
//! mutation loads the current map, changes it in memory and writes the whole
//! map back as one JSON record, so there is no cache to fall out of sync.
//!
//! # Invariants
//! - No date maps to empty or whitespace-only text. Writing blank text deletes
//!   the date instead.
//! - Every key is a real calendar date in canonical `YYYY-MM-DD` form.

use crate::calendar::date_index;
use crate::constants;
use crate::errors::StorageError;
use crate::storage::KeyValueStorage;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Snapshot of every diary entry, ordered by date ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiaryStore {
    entries: BTreeMap<NaiveDate, String>,
}

impl DiaryStore {
    /// Creates an empty diary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Text of the entry for `date`.
    pub fn get(&self, date: NaiveDate) -> Option<&str> {
        self.entries.get(&date).map(String::as_str)
    }

    /// Whether `date` has an entry.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.entries.contains_key(&date)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the diary has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in ascending date order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (NaiveDate, &str)> + '_ {
        self.entries.iter().map(|(date, text)| (*date, text.as_str()))
    }

    /// Dates that have an entry, ascending.
    pub fn dates(&self) -> impl DoubleEndedIterator<Item = NaiveDate> + '_ {
        self.entries.keys().copied()
    }

    /// Applies the write rule: blank text removes `date`, anything else is
    /// stored trimmed. Returns what changed.
    fn apply(&mut self, date: NaiveDate, text: &str) -> EntryChange {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            if self.entries.remove(&date).is_some() {
                EntryChange::Removed
            } else {
                EntryChange::Unchanged
            }
        } else {
            self.entries.insert(date, trimmed.to_string());
            EntryChange::Saved
        }
    }

    fn to_json(&self) -> Result<String, StorageError> {
        let record: BTreeMap<String, &str> = self
            .iter()
            .map(|(date, text)| (date_index::format(date), text))
            .collect();
        Ok(serde_json::to_string(&record)?)
    }

    /// Decodes a persisted record, dropping keys that are not canonical dates
    /// and blank values. Returns `None` if the payload is not a JSON object of
    /// strings at all.
    fn from_json(payload: &str) -> Option<Self> {
        let record: BTreeMap<String, String> = match serde_json::from_str(payload) {
            Ok(record) => record,
            Err(e) => {
                warn!(error = %e, "Persisted diary is malformed; treating it as empty");
                return None;
            }
        };

        let mut store = DiaryStore::new();
        for (key, text) in record {
            match date_index::parse_key(&key) {
                Some(date) if !text.trim().is_empty() => {
                    store.entries.insert(date, text);
                }
                Some(_) => warn!(key = %key, "Dropping blank persisted entry"),
                None => warn!(key = %key, "Dropping persisted entry with an invalid date key"),
            }
        }
        Some(store)
    }
}

impl FromIterator<(NaiveDate, String)> for DiaryStore {
    /// Builds a diary applying the same write rule as `EntryStore::upsert`.
    fn from_iter<I: IntoIterator<Item = (NaiveDate, String)>>(iter: I) -> Self {
        let mut store = DiaryStore::new();
        for (date, text) in iter {
            store.apply(date, &text);
        }
        store
    }
}

/// Outcome of a write through `EntryStore::upsert`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryChange {
    /// The entry was created or replaced.
    Saved,
    /// Blank text removed an existing entry.
    Removed,
    /// Blank text for a date without an entry. Nothing was written.
    Unchanged,
}

/// Persistence of diary entries as a single JSON record.
///
/// # Examples
///
/// ```
/// use daybook::diary::EntryStore;
/// use daybook::storage::MemoryStorage;
/// use chrono::NaiveDate;
///
/// let store = EntryStore::new(MemoryStorage::new());
/// let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
///
/// store.upsert(date, "  went hiking  ").unwrap();
/// assert_eq!(store.load().get(date), Some("went hiking"));
///
/// store.upsert(date, "   ").unwrap();
/// assert!(store.load().is_empty());
/// ```
#[derive(Debug)]
pub struct EntryStore<S> {
    storage: S,
}

impl<S: KeyValueStorage> EntryStore<S> {
    /// Wraps a storage backend.
    pub fn new(storage: S) -> Self {
        EntryStore { storage }
    }

    /// The storage backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Reads the diary for display.
    ///
    /// Never fails: a missing or malformed record, or a storage read failure,
    /// yields an empty diary and a logged warning.
    pub fn load(&self) -> DiaryStore {
        match self.try_load() {
            Ok(store) => store,
            Err(e) => {
                warn!(error = %e, "Could not read diary; showing it as empty");
                DiaryStore::new()
            }
        }
    }

    /// Reads the diary, propagating storage failures.
    ///
    /// Malformed data still reads as empty. Mutations go through this so that a
    /// storage outage can never be mistaken for an empty diary and written back.
    pub fn try_load(&self) -> Result<DiaryStore, StorageError> {
        let payload = self.storage.get(constants::DIARY_STORAGE_KEY)?;
        let store = payload
            .as_deref()
            .and_then(DiaryStore::from_json)
            .unwrap_or_default();
        debug!(entries = store.len(), "Diary loaded");
        Ok(store)
    }

    /// Saves `text` for `date`, or removes the entry when `text` is blank.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the diary cannot be read or written; the durable
    /// record is then unchanged.
    pub fn upsert(&self, date: NaiveDate, text: &str) -> Result<EntryChange, StorageError> {
        let mut store = self.try_load()?;
        let change = store.apply(date, text);
        if change != EntryChange::Unchanged {
            self.persist(&store)?;
            info!(date = %date_index::format(date), ?change, "Diary entry written");
        }
        Ok(change)
    }

    /// Removes the entry for `date`. Returns whether there was one.
    ///
    /// Removing a date without an entry writes nothing.
    pub fn remove(&self, date: NaiveDate) -> Result<bool, StorageError> {
        let mut store = self.try_load()?;
        if store.entries.remove(&date).is_none() {
            debug!(date = %date_index::format(date), "No entry to remove");
            return Ok(false);
        }
        self.persist(&store)?;
        info!(date = %date_index::format(date), "Diary entry removed");
        Ok(true)
    }

    /// Deletes the whole diary record.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.storage.remove(constants::DIARY_STORAGE_KEY)?;
        info!("Diary cleared");
        Ok(())
    }

    fn persist(&self, store: &DiaryStore) -> Result<(), StorageError> {
        let payload = store.to_json()?;
        self.storage.set(constants::DIARY_STORAGE_KEY, &payload)
    }
}
