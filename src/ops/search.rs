//! Listing, keyword search and export of diary entries.

use crate::diary::EntryStore;
use crate::errors::AppResult;
use crate::interaction::Clipboard;
use crate::search::{self, ProjectionResult, SearchTerm};
use crate::storage::KeyValueStorage;
use tracing::info;

/// Every entry, newest first.
pub fn list_entries<S: KeyValueStorage>(store: &EntryStore<S>) -> ProjectionResult {
    search::list_all(&store.load())
}

/// Entries containing `raw_term`, newest first, with highlights and counts.
///
/// # Errors
///
/// Returns `InputError::EmptySearchTerm` for a blank term; nothing is searched.
pub fn search_entries<S: KeyValueStorage>(
    store: &EntryStore<S>,
    raw_term: &str,
) -> AppResult<(SearchTerm, ProjectionResult)> {
    let term = SearchTerm::new(raw_term)?;
    let result = search::search(&store.load(), &term);
    info!(
        entries = result.total_count,
        matches = result.match_count,
        "Search completed"
    );
    Ok((term, result))
}

/// Copies the plain-text export of `result` to the clipboard. Returns the
/// number of entries copied.
///
/// # Errors
///
/// Returns `ClipboardError` if the clipboard cannot be written. The diary is
/// never touched.
pub fn copy_entries<C: Clipboard + ?Sized>(
    result: &ProjectionResult,
    clipboard: &mut C,
) -> AppResult<usize> {
    clipboard.copy(&search::export_plain_text(result))?;
    info!(entries = result.total_count, "Entries copied to clipboard");
    Ok(result.total_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{AppError, ClipboardError, InputError};
    use crate::storage::MemoryStorage;
    use chrono::NaiveDate;
    use std::io;

    #[derive(Default)]
    struct RecordingClipboard {
        copied: Vec<String>,
    }

    impl Clipboard for RecordingClipboard {
        fn copy(&mut self, text: &str) -> Result<(), ClipboardError> {
            self.copied.push(text.to_string());
            Ok(())
        }
    }

    struct DeniedClipboard;

    impl Clipboard for DeniedClipboard {
        fn copy(&mut self, _text: &str) -> Result<(), ClipboardError> {
            Err(ClipboardError::Unavailable(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "clipboard access denied",
            )))
        }
    }

    fn store() -> EntryStore<MemoryStorage> {
        let store = EntryStore::new(MemoryStorage::new());
        store
            .upsert(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(), "a walk with the dog")
            .unwrap();
        store
            .upsert(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(), "Dog park, dog nap")
            .unwrap();
        store
            .upsert(NaiveDate::from_ymd_opt(2024, 2, 10).unwrap(), "quiet day")
            .unwrap();
        store
    }

    #[test]
    fn test_list_entries() {
        let result = list_entries(&store());
        assert_eq!(result.total_count, 3);
        assert_eq!(result.entries[0].date_key(), "2024-03-01");
    }

    #[test]
    fn test_search_entries() {
        let (term, result) = search_entries(&store(), "  DOG ").unwrap();
        assert_eq!(term.as_str(), "DOG");
        assert_eq!(result.total_count, 2);
        assert_eq!(result.match_count, 3);
    }

    #[test]
    fn test_search_entries_rejects_blank_term() {
        assert!(matches!(
            search_entries(&store(), "   "),
            Err(AppError::Input(InputError::EmptySearchTerm))
        ));
    }

    #[test]
    fn test_copy_entries_copies_export_text() {
        let (_, result) = search_entries(&store(), "dog").unwrap();
        let mut clipboard = RecordingClipboard::default();

        assert_eq!(copy_entries(&result, &mut clipboard).unwrap(), 2);
        assert_eq!(
            clipboard.copied,
            vec!["2024-03-01, Dog park, dog nap\n2024-01-05, a walk with the dog\n".to_string()]
        );
    }

    #[test]
    fn test_copy_failure_leaves_diary_intact() {
        let store = store();
        let result = list_entries(&store);

        assert!(matches!(
            copy_entries(&result, &mut DeniedClipboard),
            Err(AppError::Clipboard(_))
        ));
        assert_eq!(store.load().len(), 3);
    }
}
