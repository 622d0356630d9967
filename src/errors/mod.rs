//! Error handling utilities for the daybook application.
//!
//! This module provides the central error type `AppError` which represents all
//! possible error conditions that might occur in the application, as well as the
//! convenience type alias `AppResult` for functions that can return these errors.
//!
//! Malformed persisted data is deliberately absent from this module: the entry
//! store logs it and carries on with an empty diary instead of failing.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Represents failures of the durable key-value storage.
///
/// Any of these leave both the in-memory state and the durable record exactly as
/// they were before the failed operation.
///
/// # Examples
///
/// ```
/// use daybook::errors::StorageError;
/// use std::io::{self, ErrorKind};
///
/// let error = StorageError::Unavailable {
///     key: "myDiaryEntries".to_string(),
///     source: io::Error::new(ErrorKind::PermissionDenied, "permission denied"),
/// };
///
/// assert!(format!("{}", error).contains("myDiaryEntries"));
/// assert!(format!("{}", error).contains("permission denied"));
/// ```
#[derive(Debug, Error)]
pub enum StorageError {
    /// The durable store could not be read or written (disabled, full, no permission).
    #[error("Storage unavailable for record '{key}': {source}. Please check that the data directory exists, is writable and the disk is not full.")]
    Unavailable {
        /// The record key that was being accessed
        key: String,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The storage directory could not be created or prepared.
    #[error("Storage directory {path} is unavailable: {source}. Please check permissions or set DAYBOOK_DIR to a writable location.")]
    DirectoryUnavailable {
        /// The directory that could not be prepared
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The diary could not be encoded for writing.
    #[error("Failed to encode diary data: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Represents user input that was rejected before any state changed.
///
/// # Examples
///
/// ```
/// use daybook::errors::InputError;
///
/// let error = InputError::EmptyEntry;
/// assert!(format!("{}", error).contains("empty"));
/// ```
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    /// The user attempted to save blank content.
    #[error("Entry text is empty. Please write something before saving.")]
    EmptyEntry,

    /// The user attempted to search with a blank term.
    #[error("Search term is empty. Please enter a keyword to search for.")]
    EmptySearchTerm,

    /// The search term could not be turned into a matcher (it is far too long).
    #[error("Search term is too long to search for ({0} characters).")]
    SearchTermTooLong(usize),

    /// A date argument could not be parsed.
    #[error("Invalid date format: '{0}'. Use YYYY-MM-DD or YYYYMMDD.")]
    InvalidDate(String),

    /// A month argument could not be parsed.
    #[error("Invalid month format: '{0}'. Use YYYY-MM.")]
    InvalidMonth(String),

    /// A day number does not exist in the displayed month.
    #[error("Day {day} does not exist in {month_label}.")]
    DayOutOfRange {
        /// The requested day of month
        day: u32,
        /// Label of the displayed month
        month_label: String,
    },
}

/// Represents a failed clipboard export. Diary data is never affected.
#[derive(Debug, Error)]
pub enum ClipboardError {
    /// The clipboard could not be written.
    #[error("Clipboard unavailable: {0}. The diary is unchanged; use `daybook export` and copy the output manually.")]
    Unavailable(#[source] io::Error),
}

/// Represents all possible errors that can occur in the daybook application.
///
/// This enum is the central error type used across the application, with variants
/// for different error categories. It uses `thiserror` for deriving the `Error` trait
/// implementation and formatted error messages.
///
/// # Examples
///
/// Creating a configuration error:
/// ```
/// use daybook::errors::AppError;
///
/// let error = AppError::Config("Data directory path is empty".to_string());
/// assert_eq!(format!("{}", error), "Configuration error: Data directory path is empty");
/// ```
///
/// Converting from an IO error:
/// ```
/// use daybook::errors::AppError;
/// use std::io::{self, ErrorKind};
///
/// let io_error = io::Error::new(ErrorKind::NotFound, "file not found");
/// let app_error: AppError = io_error.into();
///
/// match app_error {
///     AppError::Io(inner) => assert_eq!(inner.kind(), ErrorKind::NotFound),
///     _ => panic!("Expected Io variant"),
/// }
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Errors related to configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input/output errors outside the storage layer (terminal, stdin).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors reading or writing durable storage.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Rejected user input.
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// Clipboard export failures.
    #[error("Clipboard error: {0}")]
    Clipboard(#[from] ClipboardError),
}

/// A type alias for `Result<T, AppError>` to simplify function signatures.
///
/// # Examples
///
/// ```
/// use daybook::errors::{AppError, AppResult, InputError};
///
/// fn might_fail(text: &str) -> AppResult<String> {
///     if text.trim().is_empty() {
///         return Err(InputError::EmptyEntry.into());
///     }
///     Ok(text.trim().to_string())
/// }
///
/// assert!(matches!(might_fail("  "), Err(AppError::Input(InputError::EmptyEntry))));
/// ```
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;
    use std::io;

    #[test]
    fn test_app_error_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");

        let app_error: AppError = io_error.into();

        match app_error {
            AppError::Io(inner) => {
                assert_eq!(inner.kind(), io::ErrorKind::NotFound);
            }
            _ => panic!("Expected AppError::Io variant"),
        }
    }

    #[test]
    fn test_app_error_display() {
        let config_error = AppError::Config("Invalid configuration".to_string());
        assert_eq!(
            format!("{}", config_error),
            "Configuration error: Invalid configuration"
        );

        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "permission denied");
        let app_io_error = AppError::Io(io_error);
        assert_eq!(format!("{}", app_io_error), "I/O error: permission denied");

        let input_error = AppError::Input(InputError::InvalidDate("2024-13-01".to_string()));
        assert_eq!(
            format!("{}", input_error),
            "Input error: Invalid date format: '2024-13-01'. Use YYYY-MM-DD or YYYYMMDD."
        );
    }

    #[test]
    fn test_storage_error_conversion_to_app_error() {
        let storage_error = StorageError::Unavailable {
            key: "myDiaryEntries".to_string(),
            source: io::Error::new(io::ErrorKind::Other, "disk full"),
        };

        let app_error: AppError = storage_error.into();
        match &app_error {
            AppError::Storage(StorageError::Unavailable { key, .. }) => {
                assert_eq!(key, "myDiaryEntries");
            }
            _ => panic!("Expected AppError::Storage variant"),
        }
        assert!(format!("{}", app_error).starts_with("Storage error: Storage unavailable"));
    }

    #[test]
    fn test_storage_error_source_chaining() {
        let storage_error = StorageError::Unavailable {
            key: "themePreference".to_string(),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only filesystem"),
        };

        let source = storage_error.source().expect("storage error should have a source");
        assert_eq!(source.to_string(), "read-only filesystem");
    }

    #[test]
    fn test_clipboard_error_display_mentions_diary_is_unchanged() {
        let error = ClipboardError::Unavailable(io::Error::new(
            io::ErrorKind::BrokenPipe,
            "terminal closed",
        ));
        let message = format!("{}", AppError::from(error));
        assert!(message.contains("terminal closed"));
        assert!(message.contains("diary is unchanged"));
    }

    #[test]
    fn test_day_out_of_range_display() {
        let error = InputError::DayOutOfRange {
            day: 30,
            month_label: "February 2024".to_string(),
        };
        assert_eq!(
            format!("{}", error),
            "Day 30 does not exist in February 2024."
        );
    }
}
