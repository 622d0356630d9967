//! Constants used throughout the application.
//!
//! This module contains all constants used in the daybook application, organized
//! into logical groups. Having constants centralized makes them easier to find,
//! modify, and reference consistently.

// Application Metadata
/// The name of the application.
pub const APP_NAME: &str = "daybook";
/// The description of the application used in CLI help text.
pub const APP_DESCRIPTION: &str = "A calendar-driven personal diary";

// Logging
/// Log format identifier for plain text.
pub const LOG_FORMAT_TEXT: &str = "text";
/// Log format identifier for JSON.
pub const LOG_FORMAT_JSON: &str = "json";
/// Default log level when `RUST_LOG` is not set.
pub const DEFAULT_LOG_LEVEL: &str = "warn";
/// Log level used when `--verbose` is passed.
pub const VERBOSE_LOG_LEVEL: &str = "debug";
/// Service name used in tracing spans and structured logs.
pub const TRACING_SERVICE_NAME: &str = "daybook";
/// Name for the root tracing span covering an application invocation.
pub const TRACING_ROOT_SPAN_NAME: &str = "app_invocation";

// Configuration Keys & Environment Variables
/// Environment variable for specifying the data directory.
pub const ENV_VAR_DAYBOOK_DIR: &str = "DAYBOOK_DIR";
/// Environment variable selecting the log format (`text` or `json`).
pub const ENV_VAR_DAYBOOK_LOG_FORMAT: &str = "DAYBOOK_LOG_FORMAT";
/// Standard environment variable for the user's home directory.
pub const ENV_VAR_HOME: &str = "HOME";
/// Default sub-directory name for diary data within the user's home directory.
pub const DEFAULT_DATA_SUBDIR: &str = ".daybook";

// Storage Keys
/// Record holding the JSON map of date key to entry text.
pub const DIARY_STORAGE_KEY: &str = "myDiaryEntries";
/// Record holding the theme preference.
pub const THEME_STORAGE_KEY: &str = "themePreference";
/// File extension for records written by the file storage backend.
pub const RECORD_FILE_EXTENSION: &str = "json";
/// Default POSIX permissions for the data directory (owner read/write/execute).
#[cfg(unix)]
pub const DEFAULT_DIR_PERMISSIONS: u32 = 0o700;
/// Default POSIX permissions for record files (owner read/write).
#[cfg(unix)]
pub const DEFAULT_FILE_PERMISSIONS: u32 = 0o600;

// Date/Time Logic
/// Date format string for ISO date format (YYYY-MM-DD). Also the storage key format.
pub const DATE_FORMAT_ISO: &str = "%Y-%m-%d";
/// Date format string for compact date format (YYYYMMDD).
pub const DATE_FORMAT_COMPACT: &str = "%Y%m%d";
/// Format of the month label shown above the grid, e.g. "June 2024".
pub const MONTH_LABEL_FORMAT: &str = "%B %Y";
/// Number of months in a year.
pub const MONTHS_PER_YEAR: u32 = 12;
/// Number of columns in the calendar grid.
pub const DAYS_PER_WEEK: usize = 7;
/// Column headings for the Sunday-first calendar grid.
pub const WEEKDAY_HEADINGS: [&str; DAYS_PER_WEEK] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];

// Prompts
/// Confirmation prompt before deleting the selected day's entry.
pub const CONFIRM_DELETE_PROMPT: &str = "Delete the entry for this day?";
/// Confirmation prompt before deleting every entry.
pub const CONFIRM_CLEAR_PROMPT: &str = "Delete ALL diary entries? This cannot be undone.";
