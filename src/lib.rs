/*!
# Daybook

Daybook is a calendar-driven personal diary. Each day of the calendar can hold
one free-text entry; days with entries are marked on the month grid, and the
whole diary can be listed, searched and exported as plain text.

## Core Features

- Month grid with today, the selected day and days with entries marked
- Write, show and delete the entry of any day
- List all entries newest first, or search them by keyword with highlighted matches
- Export to plain text or to the terminal clipboard
- Light and dark themes, remembered between sessions
- An interactive shell for navigating the calendar

## Architecture

- `storage`: key-value records persisted as files in the data directory
- `diary`: the entry store and its load/mutate/persist contract
- `calendar`: date arithmetic and the navigation controller
- `search`: read-only projections for listing and keyword search
- `ops`: user actions with confirmation and outcomes
- `view` and `shell`: terminal rendering and the interactive session
- `cli`, `config`, `errors`: command line, environment configuration and error types

## Usage Example

```rust
use chrono::NaiveDate;
use daybook::{CalendarController, EntryStore};
use daybook::storage::MemoryStorage;

fn main() -> daybook::AppResult<()> {
    let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
    let calendar = CalendarController::new(EntryStore::new(MemoryStorage::new()), today);

    calendar.save_selected("Went for a long walk.")?;
    assert!(calendar.render_model().marks_for(today).has_entry);
    Ok(())
}
```
*/

/// Calendar arithmetic, navigation state and render model
pub mod calendar;
/// Command-line interface for parsing and handling user arguments
pub mod cli;
/// Configuration loading and management
pub mod config;
/// Application-wide constants
pub mod constants;
/// Diary entries and the entry store
pub mod diary;
/// Error types and utilities for error handling
pub mod errors;
/// Confirmation prompts and clipboard access
pub mod interaction;
/// User-facing diary actions
pub mod ops;
/// Listing, search and export projections
pub mod search;
/// Interactive calendar session
pub mod shell;
/// Persistent key-value storage
pub mod storage;
/// Light/dark theme preference
pub mod theme;
/// Terminal rendering
pub mod view;

// Re-export important types for convenience
pub use calendar::CalendarController;
pub use cli::CliArgs;
pub use config::Config;
pub use diary::{DiaryStore, EntryStore};
pub use errors::{AppError, AppResult};
pub use theme::Theme;
