//! User-facing diary actions.
//!
//! Each function performs one action end to end (validate, confirm when
//! destructive, read/write the store) and returns an outcome the caller can
//! report. The calendar is re-rendered by the caller afterwards.

pub mod edit;
pub mod search;

pub use edit::{clear_all_entries, delete_entry, save_entry, ClearOutcome, DeleteOutcome};
pub use search::{copy_entries, list_entries, search_entries};
