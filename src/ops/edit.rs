//! Saving and deleting diary entries on behalf of the user.
//!
//! Destructive actions ask for confirmation first and report what happened so
//! the caller can tell the user and re-render.

use crate::calendar::CalendarController;
use crate::constants;
use crate::diary::{EntryChange, EntryStore};
use crate::errors::AppResult;
use crate::interaction::Confirm;
use crate::storage::KeyValueStorage;
use tracing::info;

/// Result of a delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The entry was removed.
    Deleted,
    /// The selected day had no entry; nobody was asked anything.
    NothingToDelete,
    /// The user declined.
    Cancelled,
}

/// Result of a clear-all request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    /// Every entry was removed; holds how many there were.
    Cleared(usize),
    /// The user declined.
    Cancelled,
}

/// Saves `text` for the selected day.
///
/// # Errors
///
/// Blank text is rejected with `InputError::EmptyEntry`; storage failures
/// propagate. In both cases nothing changes.
pub fn save_entry<S: KeyValueStorage>(
    calendar: &CalendarController<S>,
    text: &str,
) -> AppResult<EntryChange> {
    let change = calendar.save_selected(text)?;
    info!(?change, "Entry saved from user action");
    Ok(change)
}

/// Deletes the selected day's entry after confirmation.
///
/// # Errors
///
/// Returns `StorageError` if the diary cannot be read or written. An
/// unreadable diary is never reported as having no entry.
pub fn delete_entry<S, C>(calendar: &CalendarController<S>, confirm: &mut C) -> AppResult<DeleteOutcome>
where
    S: KeyValueStorage,
    C: Confirm + ?Sized,
{
    let selected = calendar.state().selected_date;
    if !calendar.store().try_load()?.contains(selected) {
        return Ok(DeleteOutcome::NothingToDelete);
    }

    if !confirm.confirm(constants::CONFIRM_DELETE_PROMPT) {
        info!("Delete cancelled by user");
        return Ok(DeleteOutcome::Cancelled);
    }

    if calendar.delete_selected()? {
        Ok(DeleteOutcome::Deleted)
    } else {
        Ok(DeleteOutcome::NothingToDelete)
    }
}

/// Deletes every entry after confirmation.
///
/// # Errors
///
/// Returns `StorageError` if the diary cannot be read or removed.
pub fn clear_all_entries<S, C>(store: &EntryStore<S>, confirm: &mut C) -> AppResult<ClearOutcome>
where
    S: KeyValueStorage,
    C: Confirm + ?Sized,
{
    if !confirm.confirm(constants::CONFIRM_CLEAR_PROMPT) {
        info!("Clear-all cancelled by user");
        return Ok(ClearOutcome::Cancelled);
    }

    let count = store.try_load()?.len();
    store.clear()?;
    Ok(ClearOutcome::Cleared(count))
}
