//! Calendar navigation state and the render model derived from it.
//!
//! `CalendarViewState` is plain data: the displayed month and the selected
//! date. `CalendarController` owns one together with the `EntryStore`, applies
//! user actions to it and derives a fresh `RenderModel` on request. The render
//! model is never patched in place; after any save or delete the caller asks
//! for a new one.

use crate::calendar::date_index::{self, Cell};
use crate::constants;
use crate::diary::{EntryChange, EntryStore};
use crate::errors::{AppResult, InputError, StorageError};
use crate::storage::KeyValueStorage;
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeSet;
use tracing::debug;

/// What the calendar is showing and which day is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarViewState {
    /// Displayed month, zero-based (0 = January).
    pub current_month: u32,
    /// Displayed year.
    pub current_year: i32,
    /// The selected day.
    pub selected_date: NaiveDate,
}

impl CalendarViewState {
    /// State showing the month of `date` with `date` selected.
    pub fn starting_at(date: NaiveDate) -> Self {
        CalendarViewState {
            current_month: date.month0(),
            current_year: date.year(),
            selected_date: date,
        }
    }

    /// Moves the displayed month by `delta` months, carrying into the year.
    ///
    /// ```
    /// use daybook::calendar::CalendarViewState;
    /// use chrono::NaiveDate;
    ///
    /// let mut state = CalendarViewState::starting_at(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
    /// state.navigate_month(-1);
    /// assert_eq!((state.current_year, state.current_month), (2023, 11));
    /// ```
    pub fn navigate_month(&mut self, delta: i32) {
        let months_per_year = constants::MONTHS_PER_YEAR as i64;
        let absolute =
            self.current_year as i64 * months_per_year + self.current_month as i64 + delta as i64;
        self.current_year = absolute.div_euclid(months_per_year) as i32;
        self.current_month = absolute.rem_euclid(months_per_year) as u32;
    }

    /// Selects `date` without changing the displayed month.
    pub fn select_date(&mut self, date: NaiveDate) {
        self.selected_date = date;
    }

    /// Selects `date` and shows its month. Month, year and selection always move together.
    pub fn go_to_date(&mut self, date: NaiveDate) {
        *self = CalendarViewState::starting_at(date);
    }

    /// Whether `date` falls in the displayed month.
    pub fn displays(&self, date: NaiveDate) -> bool {
        date.year() == self.current_year && date.month0() == self.current_month
    }
}

/// Dates the view should mark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderMarkers {
    /// Today's date.
    pub today: NaiveDate,
    /// The selected date.
    pub selected: NaiveDate,
    /// Days of the displayed month that have an entry.
    pub has_entry: BTreeSet<NaiveDate>,
}

/// Per-cell markers, as looked up from `RenderMarkers`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellMarks {
    /// The cell is today.
    pub today: bool,
    /// The cell is the selected day.
    pub selected: bool,
    /// The day has a diary entry.
    pub has_entry: bool,
}

/// Everything needed to draw the calendar for the current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderModel {
    /// Heading such as "June 2024".
    pub month_label: String,
    /// Sunday-first grid cells, see `date_index::build_month_grid`.
    pub grid: Vec<Cell>,
    /// Today, the selection and the days with entries.
    pub markers: RenderMarkers,
}

impl RenderModel {
    /// Markers for a single date.
    pub fn marks_for(&self, date: NaiveDate) -> CellMarks {
        CellMarks {
            today: self.markers.today == date,
            selected: self.markers.selected == date,
            has_entry: self.markers.has_entry.contains(&date),
        }
    }
}

/// Applies calendar actions and derives render models.
///
/// `today` is fixed when the controller is created so that every render in a
/// session agrees on it.
///
/// # Examples
///
/// ```
/// use daybook::calendar::CalendarController;
/// use daybook::diary::EntryStore;
/// use daybook::storage::MemoryStorage;
/// use chrono::NaiveDate;
///
/// let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
/// let mut calendar = CalendarController::new(EntryStore::new(MemoryStorage::new()), today);
///
/// calendar.save_selected("hi").unwrap();
/// assert!(calendar.render_model().marks_for(today).has_entry);
/// assert_eq!(calendar.selected_entry_text(), "hi");
/// ```
#[derive(Debug)]
pub struct CalendarController<S> {
    store: EntryStore<S>,
    state: CalendarViewState,
    today: NaiveDate,
}

impl<S: KeyValueStorage> CalendarController<S> {
    /// Controller showing today's month with today selected.
    pub fn new(store: EntryStore<S>, today: NaiveDate) -> Self {
        CalendarController {
            store,
            state: CalendarViewState::starting_at(today),
            today,
        }
    }

    /// The entry store.
    pub fn store(&self) -> &EntryStore<S> {
        &self.store
    }

    /// Current navigation state.
    pub fn state(&self) -> &CalendarViewState {
        &self.state
    }

    /// The date treated as today.
    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Shows the previous (`-1`) or next (`+1`) month. The selection is kept.
    pub fn navigate_month(&mut self, delta: i32) {
        self.state.navigate_month(delta);
        debug!(
            year = self.state.current_year,
            month = self.state.current_month,
            "Navigated month"
        );
    }

    /// Selects `date`; the displayed month is left alone.
    pub fn select_date(&mut self, date: NaiveDate) {
        self.state.select_date(date);
    }

    /// Selects day `day` of the displayed month, as a click on a day cell does.
    ///
    /// # Errors
    ///
    /// Returns `InputError::DayOutOfRange` if the month has no such day.
    pub fn select_day(&mut self, day: u32) -> Result<NaiveDate, InputError> {
        let (year, month) = (self.state.current_year, self.state.current_month);
        let date = NaiveDate::from_ymd_opt(year, month + 1, day).ok_or_else(|| {
            InputError::DayOutOfRange {
                day,
                month_label: date_index::month_label(year, month),
            }
        })?;
        self.state.select_date(date);
        Ok(date)
    }

    /// Selects `date` and shows its month.
    pub fn go_to_date(&mut self, date: NaiveDate) {
        self.state.go_to_date(date);
    }

    /// Selects today and shows today's month.
    pub fn jump_to_today(&mut self) {
        self.state.go_to_date(self.today);
    }

    /// Derives the render model from the current state and stored entries.
    pub fn render_model(&self) -> RenderModel {
        let (year, month) = (self.state.current_year, self.state.current_month);
        let diary = self.store.load();
        let has_entry = diary
            .dates()
            .filter(|date| self.state.displays(*date))
            .collect();

        RenderModel {
            month_label: date_index::month_label(year, month),
            grid: date_index::build_month_grid(year, month),
            markers: RenderMarkers {
                today: self.today,
                selected: self.state.selected_date,
                has_entry,
            },
        }
    }

    /// Text of the selected day's entry, or an empty string.
    pub fn selected_entry_text(&self) -> String {
        self.store
            .load()
            .get(self.state.selected_date)
            .unwrap_or_default()
            .to_string()
    }

    /// Saves `text` for the selected date.
    ///
    /// # Errors
    ///
    /// - `InputError::EmptyEntry` if `text` is blank; nothing is written
    /// - `StorageError` if the diary cannot be written
    pub fn save_selected(&self, text: &str) -> AppResult<EntryChange> {
        if text.trim().is_empty() {
            return Err(InputError::EmptyEntry.into());
        }
        Ok(self.store.upsert(self.state.selected_date, text)?)
    }

    /// Deletes the selected date's entry. Returns whether there was one.
    pub fn delete_selected(&self) -> Result<bool, StorageError> {
        self.store.remove(self.state.selected_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use crate::storage::MemoryStorage;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn controller(today: NaiveDate) -> CalendarController<MemoryStorage> {
        CalendarController::new(EntryStore::new(MemoryStorage::new()), today)
    }

    #[test]
    fn test_starts_on_today() {
        let calendar = controller(date(2024, 6, 15));
        assert_eq!(
            *calendar.state(),
            CalendarViewState {
                current_month: 5,
                current_year: 2024,
                selected_date: date(2024, 6, 15),
            }
        );
    }

    #[test]
    fn test_navigate_month_wraps_backwards() {
        let mut state = CalendarViewState::starting_at(date(2024, 1, 1));
        state.navigate_month(-1);
        assert_eq!((state.current_year, state.current_month), (2023, 11));
    }

    #[test]
    fn test_navigate_month_wraps_forwards() {
        let mut state = CalendarViewState::starting_at(date(2024, 12, 1));
        state.navigate_month(1);
        assert_eq!((state.current_year, state.current_month), (2025, 0));
    }

    #[test]
    fn test_navigate_month_multiple_steps() {
        let mut state = CalendarViewState::starting_at(date(2024, 3, 1));
        state.navigate_month(-15);
        assert_eq!((state.current_year, state.current_month), (2022, 11));
        state.navigate_month(25);
        assert_eq!((state.current_year, state.current_month), (2025, 0));
    }

    #[test]
    fn test_navigate_keeps_selection() {
        let mut calendar = controller(date(2024, 6, 15));
        calendar.navigate_month(1);
        assert_eq!(calendar.state().selected_date, date(2024, 6, 15));
        assert_eq!(calendar.state().current_month, 6);
    }

    #[test]
    fn test_select_date_keeps_displayed_month() {
        let mut calendar = controller(date(2024, 6, 15));
        calendar.select_date(date(2024, 6, 3));
        assert_eq!(calendar.state().selected_date, date(2024, 6, 3));
        assert_eq!(calendar.state().current_month, 5);
    }

    #[test]
    fn test_select_day_in_displayed_month() {
        let mut calendar = controller(date(2024, 6, 15));
        calendar.navigate_month(-4);

        assert_eq!(calendar.select_day(29).unwrap(), date(2024, 2, 29));
        assert_eq!(calendar.state().selected_date, date(2024, 2, 29));
    }

    #[test]
    fn test_select_day_out_of_range() {
        let mut calendar = controller(date(2023, 2, 10));

        let err = calendar.select_day(29).unwrap_err();
        assert_eq!(
            err,
            InputError::DayOutOfRange {
                day: 29,
                month_label: "February 2023".to_string()
            }
        );
        assert!(calendar.select_day(0).is_err());
        assert_eq!(calendar.state().selected_date, date(2023, 2, 10));
    }

    #[test]
    fn test_jump_to_today_resyncs_month_and_selection() {
        let mut calendar = controller(date(2024, 6, 15));
        calendar.navigate_month(-7);
        calendar.select_day(3).unwrap();

        calendar.jump_to_today();

        assert_eq!(*calendar.state(), CalendarViewState::starting_at(date(2024, 6, 15)));
    }

    #[test]
    fn test_go_to_date_moves_month_with_selection() {
        let mut calendar = controller(date(2024, 6, 15));
        calendar.go_to_date(date(2019, 11, 30));
        assert_eq!(calendar.state().current_year, 2019);
        assert_eq!(calendar.state().current_month, 10);
        assert_eq!(calendar.state().selected_date, date(2019, 11, 30));
    }

    #[test]
    fn test_render_model_marks() {
        let calendar = controller(date(2024, 6, 15));
        calendar.store().upsert(date(2024, 6, 1), "first").unwrap();
        calendar.store().upsert(date(2024, 6, 20), "later").unwrap();
        calendar.store().upsert(date(2024, 7, 1), "next month").unwrap();

        let model = calendar.render_model();

        assert_eq!(model.month_label, "June 2024");
        assert_eq!(model.grid, date_index::build_month_grid(2024, 5));
        assert_eq!(model.markers.today, date(2024, 6, 15));
        assert_eq!(model.markers.selected, date(2024, 6, 15));
        assert_eq!(
            model.markers.has_entry.iter().copied().collect::<Vec<_>>(),
            vec![date(2024, 6, 1), date(2024, 6, 20)]
        );
        assert_eq!(
            model.marks_for(date(2024, 6, 15)),
            CellMarks {
                today: true,
                selected: true,
                has_entry: false
            }
        );
    }

    #[test]
    fn test_render_model_today_outside_displayed_month() {
        let mut calendar = controller(date(2024, 6, 15));
        calendar.navigate_month(1);

        let model = calendar.render_model();
        assert_eq!(model.month_label, "July 2024");
        assert!(model
            .grid
            .iter()
            .filter_map(Cell::date)
            .all(|d| !model.marks_for(d).today && !model.marks_for(d).selected));
    }

    #[test]
    fn test_save_rejects_blank_text() {
        let calendar = controller(date(2024, 6, 15));
        calendar.save_selected("keep me").unwrap();

        match calendar.save_selected("   ") {
            Err(AppError::Input(InputError::EmptyEntry)) => {}
            other => panic!("Expected EmptyEntry, got {:?}", other),
        }
        assert_eq!(calendar.selected_entry_text(), "keep me");
    }

    #[test]
    fn test_save_and_delete_end_to_end() {
        let day = date(2024, 6, 15);
        let calendar = controller(day);

        assert_eq!(calendar.save_selected("hi").unwrap(), EntryChange::Saved);
        assert!(calendar.render_model().marks_for(day).has_entry);
        assert_eq!(calendar.selected_entry_text(), "hi");

        assert!(calendar.delete_selected().unwrap());
        assert!(!calendar.render_model().marks_for(day).has_entry);
        assert_eq!(calendar.selected_entry_text(), "");
        assert!(!calendar.delete_selected().unwrap());
    }
}
