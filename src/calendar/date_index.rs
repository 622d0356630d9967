//! Pure date arithmetic for the calendar: date keys, month lengths and the
//! Sunday-first month grid. Nothing here touches storage or the clock, except
//! `today()`.
//!
//! Months are zero-based throughout the calendar (0 = January … 11 = December).

use crate::constants;
use crate::errors::InputError;
use chrono::{Datelike, Local, NaiveDate};

/// One cell of the 7-column month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    /// Padding before the first day of the month. Carries no date.
    Empty,
    /// A day of the displayed month.
    Day {
        /// Day of month, starting at 1.
        day: u32,
        /// The calendar date of this cell.
        date: NaiveDate,
    },
}

impl Cell {
    /// The date of a day cell, `None` for padding.
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            Cell::Empty => None,
            Cell::Day { date, .. } => Some(*date),
        }
    }
}

/// Formats a date as its storage key, `YYYY-MM-DD`.
///
/// ```
/// use daybook::calendar::date_index::format;
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2024, 6, 5).unwrap();
/// assert_eq!(format(date), "2024-06-05");
/// ```
pub fn format(date: NaiveDate) -> String {
    date.format(constants::DATE_FORMAT_ISO).to_string()
}

/// Parses a date in `YYYY-MM-DD` or compact `YYYYMMDD` form.
///
/// # Errors
///
/// Returns `InputError::InvalidDate` if neither format matches a real date.
pub fn parse(input: &str) -> Result<NaiveDate, InputError> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, constants::DATE_FORMAT_ISO)
        .or_else(|_| NaiveDate::parse_from_str(trimmed, constants::DATE_FORMAT_COMPACT))
        .map_err(|_| InputError::InvalidDate(input.to_string()))
}

/// Parses a storage key. Only the canonical zero-padded `YYYY-MM-DD` form is a key.
pub fn parse_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, constants::DATE_FORMAT_ISO)
        .ok()
        .filter(|date| format(*date) == key)
}

/// Parses a `YYYY-MM` month into `(year, zero_based_month)`.
///
/// # Errors
///
/// Returns `InputError::InvalidMonth` for anything else.
pub fn parse_month(input: &str) -> Result<(i32, u32), InputError> {
    let invalid = || InputError::InvalidMonth(input.to_string());
    let (year, month) = input.trim().split_once('-').ok_or_else(invalid)?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    if !(1..=constants::MONTHS_PER_YEAR).contains(&month) {
        return Err(invalid());
    }
    first_of_month(year, month - 1).ok_or_else(invalid)?;
    Ok((year, month - 1))
}

/// First day of `month` (zero-based) in `year`, if representable.
pub fn first_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month + 1, 1)
}

/// Number of days in `month` (zero-based) of `year`, leap years included.
///
/// Computed as the day before the first of the following month.
///
/// ```
/// use daybook::calendar::date_index::days_in_month;
///
/// assert_eq!(days_in_month(2024, 1), 29);
/// assert_eq!(days_in_month(2023, 1), 28);
/// assert_eq!(days_in_month(2024, 11), 31);
/// ```
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month + 1 >= constants::MONTHS_PER_YEAR {
        (year + 1, 0)
    } else {
        (year, month + 1)
    };
    first_of_month(next_year, next_month)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(0)
}

/// Weekday of the first day of `month` (zero-based), 0 = Sunday … 6 = Saturday.
pub fn first_weekday_of_month(year: i32, month: u32) -> u32 {
    first_of_month(year, month)
        .map(|first| first.weekday().num_days_from_sunday())
        .unwrap_or(0)
}

/// Builds the cells of a Sunday-first month grid: one `Empty` per weekday before
/// the 1st, then one `Day` per day of the month, in order.
pub fn build_month_grid(year: i32, month: u32) -> Vec<Cell> {
    let leading = first_weekday_of_month(year, month) as usize;
    let days = days_in_month(year, month);

    let mut cells = Vec::with_capacity(leading + days as usize);
    cells.extend(std::iter::repeat(Cell::Empty).take(leading));
    cells.extend((1..=days).filter_map(|day| {
        NaiveDate::from_ymd_opt(year, month + 1, day).map(|date| Cell::Day { day, date })
    }));
    cells
}

/// Label for the displayed month, e.g. "June 2024".
pub fn month_label(year: i32, month: u32) -> String {
    match first_of_month(year, month) {
        Some(first) => first.format(constants::MONTH_LABEL_FORMAT).to_string(),
        None => format!("{:04}-{:02}", year, month + 1),
    }
}

/// Today's date in the local timezone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
