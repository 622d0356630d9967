//! Text rendering of render models and projections for the terminal.
//!
//! Everything here is a pure function returning a `String`; printing is left to
//! the caller.

use crate::calendar::date_index;
use crate::calendar::{Cell, RenderModel};
use crate::constants;
use crate::search::{ProjectionResult, SearchTerm};
use crate::theme::Theme;
use chrono::NaiveDate;

const CELL_WIDTH: usize = 6;
const ANSI_RESET: &str = "\x1b[0m";

/// How emphasis is drawn: ANSI colours chosen by theme, or plain markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    highlight_open: &'static str,
    highlight_close: &'static str,
    heading_open: &'static str,
    heading_close: &'static str,
}

impl Palette {
    /// Plain-text markers, for pipes and tests.
    pub fn plain() -> Self {
        Palette {
            highlight_open: "**",
            highlight_close: "**",
            heading_open: "",
            heading_close: "",
        }
    }

    /// Colours suited to the given theme.
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Palette {
                highlight_open: "\x1b[1;30;43m",
                highlight_close: ANSI_RESET,
                heading_open: "\x1b[1;34m",
                heading_close: ANSI_RESET,
            },
            Theme::Dark => Palette {
                highlight_open: "\x1b[1;97;45m",
                highlight_close: ANSI_RESET,
                heading_open: "\x1b[1;96m",
                heading_close: ANSI_RESET,
            },
        }
    }
}

/// Draws the month grid.
///
/// Every day cell has the same fixed slots, `[dd]+*`: brackets mark the
/// selected day (blank otherwise), `+` a day with an entry, `*` today.
pub fn render_calendar(model: &RenderModel, palette: &Palette) -> String {
    let grid_width = CELL_WIDTH * constants::DAYS_PER_WEEK;

    let mut out = format!(
        "{}{:^width$}{}\n",
        palette.heading_open,
        model.month_label,
        palette.heading_close,
        width = grid_width
    );
    let headings: String = constants::WEEKDAY_HEADINGS
        .iter()
        .map(|heading| format!(" {:>2}   ", heading))
        .collect();
    out.push_str(headings.trim_end());
    out.push('\n');

    for week in model.grid.chunks(constants::DAYS_PER_WEEK) {
        let line: String = week.iter().map(|cell| render_cell(model, cell)).collect();
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out.push_str("[ ] selected   + has entry   * today\n");
    out
}

fn render_cell(model: &RenderModel, cell: &Cell) -> String {
    match cell {
        Cell::Empty => " ".repeat(CELL_WIDTH),
        Cell::Day { day, date } => {
            let marks = model.marks_for(*date);
            let (open, close) = if marks.selected { ('[', ']') } else { (' ', ' ') };
            format!(
                "{}{:>2}{}{}{}",
                open,
                day,
                close,
                if marks.has_entry { '+' } else { ' ' },
                if marks.today { '*' } else { ' ' },
            )
        }
    }
}

/// Shows one day's entry.
pub fn render_entry(date: NaiveDate, text: &str) -> String {
    if text.is_empty() {
        format!("{}: (no entry)\n", date_index::format(date))
    } else {
        format!("{}:\n{}\n", date_index::format(date), text)
    }
}

/// Shows a listing or search result: the statistics line, then one
/// `date, text` line per entry with matches highlighted.
pub fn render_projection(
    result: &ProjectionResult,
    term: Option<&SearchTerm>,
    palette: &Palette,
) -> String {
    let mut out = format!(
        "{}{}{}\n",
        palette.heading_open,
        result.summary(term),
        palette.heading_close
    );
    for entry in &result.entries {
        out.push_str(&entry.date_key());
        out.push_str(", ");
        out.push_str(&entry.highlighted(palette.highlight_open, palette.highlight_close));
        out.push('\n');
    }
    out
}
