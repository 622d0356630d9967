//! Interactive calendar session.
//!
//! Reads one command per line, applies it to the calendar and re-renders
//! after anything that changes what the calendar shows. Command errors are
//! reported and the session continues; only a broken terminal ends it early.

use crate::calendar::{date_index, CalendarController};
use crate::errors::{AppError, AppResult};
use crate::interaction::{Clipboard, LinePrompt};
use crate::ops::{self, ClearOutcome, DeleteOutcome};
use crate::search::{self, ProjectionResult};
use crate::storage::KeyValueStorage;
use crate::theme::Theme;
use crate::view::{self, Palette};
use std::io::{BufRead, Write};
use tracing::{debug, info, warn};

const SHELL_PROMPT: &str = "daybook> ";

const HELP_TEXT: &str = "\
Commands:
  prev | next         show the previous or next month
  today               select today and show its month
  select <day>        select a day of the shown month
  goto <date>         select a date (YYYY-MM-DD or YYYYMMDD) and show its month
  show                print the selected day's entry
  write <text>        save text for the selected day
  delete              delete the selected day's entry
  list                list all entries, newest first
  search <term>       list entries containing a keyword
  export              print the last list or search as plain text
  copy                copy the last list or search to the clipboard
  clear               delete every entry
  theme               toggle between light and dark
  help                show this help
  quit | exit         leave";

/// One parsed line of shell input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Show the previous month.
    Prev,
    /// Show the next month.
    Next,
    /// Select today and show its month.
    Today,
    /// Select a day of the displayed month.
    Select(u32),
    /// Select a date given as text and show its month.
    Goto(String),
    /// Print the selected day's entry.
    Show,
    /// Save text for the selected day.
    Write(String),
    /// Delete the selected day's entry.
    Delete,
    /// List every entry.
    List,
    /// List entries containing a keyword.
    Search(String),
    /// Print the last projection as plain text.
    Export,
    /// Copy the last projection to the clipboard.
    Copy,
    /// Delete every entry.
    Clear,
    /// Toggle the theme.
    Theme,
    /// Print the command list.
    Help,
    /// End the session.
    Quit,
}

impl ShellCommand {
    /// Parses a non-blank input line. Command words are case-insensitive.
    pub fn parse(line: &str) -> Result<ShellCommand, String> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_lowercase().as_str() {
            "prev" => ShellCommand::Prev,
            "next" => ShellCommand::Next,
            "today" => ShellCommand::Today,
            "select" => {
                let day = rest
                    .parse()
                    .map_err(|_| format!("'{}' is not a day number. Usage: select <day>", rest))?;
                ShellCommand::Select(day)
            }
            "goto" if !rest.is_empty() => ShellCommand::Goto(rest.to_string()),
            "goto" => return Err("Usage: goto <date>".to_string()),
            "show" => ShellCommand::Show,
            "write" => ShellCommand::Write(rest.to_string()),
            "delete" => ShellCommand::Delete,
            "list" => ShellCommand::List,
            "search" => ShellCommand::Search(rest.to_string()),
            "export" => ShellCommand::Export,
            "copy" => ShellCommand::Copy,
            "clear" => ShellCommand::Clear,
            "theme" => ShellCommand::Theme,
            "help" | "?" => ShellCommand::Help,
            "quit" | "exit" => ShellCommand::Quit,
            other => {
                return Err(format!(
                    "Unknown command '{}'. Type 'help' for a list of commands.",
                    other
                ))
            }
        };
        Ok(command)
    }
}

/// An interactive session over a calendar, a line prompt and a clipboard.
pub struct Shell<S, R, W, C> {
    calendar: CalendarController<S>,
    prompt: LinePrompt<R, W>,
    clipboard: C,
    color: bool,
    last_projection: Option<ProjectionResult>,
}

impl<S, R, W, C> Shell<S, R, W, C>
where
    S: KeyValueStorage,
    R: BufRead,
    W: Write,
    C: Clipboard,
{
    /// Creates a session. With `color` the theme's ANSI palette is used,
    /// otherwise plain-text markers.
    pub fn new(
        calendar: CalendarController<S>,
        prompt: LinePrompt<R, W>,
        clipboard: C,
        color: bool,
    ) -> Self {
        Shell {
            calendar,
            prompt,
            clipboard,
            color,
            last_projection: None,
        }
    }

    /// Runs until `quit`, `exit` or end of input.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Io` only if the terminal itself fails.
    pub fn run(&mut self) -> AppResult<()> {
        info!("Interactive session started");
        self.render_calendar()?;
        writeln!(self.prompt.output(), "Type 'help' for a list of commands.")?;

        loop {
            write!(self.prompt.output(), "{}", SHELL_PROMPT)?;
            self.prompt.output().flush()?;

            let line = match self.prompt.read_line()? {
                Some(line) => line,
                None => break,
            };
            if line.trim().is_empty() {
                continue;
            }

            let command = match ShellCommand::parse(&line) {
                Ok(command) => command,
                Err(message) => {
                    writeln!(self.prompt.output(), "{}", message)?;
                    continue;
                }
            };
            debug!(?command, "Shell command");

            if command == ShellCommand::Quit {
                break;
            }

            match self.execute(command) {
                Ok(()) => {}
                Err(AppError::Io(e)) => return Err(AppError::Io(e)),
                Err(e) => {
                    warn!(error = %e, "Shell command failed");
                    writeln!(self.prompt.output(), "Error: {}", e)?;
                }
            }
        }

        writeln!(self.prompt.output(), "Goodbye.")?;
        info!("Interactive session ended");
        Ok(())
    }

    fn execute(&mut self, command: ShellCommand) -> AppResult<()> {
        match command {
            ShellCommand::Prev => {
                self.calendar.navigate_month(-1);
                self.render_calendar()
            }
            ShellCommand::Next => {
                self.calendar.navigate_month(1);
                self.render_calendar()
            }
            ShellCommand::Today => {
                self.calendar.jump_to_today();
                self.render_calendar()
            }
            ShellCommand::Select(day) => {
                self.calendar.select_day(day)?;
                self.render_calendar()?;
                self.render_selected_entry()
            }
            ShellCommand::Goto(raw) => {
                let date = date_index::parse(&raw)?;
                self.calendar.go_to_date(date);
                self.render_calendar()?;
                self.render_selected_entry()
            }
            ShellCommand::Show => self.render_selected_entry(),
            ShellCommand::Write(text) => {
                ops::save_entry(&self.calendar, &text)?;
                self.last_projection = None;
                let date = date_index::format(self.calendar.state().selected_date);
                writeln!(self.prompt.output(), "Saved entry for {}.", date)?;
                self.render_calendar()
            }
            ShellCommand::Delete => {
                let outcome = ops::delete_entry(&self.calendar, &mut self.prompt)?;
                let date = date_index::format(self.calendar.state().selected_date);
                match outcome {
                    DeleteOutcome::Deleted => {
                        self.last_projection = None;
                        writeln!(self.prompt.output(), "Deleted entry for {}.", date)?;
                        self.render_calendar()
                    }
                    DeleteOutcome::NothingToDelete => {
                        writeln!(self.prompt.output(), "No entry for {}.", date)?;
                        Ok(())
                    }
                    DeleteOutcome::Cancelled => {
                        writeln!(self.prompt.output(), "Cancelled.")?;
                        Ok(())
                    }
                }
            }
            ShellCommand::List => {
                let result = ops::list_entries(self.calendar.store());
                let rendered = view::render_projection(&result, None, &self.palette());
                write!(self.prompt.output(), "{}", rendered)?;
                self.last_projection = Some(result);
                Ok(())
            }
            ShellCommand::Search(raw) => {
                let (term, result) = ops::search_entries(self.calendar.store(), &raw)?;
                let rendered = view::render_projection(&result, Some(&term), &self.palette());
                write!(self.prompt.output(), "{}", rendered)?;
                self.last_projection = Some(result);
                Ok(())
            }
            ShellCommand::Export => {
                let text = search::export_plain_text(&self.current_projection());
                write!(self.prompt.output(), "{}", text)?;
                Ok(())
            }
            ShellCommand::Copy => {
                let projection = self.current_projection();
                let copied = ops::copy_entries(&projection, &mut self.clipboard)?;
                writeln!(self.prompt.output(), "Copied {} entries to the clipboard.", copied)?;
                Ok(())
            }
            ShellCommand::Clear => {
                match ops::clear_all_entries(self.calendar.store(), &mut self.prompt)? {
                    ClearOutcome::Cleared(count) => {
                        self.last_projection = None;
                        writeln!(self.prompt.output(), "Deleted {} entries.", count)?;
                        self.render_calendar()
                    }
                    ClearOutcome::Cancelled => {
                        writeln!(self.prompt.output(), "Cancelled.")?;
                        Ok(())
                    }
                }
            }
            ShellCommand::Theme => {
                let theme = Theme::load(self.calendar.store().storage()).toggle();
                theme.save(self.calendar.store().storage())?;
                writeln!(self.prompt.output(), "Theme: {}", theme)?;
                self.render_calendar()
            }
            ShellCommand::Help => {
                writeln!(self.prompt.output(), "{}", HELP_TEXT)?;
                Ok(())
            }
            ShellCommand::Quit => Ok(()),
        }
    }

    /// The projection `export` and `copy` act on: the last one shown, else
    /// every entry.
    fn current_projection(&self) -> ProjectionResult {
        match &self.last_projection {
            Some(result) => result.clone(),
            None => ops::list_entries(self.calendar.store()),
        }
    }

    fn palette(&self) -> Palette {
        if self.color {
            Palette::for_theme(Theme::load(self.calendar.store().storage()))
        } else {
            Palette::plain()
        }
    }

    fn render_calendar(&mut self) -> AppResult<()> {
        let rendered = view::render_calendar(&self.calendar.render_model(), &self.palette());
        writeln!(self.prompt.output())?;
        write!(self.prompt.output(), "{}", rendered)?;
        Ok(())
    }

    fn render_selected_entry(&mut self) -> AppResult<()> {
        let rendered = view::render_entry(
            self.calendar.state().selected_date,
            &self.calendar.selected_entry_text(),
        );
        write!(self.prompt.output(), "{}", rendered)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diary::EntryStore;
    use crate::errors::ClipboardError;
    use crate::storage::MemoryStorage;
    use chrono::NaiveDate;
    use std::io::Cursor;

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

    type TestShell = Shell<MemoryStorage, Cursor<Vec<u8>>, Vec<u8>, RecordingClipboard>;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn shell(input: &str) -> TestShell {
        let calendar =
            CalendarController::new(EntryStore::new(MemoryStorage::new()), date(2024, 6, 15));
        let prompt = LinePrompt::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());
        Shell::new(calendar, prompt, RecordingClipboard::default(), false)
    }

    fn run(input: &str) -> (TestShell, String) {
        let mut shell = shell(input);
        shell.run().unwrap();
        let output = String::from_utf8(shell.prompt.output().clone()).unwrap();
        (shell, output)
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(ShellCommand::parse("NEXT"), Ok(ShellCommand::Next));
        assert_eq!(ShellCommand::parse(" select 7 "), Ok(ShellCommand::Select(7)));
        assert_eq!(
            ShellCommand::parse("write  went  outside "),
            Ok(ShellCommand::Write("went  outside".to_string()))
        );
        assert_eq!(
            ShellCommand::parse("goto 2024-02-29"),
            Ok(ShellCommand::Goto("2024-02-29".to_string()))
        );
        assert_eq!(ShellCommand::parse("exit"), Ok(ShellCommand::Quit));
        assert!(ShellCommand::parse("select x").is_err());
        assert!(ShellCommand::parse("goto").is_err());
        assert!(ShellCommand::parse("dance").is_err());
    }

    #[test]
    fn test_session_renders_and_quits() {
        let (_, output) = run("quit\n");
        assert!(output.contains("June 2024"));
        assert!(output.contains("[15]"));
        assert!(output.ends_with("Goodbye.\n"));
    }

    #[test]
    fn test_end_of_input_ends_session() {
        let (_, output) = run("next\n");
        assert!(output.contains("July 2024"));
        assert!(output.ends_with("Goodbye.\n"));
    }

    #[test]
    fn test_write_and_delete_with_confirmation() {
        let (shell, output) = run("write hi\ndelete\nn\ndelete\ny\nshow\n");
        assert!(output.contains("Saved entry for 2024-06-15."));
        assert!(output.contains("[15]+*"));
        assert!(output.contains("Cancelled."));
        assert!(output.contains("Deleted entry for 2024-06-15."));
        assert!(output.contains("2024-06-15: (no entry)"));
        assert!(shell.calendar.store().load().is_empty());
    }

    #[test]
    fn test_errors_are_reported_and_session_continues() {
        let (shell, output) = run("write   \nselect 31\nsearch\ngoto nope\nwrite ok\n");
        assert!(output.contains("Entry text is empty"));
        assert!(output.contains("Day 31 does not exist in June 2024."));
        assert!(output.contains("Search term is empty"));
        assert!(output.contains("Invalid date format: 'nope'"));
        assert_eq!(shell.calendar.selected_entry_text(), "ok");
    }

    #[test]
    fn test_search_then_copy_uses_last_projection() {
        let (shell, output) =
            run("write Cat day\ngoto 2024-06-01\nwrite dog day\nsearch cat\ncopy\n");
        assert!(output.contains("Search: found 1 entry, \"cat\" appears 1 time."));
        assert!(output.contains("2024-06-15, **Cat** day"));
        assert_eq!(shell.clipboard.copied, vec!["2024-06-15, Cat day\n".to_string()]);
    }

    #[test]
    fn test_export_defaults_to_all_entries() {
        let (_, output) = run("write one\nprev\nselect 3\nwrite two\nexport\n");
        assert!(output.contains("2024-06-15, one\n2024-05-03, two\n"));
    }

    #[test]
    fn test_clear_and_theme() {
        let (shell, output) = run("write one\nclear\nyes\ntheme\n");
        assert!(output.contains("Deleted 1 entries."));
        assert!(output.contains("Theme: dark"));
        assert!(shell.calendar.store().load().is_empty());
        assert_eq!(
            Theme::load(shell.calendar.store().storage()),
            Theme::Dark
        );
    }
}
