/*!
# Daybook - A Calendar-Driven Personal Diary

This file contains the main application flow: it sets up logging, loads the
configuration, opens the data directory and dispatches the subcommand.

## Usage

```
daybook [OPTIONS] <COMMAND>

Commands:
  calendar  Renders the month grid with today, the selection and days with entries marked
  show      Prints the entry for a date
  write     Saves an entry; reads standard input when no text is given
  delete    Deletes the entry for a date after confirmation
  list      Lists all entries, newest first
  search    Lists entries containing a keyword (case-insensitive) with match counts
  export    Prints all entries as plain text, or copies them to the clipboard
  clear     Deletes every entry after confirmation
  theme     Shows or changes the colour theme
  shell     Starts an interactive calendar session

Options:
  -v, --verbose  Print verbose output
  -h, --help     Print help
  -V, --version  Print version
```

## Configuration

- `DAYBOOK_DIR`: The directory holding the diary (defaults to "~/.daybook")
- `DAYBOOK_LOG_FORMAT`: `text` (default) or `json` log output on stderr
- `RUST_LOG`: Log filter (defaults to "warn")
*/

use chrono::NaiveDate;
use daybook::calendar::date_index;
use daybook::cli::{CliArgs, Command, ThemeChoice};
use daybook::config::{Config, LogFormat};
use daybook::constants;
use daybook::errors::AppResult;
use daybook::interaction::{AssumeYes, Confirm, LinePrompt, Osc52Clipboard};
use daybook::ops::{self, ClearOutcome, DeleteOutcome};
use daybook::search;
use daybook::shell::Shell;
use daybook::storage::FileStorage;
use daybook::view::{self, Palette};
use daybook::{CalendarController, EntryStore, Theme};
use std::io::{self, IsTerminal};
use tracing::{debug, error, info, info_span};
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// The main entry point for the daybook application.
///
/// 1. Obtains today's date once
/// 2. Parses command-line arguments
/// 3. Loads configuration and initializes logging
/// 4. Runs the subcommand inside the root span
///
/// Errors are logged once and reported on stderr at this boundary.
fn main() {
    // Obtain current date once at the beginning
    let current_date = date_index::today();

    let args = CliArgs::parse();
    let config = Config::load();
    let log_format = config
        .as_ref()
        .map(|config| config.log_format)
        .unwrap_or_default();
    init_tracing(log_format, args.verbose);

    let correlation_id = uuid::Uuid::new_v4();
    let root_span = info_span!(
        constants::TRACING_ROOT_SPAN_NAME,
        service_name = constants::TRACING_SERVICE_NAME,
        correlation_id = %correlation_id
    );
    let _guard = root_span.enter();

    info!("Starting {}", constants::APP_NAME);
    debug!(?args, "CLI arguments");

    if let Err(e) = config.and_then(|config| run(args, config, current_date)) {
        error!(error = %e, "Application error");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Installs the stderr subscriber. `--verbose` overrides `RUST_LOG`.
fn init_tracing(format: LogFormat, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new(constants::VERBOSE_LOG_LEVEL)
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(constants::DEFAULT_LOG_LEVEL))
    };

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false)
                    .with_timer(ChronoLocal::rfc_3339())
                    .with_writer(io::stderr),
            )
            .init(),
        LogFormat::Text => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_timer(ChronoLocal::rfc_3339())
                    .with_writer(io::stderr),
            )
            .init(),
    }
}

fn run(args: CliArgs, config: Config, today: NaiveDate) -> AppResult<()> {
    config.validate()?;
    debug!(?config, "Configuration loaded");

    let storage = FileStorage::open(&config.data_dir)?;
    let mut calendar = CalendarController::new(EntryStore::new(storage), today);
    let color = io::stdout().is_terminal();
    let palette = if color {
        Palette::for_theme(Theme::load(calendar.store().storage()))
    } else {
        Palette::plain()
    };

    match args.command {
        Command::Calendar { month, date } => {
            calendar.go_to_date(date.resolve(today)?);
            if let Some(month) = month {
                let (year, month) = date_index::parse_month(&month)?;
                let state = calendar.state();
                let delta = (year - state.current_year) * constants::MONTHS_PER_YEAR as i32
                    + month as i32
                    - state.current_month as i32;
                calendar.navigate_month(delta);
            }
            print!("{}", view::render_calendar(&calendar.render_model(), &palette));
        }
        Command::Show(date) => {
            let date = date.resolve(today)?;
            calendar.select_date(date);
            print!("{}", view::render_entry(date, &calendar.selected_entry_text()));
        }
        Command::Write { date, text } => {
            let date = date.resolve(today)?;
            calendar.select_date(date);
            let text = if text.is_empty() {
                io::read_to_string(io::stdin())?
            } else {
                text.join(" ")
            };
            ops::save_entry(&calendar, &text)?;
            println!("Saved entry for {}.", date_index::format(date));
        }
        Command::Delete { date, yes } => {
            let date = date.resolve(today)?;
            calendar.select_date(date);
            let outcome = ops::delete_entry(&calendar, confirmer(yes).as_mut())?;
            match outcome {
                DeleteOutcome::Deleted => println!("Deleted entry for {}.", date_index::format(date)),
                DeleteOutcome::NothingToDelete => {
                    println!("No entry for {}.", date_index::format(date))
                }
                DeleteOutcome::Cancelled => println!("Cancelled."),
            }
        }
        Command::List => {
            let result = ops::list_entries(calendar.store());
            print!("{}", view::render_projection(&result, None, &palette));
        }
        Command::Search { term } => {
            let (term, result) = ops::search_entries(calendar.store(), &term)?;
            print!("{}", view::render_projection(&result, Some(&term), &palette));
        }
        Command::Export { copy } => {
            let result = ops::list_entries(calendar.store());
            if copy {
                let copied = ops::copy_entries(&result, &mut Osc52Clipboard::stdout())?;
                println!("Copied {} entries to the clipboard.", copied);
            } else {
                print!("{}", search::export_plain_text(&result));
            }
        }
        Command::Clear { yes } => {
            match ops::clear_all_entries(calendar.store(), confirmer(yes).as_mut())? {
                ClearOutcome::Cleared(count) => println!("Deleted {} entries.", count),
                ClearOutcome::Cancelled => println!("Cancelled."),
            }
        }
        Command::Theme { choice } => {
            let storage = calendar.store().storage();
            let current = Theme::load(storage);
            let theme = match choice {
                None => current,
                Some(ThemeChoice::Light) => Theme::Light,
                Some(ThemeChoice::Dark) => Theme::Dark,
                Some(ThemeChoice::Toggle) => current.toggle(),
            };
            if choice.is_some() {
                theme.save(storage)?;
            }
            println!("Theme: {}", theme);
        }
        Command::Shell => {
            let prompt = LinePrompt::new(io::stdin().lock(), io::stdout());
            Shell::new(calendar, prompt, Osc52Clipboard::stdout(), color).run()?;
        }
    }

    Ok(())
}

/// Confirmation source for destructive subcommands.
fn confirmer(assume_yes: bool) -> Box<dyn Confirm> {
    if assume_yes {
        Box::new(AssumeYes)
    } else {
        Box::new(LinePrompt::new(io::stdin().lock(), io::stdout()))
    }
}
