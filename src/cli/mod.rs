use crate::calendar::date_index;
use crate::constants;
use crate::errors::InputError;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

/// A calendar-driven personal diary
#[derive(Parser, Debug)]
#[clap(name = constants::APP_NAME, about = constants::APP_DESCRIPTION)]
#[clap(author, version, long_about = None)]
pub struct CliArgs {
    /// Print verbose output
    #[clap(short = 'v', long, global = true)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Renders the month grid with today, the selection and days with entries marked
    Calendar {
        /// Month to show (format: YYYY-MM); defaults to the month of --date
        #[clap(short = 'm', long)]
        month: Option<String>,

        #[clap(flatten)]
        date: DateArg,
    },

    /// Prints the entry for a date
    Show(DateArg),

    /// Saves an entry; reads standard input when no text is given
    Write {
        #[clap(flatten)]
        date: DateArg,

        /// Entry text; multiple words are joined with spaces
        text: Vec<String>,
    },

    /// Deletes the entry for a date after confirmation
    Delete {
        #[clap(flatten)]
        date: DateArg,

        /// Skip the confirmation prompt
        #[clap(short = 'y', long)]
        yes: bool,
    },

    /// Lists all entries, newest first
    List,

    /// Lists entries containing a keyword (case-insensitive) with match counts
    Search {
        /// Keyword to look for
        term: String,
    },

    /// Prints all entries as plain text, or copies them to the clipboard
    Export {
        /// Copy to the clipboard instead of printing
        #[clap(short = 'c', long)]
        copy: bool,
    },

    /// Deletes every entry after confirmation
    Clear {
        /// Skip the confirmation prompt
        #[clap(short = 'y', long)]
        yes: bool,
    },

    /// Shows or changes the colour theme
    Theme {
        /// Theme to switch to; omit to show the current one
        #[clap(value_enum)]
        choice: Option<ThemeChoice>,
    },

    /// Starts an interactive calendar session
    Shell,
}

/// Date selection shared by several subcommands.
#[derive(Args, Debug, Default, PartialEq, Eq)]
pub struct DateArg {
    /// Date to use (format: YYYY-MM-DD or YYYYMMDD); defaults to today
    #[clap(short = 'd', long)]
    pub date: Option<String>,
}

impl DateArg {
    /// The requested date, or `today` when none was given.
    pub fn resolve(&self, today: NaiveDate) -> Result<NaiveDate, InputError> {
        match &self.date {
            Some(raw) => date_index::parse(raw),
            None => Ok(today),
        }
    }
}

/// Argument of the `theme` subcommand.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThemeChoice {
    /// Use the light theme.
    Light,
    /// Use the dark theme.
    Dark,
    /// Switch to the other theme.
    Toggle,
}

impl CliArgs {
    /// Parse command-line arguments
    pub fn parse() -> Self {
        CliArgs::parse_from(std::env::args())
    }
}
