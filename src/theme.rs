//! Light/dark theme preference, persisted as its own storage record.

use crate::constants;
use crate::errors::StorageError;
use crate::storage::KeyValueStorage;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// The display theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Reads the saved preference. Missing or unrecognised values mean `Light`.
    pub fn load<S: KeyValueStorage>(storage: &S) -> Theme {
        match storage.get(constants::THEME_STORAGE_KEY) {
            Ok(Some(value)) => value.parse().unwrap_or_else(|_| {
                debug!(value = %value, "Unrecognised theme preference, using light");
                Theme::Light
            }),
            Ok(None) => Theme::Light,
            Err(e) => {
                warn!(error = %e, "Could not read theme preference, using light");
                Theme::Light
            }
        }
    }

    /// Persists this theme as the preference.
    pub fn save<S: KeyValueStorage>(self, storage: &S) -> Result<(), StorageError> {
        storage.set(constants::THEME_STORAGE_KEY, self.as_str())
    }

    /// The other theme.
    pub fn toggle(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Stored representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme '{}'", other)),
        }
    }
}
