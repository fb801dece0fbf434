use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

/// Errors raised while normalizing a ticker.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TickerError {
    #[error("Ticker is required")]
    Empty,
}

/// Stock symbol in its canonical, uppercase form.
///
/// Only empty input is rejected. Format and existence are left to the provider.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Ticker(Arc<str>);

impl Ticker {
    /// Normalize raw user input into a ticker.
    ///
    /// The input is uppercased as-is; nothing is trimmed or stripped.
    pub fn parse(raw: &str) -> Result<Self, TickerError> {
        if raw.is_empty() {
            return Err(TickerError::Empty);
        }
        Ok(Self(Arc::from(raw.to_uppercase())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Ticker {
    type Err = TickerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Ticker {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
