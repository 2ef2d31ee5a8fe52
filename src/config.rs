//! Runtime configuration.

use crate::error::Result;
use serde::Deserialize;

/// Environment variable that switches on debug mode.
pub const DEBUG_ENV: &str = "SPOTIFY_DEBUG";

/// Configuration for a [`Library`](crate::Library).
///
/// # JSON Schema
///
/// ```json
/// { "debug": false }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Announce every native retain/release on the diagnostic stream.
    pub debug: bool,
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self {
            debug: std::env::var(DEBUG_ENV)
                .map(|value| parse_flag(&value))
                .unwrap_or(false),
        }
    }

    /// Parse configuration from a JSON document. Missing fields default.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
