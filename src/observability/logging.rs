//! Logging configuration.

use crate::config::LoggingSettings;
use crate::{Error, Result};
use serde::Deserialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per event.
    Json,
    /// Human-readable multi-line output.
    #[default]
    Pretty,
}

impl LogFormat {
    /// Parses a format name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for anything but `json` or `pretty`.
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" | "text" => Ok(Self::Pretty),
            other => Err(Error::InvalidInput(format!("unknown log format '{other}'"))),
        }
    }
}

/// Resolved logging configuration.
#[derive(Debug)]
pub struct LoggingConfig {
    /// Output format.
    pub format: LogFormat,
    /// Event filter.
    pub filter: EnvFilter,
    /// Optional log file.
    pub file: Option<PathBuf>,
}

impl LoggingConfig {
    /// Builds a logging configuration from settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the filter directive does not parse.
    pub fn from_settings(settings: &LoggingSettings) -> Result<Self> {
        let filter = EnvFilter::try_new(&settings.filter)
            .map_err(|e| Error::InvalidInput(format!("log filter '{}': {e}", settings.filter)))?;
        Ok(Self {
            format: settings.format,
            filter,
            file: settings.file.clone(),
        })
    }
}
