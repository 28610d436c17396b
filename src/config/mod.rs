//! Configuration management.
//!
//! Values come from, in increasing precedence: built-in defaults, a TOML
//! file, then `STATUSBOARD_*` environment variables (optionally seeded from
//! a `.env` file).

use crate::observability::LogFormat;
use crate::storage::OpContext;
use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default `SQLite` busy timeout in milliseconds.
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Which storage engine to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Transactional in-process store; contents vanish with the process.
    #[default]
    Memory,
    /// `SQLite` database file.
    Sqlite,
}

impl BackendKind {
    /// Parses a backend name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for an unknown name.
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "memory" | "memdb" | "inmemory" => Ok(Self::Memory),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(Error::InvalidInput(format!("unknown backend '{other}'"))),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Output format.
    pub format: LogFormat,
    /// `EnvFilter` directive, e.g. `statusboard=debug`.
    pub filter: String,
    /// Optional file to append to instead of stderr.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            format: LogFormat::Pretty,
            filter: "info".to_string(),
            file: None,
        }
    }
}

/// Main configuration for statusboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    /// Storage engine.
    pub backend: BackendKind,
    /// Database file used by the `SQLite` engine.
    pub sqlite_path: PathBuf,
    /// How long `SQLite` waits on a locked database.
    pub busy_timeout_ms: u64,
    /// Deadline applied to each operation context, if any.
    pub operation_timeout_ms: Option<u64>,
    /// Store the default statuses into an empty store on startup.
    pub seed_defaults: bool,
    /// Logging settings.
    pub logging: LoggingSettings,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// Backend name.
    pub backend: Option<BackendKind>,
    /// Database path.
    pub sqlite_path: Option<String>,
    /// Busy timeout.
    pub busy_timeout_ms: Option<u64>,
    /// Operation deadline.
    pub operation_timeout_ms: Option<u64>,
    /// Seed defaults.
    pub seed_defaults: Option<bool>,
    /// Logging section.
    pub logging: Option<ConfigFileLogging>,
}

/// Logging section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileLogging {
    /// `json` or `pretty`.
    pub format: Option<LogFormat>,
    /// Filter directive.
    pub filter: Option<String>,
    /// Log file path.
    pub file: Option<String>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            sqlite_path: default_sqlite_path(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            operation_timeout_ms: None,
            seed_defaults: false,
            logging: LoggingSettings::default(),
        }
    }
}

/// Platform data dir, falling back to the working directory.
fn default_sqlite_path() -> PathBuf {
    directories::ProjectDirs::from("", "", "statusboard").map_or_else(
        || PathBuf::from(".statusboard").join("statusboard.db"),
        |dirs| dirs.data_dir().join("statusboard.db"),
    )
}

impl BoardConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::InvalidInput(format!("{}: {e}", path.display())))?;
        Self::parse(&contents)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the text is not valid TOML or holds
    /// an unknown backend or log format.
    pub fn parse(contents: &str) -> Result<Self> {
        let file: ConfigFile =
            toml::from_str(contents).map_err(|e| Error::InvalidInput(e.to_string()))?;
        Ok(Self::from_config_file(file))
    }

    /// Loads configuration from the default location.
    ///
    /// Checks the following paths in order:
    /// 1. Platform-specific config dir (`~/Library/Application Support/statusboard/` on macOS)
    /// 2. XDG config dir (`~/.config/statusboard/` for Unix compatibility)
    ///
    /// Returns default configuration if no config file is found.
    #[must_use]
    pub fn load_default() -> Self {
        let Some(base_dirs) = directories::BaseDirs::new() else {
            return Self::default();
        };

        let candidates = [
            base_dirs.config_dir().join("statusboard").join("config.toml"),
            base_dirs
                .home_dir()
                .join(".config")
                .join("statusboard")
                .join("config.toml"),
        ];
        for path in candidates.iter().filter(|p| p.exists()) {
            match Self::load_from_file(path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config file");
                },
            }
        }

        Self::default()
    }

    /// Loads `.env`, the default config file, and environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if an environment override is invalid.
    pub fn load() -> Result<Self> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                tracing::warn!(error = %e, "failed to read .env file");
            }
        }
        Self::load_default().with_env_overrides()
    }

    /// Applies `STATUSBOARD_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if a variable holds an invalid value.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from an arbitrary lookup, keyed like the
    /// environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if a value is invalid.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(v) = lookup("STATUSBOARD_BACKEND") {
            self.backend = BackendKind::parse(&v)?;
        }
        if let Some(v) = lookup("STATUSBOARD_SQLITE_PATH") {
            self.sqlite_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("STATUSBOARD_BUSY_TIMEOUT_MS") {
            self.busy_timeout_ms = parse_number("STATUSBOARD_BUSY_TIMEOUT_MS", &v)?;
        }
        if let Some(v) = lookup("STATUSBOARD_OPERATION_TIMEOUT_MS") {
            self.operation_timeout_ms = Some(parse_number("STATUSBOARD_OPERATION_TIMEOUT_MS", &v)?);
        }
        if let Some(v) = lookup("STATUSBOARD_SEED_DEFAULTS") {
            self.seed_defaults = parse_bool("STATUSBOARD_SEED_DEFAULTS", &v)?;
        }
        if let Some(v) = lookup("STATUSBOARD_LOG_FORMAT") {
            self.logging.format = LogFormat::parse(&v)?;
        }
        if let Some(v) = lookup("STATUSBOARD_LOG") {
            self.logging.filter = v;
        }
        Ok(self)
    }

    /// Converts a `ConfigFile` to `BoardConfig`.
    fn from_config_file(file: ConfigFile) -> Self {
        let mut config = Self::default();

        if let Some(backend) = file.backend {
            config.backend = backend;
        }
        if let Some(path) = file.sqlite_path {
            config.sqlite_path = PathBuf::from(path);
        }
        if let Some(ms) = file.busy_timeout_ms {
            config.busy_timeout_ms = ms;
        }
        config.operation_timeout_ms = file.operation_timeout_ms;
        if let Some(seed) = file.seed_defaults {
            config.seed_defaults = seed;
        }
        if let Some(logging) = file.logging {
            if let Some(format) = logging.format {
                config.logging.format = format;
            }
            if let Some(filter) = logging.filter {
                config.logging.filter = filter;
            }
            config.logging.file = logging.file.map(PathBuf::from);
        }

        config
    }

    /// Sets the storage engine.
    #[must_use]
    pub const fn with_backend(mut self, backend: BackendKind) -> Self {
        self.backend = backend;
        self
    }

    /// Sets the database path.
    #[must_use]
    pub fn with_sqlite_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.sqlite_path = path.into();
        self
    }

    /// Builds an operation context honoring `operation_timeout_ms`.
    #[must_use]
    pub fn context(&self) -> OpContext {
        self.operation_timeout_ms.map_or_else(OpContext::background, |ms| {
            OpContext::with_timeout(Duration::from_millis(ms))
        })
    }
}

fn parse_number(key: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::InvalidInput(format!("{key}: expected a number, got '{value}'")))
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::InvalidInput(format!("{key}: expected a boolean, got '{value}'"))),
    }
}
