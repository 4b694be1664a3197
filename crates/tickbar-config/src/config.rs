//! Configuration loading: TOML file, then environment overrides.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tickbar_aggregate::{AggregatorConfig, BackdatedPolicy, history_capacity};
use tracing::debug;

use crate::{SymbolEntry, SymbolRegistry};

/// Errors that can occur while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the config file.
    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        /// The path that could not be parsed.
        path: PathBuf,
        /// The underlying TOML error.
        source: toml::de::Error,
    },

    /// An environment override had an unusable value.
    #[error("Invalid value for {key}: '{value}'")]
    InvalidEnv {
        /// Environment variable name.
        key: &'static str,
        /// The rejected value.
        value: String,
    },

    /// The lookback window must be positive.
    #[error("window_minutes must be greater than zero")]
    ZeroWindow,

    /// The signal endpoint is not a valid URL.
    #[error("Invalid signal URL '{url}': {source}")]
    InvalidUrl {
        /// The rejected URL.
        url: String,
        /// The underlying parse error.
        source: url::ParseError,
    },

    /// A tracked symbol has an empty identifier or token.
    #[error("Tracked symbol '{0}' has an empty name or token")]
    EmptySymbol(String),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Downstream signal endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SignalConfig {
    /// Whether closed bars are forwarded at all.
    pub enabled: bool,
    /// Endpoint receiving signal requests.
    pub url: String,
    /// Ask the endpoint not to place real orders.
    pub dry_run: bool,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Retry attempts for transient failures.
    pub max_retries: u32,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: Config::DEFAULT_SIGNAL_URL.to_string(),
            dry_run: true,
            timeout_secs: 10,
            max_retries: 3,
        }
    }
}

/// Effective tickbar configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Lookback the downstream model consumes, in minutes.
    pub window_minutes: usize,
    /// Handling of ticks older than the open bar.
    pub backdated_policy: BackdatedPolicy,
    /// Signal endpoint settings.
    pub signal: SignalConfig,
    /// Tracked symbols.
    pub symbols: SymbolRegistry,
}

impl Default for Config {
    fn default() -> Self {
        let mut symbols = SymbolRegistry::new();
        symbols.insert("NIFTY", SymbolEntry::new(1, "26000"));

        Self {
            window_minutes: AggregatorConfig::DEFAULT_WINDOW_MINUTES,
            backdated_policy: BackdatedPolicy::default(),
            signal: SignalConfig::default(),
            symbols,
        }
    }
}

impl Config {
    /// Signal endpoint used when none is configured.
    pub const DEFAULT_SIGNAL_URL: &'static str = "http://127.0.0.1:4000/api/signal";

    /// Loads configuration from an optional TOML file, then applies
    /// `TICKBAR_*` environment overrides (including any `.env` file).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, an override is
    /// malformed, or the result fails validation.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Ok(env_file) = dotenvy::dotenv() {
            debug!(path = %env_file.display(), "loaded .env file");
        }

        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Reads configuration from a TOML file without overrides or validation.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Applies overrides looked up by environment variable name.
    ///
    /// # Errors
    ///
    /// Returns an error if an override value cannot be parsed.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("TICKBAR_WINDOW_MINUTES") {
            self.window_minutes = parse_env("TICKBAR_WINDOW_MINUTES", value)?;
        }
        if let Some(value) = lookup("TICKBAR_BACKDATED_POLICY") {
            self.backdated_policy = parse_env("TICKBAR_BACKDATED_POLICY", value)?;
        }
        if let Some(value) = lookup("TICKBAR_SIGNAL_URL") {
            self.signal.url = value;
        }
        if let Some(value) = lookup("TICKBAR_SIGNAL_ENABLED") {
            self.signal.enabled = parse_env("TICKBAR_SIGNAL_ENABLED", value)?;
        }
        if let Some(value) = lookup("TICKBAR_SIGNAL_DRY_RUN") {
            self.signal.dry_run = parse_env("TICKBAR_SIGNAL_DRY_RUN", value)?;
        }
        Ok(())
    }

    /// Checks invariants the rest of the system relies on.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<()> {
        if self.window_minutes == 0 {
            return Err(ConfigError::ZeroWindow);
        }
        url::Url::parse(&self.signal.url).map_err(|source| ConfigError::InvalidUrl {
            url: self.signal.url.clone(),
            source,
        })?;
        if let Some((name, _)) = self
            .symbols
            .iter()
            .find(|(name, entry)| name.trim().is_empty() || entry.token.trim().is_empty())
        {
            return Err(ConfigError::EmptySymbol(name.to_string()));
        }
        Ok(())
    }

    /// Returns the aggregator settings derived from this configuration.
    #[must_use]
    pub const fn aggregator_config(&self) -> AggregatorConfig {
        AggregatorConfig::new(self.window_minutes).with_policy(self.backdated_policy)
    }

    /// Returns the per-instrument history capacity, `max(window + 5, 21)`.
    #[must_use]
    pub const fn history_capacity(&self) -> usize {
        history_capacity(self.window_minutes)
    }

    /// Returns how many closes a signal request carries: `window + 1`, at least 2.
    #[must_use]
    pub const fn observation_len(&self) -> usize {
        let len = self.window_minutes.saturating_add(1);
        if len < 2 { 2 } else { len }
    }
}

fn parse_env<T: std::str::FromStr>(key: &'static str, value: String) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidEnv { key, value })
}
