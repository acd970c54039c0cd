//! Configuration
//!
//! Loads element definitions and timing from a TOML file at
//! `~/.config/txt-rotate/rotate.toml`, with environment overrides.
//!
//! # Configuration Priority
//!
//! 1. CLI arguments (applied by the caller through [`ConfigOverrides`])
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [timing]
//! typing_pause_ms = 500
//! deleting_pause_ms = 2000
//! first_period_ms = 5000
//! default_period_ms = 3000
//!
//! [[element]]
//! data_rotate = '["Rust", "Tokio", "ratatui"]'
//!
//! [[element]]
//! candidates = ["cat", "dogs"]
//! period_ms = 400
//! ```
//!
//! `data_rotate` carries the per-element attribute format: a JSON array of
//! strings.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::timing::{PeriodPolicy, Timing};

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    /// An element's `data_rotate` attribute is not a JSON array of strings
    #[error("Element {index} has a malformed rotate attribute: {source}")]
    Attribute {
        /// Position of the element in the configuration
        index: usize,
        /// The JSON error
        source: serde_json::Error,
    },
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where the effective configuration came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from command-line argument
    Cli,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// Timing section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingToml {
    /// Pause before typing resumes, in milliseconds
    pub typing_pause_ms: Option<u64>,
    /// Pause before deleting starts, in milliseconds
    pub deleting_pause_ms: Option<u64>,
    /// Period of the first element, in milliseconds
    pub first_period_ms: Option<u64>,
    /// Period of every other element, in milliseconds
    pub default_period_ms: Option<u64>,
}

/// One `[[element]]` entry
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementToml {
    /// Candidates as a TOML array
    pub candidates: Option<Vec<String>>,
    /// Candidates in attribute form (JSON array of strings)
    pub data_rotate: Option<String>,
    /// Per-element period in milliseconds
    pub period_ms: Option<u64>,
}

/// Root of the TOML configuration file
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RotatorToml {
    /// Timing settings
    pub timing: TimingToml,
    /// Element definitions, in id order
    #[serde(rename = "element")]
    pub elements: Vec<ElementToml>,
}

// =============================================================================
// Effective Configuration
// =============================================================================

/// A fully resolved element definition
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementConfig {
    /// Strings to rotate through
    pub candidates: Vec<String>,
    /// Explicit period; `None` falls back to the [`PeriodPolicy`]
    pub period: Option<Duration>,
}

impl ElementConfig {
    /// Element with the policy's default period
    pub fn new(candidates: Vec<String>) -> Self {
        Self {
            candidates,
            period: None,
        }
    }

    /// Parse an element from its attribute form
    ///
    /// # Errors
    ///
    /// Fails if `value` is not a JSON array of strings.
    pub fn from_attribute(value: &str) -> Result<Self, serde_json::Error> {
        parse_rotate_attribute(value).map(Self::new)
    }

    /// Set an explicit period
    #[must_use]
    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = Some(period);
        self
    }
}

/// Effective configuration after all sources are applied
#[derive(Clone, Debug)]
pub struct RotatorConfig {
    /// Restart pauses
    pub timing: Timing,
    /// Fallback periods
    pub periods: PeriodPolicy,
    /// Elements, in id order
    pub elements: Vec<ElementConfig>,
    /// Path of the loaded file, if one was read
    pub config_file_path: Option<PathBuf>,
    source: ConfigSource,
}

impl Default for RotatorConfig {
    fn default() -> Self {
        Self {
            timing: Timing::default(),
            periods: PeriodPolicy::default(),
            elements: Vec::new(),
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl RotatorConfig {
    /// Create a default configuration with no elements
    pub fn new() -> Self {
        Self::default()
    }

    /// Highest-priority source that contributed
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Period for the element at `index`
    pub fn period_of(&self, index: usize) -> Duration {
        self.elements
            .get(index)
            .and_then(|e| e.period)
            .unwrap_or_else(|| self.periods.period_for(index))
    }
}

// =============================================================================
// Loading
// =============================================================================

/// Parse the per-element attribute transport format (a JSON array of strings)
///
/// # Errors
///
/// Fails if `value` is not a JSON array of strings.
pub fn parse_rotate_attribute(value: &str) -> Result<Vec<String>, serde_json::Error> {
    serde_json::from_str(value)
}

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/txt-rotate/rotate.toml` or
/// `~/.config/txt-rotate/rotate.toml` if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("txt-rotate").join("rotate.toml"))
}

/// Load configuration from all sources with proper priority
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed.
/// A missing config file is not an error (defaults are used).
pub fn load_config() -> Result<RotatorConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if an element
/// entry is invalid.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<RotatorConfig, ConfigError> {
    let mut config = RotatorConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: RotatorToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config)?;
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                elements = config.elements.len(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_config(&mut config, |key| std::env::var(key).ok());

    Ok(config)
}

/// Apply TOML configuration values to the config struct
///
/// # Errors
///
/// Rejects a zero `first_period_ms`/`default_period_ms`, and element
/// entries with no candidates, with both candidate forms, with a malformed
/// attribute, or with `period_ms = 0`.
pub fn apply_toml_config(config: &mut RotatorConfig, toml: &RotatorToml) -> Result<(), ConfigError> {
    if let Some(ms) = toml.timing.typing_pause_ms {
        config.timing.typing_pause = Duration::from_millis(ms);
    }
    if let Some(ms) = toml.timing.deleting_pause_ms {
        config.timing.deleting_pause = Duration::from_millis(ms);
    }
    if let Some(ms) = toml.timing.first_period_ms {
        config.periods.first = nonzero_period("first_period_ms", ms)?;
    }
    if let Some(ms) = toml.timing.default_period_ms {
        config.periods.rest = nonzero_period("default_period_ms", ms)?;
    }

    for (index, entry) in toml.elements.iter().enumerate() {
        let candidates = match (&entry.candidates, &entry.data_rotate) {
            (Some(list), None) => list.clone(),
            (None, Some(attr)) => parse_rotate_attribute(attr)
                .map_err(|source| ConfigError::Attribute { index, source })?,
            (Some(_), Some(_)) => {
                return Err(ConfigError::ValidationError(format!(
                    "element {index} sets both `candidates` and `data_rotate`"
                )))
            }
            (None, None) => {
                return Err(ConfigError::ValidationError(format!(
                    "element {index} has neither `candidates` nor `data_rotate`"
                )))
            }
        };

        let period = match entry.period_ms {
            Some(0) => {
                return Err(ConfigError::ValidationError(format!(
                    "element {index} has period_ms = 0"
                )))
            }
            Some(ms) => Some(Duration::from_millis(ms)),
            None => None,
        };

        config.elements.push(ElementConfig { candidates, period });
    }

    Ok(())
}

fn nonzero_period(key: &str, ms: u64) -> Result<Duration, ConfigError> {
    if ms == 0 {
        return Err(ConfigError::ValidationError(format!(
            "[timing] {key} must be greater than 0"
        )));
    }
    Ok(Duration::from_millis(ms))
}

/// Apply environment variable overrides
///
/// `lookup` resolves a variable name; production passes `std::env::var`.
/// Values that fail to parse are ignored with a warning.
pub fn apply_env_config(config: &mut RotatorConfig, lookup: impl Fn(&str) -> Option<String>) {
    let read_ms = |key: &str| -> Option<Duration> {
        let raw = lookup(key)?;
        match raw.trim().parse::<u64>() {
            Ok(ms) => Some(Duration::from_millis(ms)),
            Err(e) => {
                tracing::warn!(key, value = %raw, error = %e, "Ignoring invalid environment value");
                None
            }
        }
    };

    if let Some(d) = read_ms("TXT_ROTATE_TYPING_PAUSE_MS") {
        config.timing.typing_pause = d;
        config.source = ConfigSource::Env;
    }
    if let Some(d) = read_ms("TXT_ROTATE_DELETING_PAUSE_MS") {
        config.timing.deleting_pause = d;
        config.source = ConfigSource::Env;
    }
    if let Some(d) = read_ms("TXT_ROTATE_FIRST_PERIOD_MS").filter(|d| !d.is_zero()) {
        config.periods.first = d;
        config.source = ConfigSource::Env;
    }
    if let Some(d) = read_ms("TXT_ROTATE_DEFAULT_PERIOD_MS").filter(|d| !d.is_zero()) {
        config.periods.rest = d;
        config.source = ConfigSource::Env;
    }
}

// =============================================================================
// CLI Overrides
// =============================================================================

/// Overrides supplied on the command line
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Replace the configured elements entirely
    pub elements: Option<Vec<ElementConfig>>,
    /// Period applied to every element
    pub period: Option<Duration>,
    /// Typing pause
    pub typing_pause: Option<Duration>,
    /// Deleting pause
    pub deleting_pause: Option<Duration>,
}

impl ConfigOverrides {
    /// Create an empty override set
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the element list
    #[must_use]
    pub fn with_elements(mut self, elements: Vec<ElementConfig>) -> Self {
        self.elements = Some(elements);
        self
    }

    /// Force one period on every element
    #[must_use]
    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = Some(period);
        self
    }

    /// Override the typing pause
    #[must_use]
    pub fn with_typing_pause(mut self, pause: Duration) -> Self {
        self.typing_pause = Some(pause);
        self
    }

    /// Override the deleting pause
    #[must_use]
    pub fn with_deleting_pause(mut self, pause: Duration) -> Self {
        self.deleting_pause = Some(pause);
        self
    }

    /// Whether any override is set
    pub fn is_empty(&self) -> bool {
        self.elements.is_none()
            && self.period.is_none()
            && self.typing_pause.is_none()
            && self.deleting_pause.is_none()
    }

    /// Apply the overrides to a loaded configuration
    pub fn apply(&self, config: &mut RotatorConfig) {
        if self.is_empty() {
            return;
        }
        if let Some(ref elements) = self.elements {
            config.elements = elements.clone();
        }
        if let Some(period) = self.period {
            for element in &mut config.elements {
                element.period = Some(period);
            }
        }
        if let Some(pause) = self.typing_pause {
            config.timing.typing_pause = pause;
        }
        if let Some(pause) = self.deleting_pause {
            config.timing.deleting_pause = pause;
        }
        config.source = ConfigSource::Cli;
    }
}
