//! Command-Line Arguments
//!
//! Flags are the highest-priority configuration layer; they are folded into
//! the loaded [`RotatorConfig`] through [`ConfigOverrides`].

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;

use txt_rotate_core::{
    default_config_path, load_config_from_path, ConfigOverrides, ElementConfig, RotatorConfig,
};

/// Typewriter-style rotating text in the terminal
#[derive(Debug, Parser)]
#[command(name = "txt-rotate-tui", version, about)]
pub struct Args {
    /// Configuration file (default: $XDG_CONFIG_HOME/txt-rotate/rotate.toml)
    #[arg(short, long, env = "TXT_ROTATE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Element candidates as a JSON array, e.g. '["cat","dogs"]' (repeatable)
    ///
    /// When given, replaces the elements from the configuration file.
    #[arg(short, long = "rotate", value_name = "JSON")]
    pub rotate: Vec<String>,

    /// Period applied to every element, in milliseconds
    #[arg(long, value_name = "MS", value_parser = clap::value_parser!(u64).range(1..))]
    pub period_ms: Option<u64>,

    /// Pause before typing resumes, in milliseconds
    #[arg(long, value_name = "MS")]
    pub typing_pause_ms: Option<u64>,

    /// Pause before deleting starts, in milliseconds
    #[arg(long, value_name = "MS")]
    pub deleting_pause_ms: Option<u64>,

    /// Print each frame's markup to stdout instead of drawing a full-screen view
    #[arg(long)]
    pub plain: bool,

    /// Write logs to this file (the full-screen view otherwise logs nowhere)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Args {
    /// Overrides derived from the flags
    ///
    /// # Errors
    ///
    /// Fails if a `--rotate` value is not a JSON array of strings.
    pub fn overrides(&self) -> anyhow::Result<ConfigOverrides> {
        let mut overrides = ConfigOverrides::new();

        if !self.rotate.is_empty() {
            let elements = self
                .rotate
                .iter()
                .enumerate()
                .map(|(i, raw)| {
                    ElementConfig::from_attribute(raw)
                        .with_context(|| format!("--rotate #{i} is not a JSON array of strings"))
                })
                .collect::<anyhow::Result<Vec<_>>>()?;
            overrides = overrides.with_elements(elements);
        }
        if let Some(ms) = self.period_ms {
            overrides = overrides.with_period(Duration::from_millis(ms));
        }
        if let Some(ms) = self.typing_pause_ms {
            overrides = overrides.with_typing_pause(Duration::from_millis(ms));
        }
        if let Some(ms) = self.deleting_pause_ms {
            overrides = overrides.with_deleting_pause(Duration::from_millis(ms));
        }

        Ok(overrides)
    }

    /// Load the file and environment layers, then apply the flags
    ///
    /// # Errors
    ///
    /// Fails on an unreadable or invalid config file, an invalid flag, or
    /// when no element ends up configured.
    pub fn resolve_config(&self) -> anyhow::Result<RotatorConfig> {
        let path = self.config.clone().or_else(default_config_path);
        let mut config = load_config_from_path(path.clone())?;
        self.overrides()?.apply(&mut config);

        if config.elements.is_empty() {
            let hint = path.map_or_else(|| "a config file".to_string(), |p| p.display().to_string());
            anyhow::bail!("no elements configured: pass --rotate or add [[element]] entries to {hint}");
        }

        tracing::info!(
            source = %config.source(),
            elements = config.elements.len(),
            "Configuration resolved"
        );
        Ok(config)
    }
}
