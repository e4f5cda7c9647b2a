//! Configuration loading for the axis explorer.
//!
//! Kept free of the harmony core so the core crate stays usable without it.
//! Values that name musical things (like `deck.initial_root`) are kept as
//! strings here and parsed by the binary.
//!
//! # Usage
//!
//! ```rust,no_run
//! use axisconf::AxisConfig;
//!
//! let config = AxisConfig::load().expect("Failed to load config");
//! println!("NDLR port: {}", config.midi.output_port);
//! println!("Channel: {}", config.midi.channel);
//! ```
//!
//! # Config File Locations
//!
//! Files are loaded in order (later wins):
//! 1. `/etc/axis-explorer/config.toml` (system)
//! 2. `~/.config/axis-explorer/config.toml` (user)
//! 3. `./axis-explorer.toml` (local override, or `--config <path>`)
//! 4. Environment variables (`AXIS_*`, `RUST_LOG`)
//!
//! # Example Config
//!
//! ```toml
//! [midi]
//! output_port = "NDLR"
//! channel = 1
//! chord_degree_cc = 26
//!
//! [deck]
//! color = true
//! initial_root = "G"
//!
//! [telemetry]
//! log_level = "info"
//! ```

pub mod loader;
pub mod sections;

pub use loader::{discover_config_files, discover_config_files_with_override, ConfigSources};
pub use sections::{DeckConfig, MidiConfig, TelemetryConfig};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {message}")]
    Invalid { key: String, message: String },
}

/// Complete axis explorer configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AxisConfig {
    #[serde(default)]
    pub midi: MidiConfig,

    #[serde(default)]
    pub deck: DeckConfig,

    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AxisConfig {
    /// Load configuration from all sources.
    ///
    /// Load order (later wins):
    /// 1. Compiled defaults
    /// 2. `/etc/axis-explorer/config.toml`
    /// 3. `~/.config/axis-explorer/config.toml`
    /// 4. `./axis-explorer.toml`
    /// 5. Environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let (config, _sources) = Self::load_with_sources_from(None)?;
        Ok(config)
    }

    /// Load configuration, with `config_path` replacing the local
    /// `./axis-explorer.toml` override. System and user configs still load first.
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let (config, _sources) = Self::load_with_sources_from(config_path)?;
        Ok(config)
    }

    /// Load configuration from optional path and return information about sources.
    pub fn load_with_sources_from(
        config_path: Option<&Path>,
    ) -> Result<(Self, ConfigSources), ConfigError> {
        let mut sources = ConfigSources::default();
        let mut config = AxisConfig::default();

        for path in loader::discover_config_files_with_override(config_path) {
            loader::load_from_file(&mut config, &path)?;
            sources.files.push(path);
        }

        loader::apply_env_overrides(&mut config, &mut sources)?;

        Ok((config, sources))
    }

    /// Serialize config to TOML string.
    pub fn to_toml(&self) -> String {
        // Build TOML manually for nicer formatting
        let mut output = String::new();

        output.push_str("# Axis Explorer Configuration\n\n");

        output.push_str("[midi]\n");
        output.push_str(&format!("output_port = {:?}\n", self.midi.output_port));
        output.push_str(&format!("channel = {}\n", self.midi.channel));
        output.push_str(&format!("chord_degree_cc = {}\n", self.midi.chord_degree_cc));

        output.push_str("\n[deck]\n");
        output.push_str(&format!("color = {}\n", self.deck.color));
        match &self.deck.initial_root {
            Some(root) => output.push_str(&format!("initial_root = {root:?}\n")),
            None => output.push_str("# initial_root = \"C\"\n"),
        }

        output.push_str("\n[telemetry]\n");
        output.push_str(&format!("log_level = {:?}\n", self.telemetry.log_level));

        output
    }
}
