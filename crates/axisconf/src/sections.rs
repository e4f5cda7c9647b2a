//! Config sections and their compiled defaults.

use serde::{Deserialize, Serialize};

/// Where control changes go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MidiConfig {
    /// Substring matched against MIDI output port names.
    /// Default: "NDLR"
    #[serde(default = "MidiConfig::default_output_port")]
    pub output_port: String,

    /// User-facing MIDI channel (1-16; other values wrap).
    /// Default: 1
    #[serde(default = "MidiConfig::default_channel")]
    pub channel: i32,

    /// Controller number for chord degree. Set to 27 if the connected NDLR
    /// ignores 26.
    /// Default: 26
    #[serde(default = "MidiConfig::default_chord_degree_cc")]
    pub chord_degree_cc: u8,
}

impl MidiConfig {
    fn default_output_port() -> String {
        "NDLR".to_string()
    }

    fn default_channel() -> i32 {
        1
    }

    fn default_chord_degree_cc() -> u8 {
        26
    }
}

impl Default for MidiConfig {
    fn default() -> Self {
        Self {
            output_port: Self::default_output_port(),
            channel: Self::default_channel(),
            chord_degree_cc: Self::default_chord_degree_cc(),
        }
    }
}

/// Button deck behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckConfig {
    /// Use ANSI colors on the console deck.
    /// Default: true
    #[serde(default = "DeckConfig::default_color")]
    pub color: bool,

    /// Start in an axis session for this root instead of root selection.
    /// Default: unset
    #[serde(default)]
    pub initial_root: Option<String>,
}

impl DeckConfig {
    fn default_color() -> bool {
        true
    }
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            color: Self::default_color(),
            initial_root: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Log filter (trace, debug, info, warn, error, or an EnvFilter directive).
    /// Default: info
    #[serde(default = "TelemetryConfig::default_log_level")]
    pub log_level: String,
}

impl TelemetryConfig {
    fn default_log_level() -> String {
        "info".to_string()
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: Self::default_log_level(),
        }
    }
}
