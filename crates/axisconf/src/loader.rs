//! Config file discovery, loading, and environment variable overlay.

use crate::{AxisConfig, ConfigError};
use std::env;
use std::path::{Path, PathBuf};

/// Information about where config values came from.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    /// Config files that were loaded (in order)
    pub files: Vec<PathBuf>,
    /// Environment variables that overrode config values
    pub env_overrides: Vec<String>,
}

/// Discover config files in standard locations.
///
/// Returns paths in load order (system, user, local).
/// Only returns files that exist.
pub fn discover_config_files() -> Vec<PathBuf> {
    discover_config_files_with_override(None)
}

/// Discover config files, optionally with a CLI override path.
///
/// If `cli_path` is provided it replaces the local override. A CLI path that
/// does not exist is still returned so loading reports it instead of silently
/// falling back.
pub fn discover_config_files_with_override(cli_path: Option<&Path>) -> Vec<PathBuf> {
    let mut files = Vec::new();

    let system = PathBuf::from("/etc/axis-explorer/config.toml");
    if system.exists() {
        files.push(system);
    }

    // XDG_CONFIG_HOME or ~/.config
    if let Some(config_dir) = directories::BaseDirs::new().map(|d| d.config_dir().to_path_buf()) {
        let user = config_dir.join("axis-explorer/config.toml");
        if user.exists() {
            files.push(user);
        }
    }

    if let Some(path) = cli_path {
        files.push(path.to_path_buf());
        return files;
    }

    let local = PathBuf::from("axis-explorer.toml");
    if local.exists() {
        files.push(local);
    }

    files
}

/// Read a TOML file and apply it on top of `config`.
pub fn load_from_file(config: &mut AxisConfig, path: &Path) -> Result<(), ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    apply_toml(config, &contents, path)
}

/// Apply the keys present in a TOML document on top of `config`. Keys that
/// are absent leave the current value alone, so files layer naturally.
pub fn apply_toml(config: &mut AxisConfig, contents: &str, path: &Path) -> Result<(), ConfigError> {
    let table: toml::Table = contents.parse().map_err(|e: toml::de::Error| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let invalid = |key: &str, expected: &str| ConfigError::Invalid {
        key: key.to_string(),
        message: format!("expected {expected} in {}", path.display()),
    };

    if let Some(midi) = table.get("midi").and_then(|v| v.as_table()) {
        if let Some(v) = midi.get("output_port") {
            config.midi.output_port = v
                .as_str()
                .ok_or_else(|| invalid("midi.output_port", "a string"))?
                .to_string();
        }
        if let Some(v) = midi.get("channel") {
            let channel = v
                .as_integer()
                .ok_or_else(|| invalid("midi.channel", "an integer"))?;
            config.midi.channel = i32::try_from(channel)
                .map_err(|_| invalid("midi.channel", "a 32-bit integer"))?;
        }
        if let Some(v) = midi.get("chord_degree_cc") {
            config.midi.chord_degree_cc = v
                .as_integer()
                .and_then(parse_controller)
                .ok_or_else(|| invalid("midi.chord_degree_cc", "an integer in 0..=127"))?;
        }
    }

    if let Some(deck) = table.get("deck").and_then(|v| v.as_table()) {
        if let Some(v) = deck.get("color") {
            config.deck.color = v
                .as_bool()
                .ok_or_else(|| invalid("deck.color", "a boolean"))?;
        }
        if let Some(v) = deck.get("initial_root") {
            let root = v
                .as_str()
                .ok_or_else(|| invalid("deck.initial_root", "a pitch name"))?;
            config.deck.initial_root = Some(root.to_string());
        }
    }

    if let Some(telemetry) = table.get("telemetry").and_then(|v| v.as_table()) {
        if let Some(v) = telemetry.get("log_level") {
            config.telemetry.log_level = v
                .as_str()
                .ok_or_else(|| invalid("telemetry.log_level", "a string"))?
                .to_string();
        }
    }

    Ok(())
}

fn parse_controller(value: i64) -> Option<u8> {
    u8::try_from(value).ok().filter(|v| *v <= 127)
}

/// Apply environment variable overrides from the process environment.
pub fn apply_env_overrides(
    config: &mut AxisConfig,
    sources: &mut ConfigSources,
) -> Result<(), ConfigError> {
    apply_env_overrides_from(config, sources, |key| env::var(key).ok())
}

/// Apply environment overrides using `lookup` in place of `std::env::var`.
pub fn apply_env_overrides_from(
    config: &mut AxisConfig,
    sources: &mut ConfigSources,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), ConfigError> {
    let invalid = |key: &str, value: &str| ConfigError::Invalid {
        key: key.to_string(),
        message: format!("unusable value {value:?}"),
    };

    if let Some(v) = lookup("AXIS_MIDI_PORT") {
        config.midi.output_port = v;
        sources.env_overrides.push("AXIS_MIDI_PORT".to_string());
    }
    if let Some(v) = lookup("AXIS_MIDI_CHANNEL") {
        config.midi.channel = v.trim().parse().map_err(|_| invalid("AXIS_MIDI_CHANNEL", &v))?;
        sources.env_overrides.push("AXIS_MIDI_CHANNEL".to_string());
    }
    if let Some(v) = lookup("AXIS_CHORD_DEGREE_CC") {
        config.midi.chord_degree_cc = v
            .trim()
            .parse::<i64>()
            .ok()
            .and_then(parse_controller)
            .ok_or_else(|| invalid("AXIS_CHORD_DEGREE_CC", &v))?;
        sources.env_overrides.push("AXIS_CHORD_DEGREE_CC".to_string());
    }

    if let Some(v) = lookup("AXIS_COLOR") {
        config.deck.color = match v.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => return Err(invalid("AXIS_COLOR", &v)),
        };
        sources.env_overrides.push("AXIS_COLOR".to_string());
    }
    // Honor the informal NO_COLOR convention
    if lookup("NO_COLOR").is_some_and(|v| !v.is_empty()) {
        config.deck.color = false;
        sources.env_overrides.push("NO_COLOR".to_string());
    }
    if let Some(v) = lookup("AXIS_INITIAL_ROOT") {
        config.deck.initial_root = Some(v);
        sources.env_overrides.push("AXIS_INITIAL_ROOT".to_string());
    }

    if let Some(v) = lookup("AXIS_LOG_LEVEL") {
        config.telemetry.log_level = v;
        sources.env_overrides.push("AXIS_LOG_LEVEL".to_string());
    }
    // Also support RUST_LOG
    if let Some(v) = lookup("RUST_LOG") {
        config.telemetry.log_level = v;
        sources.env_overrides.push("RUST_LOG".to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_discover_config_files() {
        // Just verify it doesn't panic
        let _files = discover_config_files();
    }

    #[test]
    fn test_cli_path_is_kept_even_if_missing() {
        let path = Path::new("/nonexistent/axis.toml");
        let files = discover_config_files_with_override(Some(path));
        assert_eq!(files.last().map(PathBuf::as_path), Some(path));
    }

    #[test]
    fn test_parse_minimal_toml() {
        let toml = r#"
[midi]
channel = 5
"#;
        let mut config = AxisConfig::default();
        apply_toml(&mut config, toml, Path::new("test.toml")).unwrap();
        assert_eq!(config.midi.channel, 5);
        // Other values should be defaults
        assert_eq!(config.midi.output_port, "NDLR");
        assert_eq!(config.midi.chord_degree_cc, 26);
    }

    #[test]
    fn test_parse_full_toml() {
        let toml = r#"
[midi]
output_port = "NDLR MIDI 1"
channel = 16
chord_degree_cc = 27

[deck]
color = false
initial_root = "F#"

[telemetry]
log_level = "debug,axis=trace"
"#;
        let mut config = AxisConfig::default();
        apply_toml(&mut config, toml, Path::new("test.toml")).unwrap();
        assert_eq!(config.midi.output_port, "NDLR MIDI 1");
        assert_eq!(config.midi.channel, 16);
        assert_eq!(config.midi.chord_degree_cc, 27);
        assert!(!config.deck.color);
        assert_eq!(config.deck.initial_root.as_deref(), Some("F#"));
        assert_eq!(config.telemetry.log_level, "debug,axis=trace");
    }

    #[test]
    fn test_later_file_wins_only_for_present_keys() {
        let mut config = AxisConfig::default();
        apply_toml(&mut config, "[midi]\nchannel = 3\noutput_port = \"A\"\n", Path::new("a.toml")).unwrap();
        apply_toml(&mut config, "[midi]\noutput_port = \"B\"\n", Path::new("b.toml")).unwrap();
        assert_eq!(config.midi.output_port, "B");
        assert_eq!(config.midi.channel, 3);
    }

    #[test]
    fn test_parse_error_names_file() {
        let mut config = AxisConfig::default();
        let err = apply_toml(&mut config, "[midi\n", Path::new("broken.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { ref path, .. } if path == Path::new("broken.toml")));
    }

    #[test]
    fn test_wrong_types_are_rejected() {
        let mut config = AxisConfig::default();
        let err = apply_toml(&mut config, "[midi]\nchannel = \"one\"\n", Path::new("t.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref key, .. } if key == "midi.channel"));

        let err = apply_toml(&mut config, "[midi]\nchord_degree_cc = 200\n", Path::new("t.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref key, .. } if key == "midi.chord_degree_cc"));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AxisConfig::default();
        let mut sources = ConfigSources::default();
        let env = env_of(&[
            ("AXIS_MIDI_PORT", "loopMIDI"),
            ("AXIS_MIDI_CHANNEL", "10"),
            ("AXIS_CHORD_DEGREE_CC", "27"),
            ("AXIS_INITIAL_ROOT", "Bb"),
            ("AXIS_COLOR", "off"),
        ]);
        apply_env_overrides_from(&mut config, &mut sources, env).unwrap();

        assert_eq!(config.midi.output_port, "loopMIDI");
        assert_eq!(config.midi.channel, 10);
        assert_eq!(config.midi.chord_degree_cc, 27);
        assert_eq!(config.deck.initial_root.as_deref(), Some("Bb"));
        assert!(!config.deck.color);
        assert_eq!(sources.env_overrides.len(), 5);
    }

    #[test]
    fn test_rust_log_beats_axis_log_level() {
        let mut config = AxisConfig::default();
        let mut sources = ConfigSources::default();
        let env = env_of(&[("AXIS_LOG_LEVEL", "warn"), ("RUST_LOG", "trace")]);
        apply_env_overrides_from(&mut config, &mut sources, env).unwrap();
        assert_eq!(config.telemetry.log_level, "trace");
    }

    #[test]
    fn test_bad_env_value_is_an_error() {
        let mut config = AxisConfig::default();
        let mut sources = ConfigSources::default();
        let env = env_of(&[("AXIS_MIDI_CHANNEL", "ten")]);
        let err = apply_env_overrides_from(&mut config, &mut sources, env).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref key, .. } if key == "AXIS_MIDI_CHANNEL"));
    }

    #[test]
    fn test_no_color_convention() {
        let mut config = AxisConfig::default();
        let mut sources = ConfigSources::default();
        apply_env_overrides_from(&mut config, &mut sources, env_of(&[("NO_COLOR", "1")])).unwrap();
        assert!(!config.deck.color);
    }
}
