//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use sheetlens_snapshot::{
    DEFAULT_BODY_CHILD_INDEX, DEFAULT_COMPANION_MARKER, DEFAULT_MAX_ROWS,
    DEFAULT_SNAPSHOT_VARIABLE,
};

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub snapshot: SnapshotConfig,

    #[serde(default)]
    pub reader: ReaderConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the bootstrap script is looked for and what it assigns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotConfig {
    /// Variable the bootstrap script assigns the snapshot to.
    #[serde(default = "default_variable")]
    pub variable: String,

    /// Second marker a bootstrap script must contain.
    #[serde(default = "default_companion_marker")]
    pub companion_marker: String,

    /// Element index under `<body>` checked before scanning every script.
    #[serde(default = "default_body_child_index")]
    pub body_child_index: usize,
}

fn default_variable() -> String {
    DEFAULT_SNAPSHOT_VARIABLE.to_string()
}

fn default_companion_marker() -> String {
    DEFAULT_COMPANION_MARKER.to_string()
}

fn default_body_child_index() -> usize {
    DEFAULT_BODY_CHILD_INDEX
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            variable: default_variable(),
            companion_marker: default_companion_marker(),
            body_child_index: default_body_child_index(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReaderConfig {
    /// Row cap used when a call does not pass `max_rows`.
    #[serde(default = "default_max_rows")]
    pub default_max_rows: usize,
}

fn default_max_rows() -> usize {
    DEFAULT_MAX_ROWS
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            default_max_rows: default_max_rows(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.snapshot.variable, "bootstrapData");
        assert_eq!(config.snapshot.companion_marker, "firstchunk");
        assert_eq!(config.snapshot.body_child_index, 4);
        assert_eq!(config.reader.default_max_rows, 50);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Text);
    }

    #[test]
    fn test_defaults_match_decoder() {
        let markers = sheetlens_snapshot::LocatorMarkers::default();
        let snapshot = SnapshotConfig::default();
        assert_eq!(snapshot.variable, markers.variable);
        assert_eq!(snapshot.companion_marker, markers.companion);
        assert_eq!(snapshot.body_child_index, markers.body_child_index);
        assert_eq!(
            ReaderConfig::default().default_max_rows,
            sheetlens_snapshot::SnapshotReader::default().default_max_rows()
        );
    }

    #[test]
    fn test_partial_section_keeps_field_defaults() {
        let config: Config = toml::from_str("[snapshot]\nbody_child_index = 2\n").unwrap();
        assert_eq!(config.snapshot.body_child_index, 2);
        assert_eq!(config.snapshot.variable, "bootstrapData");
        assert_eq!(config.reader, ReaderConfig::default());
    }

    #[test]
    fn test_log_format_lowercase() {
        let config: Config = toml::from_str("[logging]\nformat = \"json\"\n").unwrap();
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(toml::from_str::<Config>("[logging]\nformat = \"Pretty\"\n").is_err());
    }
}
