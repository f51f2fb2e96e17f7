//! Replay script loading.
//!
//! A script is a TOML file holding engine settings, output preferences and
//! the ordered list of moves to play:
//!
//! ```toml
//! log_level = "debug"
//! format = "json"
//!
//! [engine]
//! origin = 1
//!
//! [[moves]]
//! piece = "whitePawn5"
//! to = [5, 4]
//! ```

use chess_core::{PieceId, Square};
use chess_engine::EngineConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::Level;

/// Errors that can occur when loading a replay script.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the script from disk.
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// The script is not valid TOML or has the wrong shape.
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    /// `log_level` names no tracing level.
    #[error("unknown log level: {0}")]
    InvalidLogLevel(String),
}

/// How events are written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One human-readable line per event.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// One scripted move: a piece name and a destination square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct ScriptedMove {
    pub piece: PieceId,
    pub to: Square,
}

/// A complete replay script.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ReplayConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    /// Defaults to "info".
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub format: OutputFormat,
    /// Moves in the order they are played, White first.
    #[serde(default)]
    pub moves: Vec<ScriptedMove>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ReplayConfig {
    fn default() -> Self {
        ReplayConfig {
            engine: EngineConfig::default(),
            log_level: default_log_level(),
            format: OutputFormat::default(),
            moves: Vec::new(),
        }
    }
}

impl ReplayConfig {
    /// Loads a script from `path`.
    ///
    /// A missing file yields the default script: a fresh game with no moves.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file exists but cannot be read,
    /// or [`ConfigError::ParseError`] if it is not a valid script.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::parse(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parses a script from TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// The configured log level.
    pub fn level(&self) -> Result<Level, ConfigError> {
        self.log_level
            .parse()
            .map_err(|_| ConfigError::InvalidLogLevel(self.log_level.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::Geometry;

    #[test]
    fn parses_full_script() {
        let config = ReplayConfig::parse(
            r#"
log_level = "debug"
format = "json"

[engine]
origin = 1

[[moves]]
piece = "whitePawn5"
to = [5, 4]

[[moves]]
piece = "blackKnight2"
to = [6, 6]
"#,
        )
        .unwrap();

        assert_eq!(config.engine.geometry(), Ok(Geometry::ONE_BASED));
        assert_eq!(config.level().unwrap(), Level::DEBUG);
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(
            config.moves,
            vec![
                ScriptedMove {
                    piece: "whitePawn5".parse().unwrap(),
                    to: Square::new(5, 4),
                },
                ScriptedMove {
                    piece: "blackKnight2".parse().unwrap(),
                    to: Square::new(6, 6),
                },
            ]
        );
    }

    #[test]
    fn missing_fields_use_defaults() {
        let config = ReplayConfig::parse("").unwrap();
        assert_eq!(config, ReplayConfig::default());
        assert_eq!(config.level().unwrap(), Level::INFO);
        assert_eq!(config.format, OutputFormat::Text);
        assert!(config.moves.is_empty());
    }

    #[test]
    fn rejects_bad_piece_names() {
        let err = ReplayConfig::parse(
            r#"
[[moves]]
piece = "greenPawn1"
to = [0, 0]
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn rejects_unknown_log_level() {
        let config = ReplayConfig::parse(r#"log_level = "chatty""#).unwrap();
        assert!(matches!(config.level(), Err(ConfigError::InvalidLogLevel(_))));
    }

    #[test]
    fn missing_file_is_default() {
        let config = ReplayConfig::load(Path::new("does/not/exist.toml")).unwrap();
        assert_eq!(config, ReplayConfig::default());
    }
}
