//! Data-driven race setup
//!
//! A race is described by a small JSON config: seed, roster, course choice.
//! Everything has a sensible default so the binary runs with no file at all.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::sim::map::{ClassicLayout, LayoutProvider, SeededLayout};

pub use crate::sim::map::Difficulty;

/// Which course generator to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutKind {
    /// The original fixed course
    #[default]
    Classic,
    /// Difficulty-scaled seeded course
    Seeded,
}

/// Race configuration, loadable from JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceConfig {
    /// Run seed; `None` means take one from the clock
    pub seed: Option<u64>,
    /// Number of racing balls (the original sized this by the skins folder)
    pub num_balls: usize,
    /// Identity labels for the roster; missing entries get generated names
    pub names: Vec<String>,
    pub layout: LayoutKind,
    pub difficulty: Difficulty,
    /// Pace ticks against the wall clock instead of running flat out
    pub realtime: bool,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            seed: None,
            num_balls: 12,
            names: Vec::new(),
            layout: LayoutKind::Classic,
            difficulty: Difficulty::Normal,
            realtime: false,
        }
    }
}

impl RaceConfig {
    /// Load a config from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// The layout provider this config selects.
    pub fn provider(&self) -> Box<dyn LayoutProvider> {
        match self.layout {
            LayoutKind::Classic => Box::new(ClassicLayout),
            LayoutKind::Seeded => Box::new(SeededLayout {
                difficulty: self.difficulty,
            }),
        }
    }
}

/// Failure to read or parse a race config
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "failed to read config: {e}"),
            ConfigError::Parse(e) => write!(f, "failed to parse config: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RaceConfig::default();
        assert_eq!(config.num_balls, 12);
        assert_eq!(config.layout, LayoutKind::Classic);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: RaceConfig =
            serde_json::from_str(r#"{"seed": 42, "layout": "seeded"}"#).unwrap();
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.layout, LayoutKind::Seeded);
        assert_eq!(config.num_balls, 12);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = RaceConfig::load(Path::new("/nonexistent/race.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
