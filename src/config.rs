//! Runtime configuration
//!
//! Loaded from a RON file, with every field falling back to a default so a
//! partial (or missing) file is fine.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name looked up in the working directory
pub const CONFIG_FILE: &str = "gloomcrawl.ron";

/// Tunables for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Root directory of the Lua content scripts
    pub scripts_dir: PathBuf,
    /// Milliseconds between tick events
    pub tick_ms: u64,
    /// Maximum number of entries kept in the message log
    pub log_capacity: usize,
    /// Ticks of input suppression after opening a modal screen
    pub menu_lock_ticks: u32,
    /// FOV range used when a class script does not specify one
    pub default_fov: i32,
    /// Fixed RNG seed (random when absent)
    pub seed: Option<u64>,
    /// Extra diagnostics in the message log
    pub debug: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            scripts_dir: PathBuf::from("scripts"),
            tick_ms: 30,
            log_capacity: 50,
            menu_lock_ticks: 5,
            default_fov: 8,
            seed: None,
            debug: false,
        }
    }
}

impl GameConfig {
    /// Parse a config from RON text
    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(text)?)
    }

    /// Load a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_ron(&text)
    }

    /// Resolve the config: explicit path, then working directory, then the
    /// platform config directory. Falls back to defaults.
    pub fn discover(explicit: Option<&Path>) -> Self {
        let mut candidates: Vec<PathBuf> = Vec::new();
        if let Some(path) = explicit {
            candidates.push(path.to_path_buf());
        }
        candidates.push(PathBuf::from(CONFIG_FILE));
        if let Some(dirs) = directories::ProjectDirs::from("", "", "gloomcrawl") {
            candidates.push(dirs.config_dir().join(CONFIG_FILE));
        }

        for path in candidates {
            if !path.exists() {
                continue;
            }
            match Self::load(&path) {
                Ok(config) => {
                    log::info!("Loaded config from {}", path.display());
                    return config;
                }
                Err(e) => log::warn!("Ignoring {}: {}", path.display(), e),
            }
        }

        log::info!("No config file found, using defaults");
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = GameConfig::from_ron("(tick_ms: 50, debug: true)").unwrap();
        assert_eq!(config.tick_ms, 50);
        assert!(config.debug);
        assert_eq!(config.log_capacity, 50);
        assert_eq!(config.scripts_dir, PathBuf::from("scripts"));
    }

    #[test]
    fn test_seed_parses() {
        let config = GameConfig::from_ron("(seed: Some(42))").unwrap();
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_bad_config_is_error() {
        assert!(GameConfig::from_ron("(tick_ms: \"fast\")").is_err());
    }
}
