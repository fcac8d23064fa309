//! Game configuration
//!
//! Loaded from a RON file, with fallback to built-in defaults when the file
//! is missing or unreadable.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::HmMove;

/// Default location of the configuration file
pub const DEFAULT_CONFIG_PATH: &str = "assets/config.ron";

/// Errors while reading configuration and data tables
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Ron {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },
}

/// Everything the save system and overworld read at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Stamped into snapshots; only matching snapshots are listed
    pub build_version: String,
    /// Snapshot file extension, without the dot
    pub save_extension: String,
    /// Save under the platform data directory instead of `./Saves`
    pub use_app_data: bool,
    /// Explicit save directory, overrides `use_app_data`
    pub save_dir: Option<PathBuf>,
    /// Badge required for each field move; moves not listed need none
    pub hm_badges: BTreeMap<HmMove, u8>,
    /// Smash-rock item table (`map|{id,chance}|...` lines)
    pub smash_rock_items: PathBuf,
    /// Wild encounter table (RON)
    pub encounters: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        let hm_badges = BTreeMap::from([
            (HmMove::Flash, 1),
            (HmMove::Cut, 2),
            (HmMove::Strength, 3),
            (HmMove::Surf, 4),
            (HmMove::Whirlpool, 7),
            (HmMove::Waterfall, 8),
        ]);
        Self {
            build_version: "0.0.1".to_string(),
            save_extension: "pku".to_string(),
            use_app_data: false,
            save_dir: None,
            hm_badges,
            smash_rock_items: PathBuf::from("assets/data/smashrockitems.dat"),
            encounters: PathBuf::from("assets/data/encounters.ron"),
        }
    }
}

impl GameConfig {
    /// Load from a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        ron::from_str(&content).map_err(|source| ConfigError::Ron {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from a RON file, falling back to defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Self::default();
        }
        Self::load(path).unwrap_or_else(|e| {
            log::warn!("{}. Using default configuration.", e);
            Self::default()
        })
    }

    /// Directory that holds the snapshot files
    pub fn save_directory(&self) -> PathBuf {
        if let Some(dir) = &self.save_dir {
            return dir.clone();
        }
        if self.use_app_data {
            use directories::ProjectDirs;

            if let Some(proj_dirs) = ProjectDirs::from("com", "pokemon-unity", "Pokemon Unity") {
                return proj_dirs.data_dir().join("Saves");
            }
            log::warn!("No platform data directory available, saving next to the game");
        }
        PathBuf::from("Saves")
    }

    /// Badge needed to use a field move outside battle
    pub fn required_badge(&self, hm: HmMove) -> Option<u8> {
        self.hm_badges.get(&hm).copied()
    }
}
