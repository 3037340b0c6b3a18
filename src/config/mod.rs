pub mod loader;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use crate::components::PlayArea;
use crate::game::{PLAY_AREA_HEIGHT, PLAY_AREA_WIDTH};
use crate::store::default_store_path;

// Global configuration instance with thread-safe access
pub static CONFIG: once_cell::sync::Lazy<Arc<RwLock<Config>>> =
    once_cell::sync::Lazy::new(|| Arc::new(RwLock::new(Config::default())));

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub gameplay: GameplayConfig,
    pub audio: AudioConfig,
    pub display: DisplayConfig,
    pub storage: StorageConfig,
}

impl Config {
    /// Snapshot of the global configuration.
    #[must_use]
    pub fn current() -> Self {
        CONFIG
            .read()
            .map(|config| config.clone())
            .unwrap_or_default()
    }

    /// Replaces the global configuration.
    pub fn install(config: Config) {
        if let Ok(mut current) = CONFIG.write() {
            *current = config;
        }
    }

    /// Edits the global configuration in place.
    pub fn update(edit: impl FnOnce(&mut Config)) {
        if let Ok(mut current) = CONFIG.write() {
            edit(&mut current);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplayConfig {
    pub play_area_width: f32,
    pub play_area_height: f32,
}

impl Default for GameplayConfig {
    fn default() -> Self {
        Self {
            play_area_width: PLAY_AREA_WIDTH,
            play_area_height: PLAY_AREA_HEIGHT,
        }
    }
}

impl GameplayConfig {
    // Non-positive sizes fall back to the defaults
    #[must_use]
    pub fn play_area(&self) -> PlayArea {
        let width = if self.play_area_width > 0.0 {
            self.play_area_width
        } else {
            PLAY_AREA_WIDTH
        };
        let height = if self.play_area_height > 0.0 {
            self.play_area_height
        } else {
            PLAY_AREA_HEIGHT
        };
        PlayArea { width, height }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub sound_enabled: bool,
    pub volume: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            volume: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Milliseconds between redraws
    pub frame_interval_ms: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: 33,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_score_path: Option<PathBuf>,
}

impl StorageConfig {
    #[must_use]
    pub fn best_score_path(&self) -> PathBuf {
        self.best_score_path.clone().unwrap_or_else(default_store_path)
    }
}
