//! Game settings
//!
//! Window size, RNG seed and starting level, plus the embedded gameplay
//! [`Tuning`]. Loaded from a JSON file by the native runner.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{WINDOW_HEIGHT, WINDOW_WIDTH};
use crate::tuning::Tuning;

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Window width used for wall bounces and level layout
    pub width: f32,
    /// Window height; balls and powerups below it are lost
    pub height: f32,
    /// Seed for powerup spawns and particle jitter
    pub seed: u64,
    /// Index into the level list selected at startup
    pub start_level: usize,
    /// Gameplay balance
    pub tuning: Tuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: WINDOW_WIDTH,
            height: WINDOW_HEIGHT,
            seed: 0x5EED,
            start_level: 0,
            tuning: Tuning::default(),
        }
    }
}

impl Settings {
    /// Parse settings from JSON (missing fields use defaults)
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load settings from a JSON file, falling back to defaults on any error
    pub fn load(path: &Path) -> Self {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Could not read settings {}: {}", path.display(), e);
                return Self::default();
            }
        };

        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Invalid settings {}: {}, using defaults", path.display(), e);
                Self::default()
            }
        }
    }
}
