//! Game settings and car tuning
//!
//! Loaded from a JSON file; any field left out keeps its default.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::Result;
use crate::sim::{CarParams, FinishRule};

/// Environment variable naming a settings file
pub const SETTINGS_ENV: &str = "WACKY_RACERS_SETTINGS";
/// Settings file picked up from the working directory
pub const SETTINGS_FILE: &str = "wacky_racers.json";

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Simulation ticks (and frames) per second
    pub fps: u32,
    /// Player car tuning
    pub player: CarParams,
    /// Computer car tuning
    pub computer: CarParams,
    /// How finish-line crossings are classified
    pub finish_rule: FinishRule,
    /// Quantized orientations cached for the car mask
    pub rotation_buckets: u32,
    /// Road half-width of the built-in circuit
    pub track_half_width: f32,
    /// Draw the computer car's waypoints
    pub show_path: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fps: FPS,
            player: CarParams::default(),
            computer: CarParams::default(),
            finish_rule: FinishRule::default(),
            rotation_buckets: ROTATION_BUCKETS,
            track_half_width: TRACK_HALF_WIDTH,
            show_path: true,
        }
    }
}

impl Settings {
    /// Parse settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load settings from a JSON file
    pub fn load_from(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Settings file to use: explicit path, then the environment, then the
    /// working directory file if it exists
    pub fn locate(explicit: Option<PathBuf>) -> Option<PathBuf> {
        explicit
            .or_else(|| std::env::var_os(SETTINGS_ENV).map(PathBuf::from))
            .or_else(|| {
                let local = PathBuf::from(SETTINGS_FILE);
                local.exists().then_some(local)
            })
    }

    /// Load from `path` if given, falling back to defaults on any error
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            log::info!("Using default settings");
            return Self::default();
        };
        match Self::load_from(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring settings file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Seconds represented by `ticks` at the configured rate
    pub fn ticks_to_secs(&self, ticks: u64) -> f32 {
        ticks as f32 / self.fps.max(1) as f32
    }
}
