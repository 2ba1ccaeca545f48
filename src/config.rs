//! Runtime configuration, read once at startup from an optional TOML file.
//!
//! Every key is optional; a missing file at the default location means all
//! defaults.  Gameplay constants (speeds, spawn intervals, scores) live in
//! `compute` and are not configurable.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use log::LevelFilter;
use serde::Deserialize;

use crate::compute::EDGE_OFFSET;
use crate::error::{GameError, Result};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "STAR_SHOOTER_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "star_shooter.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Logical window width in game units.
    pub window_width: f32,
    /// Logical window height in game units.
    pub window_height: f32,
    pub target_fps: u32,
    /// Shots per second while fire is held.
    pub fire_rate: f32,
    /// Log destination.  No file, no logging (the terminal is busy).
    pub log_file: Option<PathBuf>,
    /// Default filter; `RUST_LOG` overrides it.
    pub log_level: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window_width: 800.0,
            window_height: 600.0,
            target_fps: 60,
            fire_rate: 3.0,
            log_file: None,
            log_level: "info".to_string(),
        }
    }
}

impl GameConfig {
    /// Load from `$STAR_SHOOTER_CONFIG`, else `star_shooter.toml` if it exists,
    /// else defaults.  The result is validated.
    pub fn load() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path)),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::from_file(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| GameError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&text).map_err(|source| GameError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let min_extent = 2.0 * EDGE_OFFSET;
        let fits = |extent: f32| extent.is_finite() && extent > min_extent;
        if !fits(self.window_width) || !fits(self.window_height) {
            return Err(GameError::InvalidConfig(format!(
                "window must be finite and larger than {min_extent} in both directions, got {}x{}",
                self.window_width, self.window_height
            )));
        }
        if !(self.fire_rate.is_finite() && self.fire_rate > 0.0) {
            return Err(GameError::InvalidConfig(format!(
                "fire_rate must be positive and finite, got {}",
                self.fire_rate
            )));
        }
        if self.target_fps == 0 {
            return Err(GameError::InvalidConfig("target_fps must be at least 1".to_string()));
        }
        self.level_filter()?;
        Ok(())
    }

    pub fn level_filter(&self) -> Result<LevelFilter> {
        LevelFilter::from_str(&self.log_level)
            .map_err(|_| GameError::InvalidConfig(format!("unknown log_level {:?}", self.log_level)))
    }

    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.target_fps.max(1) as f64)
    }
}
