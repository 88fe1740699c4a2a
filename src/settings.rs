//! Host settings
//!
//! Loaded from an optional JSON file; missing keys fall back to defaults so a
//! file can override just the values it cares about.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{INITIAL_LIVES, TICK_HZ};
use crate::error::ConfigError;

/// Highest accepted tick rate
pub const MAX_TICK_HZ: u32 = 1000;

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Simulation ticks per second
    pub tick_hz: u32,
    /// Run seed (level layouts and power-up drops)
    pub seed: u64,
    /// Lives at the start of each run
    pub initial_lives: u32,
    /// Stop the headless host after this many ticks (None = until quit)
    pub max_ticks: Option<u64>,
    /// How many times the headless autopilot restarts after game over
    pub autopilot_restarts: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_hz: TICK_HZ,
            seed: 0,
            initial_lives: INITIAL_LIVES,
            max_ticks: Some(60 * TICK_HZ as u64),
            autopilot_restarts: 0,
        }
    }
}

impl Settings {
    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_hz == 0 || self.tick_hz > MAX_TICK_HZ {
            return Err(ConfigError::Invalid {
                field: "tick_hz",
                reason: format!("must be in 1..={}, got {}", MAX_TICK_HZ, self.tick_hz),
            });
        }
        if self.initial_lives == 0 {
            return Err(ConfigError::Invalid {
                field: "initial_lives",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Tick period in milliseconds
    pub fn tick_period_ms(&self) -> f64 {
        1000.0 / self.tick_hz.max(1) as f64
    }
}
