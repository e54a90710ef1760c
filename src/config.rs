//! Strobe and app tunables with sensible defaults.
//!
//! No config file is required; every field falls back to its default.

use crate::types::{Brightness, StrobePattern, StrobeSpeed};
use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StrobeConfig {
    /// Loop SOS indefinitely instead of playing it once.
    pub sos_repeat: bool,
    /// Pulse flash width in milliseconds (not scaled by speed).
    pub pulse_width_ms: u64,
    /// Brightness at startup, clamped into `[0.1, 1.0]`.
    pub initial_brightness: f32,
    /// Speed multiplier at startup, snapped to `[0.5, 5.0]` in 0.5 steps.
    pub initial_speed: f32,
    pub initial_pattern: StrobePattern,
}

impl Default for StrobeConfig {
    fn default() -> Self {
        Self {
            sos_repeat: false,
            pulse_width_ms: 100,
            initial_brightness: 1.0,
            initial_speed: 1.0,
            initial_pattern: StrobePattern::Constant,
        }
    }
}

impl StrobeConfig {
    /// Startup brightness as a validated level.
    pub fn brightness(&self) -> Brightness {
        Brightness::new(self.initial_brightness)
    }

    /// Startup speed as a validated multiplier.
    pub fn speed(&self) -> StrobeSpeed {
        StrobeSpeed::from_multiplier(self.initial_speed)
    }
}

/// Config file parse failure.
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct ConfigError(toml::de::Error);

#[cfg(feature = "std")]
impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "invalid strobe config: {}", self.0)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl StrobeConfig {
    /// Parses a TOML document; missing fields take their defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(ConfigError)
    }

    /// Loads config from `path`, or returns defaults if missing or invalid.
    pub fn load(path: impl AsRef<std::path::Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(contents) => match Self::from_toml_str(&contents) {
                Ok(config) => {
                    log::info!("Loaded strobe config from {}", path.display());
                    config
                }
                Err(e) => {
                    log::warn!("Failed to parse {}: {e}. Using defaults.", path.display());
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("No config file at {}. Using defaults.", path.display());
                Self::default()
            }
        }
    }
}
