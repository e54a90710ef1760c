//! Core value types shared by the torch, the scheduler and the app state.

use serde::Deserialize;

/// Strobe pattern selected by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(rename_all = "lowercase")]
pub enum StrobePattern {
    /// Alternate on/off every `1/speed` seconds.
    #[default]
    Constant,

    /// Short fixed-width flash after every `1/speed` seconds of darkness.
    Pulse,

    /// Morse SOS: three dots, three dashes, three dots.
    Sos,
}

impl StrobePattern {
    /// All patterns in display order.
    pub const ALL: [StrobePattern; 3] = [
        StrobePattern::Constant,
        StrobePattern::Pulse,
        StrobePattern::Sos,
    ];

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            StrobePattern::Constant => "Constant",
            StrobePattern::Pulse => "Pulse",
            StrobePattern::Sos => "SOS",
        }
    }
}

/// How many times a strobe program should repeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoopCount {
    /// Repeat a specific number of times.
    Finite(u32),

    /// Repeat until stopped.
    Infinite,
}

impl Default for LoopCount {
    fn default() -> Self {
        LoopCount::Infinite
    }
}

/// Strobe speed multiplier in `[0.5, 5.0]`, quantized to steps of `0.5`.
///
/// Stored as a count of half steps so that duration scaling stays exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StrobeSpeed(u8);

impl StrobeSpeed {
    /// Slowest speed (0.5x).
    pub const MIN: StrobeSpeed = StrobeSpeed(1);

    /// Fastest speed (5.0x).
    pub const MAX: StrobeSpeed = StrobeSpeed(10);

    /// Normal speed (1.0x).
    pub const NORMAL: StrobeSpeed = StrobeSpeed(2);

    /// Creates a speed from a multiplier, clamping to range and snapping to
    /// the nearest half step.
    pub fn from_multiplier(multiplier: f32) -> Self {
        if multiplier.is_nan() {
            return Self::NORMAL;
        }
        let clamped = multiplier.clamp(0.5, 5.0);
        // Positive after clamping, so truncation of `x + 0.5` rounds.
        let half_steps = (clamped * 2.0 + 0.5) as u8;
        StrobeSpeed(half_steps.clamp(Self::MIN.0, Self::MAX.0))
    }

    /// Creates a speed from a count of half steps (1 = 0.5x, 10 = 5.0x).
    pub fn from_half_steps(half_steps: u8) -> Self {
        StrobeSpeed(half_steps.clamp(Self::MIN.0, Self::MAX.0))
    }

    /// Returns the multiplier as a float.
    pub fn multiplier(self) -> f32 {
        f32::from(self.0) / 2.0
    }

    /// Returns the number of half steps.
    pub fn half_steps(self) -> u8 {
        self.0
    }

    /// Scales a base duration by `1/speed`, rounding to the nearest millisecond.
    pub fn scale_millis(self, base_millis: u64) -> u64 {
        let h = u64::from(self.0);
        (base_millis * 2 + h / 2) / h
    }
}

impl Default for StrobeSpeed {
    fn default() -> Self {
        Self::NORMAL
    }
}

/// Torch brightness level in `[0.1, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Brightness(f32);

impl Brightness {
    /// Dimmest usable level.
    pub const MIN: Brightness = Brightness(0.1);

    /// Full brightness.
    pub const MAX: Brightness = Brightness(1.0);

    /// Creates a brightness level, clamping into `[0.1, 1.0]`.
    pub fn new(level: f32) -> Self {
        if level.is_nan() {
            return Self::MAX;
        }
        Brightness(level.clamp(Self::MIN.0, Self::MAX.0))
    }

    /// Returns the level as a float.
    pub fn level(self) -> f32 {
        self.0
    }
}

impl Default for Brightness {
    fn default() -> Self {
        Self::MAX
    }
}

/// Errors reported by torch hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TorchError {
    /// The device has no controllable torch.
    Unavailable,

    /// The platform rejected the change (e.g. thermal throttling).
    ConfigurationFailed,
}

impl core::fmt::Display for TorchError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TorchError::Unavailable => write!(f, "torch hardware is unavailable"),
            TorchError::ConfigurationFailed => {
                write!(f, "torch configuration was rejected by the platform")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for TorchError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_snaps_to_half_steps() {
        assert_eq!(StrobeSpeed::from_multiplier(1.0), StrobeSpeed::NORMAL);
        assert_eq!(StrobeSpeed::from_multiplier(1.2).multiplier(), 1.0);
        assert_eq!(StrobeSpeed::from_multiplier(1.3).multiplier(), 1.5);
        assert_eq!(StrobeSpeed::from_multiplier(0.1), StrobeSpeed::MIN);
        assert_eq!(StrobeSpeed::from_multiplier(9.0), StrobeSpeed::MAX);
        assert_eq!(StrobeSpeed::from_multiplier(f32::NAN), StrobeSpeed::NORMAL);
        assert_eq!(StrobeSpeed::from_half_steps(0), StrobeSpeed::MIN);
    }

    #[test]
    fn speed_scales_durations() {
        assert_eq!(StrobeSpeed::NORMAL.scale_millis(1000), 1000);
        assert_eq!(StrobeSpeed::from_multiplier(2.0).scale_millis(1000), 500);
        assert_eq!(StrobeSpeed::MIN.scale_millis(1000), 2000);
        assert_eq!(StrobeSpeed::MAX.scale_millis(1000), 200);
        // 1000 / 1.5 = 666.67
        assert_eq!(StrobeSpeed::from_multiplier(1.5).scale_millis(1000), 667);
        assert_eq!(StrobeSpeed::from_multiplier(3.0).scale_millis(200), 67);
    }

    #[test]
    fn brightness_clamps_into_range() {
        assert_eq!(Brightness::new(0.0), Brightness::MIN);
        assert_eq!(Brightness::new(2.0), Brightness::MAX);
        assert_eq!(Brightness::new(0.5).level(), 0.5);
        assert_eq!(Brightness::new(f32::NAN), Brightness::MAX);
    }

    #[test]
    fn pattern_labels() {
        let labels = StrobePattern::ALL.map(StrobePattern::label);
        assert_eq!(labels, ["Constant", "Pulse", "SOS"]);
    }
}
