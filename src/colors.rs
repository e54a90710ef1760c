//! Screen overlay tint colors.
//!
//! The overlay is the on-screen companion to the torch: a full-screen tint in
//! the selected color whose opacity follows the torch brightness.

use crate::types::Brightness;
use palette::{Srgb, Srgba};

/// Overlay opacity while the light is off.
pub const DIM_OVERLAY_ALPHA: f32 = 0.1;

/// A selectable tint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TintColor {
    pub name: &'static str,
    pub color: Srgb,
}

/// Tints in picker order. Index 0 is the default.
pub const TINTS: [TintColor; 6] = [
    TintColor {
        name: "White",
        color: Srgb::new(1.0, 1.0, 1.0),
    },
    TintColor {
        name: "Red",
        color: Srgb::new(1.0, 0.0, 0.0),
    },
    TintColor {
        name: "Green",
        color: Srgb::new(0.0, 1.0, 0.0),
    },
    TintColor {
        name: "Blue",
        color: Srgb::new(0.0, 0.0, 1.0),
    },
    TintColor {
        name: "Yellow",
        color: Srgb::new(1.0, 1.0, 0.0),
    },
    TintColor {
        name: "Purple",
        color: Srgb::new(0.5, 0.0, 0.5),
    },
];

/// Returns the tint at `index`, if it exists.
#[inline]
pub fn tint(index: usize) -> Option<&'static TintColor> {
    TINTS.get(index)
}

/// Computes the overlay color for a tint.
///
/// Opacity equals the brightness while the light is on and
/// [`DIM_OVERLAY_ALPHA`] while it is off.
pub fn overlay(color: Srgb, light_on: bool, brightness: Brightness) -> Srgba {
    let alpha = if light_on {
        brightness.level()
    } else {
        DIM_OVERLAY_ALPHA
    };
    Srgba::new(color.red, color.green, color.blue, alpha)
}
