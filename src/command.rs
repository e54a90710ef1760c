//! Command-based control of the app state.

use crate::types::StrobePattern;

/// UI intents routed by [`crate::app::AppState::handle_intent`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AppIntent {
    /// Main light button.
    ToggleLight,
    /// Brightness slider, `[0.1, 1.0]`.
    SetBrightness(f32),
    /// Strobe mode switch.
    SetStrobeMode(bool),
    /// Pattern picker.
    SelectPattern(StrobePattern),
    /// Speed slider, `[0.5, 5.0]` in 0.5 steps.
    SetSpeed(f32),
    /// Start strobe button.
    StartStrobe,
    /// Stop strobe button.
    StopStrobe,
    /// "Continue" on the seizure-risk warning.
    AcknowledgeSafetyWarning,
    /// "Cancel" on the seizure-risk warning.
    DeclineSafetyWarning,
    /// Tint picker row.
    SelectColor(usize),
}

/// Result of asking to start a strobe session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StartOutcome {
    /// The session is running.
    Started,
    /// The UI must show the seizure-risk warning; the start is pending.
    AwaitingAcknowledgment,
    /// Strobe mode is switched off.
    StrobeModeDisabled,
    /// The device has no usable torch.
    TorchUnavailable,
}
