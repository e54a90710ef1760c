//! User-facing app state.
//!
//! [`AppState`] holds the toggles a UI presents and routes UI intents either
//! directly to the torch (main light, brightness) or to the
//! [`StrobeScheduler`] (strobe sessions). It has no UI dependency.

use crate::colors::{self, TintColor};
use crate::command::{AppIntent, StartOutcome};
use crate::config::StrobeConfig;
use crate::preferences::PreferenceStore;
use crate::scheduler::{ServiceTiming, StrobeScheduler};
use crate::time::{TimeInstant, TimeSource};
use crate::timer::DEFAULT_QUEUE_CAPACITY;
use crate::torch::{Torch, TorchController};
use crate::types::{Brightness, StrobePattern, StrobeSpeed, TorchError};
use palette::Srgba;

/// Errors returned for rejected intents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AppError {
    /// The tint index is outside the palette.
    InvalidColorIndex { index: usize, available: usize },
}

impl core::fmt::Display for AppError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            AppError::InvalidColorIndex { index, available } => {
                write!(
                    f,
                    "color index {} out of range ({} colors available)",
                    index, available
                )
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for AppError {}

/// App-level state owned by the UI layer.
pub struct AppState<
    't,
    I: TimeInstant,
    C: TorchController,
    T: TimeSource<I>,
    P: PreferenceStore,
    const Q: usize = DEFAULT_QUEUE_CAPACITY,
> {
    scheduler: StrobeScheduler<'t, I, C, T, Q>,
    preferences: P,
    brightness: Brightness,
    strobe_mode: bool,
    pattern: StrobePattern,
    speed: StrobeSpeed,
    safety_acknowledged: bool,
    awaiting_acknowledgment: bool,
    color_index: usize,
}

impl<'t, I, C, T, P, const Q: usize> AppState<'t, I, C, T, P, Q>
where
    I: TimeInstant,
    C: TorchController,
    T: TimeSource<I>,
    P: PreferenceStore,
{
    /// Creates the app state with the light off and strobe mode disabled.
    ///
    /// The selected color is restored from `preferences`; unknown indices
    /// fall back to the first tint.
    pub fn new(controller: C, time_source: &'t T, preferences: P, config: StrobeConfig) -> Self {
        let color_index = preferences
            .load_color_index()
            .filter(|&index| colors::tint(index).is_some())
            .unwrap_or(0);
        let brightness = config.brightness();
        let speed = config.speed();
        let pattern = config.initial_pattern;

        Self {
            scheduler: StrobeScheduler::new(Torch::new(controller), time_source, config),
            preferences,
            brightness,
            strobe_mode: false,
            pattern,
            speed,
            safety_acknowledged: false,
            awaiting_acknowledgment: false,
            color_index,
        }
    }

    /// Handles a UI intent by dispatching to the matching method.
    ///
    /// # Returns
    /// * `Ok(Some(outcome))` - For intents that may start a strobe session
    /// * `Ok(None)` - For all other intents
    /// * `Err` - The intent was rejected
    pub fn handle_intent(&mut self, intent: AppIntent) -> Result<Option<StartOutcome>, AppError> {
        match intent {
            AppIntent::ToggleLight => self.toggle_light(),
            AppIntent::SetBrightness(level) => self.set_brightness(Brightness::new(level)),
            AppIntent::SetStrobeMode(enabled) => self.set_strobe_mode(enabled),
            AppIntent::SelectPattern(pattern) => self.set_pattern(pattern),
            AppIntent::SetSpeed(multiplier) => {
                self.set_speed(StrobeSpeed::from_multiplier(multiplier));
            }
            AppIntent::StartStrobe => return Ok(Some(self.request_strobe_start())),
            AppIntent::StopStrobe => self.stop_strobe(),
            AppIntent::AcknowledgeSafetyWarning => return Ok(self.acknowledge_safety_warning()),
            AppIntent::DeclineSafetyWarning => self.decline_safety_warning(),
            AppIntent::SelectColor(index) => self.select_color(index)?,
        }
        Ok(None)
    }

    /// Flips the main light.
    ///
    /// While a strobe session runs, the toggle stops it and leaves the light
    /// off. Does nothing when the torch is unavailable.
    pub fn toggle_light(&mut self) {
        if !self.is_torch_available() {
            log::debug!("toggle ignored: torch unavailable");
            return;
        }
        if self.scheduler.is_running() {
            self.scheduler.stop();
            return;
        }

        let torch = self.scheduler.torch_mut();
        let result = if torch.is_on() {
            torch.turn_off()
        } else {
            torch.set(true, self.brightness)
        };
        log_torch_failure("toggle light", result);
    }

    /// Sets the brightness level.
    ///
    /// With the light on and no strobe running, the torch is updated in
    /// place without toggling. A running strobe uses the new level from its
    /// next step onward.
    pub fn set_brightness(&mut self, brightness: Brightness) {
        self.brightness = brightness;
        if self.scheduler.is_running() {
            self.scheduler.set_brightness(brightness);
            return;
        }

        let torch = self.scheduler.torch_mut();
        if torch.is_on() {
            let result = torch.set_brightness(brightness);
            log_torch_failure("update brightness", result);
        }
    }

    /// Enables or disables strobe mode. Disabling stops a running session.
    pub fn set_strobe_mode(&mut self, enabled: bool) {
        self.strobe_mode = enabled;
        if !enabled {
            self.awaiting_acknowledgment = false;
            if self.scheduler.is_running() {
                self.scheduler.stop();
            }
        }
    }

    /// Selects the pattern used by the next session.
    pub fn set_pattern(&mut self, pattern: StrobePattern) {
        self.pattern = pattern;
    }

    /// Selects the speed used by the next session.
    pub fn set_speed(&mut self, speed: StrobeSpeed) {
        self.speed = speed;
    }

    /// Asks to start a strobe session with the selected pattern and speed.
    ///
    /// The first start of each app session waits for
    /// [`acknowledge_safety_warning`](Self::acknowledge_safety_warning).
    pub fn request_strobe_start(&mut self) -> StartOutcome {
        if !self.strobe_mode {
            return StartOutcome::StrobeModeDisabled;
        }
        if !self.is_torch_available() {
            log::debug!("strobe start ignored: torch unavailable");
            return StartOutcome::TorchUnavailable;
        }
        if !self.safety_acknowledged {
            self.awaiting_acknowledgment = true;
            return StartOutcome::AwaitingAcknowledgment;
        }

        self.awaiting_acknowledgment = false;
        self.scheduler.start(self.pattern, self.speed, self.brightness);
        StartOutcome::Started
    }

    /// Records the seizure-risk acknowledgment and runs a pending start.
    ///
    /// Returns `None` if no start was waiting on the warning.
    pub fn acknowledge_safety_warning(&mut self) -> Option<StartOutcome> {
        self.safety_acknowledged = true;
        if !self.awaiting_acknowledgment {
            return None;
        }
        Some(self.request_strobe_start())
    }

    /// Dismisses the warning without starting.
    pub fn decline_safety_warning(&mut self) {
        self.awaiting_acknowledgment = false;
    }

    /// Stops any strobe session and turns the torch off.
    pub fn stop_strobe(&mut self) {
        self.awaiting_acknowledgment = false;
        self.scheduler.stop();
    }

    /// Fires due strobe ticks. See [`StrobeScheduler::service`].
    pub fn service(&mut self) -> ServiceTiming<I::Duration> {
        let timing = self.scheduler.service();
        if matches!(timing, ServiceTiming::Complete) {
            log::info!("strobe session finished");
        }
        timing
    }

    /// Selects and persists the overlay tint.
    ///
    /// Persistence failures are logged; the selection still applies.
    pub fn select_color(&mut self, index: usize) -> Result<(), AppError> {
        if colors::tint(index).is_none() {
            return Err(AppError::InvalidColorIndex {
                index,
                available: colors::TINTS.len(),
            });
        }
        self.color_index = index;
        if let Err(e) = self.preferences.save_color_index(index) {
            log::warn!("Failed to persist color selection: {}", e);
        }
        Ok(())
    }

    /// Overlay color for the current tint, light state and brightness.
    pub fn overlay_color(&self) -> Srgba {
        colors::overlay(
            self.selected_tint().color,
            self.is_light_on(),
            self.brightness,
        )
    }

    /// Returns the selected tint.
    pub fn selected_tint(&self) -> &'static TintColor {
        colors::tint(self.color_index).unwrap_or(&colors::TINTS[0])
    }

    /// Returns the selected tint index.
    pub fn color_index(&self) -> usize {
        self.color_index
    }

    /// Returns true if the torch is currently lit.
    pub fn is_light_on(&self) -> bool {
        self.scheduler.torch().is_on()
    }

    /// Returns false when controls should be shown disabled.
    pub fn is_torch_available(&self) -> bool {
        self.scheduler.torch().is_available()
    }

    /// Returns true while a strobe session runs.
    pub fn is_strobe_active(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Returns true if strobe mode is switched on.
    pub fn is_strobe_mode(&self) -> bool {
        self.strobe_mode
    }

    /// Returns true while a start waits on the seizure-risk warning.
    pub fn is_awaiting_acknowledgment(&self) -> bool {
        self.awaiting_acknowledgment
    }

    /// Returns true once the warning was acknowledged in this session.
    pub fn is_safety_acknowledged(&self) -> bool {
        self.safety_acknowledged
    }

    /// Returns the selected brightness.
    pub fn brightness(&self) -> Brightness {
        self.brightness
    }

    /// Returns the pattern used by the next session.
    pub fn pattern(&self) -> StrobePattern {
        self.pattern
    }

    /// Returns the speed used by the next session.
    pub fn speed(&self) -> StrobeSpeed {
        self.speed
    }

    /// Returns the strobe scheduler.
    pub fn scheduler(&self) -> &StrobeScheduler<'t, I, C, T, Q> {
        &self.scheduler
    }

    /// Returns the preference store.
    pub fn preferences(&self) -> &P {
        &self.preferences
    }
}

fn log_torch_failure(operation: &str, result: Result<(), TorchError>) {
    match result {
        Ok(()) => {}
        Err(TorchError::Unavailable) => log::debug!("{}: torch unavailable", operation),
        Err(e) => log::warn!("{}: {}", operation, e),
    }
}
