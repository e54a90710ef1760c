//! Torch hardware abstraction.
//!
//! Provides the [`TorchController`] trait that platform code implements, and
//! [`Torch`] which owns a controller, mirrors the last state written to the
//! hardware, and suppresses redundant writes.

use crate::types::{Brightness, TorchError};

/// Trait for abstracting torch (flash LED) hardware.
///
/// Implement this for the platform's torch capability. The scheduler and app
/// state never talk to hardware except through this trait.
pub trait TorchController {
    /// Returns true if the device has a controllable torch.
    fn is_available(&self) -> bool;

    /// Switches the torch on at `brightness`, or off.
    ///
    /// `brightness` is ignored by most platforms when `on` is false.
    fn set_torch(&mut self, on: bool, brightness: Brightness) -> Result<(), TorchError>;
}

/// Last known torch state.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TorchState {
    /// Whether the light is on.
    pub on: bool,

    /// Level used while on, retained while off.
    pub brightness: Brightness,
}

impl Default for TorchState {
    fn default() -> Self {
        Self {
            on: false,
            brightness: Brightness::MAX,
        }
    }
}

/// Owns a [`TorchController`] and mirrors its state.
///
/// Writes that match the mirrored state are skipped, so setting the same
/// state twice has no additional effect on the hardware.
#[derive(Debug)]
pub struct Torch<C: TorchController> {
    controller: C,
    state: TorchState,
    synced: bool,
}

impl<C: TorchController> Torch<C> {
    /// Wraps a controller. The torch is assumed off until the first write.
    pub fn new(controller: C) -> Self {
        Self {
            controller,
            state: TorchState::default(),
            synced: false,
        }
    }

    /// Requests a hardware state change.
    ///
    /// Turning off records `brightness` as the level for the next "on".
    pub fn set(&mut self, on: bool, brightness: Brightness) -> Result<(), TorchError> {
        let requested = TorchState { on, brightness };

        if !self.controller.is_available() {
            return Err(TorchError::Unavailable);
        }

        if self.synced && self.hardware_matches(requested) {
            self.state = requested;
            return Ok(());
        }

        self.controller.set_torch(on, brightness)?;
        self.state = requested;
        self.synced = true;
        Ok(())
    }

    /// Turns the torch on at the mirrored brightness.
    pub fn turn_on(&mut self) -> Result<(), TorchError> {
        self.set(true, self.state.brightness)
    }

    /// Turns the torch off.
    pub fn turn_off(&mut self) -> Result<(), TorchError> {
        self.set(false, self.state.brightness)
    }

    /// Changes brightness without changing on/off.
    pub fn set_brightness(&mut self, brightness: Brightness) -> Result<(), TorchError> {
        self.set(self.state.on, brightness)
    }

    /// Off-state brightness differences never reach the hardware.
    fn hardware_matches(&self, requested: TorchState) -> bool {
        match (self.state.on, requested.on) {
            (false, false) => true,
            (true, true) => self.state.brightness == requested.brightness,
            _ => false,
        }
    }

    /// Returns the mirrored state.
    pub fn state(&self) -> TorchState {
        self.state
    }

    /// Returns true if the mirrored state is on.
    pub fn is_on(&self) -> bool {
        self.state.on
    }

    /// Returns the mirrored brightness.
    pub fn brightness(&self) -> Brightness {
        self.state.brightness
    }

    /// Returns true if the hardware reports a usable torch.
    pub fn is_available(&self) -> bool {
        self.controller.is_available()
    }

    /// Returns the wrapped controller.
    pub fn controller(&self) -> &C {
        &self.controller
    }

    /// Returns the wrapped controller mutably.
    pub fn controller_mut(&mut self) -> &mut C {
        &mut self.controller
    }
}
