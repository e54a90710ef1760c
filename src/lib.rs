#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`TorchController`**: Trait to implement for your platform's torch hardware
//! - **`Torch`**: Owns a controller, mirrors its state and skips redundant writes
//! - **`StrobePattern`**: `Constant`, `Pulse` or `Sos`
//! - **`StrobeProgram`**: The timed on/off steps of a pattern at a given speed
//! - **`StrobeScheduler`**: Runs one strobe session at a time on a cooperative tick queue
//! - **`Generation`**: Token that invalidates ticks of stopped or superseded sessions
//! - **`TimeSource`**: Trait to implement for your timing system
//! - **`AppState`**: UI-independent app state routing `AppIntent`s
//! - **`PreferenceStore`**: Persists the selected tint color index
//!
//! The scheduler never sleeps or spawns. Call `service()` whenever the
//! returned `ServiceTiming::Delay` expires; due ticks fire in
//! deadline order. Steps missed during a stall are skipped, not replayed.

// Re-export Srgb from palette for user convenience
pub use palette::{Srgb, Srgba};

pub mod app;
pub mod colors;
pub mod command;
pub mod config;
pub mod pattern;
pub mod preferences;
pub mod scheduler;
pub mod time;
pub mod timer;
pub mod torch;
pub mod types;

pub use app::{AppError, AppState};
pub use colors::{TINTS, TintColor};
pub use command::{AppIntent, StartOutcome};
pub use config::StrobeConfig;
pub use pattern::{StepPosition, StrobeProgram, StrobeStep, TorchAction};
pub use preferences::{MemoryPreferences, PreferenceError, PreferenceStore};
pub use scheduler::{SchedulerState, ServiceTiming, StrobeScheduler, StrobeSession};
pub use time::{TimeDuration, TimeInstant, TimeSource};
pub use timer::{Generation, TimerQueue};
pub use torch::{Torch, TorchController, TorchState};
pub use types::{Brightness, LoopCount, StrobePattern, StrobeSpeed, TorchError};

#[cfg(feature = "std")]
pub use config::ConfigError;
#[cfg(feature = "std")]
pub use preferences::TomlPreferences;
#[cfg(feature = "std")]
pub use time::StdClock;
