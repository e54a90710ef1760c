//! Timed step programs for each strobe pattern.
//!
//! A [`StrobeProgram`] is the flat list of `(delay, action)` steps a strobe
//! session walks through. Each step fires `delay` after the previous one.

use crate::config::StrobeConfig;
use crate::time::TimeDuration;
use crate::types::{LoopCount, StrobePattern, StrobeSpeed};
use heapless::Vec;

/// Constant pattern half-period at 1x speed.
pub const CONSTANT_PERIOD_MS: u64 = 1000;

/// Darkness between pulses at 1x speed.
pub const PULSE_INTERVAL_MS: u64 = 1000;

/// SOS dot length at 1x speed.
pub const SOS_DOT_MS: u64 = 200;

/// SOS dash length at 1x speed.
pub const SOS_DASH_MS: u64 = 600;

/// Darkness between SOS flashes at 1x speed.
pub const SOS_GAP_MS: u64 = 200;

/// Flash lengths of one SOS message at 1x speed.
const SOS_FLASHES: [u64; 9] = [
    SOS_DOT_MS,
    SOS_DOT_MS,
    SOS_DOT_MS,
    SOS_DASH_MS,
    SOS_DASH_MS,
    SOS_DASH_MS,
    SOS_DOT_MS,
    SOS_DOT_MS,
    SOS_DOT_MS,
];

/// Maximum steps in a built-in program (SOS: on + off per flash).
pub const MAX_PROGRAM_STEPS: usize = SOS_FLASHES.len() * 2;

/// Torch change performed by a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TorchAction {
    /// Switch the torch on at the session brightness.
    On,

    /// Switch the torch off.
    Off,
}

/// A single timed step of a strobe program.
#[derive(Debug, Clone, Copy)]
pub struct StrobeStep<D: TimeDuration> {
    /// Wait before applying the action, measured from the previous step.
    pub delay: D,

    /// Torch change to apply.
    pub action: TorchAction,
}

impl<D: TimeDuration> StrobeStep<D> {
    /// Creates a new step.
    #[inline]
    pub fn new(delay: D, action: TorchAction) -> Self {
        Self { delay, action }
    }
}

/// Position within a running program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepPosition {
    /// Index of the step within the program.
    pub step: usize,

    /// Completed passes through the program.
    pub iteration: u32,
}

/// The step list for one pattern at one speed.
#[derive(Debug, Clone)]
pub struct StrobeProgram<D: TimeDuration> {
    steps: Vec<StrobeStep<D>, MAX_PROGRAM_STEPS>,
    loop_count: LoopCount,
    starts_immediately: bool,
}

impl<D: TimeDuration> StrobeProgram<D> {
    /// Builds the program for `pattern` at `speed`.
    pub fn for_pattern(pattern: StrobePattern, speed: StrobeSpeed, config: &StrobeConfig) -> Self {
        let scaled = |millis: u64| D::from_millis(speed.scale_millis(millis));
        let mut program = Self {
            steps: Vec::new(),
            loop_count: LoopCount::Infinite,
            starts_immediately: false,
        };

        match pattern {
            StrobePattern::Constant => {
                let period = scaled(CONSTANT_PERIOD_MS);
                program.push(period, TorchAction::On);
                program.push(period, TorchAction::Off);
            }
            StrobePattern::Pulse => {
                program.push(scaled(PULSE_INTERVAL_MS), TorchAction::On);
                // Pulse width does not scale with speed.
                program.push(D::from_millis(config.pulse_width_ms), TorchAction::Off);
            }
            StrobePattern::Sos => {
                let gap = scaled(SOS_GAP_MS);
                for flash in SOS_FLASHES {
                    program.push(gap, TorchAction::On);
                    program.push(scaled(flash), TorchAction::Off);
                }
                program.starts_immediately = true;
                program.loop_count = if config.sos_repeat {
                    LoopCount::Infinite
                } else {
                    LoopCount::Finite(1)
                };
            }
        }

        program
    }

    fn push(&mut self, delay: D, action: TorchAction) {
        // Capacity covers the longest built-in program.
        let pushed = self.steps.push(StrobeStep::new(delay, action));
        debug_assert!(pushed.is_ok(), "strobe program capacity exceeded");
    }

    /// Wait before the step at `position` fires.
    ///
    /// Programs that start immediately skip the delay of their very first step;
    /// later passes honor it so repeats keep their spacing.
    pub fn delay_before(&self, position: StepPosition) -> D {
        if self.starts_immediately && position == StepPosition::default() {
            return D::ZERO;
        }
        self.steps
            .get(position.step)
            .map(|step| step.delay)
            .unwrap_or(D::ZERO)
    }

    /// Position following `position`, or `None` when the program is finished.
    pub fn next_position(&self, position: StepPosition) -> Option<StepPosition> {
        if position.step + 1 < self.steps.len() {
            return Some(StepPosition {
                step: position.step + 1,
                iteration: position.iteration,
            });
        }

        let iteration = position.iteration.saturating_add(1);
        match self.loop_count {
            LoopCount::Infinite => Some(StepPosition { step: 0, iteration }),
            LoopCount::Finite(count) if iteration < count => {
                Some(StepPosition { step: 0, iteration })
            }
            LoopCount::Finite(_) => None,
        }
    }

    /// Returns the number of steps in one pass.
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Returns the loop count configuration.
    pub fn loop_count(&self) -> LoopCount {
        self.loop_count
    }

    /// Returns a reference to the step at the given index.
    pub fn get_step(&self, index: usize) -> Option<&StrobeStep<D>> {
        self.steps.get(index)
    }
}
