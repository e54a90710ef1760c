//! Strobe scheduler with session state management and timing control.
//!
//! Provides [`StrobeScheduler`], which owns the [`Torch`] and drives it through
//! the timed steps of a [`StrobeProgram`]. Scheduling is cooperative: the
//! caller invokes [`StrobeScheduler::service`] whenever the returned
//! [`ServiceTiming`] delay expires, and due ticks fire in deadline order.
//! Steps missed during a stall are skipped, not replayed.
//!
//! Cancellation never removes ticks from the queue. Stopping or restarting
//! moves the scheduler to a new [`Generation`]; ticks scheduled under an older
//! generation are discarded when they fire, without touching the torch or
//! scheduling a successor.

use crate::config::StrobeConfig;
use crate::pattern::{StepPosition, StrobeProgram, TorchAction};
use crate::time::{TimeInstant, TimeSource};
use crate::timer::{DEFAULT_QUEUE_CAPACITY, Generation, ScheduledTick, TimerQueue};
use crate::torch::{Torch, TorchController};
use crate::types::{Brightness, StrobePattern, StrobeSpeed, TorchError};

/// The current state of a strobe scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SchedulerState {
    /// No session. Torch is left as the user set it.
    Idle,
    /// A session is live and `step` is the next program step to fire.
    Running {
        pattern: StrobePattern,
        speed: StrobeSpeed,
        step: usize,
    },
    /// Tearing down a session. Only observable inside `stop`.
    Stopping,
}

/// Timing information returned by service operations.
///
/// Indicates when the scheduler needs to be serviced again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ServiceTiming<D> {
    /// A tick is pending. Service again after the specified delay.
    Delay(D),

    /// The session finished on its own during this call (SOS played once).
    Complete,

    /// Nothing is pending. No further servicing is needed until the next start.
    Idle,
}

/// One strobing run.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StrobeSession {
    pub pattern: StrobePattern,
    pub speed: StrobeSpeed,
    /// Level used by "on" steps.
    pub brightness: Brightness,
    /// Cleared when the session is stopped, superseded or completes.
    pub running: bool,
    pub generation: Generation,
    /// Position of the next step to fire.
    pub position: StepPosition,
}

/// Drives a torch through timed strobe patterns.
///
/// At most one session is live. Every scheduled tick captures the generation
/// it was scheduled under and re-checks it at fire time.
///
/// # Type Parameters
/// * `'t` - Lifetime of the time source reference
/// * `I` - Time instant type
/// * `C` - Torch controller type
/// * `T` - Time source implementation type
/// * `Q` - Capacity of the tick queue
pub struct StrobeScheduler<
    't,
    I: TimeInstant,
    C: TorchController,
    T: TimeSource<I>,
    const Q: usize = DEFAULT_QUEUE_CAPACITY,
> {
    torch: Torch<C>,
    time_source: &'t T,
    config: StrobeConfig,
    state: SchedulerState,
    session: Option<StrobeSession>,
    program: Option<StrobeProgram<I::Duration>>,
    generation: Generation,
    queue: TimerQueue<I, Q>,
}

impl<'t, I: TimeInstant, C: TorchController, T: TimeSource<I>, const Q: usize>
    StrobeScheduler<'t, I, C, T, Q>
{
    /// Creates an idle scheduler. The torch is not touched.
    pub fn new(torch: Torch<C>, time_source: &'t T, config: StrobeConfig) -> Self {
        Self {
            torch,
            time_source,
            config,
            state: SchedulerState::Idle,
            session: None,
            program: None,
            generation: Generation::default(),
            queue: TimerQueue::new(),
        }
    }

    /// Starts a new session from step 0.
    ///
    /// A live session is stopped first, so its pending ticks become stale
    /// before any tick of the new session is scheduled. Sessions always begin
    /// from dark. Zero-delay steps fire before this returns.
    pub fn start(
        &mut self,
        pattern: StrobePattern,
        speed: StrobeSpeed,
        brightness: Brightness,
    ) -> ServiceTiming<I::Duration> {
        if self.is_running() {
            self.stop();
        }

        self.generation = self.generation.next();
        let generation = self.generation;
        let program = StrobeProgram::for_pattern(pattern, speed, &self.config);
        let position = StepPosition::default();
        let now = self.time_source.now();
        let due = now.checked_add(program.delay_before(position)).unwrap_or(now);

        self.drive(false, brightness);
        self.session = Some(StrobeSession {
            pattern,
            speed,
            brightness,
            running: true,
            generation,
            position,
        });
        self.program = Some(program);
        self.state = SchedulerState::Running {
            pattern,
            speed,
            step: 0,
        };
        log::debug!(
            "strobe start: {} at {}x, generation {}",
            pattern.label(),
            speed.multiplier(),
            generation.0
        );

        self.schedule(ScheduledTick {
            due,
            generation,
            position,
        });
        self.service()
    }

    /// Stops any session and turns the torch off.
    ///
    /// Always succeeds and is safe to call from any state, repeatedly.
    pub fn stop(&mut self) {
        self.state = SchedulerState::Stopping;
        if let Some(session) = self.session.as_mut() {
            if session.running {
                log::debug!("strobe stop: generation {}", session.generation.0);
            }
            session.running = false;
        }
        self.generation = self.generation.next();

        let brightness = self.torch.brightness();
        self.drive(false, brightness);
        self.state = SchedulerState::Idle;
    }

    /// Fires every tick that is due.
    ///
    /// # Returns
    /// - `ServiceTiming::Delay(duration)` - Service again after this delay
    /// - `ServiceTiming::Complete` - A finite session ended during this call
    /// - `ServiceTiming::Idle` - Nothing is pending
    pub fn service(&mut self) -> ServiceTiming<I::Duration> {
        let mut completed = false;

        let now = loop {
            let now = self.time_source.now();
            let Some(tick) = self.queue.pop_due(now) else {
                break now;
            };
            completed |= self.fire(tick, now);
        };

        if completed {
            return ServiceTiming::Complete;
        }

        match self.queue.next_due() {
            Some(due) => ServiceTiming::Delay(due.duration_since(now)),
            None => ServiceTiming::Idle,
        }
    }

    /// Changes the brightness of the live session without rescheduling.
    ///
    /// Updates the torch immediately if the session currently has it on.
    pub fn set_brightness(&mut self, brightness: Brightness) {
        let Some(session) = self.session.as_mut().filter(|s| s.running) else {
            return;
        };
        session.brightness = brightness;
        if self.torch.is_on() {
            self.drive(true, brightness);
        }
    }

    /// Applies a tick. Returns true if it completed the session.
    ///
    /// The successor is chained from the tick's deadline. If that deadline
    /// has already passed, the timeline restarts from `now` instead, so one
    /// service call changes the torch at most once per session.
    fn fire(&mut self, tick: ScheduledTick<I>, now: I) -> bool {
        let brightness = match self.session {
            Some(session) if session.running && session.generation == tick.generation => {
                session.brightness
            }
            _ => {
                log::trace!("discarding stale tick from generation {}", tick.generation.0);
                return false;
            }
        };

        let Some(program) = self.program.as_ref() else {
            return false;
        };
        let Some(step) = program.get_step(tick.position.step).copied() else {
            return false;
        };
        let next = program.next_position(tick.position);
        let next_delay = next.map(|position| program.delay_before(position));

        self.drive(step.action == TorchAction::On, brightness);

        match (next, next_delay) {
            (Some(position), Some(delay)) => {
                let due = match tick.due.checked_add(delay) {
                    Some(due) if due > now => Some(due),
                    _ => now.checked_add(delay),
                };
                let Some(due) = due else {
                    log::warn!("strobe deadline overflows the time source; stopping session");
                    self.stop();
                    return false;
                };
                self.advance_to(position);
                self.schedule(ScheduledTick {
                    due,
                    generation: tick.generation,
                    position,
                });
                false
            }
            _ => {
                self.finish();
                true
            }
        }
    }

    fn advance_to(&mut self, position: StepPosition) {
        if let Some(session) = self.session.as_mut() {
            session.position = position;
        }
        if let SchedulerState::Running { step, .. } = &mut self.state {
            *step = position.step;
        }
    }

    /// Ends a session that ran out of steps.
    fn finish(&mut self) {
        if let Some(session) = self.session.as_mut() {
            log::debug!(
                "strobe complete: {} generation {}",
                session.pattern.label(),
                session.generation.0
            );
            session.running = false;
        }
        self.generation = self.generation.next();
        self.state = SchedulerState::Idle;
    }

    fn schedule(&mut self, tick: ScheduledTick<I>) {
        if self.queue.schedule(tick, self.generation).is_err() {
            log::warn!("strobe tick queue full; stopping session");
            self.stop();
        }
    }

    /// Writes the torch, logging failures instead of propagating them.
    fn drive(&mut self, on: bool, brightness: Brightness) {
        match self.torch.set(on, brightness) {
            Ok(()) => {}
            Err(TorchError::Unavailable) => {
                log::debug!("torch unavailable; strobe step skipped");
            }
            Err(e) => log::warn!("strobe step failed: {}", e),
        }
    }

    /// Returns the current state of the scheduler.
    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Returns true if a session is live.
    pub fn is_running(&self) -> bool {
        matches!(self.state, SchedulerState::Running { .. })
    }

    /// Returns the live or most recent session.
    pub fn session(&self) -> Option<&StrobeSession> {
        self.session.as_ref()
    }

    /// Returns the live generation token.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Number of queued ticks, including stale ones awaiting discard.
    pub fn pending_ticks(&self) -> usize {
        self.queue.len()
    }

    /// Number of queued ticks belonging to the live generation.
    pub fn live_ticks(&self) -> usize {
        self.queue.count_for(self.generation)
    }

    /// Deadline of the next queued tick.
    pub fn next_deadline(&self) -> Option<I> {
        self.queue.next_due()
    }

    /// Returns the torch.
    pub fn torch(&self) -> &Torch<C> {
        &self.torch
    }

    /// Returns the torch for direct user writes.
    pub fn torch_mut(&mut self) -> &mut Torch<C> {
        &mut self.torch
    }

    /// Returns the configuration in use.
    pub fn config(&self) -> &StrobeConfig {
        &self.config
    }
}
