//! Shared test infrastructure for strobe-torch integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use core::cell::{Cell, RefCell};
use strobe_torch::{
    AppState, Brightness, MemoryPreferences, ServiceTiming, StrobeScheduler, TimeDuration,
    TimeInstant, TimeSource, TorchController, TorchError,
};

// ============================================================================
// Mock Time Types
// ============================================================================

/// Mock duration type for testing (wraps milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestDuration(pub u64);

impl TimeDuration for TestDuration {
    const ZERO: Self = TestDuration(0);

    fn as_millis(&self) -> u64 {
        self.0
    }

    fn from_millis(millis: u64) -> Self {
        TestDuration(millis)
    }

    fn saturating_sub(self, other: Self) -> Self {
        TestDuration(self.0.saturating_sub(other.0))
    }
}

/// Mock instant type for testing
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestInstant(pub u64);

impl TimeInstant for TestInstant {
    type Duration = TestDuration;

    fn duration_since(&self, earlier: Self) -> Self::Duration {
        TestDuration(self.0 - earlier.0)
    }

    fn checked_add(self, duration: Self::Duration) -> Option<Self> {
        Some(TestInstant(self.0 + duration.0))
    }

    fn checked_sub(self, duration: Self::Duration) -> Option<Self> {
        self.0.checked_sub(duration.0).map(TestInstant)
    }
}

// ============================================================================
// Mock Time Source
// ============================================================================

/// Mock time source with controllable time advancement
pub struct MockTimeSource {
    current_time: Cell<TestInstant>,
}

impl MockTimeSource {
    pub fn new() -> Self {
        Self {
            current_time: Cell::new(TestInstant(0)),
        }
    }

    /// Advance time by the given duration
    pub fn advance(&self, duration: TestDuration) {
        let current = self.current_time.get();
        self.current_time.set(TestInstant(current.0 + duration.0));
    }

    pub fn set_time(&self, time: TestInstant) {
        self.current_time.set(time);
    }

    pub fn millis(&self) -> u64 {
        self.current_time.get().0
    }
}

impl TimeSource<TestInstant> for MockTimeSource {
    fn now(&self) -> TestInstant {
        self.current_time.get()
    }
}

// ============================================================================
// Mock Torch
// ============================================================================

/// A hardware write observed by the mock torch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TorchEvent {
    pub at: u64,
    pub on: bool,
    pub brightness: f32,
}

/// Test-owned view of the mock torch: records writes, injects failures.
pub struct TorchProbe {
    events: RefCell<Vec<TorchEvent>>,
    pub available: Cell<bool>,
    pub reject: Cell<bool>,
}

impl TorchProbe {
    pub fn new() -> Self {
        Self {
            events: RefCell::new(Vec::new()),
            available: Cell::new(true),
            reject: Cell::new(false),
        }
    }

    pub fn events(&self) -> Vec<TorchEvent> {
        self.events.borrow().clone()
    }

    /// `(time, on)` pairs of every recorded write.
    pub fn switches(&self) -> Vec<(u64, bool)> {
        self.events.borrow().iter().map(|e| (e.at, e.on)).collect()
    }

    pub fn last(&self) -> Option<TorchEvent> {
        self.events.borrow().last().copied()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

/// Torch controller that reports every write to a [`TorchProbe`]
pub struct MockTorch<'t> {
    timer: &'t MockTimeSource,
    probe: &'t TorchProbe,
}

impl<'t> MockTorch<'t> {
    pub fn new(timer: &'t MockTimeSource, probe: &'t TorchProbe) -> Self {
        Self { timer, probe }
    }
}

impl TorchController for MockTorch<'_> {
    fn is_available(&self) -> bool {
        self.probe.available.get()
    }

    fn set_torch(&mut self, on: bool, brightness: Brightness) -> Result<(), TorchError> {
        if self.probe.reject.get() {
            return Err(TorchError::ConfigurationFailed);
        }
        self.probe.events.borrow_mut().push(TorchEvent {
            at: self.timer.millis(),
            on,
            brightness: brightness.level(),
        });
        Ok(())
    }
}

pub type TestScheduler<'t> = StrobeScheduler<'t, TestInstant, MockTorch<'t>, MockTimeSource>;

pub type TestApp<'t> =
    AppState<'t, TestInstant, MockTorch<'t>, MockTimeSource, MemoryPreferences>;

// ============================================================================
// Test Helper Functions
// ============================================================================

/// Services like a real driver would: jump to each requested deadline and
/// service again, until `end_ms` or until nothing is pending.
pub fn drive_until(
    timer: &MockTimeSource,
    end_ms: u64,
    mut service: impl FnMut() -> ServiceTiming<TestDuration>,
) -> ServiceTiming<TestDuration> {
    let mut timing = service();
    loop {
        match timing {
            ServiceTiming::Delay(delay) => {
                let next = timer.millis() + delay.0;
                if next > end_ms {
                    timer.set_time(TestInstant(end_ms));
                    return service();
                }
                timer.set_time(TestInstant(next));
                timing = service();
            }
            ServiceTiming::Complete | ServiceTiming::Idle => return timing,
        }
    }
}

/// Compare two brightness levels with floating-point tolerance
pub fn levels_equal(a: f32, b: f32) -> bool {
    const EPSILON: f32 = 0.001;
    (a - b).abs() < EPSILON
}
