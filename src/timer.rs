//! Single-threaded queue of scheduled strobe ticks.
//!
//! Ticks are never removed on cancellation. Each tick carries the
//! [`Generation`] of the session that scheduled it, and the scheduler discards
//! ticks whose generation is no longer live when they fire.

use crate::pattern::StepPosition;
use crate::time::TimeInstant;
use heapless::Vec;

/// Default capacity of the tick queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 8;

/// Token identifying one strobe session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Generation(pub u32);

impl Generation {
    /// Returns the following generation, wrapping on overflow.
    #[inline]
    pub fn next(self) -> Self {
        Generation(self.0.wrapping_add(1))
    }
}

/// A delayed torch change waiting to fire.
#[derive(Debug, Clone, Copy)]
pub struct ScheduledTick<I: TimeInstant> {
    /// Instant at or after which the tick fires.
    pub due: I,

    /// Session that scheduled the tick.
    pub generation: Generation,

    /// Program position the tick will apply.
    pub position: StepPosition,
}

/// Bounded tick queue ordered by deadline, ties broken by scheduling order.
#[derive(Debug)]
pub struct TimerQueue<I: TimeInstant, const Q: usize> {
    ticks: Vec<ScheduledTick<I>, Q>,
}

impl<I: TimeInstant, const Q: usize> TimerQueue<I, Q> {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self { ticks: Vec::new() }
    }

    /// Schedules a tick.
    ///
    /// When the queue is full, ticks not belonging to `live` are compacted out
    /// first. Returns the tick back if there is still no room.
    pub fn schedule(
        &mut self,
        tick: ScheduledTick<I>,
        live: Generation,
    ) -> Result<(), ScheduledTick<I>> {
        if self.ticks.is_full() {
            let before = self.ticks.len();
            self.ticks.retain(|t| t.generation == live);
            log::trace!("compacted {} stale ticks", before - self.ticks.len());
        }
        self.ticks.push(tick)
    }

    /// Removes and returns the earliest tick due at or before `now`.
    pub fn pop_due(&mut self, now: I) -> Option<ScheduledTick<I>> {
        let index = self.earliest_index()?;
        if self.ticks[index].due > now {
            return None;
        }
        // `remove` keeps the remaining ticks in scheduling order.
        Some(self.ticks.remove(index))
    }

    /// Deadline of the earliest pending tick.
    pub fn next_due(&self) -> Option<I> {
        self.earliest_index().map(|index| self.ticks[index].due)
    }

    /// Number of pending ticks, live or stale.
    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    /// Returns true if nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    /// Number of pending ticks scheduled by `generation`.
    pub fn count_for(&self, generation: Generation) -> usize {
        self.ticks
            .iter()
            .filter(|t| t.generation == generation)
            .count()
    }

    /// First tick with the minimum deadline.
    fn earliest_index(&self) -> Option<usize> {
        let mut earliest: Option<(usize, I)> = None;
        for (index, tick) in self.ticks.iter().enumerate() {
            match earliest {
                Some((_, due)) if due <= tick.due => {}
                _ => earliest = Some((index, tick.due)),
            }
        }
        earliest.map(|(index, _)| index)
    }
}

impl<I: TimeInstant, const Q: usize> Default for TimerQueue<I, Q> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::TimeDuration;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Ms(u64);

    impl TimeDuration for Ms {
        const ZERO: Self = Ms(0);

        fn as_millis(&self) -> u64 {
            self.0
        }

        fn from_millis(millis: u64) -> Self {
            Ms(millis)
        }

        fn saturating_sub(self, other: Self) -> Self {
            Ms(self.0.saturating_sub(other.0))
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
    struct At(u64);

    impl TimeInstant for At {
        type Duration = Ms;

        fn duration_since(&self, earlier: Self) -> Ms {
            Ms(self.0.saturating_sub(earlier.0))
        }

        fn checked_add(self, duration: Ms) -> Option<Self> {
            self.0.checked_add(duration.0).map(At)
        }

        fn checked_sub(self, duration: Ms) -> Option<Self> {
            self.0.checked_sub(duration.0).map(At)
        }
    }

    fn tick(due: u64, generation: u32, step: usize) -> ScheduledTick<At> {
        ScheduledTick {
            due: At(due),
            generation: Generation(generation),
            position: StepPosition { step, iteration: 0 },
        }
    }

    #[test]
    fn pops_in_deadline_then_scheduling_order() {
        let mut queue = TimerQueue::<At, 4>::new();
        let live = Generation(1);
        queue.schedule(tick(300, 1, 0), live).unwrap();
        queue.schedule(tick(100, 1, 1), live).unwrap();
        queue.schedule(tick(100, 1, 2), live).unwrap();

        assert_eq!(queue.next_due(), Some(At(100)));
        assert!(queue.pop_due(At(50)).is_none());

        let order: [usize; 3] =
            core::array::from_fn(|_| queue.pop_due(At(1000)).unwrap().position.step);
        assert_eq!(order, [1, 2, 0]);
        assert!(queue.is_empty());
    }

    #[test]
    fn full_queue_compacts_stale_ticks() {
        let mut queue = TimerQueue::<At, 2>::new();
        queue.schedule(tick(100, 1, 0), Generation(1)).unwrap();
        queue.schedule(tick(200, 2, 0), Generation(2)).unwrap();

        queue.schedule(tick(300, 3, 0), Generation(3)).unwrap();
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.count_for(Generation(3)), 1);
    }

    #[test]
    fn full_queue_of_live_ticks_rejects() {
        let mut queue = TimerQueue::<At, 1>::new();
        queue.schedule(tick(100, 1, 0), Generation(1)).unwrap();
        assert!(queue.schedule(tick(200, 1, 1), Generation(1)).is_err());
    }

    #[test]
    fn generation_wraps() {
        assert_eq!(Generation(u32::MAX).next(), Generation(0));
    }
}
