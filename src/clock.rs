//! Time sources for the playback engine.
//!
//! A [`Clock`] hands out timer handles instead of running callbacks. The
//! owner of the clock polls [`Clock::take_expired`] and routes each
//! handle to whoever scheduled it; the playback engine ignores any handle
//! that is not its one pending tick.

use std::collections::{BTreeSet, HashMap};
use std::time::{Duration, Instant};

use crate::document::Timestamp;
use crate::util::time_now_millis;

/// Identifies one scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

/// Wall-clock time plus one-shot timers.
pub trait Clock {
    /// Current time in milliseconds since the Unix epoch.
    fn now(&self) -> Timestamp;

    /// Arm a one-shot timer that expires `delay` from now.
    fn schedule_after(&mut self, delay: Duration) -> TimerHandle;

    /// Disarm a timer. Unknown or already expired handles are ignored.
    fn cancel(&mut self, handle: TimerHandle);

    /// Pop the earliest expired timer, if any.
    fn take_expired(&mut self) -> Option<TimerHandle>;

    /// Time left until the earliest armed timer expires.
    fn time_until_next(&self) -> Option<Duration>;
}

/// Armed timers ordered by due time, measured from the clock's origin.
#[derive(Debug, Default)]
struct TimerQueue {
    next_id: u64,
    by_due: BTreeSet<(Duration, u64)>,
    due_of: HashMap<u64, Duration>,
}

impl TimerQueue {
    fn schedule(&mut self, due: Duration) -> TimerHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.by_due.insert((due, id));
        self.due_of.insert(id, due);
        TimerHandle(id)
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if let Some(due) = self.due_of.remove(&handle.0) {
            self.by_due.remove(&(due, handle.0));
        }
    }

    fn pop_expired(&mut self, now: Duration) -> Option<TimerHandle> {
        let &(due, id) = self.by_due.first()?;
        if due > now {
            return None;
        }
        self.by_due.remove(&(due, id));
        self.due_of.remove(&id);
        Some(TimerHandle(id))
    }

    fn next_due(&self) -> Option<Duration> {
        self.by_due.first().map(|&(due, _)| due)
    }

    fn len(&self) -> usize {
        self.by_due.len()
    }
}

/// Simulated clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    epoch: Timestamp,
    elapsed: Duration,
    timers: TimerQueue,
}

impl ManualClock {
    /// Clock whose `now()` starts at `epoch`.
    pub fn new(epoch: Timestamp) -> Self {
        Self {
            epoch,
            elapsed: Duration::ZERO,
            timers: TimerQueue::default(),
        }
    }

    /// Move time forward by `by`.
    pub fn advance(&mut self, by: Duration) {
        self.elapsed += by;
    }

    /// Jump to the earliest armed timer and return how far time moved.
    pub fn advance_to_next(&mut self) -> Option<Duration> {
        let due = self.timers.next_due()?;
        let step = due.saturating_sub(self.elapsed);
        self.elapsed += step;
        Some(step)
    }

    /// Time since the clock was created.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Number of armed timers.
    pub fn pending(&self) -> usize {
        self.timers.len()
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.epoch + self.elapsed.as_millis() as u64
    }

    fn schedule_after(&mut self, delay: Duration) -> TimerHandle {
        self.timers.schedule(self.elapsed + delay)
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.timers.cancel(handle);
    }

    fn take_expired(&mut self) -> Option<TimerHandle> {
        self.timers.pop_expired(self.elapsed)
    }

    fn time_until_next(&self) -> Option<Duration> {
        self.timers
            .next_due()
            .map(|due| due.saturating_sub(self.elapsed))
    }
}

/// Real time: wall-clock timestamps and monotonic deadlines.
#[derive(Debug)]
pub struct SystemClock {
    origin: Instant,
    timers: TimerQueue,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            timers: TimerQueue::default(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        time_now_millis()
    }

    fn schedule_after(&mut self, delay: Duration) -> TimerHandle {
        self.timers.schedule(self.origin.elapsed() + delay)
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.timers.cancel(handle);
    }

    fn take_expired(&mut self) -> Option<TimerHandle> {
        self.timers.pop_expired(self.origin.elapsed())
    }

    fn time_until_next(&self) -> Option<Duration> {
        let now = self.origin.elapsed();
        self.timers.next_due().map(|due| due.saturating_sub(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_expiry_order() {
        let mut clock = ManualClock::new(1_000);
        let late = clock.schedule_after(Duration::from_millis(300));
        let early = clock.schedule_after(Duration::from_millis(100));

        assert_eq!(clock.take_expired(), None);
        assert_eq!(clock.time_until_next(), Some(Duration::from_millis(100)));

        clock.advance(Duration::from_millis(500));
        assert_eq!(clock.now(), 1_500);
        assert_eq!(clock.take_expired(), Some(early));
        assert_eq!(clock.take_expired(), Some(late));
        assert_eq!(clock.take_expired(), None);
    }

    #[test]
    fn test_cancelled_timer_never_fires() {
        let mut clock = ManualClock::default();
        let handle = clock.schedule_after(Duration::from_millis(10));
        clock.cancel(handle);
        clock.cancel(handle);
        assert_eq!(clock.pending(), 0);
        assert_eq!(clock.advance_to_next(), None);
        clock.advance(Duration::from_secs(1));
        assert_eq!(clock.take_expired(), None);
    }

    #[test]
    fn test_advance_to_next() {
        let mut clock = ManualClock::default();
        clock.schedule_after(Duration::from_millis(200));
        assert_eq!(clock.advance_to_next(), Some(Duration::from_millis(200)));
        assert_eq!(clock.elapsed(), Duration::from_millis(200));
        assert!(clock.take_expired().is_some());
    }

    #[test]
    fn test_system_clock_zero_delay_is_due() {
        let mut clock = SystemClock::new();
        let handle = clock.schedule_after(Duration::ZERO);
        assert_eq!(clock.take_expired(), Some(handle));
        assert!(clock.now() > 0);
    }
}
