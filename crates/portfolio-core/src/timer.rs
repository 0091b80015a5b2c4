#![forbid(unsafe_code)]

//! Host-driven clock and one-shot timer queue.
//!
//! The page never blocks: every delay (simulated submission, banner and
//! notification removal, the animation retriggers) is a timer in a
//! [`TimerQueue`]. The host moves the clock explicitly, either by a delta or
//! to an absolute time, and the owner drains whatever became due.
//!
//! Timers with equal deadlines fire in the order they were scheduled.
//! Repeating behavior is expressed by tasks that schedule themselves again
//! when they fire. Nothing is ever cancelled.

use core::time::Duration;
use std::collections::BTreeMap;

/// Convert a host-supplied millisecond value into a [`Duration`].
///
/// Host input can be noisy (NaN/inf/negative values); those yield `None`.
#[must_use]
pub fn duration_from_ms(ms: f64) -> Option<Duration> {
    if !ms.is_finite() || ms < 0.0 {
        return None;
    }
    let max_secs = Duration::MAX.as_secs_f64();
    let secs = (ms / 1000.0).min(max_secs);
    Some(Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX))
}

/// Deterministic queue of one-shot timers carrying tasks of type `T`.
#[derive(Debug, Clone)]
pub struct TimerQueue<T> {
    now: Duration,
    next_seq: u64,
    pending: BTreeMap<(Duration, u64), T>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    /// Create an empty queue with the clock at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_seq: 0,
            pending: BTreeMap::new(),
        }
    }

    /// Current clock value.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Number of timers not yet fired.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Schedule `task` to fire `delay` after the current clock value.
    ///
    /// Returns the absolute deadline.
    pub fn schedule(&mut self, delay: Duration, task: T) -> Duration {
        let deadline = self.now.saturating_add(delay);
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.pending.insert((deadline, seq), task);
        deadline
    }

    /// Earliest pending deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.keys().next().map(|&(deadline, _)| deadline)
    }

    /// Iterate over pending tasks in firing order.
    pub fn pending(&self) -> impl Iterator<Item = (Duration, &T)> + '_ {
        self.pending.iter().map(|(&(deadline, _), task)| (deadline, task))
    }

    /// Pop the earliest timer due at or before `until`.
    ///
    /// The clock moves to that timer's deadline, so anything the task
    /// schedules is timed from the moment it fired.
    pub fn pop_due(&mut self, until: Duration) -> Option<T> {
        let (&(deadline, _), _) = self.pending.first_key_value()?;
        if deadline > until {
            return None;
        }
        let (_, task) = self.pending.pop_first()?;
        self.now = self.now.max(deadline);
        Some(task)
    }

    /// Move the clock forward to `until` once every due timer was drained.
    ///
    /// The clock is monotonic: moving backwards is ignored.
    pub fn settle(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn duration_from_ms_rejects_invalid_inputs() {
        assert_eq!(duration_from_ms(f64::NAN), None);
        assert_eq!(duration_from_ms(f64::INFINITY), None);
        assert_eq!(duration_from_ms(-1.0), None);
        assert_eq!(duration_from_ms(0.0), Some(Duration::ZERO));
        assert_eq!(duration_from_ms(2000.0), Some(ms(2000)));
    }

    #[test]
    fn fires_in_deadline_order() {
        let mut queue = TimerQueue::new();
        queue.schedule(ms(300), "late");
        queue.schedule(ms(100), "early");
        let mut fired = Vec::new();
        while let Some(task) = queue.pop_due(ms(1000)) {
            fired.push(task);
        }
        assert_eq!(fired, vec!["early", "late"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn equal_deadlines_keep_scheduling_order() {
        let mut queue = TimerQueue::new();
        queue.schedule(ms(50), 1);
        queue.schedule(ms(50), 2);
        queue.schedule(ms(50), 3);
        let fired: Vec<_> = std::iter::from_fn(|| queue.pop_due(ms(50))).collect();
        assert_eq!(fired, vec![1, 2, 3]);
    }

    #[test]
    fn not_due_stays_pending() {
        let mut queue = TimerQueue::new();
        queue.schedule(ms(2000), ());
        assert_eq!(queue.pop_due(ms(1999)), None);
        assert_eq!(queue.next_deadline(), Some(ms(2000)));
        assert_eq!(queue.pop_due(ms(2000)), Some(()));
    }

    #[test]
    fn clock_follows_fired_deadline() {
        let mut queue = TimerQueue::new();
        queue.schedule(ms(100), ());
        queue.pop_due(ms(500));
        assert_eq!(queue.now(), ms(100));
        let deadline = queue.schedule(ms(100), ());
        assert_eq!(deadline, ms(200));
        queue.settle(ms(500));
        assert_eq!(queue.now(), ms(500));
        queue.settle(ms(10));
        assert_eq!(queue.now(), ms(500));
    }
}
