//! One-shot timers driven by the host clock
//!
//! There is no OS timer thread. The host advances a millisecond clock
//! alongside its event pump ([`TimerQueue::advance`]), and deadlines that
//! have passed are returned exactly once. Cancellation before the deadline
//! guarantees the handle never comes back from `advance`, which is the
//! property widget teardown relies on.

use indexmap::IndexMap;

/// Handle to a scheduled timer, used to cancel it or match it on expiry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

/// One-shot timer queue against an externally-advanced clock
#[derive(Default)]
pub struct TimerQueue {
    /// Deadlines keyed by handle, in scheduling order
    deadlines: IndexMap<TimerHandle, u64>,
    next_id: u64,
    now_ms: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current clock value in milliseconds
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Schedule a one-shot timer `delay_ms` from the current clock value
    pub fn schedule(&mut self, delay_ms: u64) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle(self.next_id);
        self.deadlines
            .insert(handle, self.now_ms.saturating_add(delay_ms));
        handle
    }

    /// Cancel a pending timer; returns false if it already expired or was
    /// never scheduled
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        self.deadlines.shift_remove(&handle).is_some()
    }

    /// Whether a timer is still pending
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.deadlines.contains_key(&handle)
    }

    /// Number of pending timers
    pub fn pending_count(&self) -> usize {
        self.deadlines.len()
    }

    /// Advance the clock and collect expired timers in scheduling order
    ///
    /// The clock never moves backwards; an `advance` with an earlier
    /// timestamp only re-checks deadlines against the current value.
    pub fn advance(&mut self, now_ms: u64) -> Vec<TimerHandle> {
        self.now_ms = self.now_ms.max(now_ms);

        let expired: Vec<TimerHandle> = self
            .deadlines
            .iter()
            .filter(|(_, deadline)| **deadline <= self.now_ms)
            .map(|(handle, _)| *handle)
            .collect();

        for handle in &expired {
            self.deadlines.shift_remove(handle);
        }

        expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_and_expire() {
        let mut timers = TimerQueue::new();
        let handle = timers.schedule(1000);

        assert!(timers.is_pending(handle));
        assert!(timers.advance(999).is_empty());
        assert!(timers.is_pending(handle));

        let fired = timers.advance(1000);
        assert_eq!(fired, vec![handle]);
        assert!(!timers.is_pending(handle));

        // A handle expires at most once
        assert!(timers.advance(2000).is_empty());
    }

    #[test]
    fn test_cancel_prevents_expiry() {
        let mut timers = TimerQueue::new();
        let handle = timers.schedule(500);

        assert!(timers.cancel(handle));
        assert!(!timers.cancel(handle));
        assert!(timers.advance(10_000).is_empty());
    }

    #[test]
    fn test_deadlines_are_relative_to_clock() {
        let mut timers = TimerQueue::new();
        timers.advance(5000);

        let handle = timers.schedule(100);
        assert!(timers.advance(5099).is_empty());
        assert_eq!(timers.advance(5100), vec![handle]);
    }

    #[test]
    fn test_clock_never_rewinds() {
        let mut timers = TimerQueue::new();
        timers.advance(1000);
        timers.advance(200);
        assert_eq!(timers.now_ms(), 1000);
    }
}
