//! One-shot timers for the single-threaded event loop.
//!
//! Timers are plain data: owners hold a `TimerId` and the event loop
//! asks for the next deadline, sleeps at most that long, then drains the
//! due entries. Ids are never reused, so a cancelled or superseded timer
//! cannot fire late against new state.

use std::time::{Duration, Instant};

/// Handle to a pending one-shot timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerId(u64);

#[derive(Debug, Default)]
pub struct Scheduler {
    next_id: u64,
    entries: Vec<(TimerId, Instant)>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a timer due `delay` after `now`.
    pub fn schedule(&mut self, now: Instant, delay: Duration) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, now + delay));
        id
    }

    /// Removes a pending timer. Unknown or already-fired ids are a no-op.
    pub fn cancel(&mut self, id: TimerId) {
        self.entries.retain(|(e, _)| *e != id);
    }

    /// The earliest pending deadline, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.iter().map(|(_, at)| *at).min()
    }

    /// Removes and returns all timers due at `now`, earliest first.
    pub fn take_due(&mut self, now: Instant) -> Vec<TimerId> {
        let mut due: Vec<(TimerId, Instant)> = Vec::new();
        self.entries.retain(|entry| {
            if entry.1 <= now {
                due.push(*entry);
                false
            } else {
                true
            }
        });
        due.sort_by_key(|(_, at)| *at);
        due.into_iter().map(|(id, _)| id).collect()
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.entries.iter().any(|(e, _)| *e == id)
    }

    pub fn pending_count(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_due_timers_fire_in_deadline_order() {
        let mut sched = Scheduler::new();
        let now = Instant::now();
        let late = sched.schedule(now, Duration::from_millis(200));
        let early = sched.schedule(now, Duration::from_millis(50));

        let due = sched.take_due(now + Duration::from_millis(300));
        assert_eq!(due, vec![early, late]);
        assert_eq!(sched.pending_count(), 0);
    }

    #[test]
    fn test_not_yet_due_timers_stay_pending() {
        let mut sched = Scheduler::new();
        let now = Instant::now();
        let id = sched.schedule(now, Duration::from_millis(100));

        assert!(sched.take_due(now + Duration::from_millis(50)).is_empty());
        assert!(sched.is_pending(id));
    }

    #[test]
    fn test_cancelled_timer_never_fires() {
        let mut sched = Scheduler::new();
        let now = Instant::now();
        let id = sched.schedule(now, Duration::from_millis(10));
        sched.cancel(id);

        assert!(!sched.is_pending(id));
        assert!(sched.take_due(now + Duration::from_secs(1)).is_empty());
    }

    #[test]
    fn test_next_deadline_is_earliest() {
        let mut sched = Scheduler::new();
        let now = Instant::now();
        assert_eq!(sched.next_deadline(), None);

        sched.schedule(now, Duration::from_millis(300));
        let early = sched.schedule(now, Duration::from_millis(100));
        assert_eq!(sched.next_deadline(), Some(now + Duration::from_millis(100)));

        sched.cancel(early);
        assert_eq!(sched.next_deadline(), Some(now + Duration::from_millis(300)));
    }

    #[test]
    fn test_ids_are_unique_across_reschedules() {
        let mut sched = Scheduler::new();
        let now = Instant::now();
        let a = sched.schedule(now, Duration::from_millis(10));
        sched.cancel(a);
        let b = sched.schedule(now, Duration::from_millis(10));
        assert_ne!(a, b);
    }
}
