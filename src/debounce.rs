//! Coalesces bursts of viewport resize events.
//!
//! Terminal resizes arrive as a stream while the user drags; rescaling a
//! large bitmap on every step wastes work. Each request replaces the
//! pending timer, so only the last viewport in a burst is applied, one
//! debounce interval after the burst ends.

use crate::sched::{Scheduler, TimerId};
use std::time::{Duration, Instant};

/// Quiet period before a resize is applied.
pub const RESIZE_DEBOUNCE: Duration = Duration::from_millis(100);

#[derive(Debug, Default)]
pub struct ResizeDebouncer {
    pending: Option<(TimerId, (u32, u32))>,
}

impl ResizeDebouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the latest viewport and restarts the quiet-period timer.
    /// A pending request is superseded, never queued.
    pub fn request(&mut self, viewport: (u32, u32), sched: &mut Scheduler, now: Instant) {
        if let Some((old, _)) = self.pending.take() {
            sched.cancel(old);
        }
        let id = sched.schedule(now, RESIZE_DEBOUNCE);
        self.pending = Some((id, viewport));
    }

    /// Consumes the pending request when `id` is its timer, returning
    /// the viewport to apply. Stale ids yield `None`.
    pub fn fire(&mut self, id: TimerId) -> Option<(u32, u32)> {
        match self.pending {
            Some((pending_id, viewport)) if pending_id == id => {
                self.pending = None;
                Some(viewport)
            }
            _ => None,
        }
    }

    pub fn owns_timer(&self, id: TimerId) -> bool {
        matches!(self.pending, Some((pending_id, _)) if pending_id == id)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drops the pending request without applying it.
    pub fn cancel(&mut self, sched: &mut Scheduler) {
        if let Some((id, _)) = self.pending.take() {
            sched.cancel(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burst_keeps_only_last_viewport() {
        let mut sched = Scheduler::new();
        let mut debouncer = ResizeDebouncer::new();
        let now = Instant::now();

        debouncer.request((80, 24), &mut sched, now);
        debouncer.request((100, 30), &mut sched, now + Duration::from_millis(10));
        debouncer.request((120, 40), &mut sched, now + Duration::from_millis(20));

        // Earlier timers were cancelled, only the last remains.
        assert_eq!(sched.pending_count(), 1);

        let due = sched.take_due(now + Duration::from_millis(120) + RESIZE_DEBOUNCE);
        assert_eq!(due.len(), 1);
        assert_eq!(debouncer.fire(due[0]), Some((120, 40)));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_fire_waits_full_quiet_period_after_last_request() {
        let mut sched = Scheduler::new();
        let mut debouncer = ResizeDebouncer::new();
        let now = Instant::now();

        debouncer.request((80, 24), &mut sched, now);
        let later = now + Duration::from_millis(60);
        debouncer.request((100, 30), &mut sched, later);

        // The original deadline has passed but the burst restarted the clock.
        assert!(sched.take_due(now + RESIZE_DEBOUNCE).is_empty());
        let due = sched.take_due(later + RESIZE_DEBOUNCE);
        assert_eq!(debouncer.fire(due[0]), Some((100, 30)));
    }

    #[test]
    fn test_stale_timer_is_ignored() {
        let mut sched = Scheduler::new();
        let mut debouncer = ResizeDebouncer::new();
        let now = Instant::now();

        debouncer.request((80, 24), &mut sched, now);
        let stale = sched.schedule(now, Duration::from_millis(1));

        assert!(!debouncer.owns_timer(stale));
        assert_eq!(debouncer.fire(stale), None);
        assert!(debouncer.is_pending());
    }

    #[test]
    fn test_cancel_drops_pending_request() {
        let mut sched = Scheduler::new();
        let mut debouncer = ResizeDebouncer::new();
        let now = Instant::now();

        debouncer.request((80, 24), &mut sched, now);
        debouncer.cancel(&mut sched);

        assert!(!debouncer.is_pending());
        assert_eq!(sched.pending_count(), 0);
        assert!(sched.take_due(now + RESIZE_DEBOUNCE).is_empty());
    }
}
