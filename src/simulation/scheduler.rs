//! Virtual-clock timer queue
//!
//! Timers live in named slots. A slot holds at most one pending timer, so
//! re-scheduling a slot always replaces what was there. Time only moves when
//! the owner asks for due timers, which keeps tests free of wall-clock delays.

use sorted_vec::SortedVec;
use std::cmp::Ordering;
use std::time::Duration;

/// Named timer handles owned by a controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimerSlot {
    /// Fires the next transition once a green phase has been held long enough
    Cycle,
    /// Drives the phases inside a running transition
    Transition,
}

/// What a timer does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// Start a transition (clear the current green)
    BeginTransition,
    /// Advance the cursor and re-assert all-red
    SettleAllRed,
    /// Turn the approach under the cursor green
    ActivateGreen,
}

#[derive(Debug, Clone, Copy)]
struct PendingTimer {
    due: Duration,
    /// Insertion order, breaks ties between timers due at the same instant
    seq: u64,
    slot: TimerSlot,
    event: TimerEvent,
}

impl PartialEq for PendingTimer {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PendingTimer {}

impl PartialOrd for PendingTimer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PendingTimer {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.due, self.seq).cmp(&(other.due, other.seq))
    }
}

/// A timer that came due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiredTimer {
    pub at: Duration,
    pub slot: TimerSlot,
    pub event: TimerEvent,
}

/// Delayed-task queue driven by a virtual clock
#[derive(Debug)]
pub struct TimerQueue {
    now: Duration,
    next_seq: u64,
    pending: SortedVec<PendingTimer>,
}

impl Default for TimerQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerQueue {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_seq: 0,
            pending: SortedVec::new(),
        }
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedule `event` in `slot` after `delay`, replacing any timer already pending there
    pub fn schedule(&mut self, slot: TimerSlot, delay: Duration, event: TimerEvent) {
        self.cancel(slot);
        let timer = PendingTimer {
            due: self.now + delay,
            seq: self.next_seq,
            slot,
            event,
        };
        self.next_seq += 1;
        self.pending.insert(timer);
    }

    /// Cancel whatever is pending in `slot`. Returns whether anything was cancelled;
    /// cancelling an empty slot is a no-op.
    pub fn cancel(&mut self, slot: TimerSlot) -> bool {
        let before = self.pending.len();
        self.pending.retain(|timer| timer.slot != slot);
        before != self.pending.len()
    }

    /// Drop every pending timer
    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn is_pending(&self, slot: TimerSlot) -> bool {
        self.pending.iter().any(|timer| timer.slot == slot)
    }

    /// Due time of the timer pending in `slot`
    pub fn due_time(&self, slot: TimerSlot) -> Option<Duration> {
        self.pending
            .iter()
            .find(|timer| timer.slot == slot)
            .map(|timer| timer.due)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Pop the earliest timer due at or before `until`, moving the clock to its due time
    pub fn pop_due(&mut self, until: Duration) -> Option<FiredTimer> {
        let first = self.pending.first()?;
        if first.due > until {
            return None;
        }
        let timer = self.pending.remove_index(0);
        self.now = self.now.max(timer.due);
        Some(FiredTimer {
            at: timer.due,
            slot: timer.slot,
            event: timer.event,
        })
    }

    /// Move the clock forward to `until` without firing anything. Never moves backwards.
    pub fn advance_clock(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn timers_fire_in_due_order() {
        let mut queue = TimerQueue::new();
        queue.schedule(TimerSlot::Cycle, ms(100), TimerEvent::BeginTransition);
        queue.schedule(TimerSlot::Transition, ms(40), TimerEvent::SettleAllRed);

        let first = queue.pop_due(ms(1000)).unwrap();
        assert_eq!(first.slot, TimerSlot::Transition);
        assert_eq!(first.at, ms(40));
        assert_eq!(queue.now(), ms(40));

        let second = queue.pop_due(ms(1000)).unwrap();
        assert_eq!(second.event, TimerEvent::BeginTransition);
        assert_eq!(queue.pop_due(ms(1000)), None);
    }

    #[test]
    fn nothing_fires_before_due() {
        let mut queue = TimerQueue::new();
        queue.schedule(TimerSlot::Cycle, ms(100), TimerEvent::BeginTransition);
        assert_eq!(queue.pop_due(ms(99)), None);
        assert!(queue.pop_due(ms(100)).is_some());
    }

    #[test]
    fn rescheduling_a_slot_replaces_it() {
        let mut queue = TimerQueue::new();
        queue.schedule(TimerSlot::Cycle, ms(100), TimerEvent::BeginTransition);
        queue.schedule(TimerSlot::Cycle, ms(300), TimerEvent::BeginTransition);

        assert_eq!(queue.pending_count(), 1);
        assert_eq!(queue.due_time(TimerSlot::Cycle), Some(ms(300)));
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut queue = TimerQueue::new();
        assert!(!queue.cancel(TimerSlot::Transition));

        queue.schedule(TimerSlot::Transition, ms(10), TimerEvent::ActivateGreen);
        assert!(queue.cancel(TimerSlot::Transition));
        assert!(!queue.cancel(TimerSlot::Transition));
        assert!(!queue.is_pending(TimerSlot::Transition));
    }

    #[test]
    fn same_instant_keeps_insertion_order() {
        let mut queue = TimerQueue::new();
        queue.schedule(TimerSlot::Transition, ms(50), TimerEvent::ActivateGreen);
        queue.schedule(TimerSlot::Cycle, ms(50), TimerEvent::BeginTransition);

        assert_eq!(queue.pop_due(ms(50)).unwrap().slot, TimerSlot::Transition);
        assert_eq!(queue.pop_due(ms(50)).unwrap().slot, TimerSlot::Cycle);
    }

    #[test]
    fn clock_never_moves_backwards() {
        let mut queue = TimerQueue::new();
        queue.advance_clock(ms(500));
        queue.advance_clock(ms(200));
        assert_eq!(queue.now(), ms(500));

        queue.schedule(TimerSlot::Cycle, ms(10), TimerEvent::BeginTransition);
        assert_eq!(queue.due_time(TimerSlot::Cycle), Some(ms(510)));
    }
}
