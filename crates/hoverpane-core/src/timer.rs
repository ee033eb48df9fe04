//! Timer system for Hoverpane.
//!
//! Provides one-shot timers driven by the UI event loop, and a
//! [`DebounceSlot`] for "latest wins" deferred side effects: each new request
//! cancels the pending timer for the same purpose before scheduling its own.
//!
//! The manager never reads the clock itself; callers pass `now`, which keeps
//! firing order deterministic under test.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

use slotmap::{SlotMap, new_key_type};

use crate::error::{Result, TimerError};

new_key_type! {
    /// A unique identifier for a timer.
    pub struct TimerId;
}

/// Internal timer data.
#[derive(Debug)]
struct TimerData {
    /// When this timer fires.
    fire_time: Instant,
}

/// An entry in the timer queue (min-heap by fire time).
#[derive(Debug, Clone, Copy)]
struct TimerQueueEntry {
    id: TimerId,
    fire_time: Instant,
}

impl PartialEq for TimerQueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.fire_time == other.fire_time
    }
}

impl Eq for TimerQueueEntry {}

impl PartialOrd for TimerQueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimerQueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap (BinaryHeap is max-heap by default).
        other.fire_time.cmp(&self.fire_time)
    }
}

/// Manages all timers owned by one event loop.
#[derive(Debug, Default)]
pub struct TimerManager {
    /// All registered timers.
    timers: SlotMap<TimerId, TimerData>,
    /// Priority queue of pending timer fires (min-heap by fire time).
    queue: BinaryHeap<TimerQueueEntry>,
}

impl TimerManager {
    /// Create a new timer manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a one-shot timer that fires `duration` after `now`.
    pub fn start_one_shot(&mut self, now: Instant, duration: Duration) -> TimerId {
        let fire_time = now + duration;
        let id = self.timers.insert(TimerData { fire_time });
        self.queue.push(TimerQueueEntry { id, fire_time });
        id
    }

    /// Stop and remove a timer.
    ///
    /// Returns an error if the timer already fired or was stopped.
    pub fn stop(&mut self, id: TimerId) -> Result<()> {
        match self.timers.remove(id) {
            Some(_) => Ok(()),
            None => Err(TimerError::InvalidTimerId.into()),
        }
    }

    /// Check if a timer is still pending.
    pub fn is_active(&self, id: TimerId) -> bool {
        self.timers.contains_key(id)
    }

    /// Get the duration from `now` until the next timer fires, if any.
    pub fn time_until_next(&mut self, now: Instant) -> Option<Duration> {
        // Drop stopped timers from the front of the queue.
        while let Some(entry) = self.queue.peek() {
            if self.timers.contains_key(entry.id) {
                break;
            }
            self.queue.pop();
        }

        self.queue
            .peek()
            .map(|entry| entry.fire_time.saturating_duration_since(now))
    }

    /// Process all timers due at `now`, in fire-time order.
    ///
    /// Returns the IDs of the timers that fired.
    #[tracing::instrument(skip(self), target = "hoverpane_core::timer", level = "trace")]
    pub fn process_expired(&mut self, now: Instant) -> Vec<TimerId> {
        let mut fired = Vec::new();

        while let Some(entry) = self.queue.peek().copied() {
            if entry.fire_time > now {
                break;
            }
            self.queue.pop();

            // Stopped timers leave their heap entry behind.
            let Some(timer) = self.timers.remove(entry.id) else {
                continue;
            };

            tracing::trace!(
                target: "hoverpane_core::timer",
                id = ?entry.id,
                late = ?now.saturating_duration_since(timer.fire_time),
                "timer fired"
            );
            fired.push(entry.id);
        }

        fired
    }

    /// Get the number of pending timers.
    pub fn active_count(&self) -> usize {
        self.timers.len()
    }
}

/// A single-purpose deferred action where the latest request wins.
///
/// Scheduling cancels whatever timer this slot was previously holding, so at
/// most one timer per slot is ever pending. When a timer fires, the owner asks
/// the slot whether that timer is still the current one via [`DebounceSlot::take_if`].
#[derive(Debug, Default)]
pub struct DebounceSlot {
    pending: Option<TimerId>,
}

impl DebounceSlot {
    /// Create an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel any pending timer and schedule a new one-shot timer.
    pub fn schedule(&mut self, timers: &mut TimerManager, now: Instant, delay: Duration) -> TimerId {
        self.cancel(timers);
        let id = timers.start_one_shot(now, delay);
        self.pending = Some(id);
        id
    }

    /// Cancel the pending timer, if any.
    pub fn cancel(&mut self, timers: &mut TimerManager) {
        if let Some(id) = self.pending.take() {
            // Already fired timers are gone from the manager; nothing to stop.
            let _ = timers.stop(id);
        }
    }

    /// The currently pending timer.
    pub fn pending(&self) -> Option<TimerId> {
        self.pending
    }

    /// Clear the slot if `fired` is its current timer.
    ///
    /// Returns `true` when the fired timer belongs to this slot.
    pub fn take_if(&mut self, fired: TimerId) -> bool {
        if self.pending == Some(fired) {
            self.pending = None;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_shot_fires_once() {
        let mut timers = TimerManager::new();
        let start = Instant::now();
        let id = timers.start_one_shot(start, Duration::from_millis(100));

        assert!(timers.process_expired(start + Duration::from_millis(50)).is_empty());
        assert_eq!(timers.process_expired(start + Duration::from_millis(100)), vec![id]);
        assert!(timers.process_expired(start + Duration::from_millis(300)).is_empty());
        assert!(!timers.is_active(id));
    }

    #[test]
    fn test_fire_order() {
        let mut timers = TimerManager::new();
        let start = Instant::now();
        let late = timers.start_one_shot(start, Duration::from_millis(300));
        let early = timers.start_one_shot(start, Duration::from_millis(100));

        let fired = timers.process_expired(start + Duration::from_secs(1));
        assert_eq!(fired, vec![early, late]);
    }

    #[test]
    fn test_time_until_next_skips_stopped() {
        let mut timers = TimerManager::new();
        let start = Instant::now();
        let first = timers.start_one_shot(start, Duration::from_millis(100));
        timers.start_one_shot(start, Duration::from_millis(400));
        timers.stop(first).unwrap();

        assert_eq!(timers.time_until_next(start), Some(Duration::from_millis(400)));
        assert_eq!(timers.active_count(), 1);
    }

    #[test]
    fn test_debounce_latest_wins() {
        let mut timers = TimerManager::new();
        let mut slot = DebounceSlot::new();
        let start = Instant::now();

        let first = slot.schedule(&mut timers, start, Duration::from_millis(100));
        let second = slot.schedule(&mut timers, start, Duration::from_millis(100));
        assert_ne!(first, second);
        assert!(!timers.is_active(first));

        let fired = timers.process_expired(start + Duration::from_millis(150));
        assert_eq!(fired, vec![second]);
        assert!(!slot.take_if(first));
        assert!(slot.take_if(second));
        assert!(slot.pending().is_none());
    }

    #[test]
    fn test_debounce_cancel() {
        let mut timers = TimerManager::new();
        let mut slot = DebounceSlot::new();
        let start = Instant::now();

        slot.schedule(&mut timers, start, Duration::from_millis(100));
        slot.cancel(&mut timers);

        assert!(timers.process_expired(start + Duration::from_secs(1)).is_empty());
        assert_eq!(timers.active_count(), 0);
    }
}
