//! "Disappear on hover" behavior.
//!
//! When a widget's `disappear_on_hover` setting is on, hovering it fades the
//! panel out. Shortly after, the panel stops receiving pointer events so the
//! user can click what lies beneath; after a longer pause it restores itself.
//! Every state change cancels and replaces the pending timer.

use std::time::{Duration, Instant};

use hoverpane_core::logging::targets;
use hoverpane_core::{DebounceSlot, TimerId, TimerManager};

/// Backend operations requested by a [`HoverFade`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HoverAction {
    SetOpacity(f64),
    SetIgnoresMouse(bool),
}

/// Timing and opacity of the fade.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverTiming {
    /// Opacity while faded.
    pub faded_opacity: f64,
    /// Delay between fading and ignoring the pointer.
    pub hit_test_delay: Duration,
    /// How long the panel stays click-through before restoring.
    pub restore_after: Duration,
}

impl Default for HoverTiming {
    fn default() -> Self {
        Self {
            faded_opacity: 0.05,
            hit_test_delay: Duration::from_millis(250),
            restore_after: Duration::from_millis(2500),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Phase {
    #[default]
    Shown,
    Faded,
    ClickThrough,
}

/// Per-panel hover fade state machine.
#[derive(Debug)]
pub struct HoverFade {
    enabled: bool,
    base_opacity: f64,
    timing: HoverTiming,
    phase: Phase,
    slot: DebounceSlot,
}

impl HoverFade {
    pub fn new(timing: HoverTiming) -> Self {
        Self {
            enabled: false,
            base_opacity: 1.0,
            timing,
            phase: Phase::Shown,
            slot: DebounceSlot::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns `true` while the panel is faded or click-through.
    pub fn is_hidden(&self) -> bool {
        self.phase != Phase::Shown
    }

    /// Update from the panel's settings.
    ///
    /// Disabling while hidden restores the panel immediately.
    pub fn configure(&mut self, enabled: bool, base_opacity: f64, timers: &mut TimerManager) -> Vec<HoverAction> {
        self.enabled = enabled;
        self.base_opacity = base_opacity;
        if !enabled && self.is_hidden() {
            return self.restore(timers);
        }
        Vec::new()
    }

    /// The pointer entered the panel.
    pub fn enter(&mut self, timers: &mut TimerManager, now: Instant) -> Vec<HoverAction> {
        if !self.enabled || self.phase != Phase::Shown {
            return Vec::new();
        }
        self.phase = Phase::Faded;
        self.slot.schedule(timers, now, self.timing.hit_test_delay);
        tracing::trace!(target: targets::HOVER, "fading out");
        vec![HoverAction::SetOpacity(self.timing.faded_opacity)]
    }

    /// The pointer left the panel.
    pub fn leave(&mut self, timers: &mut TimerManager) -> Vec<HoverAction> {
        if self.phase == Phase::Shown {
            return Vec::new();
        }
        self.restore(timers)
    }

    /// A timer fired. Returns `None` if it is not this fade's timer.
    pub fn timer_fired(&mut self, id: TimerId, timers: &mut TimerManager, now: Instant) -> Option<Vec<HoverAction>> {
        if !self.slot.take_if(id) {
            return None;
        }
        let actions = match self.phase {
            Phase::Faded => {
                self.phase = Phase::ClickThrough;
                self.slot.schedule(timers, now, self.timing.restore_after);
                vec![HoverAction::SetIgnoresMouse(true)]
            }
            Phase::ClickThrough => self.restore(timers),
            Phase::Shown => Vec::new(),
        };
        Some(actions)
    }

    /// Cancel any pending timer without changing the panel.
    pub fn cancel(&mut self, timers: &mut TimerManager) {
        self.slot.cancel(timers);
    }

    fn restore(&mut self, timers: &mut TimerManager) -> Vec<HoverAction> {
        self.slot.cancel(timers);
        let was_click_through = self.phase == Phase::ClickThrough;
        self.phase = Phase::Shown;
        tracing::trace!(target: targets::HOVER, "restored");

        let mut actions = vec![HoverAction::SetOpacity(self.base_opacity)];
        if was_click_through {
            actions.push(HoverAction::SetIgnoresMouse(false));
        }
        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enabled_fade(timers: &mut TimerManager) -> HoverFade {
        let mut fade = HoverFade::new(HoverTiming::default());
        fade.configure(true, 0.9, timers);
        fade
    }

    #[test]
    fn test_disabled_fade_does_nothing() {
        let mut timers = TimerManager::new();
        let mut fade = HoverFade::new(HoverTiming::default());
        assert!(fade.enter(&mut timers, Instant::now()).is_empty());
        assert_eq!(timers.active_count(), 0);
    }

    #[test]
    fn test_full_cycle() {
        let mut timers = TimerManager::new();
        let mut fade = enabled_fade(&mut timers);
        let t0 = Instant::now();

        assert_eq!(fade.enter(&mut timers, t0), vec![HoverAction::SetOpacity(0.05)]);

        let t1 = t0 + Duration::from_millis(300);
        let fired = timers.process_expired(t1);
        assert_eq!(fired.len(), 1);
        assert_eq!(
            fade.timer_fired(fired[0], &mut timers, t1),
            Some(vec![HoverAction::SetIgnoresMouse(true)])
        );

        let t2 = t1 + Duration::from_secs(3);
        let fired = timers.process_expired(t2);
        assert_eq!(
            fade.timer_fired(fired[0], &mut timers, t2),
            Some(vec![
                HoverAction::SetOpacity(0.9),
                HoverAction::SetIgnoresMouse(false)
            ])
        );
        assert!(!fade.is_hidden());
        assert_eq!(timers.active_count(), 0);
    }

    #[test]
    fn test_leave_cancels_pending_suppression() {
        let mut timers = TimerManager::new();
        let mut fade = enabled_fade(&mut timers);
        let t0 = Instant::now();

        fade.enter(&mut timers, t0);
        assert_eq!(fade.leave(&mut timers), vec![HoverAction::SetOpacity(0.9)]);
        assert!(timers.process_expired(t0 + Duration::from_secs(1)).is_empty());
    }

    #[test]
    fn test_foreign_timer_is_ignored() {
        let mut timers = TimerManager::new();
        let mut fade = enabled_fade(&mut timers);
        let other = timers.start_one_shot(Instant::now(), Duration::ZERO);
        assert!(fade.timer_fired(other, &mut timers, Instant::now()).is_none());
    }

    #[test]
    fn test_disabling_while_hidden_restores() {
        let mut timers = TimerManager::new();
        let mut fade = enabled_fade(&mut timers);
        fade.enter(&mut timers, Instant::now());

        let actions = fade.configure(false, 1.0, &mut timers);
        assert_eq!(actions, vec![HoverAction::SetOpacity(1.0)]);
        assert_eq!(timers.active_count(), 0);
    }
}
