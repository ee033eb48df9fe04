//! Re-entrancy guard for observer-driven updates.
//!
//! A settings observer reacting to a broadcast can ask for the very update
//! that caused the broadcast. [`ApplyGuard`] makes that situation explicit:
//! the guard is either `Idle` or `Applying`, entering hands out an
//! [`ApplyToken`], and the guard returns to `Idle` when the token drops.
//!
//! Everything runs on the UI thread, so the state is a plain `Cell`.

use std::cell::Cell;
use std::rc::Rc;

/// The state of an [`ApplyGuard`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GuardState {
    /// No update is in progress.
    #[default]
    Idle,
    /// An update is being applied; nested requests must be ignored.
    Applying,
}

/// An explicit `Idle | Applying` state machine.
#[derive(Debug, Clone, Default)]
pub struct ApplyGuard {
    state: Rc<Cell<GuardState>>,
}

impl ApplyGuard {
    /// Create an idle guard.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current state.
    pub fn state(&self) -> GuardState {
        self.state.get()
    }

    /// Returns `true` while an update is being applied.
    pub fn is_applying(&self) -> bool {
        self.state.get() == GuardState::Applying
    }

    /// Enter the `Applying` state.
    ///
    /// Returns `None` if an update is already in progress.
    pub fn try_enter(&self) -> Option<ApplyToken> {
        match self.state.get() {
            GuardState::Applying => None,
            GuardState::Idle => {
                self.state.set(GuardState::Applying);
                Some(ApplyToken {
                    state: Rc::clone(&self.state),
                })
            }
        }
    }
}

/// Proof that the guard is in the `Applying` state. Dropping it returns the
/// guard to `Idle`.
#[derive(Debug)]
#[must_use = "the guard returns to Idle as soon as the token is dropped"]
pub struct ApplyToken {
    state: Rc<Cell<GuardState>>,
}

impl Drop for ApplyToken {
    fn drop(&mut self) {
        self.state.set(GuardState::Idle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_enter_is_rejected() {
        let guard = ApplyGuard::new();
        assert_eq!(guard.state(), GuardState::Idle);

        let token = guard.try_enter().expect("idle guard must admit");
        assert!(guard.is_applying());
        assert!(guard.try_enter().is_none());

        drop(token);
        assert_eq!(guard.state(), GuardState::Idle);
        assert!(guard.try_enter().is_some());
    }

    #[test]
    fn test_clones_share_state() {
        let guard = ApplyGuard::new();
        let observer_view = guard.clone();

        let _token = guard.try_enter().unwrap();
        assert!(observer_view.is_applying());
        assert!(observer_view.try_enter().is_none());
    }
}
