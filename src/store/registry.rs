//! Centralized non-reentrancy bookkeeping.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;

use super::action::ActionKind;

/// Tracks which action kinds are currently running.
///
/// Owned by the store so reentrancy state is centralized and inspectable
/// rather than distributed across action instances.
#[derive(Clone, Default)]
pub(crate) struct InFlightRegistry {
    running: Arc<Mutex<HashSet<ActionKind>>>,
}

impl InFlightRegistry {
    /// Claim the slot for `kind`. Returns false when one is already running.
    pub fn try_acquire(&self, kind: ActionKind) -> bool {
        self.running.lock().insert(kind)
    }

    /// Release the slot for `kind`.
    pub fn release(&self, kind: ActionKind) {
        self.running.lock().remove(&kind);
    }

    pub fn is_running(&self, kind: ActionKind) -> bool {
        self.running.lock().contains(&kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_of_same_kind_is_rejected() {
        let registry = InFlightRegistry::default();
        assert!(registry.try_acquire(ActionKind::FetchMore));
        assert!(!registry.try_acquire(ActionKind::FetchMore));
        assert!(registry.is_running(ActionKind::FetchMore));

        registry.release(ActionKind::FetchMore);
        assert!(!registry.is_running(ActionKind::FetchMore));
        assert!(registry.try_acquire(ActionKind::FetchMore));
    }

    #[test]
    fn kinds_are_tracked_independently() {
        let registry = InFlightRegistry::default();
        assert!(registry.try_acquire(ActionKind::FetchMore));
        assert!(registry.try_acquire(ActionKind::ToggleLike));
    }
}
