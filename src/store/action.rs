//! The closed set of dispatchable actions and their execution policies.

use std::time::Duration;

use crate::state::{State, Theme};

/// One unit of state-changing work.
///
/// Variants are a closed set; the engine dispatches through a single
/// handler keyed by tag, so adding a variant forces every match to be
/// revisited.
#[derive(Debug, Clone)]
pub enum Action {
    /// Fetch the next catalog page, if the cursor says one exists.
    FetchMore,
    /// Toggle an item id (string form accepted) in the like-set.
    ToggleLike { id: String },
    /// Toggle light/dark. An explicit current theme, when supplied by the
    /// caller, takes precedence over the stored preference.
    ToggleTheme { explicit: Option<Theme> },
    /// Record the last-viewed item.
    Select { id: u64 },
}

/// Action identity used for non-reentrancy bookkeeping and failure counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    FetchMore,
    ToggleLike,
    ToggleTheme,
    Select,
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::FetchMore => ActionKind::FetchMore,
            Action::ToggleLike { .. } => ActionKind::ToggleLike,
            Action::ToggleTheme { .. } => ActionKind::ToggleTheme,
            Action::Select { .. } => ActionKind::Select,
        }
    }

    /// Execution policy for this variant. Total over the tag, so policy is
    /// part of the action contract rather than per-instance configuration.
    pub fn policy(&self) -> DispatchPolicy {
        match self {
            Action::FetchMore => DispatchPolicy {
                non_reentrant: true,
                check_connectivity: true,
                retry: Some(RetryPolicy::default()),
            },
            Action::ToggleLike { .. } | Action::ToggleTheme { .. } | Action::Select { .. } => {
                DispatchPolicy::default()
            }
        }
    }
}

/// Per-variant execution policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct DispatchPolicy {
    /// Drop this dispatch silently when one of the same kind is running.
    pub non_reentrant: bool,
    /// Probe reachability before running any work.
    pub check_connectivity: bool,
    /// Backoff schedule for recoverable failures; `None` disables retry.
    pub retry: Option<RetryPolicy>,
}

/// Exponential backoff schedule for retryable failures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub initial_delay: Duration,
    pub backoff_multiplier: f64,
    /// Additional attempts after the first; total attempts = max_retries + 1.
    pub max_retries: u32,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(350),
            backoff_multiplier: 2.0,
            max_retries: 3,
            max_delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// Delay before the re-run that follows failure number `attempt`
    /// (0-based), capped at `max_delay`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = self.backoff_multiplier.powi(attempt as i32);
        self.initial_delay.mul_f64(factor).min(self.max_delay)
    }
}

/// What an executed action resolved to.
pub enum Resolution {
    /// Replace the snapshot wholesale. Used by synchronous actions that
    /// derived directly from the dispatch-time snapshot.
    Replace(State),
    /// Derive from the state as it exists at apply time. Used by actions
    /// that awaited I/O, so updates applied by faster-completing actions
    /// are not clobbered.
    Transform(Box<dyn FnOnce(&State) -> State + Send>),
    /// Leave the state untouched; nothing is published or persisted.
    NoOp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_more_carries_the_full_policy() {
        let policy = Action::FetchMore.policy();
        assert!(policy.non_reentrant);
        assert!(policy.check_connectivity);
        assert_eq!(policy.retry, Some(RetryPolicy::default()));
    }

    #[test]
    fn synchronous_actions_have_no_policy_flags() {
        let policy = Action::ToggleLike { id: "1".into() }.policy();
        assert!(!policy.non_reentrant);
        assert!(!policy.check_connectivity);
        assert!(policy.retry.is_none());
    }

    #[test]
    fn backoff_doubles_then_caps() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(0), Duration::from_millis(350));
        assert_eq!(policy.delay_for(1), Duration::from_millis(700));
        assert_eq!(policy.delay_for(2), Duration::from_millis(1400));
        // 350ms * 2^4 = 5.6s, past the cap.
        assert_eq!(policy.delay_for(4), Duration::from_secs(5));
    }
}
