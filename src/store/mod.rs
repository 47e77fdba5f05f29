//! The dispatch engine.
//!
//! A [`Store`] owns the single [`State`] snapshot and executes dispatched
//! [`Action`]s: failure gate, non-reentrancy gate, connectivity pre-check,
//! the action's work against a fresh snapshot per attempt, retry with
//! exponential backoff, and finally one atomic replace-or-transform of the
//! held state. Applied states are published to watch subscribers and the
//! like-set slice is persisted from the completion path.
//!
//! Updates land in completion order, not dispatch order: a
//! [`Resolution::Transform`] is evaluated against the state as it exists
//! at apply time, so a slow fetch never clobbers what a faster action
//! already applied.

mod action;
mod registry;
mod sink;

pub use action::{Action, ActionKind, DispatchPolicy, Resolution, RetryPolicy};
pub use sink::{LoggingSink, ResumeHandle, UserErrorSink};

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;

use crate::catalog::CatalogClient;
use crate::connectivity::ConnectivityProbe;
use crate::error::ActionError;
use crate::persist::StatePersistor;
use crate::state::State;

use registry::InFlightRegistry;
use sink::FailureGate;

/// Central store: owns the state snapshot and executes dispatched actions.
///
/// Cheap to clone; clones share the same engine.
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    state: Mutex<State>,
    publisher: watch::Sender<State>,
    in_flight: InFlightRegistry,
    catalog: Arc<dyn CatalogClient>,
    probe: Arc<dyn ConnectivityProbe>,
    persistor: Option<StatePersistor>,
    sink: Arc<dyn UserErrorSink>,
    gate: FailureGate,
    retry_override: Option<RetryPolicy>,
    failure_counts: Mutex<HashMap<ActionKind, u32>>,
}

/// Builder for [`Store`]; collaborators are injected here, never reached
/// through globals.
pub struct StoreBuilder {
    initial: State,
    catalog: Arc<dyn CatalogClient>,
    probe: Arc<dyn ConnectivityProbe>,
    persistor: Option<StatePersistor>,
    sink: Arc<dyn UserErrorSink>,
    retry_override: Option<RetryPolicy>,
}

impl StoreBuilder {
    /// Persist the like-set slice after every applied transition.
    pub fn persistor(mut self, persistor: StatePersistor) -> Self {
        self.persistor = Some(persistor);
        self
    }

    /// Replace the default logging sink for terminal failures.
    pub fn error_sink(mut self, sink: Arc<dyn UserErrorSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Override the backoff schedule of retry-enabled actions.
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_override = Some(policy);
        self
    }

    pub fn build(self) -> Store {
        let (publisher, _) = watch::channel(self.initial.clone());
        Store {
            inner: Arc::new(StoreInner {
                state: Mutex::new(self.initial),
                publisher,
                in_flight: InFlightRegistry::default(),
                catalog: self.catalog,
                probe: self.probe,
                persistor: self.persistor,
                sink: self.sink,
                gate: FailureGate::new(),
                retry_override: self.retry_override,
                failure_counts: Mutex::new(HashMap::new()),
            }),
        }
    }
}

impl Store {
    pub fn builder(
        initial: State,
        catalog: Arc<dyn CatalogClient>,
        probe: Arc<dyn ConnectivityProbe>,
    ) -> StoreBuilder {
        StoreBuilder {
            initial,
            catalog,
            probe,
            persistor: None,
            sink: Arc::new(LoggingSink),
            retry_override: None,
        }
    }

    /// The current snapshot.
    pub fn state(&self) -> State {
        self.inner.state.lock().clone()
    }

    /// Receiver observing every applied state, in apply order.
    pub fn subscribe(&self) -> watch::Receiver<State> {
        self.inner.publisher.subscribe()
    }

    /// Whether an action of `kind` is currently running.
    pub fn is_running(&self, kind: ActionKind) -> bool {
        self.inner.in_flight.is_running(kind)
    }

    /// Fire-and-forget dispatch.
    pub fn dispatch(&self, action: Action) {
        let inner = Arc::clone(&self.inner);
        tokio::spawn(run_action(inner, action));
    }

    /// Dispatch and wait for the action to reach a terminal state
    /// (succeeded, failed, dropped, or resolved to a no-op).
    pub async fn dispatch_and_wait(&self, action: Action) {
        let inner = Arc::clone(&self.inner);
        // Spawned rather than awaited inline so tests exercise exactly the
        // fire-and-forget code path.
        let handle = tokio::spawn(run_action(inner, action));
        let _ = handle.await;
    }
}

async fn run_action(inner: Arc<StoreInner>, action: Action) {
    let kind = action.kind();
    let policy = action.policy();

    inner.gate.wait_until_open().await;

    // Non-reentrancy: the run already in flight is the sole authority;
    // later dispatches of the same kind are dropped, not queued.
    let _slot = if policy.non_reentrant {
        if !inner.in_flight.try_acquire(kind) {
            tracing::debug!(action = ?kind, "dropped re-entrant dispatch");
            return;
        }
        let registry = inner.in_flight.clone();
        Some(scopeguard::guard(registry, move |registry| {
            registry.release(kind);
        }))
    } else {
        None
    };

    if policy.check_connectivity && !inner.probe.is_reachable().await {
        tracing::warn!(action = ?kind, "connectivity pre-check failed");
        surface(&inner, kind, ActionError::Connectivity);
        return;
    }

    let retry = policy
        .retry
        .map(|default| inner.retry_override.unwrap_or(default));
    let mut attempt: u32 = 0;
    loop {
        // Fresh snapshot per attempt: the work always sees the state
        // current at its invocation.
        let snapshot = inner.state.lock().clone();
        match perform(&inner, &action, snapshot).await {
            Ok(resolution) => {
                apply(&inner, kind, resolution);
                return;
            }
            Err(err) => match retry {
                Some(schedule) if err.is_retryable() && attempt < schedule.max_retries => {
                    let delay = schedule.delay_for(attempt);
                    attempt += 1;
                    tracing::debug!(
                        action = ?kind,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "retrying after recoverable failure"
                    );
                    tokio::time::sleep(delay).await;
                }
                _ => {
                    tracing::warn!(action = ?kind, error = %err, attempts = attempt + 1, "action failed terminally");
                    surface(&inner, kind, err);
                    return;
                }
            },
        }
    }
}

/// Execute one attempt of `action` against the dispatch-time `snapshot`.
async fn perform(
    inner: &StoreInner,
    action: &Action,
    snapshot: State,
) -> Result<Resolution, ActionError> {
    match action {
        Action::FetchMore => {
            let Some(page) = snapshot.next_page() else {
                return Ok(Resolution::NoOp);
            };
            tracing::info!(page, "fetching catalog page");
            let fetched = inner.catalog.fetch_page(page).await?;
            let (items, total_count, total_pages) =
                (fetched.items, fetched.total_count, fetched.total_pages);
            // A transform, not a replace: pages applied while this fetch
            // was in flight must survive, whatever order completions land.
            Ok(Resolution::Transform(Box::new(move |latest: &State| {
                latest.with_page_appended(items, total_count, total_pages)
            })))
        }
        Action::ToggleLike { id } => {
            let likes = snapshot.likes.toggled(id);
            Ok(Resolution::Replace(snapshot.with_likes(likes)))
        }
        Action::ToggleTheme { explicit } => {
            let current = explicit.unwrap_or(snapshot.theme);
            Ok(Resolution::Replace(snapshot.with_theme(current.toggled())))
        }
        Action::Select { id } => Ok(Resolution::Replace(snapshot.with_selected(*id))),
    }
}

/// Apply a resolution to the latest state, publish it, and persist the
/// like-set slice. Publication and persistence stay under the state lock
/// so subscribers and storage observe transitions in apply order.
fn apply(inner: &StoreInner, kind: ActionKind, resolution: Resolution) {
    let mut state = inner.state.lock();
    let previous = state.clone();
    match resolution {
        Resolution::Replace(next) => *state = next,
        Resolution::Transform(transform) => {
            let next = transform(&*state);
            *state = next;
        }
        Resolution::NoOp => {
            tracing::debug!(action = ?kind, "resolved to no-op");
            return;
        }
    }
    let current = state.clone();

    inner.publisher.send_replace(current.clone());
    tracing::debug!(action = ?kind, items = current.items.len(), "state applied");

    if let Some(persistor) = &inner.persistor {
        if let Err(err) = persistor.persist_difference(&previous, &current) {
            tracing::warn!(error = %err, "failed to persist like-set slice");
        }
    }
}

/// Route a terminal failure to the user-exception channel. The gate stays
/// closed until the sink resumes, holding back subsequent dispatches.
fn surface(inner: &Arc<StoreInner>, kind: ActionKind, err: ActionError) {
    let occurrences = {
        let mut counts = inner.failure_counts.lock();
        let count = counts.entry(kind).or_insert(0);
        *count += 1;
        *count
    };
    inner.gate.close();
    let resume = ResumeHandle::new(inner.gate.clone());
    inner.sink.report(&err, occurrences, resume);
}
