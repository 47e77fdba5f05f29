//! Shared test utilities and scripted collaborators.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use cardstock::catalog::{CatalogClient, CatalogPage, SimulatedCatalog};
use cardstock::connectivity::{AlwaysReachable, ConnectivityProbe};
use cardstock::error::{ActionError, PersistError};
use cardstock::persist::{KeyValueStore, StatePersistor};
use cardstock::state::State;
use cardstock::store::{ResumeHandle, RetryPolicy, Store, UserErrorSink};

/// Store wired to the simulated catalog; no persistence, default sink.
pub fn simulated_store() -> Store {
    Store::builder(
        State::default(),
        Arc::new(SimulatedCatalog::new()),
        Arc::new(AlwaysReachable),
    )
    .build()
}

/// A backoff schedule fast enough for tests.
pub fn fast_retries(max_retries: u32) -> RetryPolicy {
    RetryPolicy {
        initial_delay: Duration::from_millis(1),
        backoff_multiplier: 2.0,
        max_retries,
        max_delay: Duration::from_millis(10),
    }
}

/// Poll until `predicate` holds on the store's state, or panic after ~2s.
pub async fn wait_for(store: &Store, predicate: impl Fn(&State) -> bool) {
    for _ in 0..200 {
        if predicate(&store.state()) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("store never reached the expected state");
}

/// Catalog client that fails a scripted number of calls with transport
/// errors, then delegates to the simulated catalog. Counts every call.
pub struct ScriptedCatalog {
    inner: SimulatedCatalog,
    failures_remaining: AtomicU32,
    delay: Duration,
    calls: AtomicU32,
}

impl ScriptedCatalog {
    pub fn new() -> Self {
        Self::failing(0)
    }

    pub fn failing(times: u32) -> Self {
        Self {
            inner: SimulatedCatalog::new(),
            failures_remaining: AtomicU32::new(times),
            delay: Duration::ZERO,
            calls: AtomicU32::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogClient for ScriptedCatalog {
    async fn fetch_page(&self, page: usize) -> Result<CatalogPage, ActionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.delay > Duration::ZERO {
            tokio::time::sleep(self.delay).await;
        }

        let failed = self
            .failures_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failed {
            return Err(ActionError::Transport("scripted transport failure".into()));
        }

        self.inner.fetch_page(page).await
    }
}

/// Catalog client that always answers with a validation failure.
pub struct BrokenCatalog;

#[async_trait]
impl CatalogClient for BrokenCatalog {
    async fn fetch_page(&self, _page: usize) -> Result<CatalogPage, ActionError> {
        Err(ActionError::Validation("scripted malformed payload".into()))
    }
}

/// Probe that always reports offline.
pub struct Unreachable;

#[async_trait]
impl ConnectivityProbe for Unreachable {
    async fn is_reachable(&self) -> bool {
        false
    }
}

/// Error sink capturing every surfaced failure; resumes immediately.
#[derive(Default)]
pub struct RecordingSink {
    reports: Mutex<Vec<(String, u32)>>,
}

impl RecordingSink {
    /// Surfaced failures as (error kind, occurrence count) pairs.
    pub fn reports(&self) -> Vec<(String, u32)> {
        self.reports.lock().clone()
    }
}

impl UserErrorSink for RecordingSink {
    fn report(&self, error: &ActionError, occurrences: u32, resume: ResumeHandle) {
        self.reports
            .lock()
            .push((error.kind().to_string(), occurrences));
        resume.resume();
    }
}

/// Error sink that parks resume handles instead of resuming, so tests can
/// observe the engine holding back subsequent dispatches.
#[derive(Default)]
pub struct DeferredSink {
    pending: Mutex<Vec<ResumeHandle>>,
}

impl DeferredSink {
    pub fn pending(&self) -> usize {
        self.pending.lock().len()
    }

    /// Resume every parked handle.
    pub fn resume_all(&self) {
        for handle in self.pending.lock().drain(..) {
            handle.resume();
        }
    }
}

impl UserErrorSink for DeferredSink {
    fn report(&self, _error: &ActionError, _occurrences: u32, resume: ResumeHandle) {
        self.pending.lock().push(resume);
    }
}

/// In-memory key/value store recording all writes.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn value(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<(), PersistError> {
        self.entries
            .lock()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PersistError> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// Persistor over a shared in-memory store.
pub fn memory_persistor() -> (Arc<MemoryStore>, StatePersistor) {
    let store = Arc::new(MemoryStore::default());
    let persistor = StatePersistor::new(Arc::clone(&store) as Arc<dyn KeyValueStore>);
    (store, persistor)
}
