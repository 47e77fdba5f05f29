//! Durable persistence of the like-set slice.
//!
//! Only the like-set survives restarts; the catalog is refetched every
//! session. The slice is small, so every write stores the full current
//! value rather than computing a delta.

mod kv;

pub use kv::JsonFileStore;

use std::sync::Arc;

use crate::error::PersistError;
use crate::state::{LikeSet, State};

/// Storage key for the persisted slice.
const SLICE_KEY: &str = "state";

/// Key/value storage boundary behind the persistor.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError>;
    fn put(&self, key: &str, value: &str) -> Result<(), PersistError>;
    fn remove(&self, key: &str) -> Result<(), PersistError>;
}

/// Reads the saved slice at startup and writes it after every applied
/// transition.
#[derive(Clone)]
pub struct StatePersistor {
    store: Arc<dyn KeyValueStore>,
}

impl StatePersistor {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Read the persisted slice. `None` means storage was never written.
    pub fn read_persisted(&self) -> Result<Option<State>, PersistError> {
        let Some(serialized) = self.store.get(SLICE_KEY)? else {
            return Ok(None);
        };
        let ids: Vec<u64> = serde_json::from_str(&serialized)?;
        Ok(Some(State::default().with_likes(LikeSet::new(ids))))
    }

    /// Bootstrap empty persisted storage.
    pub fn save_initial_slice(&self) -> Result<(), PersistError> {
        self.store.put(SLICE_KEY, "[]")
    }

    /// Clear the persisted slice.
    pub fn delete_persisted(&self) -> Result<(), PersistError> {
        self.store.remove(SLICE_KEY)
    }

    /// Persist after a transition, writing the full current slice.
    pub fn persist_difference(&self, _previous: &State, new: &State) -> Result<(), PersistError> {
        let serialized = serde_json::to_string(new.likes.ids())?;
        self.store.put(SLICE_KEY, &serialized)
    }
}

/// Restore the startup state: the persisted slice when present, otherwise
/// the default state after bootstrapping empty storage. Never fails; a
/// broken store logs and starts fresh.
pub fn restore_state(persistor: &StatePersistor) -> State {
    match persistor.read_persisted() {
        Ok(Some(state)) => state,
        Ok(None) => {
            if let Err(err) = persistor.save_initial_slice() {
                tracing::warn!(error = %err, "failed to bootstrap persisted storage");
            }
            State::default()
        }
        Err(err) => {
            tracing::warn!(error = %err, "failed to read persisted state, starting fresh");
            State::default()
        }
    }
}
