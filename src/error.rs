//! Error taxonomy for action execution and persistence.
//!
//! Retryability is explicit on the type: only transport failures are
//! retryable. Connectivity failures are recoverable but handled by the
//! pre-check (they never consume a retry attempt); validation and
//! invariant failures are terminal on first occurrence.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while executing an action.
#[derive(Debug, Clone, Error)]
pub enum ActionError {
    /// The connectivity pre-check reported no network.
    #[error("no network connectivity")]
    Connectivity,

    /// The catalog request failed at the transport level.
    #[error("catalog request failed: {0}")]
    Transport(String),

    /// The catalog answered with a payload we cannot use.
    #[error("malformed catalog response: {0}")]
    Validation(String),

    /// A caller violated an engine invariant.
    #[error("invariant violated: {0}")]
    Invariant(String),
}

impl ActionError {
    /// Whether the engine may re-run the action after this error.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ActionError::Transport(_))
    }

    /// Short classification string for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ActionError::Connectivity => "connectivity",
            ActionError::Transport(_) => "transport",
            ActionError::Validation(_) => "validation",
            ActionError::Invariant(_) => "invariant",
        }
    }
}

impl From<reqwest::Error> for ActionError {
    fn from(err: reqwest::Error) -> Self {
        ActionError::Transport(err.to_string())
    }
}

/// Errors from the key/value store backing the persisted slice.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to access persisted storage at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("persisted payload could not be encoded or decoded: {0}")]
    Json(#[from] serde_json::Error),
}
