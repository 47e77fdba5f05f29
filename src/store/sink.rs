//! The user-exception channel and the failure gate behind it.
//!
//! Terminal action failures are reported to a [`UserErrorSink`] together
//! with a [`ResumeHandle`]. The engine stops processing new dispatches
//! until the handle is resumed, so a UI can present the failure before
//! more work lands on top of it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

use crate::error::ActionError;

/// Receiver of terminal action failures.
///
/// Implementations must call [`ResumeHandle::resume`] to let the engine
/// continue processing subsequent dispatches.
pub trait UserErrorSink: Send + Sync {
    fn report(&self, error: &ActionError, occurrences: u32, resume: ResumeHandle);
}

/// Default sink: logs the failure and resumes immediately.
pub struct LoggingSink;

impl UserErrorSink for LoggingSink {
    fn report(&self, error: &ActionError, occurrences: u32, resume: ResumeHandle) {
        tracing::warn!(error = %error, kind = error.kind(), occurrences, "action failed");
        resume.resume();
    }
}

/// Handed to the sink alongside a failure; resuming reopens the engine.
pub struct ResumeHandle {
    gate: FailureGate,
}

impl ResumeHandle {
    pub(crate) fn new(gate: FailureGate) -> Self {
        Self { gate }
    }

    pub fn resume(self) {
        self.gate.open();
    }
}

/// Gate closed on terminal failure, reopened by [`ResumeHandle::resume`].
#[derive(Clone)]
pub(crate) struct FailureGate {
    open: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl FailureGate {
    pub fn new() -> Self {
        Self {
            open: Arc::new(AtomicBool::new(true)),
            notify: Arc::new(Notify::new()),
        }
    }

    pub fn close(&self) {
        self.open.store(false, Ordering::SeqCst);
    }

    pub fn open(&self) {
        if !self.open.swap(true, Ordering::SeqCst) {
            self.notify.notify_waiters();
        }
    }

    pub async fn wait_until_open(&self) {
        loop {
            // Subscribe before checking the flag so a resume landing
            // between the check and the await is not lost.
            let notified = self.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if self.open.load(Ordering::SeqCst) {
                return;
            }
            notified.await;
        }
    }
}
