//! Execution observers and cancellation.

use crate::error::{ExecutionError, StepFrame};
use hfm_types::RunId;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Receives engine events.
///
/// `on_dispatch` fires for every command, at every depth, right before
/// the command is handed to its interpreter. `on_complete` and
/// `on_failure` fire once per top-level run.
///
/// Observers must be `Send + Sync`: independent child programs may be
/// dispatched from several threads.
pub trait ExecutionObserver: Send + Sync {
    /// A command is about to be interpreted.
    fn on_dispatch(&self, frame: &StepFrame);

    /// A top-level run finished after `steps` top-level steps.
    fn on_complete(&self, _run: RunId, _steps: usize) {}

    /// A top-level run failed.
    fn on_failure(&self, _error: &ExecutionError) {}
}

/// Cooperative cancellation flag shared between an engine and its caller.
///
/// Cancelling never touches program data: the engine checks the flag
/// before each step and, if set, fails that step with
/// [`FailureCause::Cancelled`](crate::FailureCause::Cancelled).
///
/// # Example
///
/// ```
/// use hfm_engine::CancelToken;
///
/// let token = CancelToken::new();
/// let handle = token.clone();
/// assert!(!token.is_cancelled());
/// handle.cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates a token that is not cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation of every run using this token.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Clears the flag so the engine can run again.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }

    /// Returns `true` once [`cancel`](Self::cancel) was called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}
