//! Cancellation handles for repeating actions.

use core::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared state behind a cancellation token.
#[derive(Default)]
struct CancelState {
    /// Whether cancellation has been requested.
    cancelled: AtomicBool,
}

/// A cancellation flag shared between a caller and a repeating action.
///
/// Tokens are lightweight handles over shared state: clones observe and
/// set the same flag. Cancellation is irrevocable; once set, the flag
/// never reverts. A token holds no reference to any scheduler, and
/// cancelling one whose action has already stopped firing is a harmless
/// no-op, as is cancelling twice. Dropping a token does not cancel.
#[derive(Clone, Default)]
pub struct CancelToken {
    state: Arc<CancelState>,
}

impl CancelToken {
    /// Creates a token that has not been cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. All clones observe the flag immediately.
    pub fn cancel(&self) {
        if !self.state.cancelled.swap(true, Ordering::SeqCst) {
            tracing::debug!("cancellation requested");
        }
    }

    /// Returns true if cancellation has been requested on any clone.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.load(Ordering::SeqCst)
    }
}

impl fmt::Debug for CancelToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
