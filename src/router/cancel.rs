//! Cooperative cancellation
//!
//! Routers stop through a [`CancelToken`] rather than by aborting
//! tasks. Read loops poll the token between operations, so an in-flight
//! read or write always runs to completion and cancellation takes
//! effect at the next loop iteration.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// One-way cancellation signal shared across tasks
///
/// Clones observe the same trigger state. [`CancelToken::child`]
/// derives a token that also reports cancelled once any ancestor has
/// been triggered, while triggering the child leaves its ancestors
/// untouched. A triggered token never reverts.
#[derive(Debug, Clone)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
    parent: Option<Arc<CancelToken>>,
}

impl CancelToken {
    /// Create a root token
    pub fn new() -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
            parent: None,
        }
    }

    /// Derive a token scoped beneath this one
    pub fn child(&self) -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
            parent: Some(Arc::new(self.clone())),
        }
    }

    /// Trigger cancellation; idempotent and irreversible
    pub fn trigger(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Whether this token or any ancestor has been triggered
    ///
    /// Never blocks, so it is safe to call from the top of a loop.
    pub fn is_cancelled(&self) -> bool {
        if self.flag.load(Ordering::SeqCst) {
            return true;
        }
        self.parent.as_ref().map_or(false, |p| p.is_cancelled())
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}
