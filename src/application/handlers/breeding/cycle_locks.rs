//! Per-cycle exclusion for in-flight transitions.
//!
//! A lock is taken synchronously before the first await of a transition and
//! released when its guard drops, on every exit path. A second request for
//! the same cycle code fails fast instead of waiting.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::foundation::CycleCode;

#[derive(Debug, Default)]
pub struct CycleLocks {
    held: Mutex<HashSet<CycleCode>>,
}

impl CycleLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn held(&self) -> MutexGuard<'_, HashSet<CycleCode>> {
        self.held.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes the lock for `code`, or returns `None` if it is already held.
    pub fn try_acquire(self: &Arc<Self>, code: &CycleCode) -> Option<CycleLockGuard> {
        if !self.held().insert(code.clone()) {
            return None;
        }
        Some(CycleLockGuard {
            locks: Arc::clone(self),
            code: code.clone(),
        })
    }

    /// Returns true if a transition is in flight for `code`.
    pub fn is_held(&self, code: &CycleCode) -> bool {
        self.held().contains(code)
    }
}

/// Releases its cycle lock on drop.
#[derive(Debug)]
pub struct CycleLockGuard {
    locks: Arc<CycleLocks>,
    code: CycleCode,
}

impl Drop for CycleLockGuard {
    fn drop(&mut self) {
        self.locks.held().remove(&self.code);
    }
}
