//! Mutual exclusion for hosts that do not serialize calls themselves.

use crate::ledger::AchievementLedger;
use std::sync::{Arc, Mutex};

/// Cloneable handle to a ledger guarded by a mutex. Each closure passed to
/// [`SharedLedger::with`] runs as one serialized transaction, which keeps the
/// course and skill id counters race-free.
#[derive(Debug)]
pub struct SharedLedger<G> {
    inner: Arc<Mutex<AchievementLedger<G>>>,
}

impl<G> Clone for SharedLedger<G> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<G> SharedLedger<G> {
    /// Wraps `ledger`.
    pub fn new(ledger: AchievementLedger<G>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ledger)),
        }
    }

    /// Runs `f` with exclusive access to the ledger.
    pub fn with<T>(&self, f: impl FnOnce(&mut AchievementLedger<G>) -> T) -> T {
        let mut guard = self
            .inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut *guard)
    }
}
