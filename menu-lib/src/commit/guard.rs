//! Single-flight guard for move commits.

use std::sync::Arc;

use tokio::sync::OwnedSemaphorePermit;
use tokio::sync::Semaphore;

/// Allows at most one commit in flight.
///
/// Wraps a one-permit `tokio::sync::Semaphore`. Unlike a queue, a second
/// caller does not wait: [`CommitGuard::try_begin`] fails immediately so the
/// UI can reject the gesture instead of interleaving two partial moves.
///
/// # Example
///
/// ```
/// use menu_lib::commit::CommitGuard;
///
/// let guard = CommitGuard::new();
/// let permit = guard.try_begin().unwrap();
/// assert!(guard.is_busy());
/// assert!(guard.try_begin().is_none());
/// drop(permit);
/// assert!(!guard.is_busy());
/// ```
#[derive(Debug, Clone)]
pub struct CommitGuard {
    semaphore: Arc<Semaphore>,
}

/// Held for the duration of a commit; released when dropped.
#[derive(Debug)]
pub struct CommitPermit {
    _permit: OwnedSemaphorePermit,
}

impl CommitGuard {
    /// Creates an idle guard.
    pub fn new() -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(1)),
        }
    }

    /// Claims the guard, or returns `None` if a commit is already running.
    pub fn try_begin(&self) -> Option<CommitPermit> {
        Arc::clone(&self.semaphore)
            .try_acquire_owned()
            .ok()
            .map(|permit| CommitPermit { _permit: permit })
    }

    /// Returns `true` while a commit holds the guard.
    pub fn is_busy(&self) -> bool {
        self.semaphore.available_permits() == 0
    }
}

impl Default for CommitGuard {
    fn default() -> Self {
        Self::new()
    }
}
