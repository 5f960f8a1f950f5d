//! Mutation applier: persists a [`MovePlan`] through a [`MenuApi`].

mod guard;

pub use guard::*;

use std::sync::Arc;

use crate::api::MenuApi;
use crate::dnd::MovePlan;
use crate::error::Error;
use crate::model::Menu;

/// What a commit did.
#[derive(Debug, Clone, PartialEq)]
pub enum CommitOutcome {
    /// The plan was an identity move; no call was made.
    Skipped,
    /// The plan was persisted. Holds the moved item as returned by the
    /// reorder call.
    Applied(Menu),
}

/// Applies move plans, one at a time.
///
/// Cheap to clone; clones share the same single-flight guard, so concurrent
/// commits from any clone are refused with [`Error::CommitInFlight`].
#[derive(Clone)]
pub struct MoveCommitter {
    api: Arc<dyn MenuApi>,
    guard: CommitGuard,
}

impl MoveCommitter {
    pub fn new(api: Arc<dyn MenuApi>) -> Self {
        Self {
            api,
            guard: CommitGuard::new(),
        }
    }

    /// Returns `true` while a commit is in flight.
    pub fn is_busy(&self) -> bool {
        self.guard.is_busy()
    }

    /// Persists `plan`.
    ///
    /// The reparent call, when needed, completes before the reorder call is
    /// issued since the new index is relative to the new parent. A failure in
    /// either call is returned as is; the first call is not rolled back, so
    /// the caller must refetch.
    pub async fn commit(&self, plan: &MovePlan) -> Result<CommitOutcome, Error> {
        if plan.is_identity() {
            log::debug!("Move of {} changes nothing, skipping", plan.dragged);
            return Ok(CommitOutcome::Skipped);
        }

        let Some(_permit) = self.guard.try_begin() else {
            log::warn!("Refusing to move {} while another move is in flight", plan.dragged);
            return Err(Error::CommitInFlight);
        };

        if plan.parent_changed {
            log::info!("Moving menu {} under {:?}", plan.dragged, plan.new_parent_id);
            self.api
                .apply_reparent(plan.dragged, plan.new_parent_id)
                .await?;
        }

        log::info!("Reordering menu {} to index {}", plan.dragged, plan.new_index);
        let menu = self
            .api
            .apply_reorder(plan.dragged, plan.new_index, Some(plan.previous_index))
            .await?;

        Ok(CommitOutcome::Applied(menu))
    }
}

impl std::fmt::Debug for MoveCommitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MoveCommitter")
            .field("busy", &self.is_busy())
            .finish_non_exhaustive()
    }
}
