//! Error types

mod api;
mod validation;

pub use api::*;
pub use validation::*;

use crate::model::MenuId;

/// Errors returned by the menu client, backends and the editor session.
///
/// Invalid moves (self-drop, drop into own subtree) and stale ids are not
/// errors; the planner simply produces no plan for them.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport or server failure.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A draft or patch failed form validation.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// The referenced menu does not exist.
    #[error("Menu {0} not found")]
    NotFound(MenuId),

    /// The backend refused a change that would break the tree.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Another move is still being committed.
    #[error("A move is already being committed")]
    CommitInFlight,
}

impl Error {
    /// Returns the HTTP status code if the error came from the server.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api(err) => err.status_code(),
            Self::NotFound(_) => Some(404),
            Self::Conflict(_) => Some(409),
            _ => None,
        }
    }

    /// Returns `true` if retrying the same call later may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Api(err) => err.is_retryable(),
            Self::CommitInFlight => true,
            _ => false,
        }
    }
}
