//! Hierarchical menu editor core
//!
//! Builds a nested menu tree from a flat list (parent id + sibling order),
//! resolves drag-and-drop gestures into reparent/reorder plans and persists
//! them through a [`api::MenuApi`] backend.

pub mod api;
pub mod commit;
pub mod dnd;
pub mod editor;
pub mod error;
pub mod expand;
pub mod model;
pub mod response;
pub mod tree;
pub mod validation;

mod client;

pub use client::*;
pub use editor::MenuEditor;
pub use editor::MoveOutcome;
pub use error::Error;
