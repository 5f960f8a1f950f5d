//! Drag-and-drop: drop position resolution, move planning and drag state.
//!
//! The flow for a single gesture is:
//!
//! 1. [`DragState::begin`] when a row starts being dragged.
//! 2. [`DropResolver::hover`] classifies the pointer position over each
//!    hovered row and [`DragState::hover`] records it.
//! 3. [`DragState::drop`] yields a [`DragIntent`].
//! 4. [`plan_move`] turns the intent into a [`MovePlan`] against the current
//!    flat list, or `None` when the move is invalid or stale.

mod drag;
mod plan;
mod resolve;

pub use drag::*;
pub use plan::*;
pub use resolve::*;
