//! Typed models

mod draft;
mod id;
mod menu;

pub use draft::*;
pub use id::*;
pub use menu::*;
