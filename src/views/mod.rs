//! Read-only view models and their text rendering
//!
//! Each screen is computed from a [`SessionState`](crate::session::SessionState)
//! snapshot, so rendering never touches the controller.

mod models;
mod render;

pub use models::*;
pub use render::render;
