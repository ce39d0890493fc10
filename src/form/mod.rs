//! Persona creation form
//!
//! Incremental editing of a new persona before it is submitted to the
//! directory.

mod builder;

pub use builder::*;
