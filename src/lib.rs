//! aiclone client library
//!
//! Client-side orchestration for the AI Clone Me persona directory and
//! conversation service:
//!
//! - [`form`]: building a personality, including incremental tag lists
//! - [`service`]: the directory and conversation clients (HTTP and in-memory)
//! - [`session`]: the view controller and the session state it owns
//! - [`views`]: read-only view models and their text rendering

pub mod cli;
pub mod config;
pub mod error;
pub mod form;
pub mod logging;
pub mod model;
pub mod service;
pub mod session;
pub mod shell;
pub mod version;
pub mod views;

pub use error::{Error, ErrorKind, FailureCause, Result};
