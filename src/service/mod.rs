//! Service clients
//!
//! The two client traits the session depends on, an HTTP implementation
//! for the real service, and an in-memory implementation for tests and
//! offline demos.

mod traits;
mod http;
mod memory;

pub use traits::*;
pub use http::HttpServiceClient;
pub use memory::{MemoryConfig, MemoryService, ServiceOp};
