//! Wire records exchanged with the directory and conversation service.
//!
//! Every shape is explicit: a response that does not deserialize into these
//! types is treated as a fetch failure rather than patched up.

mod conversation;
mod persona;
mod time;
mod user;

pub use conversation::*;
pub use persona::*;
pub use time::Timestamp;
pub use user::*;
