//! Session orchestration
//!
//! The view controller and the pieces of state it owns.

mod controller;
mod inflight;
mod listing;
mod state;
mod view;

pub use controller::ViewController;
pub use inflight::{InFlight, InFlightGuard, OperationKind};
pub use listing::Listing;
pub use state::{Notice, SessionState, Severity};
pub use view::View;
