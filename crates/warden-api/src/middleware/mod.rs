//! Axum middleware stack.

pub mod cors;
pub mod gate;
pub mod logging;
pub mod timeout;

pub use gate::{GateState, gate};
