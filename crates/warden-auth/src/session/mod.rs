//! Session lifecycle: login, validation, logout and administrative control.

pub mod authority;

pub use authority::{LoginOutcome, SessionAuthority, SessionSnapshot};
