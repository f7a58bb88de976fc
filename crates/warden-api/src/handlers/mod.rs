//! HTTP request handlers, one module per resource.

pub mod activity;
pub mod health;
pub mod permission;
pub mod role;
pub mod session;
pub mod user;
