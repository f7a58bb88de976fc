//! # warden-entity
//!
//! Domain entity models for Warden. Every struct in this crate represents
//! a database table row or a domain value object. Database entities
//! derive `sqlx::FromRow` and serialize with camelCase field names.

pub mod activity;
pub mod permission;
pub mod role;
pub mod session;
pub mod user;
