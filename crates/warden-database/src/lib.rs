//! # warden-database
//!
//! Storage traits, PostgreSQL connection management, the sqlx
//! repositories implementing the traits, and an in-memory implementation
//! used by tests and local tooling.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryStore;
pub use store::{ActivityStore, PermissionStore, RoleStore, SessionStore, Stores, UserStore};
