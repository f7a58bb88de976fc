//! Activity log queries.

pub mod service;

pub use service::ActivityService;
