//! # warden-api
//!
//! HTTP API layer for Warden built on Axum.
//!
//! Provides the REST endpoints, the access-gate middleware, extractors,
//! DTOs, and the mapping from domain errors to HTTP responses.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, serve};
pub use error::{ApiError, ApiResult};
pub use state::AppState;
