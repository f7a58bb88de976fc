//! Core type definitions used across the Warden workspace.

pub mod pagination;
pub mod response;
pub mod sorting;

pub use pagination::{PageRequest, PageResponse};
pub use response::ApiErrorResponse;
pub use sorting::SortDirection;
