//! # warden-service
//!
//! Administrative use cases for Warden. Each service orchestrates the
//! stores, the session authority and the permission graph, and records
//! what it did in the activity log.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time.

pub mod activity;
pub mod context;
pub mod permission;
pub mod role;
pub mod user;

pub use activity::ActivityService;
pub use context::RequestContext;
pub use permission::PermissionService;
pub use role::{RoleDetail, RoleService};
pub use user::{AdminUserService, NewUserRequest};

#[cfg(test)]
pub(crate) mod test_support;
