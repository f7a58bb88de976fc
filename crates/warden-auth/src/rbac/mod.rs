//! Role-based access control over stored roles and permissions.

pub mod graph;

pub use graph::PermissionGraph;
