//! Permission and role-permission association entities.

pub mod model;

pub use model::{CreatePermission, Permission, RolePermission, UpdatePermission};
