//! The role/permission graph: which roles hold which named permissions.

use std::sync::Arc;

use tracing::info;

use warden_core::error::AppError;
use warden_core::result::AppResult;
use warden_database::{PermissionStore, RoleStore};
use warden_entity::permission::{Permission, RolePermission};
use warden_entity::role::Role;

/// Flat role-to-permission mapping. There is no role hierarchy.
#[derive(Clone)]
pub struct PermissionGraph {
    roles: Arc<dyn RoleStore>,
    permissions: Arc<dyn PermissionStore>,
}

impl std::fmt::Debug for PermissionGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionGraph").finish_non_exhaustive()
    }
}

impl PermissionGraph {
    pub fn new(roles: Arc<dyn RoleStore>, permissions: Arc<dyn PermissionStore>) -> Self {
        Self { roles, permissions }
    }

    /// Whether `role_id` holds a permission named exactly `permission_name`.
    pub async fn has_permission(&self, role_id: i64, permission_name: &str) -> AppResult<bool> {
        self.permissions
            .role_has_permission(role_id, permission_name)
            .await
    }

    /// Attaches a permission to a role. Returns `false` if it was already attached.
    pub async fn assign(&self, role_id: i64, permission_id: i64) -> AppResult<bool> {
        let (role, permission) = self.resolve(role_id, permission_id).await?;
        let created = self.permissions.assign(role.id, permission.id).await?;
        if created {
            info!(role = %role.name, permission = %permission.name, "Permission assigned");
        }
        Ok(created)
    }

    /// Detaches a permission from a role. Returns `false` if it was not attached.
    pub async fn revoke(&self, role_id: i64, permission_id: i64) -> AppResult<bool> {
        let (role, permission) = self.resolve(role_id, permission_id).await?;
        let removed = self.permissions.revoke(role.id, permission.id).await?;
        if removed {
            info!(role = %role.name, permission = %permission.name, "Permission revoked");
        }
        Ok(removed)
    }

    /// Permissions attached to a role.
    pub async fn list_for_role(&self, role_id: i64) -> AppResult<Vec<Permission>> {
        self.require_role(role_id).await?;
        self.permissions.list_for_role(role_id).await
    }

    /// Every role-permission pair.
    pub async fn list_assignments(&self) -> AppResult<Vec<RolePermission>> {
        self.permissions.list_assignments().await
    }

    async fn require_role(&self, role_id: i64) -> AppResult<Role> {
        self.roles
            .find_by_id(role_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Role {role_id} not found")))
    }

    async fn resolve(&self, role_id: i64, permission_id: i64) -> AppResult<(Role, Permission)> {
        let role = self.require_role(role_id).await?;
        let permission = self
            .permissions
            .find_by_id(permission_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Permission {permission_id} not found")))?;
        Ok((role, permission))
    }
}
