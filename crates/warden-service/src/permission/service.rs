//! Permission CRUD and role-permission assignment.

use tracing::info;

use warden_auth::{ActivityRecorder, PermissionGraph};
use warden_core::error::AppError;
use warden_core::result::AppResult;
use warden_core::types::pagination::{PageRequest, PageResponse};
use warden_database::Stores;
use warden_entity::activity::ActivityType;
use warden_entity::permission::{CreatePermission, Permission, RolePermission, UpdatePermission};

use crate::context::RequestContext;

/// Manages permissions and their attachment to roles.
#[derive(Debug, Clone)]
pub struct PermissionService {
    stores: Stores,
    graph: PermissionGraph,
    activity: ActivityRecorder,
}

impl PermissionService {
    pub fn new(stores: Stores, graph: PermissionGraph) -> Self {
        Self {
            activity: ActivityRecorder::new(stores.activity.clone()),
            stores,
            graph,
        }
    }

    /// Creates a permission. A duplicate name is a conflict.
    pub async fn create(&self, ctx: &RequestContext, data: CreatePermission) -> AppResult<Permission> {
        let permission = self.stores.permissions.create(&data).await?;
        self.activity
            .record(
                ctx.user_id(),
                ActivityType::PermissionCreated,
                format!("Created permission {}", permission.name),
                ctx.ip(),
            )
            .await;
        info!(actor_id = ctx.user_id(), permission_id = permission.id, "Permission created");
        Ok(permission)
    }

    pub async fn list(&self, page: &PageRequest) -> AppResult<PageResponse<Permission>> {
        self.stores.permissions.list(&page.normalized()).await
    }

    pub async fn get(&self, permission_id: i64) -> AppResult<Permission> {
        self.stores
            .permissions
            .find_by_id(permission_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Permission {permission_id} not found")))
    }

    pub async fn update(
        &self,
        ctx: &RequestContext,
        permission_id: i64,
        data: UpdatePermission,
    ) -> AppResult<Permission> {
        let permission = self
            .stores
            .permissions
            .update(permission_id, &data)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Permission {permission_id} not found")))?;
        self.activity
            .record(
                ctx.user_id(),
                ActivityType::PermissionUpdated,
                format!("Updated permission {}", permission.name),
                ctx.ip(),
            )
            .await;
        Ok(permission)
    }

    /// Deletes a permission and detaches it from every role.
    pub async fn delete(&self, ctx: &RequestContext, permission_id: i64) -> AppResult<()> {
        let permission = self.get(permission_id).await?;
        if !self.stores.permissions.delete(permission.id).await? {
            return Err(AppError::not_found(format!("Permission {permission_id} not found")));
        }
        self.activity
            .record(
                ctx.user_id(),
                ActivityType::PermissionDeleted,
                format!("Deleted permission {}", permission.name),
                ctx.ip(),
            )
            .await;
        info!(actor_id = ctx.user_id(), permission_id, "Permission deleted");
        Ok(())
    }

    /// Attaches a permission to a role. Returns `false` if it already was.
    pub async fn assign(
        &self,
        ctx: &RequestContext,
        role_id: i64,
        permission_id: i64,
    ) -> AppResult<bool> {
        let created = self.graph.assign(role_id, permission_id).await?;
        if created {
            self.activity
                .record(
                    ctx.user_id(),
                    ActivityType::PermissionAssigned,
                    format!("Assigned permission {permission_id} to role {role_id}"),
                    ctx.ip(),
                )
                .await;
        }
        Ok(created)
    }

    /// Detaches a permission from a role. Returns `false` if it was not attached.
    pub async fn revoke(
        &self,
        ctx: &RequestContext,
        role_id: i64,
        permission_id: i64,
    ) -> AppResult<bool> {
        let removed = self.graph.revoke(role_id, permission_id).await?;
        if removed {
            self.activity
                .record(
                    ctx.user_id(),
                    ActivityType::PermissionRevoked,
                    format!("Revoked permission {permission_id} from role {role_id}"),
                    ctx.ip(),
                )
                .await;
        }
        Ok(removed)
    }

    pub async fn list_assignments(&self) -> AppResult<Vec<RolePermission>> {
        self.graph.list_assignments().await
    }
}

#[cfg(test)]
mod tests {
    use warden_core::error::ErrorKind;

    use super::*;
    use crate::test_support::Harness;

    fn new_permission(name: &str) -> CreatePermission {
        CreatePermission {
            name: name.to_string(),
            description: None,
        }
    }

    #[tokio::test]
    async fn test_assign_revoke_through_service() {
        let h = Harness::new().await;
        let service = h.permissions();
        let role = h.role("Sales").await;
        let perm = service
            .create(&h.admin_ctx, new_permission("Reports"))
            .await
            .unwrap();

        assert!(service.assign(&h.admin_ctx, role.id, perm.id).await.unwrap());
        assert!(!service.assign(&h.admin_ctx, role.id, perm.id).await.unwrap());

        let pairs = service.list_assignments().await.unwrap();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].permission_name, "Reports");
        assert_eq!(pairs[0].role_name, "Sales");

        assert!(service.revoke(&h.admin_ctx, role.id, perm.id).await.unwrap());
        assert!(service.list_assignments().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_cascades_assignments() {
        let h = Harness::new().await;
        let service = h.permissions();
        let role = h.role("Sales").await;
        let perm = service
            .create(&h.admin_ctx, new_permission("Exports"))
            .await
            .unwrap();
        service.assign(&h.admin_ctx, role.id, perm.id).await.unwrap();

        service.delete(&h.admin_ctx, perm.id).await.unwrap();
        assert!(service.list_assignments().await.unwrap().is_empty());
        assert_eq!(
            service.get(perm.id).await.unwrap_err().kind,
            ErrorKind::NotFound
        );
    }

    #[tokio::test]
    async fn test_duplicate_name_conflicts() {
        let h = Harness::new().await;
        let service = h.permissions();
        service
            .create(&h.admin_ctx, new_permission("Billing"))
            .await
            .unwrap();
        let err = service
            .create(&h.admin_ctx, new_permission("Billing"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }
}
