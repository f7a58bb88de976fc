//! Role CRUD.

use serde::Serialize;
use tracing::info;

use warden_auth::{ActivityRecorder, PermissionGraph};
use warden_core::error::AppError;
use warden_core::result::AppResult;
use warden_core::types::pagination::{PageRequest, PageResponse};
use warden_database::Stores;
use warden_entity::activity::ActivityType;
use warden_entity::permission::Permission;
use warden_entity::role::{CreateRole, Role, UpdateRole};

use crate::context::RequestContext;

/// A role together with its attached permissions.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleDetail {
    #[serde(flatten)]
    pub role: Role,
    pub permissions: Vec<Permission>,
}

/// Manages roles.
#[derive(Debug, Clone)]
pub struct RoleService {
    stores: Stores,
    graph: PermissionGraph,
    activity: ActivityRecorder,
}

impl RoleService {
    pub fn new(stores: Stores, graph: PermissionGraph) -> Self {
        Self {
            activity: ActivityRecorder::new(stores.activity.clone()),
            stores,
            graph,
        }
    }

    /// Creates a role. A duplicate name is a conflict.
    pub async fn create(&self, ctx: &RequestContext, data: CreateRole) -> AppResult<Role> {
        let role = self.stores.roles.create(&data).await?;
        self.activity
            .record(
                ctx.user_id(),
                ActivityType::RoleCreated,
                format!("Created role {}", role.name),
                ctx.ip(),
            )
            .await;
        info!(actor_id = ctx.user_id(), role_id = role.id, name = %role.name, "Role created");
        Ok(role)
    }

    /// Lists roles ordered by name.
    pub async fn list(&self, page: &PageRequest) -> AppResult<PageResponse<Role>> {
        self.stores.roles.list(&page.normalized()).await
    }

    /// Gets a role with its permissions.
    pub async fn get(&self, role_id: i64) -> AppResult<RoleDetail> {
        let role = self.require(role_id).await?;
        let permissions = self.graph.list_for_role(role.id).await?;
        Ok(RoleDetail { role, permissions })
    }

    /// Permissions attached to a role.
    pub async fn permissions(&self, role_id: i64) -> AppResult<Vec<Permission>> {
        self.graph.list_for_role(role_id).await
    }

    /// Renames a role and/or changes its description.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        role_id: i64,
        data: UpdateRole,
    ) -> AppResult<Role> {
        let role = self
            .stores
            .roles
            .update(role_id, &data)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Role {role_id} not found")))?;
        self.activity
            .record(
                ctx.user_id(),
                ActivityType::RoleUpdated,
                format!("Updated role {}", role.name),
                ctx.ip(),
            )
            .await;
        Ok(role)
    }

    /// Deletes a role that no user holds.
    pub async fn delete(&self, ctx: &RequestContext, role_id: i64) -> AppResult<()> {
        let role = self.require(role_id).await?;
        let holders = self.stores.users.count_by_role(role.id).await?;
        if holders > 0 {
            return Err(AppError::conflict(format!(
                "Role {} is assigned to {holders} user(s)",
                role.name
            )));
        }

        if !self.stores.roles.delete(role.id).await? {
            return Err(AppError::not_found(format!("Role {role_id} not found")));
        }
        self.activity
            .record(
                ctx.user_id(),
                ActivityType::RoleDeleted,
                format!("Deleted role {}", role.name),
                ctx.ip(),
            )
            .await;
        info!(actor_id = ctx.user_id(), role_id, "Role deleted");
        Ok(())
    }

    async fn require(&self, role_id: i64) -> AppResult<Role> {
        self.stores
            .roles
            .find_by_id(role_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Role {role_id} not found")))
    }
}

#[cfg(test)]
mod tests {
    use warden_core::error::ErrorKind;

    use super::*;
    use crate::test_support::Harness;

    #[tokio::test]
    async fn test_role_lifecycle() {
        let h = Harness::new().await;
        let service = h.roles();

        let role = service
            .create(
                &h.admin_ctx,
                CreateRole {
                    name: "Auditor".to_string(),
                    description: Some("Read-only".to_string()),
                },
            )
            .await
            .unwrap();

        let dup = service
            .create(
                &h.admin_ctx,
                CreateRole {
                    name: "Auditor".to_string(),
                    description: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(dup.kind, ErrorKind::Conflict);

        let renamed = service
            .update(
                &h.admin_ctx,
                role.id,
                UpdateRole {
                    name: Some("Reviewer".to_string()),
                    description: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.name, "Reviewer");
        assert_eq!(renamed.description.as_deref(), Some("Read-only"));

        let detail = service.get(role.id).await.unwrap();
        assert!(detail.permissions.is_empty());

        service.delete(&h.admin_ctx, role.id).await.unwrap();
        assert_eq!(
            service.get(role.id).await.unwrap_err().kind,
            ErrorKind::NotFound
        );
    }

    #[tokio::test]
    async fn test_delete_refused_while_held() {
        let h = Harness::new().await;
        h.logged_in("holder", "Sales").await;
        let role = h.role("Sales").await;

        let err = h.roles().delete(&h.admin_ctx, role.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }
}
