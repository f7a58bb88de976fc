//! Permission and role-permission repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use warden_core::error::{AppError, ErrorKind};
use warden_core::result::AppResult;
use warden_core::types::pagination::{PageRequest, PageResponse};
use warden_entity::permission::{CreatePermission, Permission, RolePermission, UpdatePermission};

use super::{db_error, violated_constraint};
use crate::store::PermissionStore;

/// Repository for permissions and their role associations.
#[derive(Debug, Clone)]
pub struct PermissionRepository {
    pool: PgPool,
}

impl PermissionRepository {
    /// Create a new permission repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_name_conflict(e: sqlx::Error, name: &str, context: &'static str) -> AppError {
    match violated_constraint(&e) {
        Some("permissions_name_key") => {
            AppError::conflict(format!("Permission '{name}' already exists"))
                .with_details(serde_json::json!({ "conflictField": "name" }))
        }
        _ => AppError::with_source(ErrorKind::Database, context, e),
    }
}

#[async_trait]
impl PermissionStore for PermissionRepository {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Permission>> {
        sqlx::query_as::<_, Permission>("SELECT * FROM permissions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find permission"))
    }

    async fn list(&self, page: &PageRequest) -> AppResult<PageResponse<Permission>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM permissions")
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to count permissions"))?;

        let items = sqlx::query_as::<_, Permission>(
            "SELECT * FROM permissions ORDER BY name ASC LIMIT $1 OFFSET $2",
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list permissions"))?;

        Ok(PageResponse::new(items, page, total as u64))
    }

    async fn create(&self, data: &CreatePermission) -> AppResult<Permission> {
        sqlx::query_as::<_, Permission>(
            "INSERT INTO permissions (name, description) VALUES ($1, $2) RETURNING *",
        )
        .bind(&data.name)
        .bind(&data.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_name_conflict(e, &data.name, "Failed to create permission"))
    }

    async fn update(&self, id: i64, data: &UpdatePermission) -> AppResult<Option<Permission>> {
        sqlx::query_as::<_, Permission>(
            "UPDATE permissions SET name = COALESCE($2, name), \
                                    description = COALESCE($3, description), \
                                    updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.description)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            map_name_conflict(
                e,
                data.name.as_deref().unwrap_or_default(),
                "Failed to update permission",
            )
        })
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM permissions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete permission"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_for_role(&self, role_id: i64) -> AppResult<Vec<Permission>> {
        sqlx::query_as::<_, Permission>(
            "SELECT p.* FROM permissions p \
             JOIN role_permissions rp ON rp.permission_id = p.id \
             WHERE rp.role_id = $1 ORDER BY p.name ASC",
        )
        .bind(role_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list role permissions"))
    }

    async fn role_has_permission(&self, role_id: i64, permission_name: &str) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS ( \
                SELECT 1 FROM role_permissions rp \
                JOIN permissions p ON p.id = rp.permission_id \
                WHERE rp.role_id = $1 AND p.name = $2 \
             )",
        )
        .bind(role_id)
        .bind(permission_name)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to check role permission"))
    }

    async fn assign(&self, role_id: i64, permission_id: i64) -> AppResult<bool> {
        let result = sqlx::query(
            "INSERT INTO role_permissions (role_id, permission_id) VALUES ($1, $2) \
             ON CONFLICT (role_id, permission_id) DO NOTHING",
        )
        .bind(role_id)
        .bind(permission_id)
        .execute(&self.pool)
        .await
        .map_err(|e| match violated_constraint(&e) {
            Some("role_permissions_role_id_fkey") => AppError::not_found("Role not found"),
            Some("role_permissions_permission_id_fkey") => {
                AppError::not_found("Permission not found")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to assign permission", e),
        })?;
        Ok(result.rows_affected() > 0)
    }

    async fn revoke(&self, role_id: i64, permission_id: i64) -> AppResult<bool> {
        let result =
            sqlx::query("DELETE FROM role_permissions WHERE role_id = $1 AND permission_id = $2")
                .bind(role_id)
                .bind(permission_id)
                .execute(&self.pool)
                .await
                .map_err(db_error("Failed to revoke permission"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_assignments(&self) -> AppResult<Vec<RolePermission>> {
        sqlx::query_as::<_, RolePermission>(
            "SELECT rp.role_id, r.name AS role_name, rp.permission_id, \
                    p.name AS permission_name, rp.created_at \
             FROM role_permissions rp \
             JOIN roles r ON r.id = rp.role_id \
             JOIN permissions p ON p.id = rp.permission_id \
             ORDER BY r.name ASC, p.name ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list role permissions"))
    }
}
