//! Role repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use warden_core::error::{AppError, ErrorKind};
use warden_core::result::AppResult;
use warden_core::types::pagination::{PageRequest, PageResponse};
use warden_entity::role::{CreateRole, Role, UpdateRole};

use super::{db_error, violated_constraint};
use crate::store::RoleStore;

/// Repository for roles.
#[derive(Debug, Clone)]
pub struct RoleRepository {
    pool: PgPool,
}

impl RoleRepository {
    /// Create a new role repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_name_conflict(e: sqlx::Error, name: &str, context: &'static str) -> AppError {
    match violated_constraint(&e) {
        Some("roles_name_key") => AppError::conflict(format!("Role '{name}' already exists"))
            .with_details(serde_json::json!({ "conflictField": "name" })),
        _ => AppError::with_source(ErrorKind::Database, context, e),
    }
}

#[async_trait]
impl RoleStore for RoleRepository {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Role>> {
        sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find role"))
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE LOWER(name) = LOWER($1)")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find role by name"))
    }

    async fn list(&self, page: &PageRequest) -> AppResult<PageResponse<Role>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM roles")
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to count roles"))?;

        let roles = sqlx::query_as::<_, Role>(
            "SELECT * FROM roles ORDER BY name ASC LIMIT $1 OFFSET $2",
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list roles"))?;

        Ok(PageResponse::new(roles, page, total as u64))
    }

    async fn create(&self, data: &CreateRole) -> AppResult<Role> {
        sqlx::query_as::<_, Role>(
            "INSERT INTO roles (name, description) VALUES ($1, $2) RETURNING *",
        )
        .bind(&data.name)
        .bind(&data.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_name_conflict(e, &data.name, "Failed to create role"))
    }

    async fn update(&self, id: i64, data: &UpdateRole) -> AppResult<Option<Role>> {
        sqlx::query_as::<_, Role>(
            "UPDATE roles SET name = COALESCE($2, name), \
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
            map_name_conflict(e, data.name.as_deref().unwrap_or_default(), "Failed to update role")
        })
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| match violated_constraint(&e) {
                Some("users_role_id_fkey") => {
                    AppError::conflict("Role is still assigned to one or more users")
                }
                _ => AppError::with_source(ErrorKind::Database, "Failed to delete role", e),
            })?;
        Ok(result.rows_affected() > 0)
    }
}
