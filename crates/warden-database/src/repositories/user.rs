//! User repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use warden_core::error::{AppError, ErrorKind};
use warden_core::result::AppResult;
use warden_core::types::pagination::{PageRequest, PageResponse};
use warden_entity::user::{CreateUser, UpdateUser, User, UserFilter};

use super::{db_error, like_pattern, violated_constraint};
use crate::store::UserStore;

/// Columns of a user row joined with its role name, read from alias `u`.
const USER_COLUMNS: &str = "u.id, u.username, u.email, u.password_hash, u.first_name, \
    u.last_name, u.is_active, u.last_login, u.role_id, r.name AS role_name, \
    u.profile_image, u.created_at, u.updated_at";

/// Repository for user queries.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn map_write_error(e: sqlx::Error, username: &str) -> AppError {
        match violated_constraint(&e) {
            Some("users_username_key") => {
                AppError::conflict(format!("Username '{username}' already exists"))
                    .with_details(serde_json::json!({ "conflictField": "username" }))
            }
            Some("users_email_key") => AppError::conflict("Email already in use")
                .with_details(serde_json::json!({ "conflictField": "email" })),
            Some("users_role_id_fkey") => AppError::not_found("Role not found"),
            _ => AppError::with_source(ErrorKind::Database, "Failed to write user", e),
        }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users u JOIN roles r ON r.id = u.role_id WHERE u.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to find user by id"))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users u JOIN roles r ON r.id = u.role_id \
             WHERE LOWER(u.email) = LOWER($1)"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to find user by email"))
    }

    async fn list(&self, filter: &UserFilter, page: &PageRequest) -> AppResult<PageResponse<User>> {
        let pattern = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(like_pattern);
        let predicate = "($1::text IS NULL OR u.username ILIKE $1 OR u.email ILIKE $1 \
             OR u.first_name ILIKE $1 OR u.last_name ILIKE $1) \
             AND ($2::boolean IS NULL OR u.is_active = $2)";

        let total: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM users u WHERE {predicate}"))
                .bind(&pattern)
                .bind(filter.is_active)
                .fetch_one(&self.pool)
                .await
                .map_err(db_error("Failed to count users"))?;

        // Column and direction come from closed enums, never from raw input.
        let direction = filter.direction.as_sql();
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users u JOIN roles r ON r.id = u.role_id \
             WHERE {predicate} \
             ORDER BY {column} {direction} NULLS LAST, u.id {direction} \
             LIMIT $3 OFFSET $4",
            column = filter.sort_by.as_column(),
        ))
        .bind(&pattern)
        .bind(filter.is_active)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list users"))?;

        Ok(PageResponse::new(users, page, total as u64))
    }

    async fn create(&self, data: &CreateUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(&format!(
            "WITH u AS ( \
                INSERT INTO users (username, email, password_hash, first_name, last_name, role_id) \
                VALUES ($1, $2, $3, $4, $5, $6) RETURNING * \
             ) SELECT {USER_COLUMNS} FROM u JOIN roles r ON r.id = u.role_id"
        ))
        .bind(&data.username)
        .bind(&data.email)
        .bind(&data.password_hash)
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(data.role_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| Self::map_write_error(e, &data.username))
    }

    async fn update_profile(&self, id: i64, data: &UpdateUser) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            "WITH u AS ( \
                UPDATE users SET first_name = COALESCE($2, first_name), \
                                 last_name = COALESCE($3, last_name), \
                                 is_active = COALESCE($4, is_active), \
                                 updated_at = NOW() \
                WHERE id = $1 RETURNING * \
             ) SELECT {USER_COLUMNS} FROM u JOIN roles r ON r.id = u.role_id"
        ))
        .bind(id)
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(data.is_active)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to update user"))
    }

    async fn set_role(&self, id: i64, role_id: i64) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            "WITH u AS ( \
                UPDATE users SET role_id = $2, updated_at = NOW() WHERE id = $1 RETURNING * \
             ) SELECT {USER_COLUMNS} FROM u JOIN roles r ON r.id = u.role_id"
        ))
        .bind(id)
        .bind(role_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| match violated_constraint(&e) {
            Some("users_role_id_fkey") => AppError::not_found("Role not found"),
            _ => AppError::with_source(ErrorKind::Database, "Failed to update user role", e),
        })
    }

    async fn set_active(&self, id: i64, active: bool) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            "WITH u AS ( \
                UPDATE users SET is_active = $2, updated_at = NOW() WHERE id = $1 RETURNING * \
             ) SELECT {USER_COLUMNS} FROM u JOIN roles r ON r.id = u.role_id"
        ))
        .bind(id)
        .bind(active)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to update user status"))
    }

    async fn touch_last_login(&self, id: i64, at: DateTime<Utc>) -> AppResult<()> {
        sqlx::query("UPDATE users SET last_login = $2 WHERE id = $1")
            .bind(id)
            .bind(at)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to update last login"))?;
        Ok(())
    }

    async fn count_by_role(&self, role_id: i64) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role_id = $1")
            .bind(role_id)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to count users by role"))?;
        Ok(count as u64)
    }
}
