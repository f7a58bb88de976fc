//! Session repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use warden_core::error::AppError;
use warden_core::result::AppResult;
use warden_entity::session::{ActiveSession, NewSession, Session};

use super::db_error;
use crate::store::SessionStore;

/// Repository for sessions.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    /// Create a new session repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for SessionRepository {
    async fn create_exclusive(&self, data: &NewSession) -> AppResult<Session> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin session transaction"))?;

        // Row lock on the owner serializes concurrent logins for one user.
        let owner: Option<i64> =
            sqlx::query_scalar("SELECT id FROM users WHERE id = $1 FOR UPDATE")
                .bind(data.user_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(db_error("Failed to lock session owner"))?;
        if owner.is_none() {
            return Err(AppError::not_found("User not found"));
        }

        let active: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sessions WHERE user_id = $1 AND expires_at > $2",
        )
        .bind(data.user_id)
        .bind(data.created_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_error("Failed to count active sessions"))?;
        if active > 0 {
            return Err(AppError::session_conflict(
                "An active session already exists. Please logout from other devices first.",
            ));
        }

        let session = sqlx::query_as::<_, Session>(
            "INSERT INTO sessions (id, user_id, token_hash, ip_address, user_agent, created_at, expires_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(data.id)
        .bind(data.user_id)
        .bind(&data.token_hash)
        .bind(&data.ip_address)
        .bind(&data.user_agent)
        .bind(data.created_at)
        .bind(data.expires_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_error("Failed to create session"))?;

        tx.commit()
            .await
            .map_err(db_error("Failed to commit session transaction"))?;
        Ok(session)
    }

    async fn find_active(
        &self,
        user_id: i64,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Session>> {
        sqlx::query_as::<_, Session>(
            "SELECT * FROM sessions \
             WHERE user_id = $1 AND token_hash = $2 AND expires_at > $3 \
             ORDER BY created_at DESC LIMIT 1",
        )
        .bind(user_id)
        .bind(token_hash)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to find session"))
    }

    async fn expire_by_token(
        &self,
        user_id: i64,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE sessions SET expires_at = $3 \
             WHERE user_id = $1 AND token_hash = $2 AND expires_at > $3",
        )
        .bind(user_id)
        .bind(token_hash)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to expire session"))?;
        Ok(result.rows_affected())
    }

    async fn expire_for_user(
        &self,
        user_id: i64,
        except_token_hash: Option<&str>,
        now: DateTime<Utc>,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE sessions SET expires_at = $2 \
             WHERE user_id = $1 AND expires_at > $2 \
               AND ($3::text IS NULL OR token_hash <> $3)",
        )
        .bind(user_id)
        .bind(now)
        .bind(except_token_hash)
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to expire user sessions"))?;
        Ok(result.rows_affected())
    }

    async fn list_active(&self, now: DateTime<Utc>) -> AppResult<Vec<ActiveSession>> {
        sqlx::query_as::<_, ActiveSession>(
            "SELECT s.id, s.user_id, u.username, u.email, s.ip_address, s.user_agent, \
                    s.created_at, s.expires_at \
             FROM sessions s JOIN users u ON u.id = s.user_id \
             WHERE s.expires_at > $1 \
             ORDER BY s.created_at DESC",
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list active sessions"))
    }

    async fn recent_for_user(&self, user_id: i64, limit: u32) -> AppResult<Vec<Session>> {
        sqlx::query_as::<_, Session>(
            "SELECT * FROM sessions WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2",
        )
        .bind(user_id)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list recent sessions"))
    }

    async fn delete_for_user(&self, user_id: i64) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete user sessions"))?;
        Ok(result.rows_affected())
    }
}
