//! Activity log repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use warden_core::result::AppResult;
use warden_core::types::pagination::{PageRequest, PageResponse};
use warden_entity::activity::{ActivityFilter, ActivityLog, NewActivityLog};

use super::db_error;
use crate::store::ActivityStore;

/// Repository for the append-only activity log.
#[derive(Debug, Clone)]
pub struct ActivityLogRepository {
    pool: PgPool,
}

impl ActivityLogRepository {
    /// Create a new activity log repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActivityStore for ActivityLogRepository {
    async fn append(&self, entry: &NewActivityLog) -> AppResult<ActivityLog> {
        sqlx::query_as::<_, ActivityLog>(
            "INSERT INTO activity_logs (id, user_id, activity_type, description, ip_address) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(entry.user_id)
        .bind(entry.activity_type)
        .bind(&entry.description)
        .bind(&entry.ip_address)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to append activity log"))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ActivityLog>> {
        sqlx::query_as::<_, ActivityLog>("SELECT * FROM activity_logs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find activity log"))
    }

    async fn list(
        &self,
        filter: &ActivityFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ActivityLog>> {
        let kind = filter.activity_type.map(|k| k.as_str());

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM activity_logs \
             WHERE ($1::bigint IS NULL OR user_id = $1) \
               AND ($2::text IS NULL OR activity_type = $2)",
        )
        .bind(filter.user_id)
        .bind(kind)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to count activity logs"))?;

        let items = sqlx::query_as::<_, ActivityLog>(
            "SELECT * FROM activity_logs \
             WHERE ($1::bigint IS NULL OR user_id = $1) \
               AND ($2::text IS NULL OR activity_type = $2) \
             ORDER BY created_at DESC, id DESC LIMIT $3 OFFSET $4",
        )
        .bind(filter.user_id)
        .bind(kind)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list activity logs"))?;

        Ok(PageResponse::new(items, page, total as u64))
    }

    async fn recent_for_user(&self, user_id: i64, limit: u32) -> AppResult<Vec<ActivityLog>> {
        sqlx::query_as::<_, ActivityLog>(
            "SELECT * FROM activity_logs WHERE user_id = $1 \
             ORDER BY created_at DESC, id DESC LIMIT $2",
        )
        .bind(user_id)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list recent activity"))
    }
}
