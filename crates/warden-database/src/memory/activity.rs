use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use warden_core::error::AppError;
use warden_core::result::AppResult;
use warden_core::types::pagination::{PageRequest, PageResponse};
use warden_entity::activity::{ActivityFilter, ActivityLog, NewActivityLog};

use super::{MemoryStore, paginate};
use crate::store::ActivityStore;

#[async_trait]
impl ActivityStore for MemoryStore {
    async fn append(&self, entry: &NewActivityLog) -> AppResult<ActivityLog> {
        if self.activity_writes_fail() {
            return Err(AppError::database("activity log unavailable"));
        }
        let log = ActivityLog {
            id: Uuid::now_v7(),
            user_id: entry.user_id,
            activity_type: entry.activity_type,
            description: entry.description.clone(),
            ip_address: entry.ip_address.clone(),
            created_at: Utc::now(),
        };
        self.state.lock().await.activity.push(log.clone());
        Ok(log)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ActivityLog>> {
        let state = self.state.lock().await;
        Ok(state.activity.iter().find(|e| e.id == id).cloned())
    }

    async fn list(
        &self,
        filter: &ActivityFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ActivityLog>> {
        let state = self.state.lock().await;
        // Appended in time order; newest first means reverse.
        let items: Vec<ActivityLog> = state
            .activity
            .iter()
            .rev()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect();
        Ok(paginate(items, page))
    }

    async fn recent_for_user(&self, user_id: i64, limit: u32) -> AppResult<Vec<ActivityLog>> {
        let state = self.state.lock().await;
        Ok(state
            .activity
            .iter()
            .rev()
            .filter(|e| e.user_id == user_id)
            .take(limit as usize)
            .cloned()
            .collect())
    }
}
