//! Read access to the activity log.

use std::sync::Arc;

use uuid::Uuid;

use warden_core::error::AppError;
use warden_core::result::AppResult;
use warden_core::types::pagination::{PageRequest, PageResponse};
use warden_database::ActivityStore;
use warden_entity::activity::{ActivityFilter, ActivityLog};

/// Lists and fetches activity entries. There is no write path here.
#[derive(Clone)]
pub struct ActivityService {
    store: Arc<dyn ActivityStore>,
}

impl std::fmt::Debug for ActivityService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivityService").finish_non_exhaustive()
    }
}

impl ActivityService {
    pub fn new(store: Arc<dyn ActivityStore>) -> Self {
        Self { store }
    }

    /// Entries matching `filter`, newest first.
    pub async fn list(
        &self,
        filter: &ActivityFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ActivityLog>> {
        self.store.list(filter, &page.normalized()).await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<ActivityLog> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Activity log not found"))
    }
}
