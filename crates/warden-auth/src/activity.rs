//! Best-effort activity recording.

use std::sync::Arc;

use tracing::{debug, warn};

use warden_database::ActivityStore;
use warden_entity::activity::{ActivityType, NewActivityLog};

/// Appends activity entries without ever failing the caller.
#[derive(Clone)]
pub struct ActivityRecorder {
    store: Arc<dyn ActivityStore>,
}

impl std::fmt::Debug for ActivityRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivityRecorder").finish_non_exhaustive()
    }
}

impl ActivityRecorder {
    /// Creates a recorder writing to `store`.
    pub fn new(store: Arc<dyn ActivityStore>) -> Self {
        Self { store }
    }

    /// Appends an entry. A storage failure is logged and dropped.
    pub async fn record(
        &self,
        user_id: i64,
        activity_type: ActivityType,
        description: impl Into<String>,
        ip_address: Option<&str>,
    ) {
        let entry = NewActivityLog {
            user_id,
            activity_type,
            description: description.into(),
            ip_address: ip_address.map(str::to_owned),
        };

        match self.store.append(&entry).await {
            Ok(log) => {
                debug!(user_id, activity = %activity_type, log_id = %log.id, "Activity recorded");
            }
            Err(e) => {
                warn!(user_id, activity = %activity_type, error = %e, "Failed to record activity");
            }
        }
    }
}
