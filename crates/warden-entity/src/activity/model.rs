//! Activity log entry model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::kind::ActivityType;

/// An immutable audit record.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLog {
    /// Unique entry identifier.
    pub id: Uuid,
    /// Actor or subject of the event.
    pub user_id: i64,
    /// Event tag.
    pub activity_type: ActivityType,
    /// Human-readable description.
    pub description: String,
    /// Client address, when known.
    pub ip_address: Option<String>,
    /// When the event was recorded.
    pub created_at: DateTime<Utc>,
}

/// Data required to append an entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewActivityLog {
    /// Actor or subject of the event.
    pub user_id: i64,
    /// Event tag.
    pub activity_type: ActivityType,
    /// Human-readable description.
    pub description: String,
    /// Client address, when known.
    pub ip_address: Option<String>,
}

/// Filters for listing entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActivityFilter {
    /// Only entries for this user.
    pub user_id: Option<i64>,
    /// Only entries with this tag.
    pub activity_type: Option<ActivityType>,
}

impl ActivityFilter {
    /// Whether `entry` passes the filter.
    pub fn matches(&self, entry: &ActivityLog) -> bool {
        self.user_id.is_none_or(|id| entry.user_id == id)
            && self
                .activity_type
                .is_none_or(|kind| entry.activity_type == kind)
    }
}
