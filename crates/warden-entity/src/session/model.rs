//! Session entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One authenticated device or browser.
///
/// A session is active iff `expires_at` lies in the future. Logout and
/// termination move `expires_at` to the present instead of deleting the row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Unique session identifier.
    pub id: Uuid,
    /// Owner of the session.
    pub user_id: i64,
    /// SHA-256 hex digest of the bearer token.
    #[serde(skip_serializing, default)]
    pub token_hash: String,
    /// Client address at login.
    pub ip_address: Option<String>,
    /// User-Agent header at login.
    pub user_agent: Option<String>,
    /// Login time.
    pub created_at: DateTime<Utc>,
    /// End of validity.
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Whether the session is active at `now`.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }

    /// Whether the session is active right now.
    pub fn is_active(&self) -> bool {
        self.is_active_at(Utc::now())
    }
}

/// Data required to insert a session.
#[derive(Debug, Clone)]
pub struct NewSession {
    /// Pre-generated identifier (also embedded in the token).
    pub id: Uuid,
    /// Owner.
    pub user_id: i64,
    /// Digest of the issued token.
    pub token_hash: String,
    /// Client address.
    pub ip_address: Option<String>,
    /// Client user agent.
    pub user_agent: Option<String>,
    /// Login time.
    pub created_at: DateTime<Utc>,
    /// End of validity.
    pub expires_at: DateTime<Utc>,
}

/// An active session joined with its owner, for the administrative view.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ActiveSession {
    /// Session identifier.
    pub id: Uuid,
    /// Owner.
    pub user_id: i64,
    /// Owner's username.
    pub username: String,
    /// Owner's email.
    pub email: String,
    /// Client address.
    pub ip_address: Option<String>,
    /// Client user agent.
    pub user_agent: Option<String>,
    /// Login time.
    pub created_at: DateTime<Utc>,
    /// End of validity.
    pub expires_at: DateTime<Utc>,
}
