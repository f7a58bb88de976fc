//! JWT claims structure embedded in every session token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AuthFailure;

/// JWT claims payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the decimal user ID. Registered claims are strings.
    pub sub: String,
    /// Session ID this token was issued for.
    pub sid: Uuid,
    /// Role name at issuance. Informational; authorization reads the live role.
    pub role: String,
    /// Email at issuance.
    pub email: String,
    /// Issuer.
    pub iss: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Unique token ID, so two tokens issued in the same second differ.
    pub jti: Uuid,
}

impl Claims {
    /// Parses the user ID out of the subject claim.
    pub fn user_id(&self) -> Result<i64, AuthFailure> {
        self.sub.parse().map_err(|_| AuthFailure::InvalidToken)
    }

    /// Returns the session ID.
    pub fn session_id(&self) -> Uuid {
        self.sid
    }

    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }
}
