//! The authenticated caller.

use serde::Serialize;
use uuid::Uuid;

/// Identity established by a successful token validation.
///
/// `role_name` comes from the live user record, not from the token.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub user_id: i64,
    pub role_id: i64,
    pub role_name: String,
    pub username: String,
    pub email: String,
    pub session_id: Uuid,
    #[serde(skip)]
    pub token_hash: String,
}

impl Principal {
    /// Case-insensitive role name comparison.
    pub fn has_role(&self, role: &str) -> bool {
        self.role_name.eq_ignore_ascii_case(role)
    }

    /// Whether the role matches any name in `allowed`.
    pub fn has_any_role<S: AsRef<str>>(&self, allowed: &[S]) -> bool {
        allowed.iter().any(|r| self.has_role(r.as_ref()))
    }
}
