//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Authentication, token and role-name configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for JWT signing (HMAC-SHA256).
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Issuer claim written into and required from every token.
    #[serde(default = "default_issuer")]
    pub jwt_issuer: String,
    /// Validity window of a session token, in hours.
    #[serde(default = "default_token_ttl")]
    pub token_ttl_hours: u64,
    /// Minimum password length for new accounts.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
    /// Minimum zxcvbn score (0-4) for new passwords.
    #[serde(default = "default_password_score")]
    pub password_min_score: u8,
    /// Name of the administrative role.
    #[serde(default = "default_admin_role")]
    pub admin_role: String,
    /// Name of the manager role.
    #[serde(default = "default_manager_role")]
    pub manager_role: String,
    /// Permission required to browse the user directory.
    #[serde(default = "default_directory_permission")]
    pub user_directory_permission: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            jwt_issuer: default_issuer(),
            token_ttl_hours: default_token_ttl(),
            password_min_length: default_password_min(),
            password_min_score: default_password_score(),
            admin_role: default_admin_role(),
            manager_role: default_manager_role(),
            user_directory_permission: default_directory_permission(),
        }
    }
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_issuer() -> String {
    "warden".to_string()
}

fn default_token_ttl() -> u64 {
    24
}

fn default_password_min() -> usize {
    8
}

fn default_password_score() -> u8 {
    3
}

fn default_admin_role() -> String {
    "ADMIN".to_string()
}

fn default_manager_role() -> String {
    "MANAGER".to_string()
}

fn default_directory_permission() -> String {
    "User Management".to_string()
}
