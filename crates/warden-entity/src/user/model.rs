//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use warden_core::types::SortDirection;

/// An account in the admin application.
///
/// Rows are loaded joined with their role so `role_name` is always
/// populated. Users are never hard-deleted; `is_active` is cleared instead.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user identifier.
    pub id: i64,
    /// Unique login name.
    pub username: String,
    /// Unique email address, used as the login identifier.
    pub email: String,
    /// Argon2 password hash.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Whether the account may authenticate.
    pub is_active: bool,
    /// Last successful login.
    pub last_login: Option<DateTime<Utc>>,
    /// The single role held by this user.
    pub role_id: i64,
    /// Name of the role, resolved at load time.
    pub role_name: String,
    /// Relative path of the profile image, if any.
    pub profile_image: Option<String>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Display name built from first and last name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Case-insensitive role name comparison.
    pub fn has_role(&self, role: &str) -> bool {
        self.role_name.eq_ignore_ascii_case(role)
    }
}

/// Data required to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Desired username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Pre-hashed password.
    pub password_hash: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Role to assign.
    pub role_id: i64,
}

/// Partial profile update. `None` leaves the column unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUser {
    /// New given name.
    pub first_name: Option<String>,
    /// New family name.
    pub last_name: Option<String>,
    /// New active flag.
    pub is_active: Option<bool>,
}

impl UpdateUser {
    /// Whether the update changes anything.
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.is_active.is_none()
    }
}

/// Column a user listing may be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserSortField {
    /// Creation time.
    #[default]
    CreatedAt,
    /// Username.
    Username,
    /// Email address.
    Email,
    /// Last login time.
    LastLogin,
}

impl UserSortField {
    /// The qualified SQL column for this field.
    pub fn as_column(&self) -> &'static str {
        match self {
            Self::CreatedAt => "u.created_at",
            Self::Username => "u.username",
            Self::Email => "u.email",
            Self::LastLogin => "u.last_login",
        }
    }
}

/// Filters for listing users.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserFilter {
    /// Case-insensitive substring over username, email and names.
    pub search: Option<String>,
    /// Restrict to active or inactive accounts.
    pub is_active: Option<bool>,
    /// Ordering column.
    pub sort_by: UserSortField,
    /// Ordering direction.
    pub direction: SortDirection,
}

impl UserFilter {
    /// Whether `user` passes the search and activity filters.
    pub fn matches(&self, user: &User) -> bool {
        if let Some(active) = self.is_active {
            if user.is_active != active {
                return false;
            }
        }
        match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => {
                let term = term.to_lowercase();
                [
                    &user.username,
                    &user.email,
                    &user.first_name,
                    &user.last_name,
                ]
                .iter()
                .any(|field| field.to_lowercase().contains(&term))
            }
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> User {
        let now = Utc::now();
        User {
            id: 7,
            username: "jdoe".to_string(),
            email: "jdoe@example.com".to_string(),
            password_hash: "hash".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            is_active: true,
            last_login: None,
            role_id: 2,
            role_name: "Sales".to_string(),
            profile_image: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_password_never_serialized() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["roleName"], "Sales");
    }

    #[test]
    fn test_role_match_ignores_case() {
        assert!(sample().has_role("sales"));
        assert!(!sample().has_role("admin"));
    }

    #[test]
    fn test_filter_matches() {
        let user = sample();
        let filter = UserFilter {
            search: Some("DOE".to_string()),
            is_active: Some(true),
            ..Default::default()
        };
        assert!(filter.matches(&user));

        let inactive_only = UserFilter {
            is_active: Some(false),
            ..Default::default()
        };
        assert!(!inactive_only.matches(&user));
    }
}
