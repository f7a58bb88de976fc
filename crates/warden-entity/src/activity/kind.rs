//! Activity type enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tag recorded with every activity log entry. Stored as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityType {
    /// Successful login.
    LoginSuccess,
    /// Rejected login for a known account.
    LoginFailed,
    /// Session ended by its owner.
    Logout,
    /// A profile was viewed.
    ProfileAccess,
    /// A profile was edited.
    ProfileUpdate,
    /// A user's role was reassigned.
    RoleUpdate,
    /// A user's active flag was flipped.
    UserStatusToggle,
    /// A user was created.
    UserCreated,
    /// A user was deactivated.
    UserDeactivated,
    /// An administrator expired a user's sessions.
    TerminateUserSessions,
    /// An administrator deleted a user's session rows.
    DeleteUserSessions,
    /// A permission was attached to a role.
    PermissionAssigned,
    /// A permission was detached from a role.
    PermissionRevoked,
    /// A role was created.
    RoleCreated,
    /// A role was renamed or re-described.
    RoleUpdated,
    /// A role was deleted.
    RoleDeleted,
    /// A permission was created.
    PermissionCreated,
    /// A permission was renamed or re-described.
    PermissionUpdated,
    /// A permission was deleted.
    PermissionDeleted,
    /// Mail settings were edited (legacy rows).
    SmtpDetailsUpdated,
}

impl ActivityType {
    /// All variants, in declaration order.
    pub const ALL: [ActivityType; 20] = [
        Self::LoginSuccess,
        Self::LoginFailed,
        Self::Logout,
        Self::ProfileAccess,
        Self::ProfileUpdate,
        Self::RoleUpdate,
        Self::UserStatusToggle,
        Self::UserCreated,
        Self::UserDeactivated,
        Self::TerminateUserSessions,
        Self::DeleteUserSessions,
        Self::PermissionAssigned,
        Self::PermissionRevoked,
        Self::RoleCreated,
        Self::RoleUpdated,
        Self::RoleDeleted,
        Self::PermissionCreated,
        Self::PermissionUpdated,
        Self::PermissionDeleted,
        Self::SmtpDetailsUpdated,
    ];

    /// The stored tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LoginSuccess => "LOGIN_SUCCESS",
            Self::LoginFailed => "LOGIN_FAILED",
            Self::Logout => "LOGOUT",
            Self::ProfileAccess => "PROFILE_ACCESS",
            Self::ProfileUpdate => "PROFILE_UPDATE",
            Self::RoleUpdate => "ROLE_UPDATE",
            Self::UserStatusToggle => "USER_STATUS_TOGGLE",
            Self::UserCreated => "USER_CREATED",
            Self::UserDeactivated => "USER_DEACTIVATED",
            Self::TerminateUserSessions => "TERMINATE_USER_SESSIONS",
            Self::DeleteUserSessions => "DELETE_USER_SESSIONS",
            Self::PermissionAssigned => "PERMISSION_ASSIGNED",
            Self::PermissionRevoked => "PERMISSION_REVOKED",
            Self::RoleCreated => "ROLE_CREATED",
            Self::RoleUpdated => "ROLE_UPDATED",
            Self::RoleDeleted => "ROLE_DELETED",
            Self::PermissionCreated => "PERMISSION_CREATED",
            Self::PermissionUpdated => "PERMISSION_UPDATED",
            Self::PermissionDeleted => "PERMISSION_DELETED",
            Self::SmtpDetailsUpdated => "SMTP_DETAILS_UPDATED",
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityType {
    type Err = warden_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| {
                warden_core::AppError::validation(format!("Invalid activity type: '{s}'"))
            })
    }
}
