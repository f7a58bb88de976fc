//! Permission entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A named capability, for example `"User Management"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    /// Unique permission identifier.
    pub id: i64,
    /// Unique permission name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// When the permission was created.
    pub created_at: DateTime<Utc>,
    /// When the permission was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a permission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePermission {
    /// Permission name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
}

/// Partial permission update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePermission {
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
}

/// One (role, permission) pair, joined with both names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RolePermission {
    /// Role side of the pair.
    pub role_id: i64,
    /// Role name.
    pub role_name: String,
    /// Permission side of the pair.
    pub permission_id: i64,
    /// Permission name.
    pub permission_name: String,
    /// When the association was created.
    pub created_at: DateTime<Utc>,
}
