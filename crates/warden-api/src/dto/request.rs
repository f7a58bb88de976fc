//! Request DTOs with validation.

use serde::Deserialize;
use validator::{Validate, ValidationError};

use warden_core::types::{PageRequest, SortDirection};
use warden_core::types::pagination::DEFAULT_PAGE_SIZE;
use warden_entity::permission::{CreatePermission, UpdatePermission};
use warden_entity::role::{CreateRole, UpdateRole};
use warden_entity::user::{UpdateUser, UserFilter, UserSortField};
use warden_service::NewUserRequest;

/// Login request body.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Valid email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Body of the administrative session termination.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TerminateSessionsRequest {
    #[validate(range(min = 1, message = "Valid user ID is required"))]
    pub user_id: i64,
}

fn username_chars(username: &str) -> Result<(), ValidationError> {
    if username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        Ok(())
    } else {
        Err(ValidationError::new("username_chars").with_message(
            "Username may contain only letters, numbers and underscores".into(),
        ))
    }
}

/// Create user request (admin).
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(
        length(min = 3, max = 50, message = "Username must be 3-50 characters"),
        custom(function = "username_chars")
    )]
    pub username: String,
    #[validate(email(message = "Valid email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    #[validate(length(min = 1, max = 50, message = "First name must be 1-50 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 50, message = "Last name must be 1-50 characters"))]
    pub last_name: String,
    #[validate(range(min = 1, message = "Valid role ID is required"))]
    pub role_id: i64,
}

impl From<CreateUserRequest> for NewUserRequest {
    fn from(req: CreateUserRequest) -> Self {
        Self {
            username: req.username,
            email: req.email,
            password: req.password,
            first_name: req.first_name,
            last_name: req.last_name,
            role_id: req.role_id,
        }
    }
}

/// Partial user update.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 50, message = "First name must be 1-50 characters"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 50, message = "Last name must be 1-50 characters"))]
    pub last_name: Option<String>,
    pub is_active: Option<bool>,
}

impl From<UpdateUserRequest> for UpdateUser {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            is_active: req.is_active,
        }
    }
}

/// Role reassignment.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRoleRequest {
    #[validate(range(min = 1, message = "Valid role ID is required"))]
    pub role_id: i64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRoleRequest {
    #[validate(length(min = 2, max = 50, message = "Role name must be 2-50 characters"))]
    pub name: String,
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,
}

impl From<CreateRoleRequest> for CreateRole {
    fn from(req: CreateRoleRequest) -> Self {
        Self {
            name: req.name.trim().to_string(),
            description: req.description,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateRoleRequest {
    #[validate(length(min = 2, max = 50, message = "Role name must be 2-50 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,
}

impl From<UpdateRoleRequest> for UpdateRole {
    fn from(req: UpdateRoleRequest) -> Self {
        Self {
            name: req.name.map(|n| n.trim().to_string()),
            description: req.description,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePermissionRequest {
    #[validate(length(min = 1, max = 50, message = "Permission name must be 1-50 characters"))]
    pub name: String,
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,
}

impl From<CreatePermissionRequest> for CreatePermission {
    fn from(req: CreatePermissionRequest) -> Self {
        Self {
            name: req.name.trim().to_string(),
            description: req.description,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdatePermissionRequest {
    #[validate(length(min = 1, max = 50, message = "Permission name must be 1-50 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,
}

impl From<UpdatePermissionRequest> for UpdatePermission {
    fn from(req: UpdatePermissionRequest) -> Self {
        Self {
            name: req.name.map(|n| n.trim().to_string()),
            description: req.description,
        }
    }
}

/// Attach a permission to a role.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AssignPermissionRequest {
    #[validate(range(min = 1, message = "Valid permission ID is required"))]
    pub permission_id: i64,
}

/// Plain `?page=&limit=` query.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl PageQuery {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page.unwrap_or(1), self.limit.unwrap_or(DEFAULT_PAGE_SIZE))
    }
}

/// User listing query.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub search: Option<String>,
    pub is_active: Option<bool>,
    pub sort_by: Option<UserSortField>,
    pub sort_order: Option<SortDirection>,
}

impl UserListQuery {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page.unwrap_or(1), self.limit.unwrap_or(DEFAULT_PAGE_SIZE))
    }

    pub fn filter(&self) -> UserFilter {
        UserFilter {
            search: self
                .search
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned),
            is_active: self.is_active,
            sort_by: self.sort_by.unwrap_or_default(),
            direction: self.sort_order.unwrap_or_default(),
        }
    }
}

/// Activity log listing query.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub user_id: Option<i64>,
    pub activity_type: Option<String>,
}

impl ActivityListQuery {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page.unwrap_or(1), self.limit.unwrap_or(DEFAULT_PAGE_SIZE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_user_rules() {
        let req = CreateUserRequest {
            username: "bad name!".to_string(),
            email: "not-an-email".to_string(),
            password: String::new(),
            first_name: String::new(),
            last_name: "Doe".to_string(),
            role_id: 0,
        };
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        for field in ["username", "email", "password", "first_name", "role_id"] {
            assert!(fields.contains_key(field), "missing error for {field}");
        }
        assert!(!fields.contains_key("last_name"));
    }

    #[test]
    fn test_user_list_query_defaults() {
        let query = UserListQuery {
            search: Some("  ".to_string()),
            limit: Some(500),
            ..UserListQuery::default()
        };
        assert_eq!(query.page_request().page_size, 100);
        let filter = query.filter();
        assert!(filter.search.is_none());
        assert_eq!(filter.sort_by, UserSortField::CreatedAt);
        assert_eq!(filter.direction, SortDirection::Desc);
    }
}
