//! Admin user management: creation, listing, profile edits, role and status changes.

use tracing::{info, warn};

use warden_auth::password::{PasswordHasher, PasswordValidator};
use warden_auth::{ActivityRecorder, SessionAuthority};
use warden_core::config::AuthConfig;
use warden_core::error::AppError;
use warden_core::result::AppResult;
use warden_core::types::pagination::{PageRequest, PageResponse};
use warden_database::Stores;
use warden_entity::activity::ActivityType;
use warden_entity::user::{CreateUser, UpdateUser, User, UserFilter};

use crate::context::RequestContext;

/// Handles administrative user management operations.
///
/// Any change that leaves a user inactive also expires that user's sessions.
#[derive(Debug, Clone)]
pub struct AdminUserService {
    stores: Stores,
    authority: SessionAuthority,
    activity: ActivityRecorder,
    hasher: PasswordHasher,
    validator: PasswordValidator,
}

/// Input for creating a user. Field shapes are checked at the API boundary;
/// password policy and role existence are checked here.
#[derive(Debug, Clone)]
pub struct NewUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub role_id: i64,
}

impl AdminUserService {
    /// Creates a new admin user service.
    pub fn new(stores: Stores, authority: SessionAuthority, auth: &AuthConfig) -> Self {
        Self {
            activity: ActivityRecorder::new(stores.activity.clone()),
            hasher: PasswordHasher::new(),
            validator: PasswordValidator::new(auth),
            stores,
            authority,
        }
    }

    /// Creates a user after checking the password policy and the role.
    pub async fn create_user(&self, ctx: &RequestContext, req: NewUserRequest) -> AppResult<User> {
        self.validator.validate(
            &req.password,
            &[&req.username, &req.email, &req.first_name, &req.last_name],
        )?;
        self.require_role(req.role_id).await?;

        let password_hash = self.hasher.hash(&req.password)?;
        let user = self
            .stores
            .users
            .create(&CreateUser {
                username: req.username.trim().to_string(),
                email: req.email.trim().to_lowercase(),
                password_hash,
                first_name: req.first_name.trim().to_string(),
                last_name: req.last_name.trim().to_string(),
                role_id: req.role_id,
            })
            .await?;

        self.activity
            .record(
                ctx.user_id(),
                ActivityType::UserCreated,
                format!("Created user {} ({})", user.username, user.id),
                ctx.ip(),
            )
            .await;

        info!(actor_id = ctx.user_id(), user_id = user.id, username = %user.username, "User created");
        Ok(user)
    }

    /// Lists users matching `filter`.
    pub async fn list_users(
        &self,
        filter: &UserFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<User>> {
        self.stores.users.list(filter, &page.normalized()).await
    }

    /// Gets a single user and records the profile access.
    pub async fn get_user(&self, ctx: &RequestContext, user_id: i64) -> AppResult<User> {
        let user = self.require_user(user_id).await?;
        self.activity
            .record(
                ctx.user_id(),
                ActivityType::ProfileAccess,
                format!("Viewed profile of user {user_id}"),
                ctx.ip(),
            )
            .await;
        Ok(user)
    }

    /// Updates names and/or the active flag.
    pub async fn update_user(
        &self,
        ctx: &RequestContext,
        user_id: i64,
        data: UpdateUser,
    ) -> AppResult<User> {
        if data.is_empty() {
            return Err(AppError::validation("No fields to update"));
        }
        if data.is_active == Some(false) {
            self.forbid_self_deactivation(ctx, user_id)?;
        }

        let before = self.require_user(user_id).await?;
        let user = self
            .stores
            .users
            .update_profile(user_id, &data)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        self.after_status_change(&before, &user).await;
        self.activity
            .record(
                ctx.user_id(),
                ActivityType::ProfileUpdate,
                format!("Updated profile of user {user_id}"),
                ctx.ip(),
            )
            .await;

        info!(actor_id = ctx.user_id(), user_id, "User updated");
        Ok(user)
    }

    /// Assigns a different role. Live sessions pick it up on their next request.
    pub async fn change_role(
        &self,
        ctx: &RequestContext,
        user_id: i64,
        role_id: i64,
    ) -> AppResult<User> {
        let role = self.require_role(role_id).await?;
        let user = self
            .stores
            .users
            .set_role(user_id, role.id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        self.activity
            .record(
                ctx.user_id(),
                ActivityType::RoleUpdate,
                format!("Changed role of user {user_id} to {}", role.name),
                ctx.ip(),
            )
            .await;

        info!(actor_id = ctx.user_id(), user_id, role = %role.name, "User role changed");
        Ok(user)
    }

    /// Flips the active flag.
    pub async fn toggle_status(&self, ctx: &RequestContext, user_id: i64) -> AppResult<User> {
        let before = self.require_user(user_id).await?;
        if before.is_active {
            self.forbid_self_deactivation(ctx, user_id)?;
        }

        let user = self
            .stores
            .users
            .set_active(user_id, !before.is_active)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        self.after_status_change(&before, &user).await;
        let state = if user.is_active { "activated" } else { "deactivated" };
        self.activity
            .record(
                ctx.user_id(),
                ActivityType::UserStatusToggle,
                format!("User {user_id} {state}"),
                ctx.ip(),
            )
            .await;

        info!(actor_id = ctx.user_id(), user_id, active = user.is_active, "User status toggled");
        Ok(user)
    }

    /// Soft-deletes a user by deactivating it.
    pub async fn deactivate(&self, ctx: &RequestContext, user_id: i64) -> AppResult<User> {
        self.forbid_self_deactivation(ctx, user_id)?;
        let before = self.require_user(user_id).await?;

        let user = self
            .stores
            .users
            .set_active(user_id, false)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        self.after_status_change(&before, &user).await;
        self.activity
            .record(
                ctx.user_id(),
                ActivityType::UserDeactivated,
                format!("Deactivated user {user_id}"),
                ctx.ip(),
            )
            .await;

        info!(actor_id = ctx.user_id(), user_id, "User deactivated");
        Ok(user)
    }

    fn forbid_self_deactivation(&self, ctx: &RequestContext, user_id: i64) -> AppResult<()> {
        if ctx.user_id() == user_id {
            return Err(AppError::validation("You cannot deactivate your own account"));
        }
        Ok(())
    }

    /// Expires the sessions of a user that just went inactive. The flag is
    /// already committed and validation rejects inactive users, so a failure
    /// is logged, not returned.
    async fn after_status_change(&self, before: &User, after: &User) {
        if !(before.is_active && !after.is_active) {
            return;
        }
        if let Err(e) = self.authority.expire_all_for_user(after.id).await {
            warn!(user_id = after.id, error = %e, "Failed to expire sessions of deactivated user");
        }
    }

    async fn require_user(&self, user_id: i64) -> AppResult<User> {
        self.stores
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    async fn require_role(&self, role_id: i64) -> AppResult<warden_entity::role::Role> {
        self.stores
            .roles
            .find_by_id(role_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Role {role_id} not found")))
    }
}
