//! Storage traits for every persisted entity.
//!
//! Components receive these as `Arc<dyn ...>` handles so the PostgreSQL
//! repositories and the in-memory stores are interchangeable.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use warden_core::result::AppResult;
use warden_core::types::pagination::{PageRequest, PageResponse};
use warden_entity::activity::{ActivityFilter, ActivityLog, NewActivityLog};
use warden_entity::permission::{CreatePermission, Permission, RolePermission, UpdatePermission};
use warden_entity::role::{CreateRole, Role, UpdateRole};
use warden_entity::session::{ActiveSession, NewSession, Session};
use warden_entity::user::{CreateUser, UpdateUser, User, UserFilter};

use crate::memory::MemoryStore;
use crate::repositories::{
    ActivityLogRepository, PermissionRepository, RoleRepository, SessionRepository,
    UserRepository,
};

/// User persistence.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Find a user by primary key.
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>>;

    /// Find a user by email (case-insensitive).
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// List users matching `filter`.
    async fn list(&self, filter: &UserFilter, page: &PageRequest) -> AppResult<PageResponse<User>>;

    /// Insert a user. Duplicate username or email is a conflict.
    async fn create(&self, data: &CreateUser) -> AppResult<User>;

    /// Apply a partial profile update.
    async fn update_profile(&self, id: i64, data: &UpdateUser) -> AppResult<Option<User>>;

    /// Reassign the user's role.
    async fn set_role(&self, id: i64, role_id: i64) -> AppResult<Option<User>>;

    /// Set the active flag.
    async fn set_active(&self, id: i64, active: bool) -> AppResult<Option<User>>;

    /// Record a successful login.
    async fn touch_last_login(&self, id: i64, at: DateTime<Utc>) -> AppResult<()>;

    /// Count users holding a role.
    async fn count_by_role(&self, role_id: i64) -> AppResult<u64>;
}

/// Role persistence.
#[async_trait]
pub trait RoleStore: Send + Sync + 'static {
    /// Find a role by primary key.
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Role>>;

    /// Find a role by name (case-insensitive).
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Role>>;

    /// List roles ordered by name.
    async fn list(&self, page: &PageRequest) -> AppResult<PageResponse<Role>>;

    /// Insert a role. Duplicate name is a conflict.
    async fn create(&self, data: &CreateRole) -> AppResult<Role>;

    /// Apply a partial update. Duplicate name is a conflict.
    async fn update(&self, id: i64, data: &UpdateRole) -> AppResult<Option<Role>>;

    /// Delete a role. A role still held by users is a conflict.
    async fn delete(&self, id: i64) -> AppResult<bool>;
}

/// Permission and role-permission association persistence.
#[async_trait]
pub trait PermissionStore: Send + Sync + 'static {
    /// Find a permission by primary key.
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Permission>>;

    /// List permissions ordered by name.
    async fn list(&self, page: &PageRequest) -> AppResult<PageResponse<Permission>>;

    /// Insert a permission. Duplicate name is a conflict.
    async fn create(&self, data: &CreatePermission) -> AppResult<Permission>;

    /// Apply a partial update. Duplicate name is a conflict.
    async fn update(&self, id: i64, data: &UpdatePermission) -> AppResult<Option<Permission>>;

    /// Delete a permission and its associations.
    async fn delete(&self, id: i64) -> AppResult<bool>;

    /// Permissions attached to a role, ordered by name.
    async fn list_for_role(&self, role_id: i64) -> AppResult<Vec<Permission>>;

    /// Whether the role holds a permission with exactly this name.
    async fn role_has_permission(&self, role_id: i64, permission_name: &str) -> AppResult<bool>;

    /// Attach a permission. Returns `false` when the pair already existed.
    async fn assign(&self, role_id: i64, permission_id: i64) -> AppResult<bool>;

    /// Detach a permission. Returns `false` when the pair did not exist.
    async fn revoke(&self, role_id: i64, permission_id: i64) -> AppResult<bool>;

    /// Every association, ordered by role then permission name.
    async fn list_assignments(&self) -> AppResult<Vec<RolePermission>>;
}

/// Session persistence.
#[async_trait]
pub trait SessionStore: Send + Sync + 'static {
    /// Atomically insert a session unless the user already holds an active one.
    ///
    /// Fails with a session-conflict error when an active session exists at
    /// `data.created_at`. The check and the insert cannot interleave with a
    /// concurrent call for the same user.
    async fn create_exclusive(&self, data: &NewSession) -> AppResult<Session>;

    /// Find the active session of `user_id` issued for `token_hash`.
    async fn find_active(
        &self,
        user_id: i64,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Session>>;

    /// Soft-expire the active sessions of `user_id` issued for `token_hash`.
    async fn expire_by_token(
        &self,
        user_id: i64,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> AppResult<u64>;

    /// Soft-expire every active session of a user, optionally sparing one token.
    async fn expire_for_user(
        &self,
        user_id: i64,
        except_token_hash: Option<&str>,
        now: DateTime<Utc>,
    ) -> AppResult<u64>;

    /// All active sessions with their owners, newest first.
    async fn list_active(&self, now: DateTime<Utc>) -> AppResult<Vec<ActiveSession>>;

    /// The most recent sessions of a user, active or not.
    async fn recent_for_user(&self, user_id: i64, limit: u32) -> AppResult<Vec<Session>>;

    /// Delete every session row of a user.
    async fn delete_for_user(&self, user_id: i64) -> AppResult<u64>;
}

/// Activity log persistence. Append-only.
#[async_trait]
pub trait ActivityStore: Send + Sync + 'static {
    /// Append an entry.
    async fn append(&self, entry: &NewActivityLog) -> AppResult<ActivityLog>;

    /// Find an entry by id.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ActivityLog>>;

    /// List entries matching `filter`, newest first.
    async fn list(
        &self,
        filter: &ActivityFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ActivityLog>>;

    /// The most recent entries of a user.
    async fn recent_for_user(&self, user_id: i64, limit: u32) -> AppResult<Vec<ActivityLog>>;
}

/// One handle per store, shared by every component.
#[derive(Clone)]
pub struct Stores {
    /// Users.
    pub users: Arc<dyn UserStore>,
    /// Roles.
    pub roles: Arc<dyn RoleStore>,
    /// Permissions and associations.
    pub permissions: Arc<dyn PermissionStore>,
    /// Sessions.
    pub sessions: Arc<dyn SessionStore>,
    /// Activity log.
    pub activity: Arc<dyn ActivityStore>,
}

impl Stores {
    /// PostgreSQL-backed stores sharing one pool.
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(UserRepository::new(pool.clone())),
            roles: Arc::new(RoleRepository::new(pool.clone())),
            permissions: Arc::new(PermissionRepository::new(pool.clone())),
            sessions: Arc::new(SessionRepository::new(pool.clone())),
            activity: Arc::new(ActivityLogRepository::new(pool)),
        }
    }

    /// Stores backed by a fresh in-memory state.
    pub fn in_memory() -> Self {
        Self::from_memory(MemoryStore::new())
    }

    /// Stores backed by an existing in-memory state.
    pub fn from_memory(store: MemoryStore) -> Self {
        Self {
            users: Arc::new(store.clone()),
            roles: Arc::new(store.clone()),
            permissions: Arc::new(store.clone()),
            sessions: Arc::new(store.clone()),
            activity: Arc::new(store),
        }
    }
}

impl std::fmt::Debug for Stores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stores").finish_non_exhaustive()
    }
}
