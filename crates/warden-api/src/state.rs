//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use warden_auth::{AccessGate, PermissionGraph, SessionAuthority};
use warden_core::config::AppConfig;
use warden_database::{DatabasePool, Stores};
use warden_service::{ActivityService, AdminUserService, PermissionService, RoleService};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`. Every field is
/// cheap to clone.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// PostgreSQL pool, absent when running on the in-memory stores
    pub db_pool: Option<DatabasePool>,
    /// Storage handles
    pub stores: Stores,

    // ── Auth ─────────────────────────────────────────────────
    /// Login, validation and session control
    pub authority: SessionAuthority,
    /// Per-route authorization
    pub gate: AccessGate,

    // ── Services ─────────────────────────────────────────────
    pub users: AdminUserService,
    pub roles: RoleService,
    pub permissions: PermissionService,
    pub activity: ActivityService,
}

impl AppState {
    /// Wires every component over `stores`.
    pub fn new(config: AppConfig, stores: Stores, db_pool: Option<DatabasePool>) -> Self {
        let authority = SessionAuthority::new(stores.clone(), &config.auth, &config.session);
        let graph = PermissionGraph::new(stores.roles.clone(), stores.permissions.clone());

        Self {
            gate: AccessGate::new(authority.clone(), graph.clone()),
            users: AdminUserService::new(stores.clone(), authority.clone(), &config.auth),
            roles: RoleService::new(stores.clone(), graph.clone()),
            permissions: PermissionService::new(stores.clone(), graph),
            activity: ActivityService::new(stores.activity.clone()),
            authority,
            stores,
            db_pool,
            config: Arc::new(config),
        }
    }
}
