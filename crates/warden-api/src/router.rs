//! Route definitions for the Warden HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`. Each group
//! carries the access gate for its [`Requirement`] as a route layer, so
//! unmatched paths still fall through to 404.

use axum::{
    Router, middleware as axum_middleware,
    routing::{delete, get, patch, post},
};

use warden_auth::Requirement;

use crate::handlers;
use crate::middleware::{GateState, gate};
use crate::state::AppState;

/// Builds the `/api` router with every route and its gate.
pub fn build_router(state: AppState) -> Router {
    let auth = &state.config.auth;
    let admin = Requirement::roles([auth.admin_role.clone()]);
    let admin_or_manager = Requirement::roles([auth.admin_role.clone(), auth.manager_role.clone()]);
    let directory = Requirement::Permission(auth.user_directory_permission.clone());

    let api_routes = Router::new()
        .merge(public_routes())
        .merge(guarded(&state, session_routes(), Requirement::Authenticated))
        .merge(guarded(&state, session_admin_routes(), admin.clone()))
        .merge(guarded(&state, user_directory_routes(), directory))
        .merge(guarded(&state, user_edit_routes(), admin_or_manager))
        .merge(guarded(&state, user_admin_routes(), admin.clone()))
        .merge(guarded(&state, role_routes(), admin.clone()))
        .merge(guarded(&state, permission_routes(), admin.clone()))
        .merge(guarded(&state, activity_routes(), admin));

    Router::new().nest("/api", api_routes).with_state(state)
}

fn guarded(
    state: &AppState,
    routes: Router<AppState>,
    requirement: Requirement,
) -> Router<AppState> {
    routes.route_layer(axum_middleware::from_fn_with_state(
        GateState::new(state.clone(), requirement),
        gate,
    ))
}

/// Login and health: no token required
fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/sessions/login", post(handlers::session::login))
        .route("/health", get(handlers::health::health))
}

/// The caller's own session
fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/sessions/logout", post(handlers::session::logout))
        .route("/sessions/refetch", get(handlers::session::refetch))
}

/// Session oversight
fn session_admin_routes() -> Router<AppState> {
    Router::new()
        .route("/sessions/active", get(handlers::session::active))
        .route("/sessions/terminate", post(handlers::session::terminate))
        .route("/user-sessions/{user_id}", delete(handlers::session::purge))
}

/// User directory, gated by permission rather than role
fn user_directory_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(handlers::user::list_users))
        .route("/users/{id}", get(handlers::user::get_user))
}

/// Profile edits
fn user_edit_routes() -> Router<AppState> {
    Router::new().route("/users/{id}", patch(handlers::user::update_user))
}

/// Account administration
fn user_admin_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(handlers::user::create_user))
        .route("/users/{id}", delete(handlers::user::deactivate_user))
        .route("/users/{id}/role", patch(handlers::user::change_role))
        .route("/users/{id}/status", patch(handlers::user::toggle_status))
}

/// Role CRUD
fn role_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/roles",
            get(handlers::role::list_roles).post(handlers::role::create_role),
        )
        .route(
            "/roles/{id}",
            get(handlers::role::get_role)
                .patch(handlers::role::update_role)
                .delete(handlers::role::delete_role),
        )
        .route(
            "/roles/{id}/permissions",
            get(handlers::role::role_permissions),
        )
}

/// Permission CRUD and assignment
fn permission_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/permissions",
            get(handlers::permission::list_permissions)
                .post(handlers::permission::create_permission),
        )
        .route(
            "/permissions/roles",
            get(handlers::permission::list_assignments),
        )
        .route(
            "/permissions/roles/{role_id}",
            post(handlers::permission::assign_permission),
        )
        .route(
            "/permissions/roles/{role_id}/{permission_id}",
            delete(handlers::permission::revoke_permission),
        )
        .route(
            "/permissions/{id}",
            get(handlers::permission::get_permission)
                .patch(handlers::permission::update_permission)
                .delete(handlers::permission::delete_permission),
        )
}

/// Activity log (read-only)
fn activity_routes() -> Router<AppState> {
    Router::new()
        .route("/activity-logs", get(handlers::activity::list_logs))
        .route("/activity-logs/{id}", get(handlers::activity::get_log))
}
