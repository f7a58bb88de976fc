//! Session handlers: login, logout, refetch, and administrative session control.

use axum::Json;
use axum::extract::{Path, State};

use warden_auth::SessionSnapshot;
use warden_entity::session::ActiveSession;

use crate::dto::request::{LoginRequest, TerminateSessionsRequest};
use crate::dto::response::{
    ApiResponse, LoginResponse, LogoutResponse, PurgeResponse, TerminateResponse,
};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, ClientInfo, ValidatedJson};
use crate::state::AppState;

/// POST /api/sessions/login
pub async fn login(
    State(state): State<AppState>,
    client: ClientInfo,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<ApiResponse<LoginResponse>>> {
    let outcome = state
        .authority
        .login(&req.email, &req.password, client.ip(), client.user_agent())
        .await?;

    Ok(Json(ApiResponse::ok(outcome.into())))
}

/// POST /api/sessions/logout
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<LogoutResponse>>> {
    let updated = state.authority.logout(&auth.principal, auth.ip()).await?;

    Ok(Json(ApiResponse::ok(LogoutResponse {
        message: "Logged out successfully".to_string(),
        sessions_updated: updated,
    })))
}

/// GET /api/sessions/refetch
pub async fn refetch(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<SessionSnapshot>>> {
    let snapshot = state.authority.refetch(&auth.principal).await?;
    Ok(Json(ApiResponse::ok(snapshot)))
}

/// GET /api/sessions/active
pub async fn active(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<ActiveSession>>>> {
    let sessions = state.authority.list_active().await?;
    Ok(Json(ApiResponse::ok(sessions)))
}

/// POST /api/sessions/terminate
pub async fn terminate(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<TerminateSessionsRequest>,
) -> ApiResult<Json<ApiResponse<TerminateResponse>>> {
    let terminated = state
        .authority
        .admin_terminate(&auth.principal, req.user_id, auth.ip())
        .await?;

    Ok(Json(ApiResponse::ok(TerminateResponse {
        message: format!("Terminated {terminated} session(s)"),
        sessions_terminated: terminated,
    })))
}

/// DELETE /api/user-sessions/{user_id}
pub async fn purge(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<ApiResponse<PurgeResponse>>> {
    let deleted = state
        .authority
        .purge_user_sessions(&auth.principal, user_id, auth.ip())
        .await?;

    Ok(Json(ApiResponse::ok(PurgeResponse {
        message: format!("Deleted {deleted} session(s)"),
        sessions_deleted: deleted,
    })))
}
