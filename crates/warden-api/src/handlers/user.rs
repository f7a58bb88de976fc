//! Administrative user handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use warden_core::types::PageResponse;
use warden_entity::user::User;

use crate::dto::request::{ChangeRoleRequest, CreateUserRequest, UpdateUserRequest, UserListQuery};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// POST /api/users
pub async fn create_user(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<User>>)> {
    let user = state.users.create_user(&auth, req.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(user))))
}

/// GET /api/users
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<UserListQuery>,
) -> ApiResult<Json<ApiResponse<PageResponse<User>>>> {
    let page = state
        .users
        .list_users(&query.filter(), &query.page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /api/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse<User>>> {
    let user = state.users.get_user(&auth, id).await?;
    Ok(Json(ApiResponse::ok(user)))
}

/// PATCH /api/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdateUserRequest>,
) -> ApiResult<Json<ApiResponse<User>>> {
    let user = state.users.update_user(&auth, id, req.into()).await?;
    Ok(Json(ApiResponse::ok(user)))
}

/// PATCH /api/users/{id}/role
pub async fn change_role(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<ChangeRoleRequest>,
) -> ApiResult<Json<ApiResponse<User>>> {
    let user = state.users.change_role(&auth, id, req.role_id).await?;
    Ok(Json(ApiResponse::ok(user)))
}

/// PATCH /api/users/{id}/status
pub async fn toggle_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse<User>>> {
    let user = state.users.toggle_status(&auth, id).await?;
    Ok(Json(ApiResponse::ok(user)))
}

/// DELETE /api/users/{id}
pub async fn deactivate_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state.users.deactivate(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "User deactivated successfully",
    ))))
}
