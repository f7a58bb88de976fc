//! Role handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use warden_core::types::PageResponse;
use warden_entity::permission::Permission;
use warden_entity::role::Role;
use warden_service::RoleDetail;

use crate::dto::request::{CreateRoleRequest, PageQuery, UpdateRoleRequest};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// GET /api/roles
pub async fn list_roles(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<ApiResponse<PageResponse<Role>>>> {
    let page = state.roles.list(&query.page_request()).await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// POST /api/roles
pub async fn create_role(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateRoleRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Role>>)> {
    let role = state.roles.create(&auth, req.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(role))))
}

/// GET /api/roles/{id}
pub async fn get_role(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse<RoleDetail>>> {
    let role = state.roles.get(id).await?;
    Ok(Json(ApiResponse::ok(role)))
}

/// PATCH /api/roles/{id}
pub async fn update_role(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdateRoleRequest>,
) -> ApiResult<Json<ApiResponse<Role>>> {
    let role = state.roles.update(&auth, id, req.into()).await?;
    Ok(Json(ApiResponse::ok(role)))
}

/// DELETE /api/roles/{id}
pub async fn delete_role(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state.roles.delete(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Role deleted successfully",
    ))))
}

/// GET /api/roles/{id}/permissions
pub async fn role_permissions(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse<Vec<Permission>>>> {
    let permissions = state.roles.permissions(id).await?;
    Ok(Json(ApiResponse::ok(permissions)))
}
