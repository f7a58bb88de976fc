//! Permission handlers and role-permission assignment.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use warden_core::types::PageResponse;
use warden_entity::permission::{Permission, RolePermission};

use crate::dto::request::{
    AssignPermissionRequest, CreatePermissionRequest, PageQuery, UpdatePermissionRequest,
};
use crate::dto::response::{ApiResponse, AssignmentResponse, MessageResponse};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// GET /api/permissions
pub async fn list_permissions(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<ApiResponse<PageResponse<Permission>>>> {
    let page = state.permissions.list(&query.page_request()).await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// POST /api/permissions
pub async fn create_permission(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreatePermissionRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Permission>>)> {
    let permission = state.permissions.create(&auth, req.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(permission))))
}

/// GET /api/permissions/{id}
pub async fn get_permission(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse<Permission>>> {
    let permission = state.permissions.get(id).await?;
    Ok(Json(ApiResponse::ok(permission)))
}

/// PATCH /api/permissions/{id}
pub async fn update_permission(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdatePermissionRequest>,
) -> ApiResult<Json<ApiResponse<Permission>>> {
    let permission = state.permissions.update(&auth, id, req.into()).await?;
    Ok(Json(ApiResponse::ok(permission)))
}

/// DELETE /api/permissions/{id}
pub async fn delete_permission(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state.permissions.delete(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Permission deleted successfully",
    ))))
}

/// GET /api/permissions/roles
pub async fn list_assignments(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<RolePermission>>>> {
    let pairs = state.permissions.list_assignments().await?;
    Ok(Json(ApiResponse::ok(pairs)))
}

/// POST /api/permissions/roles/{role_id}
pub async fn assign_permission(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(role_id): Path<i64>,
    ValidatedJson(req): ValidatedJson<AssignPermissionRequest>,
) -> ApiResult<Json<ApiResponse<AssignmentResponse>>> {
    let changed = state
        .permissions
        .assign(&auth, role_id, req.permission_id)
        .await?;
    let message = if changed {
        "Permission assigned to role"
    } else {
        "Permission already assigned to role"
    };
    Ok(Json(ApiResponse::ok(AssignmentResponse {
        message: message.to_string(),
        changed,
    })))
}

/// DELETE /api/permissions/roles/{role_id}/{permission_id}
pub async fn revoke_permission(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((role_id, permission_id)): Path<(i64, i64)>,
) -> ApiResult<Json<ApiResponse<AssignmentResponse>>> {
    let changed = state
        .permissions
        .revoke(&auth, role_id, permission_id)
        .await?;
    let message = if changed {
        "Permission revoked from role"
    } else {
        "Permission was not assigned to role"
    };
    Ok(Json(ApiResponse::ok(AssignmentResponse {
        message: message.to_string(),
        changed,
    })))
}
