//! Activity log handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;

use warden_core::types::PageResponse;
use warden_entity::activity::{ActivityFilter, ActivityLog, ActivityType};

use crate::dto::request::ActivityListQuery;
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::state::AppState;

/// GET /api/activity-logs
pub async fn list_logs(
    State(state): State<AppState>,
    Query(query): Query<ActivityListQuery>,
) -> ApiResult<Json<ApiResponse<PageResponse<ActivityLog>>>> {
    let activity_type = query
        .activity_type
        .as_deref()
        .map(str::parse::<ActivityType>)
        .transpose()?;

    let filter = ActivityFilter {
        user_id: query.user_id,
        activity_type,
    };
    let page = state.activity.list(&filter, &query.page_request()).await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /api/activity-logs/{id}
pub async fn get_log(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<ActivityLog>>> {
    let entry = state.activity.get(id).await?;
    Ok(Json(ApiResponse::ok(entry)))
}
