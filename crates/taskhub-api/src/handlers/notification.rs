//! Notification feed handlers.

use axum::Json;
use axum::extract::{Query, State};

use crate::dto::request::MarkReadRequest;
use crate::error::ApiError;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// GET /api/notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let page = state
        .notification_service
        .list(&auth, &params.into_page_request())
        .await?;
    Ok(Json(serde_json::json!({
        "message": "OK",
        "notifications": page,
    })))
}

/// PATCH /api/notifications
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<MarkReadRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let marked = state
        .notification_service
        .mark_read(&auth, &req.notification_ids)
        .await?;
    Ok(Json(serde_json::json!({
        "message": "Notifications marked as read",
        "marked": marked,
    })))
}

/// PUT /api/notifications/read-all
pub async fn mark_all_read(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let marked = state.notification_service.mark_all_read(&auth).await?;
    Ok(Json(serde_json::json!({
        "message": "Notifications marked as read",
        "marked": marked,
    })))
}
