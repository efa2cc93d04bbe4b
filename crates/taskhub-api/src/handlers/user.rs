//! User self-service handlers.

use axum::Json;
use axum::extract::State;

use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/users/me
pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user = state.user_service.get_profile(&auth).await?;
    Ok(Json(serde_json::json!({
        "message": "OK",
        "user": user,
    })))
}
