//! Auth handlers — register, login, logout, me.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use taskhub_entity::user::User;
use taskhub_service::user::RegisterUserRequest;

use crate::dto::request::{LoginRequest, RegisterRequest, validated};
use crate::dto::response::{LoginResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let req = validated(req)?;

    let user = state
        .user_service
        .register(RegisterUserRequest {
            username: req.username,
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "User registered successfully",
            "user": user,
        })),
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let req = validated(req)?;

    let result = state
        .session_manager
        .login(&req.email, &req.password)
        .await?;

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token: result.token,
        expires_at: result.expires_at,
        user: result.user,
    }))
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<MessageResponse>, ApiError> {
    state.session_manager.logout(auth.session_id).await?;
    Ok(Json(MessageResponse::new("Logged out successfully")))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user: User = state.user_service.get_profile(&auth).await?;
    Ok(Json(serde_json::json!({
        "message": "OK",
        "user": user,
    })))
}
