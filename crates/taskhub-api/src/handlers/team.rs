//! Team and membership handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;

use taskhub_entity::team::TeamRole;

use crate::dto::request::{AddMemberRequest, CreateTeamRequest, RenameTeamRequest, validated};
use crate::dto::response::MessageResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/teams
pub async fn list_teams(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let teams = state.team_service.list_teams(&auth).await?;
    Ok(Json(serde_json::json!({
        "message": "OK",
        "teams": teams,
    })))
}

/// POST /api/teams
pub async fn create_team(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateTeamRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let req = validated(req)?;
    let team = state.team_service.create_team(&auth, &req.name).await?;
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Team created successfully",
            "team": team,
        })),
    ))
}

/// GET /api/teams/{id}
pub async fn get_team(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(team_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let team = state.team_service.get_team(&auth, team_id).await?;
    Ok(Json(serde_json::json!({
        "message": "OK",
        "team": team,
    })))
}

/// PATCH /api/teams/{id}
pub async fn rename_team(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(team_id): Path<Uuid>,
    Json(req): Json<RenameTeamRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let req = validated(req)?;
    let team = state
        .team_service
        .rename_team(&auth, team_id, &req.name)
        .await?;
    Ok(Json(serde_json::json!({
        "message": "Team updated successfully",
        "team": team,
    })))
}

/// DELETE /api/teams/{id}
pub async fn delete_team(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(team_id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.team_service.delete_team(&auth, team_id).await?;
    Ok(Json(MessageResponse::new("Team deleted successfully")))
}

/// GET /api/teams/{id}/members
pub async fn list_members(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(team_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let team = state.team_service.get_team(&auth, team_id).await?;
    Ok(Json(serde_json::json!({
        "message": "OK",
        "members": team.members,
    })))
}

/// POST /api/teams/{id}/members
pub async fn add_member(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(team_id): Path<Uuid>,
    Json(req): Json<AddMemberRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let role = req.role.unwrap_or(TeamRole::Member);
    let member = state
        .team_service
        .add_member(&auth, team_id, &req.email, role)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Member added successfully",
            "member": member,
        })),
    ))
}

/// DELETE /api/teams/{id}/members/{mid}
pub async fn remove_member(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((team_id, member_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .team_service
        .remove_member(&auth, team_id, member_id)
        .await?;
    Ok(Json(MessageResponse::new("Member removed successfully")))
}
