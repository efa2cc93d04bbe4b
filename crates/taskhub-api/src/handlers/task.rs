//! Task, subtask, and attachment handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;

use taskhub_service::task::{CreateTaskInput, UpdateSubtaskInput, UpdateTaskInput};

use crate::dto::request::{
    CreateSubtaskRequest, CreateTaskRequest, UpdateSubtaskRequest, UpdateTaskRequest, validated,
};
use crate::dto::response::MessageResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/tasks
pub async fn list_my_tasks(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let tasks = state.task_service.list_my_tasks(&auth).await?;
    Ok(Json(serde_json::json!({
        "message": "OK",
        "tasks": tasks,
    })))
}

/// GET /api/teams/{id}/tasks
pub async fn list_team_tasks(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(team_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let tasks = state.task_service.list_team_tasks(&auth, team_id).await?;
    Ok(Json(serde_json::json!({
        "message": "OK",
        "tasks": tasks,
    })))
}

/// POST /api/tasks
pub async fn create_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let req = validated(req)?;

    let creation = state
        .task_service
        .create_task(
            &auth,
            CreateTaskInput {
                title: req.title,
                content: req.content,
                status: req.status,
                priority: req.priority,
                team_id: req.team_id,
                assigned_to_id: req.assigned_to_id,
                due_date: req.due_date,
                subtasks: req.subtasks,
                attachments: req.attachments.into_iter().map(Into::into).collect(),
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Task created successfully",
            "task": creation.task,
            "failed_attachments": creation.failed_attachments,
        })),
    ))
}

/// GET /api/tasks/{id}
pub async fn get_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(task_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let task = state.task_service.get_task(&auth, task_id).await?;
    Ok(Json(serde_json::json!({
        "message": "OK",
        "task": task,
    })))
}

/// PATCH /api/tasks/{id}
pub async fn update_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(task_id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let task = state
        .task_service
        .update_task(
            &auth,
            task_id,
            UpdateTaskInput {
                title: req.title,
                content: req.content,
                status: req.status,
                priority: req.priority,
                team_id: req.team_id,
                assigned_to_id: req.assigned_to_id,
                due_date: req.due_date,
            },
        )
        .await?;

    Ok(Json(serde_json::json!({
        "message": "Task updated successfully",
        "task": task,
    })))
}

/// DELETE /api/tasks/{id}
pub async fn delete_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(task_id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.task_service.delete_task(&auth, task_id).await?;
    Ok(Json(MessageResponse::new("Task deleted successfully")))
}

/// GET /api/tasks/{id}/subtasks
pub async fn list_subtasks(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(task_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let task = state.task_service.get_task(&auth, task_id).await?;
    Ok(Json(serde_json::json!({
        "message": "OK",
        "subtasks": task.subtasks,
    })))
}

/// POST /api/tasks/{id}/subtasks
pub async fn add_subtask(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(task_id): Path<Uuid>,
    Json(req): Json<CreateSubtaskRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let req = validated(req)?;
    let subtask = state
        .task_service
        .add_subtask(&auth, task_id, &req.title)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Subtask created successfully",
            "subtask": subtask,
        })),
    ))
}

/// PATCH /api/tasks/{id}/subtasks/{sid}
pub async fn update_subtask(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((task_id, subtask_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<UpdateSubtaskRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let subtask = state
        .task_service
        .update_subtask(
            &auth,
            task_id,
            subtask_id,
            UpdateSubtaskInput {
                title: req.title,
                completed: req.completed,
            },
        )
        .await?;

    Ok(Json(serde_json::json!({
        "message": "Subtask updated successfully",
        "subtask": subtask,
    })))
}

/// DELETE /api/tasks/{id}/subtasks/{sid}
pub async fn delete_subtask(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((task_id, subtask_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .task_service
        .delete_subtask(&auth, task_id, subtask_id)
        .await?;
    Ok(Json(MessageResponse::new("Subtask deleted successfully")))
}
