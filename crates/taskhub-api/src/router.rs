//! Route definitions for the Taskhub HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.
//! The router receives `AppState` and passes it to all handlers via
//! Axum's `State` extractor.

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{delete, get, patch, post, put},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::middleware::cors::build_cors_layer;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(user_routes())
        .merge(team_routes())
        .merge(task_routes())
        .merge(notification_routes())
        .merge(health_routes());

    let cors = build_cors_layer(&state.config.server.cors);

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Auth endpoints: register, login, logout, me
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/me", get(handlers::auth::me))
}

/// User self-service endpoints
fn user_routes() -> Router<AppState> {
    Router::new().route("/users/me", get(handlers::user::get_profile))
}

/// Team CRUD, membership management, and per-team task listing
fn team_routes() -> Router<AppState> {
    Router::new()
        .route("/teams", get(handlers::team::list_teams))
        .route("/teams", post(handlers::team::create_team))
        .route("/teams/{id}", get(handlers::team::get_team))
        .route("/teams/{id}", patch(handlers::team::rename_team))
        .route("/teams/{id}", delete(handlers::team::delete_team))
        .route("/teams/{id}/tasks", get(handlers::task::list_team_tasks))
        .route("/teams/{id}/members", get(handlers::team::list_members))
        .route("/teams/{id}/members", post(handlers::team::add_member))
        .route(
            "/teams/{id}/members/{mid}",
            delete(handlers::team::remove_member),
        )
}

/// Task CRUD and nested subtask routes
fn task_routes() -> Router<AppState> {
    Router::new()
        .route("/tasks", get(handlers::task::list_my_tasks))
        .route("/tasks", post(handlers::task::create_task))
        .route("/tasks/{id}", get(handlers::task::get_task))
        .route("/tasks/{id}", patch(handlers::task::update_task))
        .route("/tasks/{id}", delete(handlers::task::delete_task))
        .route("/tasks/{id}/subtasks", get(handlers::task::list_subtasks))
        .route("/tasks/{id}/subtasks", post(handlers::task::add_subtask))
        .route(
            "/tasks/{id}/subtasks/{sid}",
            patch(handlers::task::update_subtask),
        )
        .route(
            "/tasks/{id}/subtasks/{sid}",
            delete(handlers::task::delete_subtask),
        )
}

/// Notification feed endpoints
fn notification_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/notifications",
            get(handlers::notification::list_notifications),
        )
        .route("/notifications", patch(handlers::notification::mark_read))
        .route(
            "/notifications/read-all",
            put(handlers::notification::mark_all_read),
        )
}

/// Health endpoint
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
