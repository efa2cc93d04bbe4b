//! Shared application state passed to every handler.

use std::sync::Arc;

use sqlx::PgPool;

use taskhub_auth::jwt::decoder::JwtDecoder;
use taskhub_auth::session::manager::SessionManager;
use taskhub_core::config::AppConfig;
use taskhub_service::notification::NotificationService;
use taskhub_service::task::TaskService;
use taskhub_service::team::TeamService;
use taskhub_service::user::UserService;

/// Application state shared across all routes via Axum's `State` extractor.
///
/// Everything is `Arc`-wrapped so cloning the state per request is cheap.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Database connection pool (used directly only by the health check).
    pub db_pool: PgPool,
    /// Token decoder for the auth extractor.
    pub jwt_decoder: Arc<JwtDecoder>,
    /// Session lifecycle manager.
    pub session_manager: Arc<SessionManager>,
    /// User registration and profile service.
    pub user_service: Arc<UserService>,
    /// Team and membership service.
    pub team_service: Arc<TeamService>,
    /// Task, subtask, and attachment service.
    pub task_service: Arc<TaskService>,
    /// Notification feed service.
    pub notification_service: Arc<NotificationService>,
}
