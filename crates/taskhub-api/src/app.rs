//! Application builder — wires repositories, services, and the router
//! into a running Axum server.

use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;

use taskhub_auth::jwt::decoder::JwtDecoder;
use taskhub_auth::jwt::encoder::JwtEncoder;
use taskhub_auth::password::hasher::PasswordHasher;
use taskhub_auth::password::policy::PasswordPolicy;
use taskhub_auth::session::manager::SessionManager;
use taskhub_core::config::AppConfig;
use taskhub_core::error::AppError;
use taskhub_database::repositories::{
    NotificationRepository, PgNotificationRepository, PgSessionRepository, PgTaskRepository,
    PgTeamRepository, PgUserRepository, SessionRepository, TaskRepository, TeamRepository,
    UserRepository,
};
use taskhub_service::membership::MembershipGuard;
use taskhub_service::notification::NotificationService;
use taskhub_service::task::{AssignmentNotifier, TaskService};
use taskhub_service::team::TeamService;
use taskhub_service::user::UserService;

use crate::router::build_router;
use crate::state::AppState;

/// Constructs the shared application state from configuration and a
/// connected database pool.
///
/// Every repository is instantiated once and injected into the services
/// that need it; nothing reaches for globals.
pub fn build_state(config: AppConfig, db_pool: PgPool) -> AppState {
    let user_repo: Arc<dyn UserRepository> = Arc::new(PgUserRepository::new(db_pool.clone()));
    let session_repo: Arc<dyn SessionRepository> =
        Arc::new(PgSessionRepository::new(db_pool.clone()));
    let team_repo: Arc<dyn TeamRepository> = Arc::new(PgTeamRepository::new(db_pool.clone()));
    let task_repo: Arc<dyn TaskRepository> = Arc::new(PgTaskRepository::new(db_pool.clone()));
    let notification_repo: Arc<dyn NotificationRepository> =
        Arc::new(PgNotificationRepository::new(db_pool.clone()));

    let password_hasher = Arc::new(PasswordHasher::new());
    let password_policy = Arc::new(PasswordPolicy::new(&config.auth));
    let jwt_encoder = Arc::new(JwtEncoder::new(&config.auth));
    let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));

    let session_manager = Arc::new(SessionManager::new(
        Arc::clone(&jwt_encoder),
        Arc::clone(&session_repo),
        Arc::clone(&user_repo),
        Arc::clone(&password_hasher),
        config.session.clone(),
    ));

    let user_service = Arc::new(UserService::new(
        Arc::clone(&user_repo),
        Arc::clone(&password_hasher),
        password_policy,
    ));
    let team_service = Arc::new(TeamService::new(
        Arc::clone(&team_repo),
        Arc::clone(&user_repo),
    ));
    let task_service = Arc::new(TaskService::new(
        task_repo,
        MembershipGuard::new(Arc::clone(&team_repo)),
        AssignmentNotifier::new(Arc::clone(&notification_repo)),
    ));
    let notification_service = Arc::new(NotificationService::new(notification_repo));

    AppState {
        config: Arc::new(config),
        db_pool,
        jwt_decoder,
        session_manager,
        user_service,
        team_service,
        task_service,
        notification_service,
    }
}

/// Runs the Taskhub server with the given configuration and database pool.
///
/// Blocks until the server shuts down (Ctrl+C), then drains in-flight
/// requests within the configured grace period.
pub async fn run_server(config: AppConfig, db_pool: PgPool) -> Result<(), AppError> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);

    let state = build_state(config, db_pool);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("Taskhub server listening on {}", addr);

    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        tracing::info!(grace_seconds = grace.as_secs(), "Shutting down");
    });

    server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to install Ctrl+C handler");
    }
}
