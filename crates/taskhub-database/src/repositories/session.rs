//! Session repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use taskhub_core::error::{AppError, ErrorKind};
use taskhub_core::result::AppResult;
use taskhub_entity::session::Session;

/// Storage operations for login sessions.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Create a new session for a user.
    async fn create(&self, user_id: Uuid, expires_at: DateTime<Utc>) -> AppResult<Session>;

    /// Find a session by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Session>>;

    /// Mark a session as terminated. Returns `false` if the session does
    /// not exist or was already terminated.
    async fn terminate(&self, id: Uuid) -> AppResult<bool>;
}

/// PostgreSQL-backed [`SessionRepository`].
#[derive(Debug, Clone)]
pub struct PgSessionRepository {
    pool: PgPool,
}

impl PgSessionRepository {
    /// Create a new session repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for PgSessionRepository {
    async fn create(&self, user_id: Uuid, expires_at: DateTime<Utc>) -> AppResult<Session> {
        sqlx::query_as::<_, Session>(
            "INSERT INTO sessions (user_id, expires_at) VALUES ($1, $2) RETURNING *",
        )
        .bind(user_id)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create session", e))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Session>> {
        sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find session", e))
    }

    async fn terminate(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE sessions SET terminated_at = NOW() \
             WHERE id = $1 AND terminated_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to terminate session", e)
        })?;

        Ok(result.rows_affected() > 0)
    }
}
