//! Notification repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use taskhub_core::error::{AppError, ErrorKind};
use taskhub_core::result::AppResult;
use taskhub_core::types::pagination::{PageRequest, PageResponse};
use taskhub_entity::notification::{Notification, NotificationDetail, NotificationTaskRef};

/// Storage operations for user notifications.
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Create a notification for a user.
    async fn create(
        &self,
        user_id: Uuid,
        kind: &str,
        message: &str,
        task_id: Option<Uuid>,
    ) -> AppResult<Notification>;

    /// List a user's notifications, newest first, with the referenced
    /// task joined in where it still exists.
    async fn list_for_user(
        &self,
        user_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<NotificationDetail>>;

    /// Mark the given notifications as read, scoped to the owner.
    /// Returns the number of rows actually updated.
    async fn mark_read(&self, user_id: Uuid, ids: &[Uuid]) -> AppResult<u64>;

    /// Mark all of a user's notifications as read. Returns the number of
    /// rows updated.
    async fn mark_all_read(&self, user_id: Uuid) -> AppResult<u64>;
}

/// PostgreSQL-backed [`NotificationRepository`].
#[derive(Debug, Clone)]
pub struct PgNotificationRepository {
    pool: PgPool,
}

impl PgNotificationRepository {
    /// Create a new notification repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationRepository for PgNotificationRepository {
    async fn create(
        &self,
        user_id: Uuid,
        kind: &str,
        message: &str,
        task_id: Option<Uuid>,
    ) -> AppResult<Notification> {
        sqlx::query_as::<_, Notification>(
            "INSERT INTO notifications (kind, message, user_id, task_id) \
             VALUES ($1, $2, $3, $4) \
             RETURNING *",
        )
        .bind(kind)
        .bind(message)
        .bind(user_id)
        .bind(task_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to create notification", e)
        })
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<NotificationDetail>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to count notifications", e)
                })?;

        let rows = sqlx::query_as::<_, NotificationRow>(
            "SELECT n.id, n.kind, n.message, n.user_id, n.task_id, n.is_read, n.created_at, \
                    t.title AS task_title, t.team_id AS task_team_id, tm.name AS team_name \
             FROM notifications n \
             LEFT JOIN tasks t ON t.id = n.task_id \
             LEFT JOIN teams tm ON tm.id = t.team_id \
             WHERE n.user_id = $1 \
             ORDER BY n.created_at DESC \
             LIMIT $2 OFFSET $3",
        )
        .bind(user_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list notifications", e)
        })?;

        let items = rows.into_iter().map(NotificationDetail::from).collect();
        Ok(PageResponse::new(
            items,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    async fn mark_read(&self, user_id: Uuid, ids: &[Uuid]) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE user_id = $1 AND id = ANY($2)",
        )
        .bind(user_id)
        .bind(ids)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to mark notifications read", e)
        })?;

        Ok(result.rows_affected())
    }

    async fn mark_all_read(&self, user_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE user_id = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                "Failed to mark all notifications read",
                e,
            )
        })?;

        Ok(result.rows_affected())
    }
}

/// Flat row for the notification feed join.
#[derive(Debug, FromRow)]
struct NotificationRow {
    id: Uuid,
    kind: String,
    message: String,
    user_id: Uuid,
    task_id: Option<Uuid>,
    is_read: bool,
    created_at: DateTime<Utc>,
    task_title: Option<String>,
    task_team_id: Option<Uuid>,
    team_name: Option<String>,
}

impl From<NotificationRow> for NotificationDetail {
    fn from(row: NotificationRow) -> Self {
        let task = match (row.task_id, row.task_title, row.task_team_id, row.team_name) {
            (Some(id), Some(title), Some(team_id), Some(team_name)) => {
                Some(NotificationTaskRef {
                    id,
                    title,
                    team_id,
                    team_name,
                })
            }
            _ => None,
        };

        NotificationDetail {
            notification: Notification {
                id: row.id,
                kind: row.kind,
                message: row.message,
                user_id: row.user_id,
                task_id: row.task_id,
                is_read: row.is_read,
                created_at: row.created_at,
            },
            task,
        }
    }
}
