//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Notification kind for task assignment events.
pub const KIND_TASK_ASSIGNED: &str = "task_assigned";

/// A notification delivered to a user's feed.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    /// Unique notification identifier.
    pub id: Uuid,
    /// Notification kind (e.g. `task_assigned`).
    #[serde(rename = "type")]
    pub kind: String,
    /// Human-readable message.
    pub message: String,
    /// The recipient user.
    pub user_id: Uuid,
    /// The task the notification refers to, if any.
    pub task_id: Option<Uuid>,
    /// Whether the user has read this notification.
    pub is_read: bool,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
}

/// A minimal reference to the task a notification points at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationTaskRef {
    /// The task's identifier.
    pub id: Uuid,
    /// The task's title.
    pub title: String,
    /// The team the task belongs to.
    pub team_id: Uuid,
    /// The team's display name.
    pub team_name: String,
}

/// A notification joined with its task reference for feed rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationDetail {
    /// The notification itself.
    #[serde(flatten)]
    pub notification: Notification,
    /// The referenced task, if it still exists.
    pub task: Option<NotificationTaskRef>,
}
