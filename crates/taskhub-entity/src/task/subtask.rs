//! Subtask entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A checklist item attached to a task.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SubTask {
    /// Unique subtask identifier.
    pub id: Uuid,
    /// Checklist item text.
    pub title: String,
    /// Whether the item has been completed.
    pub completed: bool,
    /// The parent task.
    pub task_id: Uuid,
    /// When the subtask was created.
    pub created_at: DateTime<Utc>,
}
