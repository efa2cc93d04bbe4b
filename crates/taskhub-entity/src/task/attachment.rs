//! Attachment entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A file attached to a task.
///
/// Only the metadata lives here; the file content is stored behind `url`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Attachment {
    /// Unique attachment identifier.
    pub id: Uuid,
    /// Original file name.
    pub name: String,
    /// Where the file content can be fetched.
    pub url: String,
    /// MIME type of the file.
    pub mime_type: String,
    /// File size in bytes.
    pub size_bytes: i64,
    /// The task the file is attached to.
    pub task_id: Uuid,
    /// When the attachment was created.
    pub created_at: DateTime<Utc>,
}

/// Metadata for an attachment to be recorded against a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAttachment {
    /// Original file name.
    pub name: String,
    /// Where the file content can be fetched.
    pub url: String,
    /// MIME type of the file.
    pub mime_type: String,
    /// File size in bytes.
    pub size_bytes: i64,
}
