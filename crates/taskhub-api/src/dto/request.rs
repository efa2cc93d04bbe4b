//! Request DTOs with validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use validator::Validate;

use taskhub_core::error::AppError;
use taskhub_entity::task::{NewAttachment, TaskPriority, TaskStatus};
use taskhub_entity::team::TeamRole;

/// Runs derive-based validation and converts failures into a
/// per-field details object.
pub fn validated<T: Validate>(req: T) -> Result<T, AppError> {
    if let Err(errors) = req.validate() {
        let details = serde_json::to_value(&errors).ok();
        let mut err = AppError::validation("Request validation failed");
        err.details = details;
        return Err(err);
    }
    Ok(req)
}

/// Distinguishes an absent JSON field from an explicit `null`.
///
/// Used with `#[serde(default)]`: a missing field stays `None`, `null`
/// becomes `Some(None)`, and a value becomes `Some(Some(v))`.
fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(de).map(Some)
}

/// Registration request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Desired username.
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    /// Email address.
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    /// Plaintext password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address.
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    /// Plaintext password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Create team request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTeamRequest {
    /// Team name.
    #[validate(length(min = 1, max = 100, message = "Team name is required"))]
    pub name: String,
}

/// Rename team request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RenameTeamRequest {
    /// New team name.
    #[validate(length(min = 1, max = 100, message = "Team name is required"))]
    pub name: String,
}

/// Add team member request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddMemberRequest {
    /// Email of the user to add.
    pub email: String,
    /// Role for the new member; defaults to `member`.
    #[serde(default)]
    pub role: Option<TeamRole>,
}

/// Attachment metadata supplied when creating a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachmentRequest {
    /// Original file name.
    pub name: String,
    /// Where the file content can be fetched.
    pub url: String,
    /// MIME type of the file.
    pub mime_type: String,
    /// File size in bytes.
    pub size_bytes: i64,
}

impl From<AttachmentRequest> for NewAttachment {
    fn from(req: AttachmentRequest) -> Self {
        Self {
            name: req.name,
            url: req.url,
            mime_type: req.mime_type,
            size_bytes: req.size_bytes,
        }
    }
}

/// Create task request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Task title.
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    /// Free-form description.
    pub content: Option<String>,
    /// Initial workflow state; defaults to `todo`.
    #[serde(default)]
    pub status: TaskStatus,
    /// Initial urgency; defaults to `medium`.
    #[serde(default)]
    pub priority: TaskPriority,
    /// The team the task belongs to.
    pub team_id: Uuid,
    /// Initial assignee, if any.
    pub assigned_to_id: Option<Uuid>,
    /// Optional deadline.
    pub due_date: Option<DateTime<Utc>>,
    /// Subtask titles to create along with the task.
    #[serde(default)]
    pub subtasks: Vec<String>,
    /// Attachment metadata to register against the task.
    #[serde(default)]
    pub attachments: Vec<AttachmentRequest>,
}

/// Partial task update request.
///
/// Omitted fields are left untouched; `assigned_to_id` and `due_date`
/// accept an explicit `null` to clear the value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTaskRequest {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub content: Option<String>,
    /// New workflow state.
    pub status: Option<TaskStatus>,
    /// New urgency.
    pub priority: Option<TaskPriority>,
    /// Move the task to another team.
    pub team_id: Option<Uuid>,
    /// New assignee; `null` unassigns.
    #[serde(default, deserialize_with = "double_option")]
    pub assigned_to_id: Option<Option<Uuid>>,
    /// New deadline; `null` clears it.
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<DateTime<Utc>>>,
}

/// Create subtask request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateSubtaskRequest {
    /// Subtask title.
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
}

/// Partial subtask update request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSubtaskRequest {
    /// New title.
    pub title: Option<String>,
    /// New completion flag.
    pub completed: Option<bool>,
}

/// Mark-notifications-read request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkReadRequest {
    /// IDs of notifications to mark as read.
    pub notification_ids: Vec<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_task_distinguishes_null_from_absent() {
        let absent: UpdateTaskRequest = serde_json::from_str(r#"{"title":"t"}"#).unwrap();
        assert_eq!(absent.assigned_to_id, None);

        let null: UpdateTaskRequest =
            serde_json::from_str(r#"{"assigned_to_id":null}"#).unwrap();
        assert_eq!(null.assigned_to_id, Some(None));

        let id = Uuid::new_v4();
        let set: UpdateTaskRequest =
            serde_json::from_str(&format!(r#"{{"assigned_to_id":"{id}"}}"#)).unwrap();
        assert_eq!(set.assigned_to_id, Some(Some(id)));
    }

    #[test]
    fn create_task_defaults_status_and_priority() {
        let req: CreateTaskRequest = serde_json::from_str(&format!(
            r#"{{"title":"write docs","team_id":"{}"}}"#,
            Uuid::new_v4()
        ))
        .unwrap();
        assert_eq!(req.status, TaskStatus::Todo);
        assert_eq!(req.priority, TaskPriority::Medium);
        assert!(req.subtasks.is_empty());
    }

    #[test]
    fn validated_rejects_blank_title() {
        let req = CreateSubtaskRequest {
            title: String::new(),
        };
        assert!(validated(req).is_err());
    }
}
