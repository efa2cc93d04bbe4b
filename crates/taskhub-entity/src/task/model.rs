//! Task entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::attachment::Attachment;
use super::priority::TaskPriority;
use super::status::TaskStatus;
use super::subtask::SubTask;
use crate::team::Team;
use crate::user::UserSummary;

/// A unit of work tracked within a team.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    /// Unique task identifier.
    pub id: Uuid,
    /// Short summary of the work.
    pub title: String,
    /// Longer free-form description.
    pub content: Option<String>,
    /// Workflow state.
    pub status: TaskStatus,
    /// Urgency level.
    pub priority: TaskPriority,
    /// The team this task belongs to.
    pub team_id: Uuid,
    /// The user the task is assigned to, if any.
    pub assigned_to_id: Option<Uuid>,
    /// Optional deadline.
    pub due_date: Option<DateTime<Utc>>,
    /// When the task was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to create a new task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    /// Short summary of the work.
    pub title: String,
    /// Longer free-form description.
    pub content: Option<String>,
    /// Workflow state.
    pub status: TaskStatus,
    /// Urgency level.
    pub priority: TaskPriority,
    /// The team this task belongs to.
    pub team_id: Uuid,
    /// The user the task is assigned to, if any.
    pub assigned_to_id: Option<Uuid>,
    /// Optional deadline.
    pub due_date: Option<DateTime<Utc>>,
}

/// A task joined with its subtasks, attachments, team, and assignee.
///
/// This is the aggregate view returned by read operations; mutations
/// return it so clients never need a follow-up fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDetail {
    /// The task itself.
    #[serde(flatten)]
    pub task: Task,
    /// Subtasks ordered by creation time.
    pub subtasks: Vec<SubTask>,
    /// File attachments.
    pub attachments: Vec<Attachment>,
    /// The owning team.
    pub team: Team,
    /// The assignee's user summary, if assigned.
    pub assigned_to: Option<UserSummary>,
}
