//! Task, subtask, and attachment repository.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use taskhub_core::error::{AppError, ErrorKind};
use taskhub_core::result::AppResult;
use taskhub_entity::task::{
    Attachment, CreateTask, NewAttachment, SubTask, Task, TaskDetail, TaskPriority, TaskStatus,
};
use taskhub_entity::team::Team;
use taskhub_entity::user::UserSummary;

/// Columns selected for the task aggregate join.
const DETAIL_SELECT: &str = "SELECT t.id, t.title, t.content, t.status, t.priority, \
            t.team_id, t.assigned_to_id, t.due_date, t.created_at, \
            tm.name AS team_name, tm.created_at AS team_created_at, \
            u.username AS assignee_username, u.email AS assignee_email \
     FROM tasks t \
     JOIN teams tm ON tm.id = t.team_id \
     LEFT JOIN users u ON u.id = t.assigned_to_id";

/// Storage operations for tasks and their child records.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Find a bare task row by primary key (no children joined).
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Task>>;

    /// Find a task with its subtasks, attachments, team, and assignee.
    async fn find_detail(&self, id: Uuid) -> AppResult<Option<TaskDetail>>;

    /// List all tasks assigned to a user, newest first.
    async fn list_assigned(&self, user_id: Uuid) -> AppResult<Vec<TaskDetail>>;

    /// List all tasks of a team, newest first.
    async fn list_for_team(&self, team_id: Uuid) -> AppResult<Vec<TaskDetail>>;

    /// Create a new task.
    async fn create(&self, data: &CreateTask) -> AppResult<Task>;

    /// Persist all mutable columns of a task.
    async fn update(&self, task: &Task) -> AppResult<Task>;

    /// Delete a task along with its subtasks and attachments. Returns
    /// `false` if the task does not exist.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Create a subtask under a task.
    async fn create_subtask(&self, task_id: Uuid, title: &str) -> AppResult<SubTask>;

    /// Find a subtask by primary key.
    async fn find_subtask(&self, id: Uuid) -> AppResult<Option<SubTask>>;

    /// Persist a subtask's title and completion flag.
    async fn update_subtask(&self, subtask: &SubTask) -> AppResult<SubTask>;

    /// Delete a subtask. Returns `false` if it does not exist.
    async fn delete_subtask(&self, id: Uuid) -> AppResult<bool>;

    /// Record an attachment's metadata against a task.
    async fn add_attachment(&self, task_id: Uuid, data: &NewAttachment) -> AppResult<Attachment>;
}

/// PostgreSQL-backed [`TaskRepository`].
#[derive(Debug, Clone)]
pub struct PgTaskRepository {
    pool: PgPool,
}

impl PgTaskRepository {
    /// Create a new task repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Attach subtasks and attachments to a batch of joined task rows.
    async fn assemble(&self, rows: Vec<TaskDetailRow>) -> AppResult<Vec<TaskDetail>> {
        let task_ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();

        let subtasks = sqlx::query_as::<_, SubTask>(
            "SELECT * FROM subtasks WHERE task_id = ANY($1) ORDER BY created_at ASC",
        )
        .bind(&task_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load subtasks", e))?;

        let attachments = sqlx::query_as::<_, Attachment>(
            "SELECT * FROM attachments WHERE task_id = ANY($1) ORDER BY created_at ASC",
        )
        .bind(&task_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to load attachments", e)
        })?;

        let mut subtasks_by_task: HashMap<Uuid, Vec<SubTask>> = HashMap::new();
        for subtask in subtasks {
            subtasks_by_task
                .entry(subtask.task_id)
                .or_default()
                .push(subtask);
        }

        let mut attachments_by_task: HashMap<Uuid, Vec<Attachment>> = HashMap::new();
        for attachment in attachments {
            attachments_by_task
                .entry(attachment.task_id)
                .or_default()
                .push(attachment);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let subtasks = subtasks_by_task.remove(&row.id).unwrap_or_default();
                let attachments = attachments_by_task.remove(&row.id).unwrap_or_default();
                row.into_detail(subtasks, attachments)
            })
            .collect())
    }
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Task>> {
        sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find task", e))
    }

    async fn find_detail(&self, id: Uuid) -> AppResult<Option<TaskDetail>> {
        let row = sqlx::query_as::<_, TaskDetailRow>(&format!("{DETAIL_SELECT} WHERE t.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to load task detail", e)
            })?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut details = self.assemble(vec![row]).await?;
        Ok(details.pop())
    }

    async fn list_assigned(&self, user_id: Uuid) -> AppResult<Vec<TaskDetail>> {
        let rows = sqlx::query_as::<_, TaskDetailRow>(&format!(
            "{DETAIL_SELECT} WHERE t.assigned_to_id = $1 ORDER BY t.created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list assigned tasks", e)
        })?;

        self.assemble(rows).await
    }

    async fn list_for_team(&self, team_id: Uuid) -> AppResult<Vec<TaskDetail>> {
        let rows = sqlx::query_as::<_, TaskDetailRow>(&format!(
            "{DETAIL_SELECT} WHERE t.team_id = $1 ORDER BY t.created_at DESC"
        ))
        .bind(team_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list team tasks", e))?;

        self.assemble(rows).await
    }

    async fn create(&self, data: &CreateTask) -> AppResult<Task> {
        sqlx::query_as::<_, Task>(
            "INSERT INTO tasks (title, content, status, priority, team_id, assigned_to_id, due_date) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING *",
        )
        .bind(&data.title)
        .bind(&data.content)
        .bind(data.status)
        .bind(data.priority)
        .bind(data.team_id)
        .bind(data.assigned_to_id)
        .bind(data.due_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create task", e))
    }

    async fn update(&self, task: &Task) -> AppResult<Task> {
        sqlx::query_as::<_, Task>(
            "UPDATE tasks SET title = $2, content = $3, status = $4, priority = $5, \
                              team_id = $6, assigned_to_id = $7, due_date = $8 \
             WHERE id = $1 RETURNING *",
        )
        .bind(task.id)
        .bind(&task.title)
        .bind(&task.content)
        .bind(task.status)
        .bind(task.priority)
        .bind(task.team_id)
        .bind(task.assigned_to_id)
        .bind(task.due_date)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update task", e))?
        .ok_or_else(|| AppError::not_found("Task not found"))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        sqlx::query("DELETE FROM subtasks WHERE task_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete subtasks", e)
            })?;

        sqlx::query("DELETE FROM attachments WHERE task_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete attachments", e)
            })?;

        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete task", e))?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit task deletion", e)
        })?;

        Ok(result.rows_affected() > 0)
    }

    async fn create_subtask(&self, task_id: Uuid, title: &str) -> AppResult<SubTask> {
        sqlx::query_as::<_, SubTask>(
            "INSERT INTO subtasks (title, task_id) VALUES ($1, $2) RETURNING *",
        )
        .bind(title)
        .bind(task_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create subtask", e))
    }

    async fn find_subtask(&self, id: Uuid) -> AppResult<Option<SubTask>> {
        sqlx::query_as::<_, SubTask>("SELECT * FROM subtasks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find subtask", e))
    }

    async fn update_subtask(&self, subtask: &SubTask) -> AppResult<SubTask> {
        sqlx::query_as::<_, SubTask>(
            "UPDATE subtasks SET title = $2, completed = $3 WHERE id = $1 RETURNING *",
        )
        .bind(subtask.id)
        .bind(&subtask.title)
        .bind(subtask.completed)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update subtask", e))?
        .ok_or_else(|| AppError::not_found("Subtask not found"))
    }

    async fn delete_subtask(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM subtasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete subtask", e)
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn add_attachment(&self, task_id: Uuid, data: &NewAttachment) -> AppResult<Attachment> {
        sqlx::query_as::<_, Attachment>(
            "INSERT INTO attachments (name, url, mime_type, size_bytes, task_id) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING *",
        )
        .bind(&data.name)
        .bind(&data.url)
        .bind(&data.mime_type)
        .bind(data.size_bytes)
        .bind(task_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to add attachment", e))
    }
}

/// Flat row for the task aggregate join.
#[derive(Debug, FromRow)]
struct TaskDetailRow {
    id: Uuid,
    title: String,
    content: Option<String>,
    status: TaskStatus,
    priority: TaskPriority,
    team_id: Uuid,
    assigned_to_id: Option<Uuid>,
    due_date: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    team_name: String,
    team_created_at: DateTime<Utc>,
    assignee_username: Option<String>,
    assignee_email: Option<String>,
}

impl TaskDetailRow {
    fn into_detail(self, subtasks: Vec<SubTask>, attachments: Vec<Attachment>) -> TaskDetail {
        let assigned_to = match (self.assigned_to_id, self.assignee_username, self.assignee_email)
        {
            (Some(id), Some(username), Some(email)) => Some(UserSummary {
                id,
                username,
                email,
            }),
            _ => None,
        };

        TaskDetail {
            task: Task {
                id: self.id,
                title: self.title,
                content: self.content,
                status: self.status,
                priority: self.priority,
                team_id: self.team_id,
                assigned_to_id: self.assigned_to_id,
                due_date: self.due_date,
                created_at: self.created_at,
            },
            subtasks,
            attachments,
            team: Team {
                id: self.team_id,
                name: self.team_name,
                created_at: self.team_created_at,
            },
            assigned_to,
        }
    }
}
