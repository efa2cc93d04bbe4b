//! Task lifecycle, subtask, and attachment operations.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use taskhub_core::error::AppError;
use taskhub_database::repositories::TaskRepository;
use taskhub_entity::task::{
    CreateTask, NewAttachment, SubTask, Task, TaskDetail, TaskPriority, TaskStatus,
};

use crate::context::RequestContext;
use crate::membership::MembershipGuard;
use crate::task::assignment::AssignmentNotifier;

/// Input for creating a task with its initial subtasks and attachments.
#[derive(Debug, Clone)]
pub struct CreateTaskInput {
    /// Task title (minimum 3 characters).
    pub title: String,
    /// Free-form description.
    pub content: Option<String>,
    /// Initial workflow state.
    pub status: TaskStatus,
    /// Initial urgency.
    pub priority: TaskPriority,
    /// The team the task belongs to.
    pub team_id: Uuid,
    /// Initial assignee, if any.
    pub assigned_to_id: Option<Uuid>,
    /// Optional deadline.
    pub due_date: Option<DateTime<Utc>>,
    /// Titles of subtasks to create along with the task.
    pub subtasks: Vec<String>,
    /// Attachment metadata to record against the task.
    pub attachments: Vec<NewAttachment>,
}

/// Partial update for a task.
///
/// `None` leaves a field untouched. For the nullable fields an explicit
/// `Some(None)` clears the value.
#[derive(Debug, Clone, Default)]
pub struct UpdateTaskInput {
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
    /// New assignee; `Some(None)` unassigns.
    pub assigned_to_id: Option<Option<Uuid>>,
    /// New deadline; `Some(None)` clears it.
    pub due_date: Option<Option<DateTime<Utc>>>,
}

/// Partial update for a subtask.
#[derive(Debug, Clone, Default)]
pub struct UpdateSubtaskInput {
    /// New title.
    pub title: Option<String>,
    /// New completion flag.
    pub completed: Option<bool>,
}

/// A per-attachment failure recorded during task creation.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AttachmentFailure {
    /// The attachment's file name.
    pub name: String,
    /// What went wrong.
    pub reason: String,
}

/// Result of creating a task: the aggregate plus any attachments that
/// could not be recorded. Attachment failures do not fail the creation.
#[derive(Debug, Clone, serde::Serialize)]
pub struct TaskCreation {
    /// The created task aggregate.
    pub task: TaskDetail,
    /// Attachments that failed to record.
    pub failed_attachments: Vec<AttachmentFailure>,
}

/// Handles task CRUD, subtasks, and attachments.
#[derive(Clone)]
pub struct TaskService {
    /// Task repository.
    task_repo: Arc<dyn TaskRepository>,
    /// Membership authorization.
    guard: MembershipGuard,
    /// Post-commit assignment notifications.
    notifier: AssignmentNotifier,
}

impl TaskService {
    /// Creates a new task service.
    pub fn new(
        task_repo: Arc<dyn TaskRepository>,
        guard: MembershipGuard,
        notifier: AssignmentNotifier,
    ) -> Self {
        Self {
            task_repo,
            guard,
            notifier,
        }
    }

    /// Lists all tasks assigned to the current user, across teams.
    pub async fn list_my_tasks(&self, ctx: &RequestContext) -> Result<Vec<TaskDetail>, AppError> {
        self.task_repo.list_assigned(ctx.user_id).await
    }

    /// Lists all tasks of a team. Requires membership.
    pub async fn list_team_tasks(
        &self,
        ctx: &RequestContext,
        team_id: Uuid,
    ) -> Result<Vec<TaskDetail>, AppError> {
        self.guard
            .require_member(ctx.user_id, team_id, "You are not a member of this team")
            .await?;
        self.task_repo.list_for_team(team_id).await
    }

    /// Gets a single task aggregate. Requires membership in its team.
    pub async fn get_task(
        &self,
        ctx: &RequestContext,
        task_id: Uuid,
    ) -> Result<TaskDetail, AppError> {
        let task = self.require_task(task_id).await?;
        self.guard
            .require_member(
                ctx.user_id,
                task.team_id,
                "You are not authorized to view this task",
            )
            .await?;

        self.task_repo
            .find_detail(task_id)
            .await?
            .ok_or_else(|| AppError::not_found("Task not found"))
    }

    /// Creates a task with its subtasks and attachments. Requires team
    /// admin.
    ///
    /// Attachments are recorded best-effort: a failing attachment is
    /// reported back but never fails the task itself. If the task is
    /// created already assigned, the assignee is notified after the fact.
    pub async fn create_task(
        &self,
        ctx: &RequestContext,
        input: CreateTaskInput,
    ) -> Result<TaskCreation, AppError> {
        validate_title(&input.title)?;
        self.guard
            .require_admin(
                ctx.user_id,
                input.team_id,
                "Only team admins can create tasks",
            )
            .await?;

        let task = self
            .task_repo
            .create(&CreateTask {
                title: input.title,
                content: input.content,
                status: input.status,
                priority: input.priority,
                team_id: input.team_id,
                assigned_to_id: input.assigned_to_id,
                due_date: input.due_date,
            })
            .await?;

        for title in &input.subtasks {
            self.task_repo.create_subtask(task.id, title).await?;
        }

        let mut failed_attachments = Vec::new();
        for attachment in &input.attachments {
            if let Err(e) = self.task_repo.add_attachment(task.id, attachment).await {
                warn!(
                    task_id = %task.id,
                    name = %attachment.name,
                    error = %e,
                    "Failed to record attachment"
                );
                failed_attachments.push(AttachmentFailure {
                    name: attachment.name.clone(),
                    reason: e.message,
                });
            }
        }

        let detail = self
            .task_repo
            .find_detail(task.id)
            .await?
            .ok_or_else(|| AppError::internal("Created task disappeared"))?;

        info!(task_id = %task.id, team_id = %task.team_id, user_id = %ctx.user_id, "Task created");

        if let Some(assignee_id) = detail.task.assigned_to_id {
            self.notifier
                .task_assigned(
                    assignee_id,
                    detail.task.id,
                    &detail.task.title,
                    &detail.team.name,
                    true,
                )
                .await;
        }

        Ok(TaskCreation {
            task: detail,
            failed_attachments,
        })
    }

    /// Applies a partial update to a task. Requires membership in its
    /// team (any member may edit tasks; only admins create and delete).
    ///
    /// When the update hands the task to a different, non-empty assignee,
    /// that assignee is notified after the write committed.
    pub async fn update_task(
        &self,
        ctx: &RequestContext,
        task_id: Uuid,
        input: UpdateTaskInput,
    ) -> Result<TaskDetail, AppError> {
        let mut task = self.require_task(task_id).await?;
        self.guard
            .require_member(
                ctx.user_id,
                task.team_id,
                "You are not authorized to update this task",
            )
            .await?;

        if let Some(title) = &input.title {
            validate_title(title)?;
        }

        // An assignment change means the field was supplied and differs
        // from what is stored; re-submitting the current assignee is not
        // a change.
        let new_assignee = match input.assigned_to_id {
            Some(new) if new != task.assigned_to_id => Some(new),
            _ => None,
        };

        if let Some(title) = input.title {
            task.title = title;
        }
        if let Some(content) = input.content {
            task.content = Some(content);
        }
        if let Some(status) = input.status {
            task.status = status;
        }
        if let Some(priority) = input.priority {
            task.priority = priority;
        }
        // A move is authorized by membership in the task's current team;
        // the destination team is not checked.
        if let Some(team_id) = input.team_id {
            task.team_id = team_id;
        }
        if let Some(assigned_to_id) = input.assigned_to_id {
            task.assigned_to_id = assigned_to_id;
        }
        if let Some(due_date) = input.due_date {
            task.due_date = due_date;
        }

        self.task_repo.update(&task).await?;

        let detail = self
            .task_repo
            .find_detail(task_id)
            .await?
            .ok_or_else(|| AppError::not_found("Task not found"))?;

        // Only a transition to a real assignee notifies; unassigning stays
        // silent.
        if let Some(Some(assignee_id)) = new_assignee {
            self.notifier
                .task_assigned(
                    assignee_id,
                    detail.task.id,
                    &detail.task.title,
                    &detail.team.name,
                    false,
                )
                .await;
        }

        Ok(detail)
    }

    /// Deletes a task with its subtasks and attachments. Requires team
    /// admin.
    pub async fn delete_task(&self, ctx: &RequestContext, task_id: Uuid) -> Result<(), AppError> {
        let task = self.require_task(task_id).await?;
        self.guard
            .require_admin(
                ctx.user_id,
                task.team_id,
                "Only team admins can delete tasks",
            )
            .await?;

        self.task_repo.delete(task_id).await?;
        info!(task_id = %task_id, user_id = %ctx.user_id, "Task deleted");
        Ok(())
    }

    /// Adds a subtask to a task. Requires membership.
    pub async fn add_subtask(
        &self,
        ctx: &RequestContext,
        task_id: Uuid,
        title: &str,
    ) -> Result<SubTask, AppError> {
        let task = self.require_task(task_id).await?;
        self.guard
            .require_member(
                ctx.user_id,
                task.team_id,
                "You are not authorized to update this task",
            )
            .await?;

        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::validation("Subtask title cannot be empty"));
        }

        self.task_repo.create_subtask(task_id, title).await
    }

    /// Applies a partial update to a subtask. Requires membership in the
    /// parent task's team.
    pub async fn update_subtask(
        &self,
        ctx: &RequestContext,
        task_id: Uuid,
        subtask_id: Uuid,
        input: UpdateSubtaskInput,
    ) -> Result<SubTask, AppError> {
        let mut subtask = self.require_subtask(ctx, task_id, subtask_id).await?;

        if let Some(title) = input.title {
            let title = title.trim().to_string();
            if title.is_empty() {
                return Err(AppError::validation("Subtask title cannot be empty"));
            }
            subtask.title = title;
        }
        if let Some(completed) = input.completed {
            subtask.completed = completed;
        }

        self.task_repo.update_subtask(&subtask).await
    }

    /// Deletes a subtask. Requires membership in the parent task's team.
    pub async fn delete_subtask(
        &self,
        ctx: &RequestContext,
        task_id: Uuid,
        subtask_id: Uuid,
    ) -> Result<(), AppError> {
        self.require_subtask(ctx, task_id, subtask_id).await?;
        self.task_repo.delete_subtask(subtask_id).await?;
        Ok(())
    }

    async fn require_task(&self, task_id: Uuid) -> Result<Task, AppError> {
        self.task_repo
            .find_by_id(task_id)
            .await?
            .ok_or_else(|| AppError::not_found("Task not found"))
    }

    /// Loads a subtask under the given task and authorizes the caller
    /// against the parent task's team.
    async fn require_subtask(
        &self,
        ctx: &RequestContext,
        task_id: Uuid,
        subtask_id: Uuid,
    ) -> Result<SubTask, AppError> {
        let subtask = self
            .task_repo
            .find_subtask(subtask_id)
            .await?
            .filter(|s| s.task_id == task_id)
            .ok_or_else(|| AppError::not_found("Subtask not found"))?;

        let task = self.require_task(subtask.task_id).await?;
        self.guard
            .require_member(
                ctx.user_id,
                task.team_id,
                "You are not authorized to update this task",
            )
            .await?;

        Ok(subtask)
    }
}

fn validate_title(title: &str) -> Result<(), AppError> {
    if title.trim().len() < 3 {
        return Err(AppError::validation(
            "Title must be at least 3 characters long",
        ));
    }
    Ok(())
}
