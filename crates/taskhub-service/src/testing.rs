//! In-memory repository implementations for service tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use taskhub_core::error::AppError;
use taskhub_core::result::AppResult;
use taskhub_core::types::pagination::{PageRequest, PageResponse};
use taskhub_database::repositories::{
    NotificationRepository, SessionRepository, TaskRepository, TeamRepository, UserRepository,
};
use taskhub_entity::notification::{Notification, NotificationDetail, NotificationTaskRef};
use taskhub_entity::session::Session;
use taskhub_entity::task::{
    Attachment, CreateTask, NewAttachment, SubTask, Task, TaskDetail,
};
use taskhub_entity::team::{Team, TeamMember, TeamMemberDetail, TeamRole, TeamWithMembers};
use taskhub_entity::user::{CreateUser, User, UserSummary};

/// A single in-memory store implementing every repository trait.
///
/// Rows live in plain vectors; insertion order stands in for
/// `created_at` ordering.
#[derive(Default)]
pub struct InMemoryStore {
    inner: Mutex<Inner>,
    /// When set, `add_attachment` fails with a database error.
    pub fail_attachments: AtomicBool,
    /// When set, notification creation fails with a database error.
    pub fail_notifications: AtomicBool,
}

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    sessions: Vec<Session>,
    teams: Vec<Team>,
    members: Vec<TeamMember>,
    tasks: Vec<Task>,
    subtasks: Vec<SubTask>,
    attachments: Vec<Attachment>,
    notifications: Vec<Notification>,
}

impl InMemoryStore {
    pub fn seed_user(&self, username: &str, email: &str) -> User {
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "unused".to_string(),
            created_at: Utc::now(),
        };
        self.inner.lock().unwrap().users.push(user.clone());
        user
    }

    pub fn seed_team(&self, name: &str) -> Team {
        let team = Team {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_at: Utc::now(),
        };
        self.inner.lock().unwrap().teams.push(team.clone());
        team
    }

    pub fn seed_member(&self, user_id: Uuid, team_id: Uuid, role: TeamRole) -> TeamMember {
        let member = TeamMember {
            id: Uuid::new_v4(),
            user_id,
            team_id,
            role,
            created_at: Utc::now(),
        };
        self.inner.lock().unwrap().members.push(member.clone());
        member
    }

    pub fn notifications_for(&self, user_id: Uuid) -> Vec<Notification> {
        self.inner
            .lock()
            .unwrap()
            .notifications
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn subtask_count(&self, task_id: Uuid) -> usize {
        self.inner
            .lock()
            .unwrap()
            .subtasks
            .iter()
            .filter(|s| s.task_id == task_id)
            .count()
    }

    pub fn task_exists(&self, task_id: Uuid) -> bool {
        self.inner.lock().unwrap().tasks.iter().any(|t| t.id == task_id)
    }

    pub fn member_exists(&self, member_id: Uuid) -> bool {
        self.inner
            .lock()
            .unwrap()
            .members
            .iter()
            .any(|m| m.id == member_id)
    }

    fn detail_for(inner: &Inner, task: &Task) -> Option<TaskDetail> {
        let team = inner.teams.iter().find(|t| t.id == task.team_id)?.clone();
        let assigned_to = task.assigned_to_id.and_then(|id| {
            inner.users.iter().find(|u| u.id == id).map(User::summary)
        });
        Some(TaskDetail {
            task: task.clone(),
            subtasks: inner
                .subtasks
                .iter()
                .filter(|s| s.task_id == task.id)
                .cloned()
                .collect(),
            attachments: inner
                .attachments
                .iter()
                .filter(|a| a.task_id == task.id)
                .cloned()
                .collect(),
            team,
            assigned_to,
        })
    }

    fn roster_for(inner: &Inner, team_id: Uuid) -> Vec<TeamMemberDetail> {
        inner
            .members
            .iter()
            .filter(|m| m.team_id == team_id)
            .filter_map(|m| {
                let user = inner.users.iter().find(|u| u.id == m.user_id)?;
                Some(TeamMemberDetail {
                    id: m.id,
                    user_id: m.user_id,
                    team_id: m.team_id,
                    role: m.role,
                    created_at: m.created_at,
                    user: user.summary(),
                    is_current_user: false,
                })
            })
            .collect()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|u| u.id == id)
            .cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create(&self, data: &CreateUser) -> AppResult<User> {
        let mut inner = self.inner.lock().unwrap();
        if inner.users.iter().any(|u| u.email == data.email) {
            return Err(AppError::conflict("User with this email already exists"));
        }
        if inner.users.iter().any(|u| u.username == data.username) {
            return Err(AppError::conflict("Username is already taken"));
        }
        let user = User {
            id: Uuid::new_v4(),
            username: data.username.clone(),
            email: data.email.clone(),
            password_hash: data.password_hash.clone(),
            created_at: Utc::now(),
        };
        inner.users.push(user.clone());
        Ok(user)
    }
}

#[async_trait]
impl SessionRepository for InMemoryStore {
    async fn create(&self, user_id: Uuid, expires_at: DateTime<Utc>) -> AppResult<Session> {
        let session = Session {
            id: Uuid::new_v4(),
            user_id,
            created_at: Utc::now(),
            expires_at,
            terminated_at: None,
        };
        self.inner.lock().unwrap().sessions.push(session.clone());
        Ok(session)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Session>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .sessions
            .iter()
            .find(|s| s.id == id)
            .cloned())
    }

    async fn terminate(&self, id: Uuid) -> AppResult<bool> {
        let mut inner = self.inner.lock().unwrap();
        match inner
            .sessions
            .iter_mut()
            .find(|s| s.id == id && s.terminated_at.is_none())
        {
            Some(session) => {
                session.terminated_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl TeamRepository for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Team>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .teams
            .iter()
            .find(|t| t.id == id)
            .cloned())
    }

    async fn find_with_members(&self, id: Uuid) -> AppResult<Option<TeamWithMembers>> {
        let inner = self.inner.lock().unwrap();
        let Some(team) = inner.teams.iter().find(|t| t.id == id).cloned() else {
            return Ok(None);
        };
        let members = Self::roster_for(&inner, id);
        Ok(Some(TeamWithMembers { team, members }))
    }

    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<TeamWithMembers>> {
        let inner = self.inner.lock().unwrap();
        let team_ids: Vec<Uuid> = inner
            .members
            .iter()
            .filter(|m| m.user_id == user_id)
            .map(|m| m.team_id)
            .collect();
        Ok(inner
            .teams
            .iter()
            .filter(|t| team_ids.contains(&t.id))
            .map(|team| TeamWithMembers {
                team: team.clone(),
                members: Self::roster_for(&inner, team.id),
            })
            .collect())
    }

    async fn create(&self, name: &str, creator_id: Uuid) -> AppResult<Team> {
        let mut inner = self.inner.lock().unwrap();
        let team = Team {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_at: Utc::now(),
        };
        inner.teams.push(team.clone());
        inner.members.push(TeamMember {
            id: Uuid::new_v4(),
            user_id: creator_id,
            team_id: team.id,
            role: TeamRole::Admin,
            created_at: Utc::now(),
        });
        Ok(team)
    }

    async fn rename(&self, id: Uuid, name: &str) -> AppResult<Option<Team>> {
        let mut inner = self.inner.lock().unwrap();
        match inner.teams.iter_mut().find(|t| t.id == id) {
            Some(team) => {
                team.name = name.to_string();
                Ok(Some(team.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut inner = self.inner.lock().unwrap();
        let existed = inner.teams.iter().any(|t| t.id == id);
        inner.teams.retain(|t| t.id != id);
        inner.members.retain(|m| m.team_id != id);
        Ok(existed)
    }

    async fn membership(&self, user_id: Uuid, team_id: Uuid) -> AppResult<Option<TeamMember>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .members
            .iter()
            .find(|m| m.user_id == user_id && m.team_id == team_id)
            .cloned())
    }

    async fn find_member(&self, member_id: Uuid) -> AppResult<Option<TeamMember>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .members
            .iter()
            .find(|m| m.id == member_id)
            .cloned())
    }

    async fn add_member(
        &self,
        team_id: Uuid,
        user_id: Uuid,
        role: TeamRole,
    ) -> AppResult<TeamMember> {
        let mut inner = self.inner.lock().unwrap();
        if inner
            .members
            .iter()
            .any(|m| m.user_id == user_id && m.team_id == team_id)
        {
            return Err(AppError::conflict("User is already a member of this team"));
        }
        let member = TeamMember {
            id: Uuid::new_v4(),
            user_id,
            team_id,
            role,
            created_at: Utc::now(),
        };
        inner.members.push(member.clone());
        Ok(member)
    }

    async fn remove_member(&self, member_id: Uuid) -> AppResult<bool> {
        let mut inner = self.inner.lock().unwrap();
        let existed = inner.members.iter().any(|m| m.id == member_id);
        inner.members.retain(|m| m.id != member_id);
        Ok(existed)
    }
}

#[async_trait]
impl TaskRepository for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Task>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .tasks
            .iter()
            .find(|t| t.id == id)
            .cloned())
    }

    async fn find_detail(&self, id: Uuid) -> AppResult<Option<TaskDetail>> {
        let inner = self.inner.lock().unwrap();
        let Some(task) = inner.tasks.iter().find(|t| t.id == id).cloned() else {
            return Ok(None);
        };
        Ok(Self::detail_for(&inner, &task))
    }

    async fn list_assigned(&self, user_id: Uuid) -> AppResult<Vec<TaskDetail>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .tasks
            .iter()
            .rev()
            .filter(|t| t.assigned_to_id == Some(user_id))
            .filter_map(|t| Self::detail_for(&inner, t))
            .collect())
    }

    async fn list_for_team(&self, team_id: Uuid) -> AppResult<Vec<TaskDetail>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .tasks
            .iter()
            .rev()
            .filter(|t| t.team_id == team_id)
            .filter_map(|t| Self::detail_for(&inner, t))
            .collect())
    }

    async fn create(&self, data: &CreateTask) -> AppResult<Task> {
        let task = Task {
            id: Uuid::new_v4(),
            title: data.title.clone(),
            content: data.content.clone(),
            status: data.status,
            priority: data.priority,
            team_id: data.team_id,
            assigned_to_id: data.assigned_to_id,
            due_date: data.due_date,
            created_at: Utc::now(),
        };
        self.inner.lock().unwrap().tasks.push(task.clone());
        Ok(task)
    }

    async fn update(&self, task: &Task) -> AppResult<Task> {
        let mut inner = self.inner.lock().unwrap();
        match inner.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(existing) => {
                *existing = task.clone();
                Ok(existing.clone())
            }
            None => Err(AppError::not_found("Task not found")),
        }
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut inner = self.inner.lock().unwrap();
        let existed = inner.tasks.iter().any(|t| t.id == id);
        inner.tasks.retain(|t| t.id != id);
        inner.subtasks.retain(|s| s.task_id != id);
        inner.attachments.retain(|a| a.task_id != id);
        Ok(existed)
    }

    async fn create_subtask(&self, task_id: Uuid, title: &str) -> AppResult<SubTask> {
        let subtask = SubTask {
            id: Uuid::new_v4(),
            title: title.to_string(),
            completed: false,
            task_id,
            created_at: Utc::now(),
        };
        self.inner.lock().unwrap().subtasks.push(subtask.clone());
        Ok(subtask)
    }

    async fn find_subtask(&self, id: Uuid) -> AppResult<Option<SubTask>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .subtasks
            .iter()
            .find(|s| s.id == id)
            .cloned())
    }

    async fn update_subtask(&self, subtask: &SubTask) -> AppResult<SubTask> {
        let mut inner = self.inner.lock().unwrap();
        match inner.subtasks.iter_mut().find(|s| s.id == subtask.id) {
            Some(existing) => {
                *existing = subtask.clone();
                Ok(existing.clone())
            }
            None => Err(AppError::not_found("Subtask not found")),
        }
    }

    async fn delete_subtask(&self, id: Uuid) -> AppResult<bool> {
        let mut inner = self.inner.lock().unwrap();
        let existed = inner.subtasks.iter().any(|s| s.id == id);
        inner.subtasks.retain(|s| s.id != id);
        Ok(existed)
    }

    async fn add_attachment(&self, task_id: Uuid, data: &NewAttachment) -> AppResult<Attachment> {
        if self.fail_attachments.load(Ordering::SeqCst) {
            return Err(AppError::database("Failed to add attachment"));
        }
        let attachment = Attachment {
            id: Uuid::new_v4(),
            name: data.name.clone(),
            url: data.url.clone(),
            mime_type: data.mime_type.clone(),
            size_bytes: data.size_bytes,
            task_id,
            created_at: Utc::now(),
        };
        self.inner
            .lock()
            .unwrap()
            .attachments
            .push(attachment.clone());
        Ok(attachment)
    }
}

#[async_trait]
impl NotificationRepository for InMemoryStore {
    async fn create(
        &self,
        user_id: Uuid,
        kind: &str,
        message: &str,
        task_id: Option<Uuid>,
    ) -> AppResult<Notification> {
        if self.fail_notifications.load(Ordering::SeqCst) {
            return Err(AppError::database("Failed to create notification"));
        }
        let notification = Notification {
            id: Uuid::new_v4(),
            kind: kind.to_string(),
            message: message.to_string(),
            user_id,
            task_id,
            is_read: false,
            created_at: Utc::now(),
        };
        self.inner
            .lock()
            .unwrap()
            .notifications
            .push(notification.clone());
        Ok(notification)
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<NotificationDetail>> {
        let inner = self.inner.lock().unwrap();
        let all: Vec<NotificationDetail> = inner
            .notifications
            .iter()
            .rev()
            .filter(|n| n.user_id == user_id)
            .map(|n| {
                let task = n.task_id.and_then(|task_id| {
                    let task = inner.tasks.iter().find(|t| t.id == task_id)?;
                    let team = inner.teams.iter().find(|t| t.id == task.team_id)?;
                    Some(NotificationTaskRef {
                        id: task.id,
                        title: task.title.clone(),
                        team_id: task.team_id,
                        team_name: team.name.clone(),
                    })
                });
                NotificationDetail {
                    notification: n.clone(),
                    task,
                }
            })
            .collect();
        let total = all.len() as u64;
        let items = all
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();
        Ok(PageResponse::new(items, page.page, page.page_size, total))
    }

    async fn mark_read(&self, user_id: Uuid, ids: &[Uuid]) -> AppResult<u64> {
        let mut inner = self.inner.lock().unwrap();
        let mut updated = 0;
        for notification in inner
            .notifications
            .iter_mut()
            .filter(|n| n.user_id == user_id && ids.contains(&n.id))
        {
            notification.is_read = true;
            updated += 1;
        }
        Ok(updated)
    }

    async fn mark_all_read(&self, user_id: Uuid) -> AppResult<u64> {
        let mut inner = self.inner.lock().unwrap();
        let mut updated = 0;
        for notification in inner
            .notifications
            .iter_mut()
            .filter(|n| n.user_id == user_id && !n.is_read)
        {
            notification.is_read = true;
            updated += 1;
        }
        Ok(updated)
    }
}

/// A throwaway request context for a seeded user.
pub fn ctx_for(user: &User) -> crate::context::RequestContext {
    crate::context::RequestContext::new(
        user.id,
        Uuid::new_v4(),
        user.username.clone(),
        user.email.clone(),
    )
}
