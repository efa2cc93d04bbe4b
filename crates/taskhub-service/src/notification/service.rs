//! Notification feed operations.

use std::sync::Arc;

use uuid::Uuid;

use taskhub_core::error::AppError;
use taskhub_core::types::pagination::{PageRequest, PageResponse};
use taskhub_database::repositories::NotificationRepository;
use taskhub_entity::notification::NotificationDetail;

use crate::context::RequestContext;

/// Handles a user's notification feed.
#[derive(Clone)]
pub struct NotificationService {
    /// Notification repository.
    notification_repo: Arc<dyn NotificationRepository>,
}

impl NotificationService {
    /// Creates a new notification service.
    pub fn new(notification_repo: Arc<dyn NotificationRepository>) -> Self {
        Self { notification_repo }
    }

    /// Lists the current user's notifications, newest first.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        page: &PageRequest,
    ) -> Result<PageResponse<NotificationDetail>, AppError> {
        self.notification_repo.list_for_user(ctx.user_id, page).await
    }

    /// Marks the given notifications as read. Rows belonging to other
    /// users are silently skipped; the returned count covers only rows
    /// actually updated.
    pub async fn mark_read(&self, ctx: &RequestContext, ids: &[Uuid]) -> Result<u64, AppError> {
        if ids.is_empty() {
            return Err(AppError::validation("notification_ids cannot be empty"));
        }
        self.notification_repo.mark_read(ctx.user_id, ids).await
    }

    /// Marks all of the current user's notifications as read.
    pub async fn mark_all_read(&self, ctx: &RequestContext) -> Result<u64, AppError> {
        self.notification_repo.mark_all_read(ctx.user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{InMemoryStore, ctx_for};
    use taskhub_core::error::ErrorKind;
    use taskhub_database::repositories::NotificationRepository as _;

    #[tokio::test]
    async fn mark_read_is_scoped_to_the_owner() {
        let store = Arc::new(InMemoryStore::default());
        let alice = store.seed_user("alice", "alice@example.com");
        let bob = store.seed_user("bob", "bob@example.com");

        let mine = store
            .create(alice.id, "task_assigned", "for alice", None)
            .await
            .unwrap();
        let theirs = store
            .create(bob.id, "task_assigned", "for bob", None)
            .await
            .unwrap();

        let svc = NotificationService::new(store.clone());
        let updated = svc
            .mark_read(&ctx_for(&alice), &[mine.id, theirs.id])
            .await
            .unwrap();

        assert_eq!(updated, 1);
        assert!(!store.notifications_for(bob.id)[0].is_read);
    }

    #[tokio::test]
    async fn mark_read_rejects_empty_id_list() {
        let store = Arc::new(InMemoryStore::default());
        let alice = store.seed_user("alice", "alice@example.com");

        let err = NotificationService::new(store)
            .mark_read(&ctx_for(&alice), &[])
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn list_is_newest_first_and_paginated() {
        let store = Arc::new(InMemoryStore::default());
        let alice = store.seed_user("alice", "alice@example.com");

        for i in 0..3 {
            store
                .create(alice.id, "task_assigned", &format!("message {i}"), None)
                .await
                .unwrap();
        }

        let svc = NotificationService::new(store);
        let page = svc
            .list(&ctx_for(&alice), &PageRequest::new(1, 2))
            .await
            .unwrap();

        assert_eq!(page.total_items, 3);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].notification.message, "message 2");
        assert!(page.has_next);
    }

    #[tokio::test]
    async fn mark_all_read_returns_count() {
        let store = Arc::new(InMemoryStore::default());
        let alice = store.seed_user("alice", "alice@example.com");

        for _ in 0..2 {
            store
                .create(alice.id, "task_assigned", "unread", None)
                .await
                .unwrap();
        }

        let svc = NotificationService::new(store.clone());
        let ctx = ctx_for(&alice);
        assert_eq!(svc.mark_all_read(&ctx).await.unwrap(), 2);
        assert_eq!(svc.mark_all_read(&ctx).await.unwrap(), 0);
    }
}
