//! Assignment notifications.
//!
//! Fired after a task mutation has committed. A notification failure
//! must never fail the mutation that triggered it, so errors are logged
//! and swallowed here.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use taskhub_database::repositories::NotificationRepository;
use taskhub_entity::notification::KIND_TASK_ASSIGNED;

/// Writes "you have been assigned" notifications into assignees' feeds.
#[derive(Clone)]
pub struct AssignmentNotifier {
    notifications: Arc<dyn NotificationRepository>,
}

impl AssignmentNotifier {
    /// Creates a new notifier.
    pub fn new(notifications: Arc<dyn NotificationRepository>) -> Self {
        Self { notifications }
    }

    /// Notifies a user that a task was assigned to them.
    ///
    /// `newly_created` selects the wording for a fresh task versus a
    /// reassignment of an existing one.
    pub async fn task_assigned(
        &self,
        assignee_id: Uuid,
        task_id: Uuid,
        task_title: &str,
        team_name: &str,
        newly_created: bool,
    ) {
        let message = if newly_created {
            format!("You have been assigned a new task \"{task_title}\" in team \"{team_name}\"")
        } else {
            format!("You have been assigned to task \"{task_title}\" in team \"{team_name}\"")
        };

        match self
            .notifications
            .create(assignee_id, KIND_TASK_ASSIGNED, &message, Some(task_id))
            .await
        {
            Ok(_) => {
                info!(user_id = %assignee_id, task_id = %task_id, "Assignment notification sent");
            }
            Err(e) => {
                warn!(
                    user_id = %assignee_id,
                    task_id = %task_id,
                    error = %e,
                    "Failed to create assignment notification"
                );
            }
        }
    }
}
