//! Team membership authorization checks.
//!
//! Every team-scoped operation goes through [`MembershipGuard`] so the
//! two access rules — "must be a member" and "must be a team admin" —
//! live in one place instead of being re-derived per handler.

use std::sync::Arc;

use uuid::Uuid;

use taskhub_core::error::AppError;
use taskhub_database::repositories::TeamRepository;
use taskhub_entity::team::TeamMember;

/// Resolves and enforces a user's membership in a team.
#[derive(Clone)]
pub struct MembershipGuard {
    team_repo: Arc<dyn TeamRepository>,
}

impl MembershipGuard {
    /// Creates a new guard over the team repository.
    pub fn new(team_repo: Arc<dyn TeamRepository>) -> Self {
        Self { team_repo }
    }

    /// Requires that the user is a member of the team.
    ///
    /// Returns the membership on success; fails with a forbidden error
    /// carrying `denied` otherwise. Non-members learn nothing about
    /// whether the team exists.
    pub async fn require_member(
        &self,
        user_id: Uuid,
        team_id: Uuid,
        denied: &str,
    ) -> Result<TeamMember, AppError> {
        self.team_repo
            .membership(user_id, team_id)
            .await?
            .ok_or_else(|| AppError::forbidden(denied))
    }

    /// Requires that the user is an admin of the team.
    ///
    /// A non-member and a plain member get the same forbidden error.
    pub async fn require_admin(
        &self,
        user_id: Uuid,
        team_id: Uuid,
        denied: &str,
    ) -> Result<TeamMember, AppError> {
        let member = self.require_member(user_id, team_id, denied).await?;
        if !member.role.is_admin() {
            return Err(AppError::forbidden(denied));
        }
        Ok(member)
    }
}
