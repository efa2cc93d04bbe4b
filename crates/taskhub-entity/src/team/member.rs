//! Team membership entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::role::TeamRole;
use crate::user::UserSummary;

/// A user's membership in a team.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TeamMember {
    /// Unique membership identifier.
    pub id: Uuid,
    /// The member's user ID.
    pub user_id: Uuid,
    /// The team the membership belongs to.
    pub team_id: Uuid,
    /// The member's role within the team.
    pub role: TeamRole,
    /// When the membership was created.
    pub created_at: DateTime<Utc>,
}

/// A membership joined with the member's user summary.
///
/// `is_current_user` is computed per-request relative to the viewing user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMemberDetail {
    /// Unique membership identifier.
    pub id: Uuid,
    /// The member's user ID.
    pub user_id: Uuid,
    /// The team the membership belongs to.
    pub team_id: Uuid,
    /// The member's role within the team.
    pub role: TeamRole,
    /// When the membership was created.
    pub created_at: DateTime<Utc>,
    /// The member's user summary.
    pub user: UserSummary,
    /// Whether this membership belongs to the viewing user.
    pub is_current_user: bool,
}
