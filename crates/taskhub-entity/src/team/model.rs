//! Team entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::member::TeamMemberDetail;

/// A team grouping users and tasks.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Team {
    /// Unique team identifier.
    pub id: Uuid,
    /// Team display name.
    pub name: String,
    /// When the team was created.
    pub created_at: DateTime<Utc>,
}

/// A team together with its full member roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamWithMembers {
    /// The team itself.
    #[serde(flatten)]
    pub team: Team,
    /// All memberships, each with the member's user summary.
    pub members: Vec<TeamMemberDetail>,
}
