//! Team and membership repository.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use taskhub_core::error::{AppError, ErrorKind};
use taskhub_core::result::AppResult;
use taskhub_entity::team::{Team, TeamMember, TeamMemberDetail, TeamRole, TeamWithMembers};
use taskhub_entity::user::UserSummary;

/// Storage operations for teams and their memberships.
///
/// Roster queries return `is_current_user` as `false`; the service layer
/// marks the viewing user's row since that is a per-request concern.
#[async_trait]
pub trait TeamRepository: Send + Sync {
    /// Find a team by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Team>>;

    /// Find a team together with its full member roster.
    async fn find_with_members(&self, id: Uuid) -> AppResult<Option<TeamWithMembers>>;

    /// List all teams the user belongs to, each with its roster.
    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<TeamWithMembers>>;

    /// Create a team and enroll the creator as its admin in one transaction.
    async fn create(&self, name: &str, creator_id: Uuid) -> AppResult<Team>;

    /// Rename a team. Returns `None` if the team does not exist.
    async fn rename(&self, id: Uuid, name: &str) -> AppResult<Option<Team>>;

    /// Delete a team along with its memberships. Returns `false` if the
    /// team does not exist.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Find a user's membership in a team, if any.
    async fn membership(&self, user_id: Uuid, team_id: Uuid) -> AppResult<Option<TeamMember>>;

    /// Find a membership by its own primary key.
    async fn find_member(&self, member_id: Uuid) -> AppResult<Option<TeamMember>>;

    /// Add a user to a team.
    async fn add_member(
        &self,
        team_id: Uuid,
        user_id: Uuid,
        role: TeamRole,
    ) -> AppResult<TeamMember>;

    /// Remove a membership. Returns `false` if it does not exist.
    async fn remove_member(&self, member_id: Uuid) -> AppResult<bool>;
}

/// PostgreSQL-backed [`TeamRepository`].
#[derive(Debug, Clone)]
pub struct PgTeamRepository {
    pool: PgPool,
}

impl PgTeamRepository {
    /// Create a new team repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch rosters for a set of teams, grouped by team id.
    async fn rosters(&self, team_ids: &[Uuid]) -> AppResult<HashMap<Uuid, Vec<TeamMemberDetail>>> {
        let rows = sqlx::query_as::<_, MemberRow>(
            "SELECT m.id, m.user_id, m.team_id, m.role, m.created_at, \
                    u.username, u.email \
             FROM team_members m \
             JOIN users u ON u.id = m.user_id \
             WHERE m.team_id = ANY($1) \
             ORDER BY m.created_at ASC",
        )
        .bind(team_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to load team members", e)
        })?;

        let mut grouped: HashMap<Uuid, Vec<TeamMemberDetail>> = HashMap::new();
        for row in rows {
            grouped.entry(row.team_id).or_default().push(row.into());
        }
        Ok(grouped)
    }
}

#[async_trait]
impl TeamRepository for PgTeamRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Team>> {
        sqlx::query_as::<_, Team>("SELECT * FROM teams WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find team", e))
    }

    async fn find_with_members(&self, id: Uuid) -> AppResult<Option<TeamWithMembers>> {
        let Some(team) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let mut rosters = self.rosters(&[id]).await?;
        Ok(Some(TeamWithMembers {
            team,
            members: rosters.remove(&id).unwrap_or_default(),
        }))
    }

    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<TeamWithMembers>> {
        let teams = sqlx::query_as::<_, Team>(
            "SELECT t.* FROM teams t \
             JOIN team_members m ON m.team_id = t.id \
             WHERE m.user_id = $1 \
             ORDER BY t.created_at ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list teams", e))?;

        let team_ids: Vec<Uuid> = teams.iter().map(|t| t.id).collect();
        let mut rosters = self.rosters(&team_ids).await?;

        Ok(teams
            .into_iter()
            .map(|team| {
                let members = rosters.remove(&team.id).unwrap_or_default();
                TeamWithMembers { team, members }
            })
            .collect())
    }

    async fn create(&self, name: &str, creator_id: Uuid) -> AppResult<Team> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let team =
            sqlx::query_as::<_, Team>("INSERT INTO teams (name) VALUES ($1) RETURNING *")
                .bind(name)
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to create team", e)
                })?;

        sqlx::query("INSERT INTO team_members (user_id, team_id, role) VALUES ($1, $2, 'admin')")
            .bind(creator_id)
            .bind(team.id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to enroll team creator", e)
            })?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit team creation", e)
        })?;

        Ok(team)
    }

    async fn rename(&self, id: Uuid, name: &str) -> AppResult<Option<Team>> {
        sqlx::query_as::<_, Team>("UPDATE teams SET name = $2 WHERE id = $1 RETURNING *")
            .bind(id)
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to rename team", e))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        sqlx::query("DELETE FROM team_members WHERE team_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete team members", e)
            })?;

        let result = sqlx::query("DELETE FROM teams WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete team", e))?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit team deletion", e)
        })?;

        Ok(result.rows_affected() > 0)
    }

    async fn membership(&self, user_id: Uuid, team_id: Uuid) -> AppResult<Option<TeamMember>> {
        sqlx::query_as::<_, TeamMember>(
            "SELECT * FROM team_members WHERE user_id = $1 AND team_id = $2",
        )
        .bind(user_id)
        .bind(team_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check membership", e))
    }

    async fn find_member(&self, member_id: Uuid) -> AppResult<Option<TeamMember>> {
        sqlx::query_as::<_, TeamMember>("SELECT * FROM team_members WHERE id = $1")
            .bind(member_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find member", e))
    }

    async fn add_member(
        &self,
        team_id: Uuid,
        user_id: Uuid,
        role: TeamRole,
    ) -> AppResult<TeamMember> {
        sqlx::query_as::<_, TeamMember>(
            "INSERT INTO team_members (user_id, team_id, role) \
             VALUES ($1, $2, $3) \
             RETURNING *",
        )
        .bind(user_id)
        .bind(team_id)
        .bind(role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("team_members_user_id_team_id_key") =>
            {
                AppError::conflict("User is already a member of this team")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to add team member", e),
        })
    }

    async fn remove_member(&self, member_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM team_members WHERE id = $1")
            .bind(member_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to remove team member", e)
            })?;

        Ok(result.rows_affected() > 0)
    }
}

/// Flat row for the membership-roster join.
#[derive(Debug, FromRow)]
struct MemberRow {
    id: Uuid,
    user_id: Uuid,
    team_id: Uuid,
    role: TeamRole,
    created_at: DateTime<Utc>,
    username: String,
    email: String,
}

impl From<MemberRow> for TeamMemberDetail {
    fn from(row: MemberRow) -> Self {
        TeamMemberDetail {
            id: row.id,
            user_id: row.user_id,
            team_id: row.team_id,
            role: row.role,
            created_at: row.created_at,
            user: UserSummary {
                id: row.user_id,
                username: row.username,
                email: row.email,
            },
            is_current_user: false,
        }
    }
}
