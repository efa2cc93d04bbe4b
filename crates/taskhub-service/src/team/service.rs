//! Team lifecycle and membership operations.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use taskhub_core::error::AppError;
use taskhub_database::repositories::{TeamRepository, UserRepository};
use taskhub_entity::team::{TeamMemberDetail, TeamRole, TeamWithMembers};

use crate::context::RequestContext;
use crate::membership::MembershipGuard;

/// Handles team CRUD and membership management.
#[derive(Clone)]
pub struct TeamService {
    /// Team repository.
    team_repo: Arc<dyn TeamRepository>,
    /// User repository, for member lookups by email.
    user_repo: Arc<dyn UserRepository>,
    /// Membership authorization.
    guard: MembershipGuard,
}

impl TeamService {
    /// Creates a new team service.
    pub fn new(team_repo: Arc<dyn TeamRepository>, user_repo: Arc<dyn UserRepository>) -> Self {
        let guard = MembershipGuard::new(team_repo.clone());
        Self {
            team_repo,
            user_repo,
            guard,
        }
    }

    /// Lists all teams the current user belongs to, with rosters.
    pub async fn list_teams(&self, ctx: &RequestContext) -> Result<Vec<TeamWithMembers>, AppError> {
        let mut teams = self.team_repo.list_for_user(ctx.user_id).await?;
        for team in &mut teams {
            mark_current_user(team, ctx.user_id);
        }
        Ok(teams)
    }

    /// Gets a single team with its roster. Requires membership.
    pub async fn get_team(
        &self,
        ctx: &RequestContext,
        team_id: Uuid,
    ) -> Result<TeamWithMembers, AppError> {
        self.guard
            .require_member(ctx.user_id, team_id, "You are not a member of this team")
            .await?;

        let mut team = self
            .team_repo
            .find_with_members(team_id)
            .await?
            .ok_or_else(|| AppError::not_found("Team not found"))?;

        mark_current_user(&mut team, ctx.user_id);
        Ok(team)
    }

    /// Creates a team; the creator becomes its admin atomically.
    pub async fn create_team(
        &self,
        ctx: &RequestContext,
        name: &str,
    ) -> Result<TeamWithMembers, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Team name cannot be empty"));
        }

        let team = self.team_repo.create(name, ctx.user_id).await?;
        info!(team_id = %team.id, user_id = %ctx.user_id, "Team created");

        let mut team = self
            .team_repo
            .find_with_members(team.id)
            .await?
            .ok_or_else(|| AppError::internal("Created team disappeared"))?;
        mark_current_user(&mut team, ctx.user_id);
        Ok(team)
    }

    /// Renames a team. Requires team admin.
    pub async fn rename_team(
        &self,
        ctx: &RequestContext,
        team_id: Uuid,
        name: &str,
    ) -> Result<TeamWithMembers, AppError> {
        self.guard
            .require_admin(
                ctx.user_id,
                team_id,
                "Only team admins can update the team",
            )
            .await?;

        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Team name cannot be empty"));
        }

        self.team_repo
            .rename(team_id, name)
            .await?
            .ok_or_else(|| AppError::not_found("Team not found"))?;

        let mut team = self
            .team_repo
            .find_with_members(team_id)
            .await?
            .ok_or_else(|| AppError::not_found("Team not found"))?;
        mark_current_user(&mut team, ctx.user_id);
        Ok(team)
    }

    /// Deletes a team along with its memberships. Requires team admin.
    pub async fn delete_team(&self, ctx: &RequestContext, team_id: Uuid) -> Result<(), AppError> {
        self.guard
            .require_admin(
                ctx.user_id,
                team_id,
                "Only team admins can delete the team",
            )
            .await?;

        if !self.team_repo.delete(team_id).await? {
            return Err(AppError::not_found("Team not found"));
        }

        info!(team_id = %team_id, user_id = %ctx.user_id, "Team deleted");
        Ok(())
    }

    /// Adds a user to a team by email. Requires team admin.
    pub async fn add_member(
        &self,
        ctx: &RequestContext,
        team_id: Uuid,
        email: &str,
        role: TeamRole,
    ) -> Result<TeamMemberDetail, AppError> {
        self.guard
            .require_admin(ctx.user_id, team_id, "Only team admins can add members")
            .await?;

        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::not_found("No user found with this email"))?;

        let member = self.team_repo.add_member(team_id, user.id, role).await?;

        info!(
            team_id = %team_id,
            member_user_id = %user.id,
            role = %role,
            "Team member added"
        );

        Ok(TeamMemberDetail {
            id: member.id,
            user_id: member.user_id,
            team_id: member.team_id,
            role: member.role,
            created_at: member.created_at,
            is_current_user: user.id == ctx.user_id,
            user: user.summary(),
        })
    }

    /// Removes a membership from a team. Requires team admin; admins can
    /// never remove their own membership.
    pub async fn remove_member(
        &self,
        ctx: &RequestContext,
        team_id: Uuid,
        member_id: Uuid,
    ) -> Result<(), AppError> {
        self.guard
            .require_admin(ctx.user_id, team_id, "Only team admins can remove members")
            .await?;

        let member = self
            .team_repo
            .find_member(member_id)
            .await?
            .filter(|m| m.team_id == team_id)
            .ok_or_else(|| AppError::not_found("Member not found"))?;

        if member.user_id == ctx.user_id {
            return Err(AppError::validation(
                "You cannot remove yourself from the team",
            ));
        }

        self.team_repo.remove_member(member_id).await?;

        info!(
            team_id = %team_id,
            member_user_id = %member.user_id,
            "Team member removed"
        );
        Ok(())
    }
}

/// Flag the viewing user's own row in the roster.
fn mark_current_user(team: &mut TeamWithMembers, user_id: Uuid) {
    for member in &mut team.members {
        member.is_current_user = member.user_id == user_id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{InMemoryStore, ctx_for};
    use taskhub_core::error::ErrorKind;

    fn service(store: Arc<InMemoryStore>) -> TeamService {
        TeamService::new(store.clone(), store)
    }

    #[tokio::test]
    async fn create_team_makes_creator_admin() {
        let store = Arc::new(InMemoryStore::default());
        let alice = store.seed_user("alice", "alice@example.com");

        let team = service(store)
            .create_team(&ctx_for(&alice), "Rocket")
            .await
            .unwrap();

        assert_eq!(team.team.name, "Rocket");
        assert_eq!(team.members.len(), 1);
        assert_eq!(team.members[0].role, TeamRole::Admin);
        assert!(team.members[0].is_current_user);
    }

    #[tokio::test]
    async fn get_team_requires_membership() {
        let store = Arc::new(InMemoryStore::default());
        let alice = store.seed_user("alice", "alice@example.com");
        let outsider = store.seed_user("bob", "bob@example.com");
        let team = store.seed_team("Rocket");
        store.seed_member(alice.id, team.id, TeamRole::Member);

        let svc = service(store);
        assert!(svc.get_team(&ctx_for(&alice), team.id).await.is_ok());

        let err = svc
            .get_team(&ctx_for(&outsider), team.id)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
    }

    #[tokio::test]
    async fn roster_marks_only_the_viewer() {
        let store = Arc::new(InMemoryStore::default());
        let alice = store.seed_user("alice", "alice@example.com");
        let bob = store.seed_user("bob", "bob@example.com");
        let team = store.seed_team("Rocket");
        store.seed_member(alice.id, team.id, TeamRole::Admin);
        store.seed_member(bob.id, team.id, TeamRole::Member);

        let team = service(store)
            .get_team(&ctx_for(&alice), team.id)
            .await
            .unwrap();

        let flags: Vec<bool> = team
            .members
            .iter()
            .map(|m| (m.user_id == alice.id) == m.is_current_user)
            .collect();
        assert!(flags.into_iter().all(|ok| ok));
    }

    #[tokio::test]
    async fn rename_requires_admin() {
        let store = Arc::new(InMemoryStore::default());
        let bob = store.seed_user("bob", "bob@example.com");
        let team = store.seed_team("Rocket");
        store.seed_member(bob.id, team.id, TeamRole::Member);

        let err = service(store)
            .rename_team(&ctx_for(&bob), team.id, "Comet")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
    }

    #[tokio::test]
    async fn add_member_by_unknown_email_is_not_found() {
        let store = Arc::new(InMemoryStore::default());
        let alice = store.seed_user("alice", "alice@example.com");
        let team = store.seed_team("Rocket");
        store.seed_member(alice.id, team.id, TeamRole::Admin);

        let err = service(store)
            .add_member(&ctx_for(&alice), team.id, "ghost@example.com", TeamRole::Member)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn add_member_twice_conflicts() {
        let store = Arc::new(InMemoryStore::default());
        let alice = store.seed_user("alice", "alice@example.com");
        let bob = store.seed_user("bob", "bob@example.com");
        let team = store.seed_team("Rocket");
        store.seed_member(alice.id, team.id, TeamRole::Admin);

        let svc = service(store);
        let ctx = ctx_for(&alice);
        svc.add_member(&ctx, team.id, &bob.email, TeamRole::Member)
            .await
            .unwrap();

        let err = svc
            .add_member(&ctx, team.id, &bob.email, TeamRole::Member)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn admin_cannot_remove_self() {
        let store = Arc::new(InMemoryStore::default());
        let alice = store.seed_user("alice", "alice@example.com");
        let team = store.seed_team("Rocket");
        let membership = store.seed_member(alice.id, team.id, TeamRole::Admin);

        let err = service(store.clone())
            .remove_member(&ctx_for(&alice), team.id, membership.id)
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(store.member_exists(membership.id));
    }

    #[tokio::test]
    async fn member_from_another_team_is_not_found() {
        let store = Arc::new(InMemoryStore::default());
        let alice = store.seed_user("alice", "alice@example.com");
        let bob = store.seed_user("bob", "bob@example.com");
        let team = store.seed_team("Rocket");
        let other = store.seed_team("Comet");
        store.seed_member(alice.id, team.id, TeamRole::Admin);
        let foreign = store.seed_member(bob.id, other.id, TeamRole::Member);

        let err = service(store)
            .remove_member(&ctx_for(&alice), team.id, foreign.id)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn delete_team_removes_memberships() {
        let store = Arc::new(InMemoryStore::default());
        let alice = store.seed_user("alice", "alice@example.com");
        let team = store.seed_team("Rocket");
        let membership = store.seed_member(alice.id, team.id, TeamRole::Admin);

        service(store.clone())
            .delete_team(&ctx_for(&alice), team.id)
            .await
            .unwrap();

        assert!(!store.member_exists(membership.id));
    }
}
