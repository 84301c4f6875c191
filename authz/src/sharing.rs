//! Grant mutations.
//!
//! Each operation runs in one write transaction: access check, permission
//! validation, existence of what it references, duplicate detection, then the
//! write itself. Nothing is written unless every step passes.

use crate::database::Database;
use crate::error::{require, AppError, AppResult};
use crate::guards::AccessGuard;
use crate::permissions::PermissionResolver;
use crate::principal::Principal;
use crate::storage::{grants, link_shares, teams, users, ProjectStore};
use chrono::Utc;
use rusqlite::Connection;
use shared_types::{LinkShare, Permission, ProjectUser, Team, TeamMember, TeamProject};
use std::sync::Arc;

#[derive(Clone)]
pub struct SharingService {
    database: Arc<Database>,
    max_hierarchy_depth: usize,
}

fn ensure(allowed: bool, action: &str) -> AppResult<()> {
    if allowed {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!("Not allowed to {action}")))
    }
}

fn require_user(conn: &Connection, user_id: i64) -> AppResult<()> {
    require(users::get_user(conn, user_id)?, "user", user_id).map(|_| ())
}

impl SharingService {
    pub fn new(database: Arc<Database>, max_hierarchy_depth: usize) -> Self {
        Self {
            database,
            max_hierarchy_depth,
        }
    }

    fn transaction<T, F>(&self, f: F) -> AppResult<T>
    where
        F: FnOnce(&Connection, &PermissionResolver<'_, Connection>) -> AppResult<T>,
    {
        self.database.write(|conn| {
            let resolver = PermissionResolver::new(conn, self.max_hierarchy_depth);
            f(conn, &resolver)
        })
    }

    // ============ project users ============

    pub fn add_project_user(
        &self,
        principal: &Principal,
        project_id: i64,
        user_id: i64,
        permission: Permission,
    ) -> AppResult<ProjectUser> {
        let mut grant = ProjectUser::new(project_id, user_id, permission);

        self.transaction(|conn, resolver| {
            ensure(grant.can_create(resolver, principal)?, "share this project")?;
            grant.permission.validate()?;

            let project = resolver.hierarchy().get_project(project_id)?;
            require_user(conn, user_id)?;
            if project.owner_id == user_id {
                return Err(AppError::UserAlreadyHasAccess {
                    user_id,
                    project_id,
                });
            }

            grant.id = grants::create_project_user(conn, &grant)?;
            tracing::info!(
                "Granted {} on project {} to user {}",
                grant.permission,
                project_id,
                user_id
            );
            Ok(grant)
        })
    }

    pub fn update_project_user(
        &self,
        principal: &Principal,
        project_id: i64,
        user_id: i64,
        permission: Permission,
    ) -> AppResult<()> {
        let grant = ProjectUser::new(project_id, user_id, permission);

        self.transaction(|conn, resolver| {
            ensure(grant.can_update(resolver, principal)?, "change sharing of this project")?;
            let permission = permission.validate()?;

            let now = Utc::now().timestamp();
            if !grants::update_project_user_permission(conn, project_id, user_id, permission, now)? {
                return Err(AppError::NotFound(format!(
                    "user {user_id} has no access to project {project_id}"
                )));
            }

            tracing::info!(
                "Changed user {} on project {} to {}",
                user_id,
                project_id,
                permission
            );
            Ok(())
        })
    }

    pub fn remove_project_user(
        &self,
        principal: &Principal,
        project_id: i64,
        user_id: i64,
    ) -> AppResult<()> {
        let grant = ProjectUser::new(project_id, user_id, Permission::Read);

        self.transaction(|conn, resolver| {
            ensure(grant.can_delete(resolver, principal)?, "change sharing of this project")?;
            // A missing grant reads the same as a denied one
            ensure(
                grants::delete_project_user(conn, project_id, user_id)?,
                "change sharing of this project",
            )?;

            tracing::info!("Removed user {} from project {}", user_id, project_id);
            Ok(())
        })
    }

    // ============ team projects ============

    pub fn add_team_project(
        &self,
        principal: &Principal,
        project_id: i64,
        team_id: i64,
        permission: Permission,
    ) -> AppResult<TeamProject> {
        let mut grant = TeamProject::new(project_id, team_id, permission);

        self.transaction(|conn, resolver| {
            ensure(grant.can_create(resolver, principal)?, "share this project")?;
            grant.permission.validate()?;

            resolver.hierarchy().get_project(project_id)?;
            require(teams::get_team(conn, team_id)?, "team", team_id)?;

            grant.id = grants::create_team_project(conn, &grant)?;
            tracing::info!(
                "Granted {} on project {} to team {}",
                grant.permission,
                project_id,
                team_id
            );
            Ok(grant)
        })
    }

    pub fn update_team_project(
        &self,
        principal: &Principal,
        project_id: i64,
        team_id: i64,
        permission: Permission,
    ) -> AppResult<()> {
        let grant = TeamProject::new(project_id, team_id, permission);

        self.transaction(|conn, resolver| {
            ensure(grant.can_update(resolver, principal)?, "change sharing of this project")?;
            let permission = permission.validate()?;

            let now = Utc::now().timestamp();
            if !grants::update_team_project_permission(conn, project_id, team_id, permission, now)? {
                return Err(AppError::NotFound(format!(
                    "team {team_id} has no access to project {project_id}"
                )));
            }

            tracing::info!(
                "Changed team {} on project {} to {}",
                team_id,
                project_id,
                permission
            );
            Ok(())
        })
    }

    pub fn remove_team_project(
        &self,
        principal: &Principal,
        project_id: i64,
        team_id: i64,
    ) -> AppResult<()> {
        let grant = TeamProject::new(project_id, team_id, Permission::Read);

        self.transaction(|conn, resolver| {
            ensure(grant.can_delete(resolver, principal)?, "change sharing of this project")?;
            ensure(
                grants::delete_team_project(conn, project_id, team_id)?,
                "change sharing of this project",
            )?;

            tracing::info!("Removed team {} from project {}", team_id, project_id);
            Ok(())
        })
    }

    // ============ teams ============

    /// Creates a team with its creator as the first admin member.
    pub fn create_team(
        &self,
        principal: &Principal,
        name: String,
        description: Option<String>,
    ) -> AppResult<Team> {
        self.transaction(|conn, resolver| {
            let creator = match principal.user_id() {
                Some(id) => id,
                None => return Err(AppError::Forbidden("Not allowed to create teams".into())),
            };

            let mut team = Team::new(name, description, creator);
            ensure(team.can_create(resolver, principal)?, "create teams")?;

            team.id = teams::create_team(conn, &team)?;
            teams::add_team_member(conn, &TeamMember::new(team.id, creator, true))?;
            tracing::info!("User {} created team {}", creator, team.id);
            Ok(team)
        })
    }

    pub fn add_team_member(
        &self,
        principal: &Principal,
        team_id: i64,
        user_id: i64,
        admin: bool,
    ) -> AppResult<TeamMember> {
        let mut member = TeamMember::new(team_id, user_id, admin);

        self.transaction(|conn, resolver| {
            ensure(member.can_create(resolver, principal)?, "manage this team")?;
            require_user(conn, user_id)?;

            member.id = teams::add_team_member(conn, &member)?;
            Ok(member)
        })
    }

    pub fn set_team_member_admin(
        &self,
        principal: &Principal,
        team_id: i64,
        user_id: i64,
        admin: bool,
    ) -> AppResult<()> {
        let member = TeamMember::new(team_id, user_id, admin);

        self.transaction(|conn, resolver| {
            ensure(member.can_update(resolver, principal)?, "manage this team")?;
            if !teams::set_team_member_admin(conn, team_id, user_id, admin)? {
                return Err(AppError::NotFound(format!(
                    "user {user_id} is not a member of team {team_id}"
                )));
            }

            tracing::info!(
                "Set admin flag of user {} in team {} to {}",
                user_id,
                team_id,
                admin
            );
            Ok(())
        })
    }

    /// A team always keeps at least one member.
    pub fn remove_team_member(
        &self,
        principal: &Principal,
        team_id: i64,
        user_id: i64,
    ) -> AppResult<()> {
        let member = TeamMember::new(team_id, user_id, false);

        self.transaction(|conn, resolver| {
            ensure(member.can_delete(resolver, principal)?, "manage this team")?;

            let is_member = teams::get_team_member(conn, team_id, user_id)?.is_some();
            if is_member && teams::count_team_members(conn, team_id)? <= 1 {
                return Err(AppError::CannotRemoveLastTeamMember(team_id));
            }

            ensure(
                teams::remove_team_member(conn, team_id, user_id)?,
                "manage this team",
            )?;
            tracing::info!("Removed user {} from team {}", user_id, team_id);
            Ok(())
        })
    }

    // ============ link shares ============

    pub fn create_link_share(
        &self,
        principal: &Principal,
        project_id: i64,
        permission: Permission,
        name: Option<String>,
        expires_at: Option<i64>,
    ) -> AppResult<LinkShare> {
        self.transaction(|conn, resolver| {
            let mut share = LinkShare::new(project_id, permission, principal.author_id());
            share.name = name;
            share.expires_at = expires_at;

            ensure(share.can_create(resolver, principal)?, "share this project")?;
            share.permission.validate()?;
            conn.get_project(project_id)?
                .ok_or(AppError::ProjectNotFound(project_id))?;

            link_shares::create_link_share(conn, &share)
        })
    }

    pub fn update_link_share(
        &self,
        principal: &Principal,
        share_id: i64,
        permission: Permission,
        expires_at: Option<i64>,
    ) -> AppResult<()> {
        self.transaction(|conn, resolver| {
            let mut requested = LinkShare::new(0, permission, principal.author_id());
            requested.id = share_id;

            ensure(requested.can_update(resolver, principal)?, "change this link share")?;
            let permission = permission.validate()?;

            let now = Utc::now().timestamp();
            if !link_shares::update_link_share(conn, share_id, permission, expires_at, now)? {
                return Err(AppError::not_found("link share", share_id));
            }

            tracing::info!("Changed link share {} to {}", share_id, permission);
            Ok(())
        })
    }

    pub fn delete_link_share(&self, principal: &Principal, share_id: i64) -> AppResult<()> {
        self.transaction(|conn, resolver| {
            let mut share = LinkShare::new(0, Permission::Read, principal.author_id());
            share.id = share_id;

            ensure(share.can_delete(resolver, principal)?, "delete this link share")?;
            link_shares::delete_link_share(conn, share_id)?;

            tracing::info!("Deleted link share {}", share_id);
            Ok(())
        })
    }
}
