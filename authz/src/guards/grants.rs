//! Project sharing relations. Only project admins manage them, and only as
//! users: a link share never changes who else has access.

use super::{visible_at, AccessGuard};
use crate::error::AppResult;
use crate::permissions::PermissionResolver;
use crate::principal::Principal;
use crate::storage::Store;
use shared_types::{Permission, ProjectUser, TeamProject};

fn is_sharing_admin<S: Store + ?Sized>(
    resolver: &PermissionResolver<'_, S>,
    principal: &Principal,
    project_id: i64,
) -> AppResult<bool> {
    if principal.is_link_share() {
        return Ok(false);
    }
    resolver.is_project_admin(principal, project_id)
}

macro_rules! project_admin_guard {
    ($entity:ty) => {
        impl AccessGuard for $entity {
            fn can_create<S: Store + ?Sized>(
                &self,
                resolver: &PermissionResolver<'_, S>,
                principal: &Principal,
            ) -> AppResult<bool> {
                is_sharing_admin(resolver, principal, self.project_id)
            }

            fn can_read<S: Store + ?Sized>(
                &self,
                resolver: &PermissionResolver<'_, S>,
                principal: &Principal,
            ) -> AppResult<(bool, Permission)> {
                let allowed = is_sharing_admin(resolver, principal, self.project_id)?;
                Ok(visible_at(allowed, Permission::Admin))
            }

            fn can_update<S: Store + ?Sized>(
                &self,
                resolver: &PermissionResolver<'_, S>,
                principal: &Principal,
            ) -> AppResult<bool> {
                is_sharing_admin(resolver, principal, self.project_id)
            }

            fn can_delete<S: Store + ?Sized>(
                &self,
                resolver: &PermissionResolver<'_, S>,
                principal: &Principal,
            ) -> AppResult<bool> {
                is_sharing_admin(resolver, principal, self.project_id)
            }
        }
    };
}

project_admin_guard!(ProjectUser);
project_admin_guard!(TeamProject);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;
    use crate::storage::{grants, projects, teams, users};
    use shared_types::{Project, Team, TeamMember, User};

    #[test]
    fn test_team_admin_cannot_share_the_teams_projects() {
        let db = Database::in_memory().unwrap();
        let (owner, team_admin, project_id, team_id) = db
            .write(|conn| {
                let owner = users::create_user(conn, &User::new("owner".into()))?;
                let team_admin = users::create_user(conn, &User::new("lead".into()))?;
                let project_id = projects::create_project(conn, &Project::new("P".into(), owner))?;
                let team_id = teams::create_team(conn, &Team::new("Ops".into(), None, team_admin))?;
                teams::add_team_member(conn, &TeamMember::new(team_id, team_admin, true))?;
                grants::create_team_project(conn, &TeamProject::new(project_id, team_id, Permission::Write))?;
                Ok((owner, team_admin, project_id, team_id))
            })
            .unwrap();

        db.read(|conn| {
            let resolver = PermissionResolver::new(conn, 25);
            let grant = TeamProject::new(project_id, team_id, Permission::Admin);

            assert!(grant.can_update(&resolver, &Principal::user(owner))?);
            assert!(!grant.can_update(&resolver, &Principal::user(team_admin))?);
            assert!(!ProjectUser::new(project_id, owner, Permission::Read)
                .can_create(&resolver, &Principal::user(team_admin))?);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_admin_link_share_cannot_grant_access() {
        let db = Database::in_memory().unwrap();
        let share = Principal::LinkShare {
            id: 2,
            project_id: 5,
            permission: Permission::Admin,
        };

        db.read(|conn| {
            let resolver = PermissionResolver::new(conn, 25);
            assert!(!ProjectUser::new(5, 1, Permission::Read).can_create(&resolver, &share)?);
            assert!(!TeamProject::new(5, 1, Permission::Read).can_delete(&resolver, &share)?);
            Ok(())
        })
        .unwrap();
    }
}
