//! Teams and their membership. Team admin rights end at the team itself.

use super::AccessGuard;
use crate::error::{require, AppResult};
use crate::permissions::PermissionResolver;
use crate::principal::Principal;
use crate::storage::Store;
use shared_types::{Permission, Team, TeamMember};

fn require_team<S: Store + ?Sized>(
    resolver: &PermissionResolver<'_, S>,
    team_id: i64,
) -> AppResult<Team> {
    require(resolver.store().get_team(team_id)?, "team", team_id)
}

impl AccessGuard for Team {
    fn can_create<S: Store + ?Sized>(
        &self,
        _resolver: &PermissionResolver<'_, S>,
        principal: &Principal,
    ) -> AppResult<bool> {
        Ok(principal.user_id().is_some())
    }

    /// Members read the team; admins read it at `Admin`.
    fn can_read<S: Store + ?Sized>(
        &self,
        resolver: &PermissionResolver<'_, S>,
        principal: &Principal,
    ) -> AppResult<(bool, Permission)> {
        let Some(user_id) = principal.user_id() else {
            return Ok((false, Permission::Unknown));
        };

        require_team(resolver, self.id)?;
        Ok(match resolver.store().get_team_member(self.id, user_id)? {
            Some(member) if member.admin => (true, Permission::Admin),
            Some(_) => (true, Permission::Read),
            None => (false, Permission::Unknown),
        })
    }

    fn can_update<S: Store + ?Sized>(
        &self,
        resolver: &PermissionResolver<'_, S>,
        principal: &Principal,
    ) -> AppResult<bool> {
        if principal.is_link_share() {
            return Ok(false);
        }
        require_team(resolver, self.id)?;
        resolver.is_team_admin(principal, self.id)
    }

    fn can_delete<S: Store + ?Sized>(
        &self,
        resolver: &PermissionResolver<'_, S>,
        principal: &Principal,
    ) -> AppResult<bool> {
        self.can_update(resolver, principal)
    }
}

fn can_manage_members<S: Store + ?Sized>(
    resolver: &PermissionResolver<'_, S>,
    principal: &Principal,
    team_id: i64,
) -> AppResult<bool> {
    if principal.is_link_share() {
        return Ok(false);
    }
    require_team(resolver, team_id)?;
    resolver.is_team_admin(principal, team_id)
}

impl AccessGuard for TeamMember {
    fn can_create<S: Store + ?Sized>(
        &self,
        resolver: &PermissionResolver<'_, S>,
        principal: &Principal,
    ) -> AppResult<bool> {
        can_manage_members(resolver, principal, self.team_id)
    }

    /// Toggling the admin flag.
    fn can_update<S: Store + ?Sized>(
        &self,
        resolver: &PermissionResolver<'_, S>,
        principal: &Principal,
    ) -> AppResult<bool> {
        can_manage_members(resolver, principal, self.team_id)
    }

    fn can_delete<S: Store + ?Sized>(
        &self,
        resolver: &PermissionResolver<'_, S>,
        principal: &Principal,
    ) -> AppResult<bool> {
        can_manage_members(resolver, principal, self.team_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;
    use crate::storage::{teams, users};
    use shared_types::User;

    #[test]
    fn test_team_management_belongs_to_admins() {
        let db = Database::in_memory().unwrap();
        let (admin, member, outsider, team_id) = db
            .write(|conn| {
                let admin = users::create_user(conn, &User::new("admin".into()))?;
                let member = users::create_user(conn, &User::new("member".into()))?;
                let outsider = users::create_user(conn, &User::new("outsider".into()))?;
                let team_id = teams::create_team(conn, &Team::new("Ops".into(), None, admin))?;
                teams::add_team_member(conn, &TeamMember::new(team_id, admin, true))?;
                teams::add_team_member(conn, &TeamMember::new(team_id, member, false))?;
                Ok((admin, member, outsider, team_id))
            })
            .unwrap();

        db.read(|conn| {
            let resolver = PermissionResolver::new(conn, 25);
            let mut team = Team::new(String::new(), None, admin);
            team.id = team_id;

            assert_eq!(
                team.can_read(&resolver, &Principal::user(admin))?,
                (true, Permission::Admin)
            );
            assert_eq!(
                team.can_read(&resolver, &Principal::user(member))?,
                (true, Permission::Read)
            );
            assert!(!team.can_read(&resolver, &Principal::user(outsider))?.0);
            assert!(!team.can_update(&resolver, &Principal::user(member))?);

            let invite = TeamMember::new(team_id, outsider, false);
            assert!(invite.can_create(&resolver, &Principal::user(admin))?);
            assert!(!invite.can_create(&resolver, &Principal::user(member))?);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_missing_team_is_not_found() {
        let db = Database::in_memory().unwrap();
        let result = db.read(|conn| {
            TeamMember::new(12, 1, false).can_create(&PermissionResolver::new(conn, 25), &Principal::user(1))
        });
        assert!(matches!(result, Err(e) if e.is_not_found()));
    }
}
