mod common;

use common::{TestDatabase, MAX_DEPTH};
use shared_types::{Permission, Project};
use taskhub_authz::hierarchy::ProjectHierarchy;
use taskhub_authz::storage::{grants, link_shares, projects, teams};
use taskhub_authz::{AccessGuard, AppError, PermissionResolver, Principal};

#[test]
fn test_duplicate_team_grant_is_rejected_and_original_kept() {
    let db = TestDatabase::new();
    let owner = db.user("owner");
    let member = db.user("member");
    let p = db.project(owner);
    let team = db.team(owner, &[member]);
    let sharing = db.sharing();
    let admin = Principal::user(owner);

    sharing
        .add_team_project(&admin, p, team, Permission::Write)
        .unwrap();
    let second = sharing.add_team_project(&admin, p, team, Permission::Admin);

    assert!(matches!(
        second,
        Err(AppError::TeamAlreadyHasAccess { team_id, project_id }) if team_id == team && project_id == p
    ));
    let stored = db
        .database
        .read(|conn| grants::get_team_project(conn, p, team))
        .unwrap()
        .unwrap();
    assert_eq!(stored.permission, Permission::Write);
}

#[test]
fn test_duplicate_user_grant_and_owner_grant_are_rejected() {
    let db = TestDatabase::new();
    let owner = db.user("owner");
    let guest = db.user("guest");
    let p = db.project(owner);
    let sharing = db.sharing();
    let admin = Principal::user(owner);

    sharing
        .add_project_user(&admin, p, guest, Permission::Read)
        .unwrap();
    assert!(sharing
        .add_project_user(&admin, p, guest, Permission::Write)
        .unwrap_err()
        .is_already_has_access());
    assert!(matches!(
        sharing.add_project_user(&admin, p, owner, Permission::Read),
        Err(AppError::UserAlreadyHasAccess { .. })
    ));
}

#[test]
fn test_move_into_read_only_parent_leaves_project_in_place() {
    let db = TestDatabase::new();
    let owner = db.user("owner");
    let mover = db.user("mover");
    let home = db.project(owner);
    let x = db.child_project(owner, home);
    let destination = db.project(owner);
    db.grant_user(home, mover, Permission::Admin);
    db.grant_user(destination, mover, Permission::Read);

    let result = db.database.write(|conn| {
        let resolver = PermissionResolver::new(conn, MAX_DEPTH);
        let mut moved = resolver.hierarchy().get_project(x)?;
        moved.parent_project_id = Some(destination);

        if !moved.can_update(&resolver, &Principal::user(mover))? {
            return Err(AppError::Forbidden("update".into()));
        }
        projects::update_project(conn, &moved)
    });

    assert!(matches!(result, Err(AppError::Forbidden(_))));
    let stored = db
        .database
        .read(|conn| ProjectHierarchy::new(conn, MAX_DEPTH).get_project(x))
        .unwrap();
    assert_eq!(stored.parent_project_id, Some(home));
}

#[test]
fn test_invalid_permission_is_rejected_before_writing() {
    let db = TestDatabase::new();
    let owner = db.user("owner");
    let guest = db.user("guest");
    let p = db.project(owner);

    let result = db
        .sharing()
        .add_project_user(&Principal::user(owner), p, guest, Permission::Unknown);
    assert!(matches!(result, Err(AppError::InvalidPermission(-1))));

    let grants = db
        .database
        .read(|conn| grants::get_project_users(conn, p))
        .unwrap();
    assert!(grants.is_empty());
}

#[test]
fn test_non_admins_cannot_share() {
    let db = TestDatabase::new();
    let owner = db.user("owner");
    let writer = db.user("writer");
    let guest = db.user("guest");
    let p = db.project(owner);
    db.grant_user(p, writer, Permission::Write);

    let result = db
        .sharing()
        .add_project_user(&Principal::user(writer), p, guest, Permission::Read);
    assert!(result.unwrap_err().is_forbidden());
}

#[test]
fn test_link_shares_cannot_change_sharing() {
    let db = TestDatabase::new();
    let owner = db.user("owner");
    let guest = db.user("guest");
    let p = db.project(owner);
    let sharing = db.sharing();

    let share = sharing
        .create_link_share(&Principal::user(owner), p, Permission::Admin, None, None)
        .unwrap();
    let bearer = db.authorizer().link_share_principal(&share.hash, 0).unwrap();

    assert!(sharing
        .add_project_user(&bearer, p, guest, Permission::Read)
        .unwrap_err()
        .is_forbidden());
    assert!(sharing
        .create_link_share(&bearer, p, Permission::Read, None, None)
        .unwrap_err()
        .is_forbidden());
    assert!(sharing
        .create_team(&bearer, "Sneaky".into(), None)
        .unwrap_err()
        .is_forbidden());
}

#[test]
fn test_removing_missing_grant_reads_as_forbidden() {
    let db = TestDatabase::new();
    let owner = db.user("owner");
    let guest = db.user("guest");
    let p = db.project(owner);

    let result = db.sharing().remove_project_user(&Principal::user(owner), p, guest);
    assert!(result.unwrap_err().is_forbidden());
}

#[test]
fn test_update_changes_only_the_level() {
    let db = TestDatabase::new();
    let owner = db.user("owner");
    let guest = db.user("guest");
    let p = db.project(owner);
    let sharing = db.sharing();
    let admin = Principal::user(owner);

    let created = sharing
        .add_project_user(&admin, p, guest, Permission::Read)
        .unwrap();
    sharing
        .update_project_user(&admin, p, guest, Permission::Admin)
        .unwrap();

    let stored = db
        .database
        .read(|conn| grants::get_project_user(conn, p, guest))
        .unwrap()
        .unwrap();
    assert_eq!(stored.id, created.id);
    assert_eq!(stored.permission, Permission::Admin);

    sharing.remove_project_user(&admin, p, guest).unwrap();
    let resolved = db.authorizer().resolve(&Principal::user(guest), p).unwrap();
    assert_eq!(resolved.permission, None);
}

#[test]
fn test_team_lifecycle() {
    let db = TestDatabase::new();
    let creator = db.user("creator");
    let member = db.user("member");
    let sharing = db.sharing();
    let lead = Principal::user(creator);

    let team = sharing.create_team(&lead, "Platform".into(), None).unwrap();
    let membership = db
        .database
        .read(|conn| teams::get_team_member(conn, team.id, creator))
        .unwrap()
        .unwrap();
    assert!(membership.admin);

    sharing.add_team_member(&lead, team.id, member, false).unwrap();
    assert!(matches!(
        sharing.add_team_member(&lead, team.id, member, false),
        Err(AppError::UserAlreadyInTeam { .. })
    ));

    // A plain member cannot manage the team
    assert!(sharing
        .set_team_member_admin(&Principal::user(member), team.id, member, true)
        .unwrap_err()
        .is_forbidden());

    sharing.remove_team_member(&lead, team.id, member).unwrap();
    let remaining = db
        .database
        .read(|conn| teams::get_team_members(conn, team.id))
        .unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].user_id, creator);

    assert!(matches!(
        sharing.remove_team_member(&lead, team.id, creator),
        Err(AppError::CannotRemoveLastTeamMember(id)) if id == team.id
    ));
}

#[test]
fn test_team_admin_does_not_gain_project_rights() {
    let db = TestDatabase::new();
    let owner = db.user("owner");
    let lead = db.user("lead");
    let p = db.project(owner);
    let sharing = db.sharing();

    let team = sharing
        .create_team(&Principal::user(lead), "Leads".into(), None)
        .unwrap();
    sharing
        .add_team_project(&Principal::user(owner), p, team.id, Permission::Read)
        .unwrap();

    let result = sharing.update_team_project(&Principal::user(lead), p, team.id, Permission::Admin);
    assert!(result.unwrap_err().is_forbidden());
    assert_eq!(
        db.authorizer()
            .resolve(&Principal::user(lead), p)
            .unwrap()
            .permission,
        Some(Permission::Read)
    );
}

#[test]
fn test_link_share_management() {
    let db = TestDatabase::new();
    let owner = db.user("owner");
    let writer = db.user("writer");
    let p = db.project(owner);
    db.grant_user(p, writer, Permission::Write);
    let sharing = db.sharing();

    let share = sharing
        .create_link_share(&Principal::user(writer), p, Permission::Read, Some("Public".into()), None)
        .unwrap();
    assert_eq!(share.hash.len(), 40);

    assert!(sharing
        .create_link_share(&Principal::user(writer), p, Permission::Admin, None, None)
        .unwrap_err()
        .is_forbidden());
    assert!(sharing
        .update_link_share(&Principal::user(writer), share.id, Permission::Admin, None)
        .unwrap_err()
        .is_forbidden());

    sharing
        .update_link_share(&Principal::user(owner), share.id, Permission::Admin, None)
        .unwrap();
    let bearer = db.authorizer().link_share_principal(&share.hash, 0).unwrap();
    assert_eq!(
        db.authorizer().resolve(&bearer, p).unwrap().permission,
        Some(Permission::Admin)
    );

    sharing.delete_link_share(&Principal::user(owner), share.id).unwrap();
    assert!(db
        .authorizer()
        .link_share_principal(&share.hash, 0)
        .unwrap_err()
        .is_not_found());
}

#[test]
fn test_sharing_on_missing_project_is_not_found() {
    let db = TestDatabase::new();
    let owner = db.user("owner");
    let guest = db.user("guest");

    let result = db
        .sharing()
        .add_project_user(&Principal::user(owner), 404, guest, Permission::Read);
    assert!(result.unwrap_err().is_not_found());
}

#[test]
fn test_owner_keeps_admin_after_project_update() {
    let db = TestDatabase::new();
    let owner = db.user("owner");
    let p = db.project(owner);

    db.database
        .write(|conn| {
            let mut project = Project::new("Renamed".into(), owner);
            project.id = p;
            projects::update_project(conn, &project)
        })
        .unwrap();

    assert_eq!(
        db.authorizer()
            .resolve(&Principal::user(owner), p)
            .unwrap()
            .permission,
        Some(Permission::Admin)
    );
}

#[test]
fn test_deleting_a_project_removes_its_grants_and_children() {
    let db = TestDatabase::new();
    let owner = db.user("owner");
    let guest = db.user("guest");
    let p = db.project(owner);
    let child = db.child_project(owner, p);
    let team = db.team(owner, &[owner, guest]);
    db.grant_user(p, guest, Permission::Write);
    db.grant_team(p, team, Permission::Read);
    db.sharing()
        .create_link_share(&Principal::user(owner), p, Permission::Read, None, None)
        .unwrap();

    db.database
        .write(|conn| projects::delete_project(conn, p))
        .unwrap();

    db.database
        .read(|conn| {
            assert!(grants::get_project_users(conn, p)?.is_empty());
            assert!(grants::get_team_projects(conn, p)?.is_empty());
            assert!(link_shares::get_project_link_shares(conn, p)?.is_empty());
            Ok(())
        })
        .unwrap();

    let resolved = db.authorizer().resolve(&Principal::user(guest), child);
    assert!(matches!(resolved, Err(AppError::ProjectNotFound(id)) if id == child));

    let again = db.database.write(|conn| projects::delete_project(conn, p));
    assert!(matches!(again, Err(AppError::ProjectNotFound(id)) if id == p));
}
