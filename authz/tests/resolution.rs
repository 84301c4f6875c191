mod common;

use common::{init_test_logging, TestDatabase};
use shared_types::{Permission, Project};
use taskhub_authz::storage::projects;
use taskhub_authz::{AppError, Principal};

fn resolve(db: &TestDatabase, principal: Principal, project_id: i64) -> Option<Permission> {
    db.authorizer()
        .resolve(&principal, project_id)
        .unwrap()
        .permission
}

#[test]
fn test_owner_in_read_only_team_stays_admin() {
    let _log = init_test_logging();
    let db = TestDatabase::new();
    let a = db.user("a");
    let p = db.project(a);

    let team_y = db.team(a, &[a]);
    let team_z = db.team(a, &[a]);
    db.grant_team(p, team_y, Permission::Admin);
    db.grant_team(p, team_z, Permission::Read);

    let project = Project {
        id: p,
        ..Project::new(String::new(), a)
    };
    assert!(db
        .authorizer()
        .can_delete(&Principal::user(a), &project)
        .unwrap());
}

#[test]
fn test_team_grant_order_does_not_matter() {
    let db = TestDatabase::new();
    let owner = db.user("owner");
    let b = db.user("b");
    let c = db.user("c");
    let p = db.project(owner);

    // Admin first for b, read first for c
    let admin_team_b = db.team(owner, &[b]);
    let read_team_b = db.team(owner, &[b]);
    db.grant_team(p, admin_team_b, Permission::Admin);
    db.grant_team(p, read_team_b, Permission::Read);

    let read_team_c = db.team(owner, &[c]);
    let admin_team_c = db.team(owner, &[c]);
    db.grant_team(p, read_team_c, Permission::Read);
    db.grant_team(p, admin_team_c, Permission::Admin);

    assert_eq!(resolve(&db, Principal::user(b), p), Some(Permission::Admin));
    assert_eq!(resolve(&db, Principal::user(c), p), Some(Permission::Admin));
}

#[test]
fn test_owner_supremacy_over_lower_grants() {
    let db = TestDatabase::new();
    let owner = db.user("owner");
    let other = db.user("other");
    let parent = db.project(other);
    let child = db.child_project(owner, parent);

    db.grant_user(parent, owner, Permission::Read);
    let team = db.team(other, &[owner]);
    db.grant_team(child, team, Permission::Read);

    assert_eq!(
        resolve(&db, Principal::user(owner), child),
        Some(Permission::Admin)
    );
}

#[test]
fn test_owner_of_ancestor_is_admin_on_descendants() {
    let db = TestDatabase::new();
    let owner = db.user("owner");
    let other = db.user("other");
    let root = db.project(owner);
    let middle = db.child_project(other, root);
    let leaf = db.child_project(other, middle);

    assert_eq!(
        resolve(&db, Principal::user(owner), leaf),
        Some(Permission::Admin)
    );
}

#[test]
fn test_write_on_parent_allows_writing_child() {
    let db = TestDatabase::new();
    let owner = db.user("owner");
    let c = db.user("c");
    let parent = db.project(owner);
    let child = db.child_project(owner, parent);
    db.grant_user(parent, c, Permission::Write);

    let authorizer = db.authorizer();
    let task = shared_types::Task::new("New task".into(), child, c);
    assert!(authorizer.can_create(&Principal::user(c), &task).unwrap());
    assert!(resolve(&db, Principal::user(c), child) >= Some(Permission::Write));
}

#[test]
fn test_monotonicity_of_added_grants() {
    let db = TestDatabase::new();
    let owner = db.user("owner");
    let u = db.user("u");
    let root = db.project(owner);
    let child = db.child_project(owner, root);
    let principal = Principal::user(u);

    let mut previous = resolve(&db, principal, child);
    assert_eq!(previous, None);

    let steps: Vec<Box<dyn Fn() + '_>> = vec![
        Box::new(|| db.grant_user(child, u, Permission::Read)),
        Box::new(|| {
            let team = db.team(owner, &[u]);
            db.grant_team(root, team, Permission::Write);
        }),
        Box::new(|| {
            let team = db.team(owner, &[u]);
            db.grant_team(child, team, Permission::Read);
        }),
        Box::new(|| db.grant_user(root, u, Permission::Admin)),
    ];

    for step in steps {
        step();
        let current = resolve(&db, principal, child);
        assert!(current >= previous, "{current:?} dropped below {previous:?}");
        previous = current;
    }
    assert_eq!(previous, Some(Permission::Admin));
}

#[test]
fn test_link_share_read_cannot_write_or_leave_its_project() {
    let db = TestDatabase::new();
    let owner = db.user("owner");
    let parent = db.project(owner);
    let p = db.child_project(owner, parent);
    let sibling = db.child_project(owner, parent);

    let share = db
        .sharing()
        .create_link_share(&Principal::user(owner), p, Permission::Read, None, None)
        .unwrap();
    let authorizer = db.authorizer();
    let principal = authorizer.link_share_principal(&share.hash, 0).unwrap();

    let task = shared_types::Task::new("From a share".into(), p, principal.author_id());
    assert!(!authorizer.can_create(&principal, &task).unwrap());

    let project_ref = |id| Project {
        id,
        ..Project::new(String::new(), owner)
    };
    assert_eq!(
        authorizer.can_read(&principal, &project_ref(p)).unwrap(),
        (true, Permission::Read)
    );
    for other in [parent, sibling] {
        assert!(!authorizer.can_read(&principal, &project_ref(other)).unwrap().0);
    }
}

#[test]
fn test_link_share_does_not_reach_descendants() {
    let db = TestDatabase::new();
    let owner = db.user("owner");
    let parent = db.project(owner);
    let child = db.child_project(owner, parent);

    let share = db
        .sharing()
        .create_link_share(&Principal::user(owner), parent, Permission::Admin, None, None)
        .unwrap();
    let principal = db.authorizer().link_share_principal(&share.hash, 0).unwrap();

    assert_eq!(resolve(&db, principal, parent), Some(Permission::Admin));
    assert_eq!(resolve(&db, principal, child), None);
}

#[test]
fn test_expired_and_unknown_link_shares_are_refused() {
    let db = TestDatabase::new();
    let owner = db.user("owner");
    let p = db.project(owner);

    let share = db
        .sharing()
        .create_link_share(&Principal::user(owner), p, Permission::Write, None, Some(100))
        .unwrap();
    let authorizer = db.authorizer();

    assert!(authorizer.link_share_principal(&share.hash, 99).is_ok());
    assert!(matches!(
        authorizer.link_share_principal(&share.hash, 100),
        Err(AppError::LinkShareExpired)
    ));
    assert!(authorizer
        .link_share_principal("no-such-hash", 0)
        .unwrap_err()
        .is_not_found());
}

#[test]
fn test_repeated_checks_are_identical() {
    let db = TestDatabase::new();
    let owner = db.user("owner");
    let reader = db.user("reader");
    let p = db.project(owner);
    db.grant_user(p, reader, Permission::Read);

    let authorizer = db.authorizer();
    let project = Project {
        id: p,
        ..Project::new(String::new(), owner)
    };
    let first = authorizer.can_read(&Principal::user(reader), &project).unwrap();
    let second = authorizer.can_read(&Principal::user(reader), &project).unwrap();
    assert_eq!(first, second);
    assert_eq!(first, (true, Permission::Read));
}

#[test]
fn test_resolve_many_keeps_request_order() {
    let db = TestDatabase::new();
    let alice = db.user("alice");
    let bob = db.user("bob");
    let mine = db.project(alice);
    let theirs = db.project(bob);

    let resolved = db
        .authorizer()
        .resolve_many(&Principal::user(alice), &[theirs, mine])
        .unwrap();

    assert_eq!(resolved.len(), 2);
    assert_eq!(resolved[0].project_id, theirs);
    assert_eq!(resolved[0].permission, None);
    assert_eq!(resolved[1].permission, Some(Permission::Admin));
}

#[test]
fn test_cyclic_hierarchy_is_reported() {
    let db = TestDatabase::new();
    let owner = db.user("owner");
    let stranger = db.user("stranger");
    let a = db.project(owner);
    let b = db.child_project(owner, a);

    db.database
        .write(|conn| {
            let mut root = Project::new("Root".into(), owner);
            root.id = a;
            root.parent_project_id = Some(b);
            projects::update_project(conn, &root)
        })
        .unwrap();

    let result = db.authorizer().resolve(&Principal::user(stranger), b);
    assert!(matches!(result, Err(AppError::HierarchyTooDeep(_))));
}
