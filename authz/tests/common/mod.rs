//! Shared setup for the integration tests: an isolated on-disk database per
//! test and builders for the rows most scenarios need.

#![allow(dead_code)]

use shared_types::{Permission, Project, ProjectUser, Team, TeamMember, TeamProject, User};
use std::path::PathBuf;
use std::sync::Arc;
use taskhub_authz::storage::{grants, projects, teams, users};
use taskhub_authz::{Authorizer, Database, SharingService};
use tempfile::TempDir;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter};

pub const MAX_DEPTH: usize = 25;

pub struct TestDatabase {
    pub database: Arc<Database>,
    db_path: PathBuf,
    _temp_dir: TempDir,
}

impl TestDatabase {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("authz.db");
        let database = Arc::new(Database::new(&db_path).expect("Failed to open test database"));

        Self {
            database,
            db_path,
            _temp_dir: temp_dir,
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.db_path
    }

    pub fn authorizer(&self) -> Authorizer {
        Authorizer::new(Arc::clone(&self.database), MAX_DEPTH)
    }

    pub fn sharing(&self) -> SharingService {
        SharingService::new(Arc::clone(&self.database), MAX_DEPTH)
    }

    pub fn user(&self, name: &str) -> i64 {
        self.database
            .write(|conn| users::create_user(conn, &User::new(name.to_string())))
            .expect("Failed to create user")
    }

    pub fn project(&self, owner: i64) -> i64 {
        self.database
            .write(|conn| projects::create_project(conn, &Project::new("Project".into(), owner)))
            .expect("Failed to create project")
    }

    pub fn child_project(&self, owner: i64, parent: i64) -> i64 {
        self.database
            .write(|conn| {
                projects::create_project(conn, &Project::new("Child".into(), owner).with_parent(parent))
            })
            .expect("Failed to create child project")
    }

    pub fn grant_user(&self, project_id: i64, user_id: i64, permission: Permission) {
        self.database
            .write(|conn| grants::create_project_user(conn, &ProjectUser::new(project_id, user_id, permission)))
            .expect("Failed to grant user");
    }

    /// Creates a team with `members` (none of them admin).
    pub fn team(&self, creator: i64, members: &[i64]) -> i64 {
        self.database
            .write(|conn| {
                let team_id = teams::create_team(conn, &Team::new("Team".into(), None, creator))?;
                for &member in members {
                    teams::add_team_member(conn, &TeamMember::new(team_id, member, false))?;
                }
                Ok(team_id)
            })
            .expect("Failed to create team")
    }

    pub fn grant_team(&self, project_id: i64, team_id: i64, permission: Permission) {
        self.database
            .write(|conn| grants::create_team_project(conn, &TeamProject::new(project_id, team_id, permission)))
            .expect("Failed to grant team");
    }
}

/// Captures crate logs at debug level for the lifetime of the guard.
pub fn init_test_logging() -> tracing::subscriber::DefaultGuard {
    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::new("taskhub_authz=debug"))
        .with(fmt::layer().with_test_writer().compact());

    tracing::subscriber::set_default(subscriber)
}
