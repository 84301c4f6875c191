use crate::permission::Permission;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ============ Principals & Teams ============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
    pub created_at: i64,
}

impl User {
    pub fn new(username: String) -> Self {
        Self {
            id: 0,
            username,
            email: None,
            created_at: Utc::now().timestamp(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Team {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_by: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Team {
    pub fn new(name: String, description: Option<String>, created_by: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            id: 0,
            name,
            description,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Membership of a user in a team. `admin` governs the team's own
/// membership surface only, never project access.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TeamMember {
    pub id: i64,
    pub team_id: i64,
    pub user_id: i64,
    pub admin: bool,
    pub created_at: i64,
}

impl TeamMember {
    pub fn new(team_id: i64, user_id: i64, admin: bool) -> Self {
        Self {
            id: 0,
            team_id,
            user_id,
            admin,
            created_at: Utc::now().timestamp(),
        }
    }
}

// ============ Project grants ============

/// Direct grant of a project to a single user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProjectUser {
    pub id: i64,
    pub project_id: i64,
    pub user_id: i64,
    #[ts(type = "number")]
    pub permission: Permission,
    pub created_at: i64,
    pub updated_at: i64,
}

impl ProjectUser {
    pub fn new(project_id: i64, user_id: i64, permission: Permission) -> Self {
        let now = Utc::now().timestamp();
        Self {
            id: 0,
            project_id,
            user_id,
            permission,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Grant of a project to every member of a team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TeamProject {
    pub id: i64,
    pub project_id: i64,
    pub team_id: i64,
    #[ts(type = "number")]
    pub permission: Permission,
    pub created_at: i64,
    pub updated_at: i64,
}

impl TeamProject {
    pub fn new(project_id: i64, team_id: i64, permission: Permission) -> Self {
        let now = Utc::now().timestamp();
        Self {
            id: 0,
            project_id,
            team_id,
            permission,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Anonymous bearer access to exactly one project at one fixed level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LinkShare {
    pub id: i64,
    pub hash: String,
    pub name: Option<String>,
    pub project_id: i64,
    #[ts(type = "number")]
    pub permission: Permission,
    pub shared_by: i64,
    /// Unix timestamp after which the share stops authenticating
    pub expires_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl LinkShare {
    pub fn new(project_id: i64, permission: Permission, shared_by: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            id: 0,
            hash: String::new(), // Generated on insert
            name: None,
            project_id,
            permission,
            shared_by,
            expires_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_expired(&self, now: i64) -> bool {
        self.expires_at.is_some_and(|expires| expires <= now)
    }
}
