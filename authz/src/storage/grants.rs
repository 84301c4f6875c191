use super::{permission_column, GrantStore};
use crate::error::{AppError, AppResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use shared_types::{Permission, ProjectUser, TeamMember, TeamProject};

impl GrantStore for Connection {
    fn project_user_permission(
        &self,
        project_id: i64,
        user_id: i64,
    ) -> AppResult<Option<Permission>> {
        let permission = self
            .query_row(
                "SELECT permission FROM users_projects WHERE project_id = ?1 AND user_id = ?2",
                [project_id, user_id],
                |row| permission_column(row, 0),
            )
            .optional()?;

        Ok(permission)
    }

    fn team_project_permission(
        &self,
        project_id: i64,
        user_id: i64,
    ) -> AppResult<Option<Permission>> {
        // MAX over all memberships, so the order grants were made in is irrelevant
        let raw: Option<i64> = self.query_row(
            "SELECT MAX(tp.permission)
             FROM team_projects tp
             INNER JOIN team_members tm ON tm.team_id = tp.team_id
             WHERE tp.project_id = ?1 AND tm.user_id = ?2",
            [project_id, user_id],
            |row| row.get(0),
        )?;

        raw.map(Permission::try_from)
            .transpose()
            .map_err(AppError::from)
    }

    fn get_team_member(&self, team_id: i64, user_id: i64) -> AppResult<Option<TeamMember>> {
        super::teams::get_team_member(self, team_id, user_id)
    }
}

fn project_user_from_row(row: &Row<'_>) -> rusqlite::Result<ProjectUser> {
    Ok(ProjectUser {
        id: row.get(0)?,
        project_id: row.get(1)?,
        user_id: row.get(2)?,
        permission: permission_column(row, 3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

fn team_project_from_row(row: &Row<'_>) -> rusqlite::Result<TeamProject> {
    Ok(TeamProject {
        id: row.get(0)?,
        project_id: row.get(1)?,
        team_id: row.get(2)?,
        permission: permission_column(row, 3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

// ============ users_projects ============

pub fn create_project_user(conn: &Connection, grant: &ProjectUser) -> AppResult<i64> {
    let permission = grant.permission.validate()?;

    conn.execute(
        "INSERT INTO users_projects (project_id, user_id, permission, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            grant.project_id,
            grant.user_id,
            permission.as_i64(),
            grant.created_at,
            grant.updated_at,
        ],
    )
    .map_err(|e| {
        if super::is_unique_violation(&e) {
            AppError::UserAlreadyHasAccess {
                user_id: grant.user_id,
                project_id: grant.project_id,
            }
        } else {
            AppError::from(e)
        }
    })?;

    Ok(conn.last_insert_rowid())
}

pub fn get_project_user(
    conn: &Connection,
    project_id: i64,
    user_id: i64,
) -> AppResult<Option<ProjectUser>> {
    let grant = conn
        .query_row(
            "SELECT id, project_id, user_id, permission, created_at, updated_at
             FROM users_projects WHERE project_id = ?1 AND user_id = ?2",
            [project_id, user_id],
            project_user_from_row,
        )
        .optional()?;

    Ok(grant)
}

pub fn get_project_users(conn: &Connection, project_id: i64) -> AppResult<Vec<ProjectUser>> {
    let mut stmt = conn.prepare(
        "SELECT id, project_id, user_id, permission, created_at, updated_at
         FROM users_projects WHERE project_id = ?1 ORDER BY id",
    )?;

    let grants: Result<Vec<_>, _> = stmt
        .query_map([project_id], project_user_from_row)?
        .collect();
    grants.map_err(AppError::from)
}

/// Changes only the stored level. Returns false when the grant does not exist.
pub fn update_project_user_permission(
    conn: &Connection,
    project_id: i64,
    user_id: i64,
    permission: Permission,
    updated_at: i64,
) -> AppResult<bool> {
    let permission = permission.validate()?;
    let updated = conn.execute(
        "UPDATE users_projects SET permission = ?1, updated_at = ?2
         WHERE project_id = ?3 AND user_id = ?4",
        params![permission.as_i64(), updated_at, project_id, user_id],
    )?;

    Ok(updated > 0)
}

pub fn delete_project_user(conn: &Connection, project_id: i64, user_id: i64) -> AppResult<bool> {
    let deleted = conn.execute(
        "DELETE FROM users_projects WHERE project_id = ?1 AND user_id = ?2",
        [project_id, user_id],
    )?;

    Ok(deleted > 0)
}

// ============ team_projects ============

pub fn create_team_project(conn: &Connection, grant: &TeamProject) -> AppResult<i64> {
    let permission = grant.permission.validate()?;

    conn.execute(
        "INSERT INTO team_projects (project_id, team_id, permission, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            grant.project_id,
            grant.team_id,
            permission.as_i64(),
            grant.created_at,
            grant.updated_at,
        ],
    )
    .map_err(|e| {
        if super::is_unique_violation(&e) {
            AppError::TeamAlreadyHasAccess {
                team_id: grant.team_id,
                project_id: grant.project_id,
            }
        } else {
            AppError::from(e)
        }
    })?;

    Ok(conn.last_insert_rowid())
}

pub fn get_team_project(
    conn: &Connection,
    project_id: i64,
    team_id: i64,
) -> AppResult<Option<TeamProject>> {
    let grant = conn
        .query_row(
            "SELECT id, project_id, team_id, permission, created_at, updated_at
             FROM team_projects WHERE project_id = ?1 AND team_id = ?2",
            [project_id, team_id],
            team_project_from_row,
        )
        .optional()?;

    Ok(grant)
}

pub fn get_team_projects(conn: &Connection, project_id: i64) -> AppResult<Vec<TeamProject>> {
    let mut stmt = conn.prepare(
        "SELECT id, project_id, team_id, permission, created_at, updated_at
         FROM team_projects WHERE project_id = ?1 ORDER BY id",
    )?;

    let grants: Result<Vec<_>, _> = stmt
        .query_map([project_id], team_project_from_row)?
        .collect();
    grants.map_err(AppError::from)
}

/// Changes only the stored level. Returns false when the grant does not exist.
pub fn update_team_project_permission(
    conn: &Connection,
    project_id: i64,
    team_id: i64,
    permission: Permission,
    updated_at: i64,
) -> AppResult<bool> {
    let permission = permission.validate()?;
    let updated = conn.execute(
        "UPDATE team_projects SET permission = ?1, updated_at = ?2
         WHERE project_id = ?3 AND team_id = ?4",
        params![permission.as_i64(), updated_at, project_id, team_id],
    )?;

    Ok(updated > 0)
}

pub fn delete_team_project(conn: &Connection, project_id: i64, team_id: i64) -> AppResult<bool> {
    let deleted = conn.execute(
        "DELETE FROM team_projects WHERE project_id = ?1 AND team_id = ?2",
        [project_id, team_id],
    )?;

    Ok(deleted > 0)
}
