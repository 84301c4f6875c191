use crate::error::{AppError, AppResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use shared_types::{Team, TeamMember};

fn member_from_row(row: &Row<'_>) -> rusqlite::Result<TeamMember> {
    Ok(TeamMember {
        id: row.get(0)?,
        team_id: row.get(1)?,
        user_id: row.get(2)?,
        admin: row.get(3)?,
        created_at: row.get(4)?,
    })
}

pub fn create_team(conn: &Connection, team: &Team) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO teams (name, description, created_by, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            team.name,
            team.description,
            team.created_by,
            team.created_at,
            team.updated_at,
        ],
    )?;

    let id = conn.last_insert_rowid();
    tracing::info!("Created team {} ({})", id, team.name);
    Ok(id)
}

pub fn get_team(conn: &Connection, id: i64) -> AppResult<Option<Team>> {
    let team = conn
        .query_row(
            "SELECT id, name, description, created_by, created_at, updated_at
             FROM teams WHERE id = ?1",
            [id],
            |row| {
                Ok(Team {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    description: row.get(2)?,
                    created_by: row.get(3)?,
                    created_at: row.get(4)?,
                    updated_at: row.get(5)?,
                })
            },
        )
        .optional()?;

    Ok(team)
}

pub fn add_team_member(conn: &Connection, member: &TeamMember) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO team_members (team_id, user_id, admin, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![member.team_id, member.user_id, member.admin, member.created_at],
    )
    .map_err(|e| {
        if super::is_unique_violation(&e) {
            AppError::UserAlreadyInTeam {
                user_id: member.user_id,
                team_id: member.team_id,
            }
        } else {
            AppError::from(e)
        }
    })?;

    let id = conn.last_insert_rowid();
    tracing::info!(
        "Added user {} to team {} (admin: {})",
        member.user_id,
        member.team_id,
        member.admin
    );
    Ok(id)
}

pub fn get_team_member(
    conn: &Connection,
    team_id: i64,
    user_id: i64,
) -> AppResult<Option<TeamMember>> {
    let member = conn
        .query_row(
            "SELECT id, team_id, user_id, admin, created_at
             FROM team_members WHERE team_id = ?1 AND user_id = ?2",
            [team_id, user_id],
            member_from_row,
        )
        .optional()?;

    Ok(member)
}

pub fn get_team_members(conn: &Connection, team_id: i64) -> AppResult<Vec<TeamMember>> {
    let mut stmt = conn.prepare(
        "SELECT id, team_id, user_id, admin, created_at
         FROM team_members WHERE team_id = ?1 ORDER BY id",
    )?;

    let members: Result<Vec<_>, _> = stmt.query_map([team_id], member_from_row)?.collect();
    members.map_err(AppError::from)
}

/// Returns false when the membership does not exist.
pub fn set_team_member_admin(
    conn: &Connection,
    team_id: i64,
    user_id: i64,
    admin: bool,
) -> AppResult<bool> {
    let updated = conn.execute(
        "UPDATE team_members SET admin = ?1 WHERE team_id = ?2 AND user_id = ?3",
        params![admin, team_id, user_id],
    )?;

    Ok(updated > 0)
}

/// Returns false when the membership does not exist.
pub fn remove_team_member(conn: &Connection, team_id: i64, user_id: i64) -> AppResult<bool> {
    let deleted = conn.execute(
        "DELETE FROM team_members WHERE team_id = ?1 AND user_id = ?2",
        [team_id, user_id],
    )?;

    Ok(deleted > 0)
}

pub fn count_team_members(conn: &Connection, team_id: i64) -> AppResult<i64> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM team_members WHERE team_id = ?1",
        [team_id],
        |row| row.get(0),
    )?;

    Ok(count)
}
