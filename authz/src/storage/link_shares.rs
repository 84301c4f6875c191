use super::permission_column;
use crate::error::{AppError, AppResult};
use rand::distr::Alphanumeric;
use rand::Rng;
use rusqlite::{params, Connection, OptionalExtension, Row};
use shared_types::{LinkShare, Permission};

pub const LINK_SHARE_HASH_LENGTH: usize = 40;

const LINK_SHARE_COLUMNS: &str =
    "id, hash, name, project_id, permission, shared_by, expires_at, created_at, updated_at";

fn link_share_from_row(row: &Row<'_>) -> rusqlite::Result<LinkShare> {
    Ok(LinkShare {
        id: row.get(0)?,
        hash: row.get(1)?,
        name: row.get(2)?,
        project_id: row.get(3)?,
        permission: permission_column(row, 4)?,
        shared_by: row.get(5)?,
        expires_at: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

pub fn generate_hash() -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(LINK_SHARE_HASH_LENGTH)
        .map(char::from)
        .collect()
}

/// Inserts the share with a freshly generated hash and returns the stored row.
pub fn create_link_share(conn: &Connection, share: &LinkShare) -> AppResult<LinkShare> {
    let permission = share.permission.validate()?;
    let mut stored = share.clone();
    stored.hash = generate_hash();

    conn.execute(
        "INSERT INTO link_shares (hash, name, project_id, permission, shared_by, expires_at, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            stored.hash,
            stored.name,
            stored.project_id,
            permission.as_i64(),
            stored.shared_by,
            stored.expires_at,
            stored.created_at,
            stored.updated_at,
        ],
    )?;

    stored.id = conn.last_insert_rowid();
    tracing::info!(
        "Created {} link share {} for project {}",
        permission,
        stored.id,
        stored.project_id
    );
    Ok(stored)
}

pub fn get_link_share(conn: &Connection, id: i64) -> AppResult<Option<LinkShare>> {
    let share = conn
        .query_row(
            &format!("SELECT {LINK_SHARE_COLUMNS} FROM link_shares WHERE id = ?1"),
            [id],
            link_share_from_row,
        )
        .optional()?;

    Ok(share)
}

pub fn get_link_share_by_hash(conn: &Connection, hash: &str) -> AppResult<Option<LinkShare>> {
    let share = conn
        .query_row(
            &format!("SELECT {LINK_SHARE_COLUMNS} FROM link_shares WHERE hash = ?1"),
            [hash],
            link_share_from_row,
        )
        .optional()?;

    Ok(share)
}

pub fn get_project_link_shares(conn: &Connection, project_id: i64) -> AppResult<Vec<LinkShare>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {LINK_SHARE_COLUMNS} FROM link_shares WHERE project_id = ?1 ORDER BY id"
    ))?;

    let shares: Result<Vec<_>, _> = stmt.query_map([project_id], link_share_from_row)?.collect();
    shares.map_err(AppError::from)
}

/// Returns false when the share does not exist.
pub fn update_link_share(
    conn: &Connection,
    id: i64,
    permission: Permission,
    expires_at: Option<i64>,
    updated_at: i64,
) -> AppResult<bool> {
    let permission = permission.validate()?;
    let updated = conn.execute(
        "UPDATE link_shares SET permission = ?1, expires_at = ?2, updated_at = ?3 WHERE id = ?4",
        params![permission.as_i64(), expires_at, updated_at, id],
    )?;

    Ok(updated > 0)
}

pub fn delete_link_share(conn: &Connection, id: i64) -> AppResult<bool> {
    let deleted = conn.execute("DELETE FROM link_shares WHERE id = ?1", [id])?;
    Ok(deleted > 0)
}
