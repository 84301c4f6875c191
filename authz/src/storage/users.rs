use crate::error::{AppError, AppResult};
use rusqlite::{params, Connection, OptionalExtension};
use shared_types::User;

pub fn create_user(conn: &Connection, user: &User) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO users (username, email, created_at) VALUES (?1, ?2, ?3)",
        params![user.username, user.email, user.created_at],
    )
    .map_err(|e| {
        if super::is_unique_violation(&e) {
            AppError::InvalidRequest(format!("Username already taken: {}", user.username))
        } else {
            AppError::from(e)
        }
    })?;

    let id = conn.last_insert_rowid();
    tracing::debug!("Created user {} ({})", id, user.username);
    Ok(id)
}

pub fn get_user(conn: &Connection, id: i64) -> AppResult<Option<User>> {
    let user = conn
        .query_row(
            "SELECT id, username, email, created_at FROM users WHERE id = ?1",
            [id],
            |row| {
                Ok(User {
                    id: row.get(0)?,
                    username: row.get(1)?,
                    email: row.get(2)?,
                    created_at: row.get(3)?,
                })
            },
        )
        .optional()?;

    Ok(user)
}
