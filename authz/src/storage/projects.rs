use super::ProjectStore;
use crate::error::{AppError, AppResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use shared_types::{Project, SavedFilter};

const PROJECT_COLUMNS: &str = "id, title, description, identifier, background, parent_project_id, \
     owner_id, is_archived, created_at, updated_at";

fn project_from_row(row: &Row<'_>) -> rusqlite::Result<Project> {
    Ok(Project {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        identifier: row.get(3)?,
        background: row.get(4)?,
        parent_project_id: row.get(5)?,
        owner_id: row.get(6)?,
        is_archived: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

impl ProjectStore for Connection {
    fn get_project(&self, id: i64) -> AppResult<Option<Project>> {
        let project = self
            .query_row(
                &format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ?1"),
                [id],
                project_from_row,
            )
            .optional()?;

        Ok(project)
    }

    fn get_saved_filter(&self, id: i64) -> AppResult<Option<SavedFilter>> {
        let filter = self
            .query_row(
                "SELECT id, title, description, filters, owner_id, created_at, updated_at
                 FROM saved_filters WHERE id = ?1",
                [id],
                |row| {
                    Ok(SavedFilter {
                        id: row.get(0)?,
                        title: row.get(1)?,
                        description: row.get(2)?,
                        filters: row.get(3)?,
                        owner_id: row.get(4)?,
                        created_at: row.get(5)?,
                        updated_at: row.get(6)?,
                    })
                },
            )
            .optional()?;

        Ok(filter)
    }
}

pub fn create_project(conn: &Connection, project: &Project) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO projects (title, description, identifier, background, parent_project_id, owner_id, is_archived, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            project.title,
            project.description,
            project.identifier,
            project.background,
            project.parent_project_id,
            project.owner_id,
            project.is_archived,
            project.created_at,
            project.updated_at,
        ],
    )?;

    let id = conn.last_insert_rowid();
    tracing::info!("Created project {} owned by user {}", id, project.owner_id);
    Ok(id)
}

/// Updates the mutable project attributes. The owner is never rewritten.
pub fn update_project(conn: &Connection, project: &Project) -> AppResult<()> {
    let updated = conn.execute(
        "UPDATE projects
         SET title = ?1, description = ?2, identifier = ?3, background = ?4, parent_project_id = ?5,
             is_archived = ?6, updated_at = ?7
         WHERE id = ?8",
        params![
            project.title,
            project.description,
            project.identifier,
            project.background,
            project.parent_project_id,
            project.is_archived,
            project.updated_at,
            project.id,
        ],
    )?;

    if updated == 0 {
        return Err(AppError::ProjectNotFound(project.id));
    }

    tracing::info!("Updated project {}", project.id);
    Ok(())
}

/// Deletes a project. Grants, shares, tasks and child projects cascade.
pub fn delete_project(conn: &Connection, id: i64) -> AppResult<()> {
    let deleted = conn.execute("DELETE FROM projects WHERE id = ?1", [id])?;
    if deleted == 0 {
        return Err(AppError::ProjectNotFound(id));
    }

    tracing::info!("Deleted project {}", id);
    Ok(())
}

pub fn create_saved_filter(conn: &Connection, filter: &SavedFilter) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO saved_filters (title, description, filters, owner_id, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            filter.title,
            filter.description,
            filter.filters,
            filter.owner_id,
            filter.created_at,
            filter.updated_at,
        ],
    )?;

    Ok(conn.last_insert_rowid())
}
