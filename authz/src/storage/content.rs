use super::ContentStore;
use crate::error::{AppError, AppResult};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};
use shared_types::{
    Label, LabelTask, LinkShare, Reaction, ReactionKind, Task, TaskComment, Team, Webhook,
};

impl ContentStore for Connection {
    fn get_task(&self, id: i64) -> AppResult<Option<Task>> {
        let task = self
            .query_row(
                "SELECT id, title, description, done, project_id, created_by, created_at, updated_at
                 FROM tasks WHERE id = ?1",
                [id],
                |row| {
                    Ok(Task {
                        id: row.get(0)?,
                        title: row.get(1)?,
                        description: row.get(2)?,
                        done: row.get(3)?,
                        project_id: row.get(4)?,
                        created_by: row.get(5)?,
                        created_at: row.get(6)?,
                        updated_at: row.get(7)?,
                    })
                },
            )
            .optional()?;

        Ok(task)
    }

    fn get_label(&self, id: i64) -> AppResult<Option<Label>> {
        let label = self
            .query_row(
                "SELECT id, title, hex_color, created_by, created_at, updated_at
                 FROM labels WHERE id = ?1",
                [id],
                |row| {
                    Ok(Label {
                        id: row.get(0)?,
                        title: row.get(1)?,
                        hex_color: row.get(2)?,
                        created_by: row.get(3)?,
                        created_at: row.get(4)?,
                        updated_at: row.get(5)?,
                    })
                },
            )
            .optional()?;

        Ok(label)
    }

    fn label_task_exists(&self, task_id: i64, label_id: i64) -> AppResult<bool> {
        let exists = self.query_row(
            "SELECT EXISTS(SELECT 1 FROM label_tasks WHERE task_id = ?1 AND label_id = ?2)",
            [task_id, label_id],
            |row| row.get(0),
        )?;

        Ok(exists)
    }

    fn label_project_ids(&self, label_id: i64) -> AppResult<Vec<i64>> {
        let mut stmt = self.prepare(
            "SELECT DISTINCT t.project_id
             FROM label_tasks lt
             INNER JOIN tasks t ON t.id = lt.task_id
             WHERE lt.label_id = ?1
             ORDER BY t.project_id",
        )?;

        let ids: Result<Vec<i64>, _> = stmt.query_map([label_id], |row| row.get(0))?.collect();
        ids.map_err(AppError::from)
    }

    fn get_comment(&self, id: i64) -> AppResult<Option<TaskComment>> {
        let comment = self
            .query_row(
                "SELECT id, task_id, author_id, comment, created_at, updated_at
                 FROM task_comments WHERE id = ?1",
                [id],
                |row| {
                    Ok(TaskComment {
                        id: row.get(0)?,
                        task_id: row.get(1)?,
                        author_id: row.get(2)?,
                        comment: row.get(3)?,
                        created_at: row.get(4)?,
                        updated_at: row.get(5)?,
                    })
                },
            )
            .optional()?;

        Ok(comment)
    }

    fn get_reaction(&self, id: i64) -> AppResult<Option<Reaction>> {
        let reaction = self
            .query_row(
                "SELECT id, author_id, entity_kind, entity_id, value, created_at
                 FROM reactions WHERE id = ?1",
                [id],
                |row| {
                    let kind_str: String = row.get(2)?;
                    let kind = ReactionKind::from_str(&kind_str).ok_or_else(|| {
                        rusqlite::Error::FromSqlConversionFailure(
                            2,
                            Type::Text,
                            format!("unknown reaction kind: {kind_str}").into(),
                        )
                    })?;

                    Ok(Reaction {
                        id: row.get(0)?,
                        author_id: row.get(1)?,
                        kind,
                        entity_id: row.get(3)?,
                        value: row.get(4)?,
                        created_at: row.get(5)?,
                    })
                },
            )
            .optional()?;

        Ok(reaction)
    }

    fn get_webhook(&self, id: i64) -> AppResult<Option<Webhook>> {
        let webhook = self
            .query_row(
                "SELECT id, project_id, target_url, events, secret, created_by, created_at, updated_at
                 FROM webhooks WHERE id = ?1",
                [id],
                |row| {
                    let events_json: String = row.get(3)?;
                    let events = serde_json::from_str(&events_json).map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e))
                    })?;

                    Ok(Webhook {
                        id: row.get(0)?,
                        project_id: row.get(1)?,
                        target_url: row.get(2)?,
                        events,
                        secret: row.get(4)?,
                        created_by: row.get(5)?,
                        created_at: row.get(6)?,
                        updated_at: row.get(7)?,
                    })
                },
            )
            .optional()?;

        Ok(webhook)
    }

    fn get_link_share(&self, id: i64) -> AppResult<Option<LinkShare>> {
        super::link_shares::get_link_share(self, id)
    }

    fn get_team(&self, id: i64) -> AppResult<Option<Team>> {
        super::teams::get_team(self, id)
    }
}

pub fn create_task(conn: &Connection, task: &Task) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO tasks (title, description, done, project_id, created_by, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            task.title,
            task.description,
            task.done,
            task.project_id,
            task.created_by,
            task.created_at,
            task.updated_at,
        ],
    )?;

    Ok(conn.last_insert_rowid())
}

pub fn update_task(conn: &Connection, task: &Task) -> AppResult<()> {
    let updated = conn.execute(
        "UPDATE tasks SET title = ?1, description = ?2, done = ?3, project_id = ?4, updated_at = ?5
         WHERE id = ?6",
        params![
            task.title,
            task.description,
            task.done,
            task.project_id,
            task.updated_at,
            task.id,
        ],
    )?;

    if updated == 0 {
        return Err(AppError::not_found("task", task.id));
    }
    Ok(())
}

pub fn create_label(conn: &Connection, label: &Label) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO labels (title, hex_color, created_by, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            label.title,
            label.hex_color,
            label.created_by,
            label.created_at,
            label.updated_at,
        ],
    )?;

    Ok(conn.last_insert_rowid())
}

pub fn add_label_to_task(conn: &Connection, label_task: &LabelTask) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO label_tasks (task_id, label_id, created_at) VALUES (?1, ?2, ?3)",
        params![label_task.task_id, label_task.label_id, label_task.created_at],
    )
    .map_err(|e| {
        if super::is_unique_violation(&e) {
            AppError::InvalidRequest(format!(
                "Label {} is already attached to task {}",
                label_task.label_id, label_task.task_id
            ))
        } else {
            AppError::from(e)
        }
    })?;

    Ok(conn.last_insert_rowid())
}

pub fn create_comment(conn: &Connection, comment: &TaskComment) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO task_comments (task_id, author_id, comment, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            comment.task_id,
            comment.author_id,
            comment.comment,
            comment.created_at,
            comment.updated_at,
        ],
    )?;

    Ok(conn.last_insert_rowid())
}

pub fn create_reaction(conn: &Connection, reaction: &Reaction) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO reactions (author_id, entity_kind, entity_id, value, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            reaction.author_id,
            reaction.kind.as_str(),
            reaction.entity_id,
            reaction.value,
            reaction.created_at,
        ],
    )?;

    Ok(conn.last_insert_rowid())
}

pub fn create_webhook(conn: &Connection, webhook: &Webhook) -> AppResult<i64> {
    let events_json = serde_json::to_string(&webhook.events)
        .map_err(|e| AppError::Internal(format!("Failed to serialize webhook events: {e}")))?;

    conn.execute(
        "INSERT INTO webhooks (project_id, target_url, events, secret, created_by, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            webhook.project_id,
            webhook.target_url,
            events_json,
            webhook.secret,
            webhook.created_by,
            webhook.created_at,
            webhook.updated_at,
        ],
    )?;

    Ok(conn.last_insert_rowid())
}
