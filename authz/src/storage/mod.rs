//! SQLite-backed grant store.
//!
//! Reads go through the [`ProjectStore`], [`GrantStore`] and [`ContentStore`]
//! traits so the resolution engine and guards only see lookups. They are
//! implemented for [`rusqlite::Connection`], which makes them usable both on a
//! plain connection and inside a transaction. Mutations are free functions in
//! the submodules, always taking the connection of the enclosing transaction.

pub mod content;
pub mod grants;
pub mod link_shares;
pub mod projects;
pub mod teams;
pub mod users;

use crate::error::AppResult;
use rusqlite::types::Type;
use rusqlite::Row;
use shared_types::{
    Label, LinkShare, Permission, Project, Reaction, SavedFilter, Task, TaskComment, Team,
    TeamMember, Webhook,
};

refinery::embed_migrations!("src/storage/migrations");

pub fn run_migrations(conn: &mut rusqlite::Connection) -> Result<(), refinery::Error> {
    migrations::runner().run(conn).map(|_| ())
}

/// Project rows and their virtual saved-filter projections.
pub trait ProjectStore {
    fn get_project(&self, id: i64) -> AppResult<Option<Project>>;
    fn get_saved_filter(&self, id: i64) -> AppResult<Option<SavedFilter>>;
}

/// Stored grants. Ownership is not a grant and is read from the project row.
pub trait GrantStore {
    /// Direct `ProjectUser` grant for exactly this project.
    fn project_user_permission(&self, project_id: i64, user_id: i64)
        -> AppResult<Option<Permission>>;

    /// Highest `TeamProject` grant on exactly this project across every team
    /// the user is a member of.
    fn team_project_permission(&self, project_id: i64, user_id: i64)
        -> AppResult<Option<Permission>>;

    fn get_team_member(&self, team_id: i64, user_id: i64) -> AppResult<Option<TeamMember>>;
}

/// Lookups the per-entity guards need to find an owning project.
pub trait ContentStore {
    fn get_task(&self, id: i64) -> AppResult<Option<Task>>;
    fn get_label(&self, id: i64) -> AppResult<Option<Label>>;
    fn label_task_exists(&self, task_id: i64, label_id: i64) -> AppResult<bool>;
    /// Projects of all tasks the label is attached to.
    fn label_project_ids(&self, label_id: i64) -> AppResult<Vec<i64>>;
    fn get_comment(&self, id: i64) -> AppResult<Option<TaskComment>>;
    fn get_reaction(&self, id: i64) -> AppResult<Option<Reaction>>;
    fn get_webhook(&self, id: i64) -> AppResult<Option<Webhook>>;
    fn get_link_share(&self, id: i64) -> AppResult<Option<LinkShare>>;
    fn get_team(&self, id: i64) -> AppResult<Option<Team>>;
}

/// Everything the guards consult.
pub trait Store: ProjectStore + GrantStore + ContentStore {}

impl<T: ProjectStore + GrantStore + ContentStore + ?Sized> Store for T {}

pub(crate) fn permission_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Permission> {
    let raw: i64 = row.get(idx)?;
    Permission::try_from(raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Integer, Box::new(e)))
}

pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}
