use serde::{Deserialize, Serialize};
use shared_types::InvalidPermission;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] refinery::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Project does not exist: {0}")]
    ProjectNotFound(i64),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid permission: {0}")]
    InvalidPermission(i64),

    #[error("User {user_id} already has access to project {project_id}")]
    UserAlreadyHasAccess { user_id: i64, project_id: i64 },

    #[error("Team {team_id} already has access to project {project_id}")]
    TeamAlreadyHasAccess { team_id: i64, project_id: i64 },

    #[error("User {user_id} is already a member of team {team_id}")]
    UserAlreadyInTeam { user_id: i64, team_id: i64 },

    #[error("Cannot remove the last member of team {0}")]
    CannotRemoveLastTeamMember(i64),

    #[error("Project {0} is archived")]
    ProjectArchived(i64),

    #[error("Link share has expired")]
    LinkShareExpired,

    #[error("Project hierarchy above {0} is cyclic or exceeds the depth limit")]
    HierarchyTooDeep(i64),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl From<InvalidPermission> for AppError {
    fn from(err: InvalidPermission) -> Self {
        AppError::InvalidPermission(err.0)
    }
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        ErrorResponse {
            error: err.error_type().to_string(),
            message: err.to_string(),
        }
    }
}

impl AppError {
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::Database(_) => "database_error",
            AppError::Migration(_) => "migration_error",
            AppError::Config(_) => "config_error",
            AppError::Io(_) => "io_error",
            AppError::ProjectNotFound(_) => "project_not_found",
            AppError::NotFound(_) => "not_found",
            AppError::InvalidPermission(_) => "invalid_permission",
            AppError::UserAlreadyHasAccess { .. } => "user_already_has_access",
            AppError::TeamAlreadyHasAccess { .. } => "team_already_has_access",
            AppError::UserAlreadyInTeam { .. } => "user_already_in_team",
            AppError::CannotRemoveLastTeamMember(_) => "cannot_remove_last_team_member",
            AppError::ProjectArchived(_) => "project_archived",
            AppError::LinkShareExpired => "link_share_expired",
            AppError::HierarchyTooDeep(_) => "hierarchy_too_deep",
            AppError::Forbidden(_) => "forbidden",
            AppError::InvalidRequest(_) => "invalid_request",
            AppError::Internal(_) => "internal_error",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::ProjectNotFound(_) | AppError::NotFound(_))
    }

    pub fn is_forbidden(&self) -> bool {
        matches!(self, AppError::Forbidden(_))
    }

    pub fn is_already_has_access(&self) -> bool {
        matches!(
            self,
            AppError::UserAlreadyHasAccess { .. }
                | AppError::TeamAlreadyHasAccess { .. }
                | AppError::UserAlreadyInTeam { .. }
        )
    }

    pub(crate) fn not_found(entity: &str, id: i64) -> Self {
        AppError::NotFound(format!("{entity} {id} does not exist"))
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Turns a missing row into a "does not exist" error.
pub(crate) fn require<T>(value: Option<T>, entity: &str, id: i64) -> AppResult<T> {
    value.ok_or_else(|| AppError::not_found(entity, id))
}
