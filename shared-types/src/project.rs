use crate::permission::Permission;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Identity of the per-user Favorites pseudo-project.
pub const FAVORITES_PROJECT_ID: i64 = -1;

/// Maps a saved filter onto the virtual project id it is exposed as.
pub fn saved_filter_project_id(filter_id: i64) -> i64 {
    -filter_id - 1
}

/// Inverse of [`saved_filter_project_id`]; `None` for ids outside the
/// saved-filter range.
pub fn saved_filter_id_from_project(project_id: i64) -> Option<i64> {
    if project_id < FAVORITES_PROJECT_ID {
        Some(-(project_id + 1))
    } else {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Project {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    /// Public identifier hash, unique when set
    pub identifier: Option<String>,
    /// Reference to the stored background image, if one was uploaded
    pub background: Option<String>,
    pub parent_project_id: Option<i64>,
    /// Set at creation and never updated
    pub owner_id: i64,
    pub is_archived: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Project {
    pub fn new(title: String, owner_id: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            id: 0, // Will be set by database AUTOINCREMENT
            title,
            description: None,
            identifier: None,
            background: None,
            parent_project_id: None,
            owner_id,
            is_archived: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_parent(mut self, parent_project_id: i64) -> Self {
        self.parent_project_id = Some(parent_project_id);
        self
    }

    pub fn is_nested(&self) -> bool {
        self.parent_project_id.is_some()
    }

    pub fn update_timestamp(&mut self) {
        self.updated_at = Utc::now().timestamp();
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SavedFilter {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    /// Filter query evaluated by the task search layer
    pub filters: String,
    pub owner_id: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl SavedFilter {
    pub fn new(title: String, filters: String, owner_id: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            id: 0,
            title,
            description: None,
            filters,
            owner_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn project_id(&self) -> i64 {
        saved_filter_project_id(self.id)
    }
}

/// Request to copy a project (and its content) under an optional new parent.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProjectDuplicate {
    pub project_id: i64,
    pub parent_project_id: Option<i64>,
}

/// Outcome of a permission resolution, as returned to API consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ResolvedPermission {
    pub project_id: i64,
    #[ts(type = "number | null")]
    pub permission: Option<Permission>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saved_filter_ids_round_trip() {
        assert_eq!(saved_filter_project_id(1), -2);
        assert_eq!(saved_filter_project_id(41), -42);
        assert_eq!(saved_filter_id_from_project(-2), Some(1));
        assert_eq!(saved_filter_id_from_project(-42), Some(41));
    }

    #[test]
    fn test_regular_and_favorites_ids_are_not_filters() {
        assert_eq!(saved_filter_id_from_project(FAVORITES_PROJECT_ID), None);
        assert_eq!(saved_filter_id_from_project(0), None);
        assert_eq!(saved_filter_id_from_project(17), None);
    }
}
