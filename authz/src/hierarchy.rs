//! Project forest traversal and owning-project resolution.

use crate::error::{require, AppError, AppResult};
use crate::storage::{ProjectStore, Store};
use shared_types::{
    saved_filter_id_from_project, LabelTask, Project, Reaction, ReactionKind, Task, TaskComment,
    Webhook, FAVORITES_PROJECT_ID,
};
use std::collections::HashSet;

/// Classification of a project id before any lookup happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectKind {
    Favorites,
    /// Virtual projection of the saved filter with this id
    SavedFilter(i64),
    Regular(i64),
}

impl ProjectKind {
    pub fn of(project_id: i64) -> Self {
        if project_id == FAVORITES_PROJECT_ID {
            ProjectKind::Favorites
        } else if let Some(filter_id) = saved_filter_id_from_project(project_id) {
            ProjectKind::SavedFilter(filter_id)
        } else {
            ProjectKind::Regular(project_id)
        }
    }
}

pub struct ProjectHierarchy<'s, S: ?Sized> {
    store: &'s S,
    max_depth: usize,
}

impl<'s, S: ProjectStore + ?Sized> ProjectHierarchy<'s, S> {
    pub fn new(store: &'s S, max_depth: usize) -> Self {
        Self { store, max_depth }
    }

    pub fn get_project(&self, id: i64) -> AppResult<Project> {
        self.store
            .get_project(id)?
            .ok_or(AppError::ProjectNotFound(id))
    }

    /// Loads `project_id` followed by each of its ancestors, root last.
    ///
    /// At most `max_depth` parent links are followed; a longer chain or a
    /// revisited project fails with `HierarchyTooDeep`. A parent that no longer
    /// exists ends the chain.
    pub fn ancestor_chain(&self, project_id: i64) -> AppResult<Vec<Project>> {
        let mut chain = vec![self.get_project(project_id)?];
        let mut visited = HashSet::from([project_id]);

        while let Some(parent_id) = chain.last().and_then(|p| p.parent_project_id) {
            if chain.len() > self.max_depth || !visited.insert(parent_id) {
                tracing::warn!(
                    "Stopped walking ancestors of project {} at {}",
                    project_id,
                    parent_id
                );
                return Err(AppError::HierarchyTooDeep(project_id));
            }

            match self.store.get_project(parent_id)? {
                Some(parent) => chain.push(parent),
                None => {
                    tracing::warn!(
                        "Project {} references missing parent {}",
                        chain.last().map(|p| p.id).unwrap_or(project_id),
                        parent_id
                    );
                    break;
                }
            }
        }

        Ok(chain)
    }

    /// Fails with `ProjectArchived` if the project or any ancestor is archived.
    pub fn check_is_archived(&self, project_id: i64) -> AppResult<()> {
        let chain = self.ancestor_chain(project_id)?;
        match chain.iter().find(|p| p.is_archived) {
            Some(archived) => Err(AppError::ProjectArchived(archived.id)),
            None => Ok(()),
        }
    }

    /// Whether `ancestor_id` is `project_id` itself or one of its ancestors.
    pub fn is_self_or_ancestor(&self, ancestor_id: i64, project_id: i64) -> AppResult<bool> {
        let chain = self.ancestor_chain(project_id)?;
        Ok(chain.iter().any(|p| p.id == ancestor_id))
    }
}

/// Resolves the single project an entity belongs to. Dangling references are
/// "does not exist" errors, never denials.
pub trait OwningProject {
    fn owning_project_id<S: Store + ?Sized>(&self, store: &S) -> AppResult<i64>;
}

impl OwningProject for Task {
    fn owning_project_id<S: Store + ?Sized>(&self, _store: &S) -> AppResult<i64> {
        Ok(self.project_id)
    }
}

impl OwningProject for TaskComment {
    fn owning_project_id<S: Store + ?Sized>(&self, store: &S) -> AppResult<i64> {
        let task = require(store.get_task(self.task_id)?, "task", self.task_id)?;
        Ok(task.project_id)
    }
}

impl OwningProject for LabelTask {
    fn owning_project_id<S: Store + ?Sized>(&self, store: &S) -> AppResult<i64> {
        let task = require(store.get_task(self.task_id)?, "task", self.task_id)?;
        Ok(task.project_id)
    }
}

impl OwningProject for Reaction {
    fn owning_project_id<S: Store + ?Sized>(&self, store: &S) -> AppResult<i64> {
        reacted_task(self, store).map(|task| task.project_id)
    }
}

impl OwningProject for Webhook {
    fn owning_project_id<S: Store + ?Sized>(&self, _store: &S) -> AppResult<i64> {
        Ok(self.project_id)
    }
}

/// The task a reaction ultimately hangs off, following comments to their task.
pub fn reacted_task<S: Store + ?Sized>(reaction: &Reaction, store: &S) -> AppResult<Task> {
    let task_id = match reaction.kind {
        ReactionKind::Task => reaction.entity_id,
        ReactionKind::Comment => {
            let comment = require(
                store.get_comment(reaction.entity_id)?,
                "comment",
                reaction.entity_id,
            )?;
            comment.task_id
        }
    };

    require(store.get_task(task_id)?, "task", task_id)
}
