//! Effective permission resolution.
//!
//! A principal's level on a project is the maximum over every level of the
//! project's ancestor chain of: `Admin` for the owner, the direct user grant
//! and the best team grant. A grant anywhere in the chain can only raise the
//! result.

use crate::error::{require, AppResult};
use crate::hierarchy::{ProjectHierarchy, ProjectKind};
use crate::principal::Principal;
use crate::storage::Store;
use shared_types::{Permission, Project};
use std::collections::HashMap;

pub struct PermissionResolver<'s, S: ?Sized> {
    store: &'s S,
    max_depth: usize,
}

impl<'s, S: Store + ?Sized> PermissionResolver<'s, S> {
    pub fn new(store: &'s S, max_depth: usize) -> Self {
        Self { store, max_depth }
    }

    pub fn store(&self) -> &'s S {
        self.store
    }

    pub fn hierarchy(&self) -> ProjectHierarchy<'s, S> {
        ProjectHierarchy::new(self.store, self.max_depth)
    }

    /// Highest level `principal` holds on `project_id`, or `None` when nothing
    /// applies anywhere in the ancestor chain.
    pub fn resolve(&self, principal: &Principal, project_id: i64) -> AppResult<Option<Permission>> {
        match *principal {
            Principal::LinkShare {
                id,
                project_id: scoped_to,
                permission,
            } => {
                if scoped_to == project_id {
                    Ok(Some(permission))
                } else {
                    tracing::debug!(
                        "Link share {} is scoped to project {}, not {}",
                        id,
                        scoped_to,
                        project_id
                    );
                    Ok(None)
                }
            }
            Principal::User { id } => self.resolve_for_user(id, project_id),
        }
    }

    /// Resolves each project independently; only projects with a granted level
    /// appear in the result.
    pub fn resolve_many(
        &self,
        principal: &Principal,
        project_ids: &[i64],
    ) -> AppResult<HashMap<i64, Permission>> {
        let mut resolved = HashMap::with_capacity(project_ids.len());
        for &project_id in project_ids {
            if let Some(permission) = self.resolve(principal, project_id)? {
                resolved.insert(project_id, permission);
            }
        }
        Ok(resolved)
    }

    fn resolve_for_user(&self, user_id: i64, project_id: i64) -> AppResult<Option<Permission>> {
        match ProjectKind::of(project_id) {
            ProjectKind::Favorites => Ok(Some(Permission::Read)),
            ProjectKind::SavedFilter(filter_id) => {
                let filter = require(
                    self.store.get_saved_filter(filter_id)?,
                    "saved filter",
                    filter_id,
                )?;
                Ok((filter.owner_id == user_id).then_some(Permission::Admin))
            }
            ProjectKind::Regular(id) => {
                let chain = self.hierarchy().ancestor_chain(id)?;
                self.max_over_chain(user_id, &chain)
            }
        }
    }

    fn max_over_chain(&self, user_id: i64, chain: &[Project]) -> AppResult<Option<Permission>> {
        let mut best: Option<Permission> = None;

        for project in chain {
            let level = self.level_permission(user_id, project)?;
            if level > best {
                tracing::debug!(
                    "User {} gets {:?} from project {}",
                    user_id,
                    level,
                    project.id
                );
                best = level;
            }
            if best == Some(Permission::Admin) {
                break;
            }
        }

        Ok(best)
    }

    fn level_permission(&self, user_id: i64, project: &Project) -> AppResult<Option<Permission>> {
        if project.owner_id == user_id {
            return Ok(Some(Permission::Admin));
        }

        let direct = self.store.project_user_permission(project.id, user_id)?;
        let team = self.store.team_project_permission(project.id, user_id)?;
        Ok(Permission::max_of(direct.into_iter().chain(team)))
    }

    /// Whether the principal can read the project, and the level it reads at.
    pub fn can_read_project(
        &self,
        principal: &Principal,
        project_id: i64,
    ) -> AppResult<(bool, Permission)> {
        Ok(match self.resolve(principal, project_id)? {
            Some(permission) => (true, permission),
            None => (false, Permission::Unknown),
        })
    }

    /// Write access to a project.
    ///
    /// Returns `Ok(false)` without a sufficient grant. When the grant suffices
    /// but the project or an ancestor is archived, fails with
    /// `ProjectArchived` naming the archived project. Favorites is never
    /// writable.
    pub fn can_write_project(&self, principal: &Principal, project_id: i64) -> AppResult<bool> {
        let kind = ProjectKind::of(project_id);
        if kind == ProjectKind::Favorites {
            return Ok(false);
        }

        let granted = self.resolve(principal, project_id)?;
        if !granted.is_some_and(|p| p.satisfies(Permission::Write)) {
            return Ok(false);
        }

        if let ProjectKind::Regular(id) = kind {
            self.hierarchy().check_is_archived(id)?;
        }
        Ok(true)
    }

    pub fn is_project_admin(&self, principal: &Principal, project_id: i64) -> AppResult<bool> {
        if ProjectKind::of(project_id) == ProjectKind::Favorites {
            return Ok(false);
        }

        let granted = self.resolve(principal, project_id)?;
        Ok(granted.is_some_and(|p| p.satisfies(Permission::Admin)))
    }

    /// Team admin rights cover the team's membership only, never its projects.
    pub fn is_team_admin(&self, principal: &Principal, team_id: i64) -> AppResult<bool> {
        let Some(user_id) = principal.user_id() else {
            return Ok(false);
        };

        let member = self.store.get_team_member(team_id, user_id)?;
        Ok(member.is_some_and(|m| m.admin))
    }
}
