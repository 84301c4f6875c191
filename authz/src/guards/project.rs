use super::AccessGuard;
use crate::error::{AppError, AppResult};
use crate::hierarchy::ProjectKind;
use crate::permissions::PermissionResolver;
use crate::principal::Principal;
use crate::storage::Store;
use shared_types::{Permission, Project};

impl AccessGuard for Project {
    /// Nested projects need write access to the parent; root projects can be
    /// created by any user.
    fn can_create<S: Store + ?Sized>(
        &self,
        resolver: &PermissionResolver<'_, S>,
        principal: &Principal,
    ) -> AppResult<bool> {
        match self.parent_project_id {
            Some(parent_id) => resolver.can_write_project(principal, parent_id),
            None => Ok(principal.user_id().is_some()),
        }
    }

    fn can_read<S: Store + ?Sized>(
        &self,
        resolver: &PermissionResolver<'_, S>,
        principal: &Principal,
    ) -> AppResult<(bool, Permission)> {
        resolver.can_read_project(principal, self.id)
    }

    /// `self` is the desired state. Without write access to the project this
    /// is `false` before any move is looked at. Moving to a new parent requires
    /// write access there too; un-archiving is the one write an archived
    /// project accepts.
    fn can_update<S: Store + ?Sized>(
        &self,
        resolver: &PermissionResolver<'_, S>,
        principal: &Principal,
    ) -> AppResult<bool> {
        match ProjectKind::of(self.id) {
            ProjectKind::Favorites => return Ok(false),
            ProjectKind::SavedFilter(_) => return resolver.can_write_project(principal, self.id),
            ProjectKind::Regular(_) => {}
        }

        let hierarchy = resolver.hierarchy();
        let stored = hierarchy.get_project(self.id)?;

        let writable = match resolver.can_write_project(principal, self.id) {
            Err(AppError::ProjectArchived(archived_id))
                if archived_id == self.id && stored.is_archived && !self.is_archived =>
            {
                // Unarchiving only works while every ancestor is active
                if let Some(parent_id) = stored.parent_project_id {
                    hierarchy.check_is_archived(parent_id)?;
                }
                true
            }
            other => other?,
        };
        if !writable {
            return Ok(false);
        }

        if self.parent_project_id != stored.parent_project_id {
            if let Some(new_parent) = self.parent_project_id {
                if hierarchy.is_self_or_ancestor(self.id, new_parent)? {
                    return Err(AppError::InvalidRequest(format!(
                        "Project {} cannot be moved below itself",
                        self.id
                    )));
                }
                if !resolver.can_write_project(principal, new_parent)? {
                    tracing::debug!(
                        "Refusing to move project {} into {} without write access",
                        self.id,
                        new_parent
                    );
                    return Err(AppError::Forbidden(format!(
                        "No write access to destination project {new_parent}"
                    )));
                }
            }
        }

        Ok(true)
    }

    fn can_delete<S: Store + ?Sized>(
        &self,
        resolver: &PermissionResolver<'_, S>,
        principal: &Principal,
    ) -> AppResult<bool> {
        resolver.is_project_admin(principal, self.id)
    }
}
