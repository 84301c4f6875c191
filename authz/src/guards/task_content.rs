//! Comments and reactions. Both are task content, so link shares with the
//! right level may author them.

use super::AccessGuard;
use crate::error::{require, AppResult};
use crate::hierarchy::{reacted_task, OwningProject};
use crate::permissions::PermissionResolver;
use crate::principal::Principal;
use crate::storage::Store;
use shared_types::{Permission, Reaction, TaskComment};

fn stored_comment<S: Store + ?Sized>(
    resolver: &PermissionResolver<'_, S>,
    id: i64,
) -> AppResult<TaskComment> {
    require(resolver.store().get_comment(id)?, "comment", id)
}

/// Write access to the task, and the principal wrote the comment.
fn can_edit_comment<S: Store + ?Sized>(
    resolver: &PermissionResolver<'_, S>,
    principal: &Principal,
    id: i64,
) -> AppResult<bool> {
    let stored = stored_comment(resolver, id)?;
    let project_id = stored.owning_project_id(resolver.store())?;
    if !resolver.can_write_project(principal, project_id)? {
        return Ok(false);
    }

    Ok(stored.author_id == principal.author_id())
}

impl AccessGuard for TaskComment {
    fn can_create<S: Store + ?Sized>(
        &self,
        resolver: &PermissionResolver<'_, S>,
        principal: &Principal,
    ) -> AppResult<bool> {
        let project_id = self.owning_project_id(resolver.store())?;
        resolver.can_write_project(principal, project_id)
    }

    fn can_read<S: Store + ?Sized>(
        &self,
        resolver: &PermissionResolver<'_, S>,
        principal: &Principal,
    ) -> AppResult<(bool, Permission)> {
        let project_id = stored_comment(resolver, self.id)?.owning_project_id(resolver.store())?;
        resolver.can_read_project(principal, project_id)
    }

    fn can_update<S: Store + ?Sized>(
        &self,
        resolver: &PermissionResolver<'_, S>,
        principal: &Principal,
    ) -> AppResult<bool> {
        can_edit_comment(resolver, principal, self.id)
    }

    fn can_delete<S: Store + ?Sized>(
        &self,
        resolver: &PermissionResolver<'_, S>,
        principal: &Principal,
    ) -> AppResult<bool> {
        can_edit_comment(resolver, principal, self.id)
    }
}

impl AccessGuard for Reaction {
    fn can_create<S: Store + ?Sized>(
        &self,
        resolver: &PermissionResolver<'_, S>,
        principal: &Principal,
    ) -> AppResult<bool> {
        let task = reacted_task(self, resolver.store())?;
        Ok(resolver.can_read_project(principal, task.project_id)?.0)
    }

    fn can_read<S: Store + ?Sized>(
        &self,
        resolver: &PermissionResolver<'_, S>,
        principal: &Principal,
    ) -> AppResult<(bool, Permission)> {
        let project_id = self.owning_project_id(resolver.store())?;
        resolver.can_read_project(principal, project_id)
    }

    /// Only the author removes a reaction, and only while still able to read
    /// the task.
    fn can_delete<S: Store + ?Sized>(
        &self,
        resolver: &PermissionResolver<'_, S>,
        principal: &Principal,
    ) -> AppResult<bool> {
        let stored = require(resolver.store().get_reaction(self.id)?, "reaction", self.id)?;
        let project_id = stored.owning_project_id(resolver.store())?;
        if !resolver.can_read_project(principal, project_id)?.0 {
            return Ok(false);
        }

        Ok(stored.author_id == principal.author_id())
    }
}
