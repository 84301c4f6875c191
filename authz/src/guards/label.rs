//! Labels are owned by their creator and become visible to everyone who can
//! read a task they are attached to.

use super::AccessGuard;
use crate::error::{require, AppResult};
use crate::hierarchy::OwningProject;
use crate::permissions::PermissionResolver;
use crate::principal::Principal;
use crate::storage::Store;
use shared_types::{Label, LabelTask, Permission};

fn stored_label<S: Store + ?Sized>(
    resolver: &PermissionResolver<'_, S>,
    id: i64,
) -> AppResult<Label> {
    require(resolver.store().get_label(id)?, "label", id)
}

fn is_creator(label: &Label, principal: &Principal) -> bool {
    principal.user_id() == Some(label.created_by)
}

impl AccessGuard for Label {
    fn can_create<S: Store + ?Sized>(
        &self,
        _resolver: &PermissionResolver<'_, S>,
        principal: &Principal,
    ) -> AppResult<bool> {
        Ok(principal.user_id().is_some())
    }

    fn can_read<S: Store + ?Sized>(
        &self,
        resolver: &PermissionResolver<'_, S>,
        principal: &Principal,
    ) -> AppResult<(bool, Permission)> {
        let stored = stored_label(resolver, self.id)?;
        if is_creator(&stored, principal) {
            return Ok((true, Permission::Admin));
        }

        for project_id in resolver.store().label_project_ids(stored.id)? {
            if resolver.can_read_project(principal, project_id)?.0 {
                return Ok((true, Permission::Read));
            }
        }

        Ok((false, Permission::Unknown))
    }

    fn can_update<S: Store + ?Sized>(
        &self,
        resolver: &PermissionResolver<'_, S>,
        principal: &Principal,
    ) -> AppResult<bool> {
        let stored = stored_label(resolver, self.id)?;
        Ok(is_creator(&stored, principal))
    }

    fn can_delete<S: Store + ?Sized>(
        &self,
        resolver: &PermissionResolver<'_, S>,
        principal: &Principal,
    ) -> AppResult<bool> {
        let stored = stored_label(resolver, self.id)?;
        Ok(is_creator(&stored, principal))
    }
}

impl AccessGuard for LabelTask {
    /// Attaching needs a visible label and write access to the task.
    fn can_create<S: Store + ?Sized>(
        &self,
        resolver: &PermissionResolver<'_, S>,
        principal: &Principal,
    ) -> AppResult<bool> {
        let label = Label {
            id: self.label_id,
            ..Label::new(String::new(), 0)
        };
        if !label.can_read(resolver, principal)?.0 {
            return Ok(false);
        }

        let project_id = self.owning_project_id(resolver.store())?;
        resolver.can_write_project(principal, project_id)
    }

    fn can_read<S: Store + ?Sized>(
        &self,
        resolver: &PermissionResolver<'_, S>,
        principal: &Principal,
    ) -> AppResult<(bool, Permission)> {
        let project_id = self.owning_project_id(resolver.store())?;
        resolver.can_read_project(principal, project_id)
    }

    fn can_delete<S: Store + ?Sized>(
        &self,
        resolver: &PermissionResolver<'_, S>,
        principal: &Principal,
    ) -> AppResult<bool> {
        let project_id = self.owning_project_id(resolver.store())?;
        if !resolver.can_write_project(principal, project_id)? {
            return Ok(false);
        }

        resolver
            .store()
            .label_task_exists(self.task_id, self.label_id)
    }
}
