use super::AccessGuard;
use crate::error::{require, AppError, AppResult};
use crate::permissions::PermissionResolver;
use crate::principal::Principal;
use crate::storage::Store;
use shared_types::{Permission, Task};

fn stored_task<S: Store + ?Sized>(resolver: &PermissionResolver<'_, S>, id: i64) -> AppResult<Task> {
    require(resolver.store().get_task(id)?, "task", id)
}

impl AccessGuard for Task {
    fn can_create<S: Store + ?Sized>(
        &self,
        resolver: &PermissionResolver<'_, S>,
        principal: &Principal,
    ) -> AppResult<bool> {
        resolver.can_write_project(principal, self.project_id)
    }

    fn can_read<S: Store + ?Sized>(
        &self,
        resolver: &PermissionResolver<'_, S>,
        principal: &Principal,
    ) -> AppResult<(bool, Permission)> {
        let stored = stored_task(resolver, self.id)?;
        resolver.can_read_project(principal, stored.project_id)
    }

    /// Checked against the stored project; moving the task also needs write
    /// access to the destination.
    fn can_update<S: Store + ?Sized>(
        &self,
        resolver: &PermissionResolver<'_, S>,
        principal: &Principal,
    ) -> AppResult<bool> {
        let stored = stored_task(resolver, self.id)?;
        if !resolver.can_write_project(principal, stored.project_id)? {
            return Ok(false);
        }

        if self.project_id != stored.project_id
            && !resolver.can_write_project(principal, self.project_id)?
        {
            return Err(AppError::Forbidden(format!(
                "No write access to destination project {}",
                self.project_id
            )));
        }

        Ok(true)
    }

    fn can_delete<S: Store + ?Sized>(
        &self,
        resolver: &PermissionResolver<'_, S>,
        principal: &Principal,
    ) -> AppResult<bool> {
        let stored = stored_task(resolver, self.id)?;
        resolver.can_write_project(principal, stored.project_id)
    }
}
