use super::AccessGuard;
use crate::error::AppResult;
use crate::permissions::PermissionResolver;
use crate::principal::Principal;
use crate::storage::Store;
use shared_types::ProjectDuplicate;

impl AccessGuard for ProjectDuplicate {
    /// Copying needs read access to the source and the right to create a
    /// project at the destination.
    fn can_create<S: Store + ?Sized>(
        &self,
        resolver: &PermissionResolver<'_, S>,
        principal: &Principal,
    ) -> AppResult<bool> {
        if principal.is_link_share() {
            return Ok(false);
        }

        if !resolver.can_read_project(principal, self.project_id)?.0 {
            return Ok(false);
        }

        match self.parent_project_id {
            Some(parent_id) => resolver.can_write_project(principal, parent_id),
            None => Ok(true),
        }
    }
}
