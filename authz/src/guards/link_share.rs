use super::{visible_at, AccessGuard};
use crate::error::{require, AppResult};
use crate::permissions::PermissionResolver;
use crate::principal::Principal;
use crate::storage::Store;
use shared_types::{LinkShare, Permission};

/// Admin shares need project admin; any other share needs project write. No
/// share may manage another share.
fn can_share_at<S: Store + ?Sized>(
    resolver: &PermissionResolver<'_, S>,
    principal: &Principal,
    project_id: i64,
    permission: Permission,
) -> AppResult<bool> {
    if principal.is_link_share() {
        return Ok(false);
    }

    if permission == Permission::Admin {
        resolver.is_project_admin(principal, project_id)
    } else {
        resolver.can_write_project(principal, project_id)
    }
}

fn stored_share<S: Store + ?Sized>(
    resolver: &PermissionResolver<'_, S>,
    id: i64,
) -> AppResult<LinkShare> {
    require(resolver.store().get_link_share(id)?, "link share", id)
}

impl AccessGuard for LinkShare {
    fn can_create<S: Store + ?Sized>(
        &self,
        resolver: &PermissionResolver<'_, S>,
        principal: &Principal,
    ) -> AppResult<bool> {
        can_share_at(resolver, principal, self.project_id, self.permission)
    }

    fn can_read<S: Store + ?Sized>(
        &self,
        resolver: &PermissionResolver<'_, S>,
        principal: &Principal,
    ) -> AppResult<(bool, Permission)> {
        if principal.is_link_share() {
            return Ok((false, Permission::Unknown));
        }

        let stored = stored_share(resolver, self.id)?;
        let allowed = can_share_at(resolver, principal, stored.project_id, stored.permission)?;
        let level = resolver
            .resolve(principal, stored.project_id)?
            .unwrap_or(Permission::Unknown);
        Ok(visible_at(allowed, level))
    }

    /// Raising a share to admin needs the same rights as creating an admin
    /// share.
    fn can_update<S: Store + ?Sized>(
        &self,
        resolver: &PermissionResolver<'_, S>,
        principal: &Principal,
    ) -> AppResult<bool> {
        if principal.is_link_share() {
            return Ok(false);
        }

        let stored = stored_share(resolver, self.id)?;
        let level = stored.permission.max(self.permission);
        can_share_at(resolver, principal, stored.project_id, level)
    }

    fn can_delete<S: Store + ?Sized>(
        &self,
        resolver: &PermissionResolver<'_, S>,
        principal: &Principal,
    ) -> AppResult<bool> {
        if principal.is_link_share() {
            return Ok(false);
        }

        let stored = stored_share(resolver, self.id)?;
        can_share_at(resolver, principal, stored.project_id, stored.permission)
    }
}
