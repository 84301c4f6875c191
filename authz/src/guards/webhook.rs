use super::{visible_at, AccessGuard};
use crate::error::{require, AppResult};
use crate::hierarchy::OwningProject;
use crate::permissions::PermissionResolver;
use crate::principal::Principal;
use crate::storage::Store;
use shared_types::{Permission, Webhook};

fn stored_project_id<S: Store + ?Sized>(
    resolver: &PermissionResolver<'_, S>,
    id: i64,
) -> AppResult<i64> {
    let stored = require(resolver.store().get_webhook(id)?, "webhook", id)?;
    stored.owning_project_id(resolver.store())
}

/// Every webhook operation needs write access to the project. Link shares are
/// turned away before any lookup.
impl AccessGuard for Webhook {
    fn can_create<S: Store + ?Sized>(
        &self,
        resolver: &PermissionResolver<'_, S>,
        principal: &Principal,
    ) -> AppResult<bool> {
        if principal.is_link_share() {
            return Ok(false);
        }
        resolver.can_write_project(principal, self.project_id)
    }

    fn can_read<S: Store + ?Sized>(
        &self,
        resolver: &PermissionResolver<'_, S>,
        principal: &Principal,
    ) -> AppResult<(bool, Permission)> {
        if principal.is_link_share() {
            return Ok((false, Permission::Unknown));
        }

        let project_id = stored_project_id(resolver, self.id)?;
        let allowed = resolver.can_write_project(principal, project_id)?;
        let level = resolver.resolve(principal, project_id)?.unwrap_or(Permission::Unknown);
        Ok(visible_at(allowed, level))
    }

    fn can_update<S: Store + ?Sized>(
        &self,
        resolver: &PermissionResolver<'_, S>,
        principal: &Principal,
    ) -> AppResult<bool> {
        if principal.is_link_share() {
            return Ok(false);
        }
        resolver.can_write_project(principal, stored_project_id(resolver, self.id)?)
    }

    fn can_delete<S: Store + ?Sized>(
        &self,
        resolver: &PermissionResolver<'_, S>,
        principal: &Principal,
    ) -> AppResult<bool> {
        if principal.is_link_share() {
            return Ok(false);
        }
        resolver.can_write_project(principal, stored_project_id(resolver, self.id)?)
    }
}
