use super::AccessGuard;
use crate::error::{require, AppResult};
use crate::permissions::PermissionResolver;
use crate::principal::Principal;
use crate::storage::Store;
use shared_types::{Permission, SavedFilter};

fn is_owner<S: Store + ?Sized>(
    resolver: &PermissionResolver<'_, S>,
    principal: &Principal,
    filter_id: i64,
) -> AppResult<bool> {
    let Some(user_id) = principal.user_id() else {
        return Ok(false);
    };

    let stored = require(
        resolver.store().get_saved_filter(filter_id)?,
        "saved filter",
        filter_id,
    )?;
    Ok(stored.owner_id == user_id)
}

impl AccessGuard for SavedFilter {
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
        Ok(super::visible_at(
            is_owner(resolver, principal, self.id)?,
            Permission::Admin,
        ))
    }

    fn can_update<S: Store + ?Sized>(
        &self,
        resolver: &PermissionResolver<'_, S>,
        principal: &Principal,
    ) -> AppResult<bool> {
        is_owner(resolver, principal, self.id)
    }

    fn can_delete<S: Store + ?Sized>(
        &self,
        resolver: &PermissionResolver<'_, S>,
        principal: &Principal,
    ) -> AppResult<bool> {
        is_owner(resolver, principal, self.id)
    }
}
