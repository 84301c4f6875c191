//! Per-entity access checks.
//!
//! Each guard finds the project its entity belongs to and hands the decision
//! to the [`PermissionResolver`]. A denied check is `Ok(false)`; a missing
//! entity is a "does not exist" error. Operations an entity does not support
//! keep the denying defaults.

mod duplicate;
mod grants;
mod label;
mod link_share;
mod project;
mod saved_filter;
mod task;
mod task_content;
mod team;
mod webhook;

use crate::error::AppResult;
use crate::permissions::PermissionResolver;
use crate::principal::Principal;
use crate::storage::Store;
use shared_types::Permission;

pub trait AccessGuard {
    fn can_create<S: Store + ?Sized>(
        &self,
        _resolver: &PermissionResolver<'_, S>,
        _principal: &Principal,
    ) -> AppResult<bool> {
        Ok(false)
    }

    /// Whether the entity is visible, and the level it is visible at.
    fn can_read<S: Store + ?Sized>(
        &self,
        _resolver: &PermissionResolver<'_, S>,
        _principal: &Principal,
    ) -> AppResult<(bool, Permission)> {
        Ok((false, Permission::Unknown))
    }

    fn can_update<S: Store + ?Sized>(
        &self,
        _resolver: &PermissionResolver<'_, S>,
        _principal: &Principal,
    ) -> AppResult<bool> {
        Ok(false)
    }

    fn can_delete<S: Store + ?Sized>(
        &self,
        _resolver: &PermissionResolver<'_, S>,
        _principal: &Principal,
    ) -> AppResult<bool> {
        Ok(false)
    }
}

/// Read result for checks that grant all or nothing at a single level.
fn visible_at(allowed: bool, permission: Permission) -> (bool, Permission) {
    if allowed {
        (true, permission)
    } else {
        (false, Permission::Unknown)
    }
}
