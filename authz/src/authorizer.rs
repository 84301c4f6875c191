//! Entry point for callers holding a [`Database`].
//!
//! Every call runs a fresh set of lookups; nothing is cached between checks.

use crate::database::Database;
use crate::error::{AppError, AppResult};
use crate::guards::AccessGuard;
use crate::permissions::PermissionResolver;
use crate::principal::Principal;
use crate::storage::link_shares;
use shared_types::{Permission, ResolvedPermission};
use std::sync::Arc;

#[derive(Clone)]
pub struct Authorizer {
    database: Arc<Database>,
    max_hierarchy_depth: usize,
}

impl Authorizer {
    pub fn new(database: Arc<Database>, max_hierarchy_depth: usize) -> Self {
        Self {
            database,
            max_hierarchy_depth,
        }
    }

    fn check<T, F>(&self, f: F) -> AppResult<T>
    where
        F: FnOnce(&PermissionResolver<'_, rusqlite::Connection>) -> AppResult<T>,
    {
        self.database
            .read(|conn| f(&PermissionResolver::new(conn, self.max_hierarchy_depth)))
    }

    /// Turns a link share hash into a principal, refusing unknown or expired
    /// shares.
    pub fn link_share_principal(&self, hash: &str, now: i64) -> AppResult<Principal> {
        let share = self
            .database
            .read(|conn| link_shares::get_link_share_by_hash(conn, hash))?
            .ok_or_else(|| AppError::NotFound("link share does not exist".to_string()))?;
        Principal::from_link_share(&share, now)
    }

    pub fn resolve(&self, principal: &Principal, project_id: i64) -> AppResult<ResolvedPermission> {
        let permission = self.check(|resolver| resolver.resolve(principal, project_id))?;
        Ok(ResolvedPermission {
            project_id,
            permission,
        })
    }

    /// Resolved levels in the order of `project_ids`, ungranted projects
    /// included with no permission.
    pub fn resolve_many(
        &self,
        principal: &Principal,
        project_ids: &[i64],
    ) -> AppResult<Vec<ResolvedPermission>> {
        let granted = self.check(|resolver| resolver.resolve_many(principal, project_ids))?;
        Ok(project_ids
            .iter()
            .map(|&project_id| ResolvedPermission {
                project_id,
                permission: granted.get(&project_id).copied(),
            })
            .collect())
    }

    pub fn is_team_admin(&self, principal: &Principal, team_id: i64) -> AppResult<bool> {
        self.check(|resolver| resolver.is_team_admin(principal, team_id))
    }

    pub fn can_create<G: AccessGuard>(&self, principal: &Principal, entity: &G) -> AppResult<bool> {
        self.check(|resolver| entity.can_create(resolver, principal))
    }

    pub fn can_read<G: AccessGuard>(
        &self,
        principal: &Principal,
        entity: &G,
    ) -> AppResult<(bool, Permission)> {
        self.check(|resolver| entity.can_read(resolver, principal))
    }

    pub fn can_update<G: AccessGuard>(&self, principal: &Principal, entity: &G) -> AppResult<bool> {
        self.check(|resolver| entity.can_update(resolver, principal))
    }

    pub fn can_delete<G: AccessGuard>(&self, principal: &Principal, entity: &G) -> AppResult<bool> {
        self.check(|resolver| entity.can_delete(resolver, principal))
    }
}
