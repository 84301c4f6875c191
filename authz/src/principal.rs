//! The subject of every permission check.
//!
//! Callers hand in an already authenticated principal; each check matches on
//! it once at its entry point.

use crate::error::{AppError, AppResult};
use shared_types::{LinkShare, Permission};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Principal {
    User {
        id: i64,
    },
    /// Bearer of a link share hash, scoped to one project at one level.
    LinkShare {
        id: i64,
        project_id: i64,
        permission: Permission,
    },
}

impl Principal {
    pub fn user(id: i64) -> Self {
        Principal::User { id }
    }

    pub fn from_link_share(share: &LinkShare, now: i64) -> AppResult<Self> {
        if share.is_expired(now) {
            tracing::warn!("Rejected expired link share {}", share.id);
            return Err(AppError::LinkShareExpired);
        }

        Ok(Principal::LinkShare {
            id: share.id,
            project_id: share.project_id,
            permission: share.permission.validate()?,
        })
    }

    pub fn id(&self) -> i64 {
        match self {
            Principal::User { id } | Principal::LinkShare { id, .. } => *id,
        }
    }

    /// Identity recorded on authored content. Link shares are negated so they
    /// can never collide with a user id.
    pub fn author_id(&self) -> i64 {
        match self {
            Principal::User { id } => *id,
            Principal::LinkShare { id, .. } => -*id,
        }
    }

    pub fn user_id(&self) -> Option<i64> {
        match self {
            Principal::User { id } => Some(*id),
            Principal::LinkShare { .. } => None,
        }
    }

    pub fn is_link_share(&self) -> bool {
        matches!(self, Principal::LinkShare { .. })
    }
}
