//! Permission levels granted on projects and sharing relations.
//!
//! Levels are totally ordered (`Read < Write < Admin`) and travel over the
//! wire as small integers. `Unknown` (-1) marks an absent grant and is never
//! written to storage.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Invalid permission: {0}")]
pub struct InvalidPermission(pub i64);

/// Failure to read a permission from text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParsePermissionError {
    #[error("Unrecognized permission: {0:?}")]
    Unrecognized(String),
    #[error(transparent)]
    Invalid(#[from] InvalidPermission),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Permission {
    Unknown = -1,
    Read = 0,
    Write = 1,
    Admin = 2,
}

impl Permission {
    pub fn as_i64(self) -> i64 {
        self as i64
    }

    /// True for the three levels that may be persisted.
    pub fn is_valid(self) -> bool {
        !matches!(self, Permission::Unknown)
    }

    /// Rejects `Unknown`, which is only a sentinel for "no grant".
    pub fn validate(self) -> Result<Self, InvalidPermission> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(InvalidPermission(self.as_i64()))
        }
    }

    /// Whether this level satisfies a required level.
    pub fn satisfies(self, required: Permission) -> bool {
        self.is_valid() && self >= required
    }

    /// Highest level in `levels`, or `None` when empty.
    pub fn max_of<I>(levels: I) -> Option<Permission>
    where
        I: IntoIterator<Item = Permission>,
    {
        levels.into_iter().filter(|p| p.is_valid()).max()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::Unknown => "unknown",
            Permission::Read => "read",
            Permission::Write => "write",
            Permission::Admin => "admin",
        }
    }
}

impl TryFrom<i64> for Permission {
    type Error = InvalidPermission;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Permission::Unknown),
            0 => Ok(Permission::Read),
            1 => Ok(Permission::Write),
            2 => Ok(Permission::Admin),
            other => Err(InvalidPermission(other)),
        }
    }
}

impl From<Permission> for i64 {
    fn from(permission: Permission) -> Self {
        permission.as_i64()
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = ParsePermissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "read" => Ok(Permission::Read),
            "write" => Ok(Permission::Write),
            "admin" => Ok(Permission::Admin),
            other => {
                let value = other
                    .parse::<i64>()
                    .map_err(|_| ParsePermissionError::Unrecognized(s.to_string()))?;
                Ok(Permission::try_from(value)?.validate()?)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_are_ordered() {
        assert!(Permission::Read < Permission::Write);
        assert!(Permission::Write < Permission::Admin);
        assert!(Permission::Unknown < Permission::Read);
    }

    #[test]
    fn test_validate_rejects_unknown() {
        assert_eq!(Permission::Admin.validate(), Ok(Permission::Admin));
        assert_eq!(Permission::Unknown.validate(), Err(InvalidPermission(-1)));
    }

    #[test]
    fn test_try_from_out_of_range() {
        assert_eq!(Permission::try_from(1), Ok(Permission::Write));
        assert_eq!(Permission::try_from(3), Err(InvalidPermission(3)));
        assert_eq!(Permission::try_from(-2), Err(InvalidPermission(-2)));
    }

    #[test]
    fn test_satisfies() {
        assert!(Permission::Admin.satisfies(Permission::Write));
        assert!(Permission::Write.satisfies(Permission::Read));
        assert!(!Permission::Read.satisfies(Permission::Write));
        assert!(!Permission::Unknown.satisfies(Permission::Read));
    }

    #[test]
    fn test_max_of_ignores_unknown() {
        let levels = [Permission::Read, Permission::Unknown, Permission::Admin];
        assert_eq!(Permission::max_of(levels), Some(Permission::Admin));
        assert_eq!(Permission::max_of([Permission::Unknown]), None);
        assert_eq!(Permission::max_of(Vec::new()), None);
    }

    #[test]
    fn test_wire_form_is_integer() {
        assert_eq!(serde_json::to_string(&Permission::Write).unwrap(), "1");
        let parsed: Permission = serde_json::from_str("2").unwrap();
        assert_eq!(parsed, Permission::Admin);
        assert!(serde_json::from_str::<Permission>("7").is_err());
    }

    #[test]
    fn test_from_str() {
        assert_eq!("ADMIN".parse::<Permission>(), Ok(Permission::Admin));
        assert_eq!("1".parse::<Permission>(), Ok(Permission::Write));
        assert_eq!(
            "-1".parse::<Permission>(),
            Err(ParsePermissionError::Invalid(InvalidPermission(-1)))
        );
        assert_eq!(
            "9".parse::<Permission>(),
            Err(ParsePermissionError::Invalid(InvalidPermission(9)))
        );
        assert_eq!(
            "Owner".parse::<Permission>(),
            Err(ParsePermissionError::Unrecognized("Owner".into()))
        );
    }
}
