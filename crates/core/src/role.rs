//! The fixed role vocabulary.
//!
//! Unlike permission-style RBAC with opaque role strings, this domain has a
//! closed set of three roles. The enum is the single source of truth: role
//! strings arriving from the outside (registration forms, provider rows) must
//! parse through [`Role::from_str`] and are rejected otherwise.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Role of an authenticated subject.
///
/// Determines the default landing surface and the set of navigation
/// affordances a subject is shown.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Doctor,
    Patient,
}

impl Role {
    /// Every valid role, in canonical order.
    pub const ALL: [Role; 3] = [Role::Admin, Role::Doctor, Role::Patient];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Doctor => "doctor",
            Role::Patient => "patient",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A role string outside the fixed vocabulary.
///
/// The message names the offending value and the full valid set so callers
/// can surface it directly.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid role '{value}' (valid roles: admin, doctor, patient)")]
pub struct RoleParseError {
    pub value: String,
}

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "doctor" => Ok(Role::Doctor),
            "patient" => Ok(Role::Patient),
            other => Err(RoleParseError {
                value: other.to_string(),
            }),
        }
    }
}
