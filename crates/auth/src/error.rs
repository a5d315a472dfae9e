//! Error model for the auth boundary.
//!
//! Credential and validation failures are returned to the caller for display.
//! Profile-fetch failures never appear here: they are logged and the system
//! degrades to the patient-default rendering instead of blocking the UI on a
//! secondary lookup. Nothing in this subsystem is fatal to the process.

use thiserror::Error;

use mediboard_core::RoleParseError;

/// Failure surfaced by an [`AuthMachine`](crate::AuthMachine) operation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The identity provider rejected the credentials.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Sign-up requested a role outside the fixed vocabulary.
    #[error(transparent)]
    InvalidRole(#[from] RoleParseError),

    /// The provider call failed or timed out; local state was left unchanged.
    #[error("identity provider unavailable: {0}")]
    StoreUnavailable(String),
}
