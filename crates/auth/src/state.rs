//! The aggregate auth state exposed to consumers.

use serde::{Deserialize, Serialize};

use crate::profile::Profile;
use crate::session::{Session, Subject};

/// Snapshot of "who is logged in and with what role".
///
/// This is the only shared mutable resource in the subsystem. It has exactly
/// one writer (the [`AuthMachine`](crate::AuthMachine)) and arbitrarily many
/// readers; readers receive clones through the machine's watch channel and
/// never mutate it directly.
///
/// # Invariants
/// - `subject` exists iff `session` exists.
/// - `profile`, if present, corresponds to `subject`.
/// - `loading == true` is the only state in which a subject may exist without
///   a profile resolution attempt having been issued for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthState {
    pub session: Option<Session>,
    pub subject: Option<Subject>,
    pub profile: Option<Profile>,
    /// True while the machine is doing the transition work of a state change
    /// (sign-in/out in flight, initial boot check).
    pub loading: bool,
}

/// Lifecycle phase derived from an [`AuthState`] snapshot.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthPhase {
    /// No session.
    Unauthenticated,
    /// Session present, profile not yet resolved.
    Resolving,
    /// Session and profile present.
    Authenticated,
}

impl AuthState {
    pub fn phase(&self) -> AuthPhase {
        match (&self.session, &self.profile) {
            (None, _) => AuthPhase::Unauthenticated,
            (Some(_), None) => AuthPhase::Resolving,
            (Some(_), Some(_)) => AuthPhase::Authenticated,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }
}
