//! Sessions and the subjects they authenticate.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use mediboard_core::SubjectId;

/// How a session came into existence.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    /// Issued and revocable by the identity provider.
    Provider,
    /// Synthesized locally by the bypass credential path. No provider-side
    /// session exists, so there is nothing to revoke on sign-out.
    Bypass,
}

/// An opaque, time-bounded proof of authentication.
///
/// # Invariants
/// - Immutable once created; refresh and invalidation replace it wholesale.
/// - Owned exclusively by the [`AuthMachine`](crate::AuthMachine); consumers
///   only ever see clones inside [`AuthState`](crate::AuthState) snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub subject_id: SubjectId,
    /// Contact identifier the session was established with (e.g. an email),
    /// when the provider reports one.
    pub contact: Option<String>,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub kind: SessionKind,
}

/// Lifetime of a locally synthesized bypass session.
const BYPASS_SESSION_HOURS: i64 = 12;

impl Session {
    /// Synthesize a bypass session for a fresh local subject.
    pub fn bypass(contact: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            subject_id: SubjectId::new(),
            contact: Some(contact.into()),
            issued_at: now,
            expires_at: now + Duration::hours(BYPASS_SESSION_HOURS),
            kind: SessionKind::Bypass,
        }
    }

    /// The subject this session authenticates (derived 1:1, no independent
    /// lifecycle).
    pub fn subject(&self) -> Subject {
        Subject {
            id: self.subject_id,
            contact: self.contact.clone(),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// The authenticated identity a session proves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: SubjectId,
    pub contact: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bypass_sessions_are_time_bounded() {
        let session = Session::bypass("ops@example.com");
        assert_eq!(session.kind, SessionKind::Bypass);
        assert!(!session.is_expired(session.issued_at));
        assert!(session.is_expired(session.expires_at));
    }

    #[test]
    fn subject_is_derived_from_the_session() {
        let session = Session::bypass("ops@example.com");
        let subject = session.subject();
        assert_eq!(subject.id, session.subject_id);
        assert_eq!(subject.contact.as_deref(), Some("ops@example.com"));
    }
}
