//! Profile resolver collaborator contract.

use async_trait::async_trait;
use thiserror::Error;

use mediboard_core::SubjectId;

use crate::profile::Profile;

/// Failure reported by the profile resolver.
///
/// Resolver failures are a diagnostic side channel only: the machine logs
/// them and leaves the profile absent, which downstream consumers render
/// with the patient-default role.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// No profile row exists for the subject.
    #[error("no profile for subject {0}")]
    NotFound(SubjectId),

    /// Transient datastore failure; a later fetch may succeed.
    #[error("profile fetch failed: {0}")]
    Transient(String),
}

/// Capability contract for the per-subject profile datastore.
///
/// May be slow; the machine never awaits it on the notification path.
#[async_trait]
pub trait ProfileResolver: Send + Sync {
    async fn profile(&self, subject_id: SubjectId) -> Result<Profile, ResolveError>;
}
