//! Role and display attributes for a subject.

use serde::{Deserialize, Serialize};

use mediboard_core::{Role, SubjectId};

/// Secondary record holding role and display attributes, keyed by subject.
///
/// Fetched asynchronously after a subject becomes known, so it may
/// legitimately be absent for a window after sign-in.
///
/// # Invariants
/// - If present in an [`AuthState`](crate::AuthState), it corresponds to the
///   current subject. A subject change clears the prior profile atomically;
///   the stale-result guard in the machine discards late fetch results for
///   subjects that are no longer current.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Foreign key to the subject; the profile does not own the identity.
    pub subject_id: SubjectId,
    pub given_name: String,
    pub family_name: String,
    pub role: Role,
}

impl Profile {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.given_name, self.family_name)
    }
}
