//! The access decision.

use serde::{Deserialize, Serialize};

use mediboard_auth::AuthState;
use mediboard_core::Role;

use crate::boundary::NavBoundary;

/// Outcome of an access decision for one navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    /// Render the protected content, assuming `role` for surface selection.
    Render { role: Role },
    /// Send the caller elsewhere.
    ///
    /// Never produced under current policy; kept so deployments that want
    /// allow-list enforcement have a place to land.
    Redirect { target: String },
    /// Transition work is in flight; show the intermediate loading state.
    ShowLoading,
}

/// Decide whether to render a protected area for the given state.
///
/// Policy, in order:
/// 1. `loading` → [`Decision::ShowLoading`].
/// 2. otherwise → [`Decision::Render`], with the role defaulted to
///    [`Role::Patient`] when no profile is present, so navigation never
///    hard-fails purely because the secondary lookup has not landed.
///
/// The boundary's allow-list is consulted for logging only: absence of a
/// matching role does not block rendering, it only affects which
/// role-scoped surface is assumed.
pub fn decide(state: &AuthState, boundary: &NavBoundary) -> Decision {
    if state.loading {
        return Decision::ShowLoading;
    }

    let role = state
        .profile
        .as_ref()
        .map(|profile| profile.role)
        .unwrap_or(Role::Patient);

    if !boundary.allows(role) {
        tracing::debug!(%role, "role outside the boundary's allow-list; rendering anyway");
    }

    Decision::Render { role }
}
