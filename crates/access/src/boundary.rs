//! Navigation boundary declarations.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use mediboard_core::Role;

/// A protected area's declared role allow-list.
///
/// Declared at the point a navigation boundary is set up, recomputed per
/// render, never persisted. An absent allow-list means "any authenticated
/// role".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavBoundary {
    allowed: Option<HashSet<Role>>,
}

impl NavBoundary {
    /// Boundary admitting any authenticated role.
    pub fn any_authenticated() -> Self {
        Self::default()
    }

    /// Boundary declaring an explicit allow-list.
    pub fn allowing(roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            allowed: Some(roles.into_iter().collect()),
        }
    }

    /// Whether `role` is on the allow-list.
    ///
    /// An absent or empty list admits any authenticated role.
    pub fn allows(&self, role: Role) -> bool {
        match &self.allowed {
            None => true,
            Some(roles) => roles.is_empty() || roles.contains(&role),
        }
    }
}
