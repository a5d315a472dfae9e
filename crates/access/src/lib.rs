//! `mediboard-access` — per-navigation access decisions.
//!
//! Consumes [`AuthState`](mediboard_auth::AuthState) snapshots read-only and
//! decides, per navigation attempt, whether to render protected content,
//! show an intermediate loading state, or redirect. Pure policy: no IO, no
//! panics, no state of its own.

pub mod boundary;
pub mod decision;

pub use boundary::NavBoundary;
pub use decision::{Decision, decide};
