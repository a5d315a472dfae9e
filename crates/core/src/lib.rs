//! `mediboard-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! strongly-typed identifiers and the fixed role vocabulary shared by the
//! auth, access, and navigation crates.

pub mod id;
pub mod role;

pub use id::SubjectId;
pub use role::{Role, RoleParseError};
