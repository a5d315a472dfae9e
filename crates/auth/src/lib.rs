//! `mediboard-auth` — session-derived authentication state.
//!
//! This crate owns the canonical in-memory answer to "who is logged in and
//! with what role". It is intentionally decoupled from HTTP, storage, and
//! rendering: the identity provider and the profile datastore appear only as
//! the [`SessionStore`] and [`ProfileResolver`] collaborator traits, and
//! consumers read state through a subscribe/notify interface with exactly one
//! writer (the [`AuthMachine`]).

pub mod config;
pub mod error;
pub mod in_memory;
pub mod machine;
pub mod profile;
pub mod resolver;
pub mod session;
pub mod state;
pub mod store;

pub use config::{AuthConfig, BypassCredential};
pub use error::AuthError;
pub use machine::AuthMachine;
pub use profile::Profile;
pub use resolver::{ProfileResolver, ResolveError};
pub use session::{Session, SessionKind, Subject};
pub use state::{AuthPhase, AuthState};
pub use store::{SessionChange, SessionStore, SignUpRequest, StoreError};
