//! Session store collaborator contract.
//!
//! The identity provider is a black box behind this trait: it issues,
//! refreshes, and invalidates sessions and notifies subscribers on change.
//! No wire format or token shape leaks through — the machine only ever sees
//! [`Session`] values.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::broadcast;

use mediboard_core::Role;

use crate::session::Session;

/// A change to the provider-side session.
///
/// Fires on sign-in, sign-out, token refresh, and expiry. `session: None`
/// means the provider no longer holds a session for this client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionChange {
    pub session: Option<Session>,
}

/// Registration payload forwarded to the provider.
///
/// The requested role has already been validated against the fixed
/// vocabulary by the time this is constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignUpRequest {
    pub identifier: String,
    pub secret: String,
    pub given_name: String,
    pub family_name: String,
    pub role: Role,
}

/// Failure reported by the session store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The provider rejected the presented credentials.
    #[error("credentials rejected")]
    CredentialsRejected,

    /// The provider could not be reached or timed out.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Capability contract for the identity provider.
///
/// Implementations must deliver change notifications in issuance order; the
/// machine applies them in delivery order and treats the feed as the single
/// source of truth for provider-issued sessions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Verify credentials and establish a provider-side session.
    async fn sign_in_with_credentials(
        &self,
        identifier: &str,
        secret: &str,
    ) -> Result<Session, StoreError>;

    /// Register a new account. Does not establish a session.
    async fn sign_up(&self, request: SignUpRequest) -> Result<(), StoreError>;

    /// Revoke the current provider-side session.
    async fn sign_out(&self) -> Result<(), StoreError>;

    /// The session the provider currently holds for this client, if any.
    async fn current_session(&self) -> Result<Option<Session>, StoreError>;

    /// Subscribe to session-change notifications.
    fn changes(&self) -> broadcast::Receiver<SessionChange>;
}
