//! The auth state machine.
//!
//! Owns the canonical [`AuthState`] and is its only writer. Consumers read
//! snapshots or subscribe to the watch channel; all mutation goes through
//! the operations here, on one logical timeline. Asynchronous collaborator
//! calls suspend only the issuing operation, never the delivery of
//! subsequent session-change notifications.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{broadcast, watch};

use mediboard_core::{Role, SubjectId};

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::profile::Profile;
use crate::resolver::ProfileResolver;
use crate::session::{Session, SessionKind};
use crate::state::AuthState;
use crate::store::{SessionStore, SignUpRequest, StoreError};

/// Session-derived auth state machine.
///
/// Lifecycle: `Unauthenticated` → `Resolving` (session applied, profile
/// fetch in flight) → `Authenticated` → back to `Unauthenticated` on
/// sign-out or session invalidation.
pub struct AuthMachine {
    store: Arc<dyn SessionStore>,
    resolver: Arc<dyn ProfileResolver>,
    config: AuthConfig,
    state: watch::Sender<AuthState>,
}

impl AuthMachine {
    pub fn new(
        store: Arc<dyn SessionStore>,
        resolver: Arc<dyn ProfileResolver>,
        config: AuthConfig,
    ) -> Self {
        let (state, _) = watch::channel(AuthState::default());
        Self {
            store,
            resolver,
            config,
            state,
        }
    }

    /// Current state snapshot.
    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// Subscribe to state changes.
    ///
    /// Receivers observe states in transition order; intermediate states may
    /// coalesce if the receiver is not polled between changes.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// Verify credentials and establish a session.
    ///
    /// The reserved bypass pair (if configured) synthesizes a local admin
    /// session without contacting the store or the resolver; every other
    /// credential is delegated to the store. On failure, state is left
    /// unchanged. On success the caller is expected to navigate to the
    /// role's default landing surface.
    pub async fn sign_in(&self, identifier: &str, secret: &str) -> Result<Session, AuthError> {
        self.state.send_modify(|s| s.loading = true);

        if let Some(bypass) = &self.config.bypass {
            if bypass.matches(identifier, secret) {
                let session = bypass.session();
                let profile = Profile {
                    subject_id: session.subject_id,
                    given_name: "Admin".to_string(),
                    family_name: "User".to_string(),
                    role: Role::Admin,
                };
                tracing::warn!(
                    subject = %session.subject_id,
                    "bypass credential used; synthesizing local admin session"
                );
                let subject = session.subject();
                let applied = session.clone();
                self.state.send_modify(move |s| {
                    s.session = Some(applied);
                    s.subject = Some(subject);
                    s.profile = Some(profile);
                    s.loading = false;
                });
                return Ok(session);
            }
        }

        match self.store.sign_in_with_credentials(identifier, secret).await {
            Ok(session) => {
                self.apply_session(Some(session.clone()));
                Ok(session)
            }
            Err(err) => {
                self.state.send_modify(|s| s.loading = false);
                Err(match err {
                    StoreError::CredentialsRejected => AuthError::InvalidCredentials,
                    StoreError::Unavailable(message) => AuthError::StoreUnavailable(message),
                })
            }
        }
    }

    /// Register a new account.
    ///
    /// Validates the requested role against the fixed vocabulary before the
    /// store is involved. Never establishes a session; the caller is
    /// expected to route back to a sign-in surface afterward.
    pub async fn sign_up(
        &self,
        identifier: &str,
        secret: &str,
        given_name: &str,
        family_name: &str,
        requested_role: &str,
    ) -> Result<(), AuthError> {
        let role: Role = requested_role.parse()?;

        let request = SignUpRequest {
            identifier: identifier.to_string(),
            secret: secret.to_string(),
            given_name: given_name.to_string(),
            family_name: family_name.to_string(),
            role,
        };

        self.store.sign_up(request).await.map_err(|err| match err {
            StoreError::CredentialsRejected => AuthError::InvalidCredentials,
            StoreError::Unavailable(message) => AuthError::StoreUnavailable(message),
        })
    }

    /// End the current session.
    ///
    /// Bypass sessions clear local state only (no provider-side session
    /// exists to revoke). Provider sessions request revocation best-effort:
    /// local state never remains authenticated after a sign-out, whatever
    /// the revocation outcome. The resulting `Unauthenticated` state is the
    /// signal for callers to return to the sign-in surface.
    pub async fn sign_out(&self) {
        let kind = self.state.borrow().session.as_ref().map(|s| s.kind);
        if kind.is_none() {
            return;
        }

        self.state.send_modify(|s| s.loading = true);

        if kind == Some(SessionKind::Provider) {
            if let Err(err) = self.store.sign_out().await {
                tracing::warn!(error = %err, "session revocation failed; clearing local state anyway");
            }
        }

        self.clear_state();
    }

    /// Boot/attach sequence; run once per process lifetime of the UI.
    ///
    /// Subscribes to the store's change feed *before* the initial
    /// current-session check, so a change firing between check and subscribe
    /// cannot be missed. Both the check and the live feed go through the
    /// same idempotent apply path. Returns the handle of the task consuming
    /// the feed; it runs until the store closes the feed.
    pub async fn attach(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let mut changes = self.store.changes();

        self.state.send_modify(|s| s.loading = true);
        match self.store.current_session().await {
            Ok(session) => self.apply_session(session),
            Err(err) => {
                tracing::warn!(error = %err, "initial session check failed; starting unauthenticated");
                self.apply_session(None);
            }
        }

        let machine = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                match changes.recv().await {
                    Ok(change) => machine.apply_session(change.session),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "session change feed lagged; resyncing from the store");
                        match machine.store.current_session().await {
                            Ok(session) => machine.apply_session(session),
                            Err(err) => {
                                tracing::warn!(error = %err, "resync after lag failed");
                            }
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }

    /// Single state-update path for session changes, from any source.
    ///
    /// Idempotent under duplicate delivery: re-applying the current session
    /// changes nothing observable beyond a redundant profile re-fetch, which
    /// the stale/identity guards turn into a no-op.
    fn apply_session(&self, session: Option<Session>) {
        let session = session.filter(|s| {
            let live = !s.is_expired(Utc::now());
            if !live {
                tracing::debug!(subject = %s.subject_id, "dropping expired session");
            }
            live
        });

        match session {
            None => {
                // The feed only speaks for provider sessions. A bypass
                // session has no provider-side counterpart, so "provider
                // holds no session" does not invalidate it.
                if self.state.borrow().session.as_ref().map(|s| s.kind)
                    == Some(SessionKind::Bypass)
                {
                    tracing::debug!("ignoring provider session absence during bypass session");
                    return;
                }
                self.clear_state();
            }
            Some(session) => {
                let subject = session.subject();
                let subject_id = subject.id;
                self.state.send_if_modified(move |s| {
                    if s.session.as_ref() == Some(&session) && !s.loading {
                        return false;
                    }
                    // A subject change must clear the prior profile in the
                    // same update; a stale profile must never be observable.
                    if s.subject.as_ref().map(|cur| cur.id) != Some(subject_id) {
                        s.profile = None;
                    }
                    s.session = Some(session);
                    s.subject = Some(subject);
                    s.loading = false;
                    true
                });
                // Deferred so a slow resolver never blocks notification
                // delivery; consumers observe Resolving first.
                self.spawn_profile_fetch(subject_id);
            }
        }
    }

    fn clear_state(&self) {
        self.state.send_if_modified(|s| {
            let unchanged = *s == AuthState::default();
            if unchanged {
                return false;
            }
            *s = AuthState::default();
            true
        });
    }

    /// Resolve the profile for `subject_id` as an independent task.
    ///
    /// There is no cancellation of in-flight fetches; the stale-result guard
    /// at completion substitutes for it. Failures are logged, never
    /// surfaced: consumers degrade to the patient-default rendering.
    fn spawn_profile_fetch(&self, subject_id: SubjectId) {
        let resolver = Arc::clone(&self.resolver);
        let state = self.state.clone();
        tokio::spawn(async move {
            match resolver.profile(subject_id).await {
                Ok(profile) => {
                    state.send_if_modified(|s| {
                        // Stale-result guard: the fetch was issued for a
                        // subject that may no longer be current.
                        if s.subject.as_ref().map(|sub| sub.id) != Some(subject_id) {
                            return false;
                        }
                        if s.profile.as_ref() == Some(&profile) {
                            return false;
                        }
                        s.profile = Some(profile);
                        true
                    });
                }
                Err(err) => {
                    tracing::warn!(
                        subject = %subject_id,
                        error = %err,
                        "profile resolution failed; continuing without a profile"
                    );
                }
            }
        });
    }
}
