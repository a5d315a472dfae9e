//! End-to-end state machine flows against the in-memory collaborators.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Duration as ChronoDuration, Utc};

use mediboard_auth::in_memory::{
    InMemoryProfileResolver, InMemorySessionStore, UnavailableSessionStore,
};
use mediboard_auth::{
    AuthConfig, AuthError, AuthMachine, AuthPhase, AuthState, BypassCredential, Profile, Session,
    SessionKind,
};
use mediboard_core::{Role, SubjectId};

struct Harness {
    store: Arc<InMemorySessionStore>,
    resolver: Arc<InMemoryProfileResolver>,
    machine: Arc<AuthMachine>,
}

impl Harness {
    fn new(config: AuthConfig) -> Self {
        let store = Arc::new(InMemorySessionStore::new());
        let resolver = Arc::new(InMemoryProfileResolver::new());
        let machine = Arc::new(AuthMachine::new(
            store.clone() as Arc<dyn mediboard_auth::SessionStore>,
            resolver.clone() as Arc<dyn mediboard_auth::ProfileResolver>,
            config,
        ));
        Self {
            store,
            resolver,
            machine,
        }
    }

    /// Register an account and a matching profile row.
    fn seed_user(&self, identifier: &str, secret: &str, role: Role) -> SubjectId {
        let subject_id = self.store.register(identifier, secret);
        self.resolver.insert(profile_for(subject_id, role));
        subject_id
    }
}

fn bypass_config() -> AuthConfig {
    AuthConfig::with_bypass(BypassCredential::new("admin-bypass-id", "admin-bypass-secret"))
}

fn profile_for(subject_id: SubjectId, role: Role) -> Profile {
    Profile {
        subject_id,
        given_name: "Test".to_string(),
        family_name: "User".to_string(),
        role,
    }
}

fn provider_session(subject_id: SubjectId, contact: &str) -> Session {
    let now = Utc::now();
    Session {
        subject_id,
        contact: Some(contact.to_string()),
        issued_at: now,
        expires_at: now + ChronoDuration::hours(1),
        kind: SessionKind::Provider,
    }
}

#[tokio::test]
async fn bypass_sign_in_synthesizes_admin_session_without_resolver() {
    let h = Harness::new(bypass_config());

    let session = h
        .machine
        .sign_in("admin-bypass-id", "admin-bypass-secret")
        .await
        .expect("bypass sign-in");

    assert_eq!(session.kind, SessionKind::Bypass);

    let state = h.machine.state();
    assert!(!state.loading);
    assert_eq!(state.phase(), AuthPhase::Authenticated);
    assert_eq!(state.session.as_ref().unwrap().kind, SessionKind::Bypass);
    assert_eq!(state.profile.as_ref().unwrap().role, Role::Admin);
    assert_eq!(state.profile.as_ref().unwrap().subject_id, session.subject_id);

    assert_eq!(h.resolver.calls(), 0, "resolver must not be contacted");
}

#[tokio::test]
async fn bypass_pair_is_an_ordinary_credential_when_not_configured() {
    let h = Harness::new(AuthConfig::default());

    let err = h
        .machine
        .sign_in("admin-bypass-id", "admin-bypass-secret")
        .await
        .unwrap_err();

    assert_eq!(err, AuthError::InvalidCredentials);
    assert_eq!(h.machine.state(), AuthState::default());
}

#[tokio::test]
async fn provider_sign_in_transitions_through_resolving() {
    let h = Harness::new(AuthConfig::default());
    let subject_id = h.seed_user("doctor@example.com", "pw", Role::Doctor);
    h.resolver.set_delay(subject_id, Duration::from_millis(100));

    let mut rx = h.machine.subscribe();
    assert_eq!(h.machine.state().phase(), AuthPhase::Unauthenticated);

    let session = h
        .machine
        .sign_in("doctor@example.com", "pw")
        .await
        .expect("sign-in");
    assert_eq!(session.kind, SessionKind::Provider);

    // The session is applied before the (slow) profile fetch completes.
    let state = h.machine.state();
    assert_eq!(state.phase(), AuthPhase::Resolving);
    assert!(state.profile.is_none());
    assert!(!state.loading);

    let authed = rx
        .wait_for(|s| s.phase() == AuthPhase::Authenticated)
        .await
        .expect("authenticated state");
    assert_eq!(authed.profile.as_ref().unwrap().role, Role::Doctor);
    assert_eq!(authed.profile.as_ref().unwrap().subject_id, subject_id);
}

#[tokio::test]
async fn rejected_credentials_leave_state_unchanged() {
    let h = Harness::new(AuthConfig::default());
    h.seed_user("doctor@example.com", "pw", Role::Doctor);

    let err = h
        .machine
        .sign_in("doctor@example.com", "wrong")
        .await
        .unwrap_err();

    assert_eq!(err, AuthError::InvalidCredentials);
    assert_eq!(h.machine.state(), AuthState::default());
}

#[tokio::test]
async fn store_outage_surfaces_unavailable() {
    let store = Arc::new(UnavailableSessionStore::new());
    let resolver = Arc::new(InMemoryProfileResolver::new());
    let machine = AuthMachine::new(store, resolver, AuthConfig::default());

    let err = machine.sign_in("doctor@example.com", "pw").await.unwrap_err();
    assert!(matches!(err, AuthError::StoreUnavailable(_)));
    assert_eq!(machine.state(), AuthState::default());

    let err = machine
        .sign_up("new@example.com", "pw", "New", "User", "doctor")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::StoreUnavailable(_)));
}

#[tokio::test]
async fn sign_up_accepts_every_valid_role() {
    let h = Harness::new(AuthConfig::default());

    for role in Role::ALL {
        let identifier = format!("{role}@example.com");
        h.machine
            .sign_up(&identifier, "pw", "Given", "Family", role.as_str())
            .await
            .unwrap_or_else(|err| panic!("sign-up with role {role} failed: {err}"));
    }

    // Registration is decoupled from session establishment.
    assert_eq!(h.machine.state(), AuthState::default());
}

#[tokio::test]
async fn sign_up_rejects_unknown_roles_before_the_store() {
    let h = Harness::new(AuthConfig::default());

    let err = h
        .machine
        .sign_up("new@example.com", "pw", "New", "User", "superuser")
        .await
        .unwrap_err();

    let message = err.to_string();
    assert!(message.contains("superuser"));
    assert!(message.contains("admin"));
    assert!(message.contains("doctor"));
    assert!(message.contains("patient"));

    // The rejected request never reached the store: the identifier is still
    // free for a valid registration.
    h.machine
        .sign_up("new@example.com", "pw", "New", "User", "patient")
        .await
        .expect("identifier should still be unregistered");
}

#[tokio::test]
async fn sign_out_from_bypass_never_calls_revoke() {
    let h = Harness::new(bypass_config());

    h.machine
        .sign_in("admin-bypass-id", "admin-bypass-secret")
        .await
        .expect("bypass sign-in");
    h.machine.sign_out().await;

    assert_eq!(h.store.revocations(), 0);
    assert_eq!(h.machine.state(), AuthState::default());
}

#[tokio::test]
async fn sign_out_from_provider_session_revokes() {
    let h = Harness::new(AuthConfig::default());
    h.seed_user("doctor@example.com", "pw", Role::Doctor);

    h.machine
        .sign_in("doctor@example.com", "pw")
        .await
        .expect("sign-in");
    h.machine.sign_out().await;

    assert_eq!(h.store.revocations(), 1);
    assert_eq!(h.machine.state(), AuthState::default());
}

#[tokio::test]
async fn sign_out_clears_local_state_even_when_revocation_fails() {
    let h = Harness::new(AuthConfig::default());
    h.seed_user("doctor@example.com", "pw", Role::Doctor);

    h.machine
        .sign_in("doctor@example.com", "pw")
        .await
        .expect("sign-in");
    h.store.fail_revocations(true);
    h.machine.sign_out().await;

    assert_eq!(h.store.revocations(), 1);
    assert_eq!(h.machine.state(), AuthState::default());
}

#[tokio::test]
async fn attach_resumes_an_existing_session() {
    let h = Harness::new(AuthConfig::default());
    let subject_id = h.seed_user("doctor@example.com", "pw", Role::Doctor);
    h.store.push(Some(provider_session(subject_id, "doctor@example.com")));

    let _feed = h.machine.attach().await;

    let mut rx = h.machine.subscribe();
    let authed = rx
        .wait_for(|s| s.phase() == AuthPhase::Authenticated)
        .await
        .expect("authenticated state");
    assert_eq!(authed.subject.as_ref().unwrap().id, subject_id);
}

#[tokio::test]
async fn stale_profile_fetch_loses_to_a_newer_subject() {
    let h = Harness::new(AuthConfig::default());

    let first = SubjectId::new();
    let second = SubjectId::new();
    h.resolver.insert(profile_for(first, Role::Doctor));
    h.resolver.insert(profile_for(second, Role::Admin));
    // The first subject's fetch is still in flight when the second session
    // arrives.
    h.resolver.set_delay(first, Duration::from_millis(300));

    let _feed = h.machine.attach().await;
    h.store.push(Some(provider_session(first, "first@example.com")));
    h.store.push(Some(provider_session(second, "second@example.com")));

    let mut rx = h.machine.subscribe();
    let profiled = rx
        .wait_for(|s| s.profile.is_some())
        .await
        .expect("profiled state")
        .clone();
    assert_eq!(profiled.profile.as_ref().unwrap().subject_id, second);

    // Let the stale fetch complete; the guard must discard it.
    tokio::time::sleep(Duration::from_millis(400)).await;
    let state = h.machine.state();
    assert_eq!(state.subject.as_ref().unwrap().id, second);
    assert_eq!(state.profile.as_ref().unwrap().subject_id, second);
    assert_eq!(state.profile.as_ref().unwrap().role, Role::Admin);
}

#[tokio::test]
async fn duplicate_session_delivery_is_idempotent() {
    let h = Harness::new(AuthConfig::default());
    let subject_id = h.seed_user("doctor@example.com", "pw", Role::Doctor);
    let session = provider_session(subject_id, "doctor@example.com");

    let _feed = h.machine.attach().await;
    h.store.push(Some(session.clone()));

    let mut rx = h.machine.subscribe();
    rx.wait_for(|s| s.phase() == AuthPhase::Authenticated)
        .await
        .expect("authenticated state");

    let before = h.machine.state();
    let mut quiet = h.machine.subscribe();
    quiet.borrow_and_update();

    // Same session again: tolerated as a no-op (plus a redundant re-fetch
    // that resolves to an identical profile).
    h.store.push(Some(session));
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert!(!quiet.has_changed().expect("channel open"));
    assert_eq!(h.machine.state(), before);
}

#[tokio::test]
async fn session_invalidation_returns_to_unauthenticated() {
    let h = Harness::new(AuthConfig::default());
    let subject_id = h.seed_user("doctor@example.com", "pw", Role::Doctor);

    let _feed = h.machine.attach().await;
    h.store.push(Some(provider_session(subject_id, "doctor@example.com")));

    let mut rx = h.machine.subscribe();
    rx.wait_for(|s| s.phase() == AuthPhase::Authenticated)
        .await
        .expect("authenticated state");

    // Expiry/remote sign-out arrives over the feed.
    h.store.push(None);
    rx.wait_for(|s| s.phase() == AuthPhase::Unauthenticated)
        .await
        .expect("unauthenticated state");
    assert_eq!(h.machine.state(), AuthState::default());
}

#[tokio::test]
async fn bypass_session_survives_provider_feed_noise() {
    let h = Harness::new(bypass_config());
    let _feed = h.machine.attach().await;

    h.machine
        .sign_in("admin-bypass-id", "admin-bypass-secret")
        .await
        .expect("bypass sign-in");

    // The provider reporting "no session" says nothing about a session it
    // never issued.
    h.store.push(None);
    tokio::time::sleep(Duration::from_millis(100)).await;

    let state = h.machine.state();
    assert_eq!(state.phase(), AuthPhase::Authenticated);
    assert_eq!(state.session.as_ref().unwrap().kind, SessionKind::Bypass);
}

#[tokio::test]
async fn profile_fetch_failure_degrades_instead_of_blocking() {
    let h = Harness::new(AuthConfig::default());
    let subject_id = h.store.register("doctor@example.com", "pw");
    h.resolver.fail(subject_id);

    h.machine
        .sign_in("doctor@example.com", "pw")
        .await
        .expect("sign-in succeeds despite the resolver");

    tokio::time::sleep(Duration::from_millis(100)).await;

    let state = h.machine.state();
    assert_eq!(state.phase(), AuthPhase::Resolving);
    assert!(state.profile.is_none());
    assert!(!state.loading, "rendering must not block on the profile");
}
