//! In-memory collaborators for tests/dev.
//!
//! These stand in for the identity provider and the profile datastore:
//! scripted accounts, a manual session push to simulate refresh/expiry
//! notifications, and per-subject latency/failure injection on the resolver
//! so races and degraded paths can be driven deterministically.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use tokio::sync::broadcast;

use mediboard_core::SubjectId;

use crate::profile::Profile;
use crate::resolver::{ProfileResolver, ResolveError};
use crate::session::{Session, SessionKind};
use crate::store::{SessionChange, SessionStore, SignUpRequest, StoreError};

struct Account {
    secret: String,
    subject_id: SubjectId,
}

/// In-memory session store.
///
/// - No IO
/// - Sessions minted with a one-hour lifetime
/// - Change notifications broadcast in issuance order
pub struct InMemorySessionStore {
    accounts: Mutex<HashMap<String, Account>>,
    current: Mutex<Option<Session>>,
    changes: broadcast::Sender<SessionChange>,
    revocations: AtomicUsize,
    fail_revocation: AtomicBool,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account directly, bypassing `sign_up`.
    pub fn register(&self, identifier: impl Into<String>, secret: impl Into<String>) -> SubjectId {
        let subject_id = SubjectId::new();
        self.accounts.lock().expect("accounts lock").insert(
            identifier.into(),
            Account {
                secret: secret.into(),
                subject_id,
            },
        );
        subject_id
    }

    /// Replace the current session and notify subscribers, as a token
    /// refresh (`Some`) or an expiry/remote sign-out (`None`) would.
    pub fn push(&self, session: Option<Session>) {
        *self.current.lock().expect("current lock") = session.clone();
        let _ = self.changes.send(SessionChange { session });
    }

    /// Number of revocation calls received via `sign_out`.
    pub fn revocations(&self) -> usize {
        self.revocations.load(Ordering::SeqCst)
    }

    /// Make subsequent `sign_out` calls fail without touching the session.
    pub fn fail_revocations(&self, fail: bool) {
        self.fail_revocation.store(fail, Ordering::SeqCst);
    }

    fn mint(&self, subject_id: SubjectId, identifier: &str) -> Session {
        let now = Utc::now();
        Session {
            subject_id,
            contact: Some(identifier.to_string()),
            issued_at: now,
            expires_at: now + ChronoDuration::hours(1),
            kind: SessionKind::Provider,
        }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        let (changes, _) = broadcast::channel(16);
        Self {
            accounts: Mutex::new(HashMap::new()),
            current: Mutex::new(None),
            changes,
            revocations: AtomicUsize::new(0),
            fail_revocation: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn sign_in_with_credentials(
        &self,
        identifier: &str,
        secret: &str,
    ) -> Result<Session, StoreError> {
        let subject_id = {
            let accounts = self.accounts.lock().expect("accounts lock");
            match accounts.get(identifier) {
                Some(account) if account.secret == secret => account.subject_id,
                _ => return Err(StoreError::CredentialsRejected),
            }
        };

        let session = self.mint(subject_id, identifier);
        self.push(Some(session.clone()));
        Ok(session)
    }

    async fn sign_up(&self, request: SignUpRequest) -> Result<(), StoreError> {
        let mut accounts = self.accounts.lock().expect("accounts lock");
        if accounts.contains_key(&request.identifier) {
            return Err(StoreError::CredentialsRejected);
        }
        accounts.insert(
            request.identifier,
            Account {
                secret: request.secret,
                subject_id: SubjectId::new(),
            },
        );
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), StoreError> {
        self.revocations.fetch_add(1, Ordering::SeqCst);
        if self.fail_revocation.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("revocation failed".to_string()));
        }
        self.push(None);
        Ok(())
    }

    async fn current_session(&self) -> Result<Option<Session>, StoreError> {
        Ok(self.current.lock().expect("current lock").clone())
    }

    fn changes(&self) -> broadcast::Receiver<SessionChange> {
        self.changes.subscribe()
    }
}

/// A session store that fails every call, for outage testing.
pub struct UnavailableSessionStore {
    changes: broadcast::Sender<SessionChange>,
}

impl UnavailableSessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn unavailable() -> StoreError {
        StoreError::Unavailable("store offline".to_string())
    }
}

impl Default for UnavailableSessionStore {
    fn default() -> Self {
        let (changes, _) = broadcast::channel(1);
        Self { changes }
    }
}

#[async_trait]
impl SessionStore for UnavailableSessionStore {
    async fn sign_in_with_credentials(
        &self,
        _identifier: &str,
        _secret: &str,
    ) -> Result<Session, StoreError> {
        Err(Self::unavailable())
    }

    async fn sign_up(&self, _request: SignUpRequest) -> Result<(), StoreError> {
        Err(Self::unavailable())
    }

    async fn sign_out(&self) -> Result<(), StoreError> {
        Err(Self::unavailable())
    }

    async fn current_session(&self) -> Result<Option<Session>, StoreError> {
        Err(Self::unavailable())
    }

    fn changes(&self) -> broadcast::Receiver<SessionChange> {
        self.changes.subscribe()
    }
}

/// In-memory profile resolver with latency and failure injection.
pub struct InMemoryProfileResolver {
    rows: Mutex<HashMap<SubjectId, Profile>>,
    delays: Mutex<HashMap<SubjectId, Duration>>,
    failing: Mutex<HashSet<SubjectId>>,
    calls: AtomicUsize,
}

impl InMemoryProfileResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, profile: Profile) {
        self.rows
            .lock()
            .expect("rows lock")
            .insert(profile.subject_id, profile);
    }

    /// Delay resolution for one subject; later fetches still see the delay.
    pub fn set_delay(&self, subject_id: SubjectId, delay: Duration) {
        self.delays
            .lock()
            .expect("delays lock")
            .insert(subject_id, delay);
    }

    /// Make resolution for one subject fail with a transient error.
    pub fn fail(&self, subject_id: SubjectId) {
        self.failing.lock().expect("failing lock").insert(subject_id);
    }

    /// Number of `profile` calls received.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for InMemoryProfileResolver {
    fn default() -> Self {
        Self {
            rows: Mutex::new(HashMap::new()),
            delays: Mutex::new(HashMap::new()),
            failing: Mutex::new(HashSet::new()),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ProfileResolver for InMemoryProfileResolver {
    async fn profile(&self, subject_id: SubjectId) -> Result<Profile, ResolveError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let delay = self
            .delays
            .lock()
            .expect("delays lock")
            .get(&subject_id)
            .copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.lock().expect("failing lock").contains(&subject_id) {
            return Err(ResolveError::Transient("injected failure".to_string()));
        }

        self.rows
            .lock()
            .expect("rows lock")
            .get(&subject_id)
            .cloned()
            .ok_or(ResolveError::NotFound(subject_id))
    }
}
