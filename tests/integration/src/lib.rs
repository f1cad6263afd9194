//! Integration harness for the Sentra engine.
//!
//! Scripted collaborators whose behavior and completion order are driven
//! explicitly by the tests: a provider with gateable fetches and a pushable
//! event stream, a profile store with switchable failure modes, and a
//! cache store that can be inspected from outside the engine.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use tokio::sync::{mpsc, watch};

use sentra_cache::{CacheError, CacheStore, MemoryStore};
use sentra_engine::{AuthController, EngineState};
use sentra_identity::{ClaimPatch, Profile, RawSession};
use sentra_profile::{ProfileStore, ProfileStoreError};
use sentra_provider::{
    IdentityProvider, ProviderError, SessionEvent, SessionEventKind, SessionEvents,
};

/// Initializes test logging once; respects `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Waits for the first resolution to settle, bounded so a wedged engine
/// fails the test instead of hanging it.
pub async fn settled(controller: &AuthController) -> anyhow::Result<EngineState> {
    let mut rx = controller.watch();
    let state = tokio::time::timeout(
        Duration::from_secs(5),
        rx.wait_for(|state| !state.loading),
    )
    .await
    .context("engine did not settle in time")??;
    Ok(state.clone())
}

// ============================================================================
// Scripted provider
// ============================================================================

/// Identity provider whose fetch latency and event stream are driven by
/// the test.
///
/// `hold_fetches()` parks every `current_session` call behind a gate until
/// `release_fetches()`; `emit()` pushes an event to all live
/// subscriptions. Claim updates are applied to the stored session, like a
/// real provider, so write-back idempotence is observable.
pub struct ScriptedProvider {
    session: Mutex<Option<RawSession>>,
    gate: watch::Sender<bool>,
    subscribers: Mutex<Vec<mpsc::UnboundedSender<SessionEvent>>>,
    update_calls: AtomicUsize,
    fail_fetches: AtomicBool,
}

impl ScriptedProvider {
    /// Creates a provider holding the given session, fetches open.
    pub fn new(session: Option<RawSession>) -> Arc<Self> {
        let (gate, _) = watch::channel(true);
        Arc::new(Self {
            session: Mutex::new(session),
            gate,
            subscribers: Mutex::new(Vec::new()),
            update_calls: AtomicUsize::new(0),
            fail_fetches: AtomicBool::new(false),
        })
    }

    /// Parks subsequent `current_session` calls until released.
    pub fn hold_fetches(&self) {
        self.gate.send_replace(false);
    }

    /// Releases parked fetches.
    pub fn release_fetches(&self) {
        self.gate.send_replace(true);
    }

    /// Makes `current_session` fail until cleared.
    pub fn fail_fetches(&self, fail: bool) {
        self.fail_fetches.store(fail, Ordering::SeqCst);
    }

    /// Replaces the stored session.
    pub fn set_session(&self, session: Option<RawSession>) {
        *self.session.lock().unwrap() = session;
    }

    /// Pushes an event to every live subscription.
    pub fn emit(&self, kind: SessionEventKind, session: Option<RawSession>) {
        self.subscribers.lock().unwrap().retain(|tx| {
            tx.send(SessionEvent {
                kind,
                session: session.clone(),
            })
            .is_ok()
        });
    }

    /// Number of `update_claims` calls seen so far.
    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .unwrap()
            .iter()
            .filter(|tx| !tx.is_closed())
            .count()
    }
}

#[async_trait]
impl IdentityProvider for ScriptedProvider {
    async fn current_session(&self) -> Result<Option<RawSession>, ProviderError> {
        let mut open = self.gate.subscribe();
        let _ = open.wait_for(|open| *open).await;
        if self.fail_fetches.load(Ordering::SeqCst) {
            return Err(ProviderError::SessionFetch("scripted failure".into()));
        }
        Ok(self.session.lock().unwrap().clone())
    }

    fn subscribe(&self) -> SessionEvents {
        let (tx, events) = SessionEvents::channel();
        self.subscribers.lock().unwrap().push(tx);
        events
    }

    async fn update_claims(&self, patch: ClaimPatch) -> Result<(), ProviderError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(session) = self.session.lock().unwrap().as_mut() {
            for (key, value) in patch {
                session.claims.insert(key, value);
            }
        }
        Ok(())
    }
}

// ============================================================================
// Scripted profile store
// ============================================================================

/// Profile store backed by a map, with a switchable transport failure.
pub struct ScriptedProfiles {
    records: Mutex<HashMap<String, Profile>>,
    failing: AtomicBool,
}

impl ScriptedProfiles {
    /// Creates an empty store.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            records: Mutex::new(HashMap::new()),
            failing: AtomicBool::new(false),
        })
    }

    /// Creates a store holding the given records.
    pub fn with_records(records: impl IntoIterator<Item = Profile>) -> Arc<Self> {
        let store = Self::new();
        {
            let mut map = store.records.lock().unwrap();
            for record in records {
                map.insert(record.user_id.clone(), record);
            }
        }
        store
    }

    /// Makes every lookup fail with a transport error until cleared.
    pub fn fail(&self, fail: bool) {
        self.failing.store(fail, Ordering::SeqCst);
    }

    /// Inserts or replaces a record.
    pub fn insert(&self, profile: Profile) {
        self.records
            .lock()
            .unwrap()
            .insert(profile.user_id.clone(), profile);
    }
}

#[async_trait]
impl ProfileStore for ScriptedProfiles {
    async fn profile(&self, identity_id: &str) -> Result<Profile, ProfileStoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ProfileStoreError::Transport("scripted failure".into()));
        }
        self.records
            .lock()
            .unwrap()
            .get(identity_id)
            .cloned()
            .ok_or(ProfileStoreError::NotFound)
    }
}

// ============================================================================
// Inspectable cache store
// ============================================================================

/// Cache store handle that can be cloned: one clone goes into the engine,
/// the test keeps another to inspect what was persisted.
#[derive(Clone, Default)]
pub struct SharedStore {
    inner: Arc<MemoryStore>,
}

impl SharedStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStore for SharedStore {
    fn load(&self) -> Result<Option<String>, CacheError> {
        self.inner.load()
    }

    fn store(&self, document: &str) -> Result<(), CacheError> {
        self.inner.store(document)
    }

    fn remove(&self) -> Result<(), CacheError> {
        self.inner.remove()
    }
}

// ============================================================================
// Fixtures
// ============================================================================

/// A signed-in session without any role claim.
pub fn session_without_role(user_id: &str) -> RawSession {
    RawSession::new(user_id, format!("token-{user_id}")).with_email(format!("{user_id}@example.com"))
}

/// A signed-in session with the given role claim.
pub fn session_with_role(user_id: &str, role: &str) -> RawSession {
    session_without_role(user_id).with_claim("role", serde_json::Value::String(role.to_string()))
}
