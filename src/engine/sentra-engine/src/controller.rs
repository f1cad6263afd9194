//! The auth controller.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use sentra_cache::SessionCache;
use sentra_identity::{Identity, RawSession};
use sentra_profile::{ProfileEnricher, ProfileStore};
use sentra_provider::IdentityProvider;
use sentra_resolver::IdentityResolver;

use crate::{EngineConfig, EngineError, EngineState};

/// Error message published when the initial resolution exceeds its
/// deadline.
const TIMEOUT_MESSAGE: &str = "session resolution timed out";

/// Why a resolution entered the pipeline. Logged only.
#[derive(Debug, Clone, Copy)]
enum ResolutionOrigin {
    InitialFetch,
    ProviderEvent,
    Retry,
}

/// What a settled resolution wants to publish.
enum Outcome {
    SignedIn {
        identity: Identity,
        raw: RawSession,
        warning: Option<String>,
    },
    SignedOut,
    Failed {
        message: String,
    },
}

/// Arbitration state. Guarded by one mutex, never held across `.await`:
/// a generation bump and a commit can therefore never interleave.
struct Arbiter {
    generation: u64,
    initialized: bool,
    disposed: bool,
    first_settled: bool,
}

impl Arbiter {
    fn new() -> Self {
        Self {
            generation: 0,
            initialized: false,
            disposed: false,
            first_settled: false,
        }
    }
}

/// Reconciles the identity provider and the profile store into one
/// reactive [`EngineState`].
///
/// Owns the provider subscription, the initial fetch, the timeout guard,
/// and the generation token that discards stale async results. Multiple
/// independent controllers are safely constructible; nothing here is
/// process-global.
///
/// Lifecycle: [`new`](AuthController::new) →
/// [`initialize`](AuthController::initialize) → ... →
/// [`dispose`](AuthController::dispose) on the owning scope's teardown.
pub struct AuthController {
    inner: Arc<Inner>,
}

struct Inner {
    provider: Arc<dyn IdentityProvider>,
    enricher: ProfileEnricher,
    resolver: IdentityResolver,
    cache: SessionCache,
    config: EngineConfig,
    state_tx: watch::Sender<EngineState>,
    arbiter: Mutex<Arbiter>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl AuthController {
    /// Creates a controller over the given collaborators.
    ///
    /// The published state is seeded with the cached identity (if any) so
    /// consumers have something to paint before the first resolution.
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        profiles: Arc<dyn ProfileStore>,
        cache: SessionCache,
        config: EngineConfig,
    ) -> Self {
        let resolver = IdentityResolver::new(Arc::clone(&provider), config.role_claim.clone());
        let (state_tx, _) = watch::channel(EngineState::with_cached_identity(cache.read()));

        Self {
            inner: Arc::new(Inner {
                enricher: ProfileEnricher::new(profiles),
                resolver,
                provider,
                cache,
                config,
                state_tx,
                arbiter: Mutex::new(Arbiter::new()),
                tasks: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Starts the engine: one fetch of the current session plus a live
    /// subscription to provider change events, both feeding the same
    /// resolution pipeline.
    ///
    /// Sets `loading` until the first resolution settles. Must be called
    /// from within a tokio runtime; calling it twice is an error.
    pub fn initialize(&self) -> Result<(), EngineError> {
        {
            let mut arbiter = self.inner.arbiter();
            if arbiter.disposed {
                return Err(EngineError::Disposed);
            }
            if arbiter.initialized {
                return Err(EngineError::AlreadyInitialized);
            }
            arbiter.initialized = true;
        }

        debug!(timeout = ?self.inner.config.initial_timeout, "initializing auth controller");
        self.inner.state_tx.send_modify(|state| state.loading = true);

        let mut tasks = Vec::with_capacity(3);

        // Timeout guard for the initial resolution only. Firing it does not
        // advance the generation: a late completion is still honored.
        let inner = Arc::clone(&self.inner);
        tasks.push(tokio::spawn(async move {
            tokio::time::sleep(inner.config.initial_timeout).await;
            inner.flag_timeout();
        }));

        // The generation is claimed here, at issue time, not when the fetch
        // completes: any event or retry issued later must invalidate this
        // fetch even while it is still in flight.
        if let Some(generation) = self.inner.next_generation(ResolutionOrigin::InitialFetch) {
            let inner = Arc::clone(&self.inner);
            tasks.push(tokio::spawn(async move {
                inner
                    .run_fetch(generation, ResolutionOrigin::InitialFetch)
                    .await;
            }));
        }

        let mut events = self.inner.provider.subscribe();
        let inner = Arc::clone(&self.inner);
        tasks.push(tokio::spawn(async move {
            while let Some(event) = events.next().await {
                let Some(generation) = inner.next_generation(ResolutionOrigin::ProviderEvent)
                else {
                    break;
                };
                debug!(kind = %event.kind, generation, "provider event");

                let inner = Arc::clone(&inner);
                tokio::spawn(async move {
                    inner
                        .resolve_and_commit(generation, event.session, ResolutionOrigin::ProviderEvent)
                        .await;
                });
            }
            debug!("provider event stream closed");
        }));

        self.inner.tasks().extend(tasks);
        Ok(())
    }

    /// Clears `error`/`timed_out` and re-runs the fetch path.
    ///
    /// Safe to call repeatedly: each call advances the generation, so only
    /// the latest in-flight attempt can win. Ignored before
    /// `initialize()` and after `dispose()`.
    pub fn retry(&self) {
        {
            let arbiter = self.inner.arbiter();
            if arbiter.disposed || !arbiter.initialized {
                debug!("retry ignored");
                return;
            }
        }

        // Claim the generation before spawning, so that of two retries in
        // quick succession the later call always holds the newer token.
        let Some(generation) = self.inner.next_generation(ResolutionOrigin::Retry) else {
            return;
        };

        debug!(generation, "retrying session fetch");
        self.inner.state_tx.send_modify(|state| {
            state.error = None;
            state.timed_out = false;
        });

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            inner.run_fetch(generation, ResolutionOrigin::Retry).await;
        });
    }

    /// Tears the controller down: unsubscribes from the provider, renders
    /// every in-flight resolution inert, and clears the session cache.
    ///
    /// Soft cancellation - in-flight provider calls are not aborted, their
    /// results just no longer match the generation. Idempotent.
    pub fn dispose(&self) {
        {
            let mut arbiter = self.inner.arbiter();
            if arbiter.disposed {
                return;
            }
            arbiter.disposed = true;
            arbiter.generation += 1;
        }

        for task in self.inner.tasks().drain(..) {
            task.abort();
        }
        self.inner.cache.clear();
        debug!("auth controller disposed");
    }

    /// Subscribes to state changes.
    pub fn watch(&self) -> watch::Receiver<EngineState> {
        self.inner.state_tx.subscribe()
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> EngineState {
        self.inner.state_tx.borrow().clone()
    }
}

impl Drop for AuthController {
    fn drop(&mut self) {
        // Dropping without dispose() stops the background tasks but leaves
        // the cache alone - only the explicit teardown signal clears it.
        for task in self.inner.tasks().drain(..) {
            task.abort();
        }
    }
}

impl Inner {
    fn arbiter(&self) -> MutexGuard<'_, Arbiter> {
        self.arbiter.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn tasks(&self) -> MutexGuard<'_, Vec<JoinHandle<()>>> {
        self.tasks.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Claims the next generation for a resolution attempt, or `None`
    /// after dispose.
    fn next_generation(&self, origin: ResolutionOrigin) -> Option<u64> {
        let mut arbiter = self.arbiter();
        if arbiter.disposed {
            return None;
        }
        arbiter.generation += 1;
        trace!(generation = arbiter.generation, origin = ?origin, "generation advanced");
        Some(arbiter.generation)
    }

    fn generation_is_current(&self, generation: u64) -> bool {
        let arbiter = self.arbiter();
        !arbiter.disposed && arbiter.generation == generation
    }

    fn first_settled(&self) -> bool {
        self.arbiter().first_settled
    }

    /// Fetches the current session and routes it through the pipeline,
    /// under a generation already claimed at issue time.
    async fn run_fetch(&self, generation: u64, origin: ResolutionOrigin) {
        match self.provider.current_session().await {
            Ok(session) => self.resolve_and_commit(generation, session, origin).await,
            Err(e) => {
                warn!(error = %e, origin = ?origin, "session fetch failed");
                self.commit(
                    generation,
                    Outcome::Failed {
                        message: e.to_string(),
                    },
                );
            },
        }
    }

    /// The resolution pipeline: enrich, resolve the role, commit.
    async fn resolve_and_commit(
        &self,
        generation: u64,
        session: Option<RawSession>,
        origin: ResolutionOrigin,
    ) {
        if !self.generation_is_current(generation) {
            trace!(generation, origin = ?origin, "stale before resolution, dropped");
            return;
        }

        let outcome = match session {
            None => Outcome::SignedOut,
            Some(raw) => {
                let initial_load = !self.first_settled();

                let (profile, warning) = match self.enricher.fetch(&raw.user_id).await {
                    Ok(profile) => (profile, None),
                    Err(e) if initial_load => {
                        warn!(error = %e, "profile fetch failed on initial load");
                        (None, Some(format!("profile unavailable: {e}")))
                    },
                    Err(e) => {
                        debug!(error = %e, "profile fetch failed, continuing without profile");
                        (None, None)
                    },
                };

                let resolution = self.resolver.resolve(&raw, profile).await;
                debug!(
                    user_id = %raw.user_id,
                    role = %resolution.identity.role,
                    source = ?resolution.role_source,
                    origin = ?origin,
                    "identity resolved"
                );

                Outcome::SignedIn {
                    identity: resolution.identity,
                    raw,
                    warning,
                }
            },
        };

        self.commit(generation, outcome);
    }

    /// Publishes a settled resolution, unless it has gone stale.
    ///
    /// Runs entirely under the arbiter lock: the generation check, the
    /// cache write, and the state publication cannot interleave with a
    /// newer resolution or with dispose.
    fn commit(&self, generation: u64, outcome: Outcome) {
        let mut arbiter = self.arbiter();
        if arbiter.disposed {
            trace!(generation, "commit after dispose, dropped");
            return;
        }
        if arbiter.generation != generation {
            trace!(
                captured = generation,
                current = arbiter.generation,
                "stale resolution dropped"
            );
            return;
        }
        arbiter.first_settled = true;

        match &outcome {
            Outcome::SignedIn { identity, .. } => {
                self.cache.write(identity);
            },
            Outcome::SignedOut => self.cache.remove(),
            Outcome::Failed { .. } => {},
        }

        self.state_tx.send_modify(|state| {
            state.loading = false;
            match outcome {
                Outcome::SignedIn {
                    identity,
                    raw,
                    warning,
                } => {
                    state.identity = Some(identity);
                    state.raw_session = Some(raw);
                    state.error = None;
                    state.timed_out = false;
                    state.warning = warning;
                },
                Outcome::SignedOut => {
                    state.identity = None;
                    state.raw_session = None;
                    state.error = None;
                    state.timed_out = false;
                    state.warning = None;
                },
                Outcome::Failed { message } => {
                    state.error = Some(message);
                    state.timed_out = false;
                },
            }
        });
    }

    /// Marks the initial resolution as timed out, unless something already
    /// settled. Does not advance the generation - the pending resolution
    /// may still complete and supersede this.
    fn flag_timeout(&self) {
        let arbiter = self.arbiter();
        if arbiter.disposed || arbiter.first_settled {
            return;
        }

        warn!(timeout = ?self.config.initial_timeout, "initial session resolution timed out");
        self.state_tx.send_modify(|state| {
            state.loading = false;
            state.timed_out = true;
            state.error = Some(TIMEOUT_MESSAGE.to_string());
        });
    }
}
