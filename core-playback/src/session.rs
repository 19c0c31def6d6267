//! # Playback Session
//!
//! The single authoritative "now playing" coordinator: classification →
//! permission → resolution → backend selection → playback, with the
//! fallback orchestrator walking an ordered candidate list on failure.
//!
//! ## Ownership & concurrency
//!
//! The session is the sole writer of `(phase, active_backend)`; both live
//! inside one `tokio::sync::Mutex` and change only as a unit. Each started
//! backend hands its bounded status channel to exactly one pump task, which
//! funnels every asynchronous status back through the same mutex — there is
//! no second writer.
//!
//! At most one backend resource is live at any instant. A new play request
//! first awaits the previous backend's `release()` under the session lock,
//! so backend lifetimes never overlap. Cancellation is supersession: every
//! request is stamped with a generation number, and any in-flight
//! continuation or pump whose generation is no longer current discards its
//! result instead of touching session state.
//!
//! ## State machine
//!
//! `Idle → Resolving → Selecting → Starting → Playing ⇄ Paused → Stopped`,
//! plus the `ExternalHandoff` pseudo-state (playback delegated, no further
//! observation possible) and terminal `Failed` carrying the last error.
//! Backend-reported end-of-stream maps to `Stopped`; backend runtime
//! failures re-enter the fallback orchestrator exactly like start failures
//! until the candidate list is exhausted.

use crate::backend::{candidates_for, BackendFactory, BackendKind, BackendStatus, PlaybackBackend};
use crate::error::{PlaybackError, Result};
use crate::resolver::HandleResolver;
use crate::source::{SourceKind, SourceReference};
use crate::track::SessionTrack;
use core_access::PermissionGate;
use core_runtime::events::{CoreEvent, EventBus, SessionPhase, SessionSnapshot};
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Remaining fallback work for the current play request.
struct FallbackPlan {
    resolved: SourceReference,
    remaining: VecDeque<BackendKind>,
    attempts: Vec<String>,
}

/// State guarded as a single unit by the session mutex.
struct SessionInner {
    phase: SessionPhase,
    active_backend: Option<Box<dyn PlaybackBackend>>,
    current_track: Option<SessionTrack>,
    last_error: Option<String>,
    plan: Option<FallbackPlan>,
}

impl SessionInner {
    fn new() -> Self {
        Self {
            phase: SessionPhase::Idle,
            active_backend: None,
            current_track: None,
            last_error: None,
            plan: None,
        }
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            title: self.current_track.as_ref().map(|t| t.title().to_string()),
            artist: self.current_track.as_ref().map(|t| t.artist().to_string()),
            last_error: self.last_error.clone(),
        }
    }
}

struct SessionCore {
    gate: Arc<PermissionGate>,
    resolver: HandleResolver,
    factory: Arc<dyn BackendFactory>,
    events: EventBus,
    inner: Mutex<SessionInner>,
    generation: AtomicU64,
}

impl SessionCore {
    fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Set a new phase and publish the snapshot. The emit result is
    /// intentionally ignored: an event bus without subscribers is fine.
    fn transition(&self, inner: &mut SessionInner, phase: SessionPhase) {
        debug!(from = ?inner.phase, to = ?phase, "Session transition");
        inner.phase = phase;
        self.events.emit(CoreEvent::Playback(inner.snapshot())).ok();
    }

    /// Release the active backend, if any, and await completion.
    async fn release_active(inner: &mut SessionInner) {
        if let Some(mut backend) = inner.active_backend.take() {
            debug!(backend = %backend.kind(), "Releasing active backend");
            backend.release().await;
        }
    }

    /// Mark the request failed: record the error, drop any live backend,
    /// transition to `Failed`, and hand the error back.
    async fn fail(&self, inner: &mut SessionInner, error: PlaybackError) -> PlaybackError {
        Self::release_active(inner).await;
        inner.plan = None;
        inner.last_error = Some(error.user_message());
        self.transition(inner, SessionPhase::Failed);
        error
    }
}

/// The long-lived playback session.
///
/// Created once and shared; cloning is cheap and clones coordinate on the
/// same underlying state.
#[derive(Clone)]
pub struct PlaybackSession {
    core: Arc<SessionCore>,
}

impl PlaybackSession {
    pub fn new(
        gate: Arc<PermissionGate>,
        resolver: HandleResolver,
        factory: Arc<dyn BackendFactory>,
        events: EventBus,
    ) -> Self {
        Self {
            core: Arc::new(SessionCore {
                gate,
                resolver,
                factory,
                events,
                inner: Mutex::new(SessionInner::new()),
                generation: AtomicU64::new(0),
            }),
        }
    }

    /// Subscribe to the ordered snapshot stream.
    pub fn subscribe(&self) -> core_runtime::events::Receiver<CoreEvent> {
        self.core.events.subscribe()
    }

    /// Current snapshot of `(phase, title, artist, last_error)`.
    pub async fn snapshot(&self) -> SessionSnapshot {
        self.core.inner.lock().await.snapshot()
    }

    /// Display title of the current track, shape-independent.
    pub async fn current_title(&self) -> Option<String> {
        self.snapshot().await.title
    }

    /// Display artist of the current track, shape-independent.
    pub async fn current_artist(&self) -> Option<String> {
        self.snapshot().await.artist
    }

    /// Start playing a track, superseding whatever the session was doing.
    ///
    /// Terminal failures transition the session to `Failed` and are also
    /// returned to the caller. A request superseded by a newer `play`
    /// returns `Ok(())` and leaves state to the newer request.
    #[instrument(skip(self, track), fields(request_id = %Uuid::new_v4(), title = track.title()))]
    pub async fn play(&self, track: SessionTrack) -> Result<()> {
        let core = &self.core;
        let generation = core.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let source = SourceReference::new(track.source_uri());
        info!(source = %source, kind = ?source.kind(), "Play requested");

        // Supersede: the previous backend is fully released before this
        // request enters Resolving.
        {
            let mut inner = core.inner.lock().await;
            // A still-current generation means any live backend belongs to
            // an older request; a stale one must not touch the newer
            // request's backend.
            if core.current_generation() != generation {
                return Ok(());
            }
            SessionCore::release_active(&mut inner).await;
            inner.current_track = Some(track);
            inner.last_error = None;
            inner.plan = None;
            core.transition(&mut inner, SessionPhase::Resolving);
        }

        // Permission gate. Denial is surfaced immediately; there is no
        // fallback for it.
        let granted = match core.gate.ensure_granted().await {
            Ok(granted) => granted,
            Err(e) => {
                let mut inner = core.inner.lock().await;
                if core.current_generation() != generation {
                    return Ok(());
                }
                return Err(core.fail(&mut inner, PlaybackError::Access(e)).await);
            }
        };
        if !granted {
            let mut inner = core.inner.lock().await;
            if core.current_generation() != generation {
                return Ok(());
            }
            return Err(core.fail(&mut inner, PlaybackError::PermissionDenied).await);
        }

        // Resolution runs only for opaque handles; local paths and remote
        // URLs go straight to backend selection.
        let resolved = if source.kind() == SourceKind::OpaqueHandle {
            match core.resolver.resolve(&source).await {
                Ok(resolution) => {
                    if resolution.handled_externally {
                        let mut inner = core.inner.lock().await;
                        if core.current_generation() != generation {
                            return Ok(());
                        }
                        inner.plan = None;
                        core.transition(&mut inner, SessionPhase::ExternalHandoff);
                        return Ok(());
                    }
                    resolution.resolved
                }
                Err(e) => {
                    let mut inner = core.inner.lock().await;
                    if core.current_generation() != generation {
                        return Ok(());
                    }
                    return Err(core.fail(&mut inner, e).await);
                }
            }
        } else {
            source
        };

        // Selection and the first Starting attempt happen under the lock,
        // serializing against any competing play request.
        let mut inner = core.inner.lock().await;
        if core.current_generation() != generation {
            return Ok(());
        }
        core.transition(&mut inner, SessionPhase::Selecting);

        let candidates = candidates_for(&resolved);
        debug!(?candidates, "Backend candidates");
        if candidates.is_empty() {
            let err = PlaybackError::AllBackendsExhausted {
                details: format!("no capable backend for {resolved}"),
            };
            return Err(core.fail(&mut inner, err).await);
        }

        inner.plan = Some(FallbackPlan {
            resolved,
            remaining: candidates.into(),
            attempts: Vec::new(),
        });

        start_next(Arc::clone(core), generation, &mut inner).await
    }

    /// Pause playback. A no-op unless currently `Playing`.
    pub async fn pause(&self) -> Result<()> {
        let core = &self.core;
        let mut inner = core.inner.lock().await;
        if inner.phase != SessionPhase::Playing {
            return Ok(());
        }
        if let Some(backend) = inner.active_backend.as_mut() {
            let kind = backend.kind();
            backend
                .pause()
                .await
                .map_err(|e| PlaybackError::BackendRuntimeFailure {
                    backend: kind.label(),
                    source: e,
                })?;
        }
        core.transition(&mut inner, SessionPhase::Paused);
        Ok(())
    }

    /// Resume playback. A no-op unless currently `Paused`.
    pub async fn resume(&self) -> Result<()> {
        let core = &self.core;
        let mut inner = core.inner.lock().await;
        if inner.phase != SessionPhase::Paused {
            return Ok(());
        }
        if let Some(backend) = inner.active_backend.as_mut() {
            let kind = backend.kind();
            backend
                .resume()
                .await
                .map_err(|e| PlaybackError::BackendRuntimeFailure {
                    backend: kind.label(),
                    source: e,
                })?;
        }
        core.transition(&mut inner, SessionPhase::Playing);
        Ok(())
    }

    /// Stop playback with guaranteed backend release.
    pub async fn stop(&self) -> Result<()> {
        let core = &self.core;
        // Invalidate in-flight work so late continuations are discarded.
        core.generation.fetch_add(1, Ordering::SeqCst);
        let mut inner = core.inner.lock().await;
        if let Some(backend) = inner.active_backend.as_mut() {
            // Best effort; release below is the real guarantee.
            backend.stop().await.ok();
        }
        SessionCore::release_active(&mut inner).await;
        inner.plan = None;
        core.transition(&mut inner, SessionPhase::Stopped);
        Ok(())
    }

    /// Release everything at process teardown and return to `Idle`.
    pub async fn shutdown(&self) {
        let core = &self.core;
        core.generation.fetch_add(1, Ordering::SeqCst);
        let mut inner = core.inner.lock().await;
        SessionCore::release_active(&mut inner).await;
        inner.plan = None;
        inner.current_track = None;
        inner.last_error = None;
        core.transition(&mut inner, SessionPhase::Idle);
    }
}

/// Walk the fallback plan: try each remaining candidate in priority order
/// until one starts or the list is exhausted.
///
/// Boxed because the status pump re-enters this on runtime failures.
fn start_next<'a>(
    core: Arc<SessionCore>,
    generation: u64,
    inner: &'a mut SessionInner,
) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
    Box::pin(async move {
        let resolved = match inner.plan.as_ref() {
            Some(plan) => plan.resolved.clone(),
            None => {
                return Err(PlaybackError::Internal(
                    "fallback plan missing during start".into(),
                ))
            }
        };

        loop {
            // A newer play request may have superseded this one while a
            // backend start was awaited; its results are discarded.
            if core.current_generation() != generation {
                return Ok(());
            }

            let next = inner
                .plan
                .as_mut()
                .and_then(|plan| plan.remaining.pop_front());

            let Some(kind) = next else {
                let details = inner
                    .plan
                    .as_ref()
                    .map(|plan| plan.attempts.join("; "))
                    .unwrap_or_default();
                let err = PlaybackError::AllBackendsExhausted { details };
                return Err(core.fail(inner, err).await);
            };

            core.transition(inner, SessionPhase::Starting);
            info!(backend = %kind, source = %resolved, "Starting backend");

            let mut backend = core.factory.create(kind);
            let status_rx = backend.take_status_receiver();

            match backend.start(&resolved).await {
                Ok(()) => {
                    if core.current_generation() != generation {
                        backend.release().await;
                        return Ok(());
                    }

                    if kind == BackendKind::ExternalHandoff {
                        // Delegated: nothing left to own or observe.
                        backend.release().await;
                        inner.plan = None;
                        core.transition(inner, SessionPhase::ExternalHandoff);
                        return Ok(());
                    }

                    inner.active_backend = Some(backend);
                    if let Some(rx) = status_rx {
                        spawn_pump(Arc::clone(&core), generation, rx);
                    }
                    core.transition(inner, SessionPhase::Playing);
                    return Ok(());
                }
                Err(e) => {
                    warn!(backend = %kind, error = %e, "Backend start failed, advancing");
                    backend.release().await;
                    if let Some(plan) = inner.plan.as_mut() {
                        plan.attempts.push(format!("{kind}: {e}"));
                    }
                }
            }
        }
    })
}

/// Consume one backend's status channel and funnel it into the session.
///
/// The pump belongs to a single play generation; once superseded it exits
/// without touching state.
fn spawn_pump(core: Arc<SessionCore>, generation: u64, mut rx: mpsc::Receiver<BackendStatus>) {
    tokio::spawn(async move {
        while let Some(status) = rx.recv().await {
            if core.current_generation() != generation {
                return;
            }

            match status {
                BackendStatus::Starting => {}
                BackendStatus::Running => {
                    let mut inner = core.inner.lock().await;
                    if core.current_generation() == generation
                        && inner.phase == SessionPhase::Paused
                    {
                        // Backend-driven resume (e.g. platform media keys).
                        core.transition(&mut inner, SessionPhase::Playing);
                    }
                }
                BackendStatus::Paused => {
                    let mut inner = core.inner.lock().await;
                    if core.current_generation() == generation
                        && inner.phase == SessionPhase::Playing
                    {
                        core.transition(&mut inner, SessionPhase::Paused);
                    }
                }
                BackendStatus::Stopped | BackendStatus::Completed => {
                    let mut inner = core.inner.lock().await;
                    if core.current_generation() != generation {
                        return;
                    }
                    if matches!(inner.phase, SessionPhase::Playing | SessionPhase::Paused) {
                        SessionCore::release_active(&mut inner).await;
                        inner.plan = None;
                        core.transition(&mut inner, SessionPhase::Stopped);
                    }
                    return;
                }
                BackendStatus::Delegated => {
                    let mut inner = core.inner.lock().await;
                    if core.current_generation() != generation {
                        return;
                    }
                    SessionCore::release_active(&mut inner).await;
                    inner.plan = None;
                    core.transition(&mut inner, SessionPhase::ExternalHandoff);
                    return;
                }
                BackendStatus::Failed(error) => {
                    let mut inner = core.inner.lock().await;
                    if core.current_generation() != generation {
                        return;
                    }
                    if !matches!(
                        inner.phase,
                        SessionPhase::Playing | SessionPhase::Paused | SessionPhase::Starting
                    ) {
                        return;
                    }

                    let backend_label = inner
                        .active_backend
                        .as_ref()
                        .map(|b| b.kind().label())
                        .unwrap_or("unknown");
                    warn!(backend = backend_label, %error, "Backend runtime failure, re-entering fallback");

                    SessionCore::release_active(&mut inner).await;
                    if let Some(plan) = inner.plan.as_mut() {
                        plan.attempts
                            .push(format!("{backend_label}: runtime failure: {error}"));
                    }

                    // Re-enter the orchestrator exactly like a start
                    // failure; it transitions to Failed on exhaustion.
                    start_next(Arc::clone(&core), generation, &mut inner)
                        .await
                        .ok();
                    return;
                }
            }
        }
    });
}
