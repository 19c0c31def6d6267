//! # Playback Backends
//!
//! Three backend variants of differing capability sit behind one trait:
//!
//! - [`NativeMediaBackend`](native::NativeMediaBackend) drives the
//!   platform's native decoder.
//! - [`StreamingBackend`](streaming::StreamingBackend) drives a streaming
//!   audio element.
//! - [`ExternalHandoffBackend`](handoff::ExternalHandoffBackend) delegates
//!   to a system viewer and retains no control.
//!
//! Every backend owns exactly one platform resource, reports status on a
//! bounded channel with a single reader, and guarantees an idempotent
//! `release`. The session constructs a fresh instance per play request via
//! [`BackendFactory`] and consults [`BackendCapability`] descriptors to
//! order candidates without instantiating anything.

pub mod handoff;
pub mod native;
pub mod streaming;

pub use handoff::ExternalHandoffBackend;
pub use native::NativeMediaBackend;
pub use streaming::StreamingBackend;

use crate::error::BackendError;
use crate::source::{SourceKind, SourceReference};
use async_trait::async_trait;
use bridge_traits::{ExternalViewer, NativeMediaEngine, StreamingElement};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Identifies a backend variant. Variants are listed in fixed fallback
/// priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    NativeMedia,
    Streaming,
    ExternalHandoff,
}

impl BackendKind {
    /// All variants in fallback priority order.
    pub const PRIORITY_ORDER: [BackendKind; 3] = [
        BackendKind::NativeMedia,
        BackendKind::Streaming,
        BackendKind::ExternalHandoff,
    ];

    /// Stable label used in logs and error messages.
    pub fn label(&self) -> &'static str {
        match self {
            BackendKind::NativeMedia => "native_media",
            BackendKind::Streaming => "streaming",
            BackendKind::ExternalHandoff => "external_handoff",
        }
    }

    /// The static capability descriptor for this variant.
    pub fn capability(&self) -> BackendCapability {
        match self {
            BackendKind::NativeMedia => BackendCapability {
                kinds: &[SourceKind::LocalPath],
                schemes: &["file"],
            },
            // The streaming element is forgiving: URLs always, and on some
            // platforms it dereferences local paths and content handles
            // directly.
            BackendKind::Streaming => BackendCapability {
                kinds: &[
                    SourceKind::RemoteUrl,
                    SourceKind::LocalPath,
                    SourceKind::OpaqueHandle,
                ],
                schemes: &["http", "https", "content"],
            },
            BackendKind::ExternalHandoff => BackendCapability {
                kinds: &[
                    SourceKind::LocalPath,
                    SourceKind::OpaqueHandle,
                    SourceKind::RemoteUrl,
                ],
                schemes: &[],
            },
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Static description of which references a backend variant accepts.
///
/// Consulted by the fallback orchestrator to order candidate backends
/// without invoking them.
#[derive(Debug, Clone, Copy)]
pub struct BackendCapability {
    /// Accepted source kinds.
    pub kinds: &'static [SourceKind],
    /// Additionally accepted URI schemes.
    pub schemes: &'static [&'static str],
}

impl BackendCapability {
    /// Whether this capability covers the given reference.
    pub fn accepts(&self, reference: &SourceReference) -> bool {
        if self.kinds.contains(&reference.kind()) {
            return true;
        }
        match reference.scheme() {
            Some(scheme) => self.schemes.contains(&scheme.as_str()),
            None => false,
        }
    }
}

/// Status reported by a backend on its bounded channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendStatus {
    Starting,
    Running,
    Paused,
    Stopped,
    /// The source played to its natural end.
    Completed,
    /// Playback was handed to an external process; no further status will
    /// arrive.
    Delegated,
    /// A runtime failure, already translated into the common error shape.
    Failed(BackendError),
}

impl BackendStatus {
    /// Terminal statuses end the backend's useful life.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BackendStatus::Completed | BackendStatus::Delegated | BackendStatus::Failed(_)
        )
    }
}

/// Common capability interface over all backend variants.
///
/// A backend owns at most one platform resource. `release` must be
/// idempotent and safe to call on an already-released backend; every other
/// control call may fail once released.
#[async_trait]
pub trait PlaybackBackend: Send {
    /// Which variant this instance is.
    fn kind(&self) -> BackendKind;

    /// Acquire the platform resource and begin playback of the reference.
    async fn start(&mut self, reference: &SourceReference) -> Result<(), BackendError>;

    /// Pause playback, keeping position.
    async fn pause(&mut self) -> Result<(), BackendError>;

    /// Resume from the paused position.
    async fn resume(&mut self) -> Result<(), BackendError>;

    /// Stop playback and reset position.
    async fn stop(&mut self) -> Result<(), BackendError>;

    /// Release the platform resource. Idempotent; never fails.
    async fn release(&mut self);

    /// Take the bounded status channel. Yields `Some` exactly once, before
    /// or after `start`; the channel is consumed by a single reader.
    fn take_status_receiver(&mut self) -> Option<mpsc::Receiver<BackendStatus>>;
}

/// Constructs a fresh backend instance per play request.
///
/// The session never reuses a backend across requests: the previous
/// instance is released before the factory is consulted again.
pub trait BackendFactory: Send + Sync {
    fn create(&self, kind: BackendKind) -> Box<dyn PlaybackBackend>;
}

/// Default factory wiring backends to the host bridge implementations.
pub struct BridgeBackendFactory {
    native_engine: Arc<dyn NativeMediaEngine>,
    streaming_element: Arc<dyn StreamingElement>,
    viewer: Arc<dyn ExternalViewer>,
    status_capacity: usize,
}

impl BridgeBackendFactory {
    pub fn new(
        native_engine: Arc<dyn NativeMediaEngine>,
        streaming_element: Arc<dyn StreamingElement>,
        viewer: Arc<dyn ExternalViewer>,
        status_capacity: usize,
    ) -> Self {
        Self {
            native_engine,
            streaming_element,
            viewer,
            status_capacity,
        }
    }
}

impl BackendFactory for BridgeBackendFactory {
    fn create(&self, kind: BackendKind) -> Box<dyn PlaybackBackend> {
        match kind {
            BackendKind::NativeMedia => Box::new(NativeMediaBackend::new(
                self.native_engine.clone(),
                self.status_capacity,
            )),
            BackendKind::Streaming => Box::new(StreamingBackend::new(
                self.streaming_element.clone(),
                self.status_capacity,
            )),
            BackendKind::ExternalHandoff => Box::new(ExternalHandoffBackend::new(
                self.viewer.clone(),
                self.status_capacity,
            )),
        }
    }
}

/// Candidate backends for a reference, in fallback priority order.
pub fn candidates_for(reference: &SourceReference) -> Vec<BackendKind> {
    BackendKind::PRIORITY_ORDER
        .iter()
        .copied()
        .filter(|kind| kind.capability().accepts(reference))
        .collect()
}
