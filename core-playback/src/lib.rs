//! # Core Playback
//!
//! Audio source resolution and playback with multi-strategy fallback.
//!
//! ## Overview
//!
//! Given an opaque reference to an audio source — a direct file path, a
//! platform-opaque content handle, or a remote URL — this crate classifies
//! the source, obtains the platform permission grant when required,
//! resolves opaque handles into a form a backend can consume, and drives
//! exactly one of three playback backends, transparently retrying with an
//! alternate backend or resolution strategy on failure.
//!
//! ## Modules
//!
//! - [`source`] — immutable source references and pure classification
//! - [`mime`] — extension-based MIME inference with a safe default
//! - [`resolver`] — three-strategy opaque-handle resolution
//! - [`backend`] — the capability-polymorphic backend variants
//! - [`session`] — the authoritative playback session and fallback
//!   orchestrator
//! - [`sweep`] — best-effort temp cache cleanup
//! - [`track`] — local/remote track union with generic accessors
//!
//! ## Ownership model
//!
//! The [`session::PlaybackSession`] exclusively owns the active backend;
//! no other component holds a live reference to it. The resolver is
//! stateless — cache files it writes belong to the sweeper, not the
//! session.

pub mod backend;
pub mod error;
pub mod mime;
pub mod resolver;
pub mod session;
pub mod source;
pub mod sweep;
pub mod track;

pub use backend::{
    BackendCapability, BackendFactory, BackendKind, BackendStatus, BridgeBackendFactory,
    ExternalHandoffBackend, NativeMediaBackend, PlaybackBackend, StreamingBackend,
};
pub use error::{BackendError, PlaybackError, Result};
pub use mime::{infer_mime, DEFAULT_AUDIO_MIME};
pub use resolver::{HandleResolver, ResolutionResult, TEMP_AUDIO_PREFIX};
pub use session::PlaybackSession;
pub use source::{SourceKind, SourceReference};
pub use sweep::{SweepConfig, SweepOutcome, TempCacheSweeper};
pub use track::{LocalTrack, RemoteTrack, SessionTrack};
