//! # Playback Error Types
//!
//! Error taxonomy for source resolution and playback.
//!
//! Two layers: [`BackendError`] is the common shape every backend failure
//! is translated into (raw platform errors never cross a backend
//! boundary); [`PlaybackError`] is what the session surfaces once its
//! local retries are exhausted.

use thiserror::Error;

/// Error reported by a single playback backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The backend could not start playback of the given reference.
    #[error("Backend start failed: {0}")]
    StartFailed(String),

    /// The source format or scheme is not supported by this backend.
    #[error("Source not supported: {0}")]
    Unsupported(String),

    /// The stream was obtained but could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The audio device failed mid-playback.
    #[error("Device error: {0}")]
    Device(String),

    /// A network failure interrupted streaming.
    #[error("Network error: {0}")]
    Network(String),

    /// A control call was issued against a released backend.
    #[error("Backend already released")]
    Released,
}

impl BackendError {
    /// Whether the fallback orchestrator may retry this failure on another
    /// backend. Mid-playback runtime failures are all fallback-eligible.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, BackendError::Released)
    }
}

/// Errors that can terminate a play request.
#[derive(Error, Debug)]
pub enum PlaybackError {
    // ========================================================================
    // Permission Errors
    // ========================================================================
    /// The platform denied the storage/media access grant.
    #[error("Storage permission denied")]
    PermissionDenied,

    /// The permission subsystem itself failed.
    #[error("Permission gate error: {0}")]
    Access(#[from] core_access::AccessError),

    // ========================================================================
    // Resolution Errors
    // ========================================================================
    /// Every handle-resolution strategy failed; carries the aggregated
    /// per-strategy diagnostics.
    #[error("Could not resolve content handle: {details}")]
    ResolutionExhausted { details: String },

    // ========================================================================
    // Backend Errors
    // ========================================================================
    /// A single backend failed to start. Recoverable: the orchestrator
    /// advances to the next capable backend.
    #[error("Backend {backend} failed to start: {source}")]
    BackendStartFailed {
        backend: &'static str,
        source: BackendError,
    },

    /// A backend failed mid-playback. Recoverable like a start failure.
    #[error("Backend {backend} failed during playback: {source}")]
    BackendRuntimeFailure {
        backend: &'static str,
        source: BackendError,
    },

    /// No capable backend remains for the resolved reference.
    #[error("No playback backend could play the source: {details}")]
    AllBackendsExhausted { details: String },

    // ========================================================================
    // Generic Errors
    // ========================================================================
    /// Bridge capability failure outside the backend path.
    #[error("Bridge error: {0}")]
    Bridge(#[from] bridge_traits::BridgeError),

    /// Internal error (should not occur in normal operation).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PlaybackError {
    /// Returns `true` when the fallback orchestrator handles this error
    /// locally instead of surfacing it.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            PlaybackError::BackendStartFailed { .. } | PlaybackError::BackendRuntimeFailure { .. }
        )
    }

    /// The single human-readable message carried into the failed snapshot.
    pub fn user_message(&self) -> String {
        match self {
            PlaybackError::PermissionDenied => {
                "Storage permission denied. Enable storage access in the app settings.".to_string()
            }
            PlaybackError::ResolutionExhausted { .. } => {
                "The selected file could not be opened for playback.".to_string()
            }
            PlaybackError::AllBackendsExhausted { .. } => {
                "Playback failed: no available player could play this source.".to_string()
            }
            other => other.to_string(),
        }
    }
}

/// Result type for playback operations.
pub type Result<T> = std::result::Result<T, PlaybackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recoverable_classification() {
        let start = PlaybackError::BackendStartFailed {
            backend: "native_media",
            source: BackendError::StartFailed("no codec".into()),
        };
        assert!(start.is_recoverable());

        let runtime = PlaybackError::BackendRuntimeFailure {
            backend: "streaming",
            source: BackendError::Decode("truncated frame".into()),
        };
        assert!(runtime.is_recoverable());

        assert!(!PlaybackError::PermissionDenied.is_recoverable());
        assert!(!PlaybackError::AllBackendsExhausted {
            details: "tried 2".into()
        }
        .is_recoverable());
    }

    #[test]
    fn backend_released_is_not_recoverable() {
        assert!(!BackendError::Released.is_recoverable());
        assert!(BackendError::Decode("bad".into()).is_recoverable());
    }

    #[test]
    fn user_messages_are_stable() {
        let err = PlaybackError::PermissionDenied;
        assert!(err.user_message().contains("permission"));

        let err = PlaybackError::AllBackendsExhausted {
            details: "native: boom; streaming: boom".into(),
        };
        assert!(err.user_message().contains("no available player"));
    }
}
