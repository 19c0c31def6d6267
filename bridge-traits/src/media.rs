//! Media Engine Primitives
//!
//! Traits for the two host playback technologies the core drives directly:
//!
//! - [`NativeMediaEngine`] wraps the platform's native decoder (the
//!   Cordova-`Media`-style handle): one handle per source, explicit
//!   lifecycle, integer-ish status stream.
//! - [`StreamingElement`] wraps a streaming audio element (the
//!   HTML5-`Audio`-style object): set a source, play, and listen for
//!   `ended`/`error` events.
//!
//! Both deliver asynchronous status through a bounded `mpsc` channel that
//! the host populates and exactly one core-side reader consumes. Hosts must
//! drop the sender when the underlying resource is released so readers
//! observe end-of-stream.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::Result;

/// Status reported by a native media handle.
///
/// Mirrors the lifecycle of platform native-decoder objects: the handle is
/// created idle, passes through starting into running, and ends stopped.
/// `Completed` is the natural end of the source; `Error` is any decoder or
/// device failure, carried as a message because platform codes differ.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeMediaStatus {
    Idle,
    Starting,
    Running,
    Paused,
    Stopped,
    Completed,
    Error { message: String },
}

/// A live native-decoder handle bound to one audio source.
///
/// Handles own a platform resource; `release` must free it and is required
/// to be idempotent. Control calls after `release` may fail.
#[async_trait]
pub trait NativeMediaHandle: Send {
    /// Begin playback from the start of the source.
    async fn play(&mut self) -> Result<()>;

    /// Pause playback, keeping the position.
    async fn pause(&mut self) -> Result<()>;

    /// Resume playback from the paused position.
    async fn resume(&mut self) -> Result<()>;

    /// Stop playback and reset the position.
    async fn stop(&mut self) -> Result<()>;

    /// Free the underlying platform resource. Idempotent.
    async fn release(&mut self);

    /// Take the status channel. Returns `Some` exactly once; the channel is
    /// bounded and consumed by a single reader.
    fn take_status_receiver(&mut self) -> Option<mpsc::Receiver<NativeMediaStatus>>;
}

/// Factory for native media handles.
#[async_trait]
pub trait NativeMediaEngine: Send + Sync {
    /// Create a handle for the given URI. Creation allocates the platform
    /// resource but does not start playback.
    async fn create(&self, uri: &str) -> Result<Box<dyn NativeMediaHandle>>;
}

/// Error categories a streaming element can report.
///
/// The same four buckets browser media elements use; hosts map their
/// platform's codes onto these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamingErrorCode {
    /// Fetching was aborted before playback could begin.
    Aborted,
    /// A network failure interrupted fetching.
    Network,
    /// The stream was fetched but could not be decoded.
    Decode,
    /// The source format or MIME type is not supported.
    SrcNotSupported,
}

/// Event emitted by a streaming element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamingEvent {
    /// Enough data is buffered for playback to proceed.
    Playing,
    /// The stream ended naturally.
    Ended,
    /// A platform error; `code` categorizes it, `message` is host-specific.
    Error {
        code: StreamingErrorCode,
        message: String,
    },
}

/// A live streaming audio element bound to one source URL.
#[async_trait]
pub trait StreamingHandle: Send {
    /// Begin or resume playback.
    async fn play(&mut self) -> Result<()>;

    /// Pause playback, keeping the position.
    async fn pause(&mut self) -> Result<()>;

    /// Stop playback and reset the position to the start.
    async fn stop(&mut self) -> Result<()>;

    /// Detach the source and free buffered data. Idempotent.
    async fn release(&mut self);

    /// Take the event channel. Returns `Some` exactly once.
    fn take_event_receiver(&mut self) -> Option<mpsc::Receiver<StreamingEvent>>;
}

/// Factory for streaming elements.
#[async_trait]
pub trait StreamingElement: Send + Sync {
    /// Create an element with its source set to `url`. The element does not
    /// start playing until `play` is called on the handle.
    async fn open(&self, url: &str) -> Result<Box<dyn StreamingHandle>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn streaming_error_codes_are_distinct() {
        assert_ne!(StreamingErrorCode::Network, StreamingErrorCode::Decode);
        assert_ne!(
            StreamingErrorCode::Aborted,
            StreamingErrorCode::SrcNotSupported
        );
    }

    #[test]
    fn native_status_equality() {
        assert_eq!(NativeMediaStatus::Running, NativeMediaStatus::Running);
        assert_ne!(NativeMediaStatus::Running, NativeMediaStatus::Paused);
    }
}
