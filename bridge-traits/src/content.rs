//! Content-Handle and External-Viewer Primitives
//!
//! Opaque content handles (e.g. `content://` URIs handed out by a platform
//! file picker) cannot be read through generic file APIs. These traits give
//! the core two host capabilities for dealing with them:
//!
//! - [`ContentResolver`] maps a handle to a real filesystem path, or reads
//!   its bytes through the platform's content channel.
//! - [`ExternalViewer`] hands a reference to the platform's default viewer
//!   application for a MIME type, delegating playback entirely.

use async_trait::async_trait;
use bytes::Bytes;
use std::path::PathBuf;

use crate::error::Result;

/// Host-provided resolution and reading of opaque content handles.
#[async_trait]
pub trait ContentResolver: Send + Sync {
    /// Ask the platform to map an opaque handle onto a real filesystem path.
    ///
    /// A returned path is not guaranteed to be readable by this process;
    /// callers must probe access separately.
    async fn resolve_native_path(&self, handle: &str) -> Result<PathBuf>;

    /// Read the handle's entire content through the platform content channel.
    ///
    /// May require a storage permission grant to succeed.
    async fn read_all(&self, handle: &str) -> Result<Bytes>;
}

/// Host-provided "open with default application" primitive.
#[async_trait]
pub trait ExternalViewer: Send + Sync {
    /// Open a path or handle with the platform's default viewer for the
    /// given MIME type. Resolves once the viewer has been launched; the
    /// viewer's further lifecycle is not observable.
    async fn open_with(&self, target: &str, mime_type: &str) -> Result<()>;
}
