//! # Handle Resolver
//!
//! Converts an opaque content handle into a reference at least one backend
//! can consume, trying three strategies in a fixed order:
//!
//! 1. **Native path resolution** — ask the platform to map the handle onto
//!    a real filesystem path, then verify the path is actually readable. A
//!    path that fails the read probe fails the strategy.
//! 2. **Copy to cache** — read the handle's bytes through the platform
//!    content channel and publish them as a uniquely-named file in the app
//!    cache directory. The write lands in a `.part` file first and is
//!    renamed into place, so a half-written file is never returned.
//! 3. **External handoff** — open the handle with the system viewer for
//!    its inferred MIME type. Playback then happens outside this process.
//!
//! A later strategy runs only when the prior one raised an error. When all
//! three fail the resolver returns an error aggregating every diagnostic;
//! it never silently succeeds with the original unusable handle.
//!
//! The resolver is stateless: cache files it creates are disclaimed to the
//! sweeper (see [`crate::sweep`]), not tracked here.

use crate::error::{PlaybackError, Result};
use crate::mime::infer_mime;
use crate::source::{SourceKind, SourceReference};
use bridge_traits::{time::Clock, ContentResolver, ExternalViewer, FileSystemAccess};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Name prefix of cache files produced by the copy-to-cache strategy.
pub const TEMP_AUDIO_PREFIX: &str = "temp_audio_";

/// Extension used when the original reference has none.
const FALLBACK_EXTENSION: &str = "mp3";

/// Outcome of one opaque-handle resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionResult {
    /// The reference a backend should consume. Equal to the input when the
    /// handle was handed off externally.
    pub resolved: SourceReference,
    /// `true` when a side-effecting handoff already occurred and no backend
    /// selection is needed.
    pub handled_externally: bool,
    /// Diagnostics from strategies that failed before one succeeded.
    pub diagnostic: Option<String>,
}

/// Stateless multi-strategy resolver for opaque content handles.
pub struct HandleResolver {
    content: Arc<dyn ContentResolver>,
    viewer: Arc<dyn ExternalViewer>,
    fs: Arc<dyn FileSystemAccess>,
    clock: Arc<dyn Clock>,
}

impl HandleResolver {
    pub fn new(
        content: Arc<dyn ContentResolver>,
        viewer: Arc<dyn ExternalViewer>,
        fs: Arc<dyn FileSystemAccess>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            content,
            viewer,
            fs,
            clock,
        }
    }

    /// Resolve an opaque handle. Non-opaque references pass through
    /// untouched.
    #[instrument(skip(self), fields(source = %source))]
    pub async fn resolve(&self, source: &SourceReference) -> Result<ResolutionResult> {
        if source.kind() != SourceKind::OpaqueHandle {
            return Ok(ResolutionResult {
                resolved: source.clone(),
                handled_externally: false,
                diagnostic: None,
            });
        }

        let mut failures: Vec<String> = Vec::new();

        match self.try_native_path(source).await {
            Ok(resolved) => {
                info!(resolved = %resolved, "Resolved handle to native path");
                return Ok(ResolutionResult {
                    resolved,
                    handled_externally: false,
                    diagnostic: None,
                });
            }
            Err(reason) => {
                warn!(%reason, "Native path resolution failed");
                failures.push(format!("native path: {reason}"));
            }
        }

        match self.try_copy_to_cache(source).await {
            Ok(resolved) => {
                info!(resolved = %resolved, "Copied handle content into cache");
                return Ok(ResolutionResult {
                    resolved,
                    handled_externally: false,
                    diagnostic: Some(failures.join("; ")),
                });
            }
            Err(reason) => {
                warn!(%reason, "Copy-to-cache failed");
                failures.push(format!("copy to cache: {reason}"));
            }
        }

        match self.try_external_handoff(source).await {
            Ok(()) => {
                info!("Handle opened with system viewer");
                return Ok(ResolutionResult {
                    resolved: source.clone(),
                    handled_externally: true,
                    diagnostic: Some(failures.join("; ")),
                });
            }
            Err(reason) => {
                warn!(%reason, "External handoff failed");
                failures.push(format!("external handoff: {reason}"));
            }
        }

        Err(PlaybackError::ResolutionExhausted {
            details: failures.join("; "),
        })
    }

    /// Strategy 1: platform path mapping plus a read-access probe.
    async fn try_native_path(&self, source: &SourceReference) -> std::result::Result<SourceReference, String> {
        let path = self
            .content
            .resolve_native_path(source.raw())
            .await
            .map_err(|e| e.to_string())?;

        // A mapping the process cannot actually read counts as a failure of
        // this strategy, not a success.
        match self.fs.open_read_stream(&path).await {
            Ok(_stream) => Ok(SourceReference::new(path.to_string_lossy())),
            Err(e) => Err(format!(
                "resolved to {} but read probe failed: {e}",
                path.display()
            )),
        }
    }

    /// Strategy 2: read through the content channel, publish atomically
    /// under the cache naming convention `temp_audio_<epoch-millis>.<ext>`.
    async fn try_copy_to_cache(&self, source: &SourceReference) -> std::result::Result<SourceReference, String> {
        let data = self
            .content
            .read_all(source.raw())
            .await
            .map_err(|e| e.to_string())?;

        let cache_dir = self
            .fs
            .get_cache_directory()
            .await
            .map_err(|e| e.to_string())?;

        let extension = source
            .extension()
            .unwrap_or_else(|| FALLBACK_EXTENSION.to_string());
        let file_name = format!(
            "{}{}.{}",
            TEMP_AUDIO_PREFIX,
            self.clock.unix_timestamp_millis(),
            extension
        );
        let final_path = cache_dir.join(&file_name);
        let part_path = cache_dir.join(format!("{file_name}.part"));

        debug!(size = data.len(), path = %final_path.display(), "Writing cache copy");

        if let Err(e) = self.fs.write_file(&part_path, data).await {
            self.discard_partial(&part_path).await;
            return Err(format!("write failed: {e}"));
        }

        if let Err(e) = self.fs.rename(&part_path, &final_path).await {
            self.discard_partial(&part_path).await;
            return Err(format!("publish failed: {e}"));
        }

        Ok(SourceReference::new(final_path.to_string_lossy()))
    }

    /// Strategy 3: delegate to the system viewer.
    async fn try_external_handoff(&self, source: &SourceReference) -> std::result::Result<(), String> {
        let mime = infer_mime(source);
        self.viewer
            .open_with(source.raw(), mime)
            .await
            .map_err(|e| e.to_string())
    }

    async fn discard_partial(&self, path: &PathBuf) {
        if let Err(e) = self.fs.delete_file(path).await {
            // The partial may never have been created; nothing to clean.
            debug!(path = %path.display(), error = %e, "Partial cache file cleanup skipped");
        }
    }
}
