//! # Temp Cache Sweeper
//!
//! Best-effort cleanup of the `temp_audio_*` files the copy-to-cache
//! resolution strategy leaves in the cache directory. The sweep is time-
//! and size-bounded: files older than the age bound go first, then the
//! oldest survivors until total size fits the byte bound.
//!
//! The sweeper shares the directory with concurrent resolutions and other
//! sweeps, so every per-file operation tolerates the file disappearing
//! underneath it; only a failure to reach the cache directory itself fails
//! the sweep.

use crate::error::Result;
use crate::resolver::TEMP_AUDIO_PREFIX;
use bridge_traits::{time::Clock, FileSystemAccess};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Bounds for one sweep pass.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Files older than this are always deleted.
    pub max_age: Duration,
    /// After the age pass, oldest files are deleted until the remaining
    /// total size fits under this bound.
    pub max_total_bytes: u64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            max_age: Duration::from_secs(24 * 60 * 60),
            max_total_bytes: 256 * 1024 * 1024,
        }
    }
}

/// What a sweep pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepOutcome {
    /// Temp files examined.
    pub examined: usize,
    /// Files actually deleted.
    pub deleted: usize,
    /// Bytes reclaimed by deletions.
    pub reclaimed_bytes: u64,
}

struct SweepCandidate {
    path: PathBuf,
    size: u64,
    modified_at: Option<i64>,
}

/// Best-effort sweeper for resolver-produced temp audio files.
pub struct TempCacheSweeper {
    fs: Arc<dyn FileSystemAccess>,
    clock: Arc<dyn Clock>,
    config: SweepConfig,
}

impl TempCacheSweeper {
    pub fn new(fs: Arc<dyn FileSystemAccess>, clock: Arc<dyn Clock>, config: SweepConfig) -> Self {
        Self { fs, clock, config }
    }

    /// Run one sweep pass.
    #[instrument(skip(self))]
    pub async fn sweep(&self) -> Result<SweepOutcome> {
        let cache_dir = self.fs.get_cache_directory().await?;
        let entries = self.fs.list_directory(&cache_dir).await?;

        let mut outcome = SweepOutcome::default();
        let mut candidates: Vec<SweepCandidate> = Vec::new();

        for path in entries {
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !name.starts_with(TEMP_AUDIO_PREFIX) {
                continue;
            }
            outcome.examined += 1;

            match self.fs.metadata(&path).await {
                Ok(meta) if !meta.is_directory => candidates.push(SweepCandidate {
                    path,
                    size: meta.size,
                    modified_at: meta.modified_at,
                }),
                Ok(_) => {}
                Err(e) => {
                    // Lost a race with another deleter; nothing to do.
                    debug!(path = %path.display(), error = %e, "Skipping unreadable temp file");
                }
            }
        }

        let now = self.clock.unix_timestamp();
        let max_age_secs = self.config.max_age.as_secs() as i64;

        // Age pass.
        let mut survivors: Vec<SweepCandidate> = Vec::new();
        for candidate in candidates {
            let expired = candidate
                .modified_at
                .map(|modified| now - modified > max_age_secs)
                .unwrap_or(false);
            if expired {
                self.delete(candidate, &mut outcome).await;
            } else {
                survivors.push(candidate);
            }
        }

        // Size pass: oldest first until the bound holds.
        let mut total: u64 = survivors.iter().map(|c| c.size).sum();
        survivors.sort_by_key(|c| c.modified_at.unwrap_or(i64::MAX));
        let mut survivors = survivors.into_iter();
        while total > self.config.max_total_bytes {
            let Some(candidate) = survivors.next() else {
                break;
            };
            total = total.saturating_sub(candidate.size);
            self.delete(candidate, &mut outcome).await;
        }

        info!(
            examined = outcome.examined,
            deleted = outcome.deleted,
            reclaimed = outcome.reclaimed_bytes,
            "Temp cache sweep finished"
        );
        Ok(outcome)
    }

    async fn delete(&self, candidate: SweepCandidate, outcome: &mut SweepOutcome) {
        match self.fs.delete_file(&candidate.path).await {
            Ok(()) => {
                outcome.deleted += 1;
                outcome.reclaimed_bytes += candidate.size;
            }
            Err(e) => {
                // Concurrent deletion is expected; anything else is logged
                // and skipped without failing the sweep.
                warn!(path = %candidate.path.display(), error = %e, "Temp file deletion skipped");
            }
        }
    }
}
