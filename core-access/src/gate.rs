//! # Permission Gate
//!
//! Tracks whether the process currently holds the storage/media access
//! grant needed to read arbitrary local audio sources, and obtains it on
//! demand.
//!
//! The gate is purely advisory: it is consulted before source resolution
//! begins and never blocks backend playback. Results are cached under a
//! TTL so repeated play requests do not re-prompt the user; denied results
//! are cached just like granted ones, which bounds the re-prompt rate.
//!
//! ## Prompt minimization
//!
//! `ensure_granted` first checks every sub-permission the active tier
//! requires and requests only the ones that are missing. An
//! already-granted sub-permission is never re-requested.

use crate::error::Result;
use crate::tier::PermissionTier;
use bridge_traits::{time::Clock, PermissionBridge, PermissionId};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Default TTL for a cached grant result (5 minutes).
pub const GRANT_TTL: Duration = Duration::from_secs(300);

/// A cached permission outcome.
///
/// A grant older than the gate's TTL is stale and must be re-derived,
/// never trusted blindly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionGrant {
    /// Whether all required sub-permissions were granted.
    pub granted: bool,
    /// When the outcome was derived.
    pub obtained_at: DateTime<Utc>,
}

/// TTL-cached gate over the host permission primitive.
pub struct PermissionGate {
    bridge: Arc<dyn PermissionBridge>,
    clock: Arc<dyn Clock>,
    ttl: ChronoDuration,
    cached: RwLock<Option<PermissionGrant>>,
}

impl PermissionGate {
    /// Create a gate with the default TTL.
    pub fn new(bridge: Arc<dyn PermissionBridge>, clock: Arc<dyn Clock>) -> Self {
        Self::with_ttl(bridge, clock, GRANT_TTL)
    }

    /// Create a gate with a custom TTL.
    pub fn with_ttl(
        bridge: Arc<dyn PermissionBridge>,
        clock: Arc<dyn Clock>,
        ttl: Duration,
    ) -> Self {
        let ttl = ChronoDuration::from_std(ttl).unwrap_or_else(|_| ChronoDuration::seconds(300));
        Self {
            bridge,
            clock,
            ttl,
            cached: RwLock::new(None),
        }
    }

    /// The tier the gate is operating under, derived from the host's
    /// platform release string.
    pub fn tier(&self) -> PermissionTier {
        PermissionTier::detect(self.bridge.platform_release().as_deref())
    }

    /// Return the cached outcome if it is still fresh.
    pub fn check_cached(&self) -> Option<bool> {
        let cached = self.cached.read();
        let grant = (*cached)?;
        let age = self.clock.now() - grant.obtained_at;
        if age < self.ttl {
            Some(grant.granted)
        } else {
            None
        }
    }

    /// Ensure the process holds the access grant, consulting the cache
    /// first and performing a fresh check-and-request sequence when the
    /// cache is stale.
    ///
    /// Returns `Ok(true)` iff every sub-permission required by the active
    /// tier ends up granted. Bridge failures propagate as errors and do
    /// not update the cache.
    #[instrument(skip(self))]
    pub async fn ensure_granted(&self) -> Result<bool> {
        if let Some(granted) = self.check_cached() {
            debug!(granted, "Using cached permission grant");
            return Ok(granted);
        }

        let tier = self.tier();
        let required = tier.required_permissions();
        debug!(?tier, count = required.len(), "Checking required permissions");

        let mut missing: Vec<PermissionId> = Vec::new();
        for &id in required {
            if self.bridge.check_permission(id).await? {
                debug!(permission = %id, "Already granted, skipping request");
            } else {
                missing.push(id);
            }
        }

        let mut all_granted = true;
        for id in missing {
            info!(permission = %id, "Requesting permission");
            if !self.bridge.request_permission(id).await? {
                warn!(permission = %id, "Permission request denied");
                all_granted = false;
            }
        }

        self.store(all_granted);
        Ok(all_granted)
    }

    fn store(&self, granted: bool) {
        let grant = PermissionGrant {
            granted,
            obtained_at: self.clock.now(),
        };
        *self.cached.write() = Some(grant);
    }
}

impl std::fmt::Debug for PermissionGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionGate")
            .field("ttl", &self.ttl)
            .field("cached", &*self.cached.read())
            .finish()
    }
}
