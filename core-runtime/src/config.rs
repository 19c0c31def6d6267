//! # Core Configuration Module
//!
//! Provides configuration management for the audio core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a
//! `CoreConfig` instance holding every bridge dependency and tunable the
//! core needs. It enforces fail-fast validation so a missing capability is
//! reported at startup with an actionable message instead of surfacing as a
//! runtime panic mid-playback.
//!
//! ## Required Dependencies
//!
//! - `PermissionBridge` - runtime permission primitive
//! - `ContentResolver` - opaque-handle resolution and reads
//! - `ExternalViewer` - system-viewer handoff
//! - `FileSystemAccess` - cache directory and file I/O
//! - `NativeMediaEngine` - platform native decoder
//! - `StreamingElement` - streaming audio element
//!
//! ## Optional Dependencies
//!
//! - `HttpClient` - catalog lookups (desktop default: reqwest when the
//!   `desktop-shims` feature is enabled)
//! - `Clock` - time source (defaults to the system clock)
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::CoreConfig;
//! use std::sync::Arc;
//!
//! let config = CoreConfig::builder()
//!     .permissions(Arc::new(MyPermissions))
//!     .content_resolver(Arc::new(MyContentResolver))
//!     .external_viewer(Arc::new(MyViewer))
//!     .file_system(Arc::new(MyFileSystem))
//!     .native_engine(Arc::new(MyNativeEngine))
//!     .streaming_element(Arc::new(MyStreamingElement))
//!     .build()
//!     .expect("Failed to build config");
//! ```

use crate::error::{Error, Result};
use bridge_traits::{
    Clock, ContentResolver, ExternalViewer, FileSystemAccess, HttpClient, NativeMediaEngine,
    PermissionBridge, StreamingElement, SystemClock,
};
use std::sync::Arc;
use std::time::Duration;

use crate::events::DEFAULT_EVENT_BUFFER_SIZE;

/// Default TTL for a cached permission grant.
pub const DEFAULT_GRANT_TTL: Duration = Duration::from_secs(300);

/// Default capacity of each backend's status channel.
pub const DEFAULT_STATUS_CHANNEL_CAPACITY: usize = 16;

/// Default maximum age before a temp cache file becomes sweep-eligible.
pub const DEFAULT_SWEEP_MAX_AGE: Duration = Duration::from_secs(24 * 60 * 60);

/// Default total size bound for temp cache files.
pub const DEFAULT_SWEEP_MAX_TOTAL_BYTES: u64 = 256 * 1024 * 1024;

/// Default catalog service base URL.
pub const DEFAULT_CATALOG_BASE_URL: &str = "https://api.deezer.com";

/// Core configuration for the audio playback core.
///
/// Use [`CoreConfig::builder`] to construct instances.
#[derive(Clone)]
pub struct CoreConfig {
    /// Runtime permission primitive.
    pub permissions: Arc<dyn PermissionBridge>,

    /// Opaque-handle resolution and content reads.
    pub content_resolver: Arc<dyn ContentResolver>,

    /// System-viewer handoff primitive.
    pub external_viewer: Arc<dyn ExternalViewer>,

    /// File system access abstraction.
    pub file_system: Arc<dyn FileSystemAccess>,

    /// Platform native media engine.
    pub native_engine: Arc<dyn NativeMediaEngine>,

    /// Streaming audio element factory.
    pub streaming_element: Arc<dyn StreamingElement>,

    /// HTTP client for catalog lookups (optional; catalog is disabled
    /// without it).
    pub http_client: Option<Arc<dyn HttpClient>>,

    /// Injectable time source.
    pub clock: Arc<dyn Clock>,

    /// TTL for the permission grant cache.
    pub grant_ttl: Duration,

    /// Event bus buffer size.
    pub event_buffer_size: usize,

    /// Capacity of each backend's bounded status channel.
    pub status_channel_capacity: usize,

    /// Age bound for the temp cache sweeper.
    pub sweep_max_age: Duration,

    /// Size bound for the temp cache sweeper.
    pub sweep_max_total_bytes: u64,

    /// Catalog service base URL.
    pub catalog_base_url: String,
}

impl std::fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreConfig")
            .field("permissions", &"PermissionBridge { ... }")
            .field("content_resolver", &"ContentResolver { ... }")
            .field("external_viewer", &"ExternalViewer { ... }")
            .field("file_system", &"FileSystemAccess { ... }")
            .field("native_engine", &"NativeMediaEngine { ... }")
            .field("streaming_element", &"StreamingElement { ... }")
            .field(
                "http_client",
                &self.http_client.as_ref().map(|_| "HttpClient { ... }"),
            )
            .field("grant_ttl", &self.grant_ttl)
            .field("event_buffer_size", &self.event_buffer_size)
            .field("status_channel_capacity", &self.status_channel_capacity)
            .field("sweep_max_age", &self.sweep_max_age)
            .field("sweep_max_total_bytes", &self.sweep_max_total_bytes)
            .field("catalog_base_url", &self.catalog_base_url)
            .finish()
    }
}

impl CoreConfig {
    /// Start building a configuration.
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }
}

/// Builder for [`CoreConfig`].
#[derive(Default)]
pub struct CoreConfigBuilder {
    permissions: Option<Arc<dyn PermissionBridge>>,
    content_resolver: Option<Arc<dyn ContentResolver>>,
    external_viewer: Option<Arc<dyn ExternalViewer>>,
    file_system: Option<Arc<dyn FileSystemAccess>>,
    native_engine: Option<Arc<dyn NativeMediaEngine>>,
    streaming_element: Option<Arc<dyn StreamingElement>>,
    http_client: Option<Arc<dyn HttpClient>>,
    clock: Option<Arc<dyn Clock>>,
    grant_ttl: Option<Duration>,
    event_buffer_size: Option<usize>,
    status_channel_capacity: Option<usize>,
    sweep_max_age: Option<Duration>,
    sweep_max_total_bytes: Option<u64>,
    catalog_base_url: Option<String>,
}

impl CoreConfigBuilder {
    pub fn permissions(mut self, bridge: Arc<dyn PermissionBridge>) -> Self {
        self.permissions = Some(bridge);
        self
    }

    pub fn content_resolver(mut self, bridge: Arc<dyn ContentResolver>) -> Self {
        self.content_resolver = Some(bridge);
        self
    }

    pub fn external_viewer(mut self, bridge: Arc<dyn ExternalViewer>) -> Self {
        self.external_viewer = Some(bridge);
        self
    }

    pub fn file_system(mut self, bridge: Arc<dyn FileSystemAccess>) -> Self {
        self.file_system = Some(bridge);
        self
    }

    pub fn native_engine(mut self, bridge: Arc<dyn NativeMediaEngine>) -> Self {
        self.native_engine = Some(bridge);
        self
    }

    pub fn streaming_element(mut self, bridge: Arc<dyn StreamingElement>) -> Self {
        self.streaming_element = Some(bridge);
        self
    }

    pub fn http_client(mut self, bridge: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(bridge);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn grant_ttl(mut self, ttl: Duration) -> Self {
        self.grant_ttl = Some(ttl);
        self
    }

    pub fn event_buffer_size(mut self, size: usize) -> Self {
        self.event_buffer_size = Some(size);
        self
    }

    pub fn status_channel_capacity(mut self, capacity: usize) -> Self {
        self.status_channel_capacity = Some(capacity);
        self
    }

    pub fn sweep_max_age(mut self, age: Duration) -> Self {
        self.sweep_max_age = Some(age);
        self
    }

    pub fn sweep_max_total_bytes(mut self, bytes: u64) -> Self {
        self.sweep_max_total_bytes = Some(bytes);
        self
    }

    pub fn catalog_base_url(mut self, url: impl Into<String>) -> Self {
        self.catalog_base_url = Some(url.into());
        self
    }

    /// Validate and build the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapabilityMissing`] naming the first absent required
    /// bridge, or [`Error::Config`] for invalid tunables.
    pub fn build(self) -> Result<CoreConfig> {
        let permissions = self.permissions.ok_or_else(|| missing(
            "PermissionBridge",
            "No permission bridge provided. Mobile: inject the platform permission adapter. \
             Desktop: use bridge_desktop::DesktopPermissions.",
        ))?;

        let content_resolver = self.content_resolver.ok_or_else(|| missing(
            "ContentResolver",
            "No content resolver provided. Mobile: inject the platform content adapter. \
             Desktop: use bridge_desktop::DesktopContentResolver.",
        ))?;

        let external_viewer = self.external_viewer.ok_or_else(|| missing(
            "ExternalViewer",
            "No external viewer provided. Mobile: inject the platform file-opener adapter. \
             Desktop: use bridge_desktop::ShellViewer.",
        ))?;

        let file_system = self.file_system.ok_or_else(|| missing(
            "FileSystemAccess",
            "No file system implementation provided. \
             Desktop: use bridge_desktop::TokioFileSystem.",
        ))?;

        let native_engine = self.native_engine.ok_or_else(|| missing(
            "NativeMediaEngine",
            "No native media engine provided. Inject the platform's native decoder adapter.",
        ))?;

        let streaming_element = self.streaming_element.ok_or_else(|| missing(
            "StreamingElement",
            "No streaming element provided. Inject the platform's streaming audio adapter.",
        ))?;

        let event_buffer_size = self.event_buffer_size.unwrap_or(DEFAULT_EVENT_BUFFER_SIZE);
        if event_buffer_size == 0 {
            return Err(Error::Config("event_buffer_size must be non-zero".into()));
        }

        let status_channel_capacity = self
            .status_channel_capacity
            .unwrap_or(DEFAULT_STATUS_CHANNEL_CAPACITY);
        if status_channel_capacity == 0 {
            return Err(Error::Config(
                "status_channel_capacity must be non-zero".into(),
            ));
        }

        Ok(CoreConfig {
            permissions,
            content_resolver,
            external_viewer,
            file_system,
            native_engine,
            streaming_element,
            http_client: self.http_client,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            grant_ttl: self.grant_ttl.unwrap_or(DEFAULT_GRANT_TTL),
            event_buffer_size,
            status_channel_capacity,
            sweep_max_age: self.sweep_max_age.unwrap_or(DEFAULT_SWEEP_MAX_AGE),
            sweep_max_total_bytes: self
                .sweep_max_total_bytes
                .unwrap_or(DEFAULT_SWEEP_MAX_TOTAL_BYTES),
            catalog_base_url: self
                .catalog_base_url
                .unwrap_or_else(|| DEFAULT_CATALOG_BASE_URL.to_string()),
        })
    }
}

fn missing(capability: &str, message: &str) -> Error {
    Error::CapabilityMissing {
        capability: capability.to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_without_bridges_names_the_missing_capability() {
        let err = CoreConfig::builder().build().unwrap_err();
        match err {
            Error::CapabilityMissing { capability, .. } => {
                assert_eq!(capability, "PermissionBridge");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
