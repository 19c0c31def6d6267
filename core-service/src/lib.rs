//! Core service façade and bootstrap helpers.
//!
//! This crate wires host-provided bridge implementations (permissions,
//! content resolution, viewer, filesystem, media engines, HTTP) into the
//! playback core. Desktop apps typically enable the `desktop-shims`
//! feature (which depends on `bridge-desktop`) and only inject their two
//! media engines; mobile hosts inject every bridge explicitly.

pub mod error;

pub use error::{CoreError, Result};

use core_access::PermissionGate;
use core_catalog::CatalogClient;
use core_playback::{
    BridgeBackendFactory, HandleResolver, PlaybackSession, SweepConfig, SweepOutcome,
    TempCacheSweeper,
};
use core_runtime::config::CoreConfig;
use core_runtime::events::EventBus;
use std::sync::Arc;
use tracing::info;

/// Primary façade exposed to host applications.
///
/// Owns the one long-lived [`PlaybackSession`], the permission gate, the
/// optional catalog client, and the temp-cache sweeper, all wired from a
/// validated [`CoreConfig`].
#[derive(Clone)]
pub struct PlayerService {
    session: PlaybackSession,
    gate: Arc<PermissionGate>,
    catalog: Option<Arc<CatalogClient>>,
    sweeper: Arc<TempCacheSweeper>,
    events: EventBus,
}

impl PlayerService {
    /// Wire the core from a validated configuration.
    pub fn new(config: CoreConfig) -> Self {
        let events = EventBus::new(config.event_buffer_size);

        let gate = Arc::new(PermissionGate::with_ttl(
            config.permissions.clone(),
            config.clock.clone(),
            config.grant_ttl,
        ));

        let resolver = HandleResolver::new(
            config.content_resolver.clone(),
            config.external_viewer.clone(),
            config.file_system.clone(),
            config.clock.clone(),
        );

        let factory = Arc::new(BridgeBackendFactory::new(
            config.native_engine.clone(),
            config.streaming_element.clone(),
            config.external_viewer.clone(),
            config.status_channel_capacity,
        ));

        let session = PlaybackSession::new(gate.clone(), resolver, factory, events.clone());

        let catalog = config
            .http_client
            .clone()
            .map(|http| Arc::new(CatalogClient::new(http, config.catalog_base_url.clone())));

        let sweeper = Arc::new(TempCacheSweeper::new(
            config.file_system.clone(),
            config.clock.clone(),
            SweepConfig {
                max_age: config.sweep_max_age,
                max_total_bytes: config.sweep_max_total_bytes,
            },
        ));

        info!(catalog = catalog.is_some(), "Player service wired");

        Self {
            session,
            gate,
            catalog,
            sweeper,
            events,
        }
    }

    /// The single authoritative playback session.
    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    /// The permission gate, for hosts that pre-warm the grant on startup.
    pub fn permission_gate(&self) -> &Arc<PermissionGate> {
        &self.gate
    }

    /// The catalog client, when an HTTP client was configured.
    pub fn catalog(&self) -> Option<&Arc<CatalogClient>> {
        self.catalog.as_ref()
    }

    /// The event bus carrying session snapshots.
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Run one best-effort temp-cache sweep.
    pub async fn sweep_cache(&self) -> Result<SweepOutcome> {
        Ok(self.sweeper.sweep().await?)
    }

    /// Release playback resources at process teardown.
    pub async fn shutdown(&self) {
        self.session.shutdown().await;
    }
}

/// Convenience bootstrapper for desktop hosts.
///
/// Fills every bridge that has a desktop shim; the host supplies only its
/// two media engines.
#[cfg(feature = "desktop-shims")]
pub fn bootstrap_desktop(
    native_engine: Arc<dyn bridge_traits::NativeMediaEngine>,
    streaming_element: Arc<dyn bridge_traits::StreamingElement>,
) -> Result<PlayerService> {
    use bridge_desktop::{
        DesktopContentResolver, DesktopPermissions, ReqwestHttpClient, ShellViewer,
        TokioFileSystem,
    };

    let config = CoreConfig::builder()
        .permissions(Arc::new(DesktopPermissions::new()))
        .content_resolver(Arc::new(DesktopContentResolver::new()))
        .external_viewer(Arc::new(ShellViewer::new()))
        .file_system(Arc::new(TokioFileSystem::new()))
        .http_client(Arc::new(ReqwestHttpClient::new()))
        .native_engine(native_engine)
        .streaming_element(streaming_element)
        .build()?;

    Ok(PlayerService::new(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::error::Result as BridgeResult;
    use bridge_traits::{
        ContentResolver, ExternalViewer, FileSystemAccess, NativeMediaEngine, NativeMediaHandle,
        PermissionBridge, PermissionId, StreamingElement, StreamingHandle,
    };
    use bytes::Bytes;
    use std::path::{Path, PathBuf};

    struct StubPermissions;

    #[async_trait]
    impl PermissionBridge for StubPermissions {
        async fn check_permission(&self, _id: PermissionId) -> BridgeResult<bool> {
            Ok(true)
        }
        async fn request_permission(&self, _id: PermissionId) -> BridgeResult<bool> {
            Ok(true)
        }
        fn platform_release(&self) -> Option<String> {
            None
        }
    }

    struct StubContent;

    #[async_trait]
    impl ContentResolver for StubContent {
        async fn resolve_native_path(&self, handle: &str) -> BridgeResult<PathBuf> {
            Ok(PathBuf::from(handle))
        }
        async fn read_all(&self, _handle: &str) -> BridgeResult<Bytes> {
            Ok(Bytes::new())
        }
    }

    struct StubViewer;

    #[async_trait]
    impl ExternalViewer for StubViewer {
        async fn open_with(&self, _target: &str, _mime: &str) -> BridgeResult<()> {
            Ok(())
        }
    }

    struct StubFs;

    #[async_trait]
    impl FileSystemAccess for StubFs {
        async fn get_cache_directory(&self) -> BridgeResult<PathBuf> {
            Ok(PathBuf::from("/tmp"))
        }
        async fn exists(&self, _path: &Path) -> BridgeResult<bool> {
            Ok(false)
        }
        async fn metadata(
            &self,
            _path: &Path,
        ) -> BridgeResult<bridge_traits::storage::FileMetadata> {
            Err(bridge_traits::BridgeError::NotAvailable("stub".into()))
        }
        async fn create_dir_all(&self, _path: &Path) -> BridgeResult<()> {
            Ok(())
        }
        async fn read_file(&self, _path: &Path) -> BridgeResult<Bytes> {
            Ok(Bytes::new())
        }
        async fn write_file(&self, _path: &Path, _data: Bytes) -> BridgeResult<()> {
            Ok(())
        }
        async fn rename(&self, _from: &Path, _to: &Path) -> BridgeResult<()> {
            Ok(())
        }
        async fn delete_file(&self, _path: &Path) -> BridgeResult<()> {
            Ok(())
        }
        async fn list_directory(&self, _path: &Path) -> BridgeResult<Vec<PathBuf>> {
            Ok(Vec::new())
        }
        async fn open_read_stream(
            &self,
            _path: &Path,
        ) -> BridgeResult<Box<dyn tokio::io::AsyncRead + Send + Unpin>> {
            Ok(Box::new(tokio::io::empty()))
        }
    }

    struct StubEngine;

    #[async_trait]
    impl NativeMediaEngine for StubEngine {
        async fn create(&self, _uri: &str) -> BridgeResult<Box<dyn NativeMediaHandle>> {
            Err(bridge_traits::BridgeError::NotAvailable("stub".into()))
        }
    }

    struct StubElement;

    #[async_trait]
    impl StreamingElement for StubElement {
        async fn open(&self, _url: &str) -> BridgeResult<Box<dyn StreamingHandle>> {
            Err(bridge_traits::BridgeError::NotAvailable("stub".into()))
        }
    }

    #[tokio::test]
    async fn wires_without_http_client_and_disables_catalog() {
        let config = CoreConfig::builder()
            .permissions(Arc::new(StubPermissions))
            .content_resolver(Arc::new(StubContent))
            .external_viewer(Arc::new(StubViewer))
            .file_system(Arc::new(StubFs))
            .native_engine(Arc::new(StubEngine))
            .streaming_element(Arc::new(StubElement))
            .build()
            .unwrap();

        let service = PlayerService::new(config);
        assert!(service.catalog().is_none());

        let snapshot = service.session().snapshot().await;
        assert_eq!(
            snapshot.phase,
            core_runtime::events::SessionPhase::Idle
        );

        // Sweeping an empty cache dir succeeds and deletes nothing.
        let outcome = service.sweep_cache().await.unwrap();
        assert_eq!(outcome.deleted, 0);

        service.shutdown().await;
    }
}
