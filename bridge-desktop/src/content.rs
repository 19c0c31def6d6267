//! Content Resolution and External Viewer for Desktop
//!
//! Desktop platforms have no opaque content handles: references are plain
//! paths or `file://` URIs. The resolver maps those onto filesystem paths
//! and reads them with `tokio::fs`; anything genuinely opaque (a
//! `content://` handle from a mobile picker) is not resolvable here.
//!
//! The viewer shells out to the platform opener (`open`, `xdg-open`,
//! `cmd /C start`), which launches the user's default audio application.

use async_trait::async_trait;
use bridge_traits::{
    content::{ContentResolver, ExternalViewer},
    error::{BridgeError, Result},
};
use bytes::Bytes;
use std::path::PathBuf;
use tokio::process::Command;
use tracing::{debug, info};

/// Path-based content resolver for desktop platforms.
#[derive(Debug, Clone, Default)]
pub struct DesktopContentResolver;

impl DesktopContentResolver {
    pub fn new() -> Self {
        Self
    }

    fn to_path(handle: &str) -> Result<PathBuf> {
        if let Some(stripped) = handle.strip_prefix("file://") {
            return Ok(PathBuf::from(stripped));
        }
        if handle.contains("://") {
            return Err(BridgeError::NotAvailable(format!(
                "no desktop mapping for handle scheme: {handle}"
            )));
        }
        Ok(PathBuf::from(handle))
    }
}

#[async_trait]
impl ContentResolver for DesktopContentResolver {
    async fn resolve_native_path(&self, handle: &str) -> Result<PathBuf> {
        let path = Self::to_path(handle)?;
        debug!(handle, path = ?path, "Resolved desktop path");
        Ok(path)
    }

    async fn read_all(&self, handle: &str) -> Result<Bytes> {
        let path = Self::to_path(handle)?;
        let data = tokio::fs::read(&path).await.map_err(BridgeError::Io)?;
        debug!(path = ?path, size = data.len(), "Read content");
        Ok(Bytes::from(data))
    }
}

/// External viewer shelling out to the platform opener.
#[derive(Debug, Clone, Default)]
pub struct ShellViewer;

impl ShellViewer {
    pub fn new() -> Self {
        Self
    }

    fn opener(target: &str) -> Command {
        #[cfg(target_os = "macos")]
        {
            let mut cmd = Command::new("open");
            cmd.arg(target);
            cmd
        }
        #[cfg(target_os = "windows")]
        {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", "start", "", target]);
            cmd
        }
        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        {
            let mut cmd = Command::new("xdg-open");
            cmd.arg(target);
            cmd
        }
    }
}

#[async_trait]
impl ExternalViewer for ShellViewer {
    async fn open_with(&self, target: &str, mime_type: &str) -> Result<()> {
        info!(target, mime_type, "Opening with system default application");
        let status = Self::opener(target)
            .status()
            .await
            .map_err(|e| BridgeError::OperationFailed(format!("opener launch failed: {e}")))?;

        if status.success() {
            Ok(())
        } else {
            Err(BridgeError::OperationFailed(format!(
                "opener exited with status {status}"
            )))
        }
    }
}
