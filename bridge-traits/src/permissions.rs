//! Permission Primitives
//!
//! Abstracts the host platform's runtime-permission system. The core never
//! talks to a permission API directly; it asks the host to check or request
//! individual permission ids and combines the answers itself.
//!
//! Hosts back these calls with whatever their platform offers:
//! - **Android**: `checkSelfPermission` / `requestPermissions`
//! - **iOS**: media-library authorization status / request
//! - **Desktop**: typically a static "granted" answer

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Identifier for a single platform permission.
///
/// The set is deliberately small: only the permissions the audio core ever
/// asks for. Hosts map each variant onto the concrete platform identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionId {
    /// Narrow audio-media read permission on modern platform releases.
    ReadMediaAudio,
    /// Broad storage read permission on legacy platform releases.
    ReadExternalStorage,
    /// Broad storage write permission on legacy platform releases.
    WriteExternalStorage,
}

impl PermissionId {
    /// Stable string form used in logs and host mappings.
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionId::ReadMediaAudio => "read_media_audio",
            PermissionId::ReadExternalStorage => "read_external_storage",
            PermissionId::WriteExternalStorage => "write_external_storage",
        }
    }
}

impl std::fmt::Display for PermissionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Host-provided permission primitive.
///
/// `check_permission` must never show UI; `request_permission` may prompt
/// the user and resolves once the prompt is answered. Both return the
/// resulting granted state for the id.
#[async_trait]
pub trait PermissionBridge: Send + Sync {
    /// Query the current granted state of a permission without prompting.
    async fn check_permission(&self, id: PermissionId) -> Result<bool>;

    /// Request a permission, prompting the user if the platform requires it.
    async fn request_permission(&self, id: PermissionId) -> Result<bool>;

    /// The platform release string used for capability-tier detection
    /// (e.g. `"13"` or `"13.1"` on Android). `None` when the host has no
    /// meaningful release version.
    fn platform_release(&self) -> Option<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_id_display() {
        assert_eq!(PermissionId::ReadMediaAudio.to_string(), "read_media_audio");
        assert_eq!(
            PermissionId::ReadExternalStorage.as_str(),
            "read_external_storage"
        );
    }
}
