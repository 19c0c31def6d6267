//! Permission Bridge Implementation for Desktop
//!
//! Desktop processes read the filesystem under the user's own account, so
//! there is no runtime permission to acquire: every check and request
//! answers granted. No release version is reported, which keeps the core
//! on the conservative legacy permission tier.

use async_trait::async_trait;
use bridge_traits::{
    error::Result,
    permissions::{PermissionBridge, PermissionId},
};
use tracing::debug;

/// Always-granted permission bridge for desktop platforms.
#[derive(Debug, Clone, Default)]
pub struct DesktopPermissions;

impl DesktopPermissions {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PermissionBridge for DesktopPermissions {
    async fn check_permission(&self, id: PermissionId) -> Result<bool> {
        debug!(permission = %id, "Desktop permission check (implicitly granted)");
        Ok(true)
    }

    async fn request_permission(&self, id: PermissionId) -> Result<bool> {
        debug!(permission = %id, "Desktop permission request (implicitly granted)");
        Ok(true)
    }

    fn platform_release(&self) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn everything_is_granted() {
        let bridge = DesktopPermissions::new();
        assert!(bridge
            .check_permission(PermissionId::ReadMediaAudio)
            .await
            .unwrap());
        assert!(bridge
            .request_permission(PermissionId::ReadExternalStorage)
            .await
            .unwrap());
        assert_eq!(bridge.platform_release(), None);
    }
}
