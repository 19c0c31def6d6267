//! Platform Capability Tiers
//!
//! Modern platform releases expose a narrow audio-media read permission;
//! older releases only have the broad storage permissions. The tier is
//! derived from the host's release string, and anything that cannot be
//! parsed is treated as legacy so the broader (always valid) permissions
//! are requested.

use bridge_traits::PermissionId;

/// First platform release with the narrow media-read permission.
const MODERN_TIER_MIN_RELEASE: u32 = 13;

/// Permission capability tier of the host platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionTier {
    /// Release >= 13: narrow per-media-type read permissions.
    Modern,
    /// Older, unknown, or unparsable release: broad storage permissions.
    Legacy,
}

impl PermissionTier {
    /// Detect the tier from a platform release string (e.g. `"13"`,
    /// `"13.1"`, `"9.0.1"`). Missing or unparsable input falls back to
    /// [`PermissionTier::Legacy`].
    pub fn detect(release: Option<&str>) -> Self {
        let Some(release) = release else {
            return PermissionTier::Legacy;
        };

        match parse_major(release) {
            Some(major) if major >= MODERN_TIER_MIN_RELEASE => PermissionTier::Modern,
            Some(_) => PermissionTier::Legacy,
            None => PermissionTier::Legacy,
        }
    }

    /// The sub-permissions this tier requires for reading arbitrary local
    /// audio sources. All of them must be granted for access to count.
    pub fn required_permissions(&self) -> &'static [PermissionId] {
        match self {
            PermissionTier::Modern => &[PermissionId::ReadMediaAudio],
            PermissionTier::Legacy => &[
                PermissionId::ReadExternalStorage,
                PermissionId::WriteExternalStorage,
            ],
        }
    }
}

/// Extract the leading major version from a release string.
fn parse_major(release: &str) -> Option<u32> {
    let trimmed = release.trim();
    let digits: String = trimmed.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}
