//! Catalog track models and the wire shapes they are decoded from.
//!
//! The catalog service nests artist and album objects inside each track;
//! the wire structs mirror that shape and flatten into [`Track`] at the
//! crate boundary.

use serde::{Deserialize, Serialize};

/// A catalog track as exposed to the rest of the system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub album_art_url: Option<String>,
    /// Streamable preview URL. May be absent for tracks without previews.
    pub preview_url: Option<String>,
}

impl Track {
    /// Whether this track can actually be played.
    pub fn has_preview(&self) -> bool {
        self.preview_url.as_deref().is_some_and(|url| !url.is_empty())
    }
}

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub data: Vec<WireTrack>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PlaylistResponse {
    pub tracks: PlaylistTracks,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PlaylistTracks {
    #[serde(default)]
    pub data: Vec<WireTrack>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireTrack {
    pub id: serde_json::Value,
    pub title: String,
    pub artist: Option<WireArtist>,
    pub album: Option<WireAlbum>,
    pub preview: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireArtist {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireAlbum {
    pub cover_medium: Option<String>,
}

impl From<WireTrack> for Track {
    fn from(wire: WireTrack) -> Self {
        // Track ids arrive as numbers; normalize to strings.
        let id = match wire.id {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        };
        Track {
            id,
            title: wire.title,
            artist: wire
                .artist
                .map(|a| a.name)
                .unwrap_or_else(|| "Unknown Artist".to_string()),
            album_art_url: wire.album.and_then(|a| a.cover_medium),
            preview_url: wire.preview.filter(|p| !p.is_empty()),
        }
    }
}
