//! # Track Representations
//!
//! The session's current track is a tagged union over the two track
//! shapes the system knows: locally stored tracks and remote catalog
//! tracks. Display accessors are computed by exhaustive matching so no
//! caller ever probes the underlying shape structurally.

use serde::{Deserialize, Serialize};

/// A track stored on (or picked from) the local device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalTrack {
    pub title: String,
    pub artist: String,
    /// Bundled or extracted artwork location, when known.
    pub album_art: Option<String>,
    /// Path, `file://` URI, or opaque handle for the audio itself.
    pub uri: String,
}

/// A track from the remote catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteTrack {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub album_art_url: Option<String>,
    /// Streamable preview URL; playback uses this.
    pub preview_url: String,
}

/// The session's current-track union.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionTrack {
    Local(LocalTrack),
    Remote(RemoteTrack),
}

impl SessionTrack {
    /// Display title, independent of the underlying shape.
    pub fn title(&self) -> &str {
        match self {
            SessionTrack::Local(track) => &track.title,
            SessionTrack::Remote(track) => &track.title,
        }
    }

    /// Display artist, independent of the underlying shape.
    pub fn artist(&self) -> &str {
        match self {
            SessionTrack::Local(track) => &track.artist,
            SessionTrack::Remote(track) => &track.artist,
        }
    }

    /// The reference string playback should be started from.
    pub fn source_uri(&self) -> &str {
        match self {
            SessionTrack::Local(track) => &track.uri,
            SessionTrack::Remote(track) => &track.preview_url,
        }
    }
}
