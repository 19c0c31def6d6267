//! # Source References
//!
//! A [`SourceReference`] is the immutable value created at the start of
//! every play request: the raw reference string plus its derived
//! [`SourceKind`]. Classification is a pure, total prefix match with no
//! I/O and no failure mode; anything that is not recognizably an opaque
//! handle or a URL is treated as a local path, the conservative default.

use serde::{Deserialize, Serialize};

/// Scheme prefix marking platform-issued opaque content handles.
const OPAQUE_HANDLE_PREFIX: &str = "content://";

/// What kind of audio source a reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// A filesystem path (or `file://` URI) readable by generic file APIs.
    LocalPath,
    /// A platform-issued handle requiring platform-specific resolution.
    OpaqueHandle,
    /// An `http(s)://` URL to be streamed.
    RemoteUrl,
}

/// Immutable reference to an audio source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceReference {
    raw: String,
    kind: SourceKind,
}

impl SourceReference {
    /// Classify a raw reference string. Never fails; unrecognized schemes
    /// default to [`SourceKind::LocalPath`].
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let kind = classify(&raw);
        Self { raw, kind }
    }

    /// The raw reference string as provided by the caller.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The derived source kind.
    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    /// The URI scheme in lowercase, when the reference has one.
    pub fn scheme(&self) -> Option<String> {
        let (scheme, rest) = self.raw.split_once("://")?;
        if scheme.is_empty() || rest.is_empty() {
            return None;
        }
        Some(scheme.to_ascii_lowercase())
    }

    /// The lowercase extension of the reference's final path segment.
    pub fn extension(&self) -> Option<String> {
        let tail = self
            .raw
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(self.raw.as_str());
        // Strip query/fragment noise from URLs before looking for a dot.
        let tail = tail.split(['?', '#']).next().unwrap_or(tail);
        let (stem, ext) = tail.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }
}

impl std::fmt::Display for SourceReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Pure classification of a raw reference string.
fn classify(raw: &str) -> SourceKind {
    if raw.starts_with(OPAQUE_HANDLE_PREFIX) {
        SourceKind::OpaqueHandle
    } else if raw.starts_with("http://") || raw.starts_with("https://") {
        SourceKind::RemoteUrl
    } else {
        SourceKind::LocalPath
    }
}
