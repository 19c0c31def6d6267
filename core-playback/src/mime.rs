//! # MIME Inference
//!
//! Derives a MIME type from a reference's lowercase file extension using a
//! fixed table. Absent or unrecognized extensions fall back to the generic
//! audio default; inference never fails and is never surfaced as an error.

use crate::source::SourceReference;

/// Default MIME type when the extension is absent or unrecognized.
pub const DEFAULT_AUDIO_MIME: &str = "audio/mpeg";

/// Map a lowercase extension to its audio MIME type.
pub fn mime_for_extension(extension: &str) -> Option<&'static str> {
    match extension {
        "mp3" => Some("audio/mpeg"),
        "wav" => Some("audio/wav"),
        "ogg" => Some("audio/ogg"),
        "aac" => Some("audio/aac"),
        "flac" => Some("audio/flac"),
        "m4a" => Some("audio/mp4"),
        "opus" => Some("audio/opus"),
        _ => None,
    }
}

/// Infer the MIME type for a source reference.
pub fn infer_mime(source: &SourceReference) -> &'static str {
    source
        .extension()
        .as_deref()
        .and_then(mime_for_extension)
        .unwrap_or(DEFAULT_AUDIO_MIME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_extensions_map() {
        assert_eq!(
            infer_mime(&SourceReference::new("/a/track.mp3")),
            "audio/mpeg"
        );
        assert_eq!(
            infer_mime(&SourceReference::new("/a/track.FLAC")),
            "audio/flac"
        );
        assert_eq!(
            infer_mime(&SourceReference::new("/a/track.m4a")),
            "audio/mp4"
        );
        assert_eq!(
            infer_mime(&SourceReference::new("/a/track.wav")),
            "audio/wav"
        );
    }

    #[test]
    fn missing_or_unknown_extension_defaults() {
        assert_eq!(
            infer_mime(&SourceReference::new("content://media/7")),
            DEFAULT_AUDIO_MIME
        );
        assert_eq!(
            infer_mime(&SourceReference::new("/a/track.xyz")),
            DEFAULT_AUDIO_MIME
        );
        assert_eq!(
            infer_mime(&SourceReference::new("/a/track")),
            DEFAULT_AUDIO_MIME
        );
    }
}
