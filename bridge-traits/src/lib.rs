//! # Host Bridge Traits
//!
//! Platform abstraction traits that must be implemented by each host platform.
//!
//! ## Overview
//!
//! This crate defines the contract between the audio core and platform-specific
//! implementations. Each trait represents a capability that the core requires but
//! that must be implemented differently per platform (desktop, iOS, Android).
//!
//! ## Traits
//!
//! ### Permissions & Content
//! - [`PermissionBridge`](permissions::PermissionBridge) - Runtime permission check/request
//! - [`ContentResolver`](content::ContentResolver) - Opaque-handle path resolution and reads
//! - [`ExternalViewer`](content::ExternalViewer) - Hand a reference to the system viewer
//!
//! ### Media Engines
//! - [`NativeMediaEngine`](media::NativeMediaEngine) - Platform native-decoder handles
//! - [`StreamingElement`](media::StreamingElement) - Streaming audio element (HTML5-audio analog)
//!
//! ### Networking & I/O
//! - [`HttpClient`](http::HttpClient) - Async HTTP operations with retry and TLS
//! - [`FileSystemAccess`](storage::FileSystemAccess) - File I/O and cache directories
//!
//! ### Utilities
//! - [`Clock`](time::Clock) - Time source for deterministic testing
//!
//! ## Fail-Fast Strategy
//!
//! The core fails fast with descriptive errors when a required capability is
//! missing; see `core-runtime`'s configuration builder.
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type for
//! consistent error handling. Platform implementations should:
//!
//! - Convert platform-specific errors to `BridgeError`
//! - Provide actionable error messages
//! - Include error context (e.g., file paths, permission ids)
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` bounds to support safe concurrent
//! usage across async tasks. Implementations must ensure thread safety.

pub mod content;
pub mod error;
pub mod http;
pub mod media;
pub mod permissions;
pub mod storage;
pub mod time;

pub use error::BridgeError;

// Re-export commonly used types
pub use content::{ContentResolver, ExternalViewer};
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy};
pub use media::{
    NativeMediaEngine, NativeMediaHandle, NativeMediaStatus, StreamingElement, StreamingErrorCode,
    StreamingEvent, StreamingHandle,
};
pub use permissions::{PermissionBridge, PermissionId};
pub use storage::{FileMetadata, FileSystemAccess};
pub use time::{Clock, SystemClock};
