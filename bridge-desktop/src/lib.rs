//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop platforms
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! This crate provides production-ready implementations of the bridge
//! traits that have a sensible desktop form:
//! - `HttpClient` using `reqwest`
//! - `FileSystemAccess` using `tokio::fs`
//! - `PermissionBridge` answering granted (desktop file access is implicit)
//! - `ContentResolver` mapping `file://` URIs and bare paths
//! - `ExternalViewer` shelling out to the platform opener
//!
//! The media engine traits (`NativeMediaEngine`, `StreamingElement`) have
//! no desktop default here; hosts wire their own audio stack.
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{ReqwestHttpClient, TokioFileSystem};
//! use bridge_traits::{HttpClient, FileSystemAccess};
//!
//! #[tokio::main]
//! async fn main() {
//!     let http_client = ReqwestHttpClient::new();
//!     let fs = TokioFileSystem::new();
//!
//!     // Use in core configuration
//! }
//! ```

mod content;
mod filesystem;
mod http;
mod permissions;

pub use content::{DesktopContentResolver, ShellViewer};
pub use filesystem::TokioFileSystem;
pub use http::ReqwestHttpClient;
pub use permissions::DesktopPermissions;
