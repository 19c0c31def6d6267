//! # Catalog Module
//!
//! Remote track catalog lookups.
//!
//! ## Overview
//!
//! A thin, keyed HTTP interface over the catalog service: free-text track
//! search and playlist listing, both returning [`Track`] models. The
//! module owns no state beyond the configured base URL; all transport
//! goes through the injected [`HttpClient`](bridge_traits::HttpClient)
//! bridge, and every failure mode collapses into one generic
//! "fetch failed" error for callers to present.

pub mod client;
pub mod error;
pub mod models;

pub use client::CatalogClient;
pub use error::{CatalogError, Result};
pub use models::Track;
