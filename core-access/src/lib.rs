//! # Access Module
//!
//! Permission gate for local audio access.
//!
//! ## Overview
//!
//! This module decides whether the process may read arbitrary local audio
//! sources. It detects the platform's permission capability tier, checks
//! and requests the tier's sub-permissions through the host
//! [`PermissionBridge`](bridge_traits::PermissionBridge), and caches the
//! combined outcome under a TTL so play requests do not prompt the user
//! repeatedly.
//!
//! ## Features
//!
//! - Platform-release tier detection with a legacy fallback
//! - Check-before-request sequencing to minimize prompts
//! - TTL-bounded caching of granted *and* denied outcomes

pub mod error;
pub mod gate;
pub mod tier;

pub use error::{AccessError, Result};
pub use gate::{PermissionGate, PermissionGrant, GRANT_TTL};
pub use tier::PermissionTier;
