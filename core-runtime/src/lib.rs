//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the audio core:
//! - Logging and tracing infrastructure
//! - Configuration management with fail-fast capability validation
//! - Event bus system and session snapshots
//!
//! ## Overview
//!
//! This crate contains the runtime utilities the other core modules depend
//! on. It establishes the logging conventions, configuration surface, and
//! event broadcasting mechanisms used throughout the system.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use error::{Error, Result};
