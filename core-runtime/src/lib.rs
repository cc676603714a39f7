//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the device abstraction layer:
//! - Logging and tracing infrastructure
//! - Player configuration management
//! - Synchronous event channels and the async event bus
//!
//! ## Overview
//!
//! This crate contains the runtime utilities that the playback core and the
//! service facade depend on. It establishes the logging conventions, the
//! fail-fast configuration rules, and the event delivery mechanisms used
//! throughout the system.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use config::{BackendKind, PlayerConfig, PlayerConfigBuilder, PlayerSettings};
pub use error::{Error, Result};
