//! # Host Bridge Traits
//!
//! Device abstraction traits that must be implemented by each television host.
//!
//! ## Overview
//!
//! This crate defines the contract between the playback core and
//! device-specific implementations. Each trait represents a capability that the
//! core requires but that must be implemented differently per host
//! (browser-class set-top boxes, native OS media stacks, broadcast tuners).
//!
//! ## Traits
//!
//! ### Playback Surfaces
//! - [`MediaElementAdapter`](element::MediaElementAdapter) - Create, attach,
//!   bind and detach native playback surfaces
//!
//! ### Utilities
//! - [`LoggerSink`](logging::LoggerSink) - Forward structured logs to host logging
//!
//! ## Host Requirements
//!
//! | Host                   | Implementation Crate | Status |
//! |------------------------|----------------------|--------|
//! | Desktop / headless dev | `bridge-desktop`     | ✅ Available |
//! | Browser-class STB      | TBD                  | 📋 Planned |
//! | Native OS media stack  | TBD                  | 📋 Planned |
//!
//! ## Fail-Fast Strategy
//!
//! The core fails fast with descriptive errors when a required capability is
//! missing:
//!
//! ```ignore
//! use core_runtime::error::Error;
//!
//! let adapter = config.element_adapter
//!     .ok_or_else(|| Error::CapabilityMissing {
//!         capability: "MediaElementAdapter".to_string(),
//!         message: "No media element adapter provided. \
//!                   Desktop: enable the 'desktop-shims' feature. \
//!                   Devices: inject the host's native adapter.".to_string()
//!     })?;
//! ```
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type. Host
//! implementations should convert platform-specific errors to `BridgeError`
//! and include the element handle or URL that failed.
//!
//! ## Thread Safety
//!
//! Bridge traits require `Send + Sync` on native targets (see
//! [`platform`]) so hardware callback trampolines can share them. On `wasm32`
//! the bounds are dropped.

pub mod device;
pub mod element;
pub mod error;
pub mod logging;
pub mod platform;

pub use device::DeviceId;
pub use error::BridgeError;

// Re-export commonly used types
pub use element::{ElementHandle, ElementParent, ElementRole, MediaElementAdapter, MediaType};
pub use logging::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
