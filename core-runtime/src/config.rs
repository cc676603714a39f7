//! # Player Configuration Module
//!
//! Provides configuration management for a device's playback session.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a
//! [`PlayerConfig`] that holds the host bridges and settings the playback core
//! needs. It enforces fail-fast validation so that a device never starts with a
//! backend whose surface adapter is missing.
//!
//! ## Required Dependencies
//!
//! - `device_id` - Identity the session is registered under
//! - `MediaElementAdapter` - Required by the embedded and native backends
//!
//! When the `desktop-shims` feature is enabled, the headless element tree from
//! `bridge-desktop` is injected automatically if no adapter is provided.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::{BackendKind, PlayerConfig};
//! use std::sync::Arc;
//!
//! let config = PlayerConfig::builder()
//!     .device_id("living-room-stb")
//!     .backend(BackendKind::Embedded)
//!     .element_adapter(Arc::new(MyVideoElementAdapter::new()))
//!     .forward_to_event_bus(true)
//!     .build()
//!     .expect("Failed to build config");
//! ```
//!
//! ### Settings Files
//!
//! Non-bridge settings can be loaded from JSON through [`PlayerSettings`]:
//!
//! ```rust
//! use core_runtime::config::{BackendKind, PlayerSettings};
//!
//! let settings: PlayerSettings =
//!     serde_json::from_str(r#"{ "device_id": "tuner-1", "backend": "broadcast" }"#).unwrap();
//! assert_eq!(settings.backend, BackendKind::Broadcast);
//! assert_eq!(settings.event_bus_capacity, 100);
//! ```

use crate::error::{Error, Result};
use crate::events::DEFAULT_EVENT_BUFFER_SIZE;
use crate::logging::LoggingConfig;
use bridge_traits::{DeviceId, MediaElementAdapter};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Upper bound for the async event bus buffer.
pub const MAX_EVENT_BUS_CAPACITY: usize = 10_000;

/// Which device backend drives the playback session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Embedded media element prepended to the document body.
    #[default]
    Embedded,
    /// Proprietary native player rendering on the hardware video plane.
    Native,
    /// Broadcast-only device with no media surface of its own.
    Broadcast,
}

impl BackendKind {
    /// Returns `true` if the backend needs a [`MediaElementAdapter`].
    pub fn requires_element_adapter(&self) -> bool {
        matches!(self, BackendKind::Embedded | BackendKind::Native)
    }
}

/// Serializable, bridge-free part of the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSettings {
    pub device_id: DeviceId,

    #[serde(default)]
    pub backend: BackendKind,

    #[serde(default = "default_event_bus_capacity")]
    pub event_bus_capacity: usize,

    #[serde(default)]
    pub forward_to_event_bus: bool,
}

fn default_event_bus_capacity() -> usize {
    DEFAULT_EVENT_BUFFER_SIZE
}

/// Configuration for one device's playback session.
///
/// Use [`PlayerConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct PlayerConfig {
    /// Device the session is registered under
    pub device_id: DeviceId,

    /// Backend variant that implements the playback contract
    pub backend: BackendKind,

    /// Host surface adapter (required for embedded and native backends)
    pub element_adapter: Option<Arc<dyn MediaElementAdapter>>,

    /// Buffer size of the async event bus
    pub event_bus_capacity: usize,

    /// Mirror every session event onto an async event bus
    pub forward_to_event_bus: bool,

    /// Logging setup applied at bootstrap, if any
    pub logging: Option<LoggingConfig>,
}

impl std::fmt::Debug for PlayerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerConfig")
            .field("device_id", &self.device_id)
            .field("backend", &self.backend)
            .field(
                "element_adapter",
                &self
                    .element_adapter
                    .as_ref()
                    .map(|_| "MediaElementAdapter { ... }"),
            )
            .field("event_bus_capacity", &self.event_bus_capacity)
            .field("forward_to_event_bus", &self.forward_to_event_bus)
            .field("logging", &self.logging.as_ref().map(|c| c.format))
            .finish()
    }
}

impl PlayerConfig {
    /// Creates a new builder for constructing a `PlayerConfig`.
    pub fn builder() -> PlayerConfigBuilder {
        PlayerConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Device id is not empty
    /// - Event bus capacity is within `1..=MAX_EVENT_BUS_CAPACITY`
    /// - The chosen backend has the bridges it needs
    pub fn validate(&self) -> Result<()> {
        if self.device_id.as_str().trim().is_empty() {
            return Err(Error::Config("Device id cannot be empty".to_string()));
        }

        if self.event_bus_capacity == 0 {
            return Err(Error::Config(
                "Event bus capacity must be greater than 0".to_string(),
            ));
        }

        if self.event_bus_capacity > MAX_EVENT_BUS_CAPACITY {
            return Err(Error::Config(format!(
                "Event bus capacity exceeds maximum of {}",
                MAX_EVENT_BUS_CAPACITY
            )));
        }

        if self.backend.requires_element_adapter() && self.element_adapter.is_none() {
            return Err(element_adapter_missing_error(self.backend));
        }

        Ok(())
    }
}

fn element_adapter_missing_error(backend: BackendKind) -> Error {
    Error::CapabilityMissing {
        capability: "MediaElementAdapter".to_string(),
        message: format!(
            "The {:?} backend needs a MediaElementAdapter to create playback surfaces. \
             Desktop: enable the 'desktop-shims' feature to use the headless element tree. \
             Devices: inject the host's native element adapter. \
             Broadcast-only devices: select BackendKind::Broadcast.",
            backend
        ),
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_element_adapter(
    backend: BackendKind,
) -> Result<Option<Arc<dyn MediaElementAdapter>>> {
    if !backend.requires_element_adapter() {
        return Ok(None);
    }
    Ok(Some(Arc::new(bridge_desktop::HeadlessElementTree::new())))
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_element_adapter(
    backend: BackendKind,
) -> Result<Option<Arc<dyn MediaElementAdapter>>> {
    if !backend.requires_element_adapter() {
        return Ok(None);
    }
    Err(element_adapter_missing_error(backend))
}

/// Builder for [`PlayerConfig`].
#[derive(Default)]
pub struct PlayerConfigBuilder {
    device_id: Option<DeviceId>,
    backend: BackendKind,
    element_adapter: Option<Arc<dyn MediaElementAdapter>>,
    event_bus_capacity: Option<usize>,
    forward_to_event_bus: bool,
    logging: Option<LoggingConfig>,
}

impl PlayerConfigBuilder {
    /// Starts a builder from deserialized settings.
    pub fn from_settings(settings: PlayerSettings) -> Self {
        Self {
            device_id: Some(settings.device_id),
            backend: settings.backend,
            event_bus_capacity: Some(settings.event_bus_capacity),
            forward_to_event_bus: settings.forward_to_event_bus,
            ..Self::default()
        }
    }

    /// Sets the device identity (required).
    pub fn device_id(mut self, id: impl Into<DeviceId>) -> Self {
        self.device_id = Some(id.into());
        self
    }

    /// Selects the backend variant. Defaults to [`BackendKind::Embedded`].
    pub fn backend(mut self, backend: BackendKind) -> Self {
        self.backend = backend;
        self
    }

    /// Injects the host surface adapter.
    pub fn element_adapter(mut self, adapter: Arc<dyn MediaElementAdapter>) -> Self {
        self.element_adapter = Some(adapter);
        self
    }

    /// Sets the async event bus buffer size.
    pub fn event_bus_capacity(mut self, capacity: usize) -> Self {
        self.event_bus_capacity = Some(capacity);
        self
    }

    /// Mirrors session events onto an async event bus.
    pub fn forward_to_event_bus(mut self, enabled: bool) -> Self {
        self.forward_to_event_bus = enabled;
        self
    }

    /// Applies this logging setup when the player is bootstrapped.
    pub fn logging(mut self, config: LoggingConfig) -> Self {
        self.logging = Some(config);
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if the device id is missing or a value is out of range
    /// - [`Error::CapabilityMissing`] if the backend needs an adapter and none
    ///   was provided (and no desktop default is available)
    pub fn build(self) -> Result<PlayerConfig> {
        let device_id = self
            .device_id
            .ok_or_else(|| Error::Config("Device id is required".to_string()))?;

        let element_adapter = match self.element_adapter {
            Some(adapter) => Some(adapter),
            None => provide_default_element_adapter(self.backend)?,
        };

        let config = PlayerConfig {
            device_id,
            backend: self.backend,
            element_adapter,
            event_bus_capacity: self
                .event_bus_capacity
                .unwrap_or(DEFAULT_EVENT_BUFFER_SIZE),
            forward_to_event_bus: self.forward_to_event_bus,
            logging: self.logging,
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::element::{ElementHandle, ElementParent, ElementRole, MediaType};
    use bridge_traits::error::Result as BridgeResult;

    struct NullAdapter;

    impl MediaElementAdapter for NullAdapter {
        fn create_element(&self, _: MediaType, _: ElementRole) -> BridgeResult<ElementHandle> {
            Ok(ElementHandle::new())
        }

        fn attach(&self, _: ElementHandle, _: ElementParent) -> BridgeResult<()> {
            Ok(())
        }

        fn detach(&self, _: ElementHandle) -> BridgeResult<()> {
            Ok(())
        }

        fn bind_source(&self, _: ElementHandle, _: &str, _: &str) -> BridgeResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_builder_requires_device_id() {
        let result = PlayerConfig::builder()
            .element_adapter(Arc::new(NullAdapter))
            .build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_builder_with_adapter() {
        let config = PlayerConfig::builder()
            .device_id("living-room")
            .backend(BackendKind::Native)
            .element_adapter(Arc::new(NullAdapter))
            .build()
            .unwrap();

        assert_eq!(config.device_id.as_str(), "living-room");
        assert_eq!(config.backend, BackendKind::Native);
        assert_eq!(config.event_bus_capacity, DEFAULT_EVENT_BUFFER_SIZE);
        assert!(!config.forward_to_event_bus);
        assert!(config.logging.is_none());
    }

    #[cfg(not(feature = "desktop-shims"))]
    #[test]
    fn test_builder_requires_adapter_for_embedded() {
        let result = PlayerConfig::builder().device_id("living-room").build();
        match result {
            Err(Error::CapabilityMissing { capability, .. }) => {
                assert_eq!(capability, "MediaElementAdapter");
            }
            other => panic!("expected CapabilityMissing, got {:?}", other),
        }
    }

    #[cfg(feature = "desktop-shims")]
    #[test]
    fn test_builder_uses_headless_adapter() {
        let config = PlayerConfig::builder()
            .device_id("living-room")
            .build()
            .unwrap();
        assert!(config.element_adapter.is_some());
    }

    #[test]
    fn test_broadcast_backend_needs_no_adapter() {
        let config = PlayerConfig::builder()
            .device_id("tuner")
            .backend(BackendKind::Broadcast)
            .build()
            .unwrap();
        assert!(config.element_adapter.is_none());
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let result = PlayerConfig::builder()
            .device_id("living-room")
            .element_adapter(Arc::new(NullAdapter))
            .event_bus_capacity(0)
            .build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_excessive_capacity() {
        let result = PlayerConfig::builder()
            .device_id("living-room")
            .element_adapter(Arc::new(NullAdapter))
            .event_bus_capacity(MAX_EVENT_BUS_CAPACITY + 1)
            .build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_blank_device_id() {
        let result = PlayerConfig::builder()
            .device_id("   ")
            .backend(BackendKind::Broadcast)
            .build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_after_mutation() {
        let mut config = PlayerConfig::builder()
            .device_id("living-room")
            .element_adapter(Arc::new(NullAdapter))
            .build()
            .unwrap();
        config.element_adapter = None;
        assert!(matches!(
            config.validate(),
            Err(Error::CapabilityMissing { .. })
        ));
    }

    #[test]
    fn test_settings_from_json() {
        let json = r#"{
            "device_id": "bedroom",
            "backend": "native",
            "event_bus_capacity": 32,
            "forward_to_event_bus": true
        }"#;
        let settings: PlayerSettings = serde_json::from_str(json).unwrap();

        let config = PlayerConfigBuilder::from_settings(settings)
            .element_adapter(Arc::new(NullAdapter))
            .build()
            .unwrap();

        assert_eq!(config.device_id, DeviceId::new("bedroom"));
        assert_eq!(config.backend, BackendKind::Native);
        assert_eq!(config.event_bus_capacity, 32);
        assert!(config.forward_to_event_bus);
    }

    #[test]
    fn test_settings_defaults() {
        let settings: PlayerSettings = serde_json::from_str(r#"{ "device_id": "x" }"#).unwrap();
        assert_eq!(settings.backend, BackendKind::Embedded);
        assert_eq!(settings.event_bus_capacity, DEFAULT_EVENT_BUFFER_SIZE);
        assert!(!settings.forward_to_event_bus);
    }

    #[test]
    fn test_config_debug_hides_adapter() {
        let config = PlayerConfig::builder()
            .device_id("living-room")
            .element_adapter(Arc::new(NullAdapter))
            .build()
            .unwrap();
        let debug = format!("{:?}", config);
        assert!(debug.contains("MediaElementAdapter { ... }"));
    }
}
