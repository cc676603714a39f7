//! Core service façade and bootstrap helpers.
//!
//! This crate wires a host-provided [`MediaElementAdapter`] into the playback
//! core, registers the resulting session in a [`DeviceRegistry`], and
//! optionally mirrors its events onto an async [`EventBus`]. Desktop and
//! headless hosts typically enable the `desktop-shims` feature (which depends
//! on `bridge-desktop`) so no adapter has to be supplied.
//!
//! ```ignore
//! use core_runtime::config::{BackendKind, PlayerConfig};
//! use core_service::bootstrap;
//!
//! let config = PlayerConfig::builder()
//!     .device_id("living-room")
//!     .backend(BackendKind::Embedded)
//!     .forward_to_event_bus(true)
//!     .build()?;
//!
//! let service = bootstrap(config)?;
//! let mut events = service.subscribe().expect("bus enabled");
//! service.player().lock().set_source(MediaType::Video, url, "video/mp4")?;
//! ```
//!
//! [`MediaElementAdapter`]: bridge_traits::MediaElementAdapter

pub mod error;
pub mod registry;

pub use error::{CoreError, Result};
pub use registry::{DeviceRegistry, SharedPlayer};

#[cfg(all(feature = "desktop-shims", not(target_arch = "wasm32")))]
pub use bridge_desktop::HeadlessElementTree;

use bridge_traits::{DeviceId, MediaElementAdapter};
use core_playback::{MediaBackend, MediaEvent, MediaPlayer};
use core_runtime::config::{BackendKind, PlayerConfig};
use core_runtime::events::{EventBus, EventStream};
use core_runtime::logging::init_logging;
use std::sync::Arc;
use tracing::info;

/// Primary façade exposed to host applications for one device.
#[derive(Clone)]
pub struct PlaybackService {
    device_id: DeviceId,
    backend: BackendKind,
    player: SharedPlayer,
    registry: Arc<DeviceRegistry>,
    event_bus: Option<EventBus<MediaEvent>>,
}

impl PlaybackService {
    pub fn device_id(&self) -> &DeviceId {
        &self.device_id
    }

    pub fn backend(&self) -> BackendKind {
        self.backend
    }

    /// The session for this device.
    pub fn player(&self) -> SharedPlayer {
        Arc::clone(&self.player)
    }

    /// The registry the session was registered in.
    pub fn registry(&self) -> Arc<DeviceRegistry> {
        Arc::clone(&self.registry)
    }

    /// The async event bus, if `forward_to_event_bus` was set.
    pub fn event_bus(&self) -> Option<&EventBus<MediaEvent>> {
        self.event_bus.as_ref()
    }

    /// Subscribes to session events from an async task.
    ///
    /// Returns `None` when the service was built without an event bus.
    pub fn subscribe(&self) -> Option<EventStream<MediaEvent>> {
        self.event_bus
            .as_ref()
            .map(|bus| EventStream::new(bus.subscribe()))
    }
}

impl std::fmt::Debug for PlaybackService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackService")
            .field("device_id", &self.device_id)
            .field("backend", &self.backend)
            .field("event_bus", &self.event_bus.is_some())
            .finish()
    }
}

/// Builds the session described by `config` and registers it in a fresh
/// registry.
pub fn bootstrap(config: PlayerConfig) -> Result<PlaybackService> {
    bootstrap_with_registry(config, Arc::new(DeviceRegistry::new()))
}

/// Builds the session described by `config` and registers it in `registry`.
///
/// # Errors
///
/// - [`CoreError::CapabilityMissing`] if the backend needs an adapter and the
///   configuration has none
/// - [`CoreError::Runtime`] if the configuration is otherwise invalid or
///   logging could not be initialized
/// - [`CoreError::DeviceAlreadyRegistered`] if the device already has a session
pub fn bootstrap_with_registry(
    config: PlayerConfig,
    registry: Arc<DeviceRegistry>,
) -> Result<PlaybackService> {
    config.validate().map_err(|err| match err {
        core_runtime::Error::CapabilityMissing {
            capability,
            message,
        } => CoreError::CapabilityMissing {
            capability,
            message,
        },
        other => CoreError::Runtime(other),
    })?;

    if let Some(logging) = config.logging.clone() {
        init_logging(logging)?;
    }

    let device_id = config.device_id.clone();
    let mut backend = match config.backend {
        BackendKind::Embedded => {
            MediaBackend::embedded(device_id.clone(), require_adapter(&config)?)
        }
        BackendKind::Native => MediaBackend::native(device_id.clone(), require_adapter(&config)?),
        BackendKind::Broadcast => MediaBackend::broadcast(device_id.clone()),
    };

    let event_bus = if config.forward_to_event_bus {
        let bus = EventBus::new(config.event_bus_capacity);
        backend.add_shared_listener(Arc::new(bus.listener()));
        Some(bus)
    } else {
        None
    };

    let player = registry.register(backend)?;

    info!(
        device = %device_id,
        backend = ?config.backend,
        event_bus = event_bus.is_some(),
        "Playback service ready"
    );

    Ok(PlaybackService {
        device_id,
        backend: config.backend,
        player,
        registry,
        event_bus,
    })
}

fn require_adapter(config: &PlayerConfig) -> Result<Arc<dyn MediaElementAdapter>> {
    config
        .element_adapter
        .clone()
        .ok_or_else(|| CoreError::CapabilityMissing {
            capability: "MediaElementAdapter".to_string(),
            message: format!(
                "The {:?} backend needs a MediaElementAdapter to create playback surfaces.",
                config.backend
            ),
        })
}
