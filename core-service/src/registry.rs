//! Device registry.
//!
//! Maps each device to exactly one playback session. Applications resolve
//! "the media player for this device" through the registry instead of holding
//! backends directly, so every caller and every hardware callback trampoline
//! reaches the same instance.
//!
//! A registry can be passed around explicitly, or installed once as the
//! process-wide instance with [`install`] and resolved with [`global`].

use crate::error::{CoreError, Result};
use bridge_traits::DeviceId;
use core_playback::{MediaBackend, MediaPlayer, MediaState, PlaybackError};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use tracing::{debug, info, warn};

/// Playback session shared between the application and device callbacks.
pub type SharedPlayer = Arc<Mutex<MediaBackend>>;

static GLOBAL_REGISTRY: OnceLock<Arc<DeviceRegistry>> = OnceLock::new();

/// Installs `registry` as the process-wide registry.
///
/// # Errors
///
/// [`CoreError::RegistryAlreadyInstalled`] if a registry was installed before.
pub fn install(registry: Arc<DeviceRegistry>) -> Result<()> {
    GLOBAL_REGISTRY
        .set(registry)
        .map_err(|_| CoreError::RegistryAlreadyInstalled)?;
    info!("Installed process-wide device registry");
    Ok(())
}

/// Returns the process-wide registry.
pub fn global() -> Result<Arc<DeviceRegistry>> {
    GLOBAL_REGISTRY
        .get()
        .cloned()
        .ok_or(CoreError::RegistryNotInstalled)
}

#[derive(Default)]
pub struct DeviceRegistry {
    players: RwLock<HashMap<DeviceId, SharedPlayer>>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the session for the backend's device.
    ///
    /// A device keeps the same session for the lifetime of the registry;
    /// registering it twice fails with [`CoreError::DeviceAlreadyRegistered`].
    pub fn register(&self, backend: MediaBackend) -> Result<SharedPlayer> {
        let device = backend.device().clone();
        let mut players = self.players.write();

        if players.contains_key(&device) {
            return Err(CoreError::DeviceAlreadyRegistered(device));
        }

        debug!(%device, backend = ?backend.kind(), "Registering media player");
        let player = Arc::new(Mutex::new(backend));
        players.insert(device, Arc::clone(&player));
        Ok(player)
    }

    /// Resolves the media player for `device`.
    pub fn media_player(&self, device: &DeviceId) -> Result<SharedPlayer> {
        self.players
            .read()
            .get(device)
            .cloned()
            .ok_or_else(|| CoreError::DeviceNotRegistered(device.clone()))
    }

    pub fn contains(&self, device: &DeviceId) -> bool {
        self.players.read().contains_key(device)
    }

    pub fn devices(&self) -> Vec<DeviceId> {
        let mut devices: Vec<_> = self.players.read().keys().cloned().collect();
        devices.sort();
        devices
    }

    pub fn len(&self) -> usize {
        self.players.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.read().is_empty()
    }

    /// Resets every session back to `EMPTY`, releasing their surfaces, and
    /// empties the registry.
    ///
    /// Sessions outside `STOPPED`/`ERROR` take two resets: the first releases
    /// the surface and lands in `ERROR`, the second reaches `EMPTY`. Every
    /// session is torn down even if one fails; the first adapter failure is
    /// returned afterwards.
    pub fn shutdown(&self) -> Result<()> {
        let players: Vec<_> = self.players.write().drain().collect();
        let mut first_error = None;

        for (device, player) in players {
            let mut player = player.lock();
            if let Err(err) = release_session(&mut player) {
                warn!(%device, error = %err, "Failed to release media player during shutdown");
                first_error.get_or_insert(err);
            }
            debug!(%device, state = %player.state(), "Media player shut down");
        }

        info!("Device registry shut down");
        match first_error {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }
}

fn release_session(player: &mut MediaBackend) -> std::result::Result<(), PlaybackError> {
    if player.state() == MediaState::Empty {
        return Ok(());
    }

    let first = match player.reset() {
        Err(err) if !err.is_protocol_violation() => Some(err),
        _ => None,
    };
    if player.state() == MediaState::Error {
        player.reset()?;
    }

    match first {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

impl std::fmt::Debug for DeviceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceRegistry")
            .field("devices", &self.devices())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_desktop::HeadlessElementTree;
    use bridge_traits::{ElementParent, MediaType};
    use core_playback::DeviceSignal;

    #[test]
    fn test_register_and_resolve() {
        let registry = DeviceRegistry::new();
        let tree = Arc::new(HeadlessElementTree::new());

        let player = registry
            .register(MediaBackend::embedded(DeviceId::new("tv"), tree))
            .unwrap();
        let resolved = registry.media_player(&DeviceId::new("tv")).unwrap();

        assert!(Arc::ptr_eq(&player, &resolved));
        assert_eq!(registry.len(), 1);
        assert!(registry.contains(&DeviceId::new("tv")));
    }

    #[test]
    fn test_register_twice_fails() {
        let registry = DeviceRegistry::new();
        registry
            .register(MediaBackend::broadcast(DeviceId::new("tuner")))
            .unwrap();

        let err = registry
            .register(MediaBackend::broadcast(DeviceId::new("tuner")))
            .unwrap_err();
        assert!(matches!(err, CoreError::DeviceAlreadyRegistered(d) if d.as_str() == "tuner"));
    }

    #[test]
    fn test_unknown_device() {
        let registry = DeviceRegistry::new();
        assert!(matches!(
            registry.media_player(&DeviceId::new("ghost")),
            Err(CoreError::DeviceNotRegistered(_))
        ));
    }

    #[test]
    fn test_shutdown_releases_every_surface() {
        let registry = DeviceRegistry::new();
        let tree = Arc::new(HeadlessElementTree::new());

        let living_room = registry
            .register(MediaBackend::embedded(DeviceId::new("living-room"), tree.clone()))
            .unwrap();
        let bedroom = registry
            .register(MediaBackend::native(DeviceId::new("bedroom"), tree.clone()))
            .unwrap();
        registry
            .register(MediaBackend::broadcast(DeviceId::new("tuner")))
            .unwrap();

        {
            let mut player = living_room.lock();
            player
                .set_source(MediaType::Video, "http://h/a.mp4", "video/mp4")
                .unwrap();
            player.play().unwrap();
            player.handle_signal(DeviceSignal::FinishedBuffering);
        }
        bedroom
            .lock()
            .set_source(MediaType::Audio, "http://h/b.mp3", "audio/mpeg")
            .unwrap();
        assert_eq!(tree.element_count(), 2);

        registry.shutdown().unwrap();

        assert!(registry.is_empty());
        assert_eq!(tree.element_count(), 0);
        assert!(tree.children(ElementParent::Body).is_empty());
        assert_eq!(living_room.lock().state(), MediaState::Empty);
        assert_eq!(bedroom.lock().state(), MediaState::Empty);
    }

    #[test]
    fn test_devices_sorted() {
        let registry = DeviceRegistry::new();
        for id in ["c", "a", "b"] {
            registry
                .register(MediaBackend::broadcast(DeviceId::new(id)))
                .unwrap();
        }
        let devices: Vec<_> = registry.devices().iter().map(|d| d.to_string()).collect();
        assert_eq!(devices, ["a", "b", "c"]);
    }
}
