//! Integration tests for bootstrapping playback services

use bridge_desktop::HeadlessElementTree;
use bridge_traits::{DeviceId, ElementParent, MediaType};
use core_playback::{DeviceSignal, MediaEventKind, MediaPlayer, MediaState};
use core_runtime::config::{BackendKind, PlayerConfig};
use core_service::{bootstrap, bootstrap_with_registry, registry, CoreError, DeviceRegistry};
use std::sync::Arc;

fn config(device: &str, tree: &Arc<HeadlessElementTree>) -> PlayerConfig {
    PlayerConfig::builder()
        .device_id(device)
        .backend(BackendKind::Embedded)
        .element_adapter(tree.clone())
        .build()
        .unwrap()
}

#[test]
fn test_bootstrap_registers_session() {
    let tree = Arc::new(HeadlessElementTree::new());
    let service = bootstrap(config("living-room", &tree)).unwrap();

    assert_eq!(service.device_id().as_str(), "living-room");
    assert_eq!(service.backend(), BackendKind::Embedded);
    assert!(service.event_bus().is_none());
    assert!(service.subscribe().is_none());

    let resolved = service
        .registry()
        .media_player(&DeviceId::new("living-room"))
        .unwrap();
    assert!(Arc::ptr_eq(&resolved, &service.player()));

    resolved
        .lock()
        .set_source(MediaType::Video, "http://h/a.mp4", "video/mp4")
        .unwrap();
    assert_eq!(service.player().lock().state(), MediaState::Stopped);
    assert_eq!(tree.children(ElementParent::Body).len(), 1);
}

#[test]
fn test_native_backend_uses_video_plane() {
    let tree = Arc::new(HeadlessElementTree::new());
    let config = PlayerConfig::builder()
        .device_id("bedroom")
        .backend(BackendKind::Native)
        .element_adapter(tree.clone())
        .build()
        .unwrap();

    let service = bootstrap(config).unwrap();
    service
        .player()
        .lock()
        .set_source(MediaType::Audio, "http://h/a.mp3", "audio/mpeg")
        .unwrap();

    assert_eq!(tree.children(ElementParent::VideoPlane).len(), 1);
    assert!(tree.children(ElementParent::Body).is_empty());
}

#[test]
fn test_missing_adapter_is_reported() {
    let tree = Arc::new(HeadlessElementTree::new());
    let mut config = config("living-room", &tree);
    config.element_adapter = None;

    match bootstrap(config) {
        Err(CoreError::CapabilityMissing { capability, .. }) => {
            assert_eq!(capability, "MediaElementAdapter");
        }
        other => panic!("expected CapabilityMissing, got {:?}", other),
    }
}

#[test]
fn test_invalid_config_is_reported() {
    let tree = Arc::new(HeadlessElementTree::new());
    let mut config = config("living-room", &tree);
    config.event_bus_capacity = 0;

    assert!(matches!(bootstrap(config), Err(CoreError::Runtime(_))));
}

#[test]
fn test_broadcast_backend_without_adapter() {
    let config = PlayerConfig::builder()
        .device_id("tuner")
        .backend(BackendKind::Broadcast)
        .build()
        .unwrap();

    let service = bootstrap(config).unwrap();
    let player = service.player();
    let mut player = player.lock();

    let err = player
        .set_source(MediaType::Video, "http://h/a.mp4", "video/mp4")
        .unwrap_err();
    assert!(err.is_adapter_failure());
    assert_eq!(player.state(), MediaState::Empty);
}

#[test]
fn test_shared_registry_holds_one_session_per_device() {
    let tree = Arc::new(HeadlessElementTree::new());
    let registry = Arc::new(DeviceRegistry::new());

    bootstrap_with_registry(config("a", &tree), Arc::clone(&registry)).unwrap();
    bootstrap_with_registry(config("b", &tree), Arc::clone(&registry)).unwrap();

    let err = bootstrap_with_registry(config("a", &tree), Arc::clone(&registry)).unwrap_err();
    assert!(matches!(err, CoreError::DeviceAlreadyRegistered(_)));
    assert_eq!(
        registry.devices(),
        vec![DeviceId::new("a"), DeviceId::new("b")]
    );

    for device in registry.devices() {
        registry
            .media_player(&device)
            .unwrap()
            .lock()
            .set_source(MediaType::Video, "http://h/a.mp4", "video/mp4")
            .unwrap();
    }
    assert_eq!(tree.element_count(), 2);

    registry.shutdown().unwrap();
    assert_eq!(tree.element_count(), 0);
    assert!(registry.is_empty());
}

#[test]
fn test_global_registry_installs_once() {
    assert!(matches!(
        registry::global(),
        Err(CoreError::RegistryNotInstalled)
    ));

    let shared = Arc::new(DeviceRegistry::new());
    registry::install(Arc::clone(&shared)).unwrap();

    assert!(matches!(
        registry::install(Arc::new(DeviceRegistry::new())),
        Err(CoreError::RegistryAlreadyInstalled)
    ));

    let tree = Arc::new(HeadlessElementTree::new());
    bootstrap_with_registry(config("global-tv", &tree), registry::global().unwrap()).unwrap();
    assert!(shared.contains(&DeviceId::new("global-tv")));
}

#[tokio::test]
async fn test_events_forwarded_to_bus() {
    let tree = Arc::new(HeadlessElementTree::new());
    let config = PlayerConfig::builder()
        .device_id("living-room")
        .element_adapter(tree)
        .forward_to_event_bus(true)
        .event_bus_capacity(16)
        .build()
        .unwrap();

    let service = bootstrap(config).unwrap();
    let mut all = service.subscribe().unwrap();
    let mut errors = service
        .subscribe()
        .unwrap()
        .filter(|event| event.kind == MediaEventKind::Error);

    {
        let player = service.player();
        let mut player = player.lock();
        player
            .set_source(MediaType::Video, "http://h/a.mp4", "video/mp4")
            .unwrap();
        player.play().unwrap();
        player.handle_signal(DeviceSignal::FinishedBuffering);
        player.handle_signal(DeviceSignal::DeviceError {
            reason: "hdcp failure".to_string(),
        });
    }

    let mut kinds = Vec::new();
    for _ in 0..4 {
        kinds.push(all.recv().await.unwrap().kind);
    }
    assert_eq!(
        kinds,
        vec![
            MediaEventKind::Stopped,
            MediaEventKind::Buffering,
            MediaEventKind::Playing,
            MediaEventKind::Error,
        ]
    );

    let error = errors.recv().await.unwrap();
    assert_eq!(error.device.as_str(), "living-room");
    assert!(error.snapshot.is_wiped());
    assert!(errors.try_recv().is_none());
}
