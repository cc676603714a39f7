//! # Media Backends
//!
//! Every device backend satisfies the same [`MediaPlayer`] contract. The
//! transition table lives once, in [`PlaybackStateMachine`]; backends differ
//! only in the [`SurfaceBinding`] they compose with it.

use crate::binding::{BroadcastBinding, EmbeddedElementBinding, NativeSurfaceBinding, SurfaceBinding};
use crate::error::Result;
use crate::events::{MediaEvent, SessionSnapshot};
use crate::machine::PlaybackStateMachine;
use crate::signal::DeviceSignal;
use crate::state::{MediaRange, MediaState};
use bridge_traits::{DeviceId, MediaElementAdapter, MediaType};
use core_runtime::config::BackendKind;
use core_runtime::events::{EventListener, ListenerId};
use std::sync::Arc;

/// Application-facing playback contract.
pub trait MediaPlayer {
    fn set_source(&mut self, media_type: MediaType, url: &str, mime_type: &str) -> Result<()>;
    fn play(&mut self) -> Result<()>;
    fn play_from(&mut self, time: f64) -> Result<()>;
    fn pause(&mut self) -> Result<()>;
    fn stop(&mut self) -> Result<()>;
    fn reset(&mut self) -> Result<()>;

    fn handle_signal(&mut self, signal: DeviceSignal);

    fn state(&self) -> MediaState;
    fn source(&self) -> Option<&str>;
    fn mime_type(&self) -> Option<&str>;
    fn media_type(&self) -> Option<MediaType>;
    fn current_time(&self) -> Option<f64>;
    fn range(&self) -> Option<MediaRange>;
    fn snapshot(&self) -> SessionSnapshot;

    fn add_shared_listener(&mut self, listener: Arc<dyn EventListener<MediaEvent>>) -> ListenerId;
    fn remove_listener(&mut self, id: ListenerId) -> bool;
}

impl<B: SurfaceBinding> MediaPlayer for PlaybackStateMachine<B> {
    fn set_source(&mut self, media_type: MediaType, url: &str, mime_type: &str) -> Result<()> {
        PlaybackStateMachine::set_source(self, media_type, url, mime_type)
    }

    fn play(&mut self) -> Result<()> {
        PlaybackStateMachine::play(self)
    }

    fn play_from(&mut self, time: f64) -> Result<()> {
        PlaybackStateMachine::play_from(self, time)
    }

    fn pause(&mut self) -> Result<()> {
        PlaybackStateMachine::pause(self)
    }

    fn stop(&mut self) -> Result<()> {
        PlaybackStateMachine::stop(self)
    }

    fn reset(&mut self) -> Result<()> {
        PlaybackStateMachine::reset(self)
    }

    fn handle_signal(&mut self, signal: DeviceSignal) {
        PlaybackStateMachine::handle_signal(self, signal)
    }

    fn state(&self) -> MediaState {
        PlaybackStateMachine::state(self)
    }

    fn source(&self) -> Option<&str> {
        PlaybackStateMachine::source(self)
    }

    fn mime_type(&self) -> Option<&str> {
        PlaybackStateMachine::mime_type(self)
    }

    fn media_type(&self) -> Option<MediaType> {
        PlaybackStateMachine::media_type(self)
    }

    fn current_time(&self) -> Option<f64> {
        PlaybackStateMachine::current_time(self)
    }

    fn range(&self) -> Option<MediaRange> {
        PlaybackStateMachine::range(self)
    }

    fn snapshot(&self) -> SessionSnapshot {
        PlaybackStateMachine::snapshot(self)
    }

    fn add_shared_listener(&mut self, listener: Arc<dyn EventListener<MediaEvent>>) -> ListenerId {
        PlaybackStateMachine::add_shared_listener(self, listener)
    }

    fn remove_listener(&mut self, id: ListenerId) -> bool {
        PlaybackStateMachine::remove_listener(self, id)
    }
}

/// Tagged backend variants, one per device family.
#[derive(Debug)]
pub enum MediaBackend {
    Embedded(PlaybackStateMachine<EmbeddedElementBinding>),
    Native(PlaybackStateMachine<NativeSurfaceBinding>),
    Broadcast(PlaybackStateMachine<BroadcastBinding>),
}

macro_rules! dispatch {
    ($self:expr, $player:ident => $body:expr) => {
        match $self {
            MediaBackend::Embedded($player) => $body,
            MediaBackend::Native($player) => $body,
            MediaBackend::Broadcast($player) => $body,
        }
    };
}

impl MediaBackend {
    pub fn embedded(device: DeviceId, adapter: Arc<dyn MediaElementAdapter>) -> Self {
        MediaBackend::Embedded(PlaybackStateMachine::new(
            device,
            EmbeddedElementBinding::new(adapter),
        ))
    }

    pub fn native(device: DeviceId, adapter: Arc<dyn MediaElementAdapter>) -> Self {
        MediaBackend::Native(PlaybackStateMachine::new(
            device,
            NativeSurfaceBinding::new(adapter),
        ))
    }

    pub fn broadcast(device: DeviceId) -> Self {
        MediaBackend::Broadcast(PlaybackStateMachine::new(device, BroadcastBinding))
    }

    pub fn kind(&self) -> BackendKind {
        match self {
            MediaBackend::Embedded(_) => BackendKind::Embedded,
            MediaBackend::Native(_) => BackendKind::Native,
            MediaBackend::Broadcast(_) => BackendKind::Broadcast,
        }
    }

    pub fn device(&self) -> &DeviceId {
        dispatch!(self, p => p.device())
    }
}

impl MediaPlayer for MediaBackend {
    fn set_source(&mut self, media_type: MediaType, url: &str, mime_type: &str) -> Result<()> {
        dispatch!(self, p => p.set_source(media_type, url, mime_type))
    }

    fn play(&mut self) -> Result<()> {
        dispatch!(self, p => p.play())
    }

    fn play_from(&mut self, time: f64) -> Result<()> {
        dispatch!(self, p => p.play_from(time))
    }

    fn pause(&mut self) -> Result<()> {
        dispatch!(self, p => p.pause())
    }

    fn stop(&mut self) -> Result<()> {
        dispatch!(self, p => p.stop())
    }

    fn reset(&mut self) -> Result<()> {
        dispatch!(self, p => p.reset())
    }

    fn handle_signal(&mut self, signal: DeviceSignal) {
        dispatch!(self, p => p.handle_signal(signal))
    }

    fn state(&self) -> MediaState {
        dispatch!(self, p => p.state())
    }

    fn source(&self) -> Option<&str> {
        dispatch!(self, p => p.source())
    }

    fn mime_type(&self) -> Option<&str> {
        dispatch!(self, p => p.mime_type())
    }

    fn media_type(&self) -> Option<MediaType> {
        dispatch!(self, p => p.media_type())
    }

    fn current_time(&self) -> Option<f64> {
        dispatch!(self, p => p.current_time())
    }

    fn range(&self) -> Option<MediaRange> {
        dispatch!(self, p => p.range())
    }

    fn snapshot(&self) -> SessionSnapshot {
        dispatch!(self, p => p.snapshot())
    }

    fn add_shared_listener(&mut self, listener: Arc<dyn EventListener<MediaEvent>>) -> ListenerId {
        dispatch!(self, p => p.add_shared_listener(listener))
    }

    fn remove_listener(&mut self, id: ListenerId) -> bool {
        dispatch!(self, p => p.remove_listener(id))
    }
}
