//! # Playback State Machine
//!
//! The guarded transition table shared by every backend.
//!
//! ## Transitions
//!
//! | Operation | Accepted from | Result |
//! |-----------|---------------|--------|
//! | `set_source` | `EMPTY` | `STOPPED` |
//! | `play` | `PLAYING`, `BUFFERING` | no-op |
//! | `play` | `STOPPED` | `BUFFERING` |
//! | `play` | `PAUSED` | `PLAYING` |
//! | `play_from` | `BUFFERING` | no-op |
//! | `play_from` | `PLAYING`, `STOPPED`, `PAUSED`, `COMPLETE` | `BUFFERING` |
//! | `pause` | `BUFFERING`, `PAUSED` | no-op |
//! | `pause` | `PLAYING` | `PAUSED` |
//! | `stop` | `BUFFERING`, `PLAYING`, `PAUSED`, `COMPLETE` | `STOPPED` |
//! | `reset` | `STOPPED`, `ERROR` | `EMPTY` |
//!
//! Any other combination is a protocol violation: the session is wiped, moved
//! to `ERROR`, an `ERROR` event is emitted, and the call returns
//! [`PlaybackError::InvalidTransition`]. Only `reset` leaves `ERROR`.
//!
//! `play`, `play_from` and `pause` record the post-buffering state before
//! the guard is checked, including on the no-op branches, so a `pause` issued
//! while buffering lands in `PAUSED` once the device finishes buffering.
//!
//! ## Atomicity
//!
//! Every operation takes `&mut self` and runs to completion, emitting its
//! event before returning. Listeners only receive `&MediaEvent` and cannot
//! reach back into the session.

use crate::binding::SurfaceBinding;
use crate::error::{PlaybackError, Result};
use crate::events::{MediaEvent, MediaEventKind, SessionSnapshot};
use crate::signal::DeviceSignal;
use crate::state::{MediaRange, MediaState, PostBufferingState};
use bridge_traits::{DeviceId, ElementHandle, MediaType};
use core_runtime::events::{EventChannel, EventListener, ListenerId};
use core_runtime::logging::strip_url_query;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument, trace, warn};

/// One playback session bound to a device.
pub struct PlaybackStateMachine<B: SurfaceBinding> {
    device: DeviceId,
    binding: B,
    state: MediaState,
    post_buffering: Option<PostBufferingState>,
    media_type: Option<MediaType>,
    source: Option<String>,
    mime_type: Option<String>,
    current_time: Option<f64>,
    range: Option<MediaRange>,
    seek_target: Option<f64>,
    element: Option<ElementHandle>,
    channel: EventChannel<MediaEvent>,
}

impl<B: SurfaceBinding> PlaybackStateMachine<B> {
    /// Creates an `EMPTY` session with no listeners.
    pub fn new(device: DeviceId, binding: B) -> Self {
        Self {
            device,
            binding,
            state: MediaState::Empty,
            post_buffering: None,
            media_type: None,
            source: None,
            mime_type: None,
            current_time: None,
            range: None,
            seek_target: None,
            element: None,
            channel: EventChannel::new(),
        }
    }

    // ========================================================================
    // Public operations
    // ========================================================================

    /// Binds a new surface for `url` and moves to `STOPPED`.
    ///
    /// If the adapter fails the error is returned, nothing stays attached and
    /// the session remains `EMPTY`.
    #[instrument(skip_all, fields(device = %self.device, backend = self.binding.backend_name()))]
    pub fn set_source(
        &mut self,
        media_type: MediaType,
        url: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Result<()> {
        if self.state != MediaState::Empty {
            return Err(self.reject("set_source"));
        }

        let url = url.into();
        let mime_type = mime_type.into();

        let handle = self
            .binding
            .acquire(media_type, &url, &mime_type)
            .map_err(|err| {
                warn!(source = strip_url_query(&url), error = %err, "Failed to bind media source");
                PlaybackError::from(err)
            })?;

        debug!(%handle, %media_type, source = strip_url_query(&url), %mime_type, "Bound media source");

        self.element = Some(handle);
        self.media_type = Some(media_type);
        self.source = Some(url);
        self.mime_type = Some(mime_type);
        self.to_stopped();
        Ok(())
    }

    /// Starts or resumes playback.
    pub fn play(&mut self) -> Result<()> {
        self.post_buffering = Some(PostBufferingState::Playing);
        match self.state {
            MediaState::Playing | MediaState::Buffering => Ok(()),
            MediaState::Stopped => {
                self.to_buffering();
                Ok(())
            }
            MediaState::Paused => {
                self.to_playing();
                Ok(())
            }
            _ => Err(self.reject("play")),
        }
    }

    /// Starts playback from `time` seconds.
    ///
    /// Negative and non-finite times are clamped to `0.0`.
    pub fn play_from(&mut self, time: f64) -> Result<()> {
        self.post_buffering = Some(PostBufferingState::Playing);
        let target = if time.is_finite() { time.max(0.0) } else { 0.0 };

        match self.state {
            MediaState::Buffering => {
                self.seek_target = Some(target);
                Ok(())
            }
            MediaState::Playing
            | MediaState::Stopped
            | MediaState::Paused
            | MediaState::Complete => {
                self.seek_target = Some(target);
                self.to_buffering();
                Ok(())
            }
            _ => Err(self.reject("play_from")),
        }
    }

    /// Pauses playback, or arranges for buffering to end in `PAUSED`.
    pub fn pause(&mut self) -> Result<()> {
        self.post_buffering = Some(PostBufferingState::Paused);
        match self.state {
            MediaState::Buffering | MediaState::Paused => Ok(()),
            MediaState::Playing => {
                self.to_paused();
                Ok(())
            }
            _ => Err(self.reject("pause")),
        }
    }

    /// Stops playback, keeping the source bound.
    pub fn stop(&mut self) -> Result<()> {
        match self.state {
            MediaState::Buffering
            | MediaState::Playing
            | MediaState::Paused
            | MediaState::Complete => {
                self.to_stopped();
                Ok(())
            }
            _ => Err(self.reject("stop")),
        }
    }

    /// Releases the bound surface and returns to `EMPTY`.
    ///
    /// The surface is released first, from any state. Only `STOPPED` and
    /// `ERROR` may then move to `EMPTY`; every other state, `EMPTY` included,
    /// is a protocol violation and ends in `ERROR`.
    ///
    /// A release failure does not stop the transition. The adapter error is
    /// returned once the session has settled.
    #[instrument(skip_all, fields(device = %self.device, backend = self.binding.backend_name()))]
    pub fn reset(&mut self) -> Result<()> {
        let released = match self.element.take() {
            Some(handle) => {
                debug!(%handle, "Releasing media element");
                self.binding.release(handle)
            }
            None => Ok(()),
        };

        let outcome = match self.state {
            MediaState::Stopped | MediaState::Error => {
                self.to_empty();
                Ok(())
            }
            _ => Err(self.reject("reset")),
        };

        if let Err(err) = released {
            warn!(error = %err, "Failed to release media element");
            return Err(err.into());
        }
        outcome
    }

    // ========================================================================
    // Hardware handlers
    // ========================================================================

    /// Routes a device signal to its handler.
    pub fn handle_signal(&mut self, signal: DeviceSignal) {
        trace!(device = %self.device, signal = signal.name(), state = %self.state, "Device signal");
        match signal {
            DeviceSignal::FinishedBuffering => self.on_finished_buffering(),
            DeviceSignal::DeviceError { reason } => self.on_device_error(&reason),
            DeviceSignal::DeviceBuffering => self.on_device_buffering(),
            DeviceSignal::EndOfMedia => self.on_end_of_media(),
            DeviceSignal::Status {
                current_time,
                range,
            } => {
                if self.state == MediaState::Playing {
                    self.current_time = current_time;
                    self.range = range;
                }
                self.on_status();
            }
        }
    }

    /// Ends the current buffering episode. Ignored outside `BUFFERING`.
    pub fn on_finished_buffering(&mut self) {
        if self.state != MediaState::Buffering {
            trace!(device = %self.device, state = %self.state, "Ignoring finished buffering");
            return;
        }

        self.seek_target = None;
        match self.post_buffering {
            Some(PostBufferingState::Playing) => self.to_playing(),
            _ => self.to_paused(),
        }
    }

    pub fn on_device_error(&mut self, reason: &str) {
        warn!(device = %self.device, from = %self.state, reason, "Device reported playback error");
        self.to_error();
    }

    pub fn on_device_buffering(&mut self) {
        self.to_buffering();
    }

    pub fn on_end_of_media(&mut self) {
        self.to_complete();
    }

    /// Emits `STATUS` while playing; silent in every other state.
    pub fn on_status(&mut self) {
        if self.state == MediaState::Playing {
            self.emit(MediaEventKind::Status);
        } else {
            trace!(device = %self.device, state = %self.state, "Suppressed status update");
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn state(&self) -> MediaState {
        self.state
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    pub fn media_type(&self) -> Option<MediaType> {
        self.media_type
    }

    pub fn current_time(&self) -> Option<f64> {
        self.current_time
    }

    pub fn range(&self) -> Option<MediaRange> {
        self.range
    }

    pub fn seek_target(&self) -> Option<f64> {
        self.seek_target
    }

    pub fn post_buffering_state(&self) -> Option<PostBufferingState> {
        self.post_buffering
    }

    pub fn device(&self) -> &DeviceId {
        &self.device
    }

    pub fn binding(&self) -> &B {
        &self.binding
    }

    /// Handle of the bound surface, for hosts wiring native callbacks to it.
    pub fn bound_element(&self) -> Result<ElementHandle> {
        self.element.ok_or(PlaybackError::NoSourceBound)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state,
            media_type: self.media_type,
            source: self.source.clone(),
            mime_type: self.mime_type.clone(),
            current_time: self.current_time,
            range: self.range,
            seek_target: self.seek_target,
        }
    }

    // ========================================================================
    // Listeners
    // ========================================================================

    pub fn add_listener<L>(&mut self, listener: L) -> ListenerId
    where
        L: EventListener<MediaEvent> + 'static,
    {
        self.channel.register(listener)
    }

    pub fn add_shared_listener(&mut self, listener: Arc<dyn EventListener<MediaEvent>>) -> ListenerId {
        self.channel.register_shared(listener)
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.channel.unregister(id)
    }

    pub fn listener_count(&self) -> usize {
        self.channel.listener_count()
    }

    // ========================================================================
    // Transition executors
    // ========================================================================

    fn reject(&mut self, operation: &'static str) -> PlaybackError {
        let from = self.state;
        warn!(device = %self.device, operation, %from, "Operation not permitted, forcing ERROR");
        self.to_error();
        PlaybackError::InvalidTransition { operation, from }
    }

    fn wipe(&mut self) {
        self.media_type = None;
        self.source = None;
        self.mime_type = None;
        self.current_time = None;
        self.range = None;
        self.seek_target = None;
    }

    fn to_empty(&mut self) {
        self.wipe();
        self.post_buffering = None;
        debug!(device = %self.device, from = %self.state, to = %MediaState::Empty, "State transition");
        self.state = MediaState::Empty;
    }

    fn to_stopped(&mut self) {
        self.current_time = None;
        self.range = None;
        self.seek_target = None;
        self.enter(MediaState::Stopped);
    }

    fn to_buffering(&mut self) {
        self.enter(MediaState::Buffering);
    }

    fn to_playing(&mut self) {
        self.enter(MediaState::Playing);
    }

    fn to_paused(&mut self) {
        self.enter(MediaState::Paused);
    }

    fn to_complete(&mut self) {
        self.current_time = None;
        self.enter(MediaState::Complete);
    }

    fn to_error(&mut self) {
        self.wipe();
        self.enter(MediaState::Error);
    }

    fn enter(&mut self, state: MediaState) {
        debug!(device = %self.device, from = %self.state, to = %state, "State transition");
        self.state = state;
        if let Some(kind) = MediaEventKind::for_state(state) {
            self.emit(kind);
        }
    }

    fn emit(&self, kind: MediaEventKind) {
        let event = MediaEvent::new(kind, self.device.clone(), self.snapshot());
        let delivered = self.channel.emit(&event);
        trace!(device = %self.device, %kind, delivered, "Emitted media event");
    }
}

impl<B: SurfaceBinding> fmt::Debug for PlaybackStateMachine<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackStateMachine")
            .field("device", &self.device)
            .field("backend", &self.binding.backend_name())
            .field("state", &self.state)
            .field("post_buffering", &self.post_buffering)
            .field("element", &self.element)
            .field("listeners", &self.channel.listener_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::EmbeddedElementBinding;
    use bridge_desktop::HeadlessElementTree;

    fn session() -> PlaybackStateMachine<EmbeddedElementBinding> {
        let tree = Arc::new(HeadlessElementTree::new());
        PlaybackStateMachine::new(DeviceId::new("tv"), EmbeddedElementBinding::new(tree))
    }

    #[test]
    fn play_from_clamps_target() {
        let mut player = session();
        player
            .set_source(MediaType::Video, "http://h/a.mp4", "video/mp4")
            .unwrap();

        player.play_from(-5.0).unwrap();
        assert_eq!(player.seek_target(), Some(0.0));

        player.play_from(f64::NAN).unwrap();
        assert_eq!(player.seek_target(), Some(0.0));

        player.play_from(42.0).unwrap();
        assert_eq!(player.seek_target(), Some(42.0));
        assert_eq!(player.state(), MediaState::Buffering);

        player.on_finished_buffering();
        assert_eq!(player.seek_target(), None);
        assert_eq!(player.state(), MediaState::Playing);
    }

    #[test]
    fn status_populates_position_only_while_playing() {
        let mut player = session();
        player
            .set_source(MediaType::Audio, "http://h/a.mp3", "audio/mpeg")
            .unwrap();
        player.play().unwrap();

        player.handle_signal(DeviceSignal::Status {
            current_time: Some(1.0),
            range: Some(MediaRange::new(0.0, 10.0)),
        });
        assert_eq!(player.current_time(), None);

        player.handle_signal(DeviceSignal::FinishedBuffering);
        player.handle_signal(DeviceSignal::Status {
            current_time: Some(2.0),
            range: Some(MediaRange::new(0.0, 10.0)),
        });
        assert_eq!(player.current_time(), Some(2.0));
        assert_eq!(player.range(), Some(MediaRange::new(0.0, 10.0)));

        player.handle_signal(DeviceSignal::EndOfMedia);
        assert_eq!(player.state(), MediaState::Complete);
        assert_eq!(player.current_time(), None);
        assert_eq!(player.range(), Some(MediaRange::new(0.0, 10.0)));
    }

    #[test]
    fn bound_element_follows_reset() {
        let mut player = session();
        assert!(matches!(
            player.bound_element(),
            Err(PlaybackError::NoSourceBound)
        ));

        player
            .set_source(MediaType::Video, "http://h/a.mp4", "video/mp4")
            .unwrap();
        assert!(player.bound_element().is_ok());

        player.reset().unwrap();
        assert!(player.bound_element().is_err());
        assert_eq!(player.state(), MediaState::Empty);
    }

    #[test]
    fn snapshot_reflects_fields() {
        let mut player = session();
        player
            .set_source(MediaType::Video, "http://h/a.mp4", "video/mp4")
            .unwrap();

        let snapshot = player.snapshot();
        assert_eq!(snapshot.state, MediaState::Stopped);
        assert_eq!(snapshot.media_type, Some(MediaType::Video));
        assert_eq!(snapshot.source.as_deref(), Some("http://h/a.mp4"));
        assert_eq!(snapshot.mime_type.as_deref(), Some("video/mp4"));
        assert!(format!("{:?}", player).contains("embedded"));
    }
}
