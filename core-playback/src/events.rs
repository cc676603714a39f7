//! # Media Events
//!
//! Event vocabulary emitted by every playback session.
//!
//! Each transition into a non-empty state emits exactly one [`MediaEvent`]
//! whose kind matches the new state. `STATUS` is the only kind that does not
//! correspond to a transition; it reports position updates while playing.
//! Returning to `EMPTY` through `reset` is silent.
//!
//! Events carry a [`SessionSnapshot`] taken after the transition, so listeners
//! never need to read back from the session that emitted them.

use crate::state::{MediaRange, MediaState};
use bridge_traits::{DeviceId, MediaType};
use chrono::{DateTime, Utc};
use core_runtime::events::EventSeverity;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed event vocabulary of the playback contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaEventKind {
    Stopped,
    Buffering,
    Playing,
    Paused,
    Complete,
    Error,
    Status,
}

impl MediaEventKind {
    /// Event emitted on entering `state`, if any.
    pub fn for_state(state: MediaState) -> Option<Self> {
        match state {
            MediaState::Empty => None,
            MediaState::Stopped => Some(MediaEventKind::Stopped),
            MediaState::Buffering => Some(MediaEventKind::Buffering),
            MediaState::Playing => Some(MediaEventKind::Playing),
            MediaState::Paused => Some(MediaEventKind::Paused),
            MediaState::Complete => Some(MediaEventKind::Complete),
            MediaState::Error => Some(MediaEventKind::Error),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaEventKind::Stopped => "STOPPED",
            MediaEventKind::Buffering => "BUFFERING",
            MediaEventKind::Playing => "PLAYING",
            MediaEventKind::Paused => "PAUSED",
            MediaEventKind::Complete => "COMPLETE",
            MediaEventKind::Error => "ERROR",
            MediaEventKind::Status => "STATUS",
        }
    }
}

impl fmt::Display for MediaEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only copy of a session's fields at emission time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub state: MediaState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_type: Option<MediaType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<MediaRange>,
    /// Position requested by the last accepted `play_from`, until buffering
    /// finishes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seek_target: Option<f64>,
}

impl SessionSnapshot {
    /// Returns `true` if no descriptive field is set.
    pub fn is_wiped(&self) -> bool {
        self.media_type.is_none()
            && self.source.is_none()
            && self.mime_type.is_none()
            && self.current_time.is_none()
            && self.range.is_none()
            && self.seek_target.is_none()
    }
}

/// Event delivered to session listeners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaEvent {
    pub kind: MediaEventKind,
    pub device: DeviceId,
    pub snapshot: SessionSnapshot,
    pub emitted_at: DateTime<Utc>,
}

impl MediaEvent {
    pub fn new(kind: MediaEventKind, device: DeviceId, snapshot: SessionSnapshot) -> Self {
        Self {
            kind,
            device,
            snapshot,
            emitted_at: Utc::now(),
        }
    }

    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &'static str {
        match self.kind {
            MediaEventKind::Stopped => "Playback stopped",
            MediaEventKind::Buffering => "Media buffering",
            MediaEventKind::Playing => "Playback started",
            MediaEventKind::Paused => "Playback paused",
            MediaEventKind::Complete => "Playback reached end of media",
            MediaEventKind::Error => "Playback failed",
            MediaEventKind::Status => "Playback position update",
        }
    }

    /// Returns the severity level of the event.
    pub fn severity(&self) -> EventSeverity {
        match self.kind {
            MediaEventKind::Error => EventSeverity::Error,
            MediaEventKind::Status => EventSeverity::Debug,
            _ => EventSeverity::Info,
        }
    }
}
