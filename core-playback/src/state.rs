//! Session states and device-reported position types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical playback state shared by every backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaState {
    /// No surface bound. Initial state.
    #[default]
    Empty,
    Stopped,
    Buffering,
    Playing,
    Paused,
    Complete,
    /// Terminal until `reset`.
    Error,
}

impl MediaState {
    pub const ALL: [MediaState; 7] = [
        MediaState::Empty,
        MediaState::Stopped,
        MediaState::Buffering,
        MediaState::Playing,
        MediaState::Paused,
        MediaState::Complete,
        MediaState::Error,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaState::Empty => "EMPTY",
            MediaState::Stopped => "STOPPED",
            MediaState::Buffering => "BUFFERING",
            MediaState::Playing => "PLAYING",
            MediaState::Paused => "PAUSED",
            MediaState::Complete => "COMPLETE",
            MediaState::Error => "ERROR",
        }
    }
}

impl fmt::Display for MediaState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State a buffering episode resolves into once the device reports it has
/// finished buffering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PostBufferingState {
    Playing,
    Paused,
}

impl From<PostBufferingState> for MediaState {
    fn from(state: PostBufferingState) -> Self {
        match state {
            PostBufferingState::Playing => MediaState::Playing,
            PostBufferingState::Paused => MediaState::Paused,
        }
    }
}

/// Seekable or available range reported by the device, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MediaRange {
    pub start: f64,
    pub end: f64,
}

impl MediaRange {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Length of the range, or zero if the device reported it inverted.
    pub fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }

    pub fn contains(&self, time: f64) -> bool {
        time >= self.start && time <= self.end
    }
}
