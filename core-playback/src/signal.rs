//! Hardware-originated signals.

use crate::state::MediaRange;
use serde::{Deserialize, Serialize};

/// Notification raised by the device independently of application calls.
///
/// Hosts translate their native callbacks into these and route them through
/// [`PlaybackStateMachine::handle_signal`](crate::PlaybackStateMachine::handle_signal).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "signal", rename_all = "snake_case")]
pub enum DeviceSignal {
    /// The device has enough data to continue.
    FinishedBuffering,
    /// Decode or playback fault.
    DeviceError { reason: String },
    /// The device stalled and started buffering.
    DeviceBuffering,
    /// Playback reached the end of the media.
    EndOfMedia,
    /// Periodic position report.
    Status {
        current_time: Option<f64>,
        range: Option<MediaRange>,
    },
}

impl DeviceSignal {
    pub fn name(&self) -> &'static str {
        match self {
            DeviceSignal::FinishedBuffering => "finished_buffering",
            DeviceSignal::DeviceError { .. } => "device_error",
            DeviceSignal::DeviceBuffering => "device_buffering",
            DeviceSignal::EndOfMedia => "end_of_media",
            DeviceSignal::Status { .. } => "status",
        }
    }
}
