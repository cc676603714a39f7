//! # Playback Error Types
//!
//! Error types for playback state machine operations.

use crate::state::MediaState;
use bridge_traits::error::BridgeError;
use thiserror::Error;

/// Errors that can occur during playback operations.
#[derive(Error, Debug)]
pub enum PlaybackError {
    // ========================================================================
    // Protocol Errors
    // ========================================================================
    /// Operation is not permitted from the session's current state.
    ///
    /// By the time this is returned the session has already been forced into
    /// [`MediaState::Error`] and its descriptive fields wiped.
    #[error("Operation '{operation}' is not permitted from state {from}")]
    InvalidTransition {
        operation: &'static str,
        from: MediaState,
    },

    /// Operation needs a bound playback surface and none is held.
    #[error("No media source bound")]
    NoSourceBound,

    // ========================================================================
    // Platform/Adapter Errors
    // ========================================================================
    /// Host adapter failed to create, attach, bind or release a surface.
    #[error("Media element adapter error: {0}")]
    Bridge(#[from] BridgeError),
}

impl PlaybackError {
    /// Returns `true` if the caller issued an operation the current state does
    /// not allow.
    pub fn is_protocol_violation(&self) -> bool {
        matches!(self, PlaybackError::InvalidTransition { .. })
    }

    /// Returns `true` if the host adapter reported the failure.
    pub fn is_adapter_failure(&self) -> bool {
        matches!(self, PlaybackError::Bridge(_))
    }
}

/// Result type for playback operations.
pub type Result<T> = std::result::Result<T, PlaybackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        let violation = PlaybackError::InvalidTransition {
            operation: "play",
            from: MediaState::Empty,
        };
        assert!(violation.is_protocol_violation());
        assert!(!violation.is_adapter_failure());
        assert_eq!(
            violation.to_string(),
            "Operation 'play' is not permitted from state EMPTY"
        );

        let adapter: PlaybackError = BridgeError::NotAvailable("surface".into()).into();
        assert!(adapter.is_adapter_failure());
        assert!(!adapter.is_protocol_violation());
    }
}
