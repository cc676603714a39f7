//! # Playback State Machine Module
//!
//! Provides the portable media playback contract every device backend
//! satisfies.
//!
//! ## Overview
//!
//! This module handles:
//! - The canonical state set and guarded transition table
//! - Hardware signal handling (buffering, device errors, end of media, status)
//! - Event emission with a session snapshot per event
//! - Backend variants (embedded element, native surface, broadcast-only)
//!
//! ## Usage
//!
//! ```ignore
//! use core_playback::{MediaBackend, MediaPlayer, MediaState};
//! use bridge_traits::{DeviceId, MediaType};
//!
//! let mut player = MediaBackend::embedded(DeviceId::new("living-room"), adapter);
//! player.set_source(MediaType::Video, "http://cdn/a.mp4", "video/mp4")?;
//! player.play()?;
//! assert_eq!(player.state(), MediaState::Buffering);
//! ```

pub mod backend;
pub mod binding;
pub mod error;
pub mod events;
pub mod machine;
pub mod signal;
pub mod state;

pub use backend::{MediaBackend, MediaPlayer};
pub use binding::{BroadcastBinding, EmbeddedElementBinding, NativeSurfaceBinding, SurfaceBinding};
pub use error::{PlaybackError, Result};
pub use events::{MediaEvent, MediaEventKind, SessionSnapshot};
pub use machine::PlaybackStateMachine;
pub use signal::DeviceSignal;
pub use state::{MediaRange, MediaState, PostBufferingState};
