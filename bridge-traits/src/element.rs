//! Media element bridge trait and supporting surface types.
//!
//! Every television host exposes some kind of native playback surface: an
//! embedded `<video>`/`<audio>` element on browser-class set-top boxes, a
//! proprietary player object on native OS stacks, or a decoder plane on
//! broadcast tuners. The core never touches those surfaces directly; it asks
//! the host's [`MediaElementAdapter`] to create, attach, bind, and detach them
//! and only ever holds an opaque [`ElementHandle`].
//!
//! All adapter calls are synchronous. The playback core treats each public
//! operation as one atomic step, so an adapter must not suspend or re-enter the
//! core from inside one of these methods.

use crate::{error::Result, platform::PlatformSendSync};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Kind of media a surface is created for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Audio,
    Video,
}

impl MediaType {
    /// Tag name of the element the host creates for this media type.
    pub fn tag_name(&self) -> &'static str {
        match self {
            MediaType::Audio => "audio",
            MediaType::Video => "video",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag_name())
    }
}

/// Identifier the host assigns to a freshly created element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementRole {
    /// `mediaPlayerAudio`
    MediaPlayerAudio,
    /// `mediaPlayerVideo`
    MediaPlayerVideo,
}

impl ElementRole {
    /// Role used for the single player surface of the given media type.
    pub fn for_media(media_type: MediaType) -> Self {
        match media_type {
            MediaType::Audio => ElementRole::MediaPlayerAudio,
            MediaType::Video => ElementRole::MediaPlayerVideo,
        }
    }

    /// Element id string as it appears in the host's element tree.
    pub fn as_id(&self) -> &'static str {
        match self {
            ElementRole::MediaPlayerAudio => "mediaPlayerAudio",
            ElementRole::MediaPlayerVideo => "mediaPlayerVideo",
        }
    }
}

/// Where a surface is attached once created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementParent {
    /// Prepended to the document body (browser-class boxes).
    Body,
    /// Attached to the hardware video plane behind the UI (native stacks).
    VideoPlane,
}

/// Opaque handle to a host playback surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementHandle(Uuid);

impl ElementHandle {
    /// Generate a new handle.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Construct a handle from an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Borrow the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ElementHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Host adapter that owns the lifecycle of native playback surfaces.
///
/// The playback core calls [`create_element`](Self::create_element),
/// [`attach`](Self::attach) and [`bind_source`](Self::bind_source) exactly once
/// each per successful `set_source`, and [`detach`](Self::detach) exactly once
/// per `reset` that finds a bound element.
pub trait MediaElementAdapter: PlatformSendSync {
    /// Create a playback surface of the given media type.
    fn create_element(&self, media_type: MediaType, role: ElementRole) -> Result<ElementHandle>;

    /// Insert a previously created surface under `parent`.
    fn attach(&self, handle: ElementHandle, parent: ElementParent) -> Result<()>;

    /// Remove the surface from the host and release its native resources.
    fn detach(&self, handle: ElementHandle) -> Result<()>;

    /// Attach a source description (URL + MIME type) to the surface.
    fn bind_source(&self, handle: ElementHandle, url: &str, mime_type: &str) -> Result<()>;
}
