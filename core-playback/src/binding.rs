//! # Surface Bindings
//!
//! A surface binding decides where, and whether, a backend's playback surface
//! lives. The state machine owns one binding and calls it at exactly two
//! points: `acquire` when a source is set and `release` on `reset`.
//!
//! | Binding | Parent | Adapter |
//! |---------|--------|---------|
//! | [`EmbeddedElementBinding`] | document body (prepended) | required |
//! | [`NativeSurfaceBinding`] | hardware video plane | required |
//! | [`BroadcastBinding`] | none | none |

use bridge_traits::{
    element::{ElementHandle, ElementParent, ElementRole, MediaElementAdapter, MediaType},
    error::{BridgeError, Result},
    platform::PlatformSendSync,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Per-backend strategy for creating and releasing playback surfaces.
pub trait SurfaceBinding: PlatformSendSync {
    /// Short backend name used in logs.
    fn backend_name(&self) -> &'static str;

    /// Create, attach and bind a surface for the given source.
    ///
    /// Must either return a fully bound handle or leave nothing behind.
    fn acquire(&self, media_type: MediaType, url: &str, mime_type: &str) -> Result<ElementHandle>;

    /// Release a surface previously returned by [`acquire`](Self::acquire).
    fn release(&self, handle: ElementHandle) -> Result<()>;
}

/// Run the adapter's create/attach/bind sequence, detaching the element again
/// if a later step fails.
fn acquire_element(
    adapter: &dyn MediaElementAdapter,
    parent: ElementParent,
    media_type: MediaType,
    url: &str,
    mime_type: &str,
) -> Result<ElementHandle> {
    let handle = adapter.create_element(media_type, ElementRole::for_media(media_type))?;

    let bound = adapter
        .attach(handle, parent)
        .and_then(|_| adapter.bind_source(handle, url, mime_type));

    if let Err(err) = bound {
        if let Err(cleanup) = adapter.detach(handle) {
            warn!(%handle, error = %cleanup, "Failed to detach partially created element");
        }
        return Err(err);
    }

    Ok(handle)
}

/// Embedded media element prepended to the document body.
#[derive(Clone)]
pub struct EmbeddedElementBinding {
    adapter: Arc<dyn MediaElementAdapter>,
}

impl EmbeddedElementBinding {
    pub fn new(adapter: Arc<dyn MediaElementAdapter>) -> Self {
        Self { adapter }
    }
}

impl SurfaceBinding for EmbeddedElementBinding {
    fn backend_name(&self) -> &'static str {
        "embedded"
    }

    fn acquire(&self, media_type: MediaType, url: &str, mime_type: &str) -> Result<ElementHandle> {
        acquire_element(
            self.adapter.as_ref(),
            ElementParent::Body,
            media_type,
            url,
            mime_type,
        )
    }

    fn release(&self, handle: ElementHandle) -> Result<()> {
        self.adapter.detach(handle)
    }
}

/// Native OS player surface on the hardware video plane.
#[derive(Clone)]
pub struct NativeSurfaceBinding {
    adapter: Arc<dyn MediaElementAdapter>,
}

impl NativeSurfaceBinding {
    pub fn new(adapter: Arc<dyn MediaElementAdapter>) -> Self {
        Self { adapter }
    }
}

impl SurfaceBinding for NativeSurfaceBinding {
    fn backend_name(&self) -> &'static str {
        "native"
    }

    fn acquire(&self, media_type: MediaType, url: &str, mime_type: &str) -> Result<ElementHandle> {
        acquire_element(
            self.adapter.as_ref(),
            ElementParent::VideoPlane,
            media_type,
            url,
            mime_type,
        )
    }

    fn release(&self, handle: ElementHandle) -> Result<()> {
        self.adapter.detach(handle)
    }
}

/// Broadcast-only device. There is no surface to play arbitrary sources on,
/// so `set_source` always fails with [`BridgeError::NotAvailable`] and the
/// session stays `EMPTY`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BroadcastBinding;

impl SurfaceBinding for BroadcastBinding {
    fn backend_name(&self) -> &'static str {
        "broadcast"
    }

    fn acquire(&self, media_type: MediaType, _url: &str, _mime_type: &str) -> Result<ElementHandle> {
        debug!(%media_type, "Broadcast device refused media source");
        Err(BridgeError::NotAvailable(format!(
            "broadcast-only device cannot play {} sources",
            media_type
        )))
    }

    fn release(&self, handle: ElementHandle) -> Result<()> {
        Err(BridgeError::ElementNotFound(handle))
    }
}
