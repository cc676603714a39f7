//! Headless Media Element Implementation

use bridge_traits::{
    element::{ElementHandle, ElementParent, ElementRole, MediaElementAdapter, MediaType},
    error::{BridgeError, Result},
};
use parking_lot::Mutex;
use std::collections::HashMap;
use tracing::debug;

/// Adapter operation that can be forced to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailurePoint {
    Create,
    Attach,
    BindSource,
    Detach,
}

/// Source description bound to a surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundSource {
    pub url: String,
    pub mime_type: String,
}

#[derive(Debug, Clone)]
struct ElementNode {
    media_type: MediaType,
    role: ElementRole,
    parent: Option<ElementParent>,
    source: Option<BoundSource>,
}

#[derive(Default)]
struct TreeState {
    nodes: HashMap<ElementHandle, ElementNode>,
    children: HashMap<ElementParent, Vec<ElementHandle>>,
}

/// In-memory element tree for desktop and headless hosts.
///
/// Mirrors what a browser-class box does with `<video>`/`<audio>` elements:
/// surfaces attached to [`ElementParent::Body`] are prepended, surfaces on the
/// [`ElementParent::VideoPlane`] are appended. Nothing is rendered; the tree
/// exists so development hosts and tests can observe exactly which surfaces the
/// core holds at any moment.
pub struct HeadlessElementTree {
    state: Mutex<TreeState>,
    failures: Mutex<Vec<FailurePoint>>,
}

impl HeadlessElementTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(TreeState::default()),
            failures: Mutex::new(Vec::new()),
        }
    }

    /// Make every future call of the given operation fail.
    pub fn with_failure(self, point: FailurePoint) -> Self {
        self.failures.lock().push(point);
        self
    }

    /// Stop injecting failures for the given operation.
    pub fn clear_failure(&self, point: FailurePoint) {
        self.failures.lock().retain(|p| *p != point);
    }

    /// Number of live surfaces, attached or not.
    pub fn element_count(&self) -> usize {
        self.state.lock().nodes.len()
    }

    /// Surfaces currently attached under `parent`, in document order.
    pub fn children(&self, parent: ElementParent) -> Vec<ElementHandle> {
        self.state
            .lock()
            .children
            .get(&parent)
            .cloned()
            .unwrap_or_default()
    }

    /// Whether the handle refers to a live surface.
    pub fn contains(&self, handle: ElementHandle) -> bool {
        self.state.lock().nodes.contains_key(&handle)
    }

    /// Element id (`mediaPlayerVideo`, ...) of a live surface.
    pub fn element_id(&self, handle: ElementHandle) -> Option<&'static str> {
        self.state.lock().nodes.get(&handle).map(|n| n.role.as_id())
    }

    /// Media type a live surface was created for.
    pub fn media_type(&self, handle: ElementHandle) -> Option<MediaType> {
        self.state.lock().nodes.get(&handle).map(|n| n.media_type)
    }

    /// Source bound to a live surface.
    pub fn source_of(&self, handle: ElementHandle) -> Option<BoundSource> {
        self.state
            .lock()
            .nodes
            .get(&handle)
            .and_then(|n| n.source.clone())
    }

    fn check(&self, point: FailurePoint) -> Result<()> {
        if self.failures.lock().contains(&point) {
            return Err(BridgeError::OperationFailed(format!(
                "injected failure at {:?}",
                point
            )));
        }
        Ok(())
    }
}

impl Default for HeadlessElementTree {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaElementAdapter for HeadlessElementTree {
    fn create_element(&self, media_type: MediaType, role: ElementRole) -> Result<ElementHandle> {
        self.check(FailurePoint::Create)?;

        let handle = ElementHandle::new();
        self.state.lock().nodes.insert(
            handle,
            ElementNode {
                media_type,
                role,
                parent: None,
                source: None,
            },
        );

        debug!(%handle, id = role.as_id(), %media_type, "Created media element");
        Ok(handle)
    }

    fn attach(&self, handle: ElementHandle, parent: ElementParent) -> Result<()> {
        self.check(FailurePoint::Attach)?;

        let mut state = self.state.lock();
        let node = state
            .nodes
            .get_mut(&handle)
            .ok_or(BridgeError::ElementNotFound(handle))?;

        if let Some(existing) = node.parent {
            return Err(BridgeError::OperationFailed(format!(
                "element {} already attached to {:?}",
                handle, existing
            )));
        }
        node.parent = Some(parent);

        let siblings = state.children.entry(parent).or_default();
        match parent {
            ElementParent::Body => siblings.insert(0, handle),
            ElementParent::VideoPlane => siblings.push(handle),
        }

        debug!(%handle, ?parent, "Attached media element");
        Ok(())
    }

    fn detach(&self, handle: ElementHandle) -> Result<()> {
        self.check(FailurePoint::Detach)?;

        let mut state = self.state.lock();
        let node = state
            .nodes
            .remove(&handle)
            .ok_or(BridgeError::ElementNotFound(handle))?;

        if let Some(parent) = node.parent {
            if let Some(siblings) = state.children.get_mut(&parent) {
                siblings.retain(|h| *h != handle);
            }
        }

        debug!(%handle, "Detached media element");
        Ok(())
    }

    fn bind_source(&self, handle: ElementHandle, url: &str, mime_type: &str) -> Result<()> {
        self.check(FailurePoint::BindSource)?;

        let mut state = self.state.lock();
        let node = state
            .nodes
            .get_mut(&handle)
            .ok_or(BridgeError::ElementNotFound(handle))?;

        node.source = Some(BoundSource {
            url: url.to_string(),
            mime_type: mime_type.to_string(),
        });

        debug!(%handle, mime_type, "Bound media source");
        Ok(())
    }
}
