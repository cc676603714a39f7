//! # Event Channel & Event Bus
//!
//! Provides the publish side of the device abstraction layer: the synchronous
//! [`EventChannel`] every playback session emits through, and an optional
//! [`EventBus`] built on `tokio::sync::broadcast` for consumers that want to
//! receive those events from async tasks.
//!
//! ## Overview
//!
//! - **EventChannel**: ordered listener list. `emit` runs every listener to
//!   completion, in registration order, before returning. Nothing is buffered.
//! - **EventListener**: anything that can observe an event by reference; plain
//!   closures implement it.
//! - **EventBus**: broadcast fan-out for async subscribers. Attach it to a
//!   channel with [`EventBus::listener`].
//! - **EventStream**: wrapper around a bus receiver with optional filtering.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────┐   emit (sync)   ┌──────────────┐   on_event   ┌────────────┐
//! │ Playback core ├────────────────>│ EventChannel ├─────────────>│ Listener 1 │
//! └───────────────┘                 │  (ordered)   ├─────────────>│ Listener 2 │
//!                                   │              │              └────────────┘
//!                                   │              │   forward    ┌──────────┐    recv    ┌──────────┐
//!                                   │              ├─────────────>│ EventBus ├───────────>│ async rx │
//!                                   └──────────────┘              └──────────┘            └──────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::EventChannel;
//! use std::sync::{Arc, Mutex};
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&seen);
//!
//! let mut channel: EventChannel<&'static str> = EventChannel::new();
//! let id = channel.register(move |event: &&'static str| sink.lock().unwrap().push(*event));
//!
//! assert_eq!(channel.emit(&"playing"), 1);
//! assert!(channel.unregister(id));
//! assert_eq!(channel.emit(&"paused"), 0);
//! assert_eq!(*seen.lock().unwrap(), vec!["playing"]);
//! ```
//!
//! ## Re-entrancy
//!
//! Listeners are invoked while the emitter is mid-operation. A listener must not
//! call back into the session that emitted the event; hand the event to a
//! queue (or the [`EventBus`]) and act on it afterwards.

use bridge_traits::platform::PlatformSendSync;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tokio::sync::broadcast;
use uuid::Uuid;

// Re-export commonly used types
pub use tokio::sync::broadcast::error::{RecvError, SendError};
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
///
/// Subscribers that can't keep up will receive `RecvError::Lagged`.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

/// Event severity levels for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    /// Debug-level events (verbose)
    Debug,
    /// Informational events
    Info,
    /// Error events
    Error,
}

// ============================================================================
// Listeners
// ============================================================================

/// Observer of events emitted through an [`EventChannel`].
pub trait EventListener<E>: PlatformSendSync {
    /// Called synchronously for every emitted event.
    fn on_event(&self, event: &E);
}

impl<E, F> EventListener<E> for F
where
    F: Fn(&E) + PlatformSendSync,
{
    fn on_event(&self, event: &E) {
        self(event)
    }
}

/// Handle returned by [`EventChannel::register`], used to unregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListenerId(Uuid);

impl ListenerId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Event Channel
// ============================================================================

/// Synchronous, ordered publish mechanism.
///
/// `emit` delivers the event to every registered listener in registration
/// order and returns once all of them have run. There is no buffering and no
/// delivery to listeners registered after the call.
pub struct EventChannel<E> {
    listeners: Vec<(ListenerId, Arc<dyn EventListener<E>>)>,
}

impl<E> EventChannel<E> {
    /// Creates a channel with no listeners.
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    /// Registers a listener at the end of the delivery order.
    pub fn register<L>(&mut self, listener: L) -> ListenerId
    where
        L: EventListener<E> + 'static,
    {
        self.register_shared(Arc::new(listener))
    }

    /// Registers a listener that is also held elsewhere.
    pub fn register_shared(&mut self, listener: Arc<dyn EventListener<E>>) -> ListenerId {
        let id = ListenerId::new();
        self.listeners.push((id, listener));
        id
    }

    /// Removes a listener. Returns `false` if the id was not registered.
    pub fn unregister(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    /// Delivers `event` to every listener and returns how many received it.
    pub fn emit(&self, event: &E) -> usize {
        for (_, listener) in &self.listeners {
            listener.on_event(event);
        }
        self.listeners.len()
    }

    /// Returns the number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Removes every listener.
    pub fn clear(&mut self) {
        self.listeners.clear();
    }
}

impl<E> Default for EventChannel<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for EventChannel<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventChannel")
            .field("listener_count", &self.listeners.len())
            .finish()
    }
}

// ============================================================================
// Event Bus
// ============================================================================

/// Broadcast bus for consuming events from async tasks.
///
/// Uses `tokio::sync::broadcast` internally, which provides:
/// - Multiple producers (clone the `EventBus`)
/// - Multiple consumers (each `subscribe()` creates a new receiver)
/// - Non-blocking sends (events are cloned for each subscriber)
/// - Lagging detection (slow subscribers get `RecvError::Lagged`)
///
/// # Example
///
/// ```rust
/// use core_runtime::events::{EventBus, EventChannel};
///
/// # #[tokio::main]
/// # async fn main() {
/// let bus: EventBus<String> = EventBus::new(16);
/// let mut rx = bus.subscribe();
///
/// let mut channel = EventChannel::new();
/// channel.register(bus.listener());
/// channel.emit(&"stopped".to_string());
///
/// assert_eq!(rx.recv().await.unwrap(), "stopped");
/// # }
/// ```
pub struct EventBus<E> {
    sender: broadcast::Sender<E>,
}

impl<E> Clone for EventBus<E> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<E: Clone + Send + 'static> EventBus<E> {
    /// Creates a new event bus with the specified buffer size.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum number of events to buffer per subscriber.
    ///   When a subscriber falls behind by more than this amount, it will
    ///   receive a `RecvError::Lagged` error.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Creates a new event bus with the default buffer size.
    #[allow(clippy::should_implement_trait)]
    pub fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event, or an error
    /// if there are no active subscribers.
    pub fn emit(&self, event: E) -> Result<usize, SendError<E>> {
        self.sender.send(event)
    }

    /// Creates a new subscriber to receive events.
    ///
    /// Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<E> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Builds a channel listener that forwards every event into this bus.
    ///
    /// Events emitted while nobody is subscribed are dropped.
    pub fn listener(&self) -> BusForwarder<E> {
        BusForwarder {
            sender: self.sender.clone(),
        }
    }
}

impl<E> fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.sender.receiver_count())
            .finish()
    }
}

/// [`EventListener`] that republishes events on an [`EventBus`].
pub struct BusForwarder<E> {
    sender: broadcast::Sender<E>,
}

impl<E> EventListener<E> for BusForwarder<E>
where
    E: Clone + Send + 'static,
{
    fn on_event(&self, event: &E) {
        // No subscribers is not an error for the emitter.
        let _ = self.sender.send(event.clone());
    }
}

// ============================================================================
// Event Stream Wrapper
// ============================================================================

/// Type alias for event filter functions.
type EventFilter<E> = Box<dyn Fn(&E) -> bool + Send + Sync>;

/// A wrapper around `broadcast::Receiver` with additional filtering capabilities.
pub struct EventStream<E> {
    receiver: Receiver<E>,
    filter: Option<EventFilter<E>>,
}

impl<E: Clone> EventStream<E> {
    /// Creates a new event stream from a receiver.
    pub fn new(receiver: Receiver<E>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Adds a filter function to this stream.
    ///
    /// Only events that match the filter will be returned by `recv()`.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&E) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    /// Receives the next event that passes the filter (if any).
    ///
    /// # Errors
    ///
    /// Returns `RecvError::Lagged(n)` if the subscriber fell behind by `n` events.
    /// Returns `RecvError::Closed` if all senders have been dropped.
    pub async fn recv(&mut self) -> Result<E, RecvError> {
        loop {
            let event = self.receiver.recv().await?;

            let Some(filter) = &self.filter else {
                return Ok(event);
            };

            if filter(&event) {
                return Ok(event);
            }
        }
    }

    /// Attempts to receive an event without blocking.
    ///
    /// Returns `None` if no events are currently available.
    pub fn try_recv(&mut self) -> Option<Result<E, RecvError>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    let Some(filter) = &self.filter else {
                        return Some(Ok(event));
                    };

                    if filter(&event) {
                        return Some(Ok(event));
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => return None,
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    return Some(Err(RecvError::Lagged(n)))
                }
                Err(broadcast::error::TryRecvError::Closed) => return Some(Err(RecvError::Closed)),
            }
        }
    }
}

impl<E> fmt::Debug for EventStream<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
