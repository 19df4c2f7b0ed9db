//! The real-time channel abstraction the widget is wired against.
//!
//! A channel carries named events with JSON payloads in both directions.
//! The widget only ever sees this trait, so it can be driven by the network
//! backend (`crate::socket::SocketChannel`) or by [`MemoryChannel`] in tests.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde_json::Value;

use crate::error::ChannelError;

/// Callback invoked with the payload of every matching inbound event.
pub type Handler = Box<dyn FnMut(&Value)>;

/// Token returned by [`RealtimeChannel::on`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

/// Bidirectional, event-named message transport.
///
/// All methods take `&self`: channels are shared between the widget and
/// its handlers on a single UI thread.
pub trait RealtimeChannel {
    /// Transmit `payload` under `event`. Fire-and-forget: `Ok` means the
    /// event was handed to the transport, not that anyone received it.
    fn send(&self, event: &str, payload: Value) -> Result<(), ChannelError>;

    /// Register `handler` for inbound events named `event`.
    fn on(&self, event: &str, handler: Handler) -> Subscription;

    /// Remove a handler. Unknown subscriptions are ignored.
    fn off(&self, subscription: Subscription);
}

type SharedHandler = Rc<RefCell<Handler>>;

/// Handler bookkeeping shared by channel implementations.
#[derive(Default)]
pub struct HandlerRegistry {
    next_id: Cell<u64>,
    handlers: RefCell<Vec<(Subscription, String, SharedHandler)>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, event: &str, handler: Handler) -> Subscription {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        let subscription = Subscription(id);
        self.handlers.borrow_mut().push((
            subscription,
            event.to_string(),
            Rc::new(RefCell::new(handler)),
        ));
        subscription
    }

    pub fn unsubscribe(&self, subscription: Subscription) {
        self.handlers
            .borrow_mut()
            .retain(|(sub, _, _)| *sub != subscription);
    }

    /// Run every handler registered for `event`, in registration order.
    /// Returns how many handlers ran.
    ///
    /// The registry is not borrowed while handlers execute, so a handler
    /// may subscribe or unsubscribe. A handler that re-enters dispatch for
    /// itself is skipped rather than called recursively.
    pub fn dispatch(&self, event: &str, payload: &Value) -> usize {
        let matching: Vec<SharedHandler> = self
            .handlers
            .borrow()
            .iter()
            .filter(|(_, name, _)| name == event)
            .map(|(_, _, handler)| Rc::clone(handler))
            .collect();

        let mut invoked = 0;
        for handler in matching {
            if let Ok(mut guard) = handler.try_borrow_mut() {
                let callback: &mut Handler = &mut guard;
                callback(payload);
                invoked += 1;
            }
        }
        invoked
    }

    pub fn len(&self) -> usize {
        self.handlers.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-process channel: records outbound events and lets the caller inject
/// inbound ones.
#[derive(Default)]
pub struct MemoryChannel {
    registry: HandlerRegistry,
    sent: RefCell<Vec<(String, Value)>>,
    closed: Cell<bool>,
}

impl MemoryChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver an inbound event as if it came from the server.
    pub fn deliver(&self, event: &str, payload: Value) -> usize {
        self.registry.dispatch(event, &payload)
    }

    /// Everything sent so far, oldest first.
    pub fn sent(&self) -> Vec<(String, Value)> {
        self.sent.borrow().clone()
    }

    pub fn take_sent(&self) -> Vec<(String, Value)> {
        std::mem::take(&mut *self.sent.borrow_mut())
    }

    /// Make subsequent sends fail with [`ChannelError::Closed`].
    pub fn close(&self) {
        self.closed.set(true);
    }

    pub fn handler_count(&self) -> usize {
        self.registry.len()
    }
}

impl RealtimeChannel for MemoryChannel {
    fn send(&self, event: &str, payload: Value) -> Result<(), ChannelError> {
        if self.closed.get() {
            return Err(ChannelError::Closed);
        }
        self.sent.borrow_mut().push((event.to_string(), payload));
        Ok(())
    }

    fn on(&self, event: &str, handler: Handler) -> Subscription {
        self.registry.subscribe(event, handler)
    }

    fn off(&self, subscription: Subscription) {
        self.registry.unsubscribe(subscription);
    }
}
