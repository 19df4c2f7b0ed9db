//! [`RealtimeChannel`] backed by the network thread.
//!
//! Outbound events are queued to the backend and forgotten. Inbound frames
//! wait in a crossbeam queue until the UI thread calls [`SocketChannel::pump`],
//! which dispatches them to handlers one at a time, in arrival order.

use std::thread;

use crossbeam_channel::{unbounded, Receiver, Sender};
use serde_json::Value;

use crate::backend::run_backend;
use crate::channel::{Handler, HandlerRegistry, RealtimeChannel, Subscription};
use crate::error::ChannelError;
use crate::protocol::{
    is_reserved_event, BackendAction, GuiEvent, EVENT_CONNECT, EVENT_CONNECT_ERROR,
    EVENT_DISCONNECT,
};

/// Where to connect and who to announce ourselves as.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectParams {
    pub server: String,
    pub port: u16,
    pub use_tls: bool,
    pub name: String,
    pub room: String,
}

pub struct SocketChannel {
    action_tx: Sender<BackendAction>,
    event_rx: Receiver<GuiEvent>,
    registry: HandlerRegistry,
}

impl SocketChannel {
    /// Start a backend thread and return a channel wired to it.
    pub fn spawn() -> Self {
        let (action_tx, action_rx) = unbounded::<BackendAction>();
        let (event_tx, event_rx) = unbounded::<GuiEvent>();

        thread::spawn(move || {
            run_backend(action_rx, event_tx);
        });

        Self::from_parts(action_tx, event_rx)
    }

    /// Wrap existing queues. The other ends belong to whatever plays the
    /// backend.
    pub fn from_parts(action_tx: Sender<BackendAction>, event_rx: Receiver<GuiEvent>) -> Self {
        Self {
            action_tx,
            event_rx,
            registry: HandlerRegistry::new(),
        }
    }

    pub fn connect(&self, params: ConnectParams) -> Result<(), ChannelError> {
        self.action(BackendAction::Connect {
            server: params.server,
            port: params.port,
            use_tls: params.use_tls,
            name: params.name,
            room: params.room,
        })
    }

    pub fn disconnect(&self) -> Result<(), ChannelError> {
        self.action(BackendAction::Disconnect)
    }

    fn action(&self, action: BackendAction) -> Result<(), ChannelError> {
        self.action_tx.send(action).map_err(|_| ChannelError::Closed)
    }

    /// Dispatch everything the backend has delivered so far. Returns the
    /// number of events processed.
    pub fn pump(&self) -> usize {
        let mut processed = 0;
        while let Ok(event) = self.event_rx.try_recv() {
            processed += 1;
            match event {
                GuiEvent::Connected => {
                    self.registry.dispatch(EVENT_CONNECT, &Value::Null);
                }
                GuiEvent::Disconnected(reason) => {
                    self.registry.dispatch(EVENT_DISCONNECT, &Value::String(reason));
                }
                GuiEvent::Error(message) => {
                    self.registry.dispatch(EVENT_CONNECT_ERROR, &Value::String(message));
                }
                GuiEvent::Frame(frame) if is_reserved_event(&frame.event) => {
                    log::warn!("Ignoring server frame with reserved name `{}`", frame.event);
                }
                GuiEvent::Frame(frame) => {
                    if self.registry.dispatch(&frame.event, &frame.payload) == 0 {
                        log::debug!("No handler for inbound `{}`", frame.event);
                    }
                }
            }
        }
        processed
    }
}

impl RealtimeChannel for SocketChannel {
    fn send(&self, event: &str, payload: Value) -> Result<(), ChannelError> {
        self.action(BackendAction::Emit {
            event: event.to_string(),
            payload,
        })
    }

    fn on(&self, event: &str, handler: Handler) -> Subscription {
        self.registry.subscribe(event, handler)
    }

    fn off(&self, subscription: Subscription) {
        self.registry.unsubscribe(subscription);
    }
}
