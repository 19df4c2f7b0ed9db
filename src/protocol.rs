//! Wire payloads and the UI <-> backend message types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Chat line, both directions.
pub const EVENT_MESSAGE: &str = "message";
/// Member list broadcast for the current room.
pub const EVENT_USER_LIST: &str = "updateUserList";
/// First frame after connecting: who we are and which room we want.
pub const EVENT_JOIN: &str = "join";
/// A member picked a text color for their lines.
pub const EVENT_FONT_COLOR: &str = "fontColorChange";
/// A member picked a font for their lines.
pub const EVENT_FONT: &str = "fontChange";
/// A code snippet shared with the whole room.
pub const EVENT_BROADCAST_CODE: &str = "broadcast_code";
/// Pseudo-events raised locally by the channel itself.
pub const EVENT_CONNECT: &str = "connect";
pub const EVENT_DISCONNECT: &str = "disconnect";
pub const EVENT_CONNECT_ERROR: &str = "connect_error";

/// Names only the local channel may raise. Server frames using them are
/// not dispatched.
pub const RESERVED_EVENTS: [&str; 3] = [EVENT_CONNECT, EVENT_DISCONNECT, EVENT_CONNECT_ERROR];

pub fn is_reserved_event(event: &str) -> bool {
    RESERVED_EVENTS.contains(&event)
}

/// Client-to-server chat submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub data: String,
}

/// Server-to-client chat line.
///
/// Both fields are optional on the wire; a message missing either one (or
/// carrying an empty string) is not renderable and gets dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct InboundMessage {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    /// Any JSON; only the string `"system"` means anything.
    #[serde(default, rename = "type")]
    pub kind: Option<Value>,
}

impl InboundMessage {
    /// Decode a raw payload, returning `None` unless it carries a non-empty
    /// `name` and `message`.
    pub fn from_payload(payload: &Value) -> Option<ValidInbound> {
        let raw: InboundMessage = serde_json::from_value(payload.clone()).ok()?;
        let name = raw.name.filter(|n| !n.is_empty())?;
        let message = raw.message.filter(|m| !m.is_empty())?;
        Some(ValidInbound {
            name,
            message,
            system: matches!(raw.kind, Some(Value::String(ref kind)) if kind == "system"),
        })
    }
}

/// An inbound message that passed the presence check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidInbound {
    pub name: String,
    pub message: String,
    pub system: bool,
}

/// Room membership snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserListUpdate {
    pub members: Vec<String>,
    #[serde(default)]
    pub avatars: BTreeMap<String, String>,
}

/// `fontColorChange`: `color` is a `#rrggbb` string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FontColorChange {
    pub user: String,
    pub color: String,
}

/// `fontChange`: `font` is a font family name, e.g. "Courier New".
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FontChange {
    pub user: String,
    pub font: String,
}

/// `broadcast_code`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CodeBroadcast {
    pub code: String,
    pub sender: String,
}

/// Identification sent once per connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JoinRequest {
    pub name: String,
    pub room: String,
}

/// One line on the wire: `{"event": "...", "payload": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub event: String,
    #[serde(default)]
    pub payload: Value,
}

impl Frame {
    pub fn new(event: impl Into<String>, payload: Value) -> Self {
        Self {
            event: event.into(),
            payload,
        }
    }
}

/// Actions sent from the UI to the Backend
#[derive(Debug, Clone)]
pub enum BackendAction {
    /// Connect to a chat server and announce ourselves
    Connect {
        server: String,
        port: u16,
        use_tls: bool,
        name: String,
        room: String,
    },
    /// Drop the current connection
    Disconnect,
    /// Transmit one event (fire-and-forget)
    Emit { event: String, payload: Value },
}

/// Events sent from the Backend to the UI
#[derive(Debug, Clone)]
pub enum GuiEvent {
    /// Transport is up and the join frame went out
    Connected,
    /// Connection closed (by us or the peer)
    Disconnected(String),
    /// Connection could not be established or broke
    Error(String),
    /// A frame arrived from the server
    Frame(Frame),
}
