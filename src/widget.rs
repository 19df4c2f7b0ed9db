//! The chat widget: binds the view state to a real-time channel.
//!
//! [`mount`] is the single entry point. It registers the inbound handlers
//! on the channel and returns a [`WidgetHandle`] through which the view
//! forwards user actions. Dropping (or disposing) the handle unregisters
//! everything, so a widget can be torn down and mounted again on the same
//! channel.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use chrono::{DateTime, Local};
use eframe::egui;
use serde_json::Value;

use crate::buffer::{EntryKind, MemberList, MessageList, RenderedEntry};
use crate::channel::{RealtimeChannel, Subscription};
use crate::emoji::{EmojiPanel, DEFAULT_EMOJIS};
use crate::input_state::MessageInput;
use crate::protocol::{
    CodeBroadcast, FontChange, FontColorChange, InboundMessage, OutboundMessage, UserListUpdate,
    EVENT_BROADCAST_CODE, EVENT_CONNECT, EVENT_CONNECT_ERROR, EVENT_DISCONNECT, EVENT_FONT,
    EVENT_FONT_COLOR, EVENT_MESSAGE, EVENT_USER_LIST,
};

/// Source of the local time stamped on rendered entries.
pub type Clock = fn() -> DateTime<Local>;

pub const DEFAULT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Clone, Debug)]
pub struct WidgetOptions {
    pub emojis: Vec<String>,
    /// chrono format string for entry timestamps
    pub time_format: String,
    pub clock: Clock,
}

impl Default for WidgetOptions {
    fn default() -> Self {
        Self {
            emojis: DEFAULT_EMOJIS.iter().map(|e| (*e).to_string()).collect(),
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            clock: Local::now,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connecting,
    Connected,
    Disconnected(String),
    Failed(String),
}

/// Everything the view draws.
#[derive(Debug)]
pub struct WidgetState {
    pub emoji_panel: EmojiPanel,
    pub input: MessageInput,
    pub messages: MessageList,
    pub members: MemberList,
    pub status: ConnectionStatus,
}

/// What the text field should do with a key after the widget saw it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The widget handled the key; suppress the field's own behavior.
    PreventDefault,
    /// Let the field handle the key normally.
    Default,
}

/// A mounted widget. Unsubscribes from the channel when dropped.
pub struct WidgetHandle {
    state: Rc<RefCell<WidgetState>>,
    channel: Rc<dyn RealtimeChannel>,
    subscriptions: Vec<Subscription>,
}

/// Wire a fresh widget to `channel`.
pub fn mount(channel: Rc<dyn RealtimeChannel>, options: WidgetOptions) -> WidgetHandle {
    let state = Rc::new(RefCell::new(WidgetState {
        emoji_panel: EmojiPanel::new(options.emojis.clone()),
        input: MessageInput::new(),
        messages: MessageList::new(),
        members: MemberList::default(),
        status: ConnectionStatus::Connecting,
    }));

    let mut subscriptions = Vec::new();

    let target = Rc::clone(&state);
    let time_format = options.time_format.clone();
    let clock = options.clock;
    subscriptions.push(channel.on(
        EVENT_MESSAGE,
        Box::new(move |payload| {
            render_inbound(&mut target.borrow_mut(), payload, clock(), &time_format);
        }),
    ));

    let target = Rc::clone(&state);
    subscriptions.push(channel.on(
        EVENT_USER_LIST,
        Box::new(move |payload| {
            match serde_json::from_value::<UserListUpdate>(payload.clone()) {
                Ok(update) => target
                    .borrow_mut()
                    .members
                    .replace(update.members, update.avatars),
                Err(err) => log::debug!("Dropping malformed user list: {err}"),
            }
        }),
    ));

    let target = Rc::clone(&state);
    subscriptions.push(channel.on(
        EVENT_FONT_COLOR,
        Box::new(move |payload| {
            let Ok(change) = serde_json::from_value::<FontColorChange>(payload.clone()) else {
                log::debug!("Dropping malformed font color change");
                return;
            };
            match egui::Color32::from_hex(&change.color) {
                Ok(color) => target.borrow_mut().members.set_color(&change.user, color),
                Err(_) => log::debug!("Ignoring color `{}` for {}", change.color, change.user),
            }
        }),
    ));

    let target = Rc::clone(&state);
    subscriptions.push(channel.on(
        EVENT_FONT,
        Box::new(move |payload| {
            match serde_json::from_value::<FontChange>(payload.clone()) {
                Ok(change) if !change.font.trim().is_empty() => {
                    target.borrow_mut().members.set_font(&change.user, change.font)
                }
                Ok(_) => {}
                Err(err) => log::debug!("Dropping malformed font change: {err}"),
            }
        }),
    ));

    let target = Rc::clone(&state);
    let time_format = options.time_format.clone();
    subscriptions.push(channel.on(
        EVENT_BROADCAST_CODE,
        Box::new(move |payload| {
            match serde_json::from_value::<CodeBroadcast>(payload.clone()) {
                Ok(shared) if !shared.code.is_empty() && !shared.sender.is_empty() => {
                    let entry = RenderedEntry::code(shared.sender, &shared.code, clock(), &time_format);
                    target.borrow_mut().messages.push(entry);
                }
                Ok(_) => log::debug!("Dropping empty code broadcast"),
                Err(err) => log::debug!("Dropping malformed code broadcast: {err}"),
            }
        }),
    ));

    let target = Rc::clone(&state);
    subscriptions.push(channel.on(
        EVENT_CONNECT,
        Box::new(move |_| target.borrow_mut().status = ConnectionStatus::Connected),
    ));

    let target = Rc::clone(&state);
    subscriptions.push(channel.on(
        EVENT_DISCONNECT,
        Box::new(move |payload| {
            target.borrow_mut().status = ConnectionStatus::Disconnected(payload_text(payload));
        }),
    ));

    let target = Rc::clone(&state);
    subscriptions.push(channel.on(
        EVENT_CONNECT_ERROR,
        Box::new(move |payload| {
            target.borrow_mut().status = ConnectionStatus::Failed(payload_text(payload));
        }),
    ));

    WidgetHandle {
        state,
        channel,
        subscriptions,
    }
}

/// Render one inbound chat payload into `state`. Invalid payloads leave
/// `state` untouched.
fn render_inbound(state: &mut WidgetState, payload: &Value, now: DateTime<Local>, time_format: &str) {
    let Some(inbound) = InboundMessage::from_payload(payload) else {
        log::debug!("Dropping inbound message without name or text");
        return;
    };

    let kind = if inbound.system {
        EntryKind::System
    } else {
        EntryKind::Chat
    };
    let entry = RenderedEntry::new(inbound.name, &inbound.message, now, time_format).with_kind(kind);
    state.messages.push(entry);
}

fn payload_text(payload: &Value) -> String {
    match payload {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl WidgetHandle {
    pub fn state(&self) -> Ref<'_, WidgetState> {
        self.state.borrow()
    }

    pub fn state_mut(&self) -> RefMut<'_, WidgetState> {
        self.state.borrow_mut()
    }

    /// Emoji toggle control was clicked.
    pub fn toggle_emoji_panel(&self) {
        self.state.borrow_mut().emoji_panel.toggle();
    }

    /// Emoji entry `index` was clicked: append it, close the panel, and
    /// give focus back to the input. Returns `false` for an unknown index.
    pub fn click_emoji(&self, index: usize) -> bool {
        let mut state = self.state.borrow_mut();
        let Some(emoji) = state.emoji_panel.entry(index).map(str::to_owned) else {
            return false;
        };
        state.input.append(&emoji);
        state.emoji_panel.hide();
        state.input.focus();
        true
    }

    /// Send the trimmed input as a `message` event and clear the field.
    /// Blank input is left alone and nothing is sent.
    pub fn send_message(&self) -> bool {
        let Some(data) = self.state.borrow().input.trimmed().map(str::to_owned) else {
            return false;
        };

        match serde_json::to_value(OutboundMessage { data }) {
            Ok(payload) => {
                if let Err(err) = self.channel.send(EVENT_MESSAGE, payload) {
                    log::warn!("Failed to hand message to channel: {err}");
                }
            }
            Err(err) => log::warn!("Failed to encode outbound message: {err}"),
        }

        self.state.borrow_mut().input.clear();
        true
    }

    /// A key went down while the input had focus. Enter sends whatever
    /// modifiers are held: the field is single-line, so Shift+Enter has no
    /// newline to insert.
    pub fn on_input_key(&self, key: egui::Key, _modifiers: egui::Modifiers) -> KeyOutcome {
        if key == egui::Key::Enter {
            self.send_message();
            KeyOutcome::PreventDefault
        } else {
            KeyOutcome::Default
        }
    }

    /// Unregister from the channel. Same as dropping the handle.
    pub fn dispose(self) {}
}

impl Drop for WidgetHandle {
    fn drop(&mut self) {
        for subscription in self.subscriptions.drain(..) {
            self.channel.off(subscription);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::MemoryChannel;
    use crate::format::Segment;
    use chrono::TimeZone;
    use serde_json::json;

    fn fixed_clock() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap()
    }

    fn setup() -> (Rc<MemoryChannel>, WidgetHandle) {
        let channel = Rc::new(MemoryChannel::new());
        let options = WidgetOptions {
            clock: fixed_clock,
            ..WidgetOptions::default()
        };
        let handle = mount(channel.clone(), options);
        (channel, handle)
    }

    #[test]
    fn test_blank_input_sends_nothing() {
        let (channel, widget) = setup();
        for blank in ["", " ", "\t\n", "   \r\n  "] {
            widget.state_mut().input.value = blank.to_string();
            assert!(!widget.send_message());
            assert_eq!(widget.state().input.value, blank);
        }
        assert!(channel.sent().is_empty());
    }

    #[test]
    fn test_send_trims_and_clears() {
        let (channel, widget) = setup();
        widget.state_mut().input.value = "  hello world \n".into();

        assert!(widget.send_message());

        assert_eq!(
            channel.sent(),
            vec![("message".to_string(), json!({"data": "hello world"}))]
        );
        assert!(widget.state().input.value.is_empty());
    }

    #[test]
    fn test_send_failure_still_clears_input() {
        let (channel, widget) = setup();
        channel.close();
        widget.state_mut().input.value = "lost".into();
        assert!(widget.send_message());
        assert!(widget.state().input.value.is_empty());
    }

    #[test]
    fn test_enter_sends_and_prevents_default() {
        let (channel, widget) = setup();
        widget.state_mut().input.value = "hi".into();

        assert_eq!(widget.on_input_key(egui::Key::Enter, egui::Modifiers::NONE), KeyOutcome::PreventDefault);
        assert_eq!(channel.sent().len(), 1);

        // Enter on an empty field is still swallowed, but sends nothing.
        assert_eq!(widget.on_input_key(egui::Key::Enter, egui::Modifiers::NONE), KeyOutcome::PreventDefault);
        assert_eq!(channel.sent().len(), 1);
    }

    #[test]
    fn test_enter_with_modifiers_still_sends() {
        let (channel, widget) = setup();
        for (text, modifiers) in [
            ("shift", egui::Modifiers::SHIFT),
            ("ctrl", egui::Modifiers::CTRL),
            ("alt", egui::Modifiers::ALT),
        ] {
            widget.state_mut().input.value = text.into();
            assert_eq!(widget.on_input_key(egui::Key::Enter, modifiers), KeyOutcome::PreventDefault);
            assert!(widget.state().input.value.is_empty());
        }
        let sent: Vec<_> = channel.sent().into_iter().map(|(_, payload)| payload).collect();
        assert_eq!(
            sent,
            vec![json!({"data": "shift"}), json!({"data": "ctrl"}), json!({"data": "alt"})]
        );
    }

    #[test]
    fn test_other_keys_pass_through() {
        let (channel, widget) = setup();
        widget.state_mut().input.value = "hi".into();
        assert_eq!(widget.on_input_key(egui::Key::A, egui::Modifiers::NONE), KeyOutcome::Default);
        assert_eq!(widget.on_input_key(egui::Key::Tab, egui::Modifiers::SHIFT), KeyOutcome::Default);
        assert!(channel.sent().is_empty());
        assert_eq!(widget.state().input.value, "hi");
    }

    #[test]
    fn test_emoji_click_appends_hides_and_focuses() {
        let (_channel, widget) = setup();
        widget.state_mut().input.value = "nice ".into();
        widget.toggle_emoji_panel();
        assert!(widget.state().emoji_panel.is_visible());

        let expected = widget.state().emoji_panel.entry(2).unwrap().to_string();
        assert!(widget.click_emoji(2));

        let state = widget.state();
        assert_eq!(state.input.value, format!("nice {expected}"));
        assert!(!state.emoji_panel.is_visible());
        assert!(state.input.focus_requested());
    }

    #[test]
    fn test_unknown_emoji_index_is_ignored() {
        let (_channel, widget) = setup();
        widget.toggle_emoji_panel();
        assert!(!widget.click_emoji(10_000));
        assert!(widget.state().emoji_panel.is_visible());
    }

    #[test]
    fn test_inbound_with_link() {
        let (channel, widget) = setup();
        channel.deliver("message", json!({"name": "Ann", "message": "see https://example.com/x now"}));

        let state = widget.state();
        let entry = &state.messages.entries()[0];
        assert_eq!(entry.sender, "Ann");
        assert_eq!(entry.body.len(), 3);
        assert_eq!(entry.body[0], Segment::Text("see ".into()));
        assert_eq!(entry.body[2], Segment::Text(" now".into()));

        let link = entry.links().next().unwrap();
        assert_eq!(link.href, "https://example.com/x");
        assert_eq!(link.text(), "https://example.com/x");
        assert_eq!(link.target(), "_blank");
        assert_eq!(link.rel(), "noopener noreferrer");
        assert_eq!(entry.timestamp, "2024-05-01 09:30:00");
    }

    #[test]
    fn test_inbound_without_link() {
        let (channel, widget) = setup();
        channel.deliver("message", json!({"name": "Bo", "message": "no links here"}));

        let state = widget.state();
        let entry = &state.messages.entries()[0];
        assert_eq!(entry.links().count(), 0);
        assert_eq!(entry.body, vec![Segment::Text("no links here".into())]);
        assert!(!entry.to_html().contains("<a "));
    }

    #[test]
    fn test_malformed_inbound_dropped() {
        let (channel, widget) = setup();
        for payload in [
            json!({"name": "", "message": "x"}),
            json!({"name": "Ann"}),
            json!({"message": "x"}),
            json!({"name": null, "message": "x"}),
            json!([1, 2, 3]),
            Value::Null,
        ] {
            channel.deliver("message", payload);
        }
        assert!(widget.state().messages.is_empty());
    }

    #[test]
    fn test_inbound_with_odd_type_still_rendered() {
        let (channel, widget) = setup();
        channel.deliver("message", json!({"name": "Ann", "message": "hi", "type": 1}));
        channel.deliver("message", json!({"name": "Ann", "message": "again", "type": {}}));

        let state = widget.state();
        assert_eq!(state.messages.len(), 2);
        assert!(state.messages.entries().iter().all(|e| e.kind == EntryKind::Chat));
    }

    #[test]
    fn test_font_color_change() {
        let (channel, widget) = setup();
        channel.deliver("fontColorChange", json!({"user": "Ann", "color": "#ff8000"}));
        channel.deliver("fontColorChange", json!({"user": "Bo", "color": "tomato"}));
        channel.deliver("fontColorChange", json!({"color": "#00ff00"}));

        let state = widget.state();
        assert_eq!(
            state.members.style("Ann").and_then(|s| s.color),
            Some(egui::Color32::from_rgb(255, 128, 0))
        );
        assert!(state.members.style("Bo").is_none());
        assert_eq!(state.members.styles.len(), 1);
    }

    #[test]
    fn test_font_change() {
        let (channel, widget) = setup();
        channel.deliver("fontChange", json!({"user": "Bo", "font": "Courier New"}));
        channel.deliver("fontChange", json!({"user": "Ann", "font": "  "}));
        channel.deliver("fontChange", json!({"user": 3, "font": "Arial"}));

        let state = widget.state();
        let style = state.members.style("Bo").unwrap();
        assert_eq!(style.font.as_deref(), Some("Courier New"));
        assert!(style.is_monospace());
        assert!(state.members.style("Ann").is_none());
    }

    #[test]
    fn test_broadcast_code_rendered_as_code_entry() {
        let (channel, widget) = setup();
        channel.deliver(
            "broadcast_code",
            json!({"code": "fn main() {\n    println!(\"https://x.io\");\n}", "sender": "Bo"}),
        );
        channel.deliver("broadcast_code", json!({"code": "", "sender": "Bo"}));
        channel.deliver("broadcast_code", json!({"code": "x"}));

        let state = widget.state();
        assert_eq!(state.messages.len(), 1);
        let entry = &state.messages.entries()[0];
        assert_eq!(entry.kind, EntryKind::Code);
        assert_eq!(entry.sender, "Bo");
        assert_eq!(entry.links().count(), 0);
        assert_eq!(entry.timestamp, "2024-05-01 09:30:00");
        assert!(state.messages.scroll().is_at_end());
    }

    #[test]
    fn test_system_notice_rendered_as_system() {
        let (channel, widget) = setup();
        channel.deliver(
            "message",
            json!({"name": "System", "message": "Bo has left the room", "type": "system"}),
        );
        assert_eq!(widget.state().messages.entries()[0].kind, EntryKind::System);
    }

    #[test]
    fn test_user_list_update() {
        let (channel, widget) = setup();
        channel.deliver(
            "updateUserList",
            json!({"members": ["Ann", "Bo"], "avatars": {"Ann": "/static/avatars/ann.png"}}),
        );
        channel.deliver("updateUserList", json!({"members": "nope"}));

        let state = widget.state();
        assert_eq!(state.members.members, vec!["Ann", "Bo"]);
        assert_eq!(state.members.avatar("Ann"), Some("/static/avatars/ann.png"));
    }

    #[test]
    fn test_connection_status_events() {
        let (channel, widget) = setup();
        assert_eq!(widget.state().status, ConnectionStatus::Connecting);

        channel.deliver("connect", Value::Null);
        assert_eq!(widget.state().status, ConnectionStatus::Connected);

        channel.deliver("disconnect", json!("server closed"));
        assert_eq!(
            widget.state().status,
            ConnectionStatus::Disconnected("server closed".into())
        );

        channel.deliver("connect_error", json!("refused"));
        assert_eq!(widget.state().status, ConnectionStatus::Failed("refused".into()));
    }

    #[test]
    fn test_dispose_unsubscribes() {
        let (channel, widget) = setup();
        assert!(channel.handler_count() > 0);
        widget.dispose();
        assert_eq!(channel.handler_count(), 0);
        assert_eq!(channel.deliver("message", json!({"name": "A", "message": "b"})), 0);
    }

    #[test]
    fn test_remount_on_same_channel() {
        let channel = Rc::new(MemoryChannel::new());
        let first = mount(channel.clone(), WidgetOptions::default());
        drop(first);

        let second = mount(channel.clone(), WidgetOptions::default());
        channel.deliver("message", json!({"name": "A", "message": "b"}));
        assert_eq!(second.state().messages.len(), 1);
    }
}
