//! Integration tests for fiaskchat-client
//!
//! These tests drive a mounted widget through whole conversations, both
//! over the in-memory channel and over the socket channel with a fake
//! backend on the other end of its queues.

#[cfg(test)]
mod integration_tests {
    use crate::buffer::EntryKind;
    use crate::channel::{MemoryChannel, RealtimeChannel};
    use crate::protocol::{BackendAction, Frame, GuiEvent};
    use crate::socket::SocketChannel;
    use crate::widget::{mount, ConnectionStatus, KeyOutcome, WidgetOptions};
    use chrono::{DateTime, Local, TimeZone};
    use crossbeam_channel::unbounded;
    use eframe::egui;
    use serde_json::json;
    use std::rc::Rc;

    fn noon() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 1, 2, 12, 0, 0).unwrap()
    }

    fn options() -> WidgetOptions {
        WidgetOptions {
            clock: noon,
            ..WidgetOptions::default()
        }
    }

    /// N inbound events give N entries, in order, each scrolled into view
    #[test]
    fn test_conversation_renders_in_order() {
        let channel = Rc::new(MemoryChannel::new());
        let widget = mount(channel.clone(), options());

        for i in 0..25 {
            channel.deliver(
                "message",
                json!({"name": format!("user{}", i % 3), "message": format!("line {i}")}),
            );
            let state = widget.state();
            assert_eq!(state.messages.len(), i + 1);
            let scroll = state.messages.scroll();
            assert_eq!(scroll.offset, scroll.max_offset());
        }

        let state = widget.state();
        for (i, entry) in state.messages.entries().iter().enumerate() {
            assert_eq!(entry.plain_text(), format!("user{}: line {i}", i % 3));
            assert_eq!(entry.timestamp, "2024-01-02 12:00:00");
        }
    }

    /// Hostile markup arrives as text, never as markup
    #[test]
    fn test_markup_is_escaped_in_html_export() {
        let channel = Rc::new(MemoryChannel::new());
        let widget = mount(channel.clone(), options());

        channel.deliver(
            "message",
            json!({"name": "<b>Eve</b>", "message": "<script>alert(1)</script> https://evil.example/?a=1&b=2"}),
        );

        let state = widget.state();
        let html = state.messages.entries()[0].to_html();
        assert!(!html.contains("<script>"));
        assert!(!html.contains("<b>Eve"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains(
            r#"<a href="https://evil.example/?a=1&amp;b=2" target="_blank" rel="noopener noreferrer">"#
        ));
    }

    /// Pick an emoji, then press Enter
    #[test]
    fn test_emoji_then_enter_sends_combined_text() {
        let channel = Rc::new(MemoryChannel::new());
        let widget = mount(channel.clone(), options());

        widget.state_mut().input.value = "good morning ".into();
        widget.toggle_emoji_panel();
        let emoji = widget.state().emoji_panel.entry(0).unwrap().to_string();
        assert!(widget.click_emoji(0));
        assert!(widget.state_mut().input.take_focus_request());

        assert_eq!(widget.on_input_key(egui::Key::Enter, egui::Modifiers::NONE), KeyOutcome::PreventDefault);
        assert_eq!(
            channel.take_sent(),
            vec![("message".to_string(), json!({"data": format!("good morning {emoji}")}))]
        );
        assert!(widget.state().input.value.is_empty());
        assert!(!widget.state().emoji_panel.is_visible());
    }

    /// Sending does not echo locally; the server's broadcast is what shows up
    #[test]
    fn test_send_waits_for_broadcast() {
        let channel = Rc::new(MemoryChannel::new());
        let widget = mount(channel.clone(), options());

        widget.state_mut().input.value = "ping".into();
        widget.send_message();
        assert!(widget.state().messages.is_empty());

        channel.deliver("message", json!({"name": "Ann", "message": "ping"}));
        assert_eq!(widget.state().messages.len(), 1);
    }

    /// A second widget on the same channel sees the same traffic
    #[test]
    fn test_two_widgets_share_a_channel() {
        let channel = Rc::new(MemoryChannel::new());
        let first = mount(channel.clone(), options());
        let second = mount(channel.clone(), options());

        assert_eq!(channel.deliver("message", json!({"name": "A", "message": "b"})), 2);
        assert_eq!(first.state().messages.len(), 1);
        assert_eq!(second.state().messages.len(), 1);

        first.dispose();
        assert_eq!(channel.deliver("message", json!({"name": "A", "message": "c"})), 1);
        assert_eq!(second.state().messages.len(), 2);
    }

    /// Full round trip through the socket channel's queues
    #[test]
    fn test_socket_channel_drives_widget() {
        let (action_tx, action_rx) = unbounded::<BackendAction>();
        let (event_tx, event_rx) = unbounded::<GuiEvent>();
        let channel = Rc::new(SocketChannel::from_parts(action_tx, event_rx));
        let widget = mount(channel.clone(), options());

        event_tx.send(GuiEvent::Connected).unwrap();
        event_tx
            .send(GuiEvent::Frame(Frame::new(
                "updateUserList",
                json!({"members": ["Ann", "Bo"]}),
            )))
            .unwrap();
        event_tx
            .send(GuiEvent::Frame(Frame::new(
                "message",
                json!({"name": "System", "message": "Bo joined", "type": "system"}),
            )))
            .unwrap();

        // Nothing reaches the widget until the UI thread pumps
        assert!(widget.state().messages.is_empty());
        assert_eq!(channel.pump(), 3);

        {
            let state = widget.state();
            assert_eq!(state.status, ConnectionStatus::Connected);
            assert_eq!(state.members.members, vec!["Ann", "Bo"]);
            assert_eq!(state.messages.entries()[0].kind, EntryKind::System);
        }

        widget.state_mut().input.value = " hi Bo ".into();
        assert!(widget.send_message());
        match action_rx.try_recv() {
            Ok(BackendAction::Emit { event, payload }) => {
                assert_eq!(event, "message");
                assert_eq!(payload, json!({"data": "hi Bo"}));
            }
            other => panic!("Expected Emit, got {other:?}"),
        }

        event_tx
            .send(GuiEvent::Disconnected("Server closed the connection".into()))
            .unwrap();
        channel.pump();
        assert_eq!(
            widget.state().status,
            ConnectionStatus::Disconnected("Server closed the connection".into())
        );
    }

    /// Events for names nobody subscribed to are ignored
    #[test]
    fn test_unknown_events_are_ignored() {
        let channel = Rc::new(MemoryChannel::new());
        let widget = mount(channel.clone(), options());
        assert_eq!(channel.deliver("typing", json!({"name": "Ann"})), 0);
        assert!(widget.state().messages.is_empty());
        assert!(channel.send("typing", json!({})).is_ok());
    }
}
