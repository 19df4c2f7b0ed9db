//! Input row (emoji toggle, text field, send button) and the emoji picker.

use eframe::egui;

use crate::ui::theme::ChatTheme;
use crate::widget::{KeyOutcome, WidgetHandle};

const INPUT_ID: &str = "message_input";

/// Render the input row at the bottom of the window.
pub fn render_input_bar(ui: &mut egui::Ui, widget: &WidgetHandle, theme: &ChatTheme) {
    ui.horizontal(|ui| {
        let picker_open = widget.state().emoji_panel.is_visible();
        let toggle = ui
            .selectable_label(picker_open, egui::RichText::new("😀").size(18.0))
            .on_hover_text("Emoji");
        if toggle.clicked() {
            widget.toggle_emoji_panel();
        }

        let input_id = egui::Id::new(INPUT_ID);
        let has_focus = ui.memory(|m| m.has_focus(input_id));

        // The widget decides about Enter before the text edit sees it
        let enter = if has_focus {
            ui.input(|i| {
                i.events.iter().find_map(|event| match event {
                    egui::Event::Key {
                        key: egui::Key::Enter,
                        pressed: true,
                        modifiers,
                        ..
                    } => Some(*modifiers),
                    _ => None,
                })
            })
        } else {
            None
        };
        if let Some(modifiers) = enter {
            if widget.on_input_key(egui::Key::Enter, modifiers) == KeyOutcome::PreventDefault {
                ui.input_mut(|i| i.consume_key(modifiers, egui::Key::Enter));
            }
        }

        let send_width = 64.0;
        let response = {
            let mut state = widget.state_mut();
            ui.add(
                egui::TextEdit::singleline(&mut state.input.value)
                    .id(input_id)
                    .desired_width(ui.available_width() - send_width)
                    .hint_text("Type a message... (Enter to send)"),
            )
        };

        if response.has_focus() {
            let outer = response.rect.expand(2.0);
            ui.painter()
                .rect_stroke(outer, 6.0, egui::Stroke::new(1.0, theme.accent), egui::StrokeKind::Outside);
        }

        if enter.is_some() || widget.state_mut().input.take_focus_request() {
            response.request_focus();
        }

        if ui.button("Send").clicked() {
            widget.send_message();
            response.request_focus();
        }
    });
}

/// Render the emoji picker above the input row when it is open.
pub fn render_emoji_panel(ui: &mut egui::Ui, widget: &WidgetHandle, theme: &ChatTheme) {
    if !widget.state().emoji_panel.is_visible() {
        return;
    }

    let entries: Vec<String> = widget.state().emoji_panel.entries().to_vec();

    egui::Frame::new()
        .fill(theme.surface[3])
        .corner_radius(6.0)
        .inner_margin(egui::Margin::same(6))
        .show(ui, |ui| {
            ui.horizontal_wrapped(|ui| {
                for (index, emoji) in entries.iter().enumerate() {
                    let button = egui::Button::new(egui::RichText::new(emoji).size(20.0)).frame(false);
                    if ui.add(button).clicked() {
                        widget.click_emoji(index);
                    }
                }
            });
        });
}
