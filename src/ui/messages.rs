//! Message list rendering.

use eframe::egui;

use crate::buffer::{EntryKind, MemberList, MemberStyle, MessageList, RenderedEntry};
use crate::format::Segment;
use crate::ui::theme::{self, ChatTheme};

/// Render the message list and report its measured layout back to `list`.
/// Senders with a style in `members` are drawn in their chosen color and font.
pub fn render_messages(
    ui: &mut egui::Ui,
    list: &mut MessageList,
    members: &MemberList,
    theme: &ChatTheme,
) {
    let scroll_request = list.take_scroll_request();

    let output = egui::ScrollArea::vertical()
        .auto_shrink([false; 2])
        .stick_to_bottom(true)
        .show(ui, |ui| {
            ui.add_space(8.0);

            if list.is_empty() {
                ui.label(egui::RichText::new("No messages yet").color(theme.text_muted).italics());
            }

            let last = list.len().saturating_sub(1);
            for (index, entry) in list.entries().iter().enumerate() {
                let rect = render_entry(ui, entry, members.style(&entry.sender), theme);
                if index == last && scroll_request.is_some() {
                    ui.scroll_to_rect(rect, Some(egui::Align::BOTTOM));
                }
            }

            ui.add_space(8.0);
        });

    list.sync_layout(
        output.content_size.y,
        output.inner_rect.height(),
        output.state.offset.y,
    );
}

/// One entry: bold sender, body with links, muted timestamp on the right.
fn render_entry(
    ui: &mut egui::Ui,
    entry: &RenderedEntry,
    style: Option<&MemberStyle>,
    theme: &ChatTheme,
) -> egui::Rect {
    let sender_color = style
        .and_then(|s| s.color)
        .unwrap_or_else(|| theme::nick_color(&entry.sender));
    let body_color = style.and_then(|s| s.color).unwrap_or(theme.text_primary);
    let monospace = style.is_some_and(MemberStyle::is_monospace);

    let row = ui.horizontal_wrapped(|ui| {
        ui.spacing_mut().item_spacing.x = 0.0;

        match entry.kind {
            EntryKind::Chat | EntryKind::Code => {
                let sender = ui.add(
                    egui::Label::new(
                        egui::RichText::new(&entry.sender)
                            .strong()
                            .color(sender_color),
                    )
                    .sense(egui::Sense::click()),
                );
                sender.context_menu(|ui| entry_menu(ui, entry));
                ui.label(": ");
                if entry.kind == EntryKind::Code {
                    ui.end_row();
                    render_code(ui, entry, theme);
                } else {
                    render_body(ui, &entry.body, body_color, false, monospace, theme);
                }
            }
            EntryKind::System => {
                render_body(ui, &entry.body, theme.text_muted, true, false, theme);
            }
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let stamp = ui.add(
                egui::Label::new(
                    egui::RichText::new(&entry.timestamp)
                        .small()
                        .color(theme.text_muted),
                )
                .sense(egui::Sense::click()),
            );
            stamp.context_menu(|ui| entry_menu(ui, entry));
        });
    });

    ui.add_space(2.0);
    row.response.rect
}

fn render_body(
    ui: &mut egui::Ui,
    body: &[Segment],
    color: egui::Color32,
    italics: bool,
    monospace: bool,
    theme: &ChatTheme,
) {
    for segment in body {
        match segment {
            Segment::Text(text) => {
                // Word by word so long lines wrap
                for word in text.split_inclusive(char::is_whitespace) {
                    let mut rich = egui::RichText::new(word).color(color);
                    if italics {
                        rich = rich.italics();
                    }
                    if monospace {
                        rich = rich.monospace();
                    }
                    ui.label(rich);
                }
            }
            Segment::Link(link) => {
                ui.add(
                    egui::Hyperlink::from_label_and_url(
                        egui::RichText::new(link.text()).color(theme.accent),
                        &link.href,
                    )
                    .open_in_new_tab(true),
                )
                .on_hover_text(&link.href);
            }
        }
    }
}

/// Shared code: a framed monospace block, no wrapping or link detection.
fn render_code(ui: &mut egui::Ui, entry: &RenderedEntry, theme: &ChatTheme) {
    let code = crate::format::segments_to_plain(&entry.body);
    egui::Frame::new()
        .fill(theme.surface[3])
        .corner_radius(4.0)
        .inner_margin(egui::Margin::same(6))
        .show(ui, |ui| {
            ui.add(
                egui::Label::new(egui::RichText::new(code).monospace().color(theme.text_primary))
                    .extend(),
            );
        });
}

fn entry_menu(ui: &mut egui::Ui, entry: &RenderedEntry) {
    if ui.button("Copy text").clicked() {
        ui.ctx().copy_text(entry.plain_text());
        ui.close_menu();
    }
    if ui.button("Copy as HTML").clicked() {
        ui.ctx().copy_text(entry.to_html());
        ui.close_menu();
    }
}
