//! Room member side panel.

use eframe::egui;

use crate::buffer::MemberList;
use crate::ui::theme::{self, ChatTheme};

pub fn render_member_list(ctx: &egui::Context, members: &MemberList, theme: &ChatTheme) {
    egui::SidePanel::right("members_panel")
        .resizable(true)
        .default_width(160.0)
        .min_width(120.0)
        .frame(
            egui::Frame::new()
                .fill(theme.surface[1])
                .inner_margin(egui::Margin::same(8))
                .stroke(egui::Stroke::new(1.0, theme.border)),
        )
        .show(ctx, |ui| {
            ui.label(
                egui::RichText::new(format!("MEMBERS ({})", members.members.len()))
                    .small()
                    .strong()
                    .color(theme.text_muted),
            );
            ui.add_space(4.0);

            egui::ScrollArea::vertical()
                .auto_shrink([false; 2])
                .show(ui, |ui| {
                    for member in &members.members {
                        let color = members
                            .style(member)
                            .and_then(|style| style.color)
                            .unwrap_or_else(|| theme::nick_color(member));
                        let label = ui.label(egui::RichText::new(member).color(color));
                        if let Some(avatar) = members.avatar(member) {
                            label.on_hover_text(avatar);
                        }
                    }
                });
        });
}
