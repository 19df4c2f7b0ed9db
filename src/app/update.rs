//! Main update loop

use eframe::egui;
use std::time::Duration;

use super::ChatApp;
use crate::ui;
use crate::ui::header::HeaderAction;

impl eframe::App for ChatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Dispatch network events to the widget
        let processed = self.channel.pump();
        if processed > 0 {
            log::trace!("Dispatched {processed} backend events");
        }

        // Keep polling the backend queue
        ctx.request_repaint_after(Duration::from_millis(100));

        let theme = self.theme.clone();

        let header_action = egui::TopBottomPanel::top("header")
            .frame(
                egui::Frame::new()
                    .fill(theme.surface[1])
                    .inner_margin(egui::Margin::symmetric(12, 8))
                    .stroke(egui::Stroke::new(1.0, theme.border)),
            )
            .show(ctx, |ui| {
                let status = self.widget.state().status.clone();
                ui::header::render_header(ui, self.room(), self.name(), &status, &theme)
            })
            .inner;
        if header_action == Some(HeaderAction::Reconnect) {
            self.connect();
        }

        egui::TopBottomPanel::bottom("input_panel")
            .frame(
                egui::Frame::new()
                    .fill(theme.surface[2])
                    .inner_margin(egui::Margin::symmetric(12, 8)),
            )
            .show(ctx, |ui| {
                ui::input::render_emoji_panel(ui, &self.widget, &theme);
                ui.add_space(4.0);
                ui::input::render_input_bar(ui, &self.widget, &theme);
            });

        {
            let state = self.widget.state();
            ui::members::render_member_list(ctx, &state.members, &theme);
        }

        egui::CentralPanel::default()
            .frame(
                egui::Frame::new()
                    .fill(theme.surface[0])
                    .inner_margin(egui::Margin::symmetric(12, 8)),
            )
            .show(ctx, |ui| {
                let mut guard = self.widget.state_mut();
                let state = &mut *guard;
                ui::messages::render_messages(ui, &mut state.messages, &state.members, &theme);
            });
    }
}
