//! Top bar: room name, own name, connection status.

use eframe::egui;

use crate::ui::theme::ChatTheme;
use crate::widget::ConnectionStatus;

/// What the user clicked in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderAction {
    Reconnect,
}

pub fn render_header(
    ui: &mut egui::Ui,
    room: &str,
    name: &str,
    status: &ConnectionStatus,
    theme: &ChatTheme,
) -> Option<HeaderAction> {
    let mut action = None;

    ui.horizontal(|ui| {
        ui.heading(egui::RichText::new(room).strong().color(theme.text_primary));
        ui.label(egui::RichText::new(format!("as {name}")).color(theme.text_secondary));

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let (color, text) = status_line(status, theme);
            if matches!(
                status,
                ConnectionStatus::Disconnected(_) | ConnectionStatus::Failed(_)
            ) && ui.small_button("Reconnect").clicked()
            {
                action = Some(HeaderAction::Reconnect);
            }
            ui.label(egui::RichText::new(text).small().color(color));
            ui.label(egui::RichText::new("●").color(color));
        });
    });

    action
}

fn status_line(status: &ConnectionStatus, theme: &ChatTheme) -> (egui::Color32, String) {
    match status {
        ConnectionStatus::Connecting => (theme.warning, "Connecting…".to_string()),
        ConnectionStatus::Connected => (theme.success, "Connected".to_string()),
        ConnectionStatus::Disconnected(reason) if reason.is_empty() => {
            (theme.text_muted, "Disconnected".to_string())
        }
        ConnectionStatus::Disconnected(reason) => {
            (theme.text_muted, format!("Disconnected: {reason}"))
        }
        ConnectionStatus::Failed(message) => (theme.error, format!("Error: {message}")),
    }
}
