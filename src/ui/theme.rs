//! Color themes and shared styling for the chat window.
//!
//! Two palettes (dark and light) with a small semantic color set:
//! surfaces for depth, an accent for links and focus, status colors for
//! the connection indicator, and three text emphasis levels.

use eframe::egui::{self, Color32};

/// Semantic color set used by all panels.
#[derive(Clone, Debug)]
pub struct ChatTheme {
    pub name: String,
    /// 0: app background, 1: side panels, 2: message area, 3: hover
    pub surface: [Color32; 4],
    pub accent: Color32,
    pub success: Color32,
    pub warning: Color32,
    pub error: Color32,
    pub text_primary: Color32,
    pub text_secondary: Color32,
    pub text_muted: Color32,
    pub border: Color32,
}

impl ChatTheme {
    pub fn dark() -> Self {
        Self {
            name: "Dark".to_string(),
            surface: [
                Color32::from_rgb(10, 10, 15),
                Color32::from_rgb(19, 19, 26),
                Color32::from_rgb(28, 28, 38),
                Color32::from_rgb(37, 37, 50),
            ],
            accent: Color32::from_rgb(88, 101, 242),
            success: Color32::from_rgb(67, 181, 129),
            warning: Color32::from_rgb(250, 166, 26),
            error: Color32::from_rgb(240, 71, 71),
            text_primary: Color32::WHITE,
            text_secondary: Color32::from_rgb(185, 187, 190),
            text_muted: Color32::from_rgb(114, 118, 125),
            border: Color32::from_rgb(47, 49, 54),
        }
    }

    pub fn light() -> Self {
        Self {
            name: "Light".to_string(),
            surface: [
                Color32::from_rgb(255, 255, 255),
                Color32::from_rgb(246, 246, 247),
                Color32::from_rgb(242, 243, 245),
                Color32::from_rgb(227, 229, 232),
            ],
            accent: Color32::from_rgb(88, 101, 242),
            success: Color32::from_rgb(67, 181, 129),
            warning: Color32::from_rgb(250, 166, 26),
            error: Color32::from_rgb(240, 71, 71),
            text_primary: Color32::from_rgb(6, 6, 7),
            text_secondary: Color32::from_rgb(79, 86, 96),
            text_muted: Color32::from_rgb(116, 127, 141),
            border: Color32::from_rgb(210, 213, 219),
        }
    }

    /// "light" selects the light palette; anything else is dark.
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            _ => Self::dark(),
        }
    }

    pub fn is_dark(&self) -> bool {
        self.name == "Dark"
    }
}

/// Apply visuals and spacing for `theme` to the whole context.
pub fn apply_app_style(ctx: &egui::Context, theme: &ChatTheme) {
    ctx.set_visuals(if theme.is_dark() {
        egui::Visuals::dark()
    } else {
        egui::Visuals::light()
    });

    let mut style = (*ctx.style()).clone();
    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.button_padding = egui::vec2(10.0, 5.0);
    style.visuals.hyperlink_color = theme.accent;
    style.visuals.widgets.active.bg_fill = theme.accent;
    style.visuals.selection.bg_fill = theme.accent.linear_multiply(0.4);
    ctx.set_style(style);
}

const NICK_COLORS: [Color32; 16] = [
    Color32::from_rgb(231, 76, 60),
    Color32::from_rgb(46, 204, 113),
    Color32::from_rgb(52, 152, 219),
    Color32::from_rgb(155, 89, 182),
    Color32::from_rgb(241, 196, 15),
    Color32::from_rgb(230, 126, 34),
    Color32::from_rgb(26, 188, 156),
    Color32::from_rgb(236, 100, 166),
    Color32::from_rgb(142, 68, 173),
    Color32::from_rgb(41, 128, 185),
    Color32::from_rgb(39, 174, 96),
    Color32::from_rgb(243, 156, 18),
    Color32::from_rgb(192, 57, 43),
    Color32::from_rgb(22, 160, 133),
    Color32::from_rgb(211, 84, 0),
    Color32::from_rgb(102, 178, 255),
];

/// Stable color for a sender name (FNV-1a over the bytes).
pub fn nick_color(nick: &str) -> Color32 {
    let mut hash: u64 = 1469598103934665603u64;
    for b in nick.as_bytes() {
        hash ^= *b as u64;
        hash = hash.wrapping_mul(1099511628211u64);
    }
    let idx = (hash as usize) % NICK_COLORS.len();
    NICK_COLORS[idx]
}
