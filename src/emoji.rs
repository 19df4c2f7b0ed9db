//! Emoji picker panel state.

/// Emojis offered when the settings don't list any.
pub const DEFAULT_EMOJIS: &[&str] = &[
    "😀", "😂", "😊", "😍", "😎", "😢", "😡", "👍", "👎", "👏", "🙏", "🎉", "❤️", "🔥", "✨",
    "🤔",
];

/// The picker panel: a visibility flag and its entries, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmojiPanel {
    visible: bool,
    entries: Vec<String>,
}

impl Default for EmojiPanel {
    fn default() -> Self {
        Self::new(DEFAULT_EMOJIS.iter().map(|e| (*e).to_string()).collect())
    }
}

impl EmojiPanel {
    /// A hidden panel holding `entries`.
    pub fn new(entries: Vec<String>) -> Self {
        Self {
            visible: false,
            entries,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Flip between shown and hidden.
    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn entry(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }
}
