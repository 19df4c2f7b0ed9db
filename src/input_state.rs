//! Message input state.
//!
//! Holds the text being composed and the focus request the renderer
//! consumes on the next frame.

/// The message text field.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MessageInput {
    /// Current value of the field
    pub value: String,

    /// Set when something asked for focus; cleared by the renderer once
    /// the text edit actually has it.
    focus_requested: bool,
}

impl MessageInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append literal text at the end of the current value.
    pub fn append(&mut self, text: &str) {
        self.value.push_str(text);
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }

    /// The value with surrounding whitespace removed, or `None` if nothing
    /// is left.
    pub fn trimmed(&self) -> Option<&str> {
        let trimmed = self.value.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }

    pub fn focus(&mut self) {
        self.focus_requested = true;
    }

    pub fn focus_requested(&self) -> bool {
        self.focus_requested
    }

    /// Returns whether focus was pending, and clears the request.
    pub fn take_focus_request(&mut self) -> bool {
        std::mem::take(&mut self.focus_requested)
    }
}
