//! Rendered chat entries, the message list that holds them, and the room
//! member list.

use std::collections::BTreeMap;

use chrono::{DateTime, Local};
use eframe::egui::Color32;

use crate::format::{self, Segment};

/// Height assumed for an entry until the renderer reports real layout.
pub const ESTIMATED_ENTRY_HEIGHT: f32 = 22.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    /// A line typed by a room member
    Chat,
    /// A server notice (joins, leaves)
    System,
    /// A shared code snippet, shown verbatim in monospace
    Code,
}

/// One displayed chat line.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedEntry {
    pub sender: String,
    pub body: Vec<Segment>,
    /// Local time the entry was rendered, not when it was sent.
    pub received_at: DateTime<Local>,
    /// `received_at` formatted for display
    pub timestamp: String,
    pub kind: EntryKind,
}

impl RenderedEntry {
    pub fn new(sender: String, message: &str, received_at: DateTime<Local>, time_format: &str) -> Self {
        Self {
            sender,
            body: format::linkify(message),
            timestamp: received_at.format(time_format).to_string(),
            received_at,
            kind: EntryKind::Chat,
        }
    }

    /// A `broadcast_code` entry. The code is kept as one text segment;
    /// URLs inside it are not turned into links.
    pub fn code(sender: String, code: &str, received_at: DateTime<Local>, time_format: &str) -> Self {
        Self {
            sender,
            body: vec![Segment::Text(code.to_string())],
            timestamp: received_at.format(time_format).to_string(),
            received_at,
            kind: EntryKind::Code,
        }
    }

    pub fn with_kind(mut self, kind: EntryKind) -> Self {
        self.kind = kind;
        self
    }

    /// Markup for this entry. Every piece of text is escaped; the only
    /// elements produced are the ones written here plus link anchors.
    pub fn to_html(&self) -> String {
        let body = format::segments_to_html(&self.body);
        let timestamp = format::escape_html(&self.timestamp);
        match self.kind {
            EntryKind::Chat => format!(
                r#"<span><strong>{}</strong>: {body}</span> <span class="muted">{timestamp}</span>"#,
                format::escape_html(&self.sender),
            ),
            EntryKind::System => format!(
                r#"<span class="system">{body}</span> <span class="muted">{timestamp}</span>"#
            ),
            EntryKind::Code => format!(
                r#"<span><strong>{}</strong>:</span><pre><code>{body}</code></pre> <span class="muted">{timestamp}</span>"#,
                format::escape_html(&self.sender),
            ),
        }
    }

    /// `sender: message` as plain text.
    pub fn plain_text(&self) -> String {
        let body = format::segments_to_plain(&self.body);
        match self.kind {
            EntryKind::Chat | EntryKind::Code => format!("{}: {}", self.sender, body),
            EntryKind::System => body,
        }
    }

    pub fn links(&self) -> impl Iterator<Item = &format::Link> {
        self.body.iter().filter_map(|segment| match segment {
            Segment::Link(link) => Some(link),
            Segment::Text(_) => None,
        })
    }
}

/// Vertical scroll geometry of the message list.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollPosition {
    pub offset: f32,
    pub content_height: f32,
    pub viewport_height: f32,
}

impl ScrollPosition {
    pub fn max_offset(&self) -> f32 {
        (self.content_height - self.viewport_height).max(0.0)
    }

    pub fn is_at_end(&self) -> bool {
        self.offset >= self.max_offset()
    }
}

/// The message list container.
#[derive(Default, Clone, Debug)]
pub struct MessageList {
    entries: Vec<RenderedEntry>,
    scroll: ScrollPosition,
    /// The renderer still has to apply `scroll.offset`
    scroll_pending: bool,
}

impl MessageList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry and scroll so it is fully visible.
    pub fn push(&mut self, entry: RenderedEntry) {
        self.entries.push(entry);
        self.scroll.content_height += ESTIMATED_ENTRY_HEIGHT;
        self.scroll_to_end();
    }

    pub fn scroll_to_end(&mut self) {
        self.scroll.offset = self.scroll.max_offset();
        self.scroll_pending = true;
    }

    pub fn entries(&self) -> &[RenderedEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn scroll(&self) -> ScrollPosition {
        self.scroll
    }

    /// Offset the renderer should jump to this frame, if any.
    pub fn take_scroll_request(&mut self) -> Option<f32> {
        if std::mem::take(&mut self.scroll_pending) {
            Some(self.scroll.offset)
        } else {
            None
        }
    }

    /// Record the geometry the renderer measured. A scroll still waiting
    /// to be applied is re-targeted at the new end.
    pub fn sync_layout(&mut self, content_height: f32, viewport_height: f32, offset: f32) {
        self.scroll.content_height = content_height;
        self.scroll.viewport_height = viewport_height;
        if self.scroll_pending {
            self.scroll.offset = self.scroll.max_offset();
        } else {
            self.scroll.offset = offset.clamp(0.0, self.scroll.max_offset());
        }
    }
}

/// Per-member text styling announced by the server.
#[derive(Default, Clone, Debug, PartialEq)]
pub struct MemberStyle {
    pub color: Option<Color32>,
    /// Font family name as the member picked it
    pub font: Option<String>,
}

impl MemberStyle {
    /// Whether `font` names a fixed-width family. egui only ships one
    /// proportional and one monospace family, so that is all we can honor.
    pub fn is_monospace(&self) -> bool {
        self.font.as_deref().is_some_and(|font| {
            let font = font.to_ascii_lowercase();
            ["mono", "courier", "consolas", "code"]
                .iter()
                .any(|hint| font.contains(hint))
        })
    }
}

/// Members of the current room, as last announced by the server.
#[derive(Default, Clone, Debug, PartialEq)]
pub struct MemberList {
    pub members: Vec<String>,
    pub avatars: BTreeMap<String, String>,
    /// Survives member list updates; the server only resends styles on join.
    pub styles: BTreeMap<String, MemberStyle>,
}

impl MemberList {
    pub fn replace(&mut self, members: Vec<String>, avatars: BTreeMap<String, String>) {
        self.members = members;
        self.avatars = avatars;
    }

    pub fn avatar(&self, member: &str) -> Option<&str> {
        self.avatars.get(member).map(String::as_str)
    }

    pub fn style(&self, member: &str) -> Option<&MemberStyle> {
        self.styles.get(member)
    }

    pub fn set_color(&mut self, member: &str, color: Color32) {
        self.styles.entry(member.to_string()).or_default().color = Some(color);
    }

    pub fn set_font(&mut self, member: &str, font: String) {
        self.styles.entry(member.to_string()).or_default().font = Some(font);
    }
}
