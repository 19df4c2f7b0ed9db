//! Message body formatting: URL detection and HTML-safe markup.
//!
//! Bodies are never turned into markup by pasting raw text together.
//! [`linkify`] splits a message into plain-text and link segments; markup
//! is only produced from those segments by [`segments_to_html`], which
//! escapes every piece of text it emits.

use once_cell::sync::Lazy;
use regex::Regex;

static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://[^\s]+").expect("URL regex pattern is valid"));

/// Browsing context links open in.
pub const LINK_TARGET: &str = "_blank";
/// Keeps the opened page from reaching back into this one.
pub const LINK_REL: &str = "noopener noreferrer";

/// A run of message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Link(Link),
}

/// A detected URL. `href` and the visible text are the same string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub href: String,
}

impl Link {
    pub fn text(&self) -> &str {
        &self.href
    }

    pub fn target(&self) -> &'static str {
        LINK_TARGET
    }

    pub fn rel(&self) -> &'static str {
        LINK_REL
    }
}

/// Split `message` into text and link segments.
///
/// Every `http://` or `https://` followed by at least one non-whitespace
/// character becomes a link, wherever it appears. Nothing else about the
/// URL is checked.
pub fn linkify(message: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut last = 0;

    for m in URL_RE.find_iter(message) {
        if m.start() > last {
            segments.push(Segment::Text(message[last..m.start()].to_string()));
        }
        segments.push(Segment::Link(Link {
            href: m.as_str().to_string(),
        }));
        last = m.end();
    }

    if last < message.len() {
        segments.push(Segment::Text(message[last..].to_string()));
    }

    segments
}

/// Escape text for use in HTML element content and quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Render segments as markup. Text is escaped; links become anchors whose
/// attribute values and content are escaped too.
pub fn segments_to_html(segments: &[Segment]) -> String {
    let mut html = String::new();
    for segment in segments {
        match segment {
            Segment::Text(text) => html.push_str(&escape_html(text)),
            Segment::Link(link) => {
                let href = escape_html(&link.href);
                html.push_str(&format!(
                    r#"<a href="{href}" target="{}" rel="{}">{href}</a>"#,
                    link.target(),
                    link.rel(),
                ));
            }
        }
    }
    html
}

/// The original text, reassembled.
pub fn segments_to_plain(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|segment| match segment {
            Segment::Text(text) => text.as_str(),
            Segment::Link(link) => link.text(),
        })
        .collect()
}
