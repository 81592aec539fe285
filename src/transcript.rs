//! Scrollback transcript: role-tagged messages with streaming support.
//!
//! Messages are appended whole, or built incrementally through the streaming
//! slot: `start_streaming` opens an assistant message, `stream_chunk`
//! appends to it, `stream_complete` moves it into the message sequence. At
//! most one streaming message exists; starting a new stream silently
//! discards an unfinished one. The streaming message always renders as the
//! logically-last message.
//!
//! Rendering expands messages into a flat list of pre-styled display lines
//! (headers, word-wrapped body text, fenced code blocks), then windows that
//! list by a clamped scroll offset. Rendering is pure: same messages, theme,
//! labels, and width always produce the same lines.

use unicode_width::UnicodeWidthStr;

use crate::ansi;
use crate::theme::{Color, Theme};

/// Who a message is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// The assistant (default streaming role).
    Assistant,
    /// The human operator.
    User,
    /// The engine or host application.
    System,
}

/// One transcript entry.
#[derive(Debug, Clone)]
pub struct Message {
    /// Attribution used to pick header label and color.
    pub role: Role,
    /// Optional per-message label overriding the role's display label.
    pub label: Option<String>,
    /// Body text; may contain fenced ``` code blocks.
    pub content: String,
}

/// Labels and flags the renderer needs beyond the messages themselves.
#[derive(Debug, Clone)]
pub struct RenderOpts {
    /// Display label for [`Role::User`].
    pub user_label: String,
    /// Display label for [`Role::Assistant`].
    pub assistant_label: String,
    /// Display label for [`Role::System`].
    pub system_label: String,
    /// Suppress all role headers.
    pub hide_headers: bool,
}

impl Default for RenderOpts {
    fn default() -> Self {
        Self {
            user_label: "You".to_string(),
            assistant_label: "Assistant".to_string(),
            system_label: "System".to_string(),
            hide_headers: false,
        }
    }
}

/// Append-only message log with a streaming slot and a scroll offset.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<Message>,
    streaming: Option<Message>,
    /// Lines scrolled up from the bottom of the rendered output.
    scroll: usize,
}

impl Transcript {
    /// Empty transcript.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a complete message.
    pub fn push(&mut self, role: Role, content: &str) {
        self.messages.push(Message {
            role,
            label: None,
            content: content.to_string(),
        });
    }

    /// Append a complete message with a label override.
    pub fn push_as(&mut self, role: Role, label: &str, content: &str) {
        self.messages.push(Message {
            role,
            label: Some(label.to_string()),
            content: content.to_string(),
        });
    }

    /// Open a streaming assistant message with empty content.
    ///
    /// An unfinished streaming message is discarded silently.
    pub fn start_streaming(&mut self) {
        self.streaming = Some(Message {
            role: Role::Assistant,
            label: None,
            content: String::new(),
        });
    }

    /// Like [`Transcript::start_streaming`] with a label override.
    pub fn start_streaming_as(&mut self, label: &str) {
        self.streaming = Some(Message {
            role: Role::Assistant,
            label: Some(label.to_string()),
            content: String::new(),
        });
    }

    /// Append text to the streaming message. No-op when no stream is open.
    pub fn stream_chunk(&mut self, chunk: &str) {
        if let Some(msg) = self.streaming.as_mut() {
            msg.content.push_str(chunk);
        }
    }

    /// Finalize the streaming message into the message sequence.
    ///
    /// The scroll offset is deliberately left alone so a reader who scrolled
    /// up is not yanked back to the bottom.
    pub fn stream_complete(&mut self) {
        if let Some(msg) = self.streaming.take() {
            self.messages.push(msg);
        }
    }

    /// True while a streaming message is open.
    #[must_use]
    pub fn is_streaming(&self) -> bool {
        self.streaming.is_some()
    }

    /// Number of finalized messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// True when there are no messages and no open stream.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty() && self.streaming.is_none()
    }

    /// The finalized messages.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Drop all messages, any open stream, and reset scroll.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.streaming = None;
        self.scroll = 0;
    }

    /// Current scroll offset (lines up from the bottom).
    #[must_use]
    pub fn scroll(&self) -> usize {
        self.scroll
    }

    /// Scroll up by `n` lines, clamped to `max`.
    pub fn scroll_up(&mut self, n: usize, max: usize) {
        self.scroll = self.scroll.saturating_add(n).min(max);
    }

    /// Scroll down by `n` lines toward the live bottom.
    pub fn scroll_down(&mut self, n: usize) {
        self.scroll = self.scroll.saturating_sub(n);
    }

    /// Jump back to the live bottom.
    pub fn scroll_to_bottom(&mut self) {
        self.scroll = 0;
    }

    /// Render all messages (streaming last) into styled display lines of at
    /// most `width` cells each.
    #[must_use]
    pub fn render_lines(&self, theme: &Theme, opts: &RenderOpts, width: usize) -> Vec<String> {
        let mut out = Vec::new();
        let all = self.messages.iter().chain(self.streaming.iter());
        for (i, msg) in all.enumerate() {
            if i > 0 {
                out.push(String::new());
            }
            render_message(msg, theme, opts, width, &mut out);
        }
        out
    }

    /// Window `lines` to `height` rows honoring the scroll offset, clamping
    /// the offset into `[0, total - height]`.
    #[must_use]
    pub fn window<'a>(&self, lines: &'a [String], height: usize) -> &'a [String] {
        let total = lines.len();
        if total <= height {
            return lines;
        }
        let max_scroll = total - height;
        let scroll = self.scroll.min(max_scroll);
        let start = total - height - scroll;
        &lines[start..start + height]
    }

    /// Largest valid scroll offset for the given rendered total and height.
    #[must_use]
    pub fn max_scroll(total: usize, height: usize) -> usize {
        total.saturating_sub(height)
    }
}

fn role_color(role: Role, theme: &Theme) -> Color {
    match role {
        Role::User => theme.user,
        Role::Assistant => theme.assistant,
        Role::System => theme.system,
    }
}

fn role_label<'a>(msg: &'a Message, opts: &'a RenderOpts) -> &'a str {
    if let Some(label) = msg.label.as_deref() {
        return label;
    }
    match msg.role {
        Role::User => &opts.user_label,
        Role::Assistant => &opts.assistant_label,
        Role::System => &opts.system_label,
    }
}

fn render_message(
    msg: &Message,
    theme: &Theme,
    opts: &RenderOpts,
    width: usize,
    out: &mut Vec<String>,
) {
    let width = width.max(1);
    let label = role_label(msg, opts);
    if !opts.hide_headers && !label.is_empty() {
        out.push(header_rule(label, role_color(msg.role, theme), width));
    }

    let mut in_code = false;
    for raw in msg.content.split('\n') {
        if raw.trim_start().starts_with("```") {
            // Fence delimiter; the opening fence's language tag is discarded
            // along with the fence itself.
            in_code = !in_code;
            continue;
        }
        if in_code {
            render_code_line(raw, theme, width, out);
        } else {
            wrap_text_line(raw, width, out);
        }
    }
}

/// Header framed as a horizontal rule: `── label ──────`.
fn header_rule(label: &str, color: Color, width: usize) -> String {
    let prefix = "── ";
    let used = prefix.width() + label.width() + 1;
    let fill = width.saturating_sub(used);
    format!(
        "{}{}{prefix}{label} {}{}",
        ansi::fg(color),
        ansi::BOLD,
        "─".repeat(fill),
        ansi::RESET
    )
}

/// One code-block line: code background, padded to the full region width,
/// hard-split when longer than the width.
fn render_code_line(raw: &str, theme: &Theme, width: usize, out: &mut Vec<String>) {
    let chunks = split_to_width(raw, width);
    for chunk in chunks {
        let pad = width.saturating_sub(chunk.width());
        out.push(format!(
            "{}{}{}{}",
            ansi::bg(theme.code_bg),
            chunk,
            " ".repeat(pad),
            ansi::RESET
        ));
    }
}

/// Word-wrap one logical line to `width` cells; overlong unbroken tokens are
/// hard-split.
fn wrap_text_line(raw: &str, width: usize, out: &mut Vec<String>) {
    if raw.is_empty() {
        out.push(String::new());
        return;
    }
    let mut current = String::new();
    let mut current_width = 0;
    for word in raw.split(' ') {
        for piece in split_to_width(word, width) {
            let piece_width = piece.width();
            let sep = usize::from(!current.is_empty());
            if current_width + sep + piece_width > width && !current.is_empty() {
                out.push(std::mem::take(&mut current));
                current_width = 0;
            }
            if !current.is_empty() {
                current.push(' ');
                current_width += 1;
            }
            current.push_str(&piece);
            current_width += piece_width;
        }
    }
    out.push(current);
}

/// Split `s` into pieces of at most `width` display cells.
fn split_to_width(s: &str, width: usize) -> Vec<String> {
    if s.width() <= width {
        return vec![s.to_string()];
    }
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let cw = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if current_width + cw > width && !current.is_empty() {
            pieces.push(std::mem::take(&mut current));
            current_width = 0;
        }
        current.push(c);
        current_width += cw;
    }
    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::DEFAULT_THEME;

    fn plain(lines: &[String]) -> Vec<String> {
        // Strip ANSI sequences for content assertions.
        lines
            .iter()
            .map(|l| {
                let mut out = String::new();
                let mut chars = l.chars();
                while let Some(c) = chars.next() {
                    if c == '\x1b' {
                        for e in chars.by_ref() {
                            if e.is_ascii_alphabetic() {
                                break;
                            }
                        }
                    } else {
                        out.push(c);
                    }
                }
                out
            })
            .collect()
    }

    fn opts() -> RenderOpts {
        RenderOpts::default()
    }

    // === Streaming ===

    #[test]
    fn test_streaming_builds_one_message() {
        let mut t = Transcript::new();
        t.start_streaming();
        t.stream_chunk("a");
        t.stream_chunk("b");
        t.stream_complete();
        assert_eq!(t.len(), 1);
        assert!(!t.is_streaming());
        assert_eq!(t.messages()[0].content, "ab");

        let mut direct = Transcript::new();
        direct.push(Role::Assistant, "ab");
        assert_eq!(
            t.render_lines(&DEFAULT_THEME, &opts(), 40),
            direct.render_lines(&DEFAULT_THEME, &opts(), 40)
        );
    }

    #[test]
    fn test_new_stream_discards_unfinished() {
        let mut t = Transcript::new();
        t.start_streaming();
        t.stream_chunk("lost");
        t.start_streaming_as("model-b");
        t.stream_chunk("kept");
        t.stream_complete();
        assert_eq!(t.len(), 1);
        assert_eq!(t.messages()[0].content, "kept");
        assert_eq!(t.messages()[0].label.as_deref(), Some("model-b"));
    }

    #[test]
    fn test_stream_chunk_without_stream_is_noop() {
        let mut t = Transcript::new();
        t.stream_chunk("nowhere");
        t.stream_complete();
        assert!(t.is_empty());
    }

    #[test]
    fn test_complete_preserves_scroll() {
        let mut t = Transcript::new();
        for i in 0..30 {
            t.push(Role::System, &format!("line {i}"));
        }
        t.scroll_up(10, 100);
        t.start_streaming();
        t.stream_chunk("tail");
        t.stream_complete();
        assert_eq!(t.scroll(), 10);
    }

    // === Rendering ===

    #[test]
    fn test_header_rule_shape() {
        let mut t = Transcript::new();
        t.push(Role::User, "hi");
        let lines = plain(&t.render_lines(&DEFAULT_THEME, &opts(), 20));
        assert!(lines[0].starts_with("── You "));
        assert!(lines[0].ends_with('─'));
        assert_eq!(lines[0].chars().count(), 20);
        assert_eq!(lines[1], "hi");
    }

    #[test]
    fn test_headers_hidden() {
        let mut t = Transcript::new();
        t.push(Role::User, "hi");
        let mut o = opts();
        o.hide_headers = true;
        let lines = plain(&t.render_lines(&DEFAULT_THEME, &o, 20));
        assert_eq!(lines, vec!["hi"]);
    }

    #[test]
    fn test_empty_label_skips_header() {
        let mut t = Transcript::new();
        t.push_as(Role::System, "", "bare");
        let lines = plain(&t.render_lines(&DEFAULT_THEME, &opts(), 20));
        assert_eq!(lines, vec!["bare"]);
    }

    #[test]
    fn test_word_wrap_and_hard_split() {
        let mut t = Transcript::new();
        t.push_as(Role::System, "", "alpha beta gamma");
        let lines = plain(&t.render_lines(&DEFAULT_THEME, &opts(), 11));
        assert_eq!(lines, vec!["alpha beta", "gamma"]);

        let mut long = Transcript::new();
        long.push_as(Role::System, "", "abcdefghijklmno");
        let lines = plain(&long.render_lines(&DEFAULT_THEME, &opts(), 6));
        assert_eq!(lines, vec!["abcdef", "ghijkl", "mno"]);
    }

    #[test]
    fn test_code_block_padded_and_fences_dropped() {
        let mut t = Transcript::new();
        t.push_as(Role::System, "", "before\n```rust\nlet x = 1;\n```\nafter");
        let styled = t.render_lines(&DEFAULT_THEME, &opts(), 16);
        let lines = plain(&styled);
        assert_eq!(lines, vec!["before", "let x = 1;      ", "after"]);
        // The code line carries a background sequence; the text lines do not.
        assert!(styled[1].contains("\x1b[48;2;"));
        assert!(!styled[0].contains("\x1b[48;2;"));
    }

    // === Scroll windowing ===

    #[test]
    fn test_window_clamps_scroll() {
        let mut t = Transcript::new();
        let lines: Vec<String> = (0..10).map(|i| i.to_string()).collect();
        t.scroll_up(100, Transcript::max_scroll(lines.len(), 4));
        assert_eq!(t.scroll(), 6);
        let w = t.window(&lines, 4);
        assert_eq!(w, &lines[0..4]);
        t.scroll_to_bottom();
        let w = t.window(&lines, 4);
        assert_eq!(w, &lines[6..10]);
    }

    #[test]
    fn test_window_shorter_than_height() {
        let t = Transcript::new();
        let lines: Vec<String> = (0..3).map(|i| i.to_string()).collect();
        assert_eq!(t.window(&lines, 10).len(), 3);
        let none: Vec<String> = Vec::new();
        assert!(t.window(&none, 5).is_empty());
    }

    #[test]
    fn test_blank_separator_between_messages() {
        let mut t = Transcript::new();
        t.push_as(Role::System, "", "one");
        t.push_as(Role::System, "", "two");
        let lines = plain(&t.render_lines(&DEFAULT_THEME, &opts(), 20));
        assert_eq!(lines, vec!["one", "", "two"]);
    }
}
