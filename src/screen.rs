//! Frame renderer.
//!
//! Builds one complete frame as a single string of ANSI output: every
//! region is drawn with absolute cursor positioning and an explicit per-row
//! clear, so stale characters can never survive a redraw. The engine always
//! repaints the full frame instead of diffing — bandwidth traded for
//! correctness simplicity.
//!
//! Rendering is decoupled from the session through [`FrameContext`]: the
//! runner builds a context from its locked state and passes it in, keeping
//! the renderer free of session internals and testable on its own.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::ansi;
use crate::config::Command;
use crate::editor::Editor;
use crate::layout::{input_inner_width, Layout, Region};
use crate::menu::MenuState;
use crate::palette::Palette;
use crate::theme::Theme;
use crate::transcript::{RenderOpts, Transcript};

/// Width of the progress bar gauge in cells.
const PROGRESS_BAR_WIDTH: usize = 12;

/// Everything one frame needs, borrowed from the locked session state.
pub struct FrameContext<'a> {
    /// The computed region partition.
    pub layout: &'a Layout,
    /// Active theme.
    pub theme: &'a Theme,
    /// Message log.
    pub transcript: &'a Transcript,
    /// Transcript label/visibility options.
    pub render_opts: &'a RenderOpts,
    /// Input editor.
    pub editor: &'a Editor,
    /// Palette state.
    pub palette: &'a Palette,
    /// Session command table.
    pub commands: &'a [Command],
    /// Menu overlay, when open.
    pub menu: Option<&'a MenuState>,
    /// Active spinner as `(frame glyph, label)`.
    pub spinner: Option<(&'a str, &'a str)>,
    /// Active progress bar as `(label, percent)`.
    pub progress: Option<(&'a str, u8)>,
    /// Top-border status fallback text.
    pub status: &'a str,
    /// Bottom-left status text.
    pub status_left: &'a str,
    /// Bottom-right status text.
    pub status_right: &'a str,
    /// Append the input character count to the bottom-right text.
    pub show_char_count: bool,
}

/// Render the full frame into one ANSI string.
#[must_use]
pub fn render(ctx: &FrameContext) -> String {
    let mut out = String::with_capacity(ctx.layout.rows * ctx.layout.cols * 2);
    out.push_str(ansi::HIDE_CURSOR);

    render_transcript(ctx, &mut out);
    if let Some(row) = ctx.layout.separator_row {
        render_separator(ctx, row, &mut out);
    }
    if let Some(region) = ctx.layout.menu {
        render_menu(ctx, region, &mut out);
    }
    if let Some(region) = ctx.layout.palette {
        render_palette(ctx, region, &mut out);
    }
    if let Some(region) = ctx.layout.input {
        render_input(ctx, region, &mut out);
    }

    // The cursor is only shown inside the input box; overlays and
    // output-only mode keep it hidden.
    if ctx.menu.is_none() {
        if let Some(region) = ctx.layout.input {
            let width = input_inner_width(ctx.layout.cols);
            let (crow, ccol) = ctx.editor.display_cursor(width);
            let visible_row = crow.saturating_sub(ctx.editor.offset());
            let inner_height = region.height.saturating_sub(2);
            if visible_row < inner_height {
                out.push_str(&ansi::move_to(region.top + 1 + visible_row, 3 + ccol));
                out.push_str(ansi::SHOW_CURSOR);
            }
        }
    }
    out
}

fn clear_row(row: usize, out: &mut String) {
    out.push_str(&ansi::move_to(row, 1));
    out.push_str(ansi::CLEAR_LINE);
}

fn render_transcript(ctx: &FrameContext, out: &mut String) {
    let height = ctx.layout.transcript_height;
    let lines = ctx
        .transcript
        .render_lines(ctx.theme, ctx.render_opts, ctx.layout.cols);
    let window = ctx.transcript.window(&lines, height);
    for row in 0..height {
        clear_row(row + 1, out);
        if let Some(line) = window.get(row) {
            out.push_str(line);
            out.push_str(ansi::RESET);
        }
    }
}

fn render_separator(ctx: &FrameContext, row: usize, out: &mut String) {
    clear_row(row, out);
    out.push_str(&ansi::fg(ctx.theme.primary));
    out.push_str(&"─".repeat(ctx.layout.cols));
    out.push_str(ansi::RESET);
}

fn render_menu(ctx: &FrameContext, region: Region, out: &mut String) {
    let Some(menu) = ctx.menu else {
        return;
    };
    let cols = ctx.layout.cols;

    // Title row: breadcrumb once nested, plain title at the root.
    clear_row(region.top, out);
    out.push_str(&ansi::fg(ctx.theme.accent));
    out.push_str(ansi::BOLD);
    out.push_str(&truncate(&format!("  {}", menu.breadcrumb()), cols));
    out.push_str(ansi::RESET);

    let body_rows = region.height.saturating_sub(2);
    if let Some((label, typed)) = menu.active_prompt() {
        for row in 0..body_rows {
            clear_row(region.top + 1 + row, out);
        }
        out.push_str(&ansi::move_to(region.top + 2, 1));
        out.push_str(&truncate(&format!("  {label}: {typed}▏"), cols));
    } else {
        let labels = menu.labels();
        let scroll = menu.scroll();
        for row in 0..body_rows {
            clear_row(region.top + 1 + row, out);
            let idx = scroll + row;
            let Some(label) = labels.get(idx) else {
                continue;
            };
            if idx == menu.selected() {
                out.push_str(&ansi::fg(ctx.theme.accent));
                out.push_str(&truncate(&format!("▸ {label}"), cols));
                out.push_str(ansi::RESET);
            } else {
                out.push_str(&truncate(&format!("  {label}"), cols));
            }
        }
    }

    // Hint row.
    clear_row(region.top + region.height - 1, out);
    out.push_str(&ansi::fg(ctx.theme.secondary));
    let hint = if menu.in_prompt() {
        "Enter confirm · Esc cancel"
    } else {
        "↑↓ move · Enter select · Esc back"
    };
    out.push_str(&truncate(&format!("  {hint}"), cols));
    out.push_str(ansi::RESET);
}

fn render_palette(ctx: &FrameContext, region: Region, out: &mut String) {
    let cols = ctx.layout.cols;
    let rows = ctx.palette.rows(ctx.commands);
    let item_rows = region.height - 1;
    let scroll = ctx.palette.scroll();
    for row in 0..item_rows {
        clear_row(region.top + row, out);
        let idx = scroll + row;
        let Some((name, desc)) = rows.get(idx) else {
            continue;
        };
        let marker = if idx == ctx.palette.selected() { "▸ " } else { "  " };
        if idx == ctx.palette.selected() {
            out.push_str(&ansi::fg(ctx.theme.accent));
        }
        let mut line = format!("{marker}{name:<16}");
        if !desc.is_empty() {
            line.push_str("  ");
            line.push_str(desc);
        }
        out.push_str(&truncate(&line, cols));
        out.push_str(ansi::RESET);
    }

    clear_row(region.top + region.height - 1, out);
    out.push_str(&ansi::fg(ctx.theme.secondary));
    let hint = if ctx.palette.is_empty() {
        "no matching commands · Enter sends as typed"
    } else {
        "Tab complete · Enter run · Esc dismiss"
    };
    out.push_str(&truncate(&format!("  {hint}"), cols));
    out.push_str(ansi::RESET);
}

fn render_input(ctx: &FrameContext, region: Region, out: &mut String) {
    let cols = ctx.layout.cols;
    let width = input_inner_width(cols);
    let inner_height = region.height.saturating_sub(2);

    // Top border with embedded state, in priority order: scroll hint,
    // spinner, progress, caller status.
    let (embed, color) = if ctx.transcript.scroll() > 0 {
        (
            format!("↑ {} lines", ctx.transcript.scroll()),
            ctx.theme.secondary,
        )
    } else if let Some((frame, label)) = ctx.spinner {
        (format!("{frame} {label}"), ctx.theme.accent)
    } else if let Some((label, pct)) = ctx.progress {
        (progress_gauge(label, pct), ctx.theme.accent)
    } else {
        (ctx.status.to_string(), ctx.theme.secondary)
    };
    render_border(ctx, region.top, '┌', '┐', &embed, "", color, out);

    // Interior: wrapped editor lines windowed by the editor viewport.
    let lines = wrapped_input_lines(ctx.editor, width);
    let offset = ctx.editor.offset();
    for row in 0..inner_height {
        clear_row(region.top + 1 + row, out);
        let text = lines.get(offset + row).map(String::as_str).unwrap_or("");
        let pad = width.saturating_sub(text.width());
        out.push_str(&ansi::fg(ctx.theme.primary));
        out.push_str("│ ");
        out.push_str(ansi::RESET);
        out.push_str(text);
        out.push_str(&" ".repeat(pad));
        out.push_str(&ansi::fg(ctx.theme.primary));
        out.push_str(" │");
        out.push_str(ansi::RESET);
    }

    // Bottom border with left/right status.
    let mut right = ctx.status_right.to_string();
    if ctx.show_char_count {
        let count = format!("{} chars", ctx.editor.char_len());
        if right.is_empty() {
            right = count;
        } else {
            right.push_str(" · ");
            right.push_str(&count);
        }
    }
    render_border(
        ctx,
        region.top + region.height - 1,
        '└',
        '┘',
        ctx.status_left,
        &right,
        ctx.theme.secondary,
        out,
    );
}

/// Draw one border row: corners, dashes, and optional embedded left/right
/// text set off by single spaces.
#[allow(clippy::too_many_arguments)]
fn render_border(
    ctx: &FrameContext,
    row: usize,
    left_corner: char,
    right_corner: char,
    left_text: &str,
    right_text: &str,
    text_color: crate::theme::Color,
    out: &mut String,
) {
    let cols = ctx.layout.cols;
    clear_row(row, out);
    let left = if left_text.is_empty() {
        String::new()
    } else {
        format!(" {left_text} ")
    };
    let right = if right_text.is_empty() {
        String::new()
    } else {
        format!(" {right_text} ")
    };
    // corners + one leading dash on each side
    let chrome = 4 + left.width() + right.width();
    let fill = cols.saturating_sub(chrome);

    out.push_str(&ansi::fg(ctx.theme.primary));
    out.push(left_corner);
    out.push('─');
    if !left.is_empty() {
        out.push_str(&ansi::fg(text_color));
        out.push_str(&left);
        out.push_str(&ansi::fg(ctx.theme.primary));
    }
    out.push_str(&"─".repeat(fill));
    if !right.is_empty() {
        out.push_str(&ansi::fg(text_color));
        out.push_str(&right);
        out.push_str(&ansi::fg(ctx.theme.primary));
    }
    out.push('─');
    out.push(right_corner);
    out.push_str(ansi::RESET);
}

/// `label [███░░░░░░] NN%`
fn progress_gauge(label: &str, pct: u8) -> String {
    let pct = pct.min(100) as usize;
    let filled = pct * PROGRESS_BAR_WIDTH / 100;
    format!(
        "{label} [{}{}] {pct}%",
        "█".repeat(filled),
        "░".repeat(PROGRESS_BAR_WIDTH - filled)
    )
}

/// Editor content as display lines wrapped to `width` cells.
#[must_use]
pub fn wrapped_input_lines(editor: &Editor, width: usize) -> Vec<String> {
    let mut out = Vec::new();
    for row in 0..editor.line_count() {
        let line = editor.line(row).unwrap_or(&[]);
        if line.is_empty() {
            out.push(String::new());
            continue;
        }
        if width == 0 {
            out.push(line.iter().collect());
            continue;
        }
        for chunk in line.chunks(width) {
            out.push(chunk.iter().collect());
        }
    }
    out
}

/// Truncate `s` to at most `width` display cells.
fn truncate(s: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let cw = c.width().unwrap_or(0);
        if used + cw > width {
            break;
        }
        out.push(c);
        used += cw;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_gauge_shape() {
        assert_eq!(progress_gauge("sync", 0), "sync [░░░░░░░░░░░░] 0%");
        assert_eq!(progress_gauge("sync", 100), "sync [████████████] 100%");
        let half = progress_gauge("sync", 50);
        assert!(half.contains("██████░░░░░░"));
        // Out-of-range percentages are clamped.
        assert_eq!(progress_gauge("sync", 250), progress_gauge("sync", 100));
    }

    #[test]
    fn test_wrapped_input_lines() {
        let mut ed = Editor::new();
        ed.set_text("abcdef\n\nxy");
        let lines = wrapped_input_lines(&ed, 4);
        assert_eq!(lines, vec!["abcd", "ef", "", "xy"]);
    }

    #[test]
    fn test_truncate_by_cells() {
        assert_eq!(truncate("hello", 3), "hel");
        assert_eq!(truncate("héllo", 10), "héllo");
        // Wide CJK chars occupy two cells.
        assert_eq!(truncate("你好", 3), "你");
    }
}
