//! ANSI escape sequence primitives.
//!
//! Pure builders for the handful of sequences the compositor emits. Frames
//! are painted with absolute cursor addressing and per-row clears, so this
//! is the complete vocabulary: cursor movement, line/screen clears, 24-bit
//! SGR color, a few attributes, and the cursor/mouse mode toggles.

use crate::theme::Color;

/// Reset all SGR attributes.
pub const RESET: &str = "\x1b[0m";
/// Bold attribute.
pub const BOLD: &str = "\x1b[1m";
/// Dim attribute.
pub const DIM: &str = "\x1b[2m";
/// Italic attribute.
pub const ITALIC: &str = "\x1b[3m";
/// Reverse-video attribute.
pub const REVERSE: &str = "\x1b[7m";

/// Clear the entire current line.
pub const CLEAR_LINE: &str = "\x1b[2K";
/// Clear the whole screen.
pub const CLEAR_SCREEN: &str = "\x1b[2J";

/// Hide the text cursor.
pub const HIDE_CURSOR: &str = "\x1b[?25l";
/// Show the text cursor.
pub const SHOW_CURSOR: &str = "\x1b[?25h";

/// Enable mouse reporting: X10 button presses plus SGR extended encoding.
pub const MOUSE_ON: &str = "\x1b[?1000h\x1b[?1006h";
/// Disable mouse reporting (both modes).
pub const MOUSE_OFF: &str = "\x1b[?1006l\x1b[?1000l";

/// Reset the scroll region to the full screen.
pub const RESET_SCROLL_REGION: &str = "\x1b[r";

/// Move the cursor to `row`, `col` (1-based).
#[must_use]
pub fn move_to(row: usize, col: usize) -> String {
    format!("\x1b[{};{}H", row.max(1), col.max(1))
}

/// Foreground color sequence. `Color::Default` resets to the terminal default.
#[must_use]
pub fn fg(color: Color) -> String {
    match color {
        Color::Default => "\x1b[39m".to_string(),
        Color::Rgb(r, g, b) => format!("\x1b[38;2;{};{};{}m", r, g, b),
    }
}

/// Background color sequence. `Color::Default` resets to the terminal default.
#[must_use]
pub fn bg(color: Color) -> String {
    match color {
        Color::Default => "\x1b[49m".to_string(),
        Color::Rgb(r, g, b) => format!("\x1b[48;2;{};{};{}m", r, g, b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_to_is_one_based() {
        assert_eq!(move_to(1, 1), "\x1b[1;1H");
        assert_eq!(move_to(24, 80), "\x1b[24;80H");
        // Degenerate coordinates are clamped rather than emitting row 0.
        assert_eq!(move_to(0, 0), "\x1b[1;1H");
    }

    #[test]
    fn test_fg_rgb() {
        assert_eq!(fg(Color::Rgb(255, 128, 0)), "\x1b[38;2;255;128;0m");
    }

    #[test]
    fn test_fg_default_resets() {
        assert_eq!(fg(Color::Default), "\x1b[39m");
        assert_eq!(bg(Color::Default), "\x1b[49m");
    }
}
