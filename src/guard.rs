//! Terminal state guard for RAII cleanup.
//!
//! The run loop owns the terminal for its whole lifetime; this guard makes
//! sure the terminal is handed back in a usable state on every exit path —
//! normal return, read error, external shutdown, or a panic unwinding
//! through the loop.

use std::io::Write;

use crossterm::terminal::disable_raw_mode;

use crate::ansi;

/// Restores the terminal when dropped.
///
/// On drop: raw mode off, mouse reporting off, scroll region reset, SGR
/// attributes reset, cursor shown, and the cursor parked on the last row so
/// the shell prompt lands below the old frame. Errors are ignored — there
/// is nothing useful to do with them during teardown.
pub struct TerminalGuard {
    rows: usize,
}

impl TerminalGuard {
    /// Create a guard; `rows` is used to park the cursor at teardown.
    #[must_use]
    pub fn new(rows: usize) -> Self {
        Self { rows }
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut out = std::io::stdout();
        let _ = write!(
            out,
            "{}{}{}{}{}\r\n",
            ansi::MOUSE_OFF,
            ansi::RESET_SCROLL_REGION,
            ansi::RESET,
            ansi::SHOW_CURSOR,
            ansi::move_to(self.rows, 1),
        );
        let _ = out.flush();
    }
}
