//! Editable multi-line input buffer.
//!
//! The buffer is a vector of char lines with a `(row, col)` cursor and a
//! submission history. Invariants held after every operation:
//!
//! - `0 <= row < lines.len()` (there is always at least one line)
//! - `0 <= col <= lines[row].len()`
//!
//! Structural edits (line split/merge, kill operations) always build fresh
//! line vectors; lines are replaced, never shared.
//!
//! History browsing is gated on the cursor row: up only activates on the
//! first line and down only on the last, so arrow keys inside a multi-line
//! draft move the cursor instead of clobbering the text. Entering browsing
//! snapshots the unsaved text as a draft, restored when browsing walks past
//! the newest entry again.

/// Multi-line text editor state for the input box.
#[derive(Debug, Clone)]
pub struct Editor {
    lines: Vec<Vec<char>>,
    row: usize,
    col: usize,
    /// First visible display row of the viewport (wrapped coordinates).
    offset: usize,
    history: Vec<String>,
    history_index: Option<usize>,
    draft: Option<String>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    /// Empty editor: one empty line, cursor at the origin.
    #[must_use]
    pub fn new() -> Self {
        Self {
            lines: vec![Vec::new()],
            row: 0,
            col: 0,
            offset: 0,
            history: Vec::new(),
            history_index: None,
            draft: None,
        }
    }

    /// Cursor position as `(row, col)`.
    #[must_use]
    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    /// Number of logical lines.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// The logical line at `row`, if any.
    #[must_use]
    pub fn line(&self, row: usize) -> Option<&[char]> {
        self.lines.get(row).map(Vec::as_slice)
    }

    /// Full buffer content joined with `\n`.
    #[must_use]
    pub fn text(&self) -> String {
        let mut out = String::new();
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.extend(line.iter());
        }
        out
    }

    /// Total character count, counting line breaks.
    #[must_use]
    pub fn char_len(&self) -> usize {
        let chars: usize = self.lines.iter().map(Vec::len).sum();
        chars + self.lines.len().saturating_sub(1)
    }

    /// True when the buffer holds no text at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.len() == 1 && self.lines[0].is_empty()
    }

    /// Replace the whole buffer and put the cursor at the end.
    pub fn set_text(&mut self, text: &str) {
        self.lines = text.split('\n').map(|l| l.chars().collect()).collect();
        if self.lines.is_empty() {
            self.lines.push(Vec::new());
        }
        self.row = self.lines.len() - 1;
        self.col = self.lines[self.row].len();
    }

    /// Reset to a single empty line.
    pub fn clear(&mut self) {
        self.lines = vec![Vec::new()];
        self.row = 0;
        self.col = 0;
        self.offset = 0;
    }

    // === Editing ===

    /// Insert one character at the cursor.
    pub fn insert_char(&mut self, c: char) {
        let mut line = self.lines[self.row].clone();
        line.insert(self.col, c);
        self.lines[self.row] = line;
        self.col += 1;
    }

    /// Insert every character of `text`, treating `\n` as a line split.
    pub fn insert_text(&mut self, text: &str) {
        for c in text.chars() {
            if c == '\n' {
                self.insert_newline();
            } else {
                self.insert_char(c);
            }
        }
    }

    /// Split the current line at the cursor.
    pub fn insert_newline(&mut self) {
        let line = self.lines[self.row].clone();
        let (head, tail) = line.split_at(self.col);
        self.lines[self.row] = head.to_vec();
        self.lines.insert(self.row + 1, tail.to_vec());
        self.row += 1;
        self.col = 0;
    }

    /// Delete the character before the cursor; at column 0, merge with the
    /// previous line.
    pub fn backspace(&mut self) {
        if self.col > 0 {
            let mut line = self.lines[self.row].clone();
            line.remove(self.col - 1);
            self.lines[self.row] = line;
            self.col -= 1;
        } else if self.row > 0 {
            let tail = self.lines.remove(self.row);
            self.row -= 1;
            self.col = self.lines[self.row].len();
            let mut merged = self.lines[self.row].clone();
            merged.extend(tail);
            self.lines[self.row] = merged;
        }
    }

    /// Delete the character under the cursor; at end of line, merge with the
    /// next line.
    pub fn delete_forward(&mut self) {
        if self.col < self.lines[self.row].len() {
            let mut line = self.lines[self.row].clone();
            line.remove(self.col);
            self.lines[self.row] = line;
        } else if self.row + 1 < self.lines.len() {
            let tail = self.lines.remove(self.row + 1);
            let mut merged = self.lines[self.row].clone();
            merged.extend(tail);
            self.lines[self.row] = merged;
        }
    }

    /// Delete from the cursor to the end of the line (Ctrl+K).
    pub fn kill_to_end(&mut self) {
        let line = self.lines[self.row].clone();
        self.lines[self.row] = line[..self.col].to_vec();
    }

    /// Delete from the start of the line to the cursor (Ctrl+U).
    pub fn kill_to_start(&mut self) {
        let line = self.lines[self.row].clone();
        self.lines[self.row] = line[self.col..].to_vec();
        self.col = 0;
    }

    /// Delete the word before the cursor (Ctrl+W): skip trailing spaces,
    /// then consume the non-space run.
    pub fn delete_word(&mut self) {
        let line = &self.lines[self.row];
        let mut start = self.col;
        while start > 0 && line[start - 1] == ' ' {
            start -= 1;
        }
        while start > 0 && line[start - 1] != ' ' {
            start -= 1;
        }
        let mut fresh = line[..start].to_vec();
        fresh.extend_from_slice(&line[self.col..]);
        self.lines[self.row] = fresh;
        self.col = start;
    }

    // === Movement ===

    /// Move left one column; wraps to the end of the previous line.
    pub fn move_left(&mut self) {
        if self.col > 0 {
            self.col -= 1;
        } else if self.row > 0 {
            self.row -= 1;
            self.col = self.lines[self.row].len();
        }
    }

    /// Move right one column; wraps to the start of the next line.
    pub fn move_right(&mut self) {
        if self.col < self.lines[self.row].len() {
            self.col += 1;
        } else if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = 0;
        }
    }

    /// Move up one line, clamping the column to the target line length.
    pub fn move_up(&mut self) {
        if self.row > 0 {
            self.row -= 1;
            self.col = self.col.min(self.lines[self.row].len());
        }
    }

    /// Move down one line, clamping the column to the target line length.
    pub fn move_down(&mut self) {
        if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = self.col.min(self.lines[self.row].len());
        }
    }

    /// Jump to the start of the current line.
    pub fn move_home(&mut self) {
        self.col = 0;
    }

    /// Jump to the end of the current line.
    pub fn move_end(&mut self) {
        self.col = self.lines[self.row].len();
    }

    /// True when the cursor is on the first line (history-up gate).
    #[must_use]
    pub fn on_first_line(&self) -> bool {
        self.row == 0
    }

    /// True when the cursor is on the last line (history-down gate).
    #[must_use]
    pub fn on_last_line(&self) -> bool {
        self.row + 1 == self.lines.len()
    }

    // === History ===

    /// Append a submitted entry, suppressing empty strings and consecutive
    /// duplicates. Resets browsing state.
    pub fn push_history(&mut self, entry: &str) {
        self.history_index = None;
        self.draft = None;
        if entry.is_empty() {
            return;
        }
        if self.history.last().map(String::as_str) == Some(entry) {
            return;
        }
        self.history.push(entry.to_string());
    }

    /// Step to the previous history entry. Snapshots the current text as a
    /// draft on first activation. Returns false when there is nothing to do.
    pub fn history_up(&mut self) -> bool {
        if self.history.is_empty() {
            return false;
        }
        match self.history_index {
            None => {
                self.draft = Some(self.text());
                self.history_index = Some(self.history.len() - 1);
            }
            Some(0) => return false,
            Some(i) => self.history_index = Some(i - 1),
        }
        let idx = self.history_index.unwrap_or(0);
        let entry = self.history[idx].clone();
        self.set_text(&entry);
        true
    }

    /// Step to the next history entry; past the newest entry, restore the
    /// draft. Returns false when not browsing.
    pub fn history_down(&mut self) -> bool {
        let Some(i) = self.history_index else {
            return false;
        };
        if i + 1 < self.history.len() {
            self.history_index = Some(i + 1);
            let entry = self.history[i + 1].clone();
            self.set_text(&entry);
        } else {
            self.history_index = None;
            let draft = self.draft.take().unwrap_or_default();
            self.set_text(&draft);
        }
        true
    }

    /// Number of stored history entries.
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    // === Viewport ===

    /// Current viewport offset in wrapped display rows.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Clamp the viewport so the cursor's display row stays visible given
    /// the wrap `width` and `visible` row count of the input box interior.
    pub fn scroll_to_cursor(&mut self, width: usize, visible: usize) {
        if width == 0 || visible == 0 {
            self.offset = 0;
            return;
        }
        let cursor_row = self.display_cursor(width).0;
        if cursor_row < self.offset {
            self.offset = cursor_row;
        } else if cursor_row >= self.offset + visible {
            self.offset = cursor_row + 1 - visible;
        }
        let total = self.display_line_count(width);
        self.offset = self.offset.min(total.saturating_sub(visible));
    }

    /// Number of display rows the buffer occupies when wrapped to `width`.
    #[must_use]
    pub fn display_line_count(&self, width: usize) -> usize {
        if width == 0 {
            return self.lines.len();
        }
        self.lines
            .iter()
            .map(|l| if l.is_empty() { 1 } else { l.len().div_ceil(width) })
            .sum()
    }

    /// Cursor position in wrapped display coordinates for the given width.
    #[must_use]
    pub fn display_cursor(&self, width: usize) -> (usize, usize) {
        if width == 0 {
            return (self.row, self.col);
        }
        let mut display_row = 0;
        for line in self.lines.iter().take(self.row) {
            display_row += if line.is_empty() { 1 } else { line.len().div_ceil(width) };
        }
        display_row += self.col / width;
        (display_row, self.col % width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editor_with(text: &str) -> Editor {
        let mut ed = Editor::new();
        ed.set_text(text);
        ed
    }

    fn assert_invariants(ed: &Editor) {
        let (row, col) = ed.cursor();
        assert!(row < ed.line_count(), "row {row} out of range");
        assert!(
            col <= ed.line(row).map(<[char]>::len).unwrap_or(0),
            "col {col} out of range on row {row}"
        );
    }

    // === Editing ===

    #[test]
    fn test_insert_and_text() {
        let mut ed = Editor::new();
        for c in "hello".chars() {
            ed.insert_char(c);
        }
        assert_eq!(ed.text(), "hello");
        assert_eq!(ed.cursor(), (0, 5));
        assert_invariants(&ed);
    }

    #[test]
    fn test_newline_splits_line() {
        let mut ed = editor_with("hello");
        ed.move_home();
        ed.move_right();
        ed.move_right();
        ed.insert_newline();
        assert_eq!(ed.text(), "he\nllo");
        assert_eq!(ed.cursor(), (1, 0));
        assert_invariants(&ed);
    }

    #[test]
    fn test_backspace_merges_lines() {
        let mut ed = editor_with("ab\ncd");
        ed.move_home();
        ed.backspace();
        assert_eq!(ed.text(), "abcd");
        assert_eq!(ed.cursor(), (0, 2));
        assert_invariants(&ed);
    }

    #[test]
    fn test_delete_forward_merges_lines() {
        let mut ed = editor_with("ab\ncd");
        ed.move_up();
        ed.move_end();
        ed.delete_forward();
        assert_eq!(ed.text(), "abcd");
        assert_invariants(&ed);
    }

    #[test]
    fn test_kill_to_end_and_start() {
        let mut ed = editor_with("hello world");
        ed.move_home();
        for _ in 0..5 {
            ed.move_right();
        }
        ed.kill_to_end();
        assert_eq!(ed.text(), "hello");
        ed.kill_to_start();
        assert_eq!(ed.text(), "");
        assert_invariants(&ed);
    }

    #[test]
    fn test_delete_word_skips_trailing_spaces() {
        let mut ed = editor_with("one two   ");
        ed.delete_word();
        assert_eq!(ed.text(), "one ");
        ed.delete_word();
        assert_eq!(ed.text(), "");
        assert_invariants(&ed);
    }

    #[test]
    fn test_move_up_clamps_column() {
        let mut ed = editor_with("ab\nlonger line");
        assert_eq!(ed.cursor(), (1, 11));
        ed.move_up();
        assert_eq!(ed.cursor(), (0, 2));
        assert_invariants(&ed);
    }

    #[test]
    fn test_left_right_wrap_across_lines() {
        let mut ed = editor_with("a\nb");
        ed.move_up();
        ed.move_end();
        ed.move_right();
        assert_eq!(ed.cursor(), (1, 0));
        ed.move_left();
        assert_eq!(ed.cursor(), (0, 1));
        assert_invariants(&ed);
    }

    #[test]
    fn test_invariants_under_operation_storm() {
        // Pseudo-random walk over every operation; the invariant must hold
        // after each step.
        let mut ed = Editor::new();
        let mut seed: u64 = 0x4d595df4d0f33173;
        for step in 0..2000 {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            match seed % 13 {
                0 => ed.insert_char((b'a' + (step % 26) as u8) as char),
                1 => ed.insert_newline(),
                2 => ed.backspace(),
                3 => ed.delete_forward(),
                4 => ed.move_left(),
                5 => ed.move_right(),
                6 => ed.move_up(),
                7 => ed.move_down(),
                8 => ed.move_home(),
                9 => ed.move_end(),
                10 => ed.kill_to_end(),
                11 => ed.kill_to_start(),
                _ => ed.delete_word(),
            }
            assert_invariants(&ed);
        }
    }

    // === History ===

    #[test]
    fn test_history_suppresses_consecutive_duplicates() {
        let mut ed = Editor::new();
        ed.push_history("a");
        ed.push_history("b");
        ed.push_history("b");
        assert_eq!(ed.history_len(), 2);
        ed.push_history("");
        assert_eq!(ed.history_len(), 2);
        // Non-consecutive repeats are kept.
        ed.push_history("a");
        assert_eq!(ed.history_len(), 3);
    }

    #[test]
    fn test_history_round_trip_restores_draft() {
        let mut ed = Editor::new();
        ed.push_history("a");
        ed.push_history("b");
        ed.set_text("draft");
        assert!(ed.history_up());
        assert_eq!(ed.text(), "b");
        assert!(ed.history_up());
        assert_eq!(ed.text(), "a");
        assert!(ed.history_down());
        assert_eq!(ed.text(), "b");
        assert!(ed.history_down());
        assert_eq!(ed.text(), "draft");
    }

    #[test]
    fn test_history_up_stops_at_oldest() {
        let mut ed = Editor::new();
        ed.push_history("only");
        assert!(ed.history_up());
        assert!(!ed.history_up());
        assert_eq!(ed.text(), "only");
    }

    #[test]
    fn test_history_down_without_browsing_is_noop() {
        let mut ed = editor_with("typed");
        assert!(!ed.history_down());
        assert_eq!(ed.text(), "typed");
    }

    // === Viewport ===

    #[test]
    fn test_display_wrap_counts() {
        let ed = editor_with("abcdefghij\nxy");
        // Width 4: first line wraps to 3 rows, second to 1.
        assert_eq!(ed.display_line_count(4), 4);
        // Cursor at end of "xy": display row 3, col 2.
        assert_eq!(ed.display_cursor(4), (3, 2));
    }

    #[test]
    fn test_scroll_to_cursor_keeps_cursor_visible() {
        let mut ed = editor_with("a\nb\nc\nd\ne\nf");
        ed.scroll_to_cursor(10, 2);
        // Cursor on display row 5, window of 2 rows -> offset 4.
        assert_eq!(ed.offset(), 4);
        for _ in 0..5 {
            ed.move_up();
        }
        ed.scroll_to_cursor(10, 2);
        assert_eq!(ed.offset(), 0);
    }
}
