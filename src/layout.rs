//! Per-frame region layout.
//!
//! Pure calculation of the vertical screen partition from the terminal size
//! and the active overlay. The renderer consumes exactly these numbers, so
//! layout math lives in one unit-testable place.
//!
//! Top to bottom the frame is:
//!
//! - the transcript region (whatever height is left), then
//! - a one-row separator plus a fixed-height menu panel while the menu
//!   overlay is open, or
//! - the palette panel (0–8 item rows plus a hint row while active) stacked
//!   on the input box (grows with wrapped input up to half the screen,
//!   never below four rows), or
//! - a single separator row when input is disabled (output-only mode).

// Rust guideline compliant 2026-01

use crate::menu::MENU_VISIBLE_ROWS;
use crate::palette::PALETTE_MAX_ROWS;

/// Fallback size substituted when the size query fails or reports something
/// unusable.
pub const FALLBACK_COLS: usize = 80;
/// Fallback row count.
pub const FALLBACK_ROWS: usize = 24;

/// Menu panel height: title row, item window, hint row.
pub const MENU_PANEL_HEIGHT: usize = MENU_VISIBLE_ROWS + 2;

/// Minimum total input box height, borders included.
pub const INPUT_MIN_HEIGHT: usize = 4;

/// A vertical slice of the frame, in 1-based terminal rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// First row of the region.
    pub top: usize,
    /// Number of rows.
    pub height: usize,
}

/// The computed partition for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Total rows after degenerate-size substitution.
    pub rows: usize,
    /// Total columns after degenerate-size substitution.
    pub cols: usize,
    /// Transcript height; the region always starts at row 1.
    pub transcript_height: usize,
    /// Separator row (menu and output-only modes).
    pub separator_row: Option<usize>,
    /// Menu panel region.
    pub menu: Option<Region>,
    /// Palette panel region (item rows plus one hint row).
    pub palette: Option<Region>,
    /// Input box region, borders included.
    pub input: Option<Region>,
}

/// Inputs the layout depends on.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutRequest {
    /// Menu overlay open (suppresses palette and input box).
    pub menu_open: bool,
    /// Input box present at all.
    pub input_enabled: bool,
    /// Palette overlay active.
    pub palette_active: bool,
    /// Current palette row count (items, pre-clamp).
    pub palette_items: usize,
    /// Wrapped display line count of the editor content.
    pub input_lines: usize,
}

/// Interior text width of the input box (`│ … │` borders and padding).
#[must_use]
pub fn input_inner_width(cols: usize) -> usize {
    cols.saturating_sub(4)
}

/// Compute the frame partition. Degenerate sizes fall back to 80×24.
#[must_use]
pub fn compute(rows: usize, cols: usize, req: &LayoutRequest) -> Layout {
    let (rows, cols) = if rows < 8 || cols < 20 {
        (FALLBACK_ROWS, FALLBACK_COLS)
    } else {
        (rows, cols)
    };

    if req.menu_open {
        let panel_height = MENU_PANEL_HEIGHT.min(rows.saturating_sub(2));
        let transcript_height = rows - panel_height - 1;
        return Layout {
            rows,
            cols,
            transcript_height,
            separator_row: Some(transcript_height + 1),
            menu: Some(Region {
                top: transcript_height + 2,
                height: panel_height,
            }),
            palette: None,
            input: None,
        };
    }

    if !req.input_enabled {
        return Layout {
            rows,
            cols,
            transcript_height: rows - 1,
            separator_row: Some(rows),
            menu: None,
            palette: None,
            input: None,
        };
    }

    let input_height = (req.input_lines + 2).clamp(INPUT_MIN_HEIGHT, (rows / 2).max(INPUT_MIN_HEIGHT));
    let palette_height = if req.palette_active {
        let wanted = req.palette_items.min(PALETTE_MAX_ROWS) + 1;
        wanted.min(rows.saturating_sub(input_height + 1))
    } else {
        0
    };
    let transcript_height = rows
        .saturating_sub(input_height + palette_height)
        .max(1);
    let palette = (palette_height > 0).then_some(Region {
        top: transcript_height + 1,
        height: palette_height,
    });
    Layout {
        rows,
        cols,
        transcript_height,
        separator_row: None,
        menu: None,
        palette,
        input: Some(Region {
            top: transcript_height + palette_height + 1,
            height: input_height,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req() -> LayoutRequest {
        LayoutRequest {
            input_enabled: true,
            input_lines: 1,
            ..LayoutRequest::default()
        }
    }

    #[test]
    fn test_standard_frame() {
        let l = compute(24, 80, &req());
        assert_eq!(l.transcript_height, 20);
        assert_eq!(l.input, Some(Region { top: 21, height: 4 }));
        assert!(l.palette.is_none() && l.menu.is_none() && l.separator_row.is_none());
    }

    #[test]
    fn test_input_grows_with_wrapped_lines() {
        let mut r = req();
        r.input_lines = 5;
        let l = compute(24, 80, &r);
        assert_eq!(l.input, Some(Region { top: 18, height: 7 }));
        // Capped at half the terminal height.
        r.input_lines = 40;
        let l = compute(24, 80, &r);
        assert_eq!(l.input.unwrap().height, 12);
    }

    #[test]
    fn test_palette_panel_stacks_above_input() {
        let mut r = req();
        r.palette_active = true;
        r.palette_items = 3;
        let l = compute(24, 80, &r);
        // 3 item rows + 1 hint row.
        assert_eq!(l.palette, Some(Region { top: 17, height: 4 }));
        assert_eq!(l.input.unwrap().top, 21);
        assert_eq!(l.transcript_height, 16);
    }

    #[test]
    fn test_palette_item_rows_capped_at_eight() {
        let mut r = req();
        r.palette_active = true;
        r.palette_items = 30;
        let l = compute(40, 80, &r);
        assert_eq!(l.palette.unwrap().height, PALETTE_MAX_ROWS + 1);
    }

    #[test]
    fn test_menu_panel_replaces_input() {
        let mut r = req();
        r.menu_open = true;
        let l = compute(24, 80, &r);
        assert_eq!(l.transcript_height, 13);
        assert_eq!(l.separator_row, Some(14));
        assert_eq!(
            l.menu,
            Some(Region {
                top: 15,
                height: MENU_PANEL_HEIGHT
            })
        );
        assert!(l.input.is_none() && l.palette.is_none());
    }

    #[test]
    fn test_output_only_mode() {
        let r = LayoutRequest::default();
        let l = compute(24, 80, &r);
        assert_eq!(l.transcript_height, 23);
        assert_eq!(l.separator_row, Some(24));
        assert!(l.input.is_none());
    }

    #[test]
    fn test_degenerate_size_falls_back() {
        let l = compute(0, 0, &req());
        assert_eq!((l.rows, l.cols), (FALLBACK_ROWS, FALLBACK_COLS));
        let l = compute(3, 200, &req());
        assert_eq!((l.rows, l.cols), (FALLBACK_ROWS, FALLBACK_COLS));
    }

    #[test]
    fn test_transcript_never_vanishes() {
        for rows in 8..60 {
            for lines in 0..40 {
                let mut r = req();
                r.input_lines = lines;
                r.palette_active = true;
                r.palette_items = 12;
                let l = compute(rows, 80, &r);
                assert!(l.transcript_height >= 1, "rows={rows} lines={lines}");
                let bottom = l.input.map(|i| i.top + i.height - 1).unwrap_or(l.rows);
                assert!(bottom <= l.rows, "overflow at rows={rows} lines={lines}");

                r.menu_open = true;
                let l = compute(rows, 80, &r);
                let bottom = l.menu.map(|m| m.top + m.height - 1).unwrap_or(l.rows);
                assert!(bottom <= l.rows, "menu overflow at rows={rows}");
            }
        }
    }
}
