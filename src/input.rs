//! Raw byte-stream to event decoder.
//!
//! Decodes one `read(2)` chunk from a raw-mode terminal into a closed
//! [`InputEvent`] enum, so the dispatcher never re-derives intent from raw
//! bytes. Escape sequences are assumed to arrive whole within one read
//! (terminals write them atomically); a sequence truncated at the end of a
//! chunk is discarded rather than carried over.
//!
//! Handled wire formats:
//!
//! - CSI cursor keys (`ESC [ A/B/C/D`), home/end (`H`/`F`, `1~`/`4~`),
//!   delete (`3~`), page keys (`5~`/`6~`)
//! - SS3 cursor keys (`ESC O ...`) sent in application cursor mode
//! - X10 mouse reports (`ESC [ M b x y`) and SGR mouse reports
//!   (`ESC [ < b ; x ; y M/m`) — wheel buttons only, everything else dropped
//! - Shift+Enter as xterm `ESC [ 2 7 ; 2 ; 1 3 ~`, kitty `ESC [ 1 3 ; 2 u`,
//!   or the two-byte `ESC CR`
//! - Bracketed-paste guards (`ESC [ 2 0 0 ~` / `2 0 1 ~`), dropped
//! - Ctrl+A/E/K/U/W line-editing controls, Tab, Backspace, Ctrl+C
//!
//! Everything else printable is gathered into [`InputEvent::Text`] runs.
//! CR/LF embedded in a longer chunk (a paste) become newlines instead of
//! submissions; only a chunk that is exactly one CR or LF is a submit.

// Rust guideline compliant 2026-02

/// Lines scrolled per mouse wheel notch.
pub const WHEEL_SCROLL_LINES: usize = 3;

/// One decoded input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// Ctrl+C.
    Quit,
    /// Cursor/selection up.
    Up,
    /// Cursor/selection down.
    Down,
    /// Cursor left.
    Left,
    /// Cursor right.
    Right,
    /// Start of line.
    Home,
    /// End of line.
    End,
    /// Scroll half a screen up.
    PageUp,
    /// Scroll half a screen down.
    PageDown,
    /// Mouse wheel up.
    WheelUp,
    /// Mouse wheel down.
    WheelDown,
    /// Palette completion.
    Tab,
    /// Submission (bare CR/LF).
    Enter,
    /// Shift+Enter style newline insertion.
    NewlineShortcut,
    /// Bare ESC.
    Escape,
    /// Delete backwards.
    Backspace,
    /// Delete the character under the cursor.
    DeleteForward,
    /// Ctrl+K.
    KillToEnd,
    /// Ctrl+U.
    KillToStart,
    /// Ctrl+W.
    DeleteWord,
    /// Ctrl+A.
    CursorToStart,
    /// Ctrl+E.
    CursorToEnd,
    /// A run of printable text; embedded newlines are literal.
    Text(String),
}

/// Decode one read chunk into events.
#[must_use]
pub fn decode(bytes: &[u8]) -> Vec<InputEvent> {
    // A chunk that is exactly one newline is a submission; inside larger
    // chunks (pastes) CR/LF insert newlines instead.
    if bytes == b"\r" || bytes == b"\n" || bytes == b"\r\n" {
        return vec![InputEvent::Enter];
    }

    let mut events = Vec::new();
    let mut text = String::new();
    let mut i = 0;

    macro_rules! flush_text {
        () => {
            if !text.is_empty() {
                events.push(InputEvent::Text(std::mem::take(&mut text)));
            }
        };
    }

    while i < bytes.len() {
        let b = bytes[i];
        match b {
            0x1b => {
                flush_text!();
                let (event, consumed) = decode_escape(&bytes[i..]);
                if let Some(ev) = event {
                    events.push(ev);
                }
                i += consumed;
            }
            0x03 => {
                flush_text!();
                events.push(InputEvent::Quit);
                i += 1;
            }
            0x01 => {
                flush_text!();
                events.push(InputEvent::CursorToStart);
                i += 1;
            }
            0x05 => {
                flush_text!();
                events.push(InputEvent::CursorToEnd);
                i += 1;
            }
            0x0b => {
                flush_text!();
                events.push(InputEvent::KillToEnd);
                i += 1;
            }
            0x15 => {
                flush_text!();
                events.push(InputEvent::KillToStart);
                i += 1;
            }
            0x17 => {
                flush_text!();
                events.push(InputEvent::DeleteWord);
                i += 1;
            }
            0x09 => {
                flush_text!();
                events.push(InputEvent::Tab);
                i += 1;
            }
            0x0d | 0x0a => {
                // Embedded in a larger chunk: paste newline, not a submit.
                text.push('\n');
                i += 1;
                if b == 0x0d && bytes.get(i) == Some(&0x0a) {
                    i += 1;
                }
            }
            0x7f | 0x08 => {
                flush_text!();
                events.push(InputEvent::Backspace);
                i += 1;
            }
            0x00..=0x1f => {
                // Unhandled control byte — dropped.
                i += 1;
            }
            _ => {
                let (c, len) = decode_utf8(&bytes[i..]);
                if let Some(c) = c {
                    text.push(c);
                }
                i += len;
            }
        }
    }
    flush_text!();
    events
}

/// Decode an escape sequence starting at `bytes[0] == 0x1b`. Returns the
/// event (if any) and the number of bytes consumed.
fn decode_escape(bytes: &[u8]) -> (Option<InputEvent>, usize) {
    match bytes.get(1) {
        None => (Some(InputEvent::Escape), 1),
        Some(b'[') => decode_csi(bytes),
        Some(b'O') => decode_ss3(bytes),
        Some(b'\r') => (Some(InputEvent::NewlineShortcut), 2),
        Some(_) => {
            // Alt+key and friends — dropped.
            (None, 2)
        }
    }
}

/// Decode a CSI sequence (`ESC [ ...`).
fn decode_csi(bytes: &[u8]) -> (Option<InputEvent>, usize) {
    // X10 mouse: ESC [ M <button+32> <x+32> <y+32>, fixed six bytes.
    if bytes.get(2) == Some(&b'M') {
        if bytes.len() < 6 {
            log::debug!("truncated X10 mouse report ({} bytes)", bytes.len());
            return (None, bytes.len());
        }
        let button = bytes[3].wrapping_sub(32);
        let event = match button {
            64 => Some(InputEvent::WheelUp),
            65 => Some(InputEvent::WheelDown),
            _ => None,
        };
        return (event, 6);
    }

    // Scan for the final byte (0x40..=0x7e after parameters/intermediates).
    let mut end = None;
    for (offset, &b) in bytes.iter().enumerate().skip(2) {
        if (0x40..=0x7e).contains(&b) {
            end = Some(offset);
            break;
        }
        if !(0x20..=0x3f).contains(&b) {
            // Malformed — drop through the offending byte.
            return (None, offset + 1);
        }
    }
    let Some(end) = end else {
        // Truncated at the end of the chunk — discard the remainder.
        log::debug!("truncated CSI sequence ({} bytes)", bytes.len());
        return (None, bytes.len());
    };
    let consumed = end + 1;
    let final_byte = bytes[end];
    let params = &bytes[2..end];

    // SGR mouse: ESC [ < b ; x ; y M (press) or m (release).
    if params.first() == Some(&b'<') {
        if final_byte != b'M' && final_byte != b'm' {
            return (None, consumed);
        }
        let button = std::str::from_utf8(&params[1..])
            .ok()
            .and_then(|s| s.split(';').next()?.parse::<u16>().ok());
        let event = match (button, final_byte) {
            (Some(64), b'M') => Some(InputEvent::WheelUp),
            (Some(65), b'M') => Some(InputEvent::WheelDown),
            _ => None,
        };
        return (event, consumed);
    }

    let nums: Vec<u32> = std::str::from_utf8(params)
        .unwrap_or("")
        .split(';')
        .filter_map(|s| s.parse().ok())
        .collect();

    let event = match final_byte {
        b'A' => Some(InputEvent::Up),
        b'B' => Some(InputEvent::Down),
        b'C' => Some(InputEvent::Right),
        b'D' => Some(InputEvent::Left),
        b'H' => Some(InputEvent::Home),
        b'F' => Some(InputEvent::End),
        b'~' => match nums.as_slice() {
            [1] => Some(InputEvent::Home),
            [4] => Some(InputEvent::End),
            [3] => Some(InputEvent::DeleteForward),
            [5] => Some(InputEvent::PageUp),
            [6] => Some(InputEvent::PageDown),
            // xterm modifyOtherKeys Shift+Enter.
            [27, 2, 13] => Some(InputEvent::NewlineShortcut),
            // Bracketed-paste guards.
            [200] | [201] => None,
            _ => None,
        },
        // Kitty keyboard protocol: CSI <codepoint> ; <modifier> u.
        b'u' => match nums.as_slice() {
            [13, 2] => Some(InputEvent::NewlineShortcut),
            [13] => Some(InputEvent::Enter),
            _ => None,
        },
        _ => {
            log::debug!("unrecognized CSI final byte 0x{final_byte:02x}");
            None
        }
    };
    (event, consumed)
}

/// Decode an SS3 sequence (`ESC O <final>`), sent for cursor keys in
/// application cursor mode.
fn decode_ss3(bytes: &[u8]) -> (Option<InputEvent>, usize) {
    let Some(&final_byte) = bytes.get(2) else {
        return (None, bytes.len());
    };
    let event = match final_byte {
        b'A' => Some(InputEvent::Up),
        b'B' => Some(InputEvent::Down),
        b'C' => Some(InputEvent::Right),
        b'D' => Some(InputEvent::Left),
        b'H' => Some(InputEvent::Home),
        b'F' => Some(InputEvent::End),
        _ => None,
    };
    (event, 3)
}

/// Decode one UTF-8 character; invalid bytes are skipped one at a time.
fn decode_utf8(bytes: &[u8]) -> (Option<char>, usize) {
    let len = match bytes[0] {
        0x00..=0x7f => 1,
        0xc0..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf7 => 4,
        _ => return (None, 1),
    };
    if bytes.len() < len {
        return (None, bytes.len());
    }
    match std::str::from_utf8(&bytes[..len]) {
        Ok(s) => (s.chars().next(), len),
        Err(_) => (None, 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one(bytes: &[u8]) -> InputEvent {
        let events = decode(bytes);
        assert_eq!(events.len(), 1, "expected one event from {bytes:?}");
        events.into_iter().next().unwrap()
    }

    // === Plain text ===

    #[test]
    fn test_printable_run() {
        assert_eq!(one(b"abc"), InputEvent::Text("abc".to_string()));
    }

    #[test]
    fn test_utf8_char() {
        assert_eq!(one("héllo".as_bytes()), InputEvent::Text("héllo".to_string()));
    }

    #[test]
    fn test_invalid_utf8_byte_skipped() {
        assert_eq!(one(&[b'a', 0xff, b'b']), InputEvent::Text("ab".to_string()));
    }

    // === Submission vs paste newlines ===

    #[test]
    fn test_bare_cr_is_enter() {
        assert_eq!(one(b"\r"), InputEvent::Enter);
        assert_eq!(one(b"\n"), InputEvent::Enter);
        assert_eq!(one(b"\r\n"), InputEvent::Enter);
    }

    #[test]
    fn test_paste_newlines_do_not_submit() {
        assert_eq!(
            one(b"line one\r\nline two\rline three"),
            InputEvent::Text("line one\nline two\nline three".to_string())
        );
    }

    // === Control bytes ===

    #[test]
    fn test_ctrl_c_quits() {
        assert_eq!(one(&[0x03]), InputEvent::Quit);
    }

    #[test]
    fn test_line_editing_controls() {
        assert_eq!(one(&[0x01]), InputEvent::CursorToStart);
        assert_eq!(one(&[0x05]), InputEvent::CursorToEnd);
        assert_eq!(one(&[0x0b]), InputEvent::KillToEnd);
        assert_eq!(one(&[0x15]), InputEvent::KillToStart);
        assert_eq!(one(&[0x17]), InputEvent::DeleteWord);
    }

    #[test]
    fn test_backspace_variants() {
        assert_eq!(one(&[0x7f]), InputEvent::Backspace);
        assert_eq!(one(&[0x08]), InputEvent::Backspace);
    }

    #[test]
    fn test_unhandled_control_bytes_dropped() {
        assert!(decode(&[0x02, 0x06, 0x1c]).is_empty());
    }

    // === CSI ===

    #[test]
    fn test_arrow_keys() {
        assert_eq!(one(b"\x1b[A"), InputEvent::Up);
        assert_eq!(one(b"\x1b[B"), InputEvent::Down);
        assert_eq!(one(b"\x1b[C"), InputEvent::Right);
        assert_eq!(one(b"\x1b[D"), InputEvent::Left);
    }

    #[test]
    fn test_home_end() {
        assert_eq!(one(b"\x1b[H"), InputEvent::Home);
        assert_eq!(one(b"\x1b[F"), InputEvent::End);
        assert_eq!(one(b"\x1b[1~"), InputEvent::Home);
        assert_eq!(one(b"\x1b[4~"), InputEvent::End);
    }

    #[test]
    fn test_page_keys() {
        assert_eq!(one(b"\x1b[5~"), InputEvent::PageUp);
        assert_eq!(one(b"\x1b[6~"), InputEvent::PageDown);
    }

    #[test]
    fn test_delete_forward() {
        assert_eq!(one(b"\x1b[3~"), InputEvent::DeleteForward);
    }

    #[test]
    fn test_ss3_arrows() {
        assert_eq!(one(b"\x1bOA"), InputEvent::Up);
        assert_eq!(one(b"\x1bOH"), InputEvent::Home);
    }

    // === Shift+Enter encodings ===

    #[test]
    fn test_xterm_shift_enter_ten_bytes() {
        let seq = b"\x1b[27;2;13~";
        assert_eq!(seq.len(), 10);
        assert_eq!(one(seq), InputEvent::NewlineShortcut);
    }

    #[test]
    fn test_kitty_shift_enter() {
        assert_eq!(one(b"\x1b[13;2u"), InputEvent::NewlineShortcut);
    }

    #[test]
    fn test_kitty_plain_enter() {
        assert_eq!(one(b"\x1b[13u"), InputEvent::Enter);
    }

    #[test]
    fn test_esc_cr_alternate_encoding() {
        assert_eq!(one(b"\x1b\r"), InputEvent::NewlineShortcut);
    }

    // === Mouse ===

    #[test]
    fn test_x10_wheel() {
        // Button byte 96 = 64 + 32 (wheel up), at column 11, row 6.
        assert_eq!(one(&[0x1b, b'[', b'M', 96, 43, 38]), InputEvent::WheelUp);
        assert_eq!(one(&[0x1b, b'[', b'M', 97, 43, 38]), InputEvent::WheelDown);
    }

    #[test]
    fn test_x10_button_press_dropped() {
        // Button 0 (left click) is not a wheel event.
        assert!(decode(&[0x1b, b'[', b'M', 32, 43, 38]).is_empty());
    }

    #[test]
    fn test_sgr_wheel() {
        assert_eq!(one(b"\x1b[<64;10;5M"), InputEvent::WheelUp);
        assert_eq!(one(b"\x1b[<65;10;5M"), InputEvent::WheelDown);
    }

    #[test]
    fn test_sgr_release_and_clicks_dropped() {
        assert!(decode(b"\x1b[<64;10;5m").is_empty());
        assert!(decode(b"\x1b[<0;10;5M").is_empty());
    }

    // === Escape and unknown sequences ===

    #[test]
    fn test_bare_escape() {
        assert_eq!(one(&[0x1b]), InputEvent::Escape);
    }

    #[test]
    fn test_alt_key_dropped() {
        assert!(decode(b"\x1ba").is_empty());
    }

    #[test]
    fn test_unknown_csi_dropped() {
        assert!(decode(b"\x1b[99x").is_empty());
    }

    #[test]
    fn test_truncated_csi_discarded() {
        assert!(decode(b"\x1b[1;2").is_empty());
    }

    #[test]
    fn test_paste_guards_dropped() {
        assert_eq!(
            decode(b"\x1b[200~hello\x1b[201~"),
            vec![InputEvent::Text("hello".to_string())]
        );
    }

    #[test]
    fn test_mixed_sequence_order_preserved() {
        let events = decode(b"ab\x1b[Acd");
        assert_eq!(
            events,
            vec![
                InputEvent::Text("ab".to_string()),
                InputEvent::Up,
                InputEvent::Text("cd".to_string()),
            ]
        );
    }
}
