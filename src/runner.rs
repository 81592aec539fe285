//! The TUI session: shared state, lock discipline, and the event loop.
//!
//! # Architecture
//!
//! ```text
//! Tui (cloneable handle)
//! ├── Shared
//! │   ├── inner: Mutex<Inner>     - editor, transcript, palette, menu,
//! │   │                             theme, size, spinner/progress, flags
//! │   ├── commands, callbacks     - immutable for the session
//! │   └── shutdown: AtomicBool    - external cancellation flag
//! ├── run()                       - raw mode, poll/read/decode/dispatch loop
//! ├── spinner thread              - ticks animation via stop channel
//! └── resize watcher thread       - SIGWINCH → re-query size → redraw
//! ```
//!
//! Every public mutator acquires the one session mutex, mutates, redraws,
//! and releases — redraw always happens under the lock, so frames from the
//! read loop, the spinner thread, and the resize watcher can never
//! interleave. Handler callbacks produced by input dispatch are invoked
//! strictly *after* the lock is released, so a handler may re-enter any
//! public method without deadlocking. That ordering is a correctness
//! contract, not an optimization.
//!
//! The read loop polls fd 0 with a bounded timeout and re-checks the quit
//! and shutdown flags between polls, so `exit()`, Ctrl+C, and external
//! shutdown are all observed within one poll interval even when no input
//! arrives.

// Rust guideline compliant 2026-02

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use crossterm::terminal::enable_raw_mode;

use crate::ansi;
use crate::config::{Command, EscapeHandler, Handler, TuiConfig};
use crate::editor::Editor;
use crate::guard::TerminalGuard;
use crate::input::{self, InputEvent, WHEEL_SCROLL_LINES};
use crate::layout::{self, input_inner_width, Layout, LayoutRequest};
use crate::menu::{Menu, MenuOutcome, MenuState};
use crate::palette::{Palette, PaletteEnter};
use crate::screen::{self, FrameContext};
use crate::theme::{Theme, ThemeRegistry, DEFAULT_THEME};
use crate::transcript::{RenderOpts, Role, Transcript};

/// Bounded stdin poll so quit/shutdown flags are observed while idle.
const POLL_INTERVAL_MS: i32 = 100;

/// Spinner animation cadence.
const SPINNER_INTERVAL: Duration = Duration::from_millis(100);

/// Braille spinner frames.
const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Read buffer size; large enough for any escape sequence and most pastes
/// in one chunk.
const READ_BUF_SIZE: usize = 4096;

/// Session-internal spinner state. Dropping `stop_tx` disconnects the tick
/// thread's channel and stops it.
struct Spinner {
    label: String,
    frame: usize,
    stop_tx: Sender<()>,
}

/// All mutable session state, guarded by the one session mutex.
struct Inner {
    registry: ThemeRegistry,
    theme: Theme,
    editor: Editor,
    transcript: Transcript,
    palette: Palette,
    menu: Option<MenuState>,
    rows: usize,
    cols: usize,
    /// True between raw-mode entry and loop exit; gates all terminal writes
    /// so the full API works headless (and under test).
    running: bool,
    quit: bool,
    input_enabled: bool,
    spinner: Option<Spinner>,
    progress: Option<(String, u8)>,
    status: String,
    status_left: String,
    status_right: String,
}

/// Immutable session environment shared by every handle clone.
struct Shared {
    inner: Mutex<Inner>,
    commands: Vec<Command>,
    on_submit: Option<Handler>,
    on_escape: Option<EscapeHandler>,
    render_opts: RenderOpts,
    show_char_count: bool,
    shutdown: Arc<AtomicBool>,
}

/// A callback resolved by input dispatch, to be invoked after the session
/// lock is released.
pub(crate) enum Pending {
    Submit(String),
    Command { index: usize, args: String },
    Menu { handler: Handler, input: String },
    Escape,
}

/// Cloneable handle to one terminal session.
///
/// All methods are safe to call from any thread, including from inside
/// submit/command/menu handlers.
#[derive(Clone)]
pub struct Tui {
    shared: Arc<Shared>,
}

impl Tui {
    /// Build a session from its construction input. Nothing touches the
    /// terminal until [`Tui::run`].
    #[must_use]
    pub fn new(config: TuiConfig) -> Self {
        let mut registry = ThemeRegistry::with_builtins();
        for (name, theme) in &config.themes {
            registry.register(name, *theme);
        }
        let theme = registry.lookup(&config.theme).unwrap_or(DEFAULT_THEME);

        let mut render_opts = RenderOpts {
            hide_headers: config.hide_headers,
            ..RenderOpts::default()
        };
        if !config.user_label.is_empty() {
            render_opts.user_label = config.user_label.clone();
        }
        if !config.assistant_label.is_empty() {
            render_opts.assistant_label = config.assistant_label.clone();
        }
        if !config.system_label.is_empty() {
            render_opts.system_label = config.system_label.clone();
        }

        let inner = Inner {
            registry,
            theme,
            editor: Editor::new(),
            transcript: Transcript::new(),
            palette: Palette::new(),
            menu: None,
            rows: layout::FALLBACK_ROWS,
            cols: layout::FALLBACK_COLS,
            running: false,
            quit: false,
            input_enabled: config.input_enabled,
            spinner: None,
            progress: None,
            status: String::new(),
            status_left: config.status_left.clone(),
            status_right: config.status_right.clone(),
        };

        Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(inner),
                commands: config.commands,
                on_submit: config.on_submit,
                on_escape: config.on_escape,
                render_opts,
                show_char_count: config.show_char_count,
                shutdown: config.shutdown.unwrap_or_default(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.shared.inner.lock().expect("session lock poisoned")
    }

    // === Messages ===

    /// Append a complete message.
    pub fn add_message(&self, role: Role, content: &str) {
        let mut inner = self.lock();
        inner.transcript.push(role, content);
        self.redraw_locked(&mut inner);
    }

    /// Append a complete message with a label override.
    pub fn add_message_as(&self, role: Role, label: &str, content: &str) {
        let mut inner = self.lock();
        inner.transcript.push_as(role, label, content);
        self.redraw_locked(&mut inner);
    }

    /// Open a streaming assistant message. An unfinished stream is
    /// discarded silently.
    pub fn start_streaming(&self) {
        let mut inner = self.lock();
        inner.transcript.start_streaming();
        self.redraw_locked(&mut inner);
    }

    /// Open a streaming assistant message with a label override.
    pub fn start_streaming_as(&self, label: &str) {
        let mut inner = self.lock();
        inner.transcript.start_streaming_as(label);
        self.redraw_locked(&mut inner);
    }

    /// Append a chunk to the streaming message.
    pub fn stream_chunk(&self, chunk: &str) {
        let mut inner = self.lock();
        inner.transcript.stream_chunk(chunk);
        self.redraw_locked(&mut inner);
    }

    /// Finalize the streaming message. Scroll position is left alone.
    pub fn stream_complete(&self) {
        let mut inner = self.lock();
        inner.transcript.stream_complete();
        self.redraw_locked(&mut inner);
    }

    /// True while a streaming message is open.
    #[must_use]
    pub fn is_streaming(&self) -> bool {
        self.lock().transcript.is_streaming()
    }

    /// Number of finalized messages.
    #[must_use]
    pub fn message_count(&self) -> usize {
        self.lock().transcript.len()
    }

    /// Drop all messages and reset scroll.
    pub fn clear_messages(&self) {
        let mut inner = self.lock();
        inner.transcript.clear();
        self.redraw_locked(&mut inner);
    }

    // === Overlays ===

    /// Open the menu overlay on `menu`, replacing any open one.
    pub fn open_menu(&self, menu: Menu) {
        let mut inner = self.lock();
        inner.menu = Some(MenuState::new(menu));
        self.redraw_locked(&mut inner);
    }

    /// Close the menu overlay if open.
    pub fn close_menu(&self) {
        let mut inner = self.lock();
        inner.menu = None;
        self.redraw_locked(&mut inner);
    }

    // === Themes ===

    /// Switch the active theme by name. Returns false and changes nothing
    /// for an unknown name.
    pub fn set_theme(&self, name: &str) -> bool {
        let mut inner = self.lock();
        let Some(theme) = inner.registry.lookup(name) else {
            return false;
        };
        inner.theme = theme;
        self.redraw_locked(&mut inner);
        true
    }

    /// Register an additional theme at runtime.
    pub fn register_theme(&self, name: &str, theme: Theme) {
        self.lock().registry.register(name, theme);
    }

    /// Sorted names of all registered themes.
    #[must_use]
    pub fn theme_names(&self) -> Vec<String> {
        self.lock().registry.names()
    }

    // === Spinner / progress / status ===

    /// Start (or restart) the spinner with `label`. A running spinner is
    /// stopped first by closing its stop channel.
    pub fn start_spinner(&self, label: &str) {
        let (stop_tx, stop_rx) = mpsc::channel();
        {
            let mut inner = self.lock();
            // Dropping the old sender disconnects the old tick thread.
            inner.spinner = Some(Spinner {
                label: label.to_string(),
                frame: 0,
                stop_tx,
            });
            self.redraw_locked(&mut inner);
        }
        let tui = self.clone();
        thread::spawn(move || loop {
            match stop_rx.recv_timeout(SPINNER_INTERVAL) {
                Err(RecvTimeoutError::Timeout) => {
                    if !tui.tick_spinner() {
                        break;
                    }
                }
                _ => break,
            }
        });
    }

    /// Stop and clear the spinner.
    pub fn stop_spinner(&self) {
        let mut inner = self.lock();
        if let Some(spinner) = inner.spinner.take() {
            drop(spinner.stop_tx);
        }
        self.redraw_locked(&mut inner);
    }

    /// Advance the spinner one frame; false once the spinner is gone.
    fn tick_spinner(&self) -> bool {
        let mut inner = self.lock();
        let Some(spinner) = inner.spinner.as_mut() else {
            return false;
        };
        spinner.frame = spinner.frame.wrapping_add(1);
        self.redraw_locked(&mut inner);
        true
    }

    /// Set the progress bar shown in the input-box border. Percent is
    /// clamped to 100.
    pub fn set_progress(&self, label: &str, percent: u8) {
        let mut inner = self.lock();
        inner.progress = Some((label.to_string(), percent.min(100)));
        self.redraw_locked(&mut inner);
    }

    /// Clear the progress bar.
    pub fn clear_progress(&self) {
        let mut inner = self.lock();
        inner.progress = None;
        self.redraw_locked(&mut inner);
    }

    /// Set the bottom-border left/right status text.
    pub fn set_status(&self, left: &str, right: &str) {
        let mut inner = self.lock();
        inner.status_left = left.to_string();
        inner.status_right = right.to_string();
        self.redraw_locked(&mut inner);
    }

    /// Set the top-border status text (shown when no scroll hint, spinner,
    /// or progress bar takes priority).
    pub fn set_top_status(&self, text: &str) {
        let mut inner = self.lock();
        inner.status = text.to_string();
        self.redraw_locked(&mut inner);
    }

    // === Lifecycle ===

    /// Request a clean exit; the run loop stops within one poll interval.
    pub fn exit(&self) {
        self.lock().quit = true;
    }

    /// The shutdown flag honored by [`Tui::run`]. Shared with the flag
    /// passed in [`TuiConfig::shutdown`], so external code may flip it.
    #[must_use]
    pub fn shutdown_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shared.shutdown)
    }

    fn should_quit(&self) -> bool {
        self.lock().quit || self.shared.shutdown.load(Ordering::Relaxed)
    }

    /// Own the terminal and run the input loop until exit.
    ///
    /// Fails only when stdin/stdout is not a terminal or raw mode cannot be
    /// entered; nothing is drawn in that case. On every exit path — quit,
    /// EOF, read error, panic in the loop — the terminal is restored: raw
    /// mode off, cursor shown, mouse reporting off, scroll region reset.
    pub fn run(&self) -> Result<()> {
        if !atty::is(atty::Stream::Stdin) || !atty::is(atty::Stream::Stdout) {
            bail!("an interactive terminal is required on stdin and stdout");
        }
        enable_raw_mode().context("failed to enter raw terminal mode")?;
        let rows = {
            let mut inner = self.lock();
            inner.running = true;
            inner.quit = false;
            let (r, c) = query_size();
            inner.rows = r;
            inner.cols = c;
            r
        };
        let _guard = TerminalGuard::new(rows);
        {
            let mut out = io::stdout().lock();
            let _ = out.write_all(
                format!("{}{}{}", ansi::CLEAR_SCREEN, ansi::HIDE_CURSOR, ansi::MOUSE_ON)
                    .as_bytes(),
            );
            let _ = out.flush();
        }
        {
            let mut inner = self.lock();
            self.redraw_locked(&mut inner);
        }
        let resize = spawn_resize_watcher(self.clone());
        log::info!("session started");

        let mut buf = [0u8; READ_BUF_SIZE];
        loop {
            if self.should_quit() {
                break;
            }
            match poll_stdin(POLL_INTERVAL_MS) {
                PollOutcome::Timeout => continue,
                PollOutcome::Dead => {
                    log::error!("stdin is dead, shutting down");
                    break;
                }
                PollOutcome::Ready => {}
            }
            let n = match read_stdin(&mut buf) {
                ReadOutcome::Data(n) => n,
                ReadOutcome::Retry => continue,
                ReadOutcome::Eof => {
                    log::info!("stdin EOF, shutting down");
                    break;
                }
                ReadOutcome::Failed => {
                    log::error!("stdin read failed, shutting down");
                    break;
                }
            };
            for event in input::decode(&buf[..n]) {
                let pending = {
                    let mut inner = self.lock();
                    let pending = self.handle_event(&mut inner, event);
                    self.redraw_locked(&mut inner);
                    pending
                };
                // Lock released: handlers may re-enter the session freely.
                if let Some(pending) = pending {
                    self.dispatch_pending(pending);
                }
            }
        }

        stop_resize_watcher(resize);
        {
            let mut inner = self.lock();
            inner.running = false;
            if let Some(spinner) = inner.spinner.take() {
                drop(spinner.stop_tx);
            }
        }
        log::info!("session ended");
        Ok(())
    }

    /// Re-query the terminal size and repaint. Called by the resize
    /// watcher.
    fn handle_resize(&self) {
        let mut inner = self.lock();
        let (rows, cols) = query_size();
        inner.rows = rows;
        inner.cols = cols;
        self.redraw_locked(&mut inner);
    }

    // === Input dispatch ===

    fn layout_request(&self, inner: &Inner) -> LayoutRequest {
        LayoutRequest {
            menu_open: inner.menu.is_some(),
            input_enabled: inner.input_enabled,
            palette_active: inner.palette.is_active(),
            palette_items: inner.palette.len(),
            input_lines: inner
                .editor
                .display_line_count(input_inner_width(inner.cols)),
        }
    }

    fn current_layout(&self, inner: &Inner) -> Layout {
        layout::compute(inner.rows, inner.cols, &self.layout_request(inner))
    }

    fn scroll_transcript(&self, inner: &mut Inner, delta: isize) {
        let l = self.current_layout(inner);
        if delta > 0 {
            let total = inner
                .transcript
                .render_lines(&inner.theme, &self.shared.render_opts, l.cols)
                .len();
            let max = Transcript::max_scroll(total, l.transcript_height);
            inner.transcript.scroll_up(delta.unsigned_abs(), max);
        } else {
            inner.transcript.scroll_down(delta.unsigned_abs());
        }
    }

    /// Route one decoded event. Returns the callback to invoke after the
    /// lock is released, if any.
    fn handle_event(&self, inner: &mut Inner, event: InputEvent) -> Option<Pending> {
        if event == InputEvent::Quit {
            inner.quit = true;
            return None;
        }

        // The menu overlay suppresses everything else while open.
        if inner.menu.is_some() {
            return self.handle_menu_event(inner, event);
        }

        match event {
            InputEvent::WheelUp => {
                self.scroll_transcript(inner, WHEEL_SCROLL_LINES as isize);
                None
            }
            InputEvent::WheelDown => {
                self.scroll_transcript(inner, -(WHEEL_SCROLL_LINES as isize));
                None
            }
            InputEvent::PageUp => {
                let half = (self.current_layout(inner).transcript_height / 2).max(1);
                self.scroll_transcript(inner, half as isize);
                None
            }
            InputEvent::PageDown => {
                let half = (self.current_layout(inner).transcript_height / 2).max(1);
                self.scroll_transcript(inner, -(half as isize));
                None
            }
            InputEvent::Escape => {
                if inner.palette.is_active() {
                    inner.palette.dismiss();
                    return None;
                }
                Some(Pending::Escape)
            }
            InputEvent::Enter => self.handle_enter(inner),
            _ if !inner.input_enabled => None,
            InputEvent::Up if inner.palette.is_active() => {
                inner.palette.move_up();
                None
            }
            InputEvent::Down if inner.palette.is_active() => {
                inner.palette.move_down();
                None
            }
            InputEvent::Tab => {
                if inner.palette.is_active() {
                    if let Some(text) = inner.palette.completion(&self.shared.commands) {
                        inner.editor.set_text(&text);
                        let text = inner.editor.text();
                        inner.palette.update(&self.shared.commands, &text);
                    }
                }
                None
            }
            InputEvent::Up => {
                if inner.editor.on_first_line() {
                    inner.editor.history_up();
                    self.sync_palette(inner);
                } else {
                    inner.editor.move_up();
                }
                None
            }
            InputEvent::Down => {
                if inner.editor.on_last_line() {
                    inner.editor.history_down();
                    self.sync_palette(inner);
                } else {
                    inner.editor.move_down();
                }
                None
            }
            InputEvent::Left => {
                inner.editor.move_left();
                None
            }
            InputEvent::Right => {
                inner.editor.move_right();
                None
            }
            InputEvent::Home | InputEvent::CursorToStart => {
                inner.editor.move_home();
                None
            }
            InputEvent::End | InputEvent::CursorToEnd => {
                inner.editor.move_end();
                None
            }
            InputEvent::NewlineShortcut => {
                inner.editor.insert_newline();
                self.sync_palette(inner);
                None
            }
            InputEvent::Backspace => {
                inner.editor.backspace();
                self.sync_palette(inner);
                None
            }
            InputEvent::DeleteForward => {
                inner.editor.delete_forward();
                self.sync_palette(inner);
                None
            }
            InputEvent::KillToEnd => {
                inner.editor.kill_to_end();
                self.sync_palette(inner);
                None
            }
            InputEvent::KillToStart => {
                inner.editor.kill_to_start();
                self.sync_palette(inner);
                None
            }
            InputEvent::DeleteWord => {
                inner.editor.delete_word();
                self.sync_palette(inner);
                None
            }
            InputEvent::Text(text) => {
                inner.editor.insert_text(&text);
                self.sync_palette(inner);
                None
            }
            // Quit/Wheel/Page/Escape/Enter handled above.
            _ => None,
        }
    }

    /// Re-filter the palette from the current editor text; opens it on a
    /// leading `/`, closes it otherwise.
    fn sync_palette(&self, inner: &mut Inner) {
        let text = inner.editor.text();
        inner.palette.update(&self.shared.commands, &text);
    }

    fn handle_menu_event(&self, inner: &mut Inner, event: InputEvent) -> Option<Pending> {
        let menu = inner.menu.as_mut()?;
        let mut pending = None;
        match event {
            InputEvent::Up => menu.move_up(),
            InputEvent::Down => menu.move_down(),
            InputEvent::Enter => match menu.enter() {
                MenuOutcome::Invoke { handler, input } => {
                    pending = Some(Pending::Menu { handler, input });
                }
                MenuOutcome::Handled | MenuOutcome::Closed => {}
            },
            InputEvent::Escape => menu.escape(),
            InputEvent::Backspace => menu.prompt_backspace(),
            InputEvent::Text(text) => {
                if menu.in_prompt() {
                    for c in text.chars().filter(|c| *c != '\n') {
                        menu.prompt_char(c);
                    }
                }
            }
            _ => {}
        }
        if menu.is_closed() {
            inner.menu = None;
        }
        pending
    }

    /// Enter's priority cascade: palette selection, then slash dispatch,
    /// then the plain submit callback.
    fn handle_enter(&self, inner: &mut Inner) -> Option<Pending> {
        if !inner.input_enabled {
            return None;
        }
        if inner.palette.is_active() {
            match inner.palette.enter_action(&self.shared.commands) {
                PaletteEnter::EnterArgMode(index) => {
                    let text = format!("/{} ", self.shared.commands[index].name);
                    inner.editor.set_text(&text);
                    inner.palette.update(&self.shared.commands, &text);
                    return None;
                }
                PaletteEnter::Invoke { command, args } => {
                    let text = inner.editor.text();
                    inner.editor.push_history(text.trim());
                    inner.editor.clear();
                    inner.palette.dismiss();
                    return Some(Pending::Command {
                        index: command,
                        args,
                    });
                }
                PaletteEnter::FallThrough => {}
            }
        }

        let text = inner.editor.text().trim().to_string();
        if text.is_empty() {
            return None;
        }
        inner.editor.push_history(&text);
        inner.editor.clear();
        inner.palette.dismiss();

        if let Some(rest) = text.strip_prefix('/') {
            let (name, args) = match rest.split_once(' ') {
                Some((name, args)) => (name, args.trim()),
                None => (rest, ""),
            };
            if let Some(index) = self.shared.commands.iter().position(|c| c.name == name) {
                return Some(Pending::Command {
                    index,
                    args: args.to_string(),
                });
            }
            inner
                .transcript
                .push(Role::System, &format!("Unknown command: /{name}"));
            return None;
        }
        Some(Pending::Submit(text))
    }

    /// Invoke a resolved callback. Must be called without the lock held.
    fn dispatch_pending(&self, pending: Pending) {
        match pending {
            Pending::Submit(text) => {
                if let Some(handler) = &self.shared.on_submit {
                    handler(self, &text);
                }
            }
            Pending::Command { index, args } => {
                let handler = self.shared.commands[index].handler.clone();
                handler(self, &args);
            }
            Pending::Menu { handler, input } => handler(self, &input),
            Pending::Escape => {
                if let Some(handler) = &self.shared.on_escape {
                    handler(self);
                }
            }
        }
    }

    // === Rendering ===

    /// Repaint the full frame. No-op while the terminal is not owned.
    fn redraw_locked(&self, inner: &mut Inner) {
        if !inner.running {
            return;
        }
        let layout = self.current_layout(inner);
        if let Some(region) = layout.input {
            inner.editor.scroll_to_cursor(
                input_inner_width(layout.cols),
                region.height.saturating_sub(2),
            );
        }
        let spinner = inner
            .spinner
            .as_ref()
            .map(|s| (SPINNER_FRAMES[s.frame % SPINNER_FRAMES.len()], s.label.as_str()));
        let ctx = FrameContext {
            layout: &layout,
            theme: &inner.theme,
            transcript: &inner.transcript,
            render_opts: &self.shared.render_opts,
            editor: &inner.editor,
            palette: &inner.palette,
            commands: &self.shared.commands,
            menu: inner.menu.as_ref(),
            spinner,
            progress: inner.progress.as_ref().map(|(l, p)| (l.as_str(), *p)),
            status: &inner.status,
            status_left: &inner.status_left,
            status_right: &inner.status_right,
            show_char_count: self.shared.show_char_count,
        };
        let frame = screen::render(&ctx);
        let mut out = io::stdout().lock();
        if out
            .write_all(frame.as_bytes())
            .and_then(|()| out.flush())
            .is_err()
        {
            log::error!("stdout write failed during redraw");
        }
    }
}

/// Terminal size as `(rows, cols)`, substituting the 80×24 fallback when
/// the query fails or reports a degenerate size.
fn query_size() -> (usize, usize) {
    match crossterm::terminal::size() {
        Ok((cols, rows)) if rows >= 8 && cols >= 20 => (rows as usize, cols as usize),
        _ => (layout::FALLBACK_ROWS, layout::FALLBACK_COLS),
    }
}

enum PollOutcome {
    Ready,
    Timeout,
    Dead,
}

enum ReadOutcome {
    Data(usize),
    Eof,
    Retry,
    Failed,
}

/// Wait for stdin readability with a bounded timeout.
#[cfg(unix)]
fn poll_stdin(timeout_ms: i32) -> PollOutcome {
    let mut pollfd = libc::pollfd {
        fd: libc::STDIN_FILENO,
        events: libc::POLLIN,
        revents: 0,
    };
    let ready = unsafe { libc::poll(&mut pollfd, 1, timeout_ms) };
    if ready < 0 {
        let err = io::Error::last_os_error();
        if err.kind() == io::ErrorKind::Interrupted {
            return PollOutcome::Timeout;
        }
        return PollOutcome::Dead;
    }
    if ready == 0 {
        return PollOutcome::Timeout;
    }
    if pollfd.revents & (libc::POLLERR | libc::POLLHUP | libc::POLLNVAL) != 0 {
        return PollOutcome::Dead;
    }
    PollOutcome::Ready
}

/// Non-Unix fallback: no poll available, go straight to the blocking read.
/// Quit-flag latency is then bounded by the next keystroke, not the poll
/// interval.
#[cfg(not(unix))]
fn poll_stdin(_timeout_ms: i32) -> PollOutcome {
    PollOutcome::Ready
}

/// Read directly from fd 0 — std::io::stdin()'s BufReader keeps its own
/// buffer that gets out of sync with poll(2).
#[cfg(unix)]
fn read_stdin(buf: &mut [u8]) -> ReadOutcome {
    let n = unsafe { libc::read(libc::STDIN_FILENO, buf.as_mut_ptr().cast(), buf.len()) };
    if n > 0 {
        return ReadOutcome::Data(n as usize);
    }
    if n == 0 {
        return ReadOutcome::Eof;
    }
    let err = io::Error::last_os_error();
    match err.kind() {
        io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock => ReadOutcome::Retry,
        _ => {
            log::error!("stdin read error: {err}");
            ReadOutcome::Failed
        }
    }
}

#[cfg(not(unix))]
fn read_stdin(buf: &mut [u8]) -> ReadOutcome {
    use std::io::Read;
    match io::stdin().read(buf) {
        Ok(0) => ReadOutcome::Eof,
        Ok(n) => ReadOutcome::Data(n),
        Err(err) if err.kind() == io::ErrorKind::Interrupted => ReadOutcome::Retry,
        Err(_) => ReadOutcome::Failed,
    }
}

/// Watch for SIGWINCH and repaint on delivery. Returns a handle used to
/// stop the watcher when the loop exits.
#[cfg(unix)]
fn spawn_resize_watcher(tui: Tui) -> Option<signal_hook::iterator::Handle> {
    use signal_hook::consts::signal::SIGWINCH;
    use signal_hook::iterator::Signals;

    let mut signals = match Signals::new([SIGWINCH]) {
        Ok(signals) => signals,
        Err(err) => {
            log::error!("failed to install SIGWINCH watcher: {err}");
            return None;
        }
    };
    let handle = signals.handle();
    thread::spawn(move || {
        for _ in signals.forever() {
            tui.handle_resize();
        }
    });
    Some(handle)
}

#[cfg(unix)]
fn stop_resize_watcher(handle: Option<signal_hook::iterator::Handle>) {
    if let Some(handle) = handle {
        handle.close();
    }
}

/// No resize signal on this platform; resizes are picked up on the next
/// repaint's size query.
#[cfg(not(unix))]
fn spawn_resize_watcher(_tui: Tui) {}

#[cfg(not(unix))]
fn stop_resize_watcher(_handle: ()) {}
