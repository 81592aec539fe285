//! termloom — a full-screen terminal UI engine for interactive
//! command-line assistants.
//!
//! The engine owns the terminal for the lifetime of [`Tui::run`]: it enters
//! raw mode, decodes the raw byte stream into edit/navigation events,
//! maintains an editable multi-line input box with history, a scrollable
//! word-wrapping transcript with streaming messages, a slash-command
//! palette, and a nested menu overlay, compositing everything into full
//! frames drawn with absolute cursor addressing.
//!
//! # Architecture
//!
//! ```text
//! Tui::run (read loop)          background threads
//! ├── poll/read fd 0            ├── spinner ticker
//! ├── input::decode → events    └── SIGWINCH resize watcher
//! ├── dispatch under Mutex<Inner>
//! ├── screen::render full frame (under the same lock)
//! └── invoke handler callbacks after unlock
//! ```
//!
//! Host applications construct a [`TuiConfig`] (commands, callbacks, theme,
//! labels), call [`Tui::new`], then drive the session from handlers and
//! background threads through the public surface: append/stream messages,
//! spinner and progress, status text, menus, themes, and exit.
//!
//! # Modules
//!
//! - [`ansi`] - escape sequence primitives
//! - [`theme`] - color themes and the session registry
//! - [`editor`] - multi-line input buffer with history
//! - [`transcript`] - scrollback log with streaming messages
//! - [`palette`] - slash-command palette
//! - [`menu`] - nested menu/prompt overlay
//! - [`input`] - byte stream → event decoder
//! - [`layout`] - per-frame region partition
//! - [`screen`] - full-frame renderer
//! - [`guard`] - RAII terminal restoration
//! - [`config`] - session construction input
//! - [`runner`] - the session itself and its event loop

pub mod ansi;
pub mod config;
pub mod editor;
pub mod guard;
pub mod input;
pub mod layout;
pub mod menu;
pub mod palette;
pub mod screen;
pub mod theme;
pub mod transcript;

pub mod runner;

// Re-export the everyday surface.
pub use config::{Command, EscapeHandler, Handler, TuiConfig};
pub use menu::{Menu, MenuItem};
pub use runner::Tui;
pub use theme::{Color, Theme, ThemeRegistry};
pub use transcript::Role;
