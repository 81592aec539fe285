//! Session construction input.
//!
//! [`TuiConfig`] is built programmatically by the host application and handed
//! to [`Tui::new`](crate::runner::Tui::new). It enumerates the theme, the
//! slash-command table for the palette, the submit/escape callbacks, role
//! display labels, status text, and the output-only toggle. Config file and
//! flag parsing belong to the host, not this engine.

use std::fmt;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::runner::Tui;
use crate::theme::Theme;

/// Callback receiving the session handle and free-form text.
///
/// Invoked after the session lock is released, so the callback may re-enter
/// any public [`Tui`] method.
pub type Handler = Arc<dyn Fn(&Tui, &str) + Send + Sync>;

/// Callback receiving only the session handle (Escape with no overlay open).
pub type EscapeHandler = Arc<dyn Fn(&Tui) + Send + Sync>;

/// A palette command: `/name` plus optional argument suggestions.
#[derive(Clone)]
pub struct Command {
    /// Name typed after the slash, without the slash.
    pub name: String,
    /// One-line description shown in the palette.
    pub description: String,
    /// Declared argument suggestions. Suggestions only — submission is not
    /// restricted to this set.
    pub args: Vec<String>,
    /// Handler invoked with the raw argument text following the name.
    pub handler: Handler,
}

impl Command {
    /// Convenience constructor for a command without argument suggestions.
    pub fn new(
        name: &str,
        description: &str,
        handler: impl Fn(&Tui, &str) + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            args: Vec::new(),
            handler: Arc::new(handler),
        }
    }

    /// Convenience constructor with declared argument suggestions.
    pub fn with_args(
        name: &str,
        description: &str,
        args: &[&str],
        handler: impl Fn(&Tui, &str) + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            args: args.iter().map(ToString::to_string).collect(),
            handler: Arc::new(handler),
        }
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

/// Everything the session needs at construction time.
#[derive(Clone, Default)]
pub struct TuiConfig {
    /// Name of the active theme; unknown names fall back to `default`.
    pub theme: String,
    /// Additional themes registered on top of the builtins.
    pub themes: Vec<(String, Theme)>,
    /// Palette command table. Immutable for the session.
    pub commands: Vec<Command>,
    /// Called with the trimmed input text on plain submission.
    pub on_submit: Option<Handler>,
    /// Called when Escape is pressed with no overlay to dismiss.
    pub on_escape: Option<EscapeHandler>,
    /// Display label for user messages (empty keeps the default "You").
    pub user_label: String,
    /// Display label for assistant messages (empty keeps "Assistant").
    pub assistant_label: String,
    /// Display label for system messages (empty keeps "System").
    pub system_label: String,
    /// Suppress role headers entirely.
    pub hide_headers: bool,
    /// Initial bottom-left status text.
    pub status_left: String,
    /// Initial bottom-right status text.
    pub status_right: String,
    /// Show the input character count in the bottom border.
    pub show_char_count: bool,
    /// When false the input box is replaced by a bare separator and all
    /// editing input is ignored (output-only / log-viewer mode).
    pub input_enabled: bool,
    /// External shutdown flag: setting it true stops `run` within one poll
    /// interval. A fresh flag is created when absent.
    pub shutdown: Option<Arc<AtomicBool>>,
}

impl TuiConfig {
    /// Config with input enabled and everything else defaulted.
    #[must_use]
    pub fn new() -> Self {
        Self {
            input_enabled: true,
            ..Self::default()
        }
    }
}

impl fmt::Debug for TuiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TuiConfig")
            .field("theme", &self.theme)
            .field("commands", &self.commands.len())
            .field("input_enabled", &self.input_enabled)
            .finish_non_exhaustive()
    }
}
