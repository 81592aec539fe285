//! Slash-command palette overlay.
//!
//! The palette activates whenever the input buffer starts with `/` and
//! filters the session's command table by case-sensitive prefix match. Once
//! the query contains a space after the name of a command that declares
//! argument suggestions, filtering switches to argument mode over that
//! command's suggestions. Declared arguments are suggestions, not a closed
//! set — Enter always submits whatever free text follows the command name.

use crate::config::Command;

/// Maximum palette item rows shown at once; the panel shrinks to the item
/// count below this.
pub const PALETTE_MAX_ROWS: usize = 8;

/// Argument-mode sub-state: which command, and which of its declared
/// arguments match the text after the space.
#[derive(Debug, Clone)]
struct ArgFilter {
    command: usize,
    matches: Vec<usize>,
}

/// What Enter should do while the palette is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteEnter {
    /// Nothing matched — fall through to plain submission dispatch.
    FallThrough,
    /// Selected command declares arguments and none are typed yet: rewrite
    /// the input to `/name ` and stay open in argument mode.
    EnterArgMode(usize),
    /// Invoke the command with the given raw argument text.
    Invoke {
        /// Index into the session command table.
        command: usize,
        /// Free text following the command name (may be empty).
        args: String,
    },
}

/// Palette filtering and selection state.
#[derive(Debug, Clone, Default)]
pub struct Palette {
    active: bool,
    query: String,
    filtered: Vec<usize>,
    arg_mode: Option<ArgFilter>,
    selected: usize,
    scroll: usize,
}

impl Palette {
    /// Inactive palette.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True while the overlay is showing.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// True in argument mode.
    #[must_use]
    pub fn in_arg_mode(&self) -> bool {
        self.arg_mode.is_some()
    }

    /// Selection index into the filtered list.
    #[must_use]
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Scroll offset into the filtered list.
    #[must_use]
    pub fn scroll(&self) -> usize {
        self.scroll
    }

    /// Number of rows the filtered list currently holds.
    #[must_use]
    pub fn len(&self) -> usize {
        match &self.arg_mode {
            Some(af) => af.matches.len(),
            None => self.filtered.len(),
        }
    }

    /// True when nothing matches the query.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Recompute filtering from the current input text. Called after every
    /// edit; activates on a leading `/`, deactivates otherwise.
    pub fn update(&mut self, commands: &[Command], input: &str) {
        if !input.starts_with('/') {
            self.dismiss();
            return;
        }
        self.active = true;
        self.query = input[1..].to_string();

        self.arg_mode = None;
        if let Some(space) = self.query.find(' ') {
            let name = &self.query[..space];
            let arg_query = &self.query[space + 1..];
            if let Some(ci) = commands.iter().position(|c| c.name == name) {
                if !commands[ci].args.is_empty() {
                    let matches: Vec<usize> = commands[ci]
                        .args
                        .iter()
                        .enumerate()
                        .filter(|(_, a)| a.starts_with(arg_query))
                        .map(|(i, _)| i)
                        .collect();
                    self.arg_mode = Some(ArgFilter { command: ci, matches });
                }
            }
        }
        if self.arg_mode.is_none() {
            self.filtered = commands
                .iter()
                .enumerate()
                .filter(|(_, c)| c.name.starts_with(&self.query))
                .map(|(i, _)| i)
                .collect();
        }
        self.clamp_selection();
    }

    /// Close the overlay and reset selection state. The next edit that
    /// leaves a leading `/` in the buffer re-opens it.
    pub fn dismiss(&mut self) {
        self.active = false;
        self.query.clear();
        self.filtered.clear();
        self.arg_mode = None;
        self.selected = 0;
        self.scroll = 0;
    }

    /// Move the selection up one row.
    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
        self.follow_selection();
    }

    /// Move the selection down one row.
    pub fn move_down(&mut self) {
        if self.selected + 1 < self.len() {
            self.selected += 1;
        }
        self.follow_selection();
    }

    /// Completion text for Tab: `/name ` in command mode, `/name argument`
    /// in argument mode. None when nothing is selected.
    #[must_use]
    pub fn completion(&self, commands: &[Command]) -> Option<String> {
        match &self.arg_mode {
            Some(af) => {
                let arg_idx = *af.matches.get(self.selected)?;
                let cmd = &commands[af.command];
                Some(format!("/{} {}", cmd.name, cmd.args[arg_idx]))
            }
            None => {
                let ci = *self.filtered.get(self.selected)?;
                Some(format!("/{} ", commands[ci].name))
            }
        }
    }

    /// Resolve what Enter should do given the current query and selection.
    #[must_use]
    pub fn enter_action(&self, commands: &[Command]) -> PaletteEnter {
        if let Some(af) = &self.arg_mode {
            let args = self
                .query
                .find(' ')
                .map(|i| self.query[i + 1..].trim().to_string())
                .unwrap_or_default();
            return PaletteEnter::Invoke {
                command: af.command,
                args,
            };
        }
        match self.filtered.get(self.selected) {
            Some(&ci) => {
                if !commands[ci].args.is_empty() && !self.query.contains(' ') {
                    PaletteEnter::EnterArgMode(ci)
                } else {
                    PaletteEnter::Invoke {
                        command: ci,
                        args: String::new(),
                    }
                }
            }
            None => PaletteEnter::FallThrough,
        }
    }

    /// The full filtered list as `(label, description)` rows for rendering.
    /// In argument mode descriptions are empty.
    #[must_use]
    pub fn rows(&self, commands: &[Command]) -> Vec<(String, String)> {
        match &self.arg_mode {
            Some(af) => {
                let cmd = &commands[af.command];
                af.matches
                    .iter()
                    .map(|&ai| (cmd.args[ai].clone(), String::new()))
                    .collect()
            }
            None => self
                .filtered
                .iter()
                .map(|&ci| {
                    (
                        format!("/{}", commands[ci].name),
                        commands[ci].description.clone(),
                    )
                })
                .collect(),
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.len();
        if len == 0 {
            self.selected = 0;
            self.scroll = 0;
            return;
        }
        self.selected = self.selected.min(len - 1);
        self.follow_selection();
    }

    fn follow_selection(&mut self) {
        if self.selected < self.scroll {
            self.scroll = self.selected;
        } else if self.selected >= self.scroll + PALETTE_MAX_ROWS {
            self.scroll = self.selected + 1 - PALETTE_MAX_ROWS;
        }
        self.scroll = self.scroll.min(self.len().saturating_sub(1));
    }
}
