//! Navigable menu overlay with nested sub-menus and prompt items.
//!
//! A [`Menu`] is a title plus ordered items. An item declares at most one of
//! `children` (push a sub-menu), `prompt` (single-line text entry), or
//! neither (terminal leaf, invoked directly). The overlay is a stack of
//! levels; each level keeps its own selection and scroll so popping returns
//! to the parent exactly as it was left. While any prompt is capturing, all
//! other input handling is suspended.

// Rust guideline compliant 2026-01

use std::fmt;

use crate::config::Handler;

/// Number of item rows visible in the menu panel at once.
pub const MENU_VISIBLE_ROWS: usize = 8;

/// An ordered list of items under a title.
#[derive(Clone, Default)]
pub struct Menu {
    /// Title shown in the panel header (breadcrumbed when nested).
    pub title: String,
    /// Items in display order.
    pub items: Vec<MenuItem>,
}

impl Menu {
    /// Menu with the given title and no items.
    #[must_use]
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            items: Vec::new(),
        }
    }

    /// Append a terminal leaf item.
    #[must_use]
    pub fn leaf(mut self, label: &str, handler: Handler) -> Self {
        self.items.push(MenuItem {
            label: label.to_string(),
            children: None,
            prompt: None,
            handler: Some(handler),
        });
        self
    }

    /// Append an item that opens a sub-menu.
    #[must_use]
    pub fn submenu(mut self, label: &str, child: Menu) -> Self {
        self.items.push(MenuItem {
            label: label.to_string(),
            children: Some(child),
            prompt: None,
            handler: None,
        });
        self
    }

    /// Append a prompt item: Enter opens single-line text entry, and the
    /// handler receives the typed text.
    #[must_use]
    pub fn prompt(mut self, label: &str, prompt: &str, handler: Handler) -> Self {
        self.items.push(MenuItem {
            label: label.to_string(),
            children: None,
            prompt: Some(prompt.to_string()),
            handler: Some(handler),
        });
        self
    }
}

impl fmt::Debug for Menu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Menu")
            .field("title", &self.title)
            .field("items", &self.items.len())
            .finish()
    }
}

/// One menu entry.
#[derive(Clone)]
pub struct MenuItem {
    /// Display label.
    pub label: String,
    /// Sub-menu pushed on Enter.
    pub children: Option<Menu>,
    /// Prompt label; when set, Enter opens text entry for this item.
    pub prompt: Option<String>,
    /// Handler for leaf and prompt items.
    pub handler: Option<Handler>,
}

/// In-progress text entry for a prompt item.
#[derive(Clone)]
struct PromptState {
    item: usize,
    buffer: String,
}

/// One frame of the navigation stack.
#[derive(Clone)]
struct MenuLevel {
    menu: Menu,
    selected: usize,
    scroll: usize,
    prompt: Option<PromptState>,
}

/// Result of an Enter press inside the overlay.
pub enum MenuOutcome {
    /// Selection handled internally (pushed a level or opened a prompt).
    Handled,
    /// Invoke `handler` with `input` after the lock is released; the overlay
    /// has been closed.
    Invoke {
        /// The item's handler.
        handler: Handler,
        /// Prompt text, or empty for plain leaves.
        input: String,
    },
    /// The whole overlay closed with nothing to invoke.
    Closed,
}

/// The overlay: a non-empty stack of levels.
#[derive(Clone)]
pub struct MenuState {
    stack: Vec<MenuLevel>,
    closed: bool,
}

impl MenuState {
    /// Open the overlay on a root menu.
    #[must_use]
    pub fn new(root: Menu) -> Self {
        Self {
            stack: vec![MenuLevel {
                menu: root,
                selected: 0,
                scroll: 0,
                prompt: None,
            }],
            closed: false,
        }
    }

    /// True once the overlay has dismissed itself; the owner drops it.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Stack depth (1 = root).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Breadcrumb title: the root title alone, or `Parent › Child` when
    /// nested.
    #[must_use]
    pub fn breadcrumb(&self) -> String {
        self.stack
            .iter()
            .map(|l| l.menu.title.as_str())
            .collect::<Vec<_>>()
            .join(" › ")
    }

    /// Selected index at the current level.
    #[must_use]
    pub fn selected(&self) -> usize {
        self.top().selected
    }

    /// Scroll offset at the current level.
    #[must_use]
    pub fn scroll(&self) -> usize {
        self.top().scroll
    }

    /// Item labels at the current level.
    #[must_use]
    pub fn labels(&self) -> Vec<&str> {
        self.top().menu.items.iter().map(|i| i.label.as_str()).collect()
    }

    /// Current level's title (not breadcrumbed).
    #[must_use]
    pub fn title(&self) -> &str {
        &self.top().menu.title
    }

    /// Active prompt as `(prompt_label, typed_text)`, if any.
    #[must_use]
    pub fn active_prompt(&self) -> Option<(&str, &str)> {
        let level = self.top();
        let ps = level.prompt.as_ref()?;
        let label = level.menu.items[ps.item].prompt.as_deref().unwrap_or("");
        Some((label, ps.buffer.as_str()))
    }

    /// Move the selection up, clamping at the first item.
    pub fn move_up(&mut self) {
        let level = self.top_mut();
        if level.prompt.is_some() {
            return;
        }
        level.selected = level.selected.saturating_sub(1);
        Self::follow(level);
    }

    /// Move the selection down, clamping at the last item.
    pub fn move_down(&mut self) {
        let level = self.top_mut();
        if level.prompt.is_some() {
            return;
        }
        if level.selected + 1 < level.menu.items.len() {
            level.selected += 1;
        }
        Self::follow(level);
    }

    /// Feed one printable character to an active prompt.
    pub fn prompt_char(&mut self, c: char) {
        if let Some(ps) = self.top_mut().prompt.as_mut() {
            ps.buffer.push(c);
        }
    }

    /// Trim the last character of an active prompt.
    pub fn prompt_backspace(&mut self) {
        if let Some(ps) = self.top_mut().prompt.as_mut() {
            ps.buffer.pop();
        }
    }

    /// True while a prompt is capturing text.
    #[must_use]
    pub fn in_prompt(&self) -> bool {
        self.top().prompt.is_some()
    }

    /// Enter: confirm a prompt, descend into children, open a prompt, or
    /// invoke a leaf (closing the overlay).
    pub fn enter(&mut self) -> MenuOutcome {
        let level = self.top_mut();
        if let Some(ps) = level.prompt.take() {
            let item = &level.menu.items[ps.item];
            let Some(handler) = item.handler.clone() else {
                return MenuOutcome::Closed;
            };
            self.closed = true;
            return MenuOutcome::Invoke {
                handler,
                input: ps.buffer,
            };
        }
        if level.menu.items.is_empty() {
            return MenuOutcome::Handled;
        }
        let idx = level.selected;
        let item = &level.menu.items[idx];
        if let Some(child) = item.children.clone() {
            self.stack.push(MenuLevel {
                menu: child,
                selected: 0,
                scroll: 0,
                prompt: None,
            });
            return MenuOutcome::Handled;
        }
        if item.prompt.is_some() {
            level.prompt = Some(PromptState {
                item: idx,
                buffer: String::new(),
            });
            return MenuOutcome::Handled;
        }
        let Some(handler) = item.handler.clone() else {
            return MenuOutcome::Handled;
        };
        self.closed = true;
        MenuOutcome::Invoke {
            handler,
            input: String::new(),
        }
    }

    /// Escape: cancel a prompt back to the list, pop one level, or close the
    /// overlay when already at the root.
    pub fn escape(&mut self) {
        let level = self.top_mut();
        if level.prompt.take().is_some() {
            return;
        }
        if self.stack.len() > 1 {
            self.stack.pop();
        } else {
            self.closed = true;
        }
    }

    fn top(&self) -> &MenuLevel {
        self.stack.last().expect("menu stack is never empty")
    }

    fn top_mut(&mut self) -> &mut MenuLevel {
        self.stack.last_mut().expect("menu stack is never empty")
    }

    fn follow(level: &mut MenuLevel) {
        if level.selected < level.scroll {
            level.scroll = level.selected;
        } else if level.selected >= level.scroll + MENU_VISIBLE_ROWS {
            level.scroll = level.selected + 1 - MENU_VISIBLE_ROWS;
        }
    }
}
