//! Color themes and the session-owned theme registry.
//!
//! A [`Theme`] is an immutable set of eight semantic colors. Themes are
//! registered by name in a [`ThemeRegistry`] owned by the session — there is
//! no process-global table, so sessions (and tests) get independent
//! lifecycles. Themes are never mutated or removed once registered.

use std::collections::HashMap;

/// A single terminal color.
///
/// `Default` means "use the terminal's configured default" rather than
/// forcing a specific RGB value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    /// Terminal default foreground/background.
    Default,
    /// 24-bit RGB color.
    Rgb(u8, u8, u8),
}

/// An immutable palette of the eight semantic colors the renderer uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    /// Borders, separators, and horizontal rules.
    pub primary: Color,
    /// Hints, dimmed chrome, secondary text.
    pub secondary: Color,
    /// Selection highlights and active elements.
    pub accent: Color,
    /// Error and warning text.
    pub error: Color,
    /// User message headers.
    pub user: Color,
    /// Assistant message headers.
    pub assistant: Color,
    /// System message headers.
    pub system: Color,
    /// Background for fenced code blocks.
    pub code_bg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        DEFAULT_THEME
    }
}

/// The stock theme: cool blues and greens on the terminal default background.
pub const DEFAULT_THEME: Theme = Theme {
    primary: Color::Rgb(110, 120, 140),
    secondary: Color::Rgb(130, 130, 130),
    accent: Color::Rgb(97, 175, 239),
    error: Color::Rgb(224, 108, 117),
    user: Color::Rgb(152, 195, 121),
    assistant: Color::Rgb(97, 175, 239),
    system: Color::Rgb(229, 192, 123),
    code_bg: Color::Rgb(40, 44, 52),
};

/// Warm phosphor-amber theme.
pub const AMBER_THEME: Theme = Theme {
    primary: Color::Rgb(160, 110, 60),
    secondary: Color::Rgb(140, 110, 80),
    accent: Color::Rgb(255, 176, 0),
    error: Color::Rgb(255, 85, 85),
    user: Color::Rgb(255, 204, 102),
    assistant: Color::Rgb(255, 176, 0),
    system: Color::Rgb(200, 150, 80),
    code_bg: Color::Rgb(45, 35, 20),
};

/// Cool blue theme.
pub const BLUE_THEME: Theme = Theme {
    primary: Color::Rgb(80, 100, 140),
    secondary: Color::Rgb(100, 120, 150),
    accent: Color::Rgb(120, 180, 255),
    error: Color::Rgb(240, 100, 110),
    user: Color::Rgb(140, 200, 255),
    assistant: Color::Rgb(100, 160, 240),
    system: Color::Rgb(150, 160, 200),
    code_bg: Color::Rgb(25, 35, 55),
};

/// Monochrome theme: terminal defaults everywhere, structure from attributes
/// only. Useful on terminals without truecolor support.
pub const MONO_THEME: Theme = Theme {
    primary: Color::Default,
    secondary: Color::Default,
    accent: Color::Default,
    error: Color::Default,
    user: Color::Default,
    assistant: Color::Default,
    system: Color::Default,
    code_bg: Color::Default,
};

/// Name-keyed table of registered themes.
///
/// Lookup is by exact name; registration order is irrelevant. Registering an
/// existing name replaces the old theme (the replaced value itself is never
/// mutated — callers holding a copy keep what they had).
#[derive(Debug, Clone, Default)]
pub struct ThemeRegistry {
    themes: HashMap<String, Theme>,
}

impl ThemeRegistry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the builtin themes
    /// (`default`, `amber`, `blue`, `mono`).
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut reg = Self::new();
        reg.register("default", DEFAULT_THEME);
        reg.register("amber", AMBER_THEME);
        reg.register("blue", BLUE_THEME);
        reg.register("mono", MONO_THEME);
        reg
    }

    /// Register `theme` under `name`, replacing any previous entry.
    pub fn register(&mut self, name: &str, theme: Theme) {
        self.themes.insert(name.to_string(), theme);
    }

    /// Look up a theme by name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<Theme> {
        self.themes.get(name).copied()
    }

    /// Sorted list of registered theme names.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.themes.keys().cloned().collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_present() {
        let reg = ThemeRegistry::with_builtins();
        for name in ["default", "amber", "blue", "mono"] {
            assert!(reg.lookup(name).is_some(), "missing builtin {name}");
        }
        assert_eq!(reg.names(), vec!["amber", "blue", "default", "mono"]);
    }

    #[test]
    fn test_lookup_unknown() {
        let reg = ThemeRegistry::with_builtins();
        assert!(reg.lookup("nonexistent").is_none());
    }

    #[test]
    fn test_register_replaces() {
        let mut reg = ThemeRegistry::new();
        reg.register("custom", DEFAULT_THEME);
        reg.register("custom", AMBER_THEME);
        assert_eq!(reg.lookup("custom"), Some(AMBER_THEME));
        assert_eq!(reg.names().len(), 1);
    }
}
