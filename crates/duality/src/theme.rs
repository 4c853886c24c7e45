//! The two site moods: 天使 (angel, light) and 恶魔 (demon, dark).
//!
//! A theme is a flat palette struct; components keep their own style
//! configs and are re-skinned through `set_theme` when the mode flips.
//! The chosen mode persists across runs via [`crate::config`].

use ratatui::style::{Color, Modifier, Style};

/// The persisted light/dark flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeMode {
    #[default]
    Angel,
    Demon,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Angel => ThemeMode::Demon,
            ThemeMode::Demon => ThemeMode::Angel,
        }
    }

    /// Config-file representation.
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Angel => "angel",
            ThemeMode::Demon => "demon",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "angel" => Some(ThemeMode::Angel),
            "demon" => Some(ThemeMode::Demon),
            _ => None,
        }
    }

    /// Label shown in the status bar.
    pub fn label(self) -> &'static str {
        match self {
            ThemeMode::Angel => "天使",
            ThemeMode::Demon => "恶魔",
        }
    }
}

/// Resolved palette for the current mode.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub mode: ThemeMode,
    pub text: Color,
    pub text_dim: Color,
    /// Pink in angel mode, blue in demon mode — the site's signature pair.
    pub accent: Color,
    pub accent_alt: Color,
    pub border: Color,
    pub success: Color,
    pub error: Color,
}

impl Theme {
    pub fn of(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Angel => Self::angel(),
            ThemeMode::Demon => Self::demon(),
        }
    }

    fn angel() -> Self {
        Self {
            mode: ThemeMode::Angel,
            text: Color::Black,
            text_dim: Color::DarkGray,
            accent: Color::Rgb(236, 72, 153),
            accent_alt: Color::Rgb(59, 130, 246),
            border: Color::Rgb(244, 164, 196),
            success: Color::Green,
            error: Color::Red,
        }
    }

    fn demon() -> Self {
        Self {
            mode: ThemeMode::Demon,
            text: Color::White,
            text_dim: Color::Gray,
            accent: Color::Rgb(96, 165, 250),
            accent_alt: Color::Rgb(244, 114, 182),
            border: Color::Rgb(71, 85, 160),
            success: Color::LightGreen,
            error: Color::LightRed,
        }
    }

    pub fn toggled(&self) -> Self {
        Self::of(self.mode.toggled())
    }

    // Derived styles used all over the UI.

    pub fn text_style(&self) -> Style {
        Style::default().fg(self.text)
    }

    pub fn dim_style(&self) -> Style {
        Style::default().fg(self.text_dim)
    }

    pub fn accent_style(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }
}
