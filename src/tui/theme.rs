//! Colors for the player and for plain CLI output.
//!
//! Everything is addressed by [`Role`]: the renderer asks for a ratatui
//! [`Style`], `check` and `simulate` ask for an SGR-wrapped string.

use ratatui::style::{Color, Modifier, Style};

use crate::surface::NoticeLevel;

/// What a piece of text is, as far as coloring goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Scene ids, choice labels, positions
    Text,
    /// Headings, borders, hints
    Muted,
    /// Key hints, the progress bar, step names
    Key,
    /// Temporary choices and the skip control
    SidePath,
    Warning,
    Error,
    Ok,
}

impl From<NoticeLevel> for Role {
    fn from(level: NoticeLevel) -> Self {
        match level {
            NoticeLevel::Info => Role::Text,
            NoticeLevel::Warning => Role::Warning,
            NoticeLevel::Error => Role::Error,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub key: Color,
    pub side_path: Color,
    pub warning: Color,
    pub error: Color,
    pub ok: Color,
    /// Emit SGR sequences from [`Theme::paint`]
    pub ansi: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            text: Color::Gray,
            muted: Color::DarkGray,
            key: Color::Green,
            side_path: Color::Yellow,
            warning: Color::Yellow,
            error: Color::Red,
            ok: Color::Green,
            ansi: true,
        }
    }
}

impl Theme {
    /// Same colors, no escape codes in CLI output.
    pub fn without_ansi(mut self) -> Self {
        self.ansi = false;
        self
    }

    pub fn color(&self, role: Role) -> Color {
        match role {
            Role::Text => self.text,
            Role::Muted => self.muted,
            Role::Key => self.key,
            Role::SidePath => self.side_path,
            Role::Warning => self.warning,
            Role::Error => self.error,
            Role::Ok => self.ok,
        }
    }

    pub fn style(&self, role: Role) -> Style {
        Style::default().fg(self.color(role))
    }

    pub fn bold(&self, role: Role) -> Style {
        self.style(role).add_modifier(Modifier::BOLD)
    }

    /// `text` in the role's color, for printing to a terminal.
    pub fn paint(&self, role: Role, text: &str) -> String {
        match sgr_code(self.color(role)) {
            Some(code) if self.ansi => format!("\x1b[{}m{}\x1b[0m", code, text),
            _ => text.to_string(),
        }
    }
}

/// SGR foreground code of the named colors; indexed and RGB colors have none.
fn sgr_code(color: Color) -> Option<u8> {
    let code = match color {
        Color::Black => 30,
        Color::Red => 31,
        Color::Green => 32,
        Color::Yellow => 33,
        Color::Blue => 34,
        Color::Magenta => 35,
        Color::Cyan => 36,
        Color::Gray => 37,
        Color::DarkGray => 90,
        Color::LightRed => 91,
        Color::LightGreen => 92,
        Color::LightYellow => 93,
        Color::LightBlue => 94,
        Color::LightMagenta => 95,
        Color::LightCyan => 96,
        Color::White => 97,
        _ => return None,
    };
    Some(code)
}

pub fn current_theme() -> Theme {
    Theme::default()
}

/// Theme for printing to stdout: plain text when stdout is not a terminal.
pub fn stdout_theme() -> Theme {
    if atty::is(atty::Stream::Stdout) {
        current_theme()
    } else {
        current_theme().without_ansi()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_map_to_theme_colors() {
        let theme = Theme::default();
        assert_eq!(theme.style(Role::Text).fg, Some(Color::Gray));
        assert_eq!(theme.style(Role::Muted).fg, Some(Color::DarkGray));
        assert_eq!(theme.style(Role::SidePath).fg, Some(Color::Yellow));
        assert!(theme.bold(Role::Key).add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn notice_levels_pick_roles() {
        assert_eq!(Role::from(NoticeLevel::Info), Role::Text);
        assert_eq!(Role::from(NoticeLevel::Warning), Role::Warning);
        assert_eq!(Role::from(NoticeLevel::Error), Role::Error);
    }

    #[test]
    fn paint_wraps_text_in_sgr_codes() {
        let theme = Theme::default();
        assert_eq!(theme.paint(Role::Key, "go"), "\x1b[32mgo\x1b[0m");
        assert_eq!(theme.paint(Role::Muted, "x"), "\x1b[90mx\x1b[0m");
    }

    #[test]
    fn plain_theme_emits_no_escapes() {
        let theme = Theme::default().without_ansi();
        assert_eq!(theme.paint(Role::Error, "boom"), "boom");
    }

    #[test]
    fn rgb_colors_are_not_painted() {
        let theme = Theme {
            key: Color::Rgb(1, 2, 3),
            ..Theme::default()
        };
        assert_eq!(theme.paint(Role::Key, "go"), "go");
    }
}
