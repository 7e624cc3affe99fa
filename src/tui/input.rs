//! Keyboard input for the terminal player.
//!
//! Maps key events to player commands. Choice keys are positional: `1`-`9`
//! pick from the end-of-clip overlay or main panel, `a`-`h` from the
//! interrupt panel.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What a key press asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Nth (0-based) entry of the choice overlay or main panel
    Choose(usize),
    /// Nth (0-based) entry of the interrupt panel
    ChooseTemporary(usize),
    Skip,
    TogglePause,
    /// Seek by a signed number of milliseconds
    Seek(i64),
    VolumeUp,
    VolumeDown,
    ToggleMute,
    DismissNotices,
    Quit,
}

/// Seek step for the arrow keys.
pub const SEEK_STEP_MS: i64 = 5_000;

/// Volume change per `+`/`-` press.
pub const VOLUME_STEP: u8 = 10;

/// Map a key event to an action; `None` for keys without a binding.
pub fn map_key(key: KeyEvent) -> Option<KeyAction> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    match key.code {
        // === Quit ===
        KeyCode::Char('q') | KeyCode::Esc => Some(KeyAction::Quit),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(KeyAction::Quit)
        }

        // === Choices ===
        KeyCode::Char(c @ '1'..='9') => Some(KeyAction::Choose(c as usize - '1' as usize)),
        KeyCode::Char(c @ 'a'..='h') => {
            Some(KeyAction::ChooseTemporary(c as usize - 'a' as usize))
        }

        // === Playback controls ===
        KeyCode::Char('s') => Some(KeyAction::Skip),
        KeyCode::Char(' ') => Some(KeyAction::TogglePause),
        KeyCode::Left => Some(KeyAction::Seek(-SEEK_STEP_MS)),
        KeyCode::Right => Some(KeyAction::Seek(SEEK_STEP_MS)),
        KeyCode::Char('+') | KeyCode::Char('=') => Some(KeyAction::VolumeUp),
        KeyCode::Char('-') => Some(KeyAction::VolumeDown),
        KeyCode::Char('m') => Some(KeyAction::ToggleMute),
        KeyCode::Char('x') => Some(KeyAction::DismissNotices),

        _ => None,
    }
}
