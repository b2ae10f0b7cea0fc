//! Crossterm key events to key tokens.
//!
//! Responsibilities:
//! - Translate a `crossterm::event::KeyEvent` into the `KeyToken` the
//!   resolver consumes, normalised the same way parsed key specs are.
//!
//! Does NOT handle:
//! - Reading events or owning the terminal (the host does that).
//!
//! Invariants:
//! - Release and repeat events yield `None`; only presses are keys.
//! - Function keys outside F1-F20 yield `None`, since key specs cannot name them.
//! - Shift is folded into printable characters, since the terminal already
//!   reports the shifted character (`?`, not `S-/`).

use crossterm::event::{KeyCode as TermKeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::key::{KeyCode, KeyToken, Modifiers};

/// Convert a crossterm key event, or `None` for keys the dispatcher ignores.
pub fn key_token_from_event(event: &KeyEvent) -> Option<KeyToken> {
    if event.kind != KeyEventKind::Press {
        return None;
    }

    let code = match event.code {
        TermKeyCode::Char(c) => KeyCode::Char(c),
        TermKeyCode::F(n) if (1..=20).contains(&n) => KeyCode::F(n),
        TermKeyCode::Esc => KeyCode::Esc,
        TermKeyCode::Enter => KeyCode::Enter,
        TermKeyCode::Tab => KeyCode::Tab,
        TermKeyCode::BackTab => KeyCode::BackTab,
        TermKeyCode::Backspace => KeyCode::Backspace,
        TermKeyCode::Delete => KeyCode::Delete,
        TermKeyCode::Insert => KeyCode::Insert,
        TermKeyCode::Home => KeyCode::Home,
        TermKeyCode::End => KeyCode::End,
        TermKeyCode::PageUp => KeyCode::PageUp,
        TermKeyCode::PageDown => KeyCode::PageDown,
        TermKeyCode::Up => KeyCode::Up,
        TermKeyCode::Down => KeyCode::Down,
        TermKeyCode::Left => KeyCode::Left,
        TermKeyCode::Right => KeyCode::Right,
        _ => return None,
    };

    let mut modifiers = Modifiers::empty();
    if event.modifiers.contains(KeyModifiers::CONTROL) {
        modifiers |= Modifiers::CTRL;
    }
    if event.modifiers.contains(KeyModifiers::ALT) {
        modifiers |= Modifiers::ALT;
    }
    if event.modifiers.contains(KeyModifiers::SHIFT) {
        match code {
            KeyCode::Char(c) if !c.is_ascii_alphabetic() => {}
            // Crossterm reports an upper-case letter and SHIFT together.
            _ => modifiers |= Modifiers::SHIFT,
        }
    }

    Some(KeyToken::new(code).with_modifiers(modifiers))
}
