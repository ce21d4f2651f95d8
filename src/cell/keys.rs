use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::navigation::MoveDirection;

/// Keystroke classes the interaction state machine distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKey {
    Arrow(MoveDirection),
    Enter { shift: bool },
    Tab { shift: bool },
    Escape,
    F2,
    Delete,
    Backspace,
    /// Ctrl+Z or Cmd+Z.
    Undo,
    /// Printable character without Ctrl/Alt.
    Char(char),
    Other,
}

impl CellKey {
    /// Direction a Selected-mode navigation key requests, if any.
    pub fn move_direction(&self) -> Option<MoveDirection> {
        match *self {
            CellKey::Arrow(direction) => Some(direction),
            CellKey::Enter { shift } => Some(if shift {
                MoveDirection::Up
            } else {
                MoveDirection::Down
            }),
            CellKey::Tab { shift } => Some(if shift {
                MoveDirection::Left
            } else {
                MoveDirection::Right
            }),
            _ => None,
        }
    }
}

pub fn classify_key(key: &KeyEvent) -> CellKey {
    if key.kind != KeyEventKind::Press {
        return CellKey::Other;
    }

    let shift = key.modifiers.contains(KeyModifiers::SHIFT);
    let command = key.modifiers.contains(KeyModifiers::CONTROL)
        || key.modifiers.contains(KeyModifiers::SUPER);

    match key.code {
        KeyCode::Up => CellKey::Arrow(MoveDirection::Up),
        KeyCode::Down => CellKey::Arrow(MoveDirection::Down),
        KeyCode::Left => CellKey::Arrow(MoveDirection::Left),
        KeyCode::Right => CellKey::Arrow(MoveDirection::Right),
        KeyCode::Enter => CellKey::Enter { shift },
        KeyCode::Tab => CellKey::Tab { shift },
        KeyCode::BackTab => CellKey::Tab { shift: true },
        KeyCode::Esc => CellKey::Escape,
        KeyCode::F(2) => CellKey::F2,
        KeyCode::Delete => CellKey::Delete,
        KeyCode::Backspace => CellKey::Backspace,
        KeyCode::Char(ch) if command && ch.eq_ignore_ascii_case(&'z') => CellKey::Undo,
        KeyCode::Char(ch) => {
            if command || key.modifiers.contains(KeyModifiers::ALT) || ch.is_control() {
                CellKey::Other
            } else {
                CellKey::Char(ch)
            }
        }
        _ => CellKey::Other,
    }
}
