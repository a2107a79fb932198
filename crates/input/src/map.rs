//! Key mapping from terminal events to game commands.

use crate::types::Command;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Map a key press to a command. Unbound keys map to `None`.
pub fn map_key(key: KeyEvent) -> Option<Command> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(Command::Quit);
    }

    match key.code {
        KeyCode::Left | KeyCode::Char('h') => Some(Command::MoveLeft),
        KeyCode::Right | KeyCode::Char('l') => Some(Command::MoveRight),
        KeyCode::Down | KeyCode::Char('j') => Some(Command::SoftDrop),
        KeyCode::Up | KeyCode::Char('k') => Some(Command::Rotate),
        KeyCode::Char(' ') => Some(Command::HardDrop),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Command::Restart),
        KeyCode::Esc | KeyCode::Char('q') => Some(Command::Quit),
        _ => None,
    }
}
