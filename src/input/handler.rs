use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::{Direction, Intent};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Intent(Intent),
    ShowScores,
    Quit,
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        if is_interrupt(&key) {
            return KeyAction::Quit;
        }

        match key.code {
            // Movement - Arrow keys
            KeyCode::Up => turn(Direction::Up),
            KeyCode::Down => turn(Direction::Down),
            KeyCode::Left => turn(Direction::Left),
            KeyCode::Right => turn(Direction::Right),

            // Movement - WASD
            KeyCode::Char('w') | KeyCode::Char('W') => turn(Direction::Up),
            KeyCode::Char('s') | KeyCode::Char('S') => turn(Direction::Down),
            KeyCode::Char('a') | KeyCode::Char('A') => turn(Direction::Left),
            KeyCode::Char('d') | KeyCode::Char('D') => turn(Direction::Right),

            // Controls
            KeyCode::Enter => KeyAction::Intent(Intent::Start),
            KeyCode::Esc | KeyCode::Char(' ') | KeyCode::Char('p') | KeyCode::Char('P') => {
                KeyAction::Intent(Intent::TogglePause)
            }
            KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Intent(Intent::Restart),
            KeyCode::Char('t') | KeyCode::Char('T') => KeyAction::ShowScores,
            KeyCode::Char('q') | KeyCode::Char('Q') => KeyAction::Quit,

            _ => KeyAction::None,
        }
    }
}

/// Ctrl+C, which raw mode delivers as a key press instead of SIGINT
pub fn is_interrupt(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}

fn turn(direction: Direction) -> KeyAction {
    KeyAction::Intent(Intent::Turn(direction))
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
