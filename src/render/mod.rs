//! Rendering capability and the terminal front end.
//!
//! The game core only knows [`Renderer`]. [`BoardView`] implements it by
//! remembering every marked cell, and [`FramePainter`] draws a `BoardView`
//! with ratatui.

pub mod board;
pub mod renderer;

pub use board::BoardView;
pub use renderer::{FramePainter, Overlay};

use crate::game::{CellKind, GameEvent, GameSummary, Position, Status};

/// Receiver of the game's visual changes.
///
/// Every method must be idempotent: marking a marked cell or clearing a
/// clear one changes nothing.
pub trait Renderer {
    fn mark_occupied(&mut self, position: Position, kind: CellKind);

    fn clear_occupied(&mut self, position: Position, kind: CellKind);

    fn show_terminal_state(&mut self, summary: &GameSummary);

    fn clear_terminal_state(&mut self);

    fn update_score(&mut self, _score: u32) {}

    fn update_status(&mut self, _status: Status) {}

    /// Route one game event to the methods above
    fn handle(&mut self, event: &GameEvent) {
        match event {
            GameEvent::Occupied { position, kind } => self.mark_occupied(*position, *kind),
            GameEvent::Cleared { position, kind } => self.clear_occupied(*position, *kind),
            GameEvent::ScoreChanged(score) => self.update_score(*score),
            GameEvent::StatusChanged(status) => self.update_status(*status),
            GameEvent::GameOver(summary) => self.show_terminal_state(summary),
            GameEvent::TerminalCleared => self.clear_terminal_state(),
        }
    }
}
