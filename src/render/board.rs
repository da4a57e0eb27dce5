use std::collections::HashSet;

use super::Renderer;
use crate::game::{CellKind, GameSummary, Grid, Position, Status};

/// In-memory mirror of what the player should see
#[derive(Debug, Clone)]
pub struct BoardView {
    grid: Grid,
    cells: HashSet<(Position, CellKind)>,
    score: u32,
    status: Status,
    terminal: Option<GameSummary>,
}

impl BoardView {
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            cells: HashSet::new(),
            score: 0,
            status: Status::Idle,
            terminal: None,
        }
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn is_marked(&self, position: Position, kind: CellKind) -> bool {
        self.cells.contains(&(position, kind))
    }

    /// What to draw at `position`; body wins over food
    pub fn cell(&self, position: Position) -> Option<CellKind> {
        if self.is_marked(position, CellKind::Body) {
            Some(CellKind::Body)
        } else if self.is_marked(position, CellKind::Food) {
            Some(CellKind::Food)
        } else {
            None
        }
    }

    pub fn body_cells(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells
            .iter()
            .filter(|(_, kind)| *kind == CellKind::Body)
            .map(|(position, _)| *position)
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn terminal(&self) -> Option<&GameSummary> {
        self.terminal.as_ref()
    }
}

impl Renderer for BoardView {
    fn mark_occupied(&mut self, position: Position, kind: CellKind) {
        if self.grid.contains(position) {
            self.cells.insert((position, kind));
        }
    }

    fn clear_occupied(&mut self, position: Position, kind: CellKind) {
        self.cells.remove(&(position, kind));
    }

    fn show_terminal_state(&mut self, summary: &GameSummary) {
        self.terminal = Some(*summary);
    }

    fn clear_terminal_state(&mut self) {
        self.terminal = None;
    }

    fn update_score(&mut self, score: u32) {
        self.score = score;
    }

    fn update_status(&mut self, status: Status) {
        self.status = status;
    }
}
