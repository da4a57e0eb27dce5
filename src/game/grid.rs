use rand::Rng;
use std::ops::Range;

use super::action::Velocity;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position by one tick of `velocity`
    pub fn offset(&self, velocity: Velocity) -> Self {
        self.moved_by(velocity.dx, velocity.dy)
    }
}

/// What a marked cell holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CellKind {
    Body,
    Food,
}

/// Fixed-size coordinate space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    width: i32,
    height: i32,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(30, 15)
    }
}

impl Grid {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Check if a position is within the grid bounds
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    pub fn cell_count(&self) -> usize {
        (self.width.max(0) as usize) * (self.height.max(0) as usize)
    }

    /// Every cell, row by row
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Position::new(x, y)))
    }

    /// Interior rectangle that keeps `margin_x` columns and `margin_y` rows
    /// clear on each side. An axis whose margins leave no room spans the
    /// whole grid instead.
    pub fn spawn_band(&self, margin_x: i32, margin_y: i32) -> SpawnBand {
        let axis = |len: i32, margin: i32| {
            let margin = margin.max(0);
            if margin < len - margin {
                margin..len - margin
            } else {
                0..len
            }
        };

        SpawnBand {
            xs: axis(self.width, margin_x),
            ys: axis(self.height, margin_y),
        }
    }
}

/// Rectangle of cells used for the start cell and for food
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnBand {
    xs: Range<i32>,
    ys: Range<i32>,
}

impl SpawnBand {
    pub fn contains(&self, pos: Position) -> bool {
        self.xs.contains(&pos.x) && self.ys.contains(&pos.y)
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty() || self.ys.is_empty()
    }

    /// Uniformly random cell of the band
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Position {
        let x = rng.gen_range(self.xs.clone());
        let y = rng.gen_range(self.ys.clone());
        Position::new(x, y)
    }

    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        self.ys
            .clone()
            .flat_map(move |y| self.xs.clone().map(move |x| Position::new(x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_position_movement() {
        let pos = Position::new(5, 5);
        assert_eq!(pos.moved_by(1, 0), Position::new(6, 5));
        assert_eq!(pos.moved_by(-1, 0), Position::new(4, 5));
        assert_eq!(pos.moved_by(0, 1), Position::new(5, 6));
        assert_eq!(pos.moved_by(0, -1), Position::new(5, 4));
    }

    #[test]
    fn test_bounds_checking() {
        let grid = Grid::default();

        assert!(grid.contains(Position::new(0, 0)));
        assert!(grid.contains(Position::new(29, 14)));
        assert!(!grid.contains(Position::new(-1, 0)));
        assert!(!grid.contains(Position::new(30, 0)));
        assert!(!grid.contains(Position::new(0, 15)));
        assert!(!grid.contains(Position::new(0, -1)));
    }

    #[test]
    fn test_cells_cover_grid() {
        let grid = Grid::default();
        assert_eq!(grid.cell_count(), 450);
        assert_eq!(grid.cells().count(), 450);
        assert!(grid.cells().all(|p| grid.contains(p)));
    }

    #[test]
    fn test_default_spawn_band() {
        let band = Grid::default().spawn_band(10, 5);

        assert!(band.contains(Position::new(10, 5)));
        assert!(band.contains(Position::new(19, 9)));
        assert!(!band.contains(Position::new(9, 5)));
        assert!(!band.contains(Position::new(20, 9)));
        assert!(!band.contains(Position::new(10, 10)));
        assert_eq!(band.cells().count(), 50);
    }

    #[test]
    fn test_oversized_margin_spans_axis() {
        let band = Grid::new(4, 4).spawn_band(2, 1);
        // x margin leaves nothing, so the whole row range is used
        assert!(band.contains(Position::new(0, 1)));
        assert!(band.contains(Position::new(3, 2)));
        assert!(!band.contains(Position::new(0, 0)));
        assert!(!band.is_empty());
    }

    #[test]
    fn test_sample_stays_in_band() {
        let band = Grid::default().spawn_band(10, 5);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..500 {
            assert!(band.contains(band.sample(&mut rng)));
        }
    }
}
