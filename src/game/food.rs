use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::collections::HashSet;

use super::{
    error::GameError,
    grid::{Grid, Position, SpawnBand},
};

/// Picks free cells for food.
///
/// Draws random cells of the spawn band first. After `max_attempts` misses
/// it enumerates the free cells of the band, then of the whole grid, so a
/// crowded board still gets an answer and a full one gets an error.
#[derive(Debug, Clone)]
pub struct FoodPlacer {
    grid: Grid,
    band: SpawnBand,
    rng: StdRng,
    max_attempts: usize,
}

impl FoodPlacer {
    pub fn new(grid: Grid, band: SpawnBand, rng: StdRng, max_attempts: usize) -> Self {
        Self {
            grid,
            band,
            rng,
            max_attempts,
        }
    }

    pub fn place(&mut self, occupied: &HashSet<Position>) -> Result<Position, GameError> {
        for _ in 0..self.max_attempts {
            let candidate = self.band.sample(&mut self.rng);
            if !occupied.contains(&candidate) {
                return Ok(candidate);
            }
        }

        let free_in_band: Vec<Position> = self
            .band
            .cells()
            .filter(|pos| !occupied.contains(pos))
            .collect();
        if let Some(&pos) = free_in_band.choose(&mut self.rng) {
            return Ok(pos);
        }

        let free_anywhere: Vec<Position> = self
            .grid
            .cells()
            .filter(|pos| !occupied.contains(pos))
            .collect();
        free_anywhere
            .choose(&mut self.rng)
            .copied()
            .ok_or(GameError::NoSpaceAvailable {
                width: self.grid.width(),
                height: self.grid.height(),
            })
    }
}
