use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use super::grid::{Grid, SpawnBand};

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,
    /// Target length of a freshly spawned snake
    pub initial_snake_length: usize,
    /// Tick period at length 1, in milliseconds. The actual period is
    /// divided by the current target length.
    pub base_speed_ms: u64,
    /// Columns kept clear on the left and right when spawning
    pub spawn_margin_x: usize,
    /// Rows kept clear on the top and bottom when spawning
    pub spawn_margin_y: usize,
    /// Points awarded per food eaten
    pub score_per_food: u32,
    /// Random draws the food placer makes before enumerating free cells
    pub max_placement_attempts: usize,
    /// Rows shown in the results table
    pub top_scores: usize,
    /// Fixed RNG seed for reproducible games
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 30,
            grid_height: 15,
            initial_snake_length: 3,
            base_speed_ms: 800,
            spawn_margin_x: 10,
            spawn_margin_y: 5,
            score_per_food: 1,
            max_placement_attempts: 1000,
            top_scores: 5,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size.
    ///
    /// Spawn margins follow the grid at one third of each dimension.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            spawn_margin_x: width / 3,
            spawn_margin_y: height / 3,
            ..Default::default()
        }
    }

    /// Load a configuration from a TOML file. Missing keys keep their defaults.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: GameConfig = toml::from_str(&text)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.grid_width > 0 && self.grid_height > 0,
            "grid must be at least 1x1, got {}x{}",
            self.grid_width,
            self.grid_height
        );
        ensure!(
            i32::try_from(self.grid_width).is_ok() && i32::try_from(self.grid_height).is_ok(),
            "grid dimensions are too large"
        );
        ensure!(
            self.initial_snake_length > 0,
            "initial snake length must be positive"
        );
        ensure!(self.base_speed_ms > 0, "base speed must be positive");
        Ok(())
    }

    pub fn grid(&self) -> Grid {
        Grid::new(self.grid_width as i32, self.grid_height as i32)
    }

    pub fn spawn_band(&self) -> SpawnBand {
        self.grid()
            .spawn_band(self.spawn_margin_x as i32, self.spawn_margin_y as i32)
    }

    pub fn base_speed(&self) -> Duration {
        Duration::from_millis(self.base_speed_ms)
    }
}
