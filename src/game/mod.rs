//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! Rendering goes through the [`Renderer`](crate::render::Renderer) capability and
//! input arrives as [`Intent`]s.

pub mod action;
pub mod body;
pub mod config;
pub mod error;
pub mod food;
pub mod game_loop;
pub mod grid;
pub mod scheduler;
pub mod state;

// Re-export commonly used types
pub use action::{Direction, Intent, Velocity};
pub use body::{AdvanceOutcome, AdvanceResult, BodyEngine};
pub use config::GameConfig;
pub use error::GameError;
pub use food::FoodPlacer;
pub use game_loop::GameLoop;
pub use grid::{CellKind, Grid, Position, SpawnBand};
pub use scheduler::{TickScheduler, TickTicket};
pub use state::{
    CollisionType, GameEvent, GameOverCause, GameState, GameSummary, Status, TickReport,
};
