//! Snake Arcade - a grid snake game for the terminal
//!
//! This library provides:
//! - The timer-driven game core (game module)
//! - Keyboard wiring (input module)
//! - The renderer capability and the TUI front end (render module)
//! - Scoreboard clients (scores module)
//! - Execution modes (interactive play, score listing)

pub mod game;
pub mod input;
pub mod modes;
pub mod render;
pub mod scores;
