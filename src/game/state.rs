use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::HashSet;
use tracing::{debug, info, warn};

use super::{
    action::Direction,
    body::{AdvanceOutcome, AdvanceResult, BodyEngine},
    config::GameConfig,
    error::GameError,
    food::FoodPlacer,
    grid::{CellKind, Grid, Position},
};

/// Lifecycle of a single game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Idle,
    Playing,
    Paused,
    GameOver,
}

/// Type of collision that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollisionType {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
}

/// Why a game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverCause {
    Collision(CollisionType),
    /// The board filled up and no food could be placed
    NoSpaceAvailable,
}

/// Final numbers of a finished game, handed to score submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSummary {
    pub score: u32,
    pub cause: GameOverCause,
    pub length: usize,
}

/// Everything an outside observer needs to mirror the game
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    Occupied { position: Position, kind: CellKind },
    Cleared { position: Position, kind: CellKind },
    ScoreChanged(u32),
    StatusChanged(Status),
    GameOver(GameSummary),
    TerminalCleared,
}

/// What one tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub advance: AdvanceResult,
    pub score: u32,
    /// Set when this tick ended the game
    pub game_over: Option<GameSummary>,
}

/// Score, status, food and the body, plus the queue of events produced
/// while mutating them.
#[derive(Debug)]
pub struct GameState {
    body: BodyEngine,
    placer: FoodPlacer,
    food: Option<Position>,
    score: u32,
    score_per_food: u32,
    status: Status,
    events: Vec<GameEvent>,
}

impl GameState {
    pub fn new(config: &GameConfig) -> Self {
        let (body_rng, food_rng) = match config.seed {
            Some(seed) => (
                StdRng::seed_from_u64(seed),
                StdRng::seed_from_u64(seed.wrapping_add(1)),
            ),
            None => (StdRng::from_entropy(), StdRng::from_entropy()),
        };

        let grid = config.grid();
        let band = config.spawn_band();
        let body = BodyEngine::new(grid, band.clone(), config.initial_snake_length, body_rng);
        let placer = FoodPlacer::new(grid, band, food_rng, config.max_placement_attempts);

        Self::from_parts(body, placer, config.score_per_food)
    }

    pub fn from_parts(body: BodyEngine, placer: FoodPlacer, score_per_food: u32) -> Self {
        let mut state = Self {
            body,
            placer,
            food: None,
            score: 0,
            score_per_food,
            status: Status::Idle,
            events: Vec::new(),
        };
        state.announce_body();
        state
    }

    pub fn body(&self) -> &BodyEngine {
        &self.body
    }

    pub fn grid(&self) -> Grid {
        self.body.grid()
    }

    pub fn food(&self) -> Option<Position> {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn set_status(&mut self, status: Status) {
        if self.status != status {
            self.status = status;
            self.events.push(GameEvent::StatusChanged(status));
        }
    }

    pub fn set_direction(&mut self, direction: Direction) -> bool {
        let accepted = self.body.set_direction(direction);
        if !accepted {
            debug!(?direction, "ignoring reversal");
        }
        accepted
    }

    /// Take every event queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Put food on a free cell, replacing any existing food
    pub fn place_food(&mut self) -> Result<Position, GameError> {
        self.clear_food();
        let pos = self.placer.place(&self.body.occupied())?;
        self.food = Some(pos);
        self.events.push(GameEvent::Occupied {
            position: pos,
            kind: CellKind::Food,
        });
        Ok(pos)
    }

    /// Advance the body once and fold the result into score and status
    pub fn step(&mut self) -> TickReport {
        let food = match self.food {
            Some(food) => food,
            None => match self.place_food() {
                Ok(food) => food,
                Err(err) => return self.no_space(err, None),
            },
        };

        let advance = self.body.advance(food);
        let mut report = TickReport {
            advance,
            score: self.score,
            game_over: None,
        };

        match advance.outcome {
            AdvanceOutcome::Collision(CollisionType::Wall) => {
                report.game_over = Some(self.finish(GameOverCause::Collision(CollisionType::Wall)));
            }
            AdvanceOutcome::Collision(CollisionType::SelfCollision) => {
                self.announce_move(&advance);
                report.game_over = Some(
                    self.finish(GameOverCause::Collision(CollisionType::SelfCollision)),
                );
            }
            AdvanceOutcome::Moved => {
                self.announce_move(&advance);
            }
            AdvanceOutcome::FoodEaten => {
                self.clear_food();
                self.announce_move(&advance);
                self.score += self.score_per_food;
                self.events.push(GameEvent::ScoreChanged(self.score));
                report.score = self.score;
                debug!(score = self.score, length = self.body.target_length(), "food eaten");

                if let Err(err) = self.place_food() {
                    return self.no_space(err, Some(advance));
                }
            }
        }

        report
    }

    /// Return to a fresh Idle game with an empty score
    pub fn reset(&mut self) {
        self.clear_food();
        let cells: Vec<Position> = self.body.segments().collect();
        for position in cells {
            self.events.push(GameEvent::Cleared {
                position,
                kind: CellKind::Body,
            });
        }
        self.events.push(GameEvent::TerminalCleared);

        self.body.reset();
        self.score = 0;
        self.events.push(GameEvent::ScoreChanged(0));
        self.set_status(Status::Idle);
        self.announce_body();
    }

    /// Body cells in bounds and distinct, food off the body
    pub fn invariants_hold(&self) -> bool {
        let grid = self.grid();
        let cells: HashSet<Position> = self.body.occupied();

        self.body.segments().all(|p| grid.contains(p))
            && cells.len() == self.body.len()
            && self.food.is_none_or(|food| !cells.contains(&food))
    }

    #[cfg(test)]
    pub(crate) fn put_food_at(&mut self, position: Position) {
        self.clear_food();
        self.food = Some(position);
        self.events.push(GameEvent::Occupied {
            position,
            kind: CellKind::Food,
        });
    }

    fn finish(&mut self, cause: GameOverCause) -> GameSummary {
        self.clear_food();
        self.set_status(Status::GameOver);

        let summary = GameSummary {
            score: self.score,
            cause,
            length: self.body.len(),
        };
        info!(score = summary.score, ?cause, "game over");
        self.events.push(GameEvent::GameOver(summary));
        summary
    }

    /// End the game because food has nowhere to go
    pub fn end_without_space(&mut self, err: &GameError) -> GameSummary {
        warn!(%err, "ending game, food cannot be placed");
        self.finish(GameOverCause::NoSpaceAvailable)
    }

    fn no_space(&mut self, err: GameError, advance: Option<AdvanceResult>) -> TickReport {
        let summary = self.end_without_space(&err);
        TickReport {
            advance: advance.unwrap_or(AdvanceResult {
                outcome: AdvanceOutcome::Moved,
                head: self.body.head(),
                trimmed: None,
            }),
            score: self.score,
            game_over: Some(summary),
        }
    }

    fn clear_food(&mut self) {
        if let Some(position) = self.food.take() {
            self.events.push(GameEvent::Cleared {
                position,
                kind: CellKind::Food,
            });
        }
    }

    fn announce_move(&mut self, advance: &AdvanceResult) {
        self.events.push(GameEvent::Occupied {
            position: advance.head,
            kind: CellKind::Body,
        });
        if let Some(position) = advance.trimmed {
            self.events.push(GameEvent::Cleared {
                position,
                kind: CellKind::Body,
            });
        }
    }

    fn announce_body(&mut self) {
        let cells: Vec<Position> = self.body.segments().collect();
        for position in cells {
            self.events.push(GameEvent::Occupied {
                position,
                kind: CellKind::Body,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_state() -> GameState {
        let grid = Grid::default();
        let body = BodyEngine::at(grid, 3, Position::new(15, 7));
        let placer = FoodPlacer::new(
            grid,
            grid.spawn_band(10, 5),
            StdRng::seed_from_u64(11),
            1000,
        );
        let mut state = GameState::from_parts(body, placer, 1);
        state.set_status(Status::Playing);
        state
    }

    #[test]
    fn test_new_state_is_idle() {
        let state = GameState::new(&GameConfig::default());
        assert_eq!(state.status(), Status::Idle);
        assert_eq!(state.score(), 0);
        assert_eq!(state.food(), None);
        assert_eq!(state.body().len(), 1);
        assert!(state.invariants_hold());
    }

    #[test]
    fn test_seeded_states_match() {
        let mut config = GameConfig::default();
        config.seed = Some(42);
        let a = GameState::new(&config);
        let b = GameState::new(&config);
        assert_eq!(a.body().head(), b.body().head());
    }

    #[test]
    fn test_moving_reports_cells() {
        let mut state = scenario_state();
        state.food = Some(Position::new(1, 1));
        state.drain_events();

        for _ in 0..3 {
            let report = state.step();
            assert!(report.game_over.is_none());
        }

        let events = state.drain_events();
        assert!(events.contains(&GameEvent::Occupied {
            position: Position::new(15, 4),
            kind: CellKind::Body
        }));
        assert!(events.contains(&GameEvent::Cleared {
            position: Position::new(15, 7),
            kind: CellKind::Body
        }));
        assert_eq!(
            state.body().segments().collect::<Vec<_>>(),
            vec![
                Position::new(15, 6),
                Position::new(15, 5),
                Position::new(15, 4)
            ]
        );
    }

    #[test]
    fn test_eating_scores_and_relocates_food() {
        let mut state = scenario_state();
        state.food = Some(Position::new(1, 1));
        for _ in 0..3 {
            state.step();
        }

        state.food = Some(Position::new(15, 3));
        let report = state.step();

        assert_eq!(report.advance.outcome, AdvanceOutcome::FoodEaten);
        assert_eq!(report.score, 1);
        assert_eq!(state.score(), 1);
        assert_eq!(state.body().target_length(), 4);
        assert_eq!(state.body().len(), 4);

        let food = state.food().unwrap();
        assert!(!state.body().contains(food));
        assert!(state.invariants_hold());

        let events = state.drain_events();
        assert!(events.contains(&GameEvent::ScoreChanged(1)));
        assert!(events.contains(&GameEvent::Occupied {
            position: food,
            kind: CellKind::Food
        }));
    }

    #[test]
    fn test_wall_hit_ends_game() {
        let mut state = scenario_state();
        state.food = Some(Position::new(1, 1));

        let mut report = state.step();
        while report.game_over.is_none() {
            report = state.step();
        }

        let summary = report.game_over.unwrap();
        assert_eq!(summary.cause, GameOverCause::Collision(CollisionType::Wall));
        assert_eq!(state.status(), Status::GameOver);
        assert_eq!(state.food(), None);
        // Head reached row 0 and stopped there
        assert_eq!(state.body().head(), Position::new(15, 0));
        assert!(state.drain_events().contains(&GameEvent::GameOver(summary)));
    }

    #[test]
    fn test_no_space_ends_game() {
        // A 1x3 board filled by a length-3 snake leaves nowhere for food
        let grid = Grid::new(1, 3);
        let body = BodyEngine::with_segments(
            grid,
            &[Position::new(0, 2), Position::new(0, 1)],
            Direction::Up,
        );
        let placer = FoodPlacer::new(grid, grid.spawn_band(0, 0), StdRng::seed_from_u64(1), 10);
        let mut state = GameState::from_parts(body, placer, 1);
        state.set_status(Status::Playing);
        state.food = Some(Position::new(0, 0));

        let report = state.step();

        assert_eq!(report.advance.outcome, AdvanceOutcome::FoodEaten);
        assert_eq!(report.score, 1);
        let summary = report.game_over.unwrap();
        assert_eq!(summary.cause, GameOverCause::NoSpaceAvailable);
        assert_eq!(state.status(), Status::GameOver);
    }

    #[test]
    fn test_reset_clears_board() {
        let mut state = scenario_state();
        state.food = Some(Position::new(15, 6));
        state.step();
        assert_eq!(state.score(), 1);
        state.drain_events();

        state.reset();

        assert_eq!(state.score(), 0);
        assert_eq!(state.status(), Status::Idle);
        assert_eq!(state.food(), None);
        assert_eq!(state.body().len(), 1);
        assert_eq!(state.body().target_length(), 3);

        let events = state.drain_events();
        assert!(events.contains(&GameEvent::TerminalCleared));
        assert!(events.contains(&GameEvent::ScoreChanged(0)));
        assert!(events.contains(&GameEvent::Cleared {
            position: Position::new(15, 7),
            kind: CellKind::Body
        }));
    }
}
