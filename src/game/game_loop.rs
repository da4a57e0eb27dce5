use std::time::Duration;
use tracing::{debug, info, warn};

use super::{
    action::{Direction, Intent},
    config::GameConfig,
    error::GameError,
    scheduler::{self, TickScheduler, TickTicket},
    state::{GameState, GameSummary, Status, TickReport},
};
use crate::input::{InputSource, KeyAction};
use crate::render::Renderer;

/// Drives a [`GameState`] through time.
///
/// Owns the state machine Idle -> Playing <-> Paused -> GameOver and the one
/// pending tick. Every mutation is followed by a flush of the state's events
/// into the renderer, so the renderer always mirrors the state.
pub struct GameLoop<R: Renderer> {
    state: GameState,
    scheduler: TickScheduler,
    renderer: R,
    base_speed: Duration,
}

impl<R: Renderer> GameLoop<R> {
    pub fn new(config: &GameConfig, renderer: R) -> Self {
        Self::with_state(GameState::new(config), config.base_speed(), renderer)
    }

    pub fn with_state(state: GameState, base_speed: Duration, renderer: R) -> Self {
        let mut game = Self {
            state,
            scheduler: TickScheduler::new(),
            renderer,
            base_speed,
        };
        game.flush();
        game
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn status(&self) -> Status {
        self.state.status()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn pending_tick(&self) -> Option<TickTicket> {
        self.scheduler.pending()
    }

    /// Time between ticks at the current target length
    pub fn tick_interval(&self) -> Duration {
        let length = self.state.body().target_length().max(1);
        self.base_speed / u32::try_from(length).unwrap_or(u32::MAX)
    }

    /// Idle -> Playing: place food and schedule the first tick
    pub fn start(&mut self) -> Result<(), GameError> {
        self.expect_status(&[Status::Idle], "start")?;

        if let Err(err) = self.state.place_food() {
            self.state.end_without_space(&err);
            self.flush();
            return Err(err);
        }

        self.state.set_status(Status::Playing);
        self.schedule_next();
        info!(head = ?self.state.body().head(), "game started");
        self.flush();
        Ok(())
    }

    /// Playing -> Paused. Does nothing in any other status.
    pub fn pause(&mut self) {
        if self.status() != Status::Playing {
            return;
        }

        self.scheduler.cancel();
        self.state.set_status(Status::Paused);
        info!("game paused");
        self.flush();
    }

    /// Paused -> Playing. Does nothing in any other status.
    pub fn resume(&mut self) {
        if self.status() != Status::Paused {
            return;
        }

        self.state.set_status(Status::Playing);
        self.schedule_next();
        info!("game resumed");
        self.flush();
    }

    pub fn toggle_pause(&mut self) {
        match self.status() {
            Status::Playing => self.pause(),
            Status::Paused => self.resume(),
            Status::Idle | Status::GameOver => {}
        }
    }

    /// Throw the current game away and start a new one
    pub fn restart(&mut self) -> Result<(), GameError> {
        self.expect_status(
            &[Status::Playing, Status::Paused, Status::GameOver],
            "restart",
        )?;

        self.scheduler.cancel();
        self.state.reset();
        info!("game restarted");
        self.start()
    }

    /// Steer for the next tick. Reversals are dropped silently.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if self.status() == Status::GameOver {
            return false;
        }
        self.state.set_direction(direction)
    }

    pub fn handle_intent(&mut self, intent: Intent) -> Result<(), GameError> {
        match intent {
            Intent::Turn(direction) => {
                self.set_direction(direction);
                Ok(())
            }
            Intent::Start => match self.status() {
                Status::Idle => self.start(),
                Status::Paused => {
                    self.resume();
                    Ok(())
                }
                Status::Playing | Status::GameOver => Ok(()),
            },
            Intent::TogglePause => {
                self.toggle_pause();
                Ok(())
            }
            Intent::Restart => match self.status() {
                Status::Idle => self.start(),
                _ => self.restart(),
            },
        }
    }

    /// Run the tick `ticket` stands for, unless it was cancelled or replaced
    pub fn fire(&mut self, ticket: TickTicket) -> Option<TickReport> {
        if !self.scheduler.claim(ticket) {
            debug!(ticket = ticket.id(), "dropping stale tick");
            return None;
        }
        self.tick()
    }

    /// Advance one tick now. Returns `None` unless the game is playing.
    pub fn tick(&mut self) -> Option<TickReport> {
        if self.status() != Status::Playing {
            return None;
        }

        let report = self.state.step();
        debug!(
            outcome = ?report.advance.outcome,
            head = ?report.advance.head,
            score = report.score,
            "tick"
        );

        if report.game_over.is_some() {
            self.scheduler.cancel();
        } else {
            self.schedule_next();
        }

        self.flush();
        Some(report)
    }

    /// Headless driver: play until the game ends or the input asks to quit.
    ///
    /// The terminal mode runs its own `select!` on [`GameLoop::fire`] and
    /// [`scheduler::wait_for`] because it also waits on rendering and score
    /// replies.
    ///
    /// Ticks and input are awaited in the same task, so a tick that has
    /// fired always finishes before the next intent is applied.
    pub async fn run<I: InputSource>(&mut self, input: &mut I) -> Option<GameSummary> {
        loop {
            let pending = self.pending_tick();

            tokio::select! {
                ticket = scheduler::wait_for(pending) => {
                    if let Some(summary) = self.fire(ticket).and_then(|report| report.game_over) {
                        return Some(summary);
                    }
                }
                action = input.next_action() => match action {
                    None | Some(KeyAction::Quit) => return None,
                    Some(KeyAction::Intent(intent)) => {
                        if let Err(err) = self.handle_intent(intent) {
                            warn!(%err, "intent rejected");
                        }
                    }
                    Some(_) => {}
                },
            }
        }
    }

    fn schedule_next(&mut self) {
        let interval = self.tick_interval();
        self.scheduler.schedule(interval);
    }

    fn expect_status(&self, allowed: &[Status], action: &'static str) -> Result<(), GameError> {
        let from = self.status();
        if allowed.contains(&from) {
            Ok(())
        } else {
            Err(GameError::InvalidTransition { from, action })
        }
    }

    fn flush(&mut self) {
        for event in self.state.drain_events() {
            self.renderer.handle(&event);
        }
    }
}
