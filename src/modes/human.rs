use anyhow::{Context, Result};
use crossterm::{
    event::{Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;
use tracing::{info, warn};

use crate::game::{GameConfig, GameLoop, GameSummary, Status, TickTicket, scheduler};
use crate::input::{CrosstermInput, InputHandler, KeyAction, is_interrupt};
use crate::render::{BoardView, FramePainter, Overlay};
use crate::scores::{ScoreEntry, ScoreError, ScoreService};

const MAX_NAME_LEN: usize = 16;

/// What occupies the game area besides the board itself
#[derive(Debug, Clone, PartialEq)]
enum Screen {
    Board,
    NamePrompt { summary: GameSummary, name: String },
    Loading,
    Scores(Result<Vec<ScoreEntry>, String>),
}

/// Results of score service calls made in background tasks
#[derive(Debug)]
enum ScoreUpdate {
    Submitted {
        entry: ScoreEntry,
        result: Result<(), ScoreError>,
    },
    Fetched(Result<Vec<ScoreEntry>, ScoreError>),
}

pub struct HumanMode {
    game: GameLoop<BoardView>,
    painter: FramePainter,
    input_handler: InputHandler,
    scores: Arc<dyn ScoreService>,
    updates_tx: mpsc::UnboundedSender<ScoreUpdate>,
    updates_rx: Option<mpsc::UnboundedReceiver<ScoreUpdate>>,
    screen: Screen,
    message: Option<String>,
    player: String,
    top_n: usize,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(config: GameConfig, scores: Arc<dyn ScoreService>, player: Option<String>) -> Self {
        let board = BoardView::new(config.grid());
        let (updates_tx, updates_rx) = mpsc::unbounded_channel();

        Self {
            game: GameLoop::new(&config, board),
            painter: FramePainter::new(),
            input_handler: InputHandler::new(),
            scores,
            updates_tx,
            updates_rx: Some(updates_rx),
            screen: Screen::Board,
            message: None,
            player: player.unwrap_or_default(),
            top_n: config.top_scores,
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut input = CrosstermInput::new();
        let mut updates = self
            .updates_rx
            .take()
            .context("Game loop is already running")?;

        // Render at 30 FPS (33ms per frame)
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        loop {
            let pending = self.game.pending_tick();

            tokio::select! {
                // Handle terminal events
                maybe_event = input.next_event() => match maybe_event {
                    Some(event) => self.handle_event(event),
                    None => self.should_quit = true,
                },

                // Game logic tick, at whatever interval the game asked for
                ticket = scheduler::wait_for(pending) => {
                    self.on_tick(ticket);
                }

                // Score service replies
                Some(update) = updates.recv() => {
                    self.on_score_update(update);
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.draw(terminal)?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn draw(&self, terminal: &mut Terminal<CrosstermBackend<Stderr>>) -> Result<()> {
        let overlay = match &self.screen {
            Screen::Board => Overlay::None,
            Screen::NamePrompt { summary, name } => Overlay::NamePrompt {
                summary,
                name: name.as_str(),
            },
            Screen::Loading => Overlay::Loading,
            Screen::Scores(Ok(entries)) => Overlay::ScoreTable(Ok(entries.as_slice())),
            Screen::Scores(Err(error)) => Overlay::ScoreTable(Err(error.as_str())),
        };

        terminal
            .draw(|frame| {
                self.painter
                    .render(frame, self.game.renderer(), overlay, self.message.as_deref());
            })
            .context("Failed to draw frame")?;
        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            // Text entry swallows letters, but Ctrl+C still quits
            if matches!(self.screen, Screen::NamePrompt { .. }) && !is_interrupt(&key) {
                self.handle_prompt_key(key);
                return;
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::Intent(intent) => {
                    // Any game input closes the score table
                    if matches!(self.screen, Screen::Scores(_) | Screen::Loading) {
                        self.screen = Screen::Board;
                    }
                    self.message = None;
                    if let Err(err) = self.game.handle_intent(intent) {
                        self.message = Some(err.to_string());
                    }
                }
                KeyAction::ShowScores => self.request_scores(),
                KeyAction::Quit => self.should_quit = true,
                KeyAction::None => {}
            }
        }
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) {
        let Screen::NamePrompt { summary, name } = &mut self.screen else {
            return;
        };

        match key.code {
            KeyCode::Char(c) if !c.is_control() && name.chars().count() < MAX_NAME_LEN => {
                name.push(c);
            }
            KeyCode::Backspace => {
                name.pop();
            }
            KeyCode::Enter => {
                let entry = ScoreEntry::new(name.trim(), summary.score);
                self.screen = Screen::Board;
                if entry.name.is_empty() {
                    return;
                }
                self.player = entry.name.clone();
                self.submit(entry);
            }
            KeyCode::Esc => {
                self.screen = Screen::Board;
            }
            _ => {}
        }
    }

    fn on_tick(&mut self, ticket: TickTicket) {
        let Some(report) = self.game.fire(ticket) else {
            return;
        };

        if let Some(summary) = report.game_over {
            self.screen = Screen::NamePrompt {
                summary,
                name: self.player.clone(),
            };
        }
    }

    fn submit(&mut self, entry: ScoreEntry) {
        info!(name = %entry.name, score = entry.score, "submitting score");
        self.message = Some(format!("Submitting {} for {}...", entry.score, entry.name));

        let service = Arc::clone(&self.scores);
        let updates = self.updates_tx.clone();
        tokio::spawn(async move {
            let result = service.submit(entry.clone()).await;
            let _ = updates.send(ScoreUpdate::Submitted { entry, result });
        });
    }

    fn request_scores(&mut self) {
        if matches!(self.screen, Screen::Loading) {
            return;
        }
        // The table covers the board, so don't let the snake run underneath
        if self.game.status() == Status::Playing {
            self.game.pause();
        }
        self.screen = Screen::Loading;

        let service = Arc::clone(&self.scores);
        let updates = self.updates_tx.clone();
        let top_n = self.top_n;
        tokio::spawn(async move {
            let result = service.fetch_top(top_n).await;
            let _ = updates.send(ScoreUpdate::Fetched(result));
        });
    }

    fn on_score_update(&mut self, update: ScoreUpdate) {
        match update {
            ScoreUpdate::Submitted { entry, result: Ok(()) } => {
                self.message = Some(format!("Saved {} for {}", entry.score, entry.name));
            }
            ScoreUpdate::Submitted { entry, result: Err(err) } => {
                warn!(%err, name = %entry.name, "score submission failed");
                self.message = Some(err.to_string());
            }
            ScoreUpdate::Fetched(result) => {
                if let Err(err) = &result {
                    warn!(%err, "fetching scores failed");
                }
                // Ignore a late reply the player has already dismissed
                if matches!(self.screen, Screen::Loading) {
                    self.screen = Screen::Scores(result.map_err(|err| err.to_string()));
                }
            }
        }
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
