use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use super::BoardView;
use crate::game::{CellKind, CollisionType, GameOverCause, GameSummary, Position, Status};
use crate::scores::ScoreEntry;

/// Screen content drawn on top of the board
#[derive(Debug, Clone, Copy, Default)]
pub enum Overlay<'a> {
    #[default]
    None,
    /// Game over, asking for a name to submit
    NamePrompt { summary: &'a GameSummary, name: &'a str },
    /// Results table, or the error that prevented fetching it
    ScoreTable(Result<&'a [ScoreEntry], &'a str>),
    /// Table requested but not arrived yet
    Loading,
}

pub struct FramePainter;

impl FramePainter {
    pub fn new() -> Self {
        Self
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        board: &BoardView,
        overlay: Overlay<'_>,
        message: Option<&str>,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(board), chunks[0]);

        // Center the game grid horizontally
        let game_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        match overlay {
            Overlay::None => match board.terminal() {
                Some(summary) => {
                    frame.render_widget(self.render_game_over(summary, None), game_area)
                }
                None => frame.render_widget(self.render_grid(board), game_area),
            },
            Overlay::NamePrompt { summary, name } => {
                frame.render_widget(self.render_game_over(summary, Some(name)), game_area)
            }
            Overlay::ScoreTable(table) => {
                frame.render_widget(Clear, game_area);
                frame.render_widget(self.render_score_table(table), game_area);
            }
            Overlay::Loading => {
                frame.render_widget(Clear, game_area);
                frame.render_widget(
                    Paragraph::new("Fetching scores...")
                        .alignment(Alignment::Center)
                        .block(Block::default().borders(Borders::ALL).title(" Top Scores ")),
                    game_area,
                );
            }
        }

        frame.render_widget(self.render_controls(board.status(), message), chunks[2]);
    }

    fn render_grid(&self, board: &BoardView) -> Paragraph<'_> {
        let grid = board.grid();
        let mut lines = Vec::new();

        for y in 0..grid.height() {
            let mut spans = Vec::new();

            for x in 0..grid.width() {
                let cell = match board.cell(Position::new(x, y)) {
                    Some(CellKind::Body) => Span::styled(
                        "■ ",
                        Style::default()
                            .fg(Color::Green)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Some(CellKind::Food) => Span::styled(
                        "O ",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    ),
                    None => Span::styled(". ", Style::default().fg(Color::DarkGray)),
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        let title = match board.status() {
            Status::Paused => " Snake (paused) ",
            _ => " Snake ",
        };

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(title),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(&self, board: &BoardView) -> Paragraph<'_> {
        let status = match board.status() {
            Status::Idle => "Ready",
            Status::Playing => "Playing",
            Status::Paused => "Paused",
            Status::GameOver => "Game Over",
        };

        let text = vec![Line::from(vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                board.score().to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Length: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                board.body_cells().count().to_string(),
                Style::default().fg(Color::White),
            ),
            Span::raw("    "),
            Span::styled(status, Style::default().fg(Color::Cyan)),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_game_over<'a>(&self, summary: &GameSummary, name: Option<&'a str>) -> Paragraph<'a> {
        let cause = match summary.cause {
            GameOverCause::Collision(CollisionType::Wall) => "You hit the wall",
            GameOverCause::Collision(CollisionType::SelfCollision) => "You bit yourself",
            GameOverCause::NoSpaceAvailable => "The board is full",
        };

        let mut text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(Span::styled(cause, Style::default().fg(Color::Gray))),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    summary.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
        ];

        match name {
            Some(name) => {
                text.push(Line::from(Span::styled(
                    "What's your name? Submit your score!",
                    Style::default().fg(Color::Gray),
                )));
                text.push(Line::from(vec![
                    Span::styled(
                        name,
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled("_", Style::default().fg(Color::Cyan)),
                ]));
                text.push(Line::from(Span::styled(
                    "Enter to submit, Esc to skip",
                    Style::default().fg(Color::DarkGray),
                )));
            }
            None => {
                text.push(Line::from(vec![
                    Span::styled("Press ", Style::default().fg(Color::Gray)),
                    Span::styled(
                        "R",
                        Style::default()
                            .fg(Color::Green)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(" to restart, ", Style::default().fg(Color::Gray)),
                    Span::styled(
                        "T",
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(" for top scores or ", Style::default().fg(Color::Gray)),
                    Span::styled(
                        "Q",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(" to quit", Style::default().fg(Color::Gray)),
                ]));
            }
        }

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_score_table<'a>(&self, table: Result<&'a [ScoreEntry], &'a str>) -> Paragraph<'a> {
        let mut text = vec![Line::from("")];

        match table {
            Ok([]) => text.push(Line::from(Span::styled(
                "No scores yet",
                Style::default().fg(Color::Gray),
            ))),
            Ok(entries) => {
                for (rank, entry) in entries.iter().enumerate() {
                    text.push(Line::from(vec![
                        Span::styled(
                            format!("{:>2}. ", rank + 1),
                            Style::default().fg(Color::Yellow),
                        ),
                        Span::styled(
                            format!("{:<16}", entry.name),
                            Style::default().fg(Color::White),
                        ),
                        Span::styled(
                            format!("{:>6}", entry.score),
                            Style::default()
                                .fg(Color::Green)
                                .add_modifier(Modifier::BOLD),
                        ),
                    ]));
                }
            }
            Err(error) => text.push(Line::from(Span::styled(
                error,
                Style::default().fg(Color::Red),
            ))),
        }

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(Color::Yellow))
                .title(" Top Scores "),
        )
    }

    fn render_controls<'a>(&self, status: Status, message: Option<&'a str>) -> Paragraph<'a> {
        if let Some(message) = message {
            return Paragraph::new(Line::from(Span::styled(
                message,
                Style::default().fg(Color::Yellow),
            )))
            .alignment(Alignment::Center);
        }

        let hint = match status {
            Status::Idle => "Enter to start | ",
            Status::Paused => "Esc to resume | ",
            Status::Playing => "Esc to pause | ",
            Status::GameOver => "R to restart | ",
        };

        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::raw(hint),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for FramePainter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Grid;
    use crate::render::Renderer;
    use ratatui::{Terminal, backend::TestBackend};

    fn draw(board: &BoardView, overlay: Overlay<'_>) -> String {
        let backend = TestBackend::new(90, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| FramePainter::new().render(frame, board, overlay, None))
            .unwrap();

        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_draws_score_header() {
        let mut board = BoardView::new(Grid::default());
        board.update_score(12);
        assert!(draw(&board, Overlay::None).contains("Score: 12"));
    }

    #[test]
    fn test_draws_game_over_prompt() {
        let mut board = BoardView::new(Grid::default());
        let summary = GameSummary {
            score: 3,
            cause: GameOverCause::Collision(CollisionType::SelfCollision),
            length: 6,
        };
        board.show_terminal_state(&summary);

        let screen = draw(
            &board,
            Overlay::NamePrompt {
                summary: &summary,
                name: "ana",
            },
        );
        assert!(screen.contains("GAME OVER"));
        assert!(screen.contains("ana"));
    }

    #[test]
    fn test_draws_score_table() {
        let board = BoardView::new(Grid::default());
        let entries = vec![ScoreEntry::new("bo", 9), ScoreEntry::new("ana", 4)];

        let screen = draw(&board, Overlay::ScoreTable(Ok(entries.as_slice())));
        assert!(screen.contains("Top Scores"));
        assert!(screen.contains("bo"));

        let screen = draw(&board, Overlay::ScoreTable(Err("HTTP error: 500")));
        assert!(screen.contains("HTTP error: 500"));
    }
}
