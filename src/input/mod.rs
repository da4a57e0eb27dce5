//! Keyboard wiring.
//!
//! An [`InputSource`] yields [`KeyAction`]s one at a time. The game loop
//! applies each action as it arrives, so the last turn before a tick wins.

pub mod handler;

pub use handler::{InputHandler, KeyAction, is_interrupt};

use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use std::future::Future;
use tokio::sync::mpsc;
use tracing::warn;

/// Stream of player actions
pub trait InputSource {
    /// Next action, or `None` once the source is exhausted
    fn next_action(&mut self) -> impl Future<Output = Option<KeyAction>>;
}

impl InputSource for mpsc::Receiver<KeyAction> {
    fn next_action(&mut self) -> impl Future<Output = Option<KeyAction>> {
        self.recv()
    }
}

/// Terminal keyboard input
pub struct CrosstermInput {
    events: EventStream,
    handler: InputHandler,
}

impl CrosstermInput {
    pub fn new() -> Self {
        Self {
            events: EventStream::new(),
            handler: InputHandler::new(),
        }
    }

    /// Next raw terminal event; used by screens that read text
    pub async fn next_event(&mut self) -> Option<Event> {
        loop {
            match self.events.next().await? {
                Ok(event) => return Some(event),
                Err(err) => warn!(%err, "failed to read terminal event"),
            }
        }
    }
}

impl Default for CrosstermInput {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSource for CrosstermInput {
    async fn next_action(&mut self) -> Option<KeyAction> {
        loop {
            if let Event::Key(key) = self.next_event().await? {
                // Only process key press events, not release
                if key.kind == KeyEventKind::Press {
                    return Some(self.handler.handle_key_event(key));
                }
            }
        }
    }
}
