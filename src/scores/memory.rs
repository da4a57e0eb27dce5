use futures::FutureExt;
use futures::future::BoxFuture;
use std::sync::{Arc, Mutex};

use super::{ScoreEntry, ScoreError, ScoreService, top_scores};

/// Scoreboard kept in process memory, used when no service URL is configured
#[derive(Debug, Clone, Default)]
pub struct InMemoryScoreService {
    entries: Arc<Mutex<Vec<ScoreEntry>>>,
}

impl InMemoryScoreService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ScoreService for InMemoryScoreService {
    fn submit(&self, entry: ScoreEntry) -> BoxFuture<'_, Result<(), ScoreError>> {
        let result = self
            .entries
            .lock()
            .map(|mut entries| entries.push(entry))
            .map_err(|_| ScoreError::Transport("scoreboard lock poisoned".to_string()));
        futures::future::ready(result).boxed()
    }

    fn fetch_top(&self, n: usize) -> BoxFuture<'_, Result<Vec<ScoreEntry>, ScoreError>> {
        let result = self
            .entries
            .lock()
            .map(|entries| top_scores(entries.clone(), n))
            .map_err(|_| ScoreError::Transport("scoreboard lock poisoned".to_string()));
        futures::future::ready(result).boxed()
    }
}
