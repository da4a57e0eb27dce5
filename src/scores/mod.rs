//! Online scoreboard.
//!
//! Submission and retrieval run outside the tick loop; failures come back as
//! [`ScoreError`] values for the caller to show and never touch game state.

pub mod http;
pub mod memory;

pub use http::HttpScoreService;
pub use memory::InMemoryScoreService;

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One row of the scoreboard, in the service's JSON shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u32,
}

impl ScoreEntry {
    pub fn new(name: impl Into<String>, score: u32) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoreError {
    #[error("HTTP error: {0}")]
    Status(u16),

    #[error("score service unreachable: {0}")]
    Transport(String),

    #[error("malformed scoreboard: {0}")]
    Decode(String),
}

pub trait ScoreService: Send + Sync {
    fn submit(&self, entry: ScoreEntry) -> BoxFuture<'_, Result<(), ScoreError>>;

    /// Best `n` entries, highest first
    fn fetch_top(&self, n: usize) -> BoxFuture<'_, Result<Vec<ScoreEntry>, ScoreError>>;
}

/// Sort highest first and keep `n` rows. Ties keep their original order.
pub fn top_scores(mut entries: Vec<ScoreEntry>, n: usize) -> Vec<ScoreEntry> {
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    entries.truncate(n);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_scores_sorts_and_truncates() {
        let entries = vec![
            ScoreEntry::new("ana", 3),
            ScoreEntry::new("bo", 9),
            ScoreEntry::new("cy", 5),
            ScoreEntry::new("di", 9),
            ScoreEntry::new("ed", 1),
            ScoreEntry::new("fu", 7),
        ];

        let top = top_scores(entries, 5);

        let names: Vec<&str> = top.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["bo", "di", "fu", "cy", "ana"]);
    }

    #[test]
    fn test_top_scores_with_few_entries() {
        let top = top_scores(vec![ScoreEntry::new("solo", 2)], 5);
        assert_eq!(top, vec![ScoreEntry::new("solo", 2)]);
        assert!(top_scores(Vec::new(), 5).is_empty());
    }

    #[test]
    fn test_entry_wire_shape() {
        let json = serde_json::to_value(ScoreEntry::new("ana", 12)).unwrap();
        assert_eq!(json, serde_json::json!({ "name": "ana", "score": 12 }));
    }

    #[test]
    fn test_status_error_message() {
        assert_eq!(ScoreError::Status(503).to_string(), "HTTP error: 503");
    }
}
