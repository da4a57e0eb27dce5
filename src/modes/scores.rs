use anyhow::{Result, anyhow};
use std::io::Write;
use std::sync::Arc;

use crate::scores::{ScoreEntry, ScoreService};

/// Prints the results table and exits
pub struct ScoresMode {
    service: Arc<dyn ScoreService>,
    top_n: usize,
}

impl ScoresMode {
    pub fn new(service: Arc<dyn ScoreService>, top_n: usize) -> Self {
        Self { service, top_n }
    }

    pub async fn run(&self, out: &mut impl Write) -> Result<()> {
        let entries = self
            .service
            .fetch_top(self.top_n)
            .await
            .map_err(|err| anyhow!("Failed to fetch scores: {err}"))?;

        out.write_all(format_table(&entries).as_bytes())?;
        Ok(())
    }
}

pub fn format_table(entries: &[ScoreEntry]) -> String {
    if entries.is_empty() {
        return "No scores yet\n".to_string();
    }

    let mut table = String::from(" #  Name              Score\n");
    for (rank, entry) in entries.iter().enumerate() {
        table.push_str(&format!("{:>2}  {:<16} {:>6}\n", rank + 1, entry.name, entry.score));
    }
    table
}
