use futures::FutureExt;
use futures::future::BoxFuture;
use std::time::Duration;
use tracing::debug;

use super::{ScoreEntry, ScoreError, ScoreService, top_scores};

/// Scoreboard behind a JSON HTTP endpoint.
///
/// `POST <url>` with `{"name", "score"}` submits; `GET <url>` returns every
/// entry as a JSON array, which is sorted and cut down locally.
#[derive(Debug, Clone)]
pub struct HttpScoreService {
    client: reqwest::Client,
    url: String,
}

impl HttpScoreService {
    pub fn new(url: impl Into<String>) -> Result<Self, ScoreError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(transport)?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn post_entry(&self, entry: ScoreEntry) -> Result<(), ScoreError> {
        let response = self
            .client
            .post(&self.url)
            .header(reqwest::header::ACCEPT, "application/json, text/plain, */*")
            .json(&entry)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScoreError::Status(status.as_u16()));
        }

        debug!(name = %entry.name, score = entry.score, "score submitted");
        Ok(())
    }

    async fn get_top(&self, n: usize) -> Result<Vec<ScoreEntry>, ScoreError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScoreError::Status(status.as_u16()));
        }

        let entries: Vec<ScoreEntry> = response
            .json()
            .await
            .map_err(|err| ScoreError::Decode(err.to_string()))?;
        Ok(top_scores(entries, n))
    }
}

fn transport(err: reqwest::Error) -> ScoreError {
    ScoreError::Transport(err.to_string())
}

impl ScoreService for HttpScoreService {
    fn submit(&self, entry: ScoreEntry) -> BoxFuture<'_, Result<(), ScoreError>> {
        self.post_entry(entry).boxed()
    }

    fn fetch_top(&self, n: usize) -> BoxFuture<'_, Result<Vec<ScoreEntry>, ScoreError>> {
        self.get_top(n).boxed()
    }
}
