use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{AppError, Result};

/// Supplies filler content for posts created without any
#[async_trait]
pub trait JokeSource: Send + Sync {
    async fn random_joke(&self) -> Result<String>;
}

#[derive(Debug, Deserialize)]
struct JokeEntry {
    joke: String,
}

/// Joke API reached over HTTP (`[{"joke": "..."}]` responses)
#[derive(Clone)]
pub struct HttpJokeSource {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

impl HttpJokeSource {
    pub fn new(client: reqwest::Client, url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            url: url.into(),
            api_key,
        }
    }
}

#[async_trait]
impl JokeSource for HttpJokeSource {
    async fn random_joke(&self) -> Result<String> {
        let mut request = self.client.get(&self.url);
        if let Some(key) = &self.api_key {
            request = request.header("X-Api-Key", key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("Joke API returned {}: {}", status, body);
            return Err(AppError::internal("Failed to get joke"));
        }

        let entries: Vec<JokeEntry> = response.json().await?;
        first_joke(entries)
    }
}

fn first_joke(entries: Vec<JokeEntry>) -> Result<String> {
    entries
        .into_iter()
        .map(|e| e.joke)
        .find(|j| !j.trim().is_empty())
        .ok_or_else(|| AppError::internal("Failed to get joke"))
}
