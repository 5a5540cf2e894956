//! HTTP API client for the hangman server.
//!
//! [`ApiClient`] implements [`StatsStore`] over the server's player
//! endpoints, so the console game runs unchanged against a remote server or
//! a local in-memory store.

use async_trait::async_trait;
use hangman::{PlayerRecord, StatsError, StatsResult, StatsStore};
use reqwest::{Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default per-request timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// API client for communicating with the hangman server
#[derive(Clone, Debug)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
    timeout: Duration,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreatePlayerRequest<'a> {
    player_name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateStatsRequest<'a> {
    player_name: &'a str,
    won: bool,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }
}

/// Any transport failure means the store could not be reached
fn transport_error(context: &str, err: reqwest::Error) -> StatsError {
    StatsError::Unavailable(format!("{context}: {err}"))
}

/// Turn a non-success response into the matching stats error
async fn error_from_response(response: Response, player_name: &str) -> StatsError {
    let status = response.status();
    let message = response
        .json::<ErrorResponse>()
        .await
        .map(|body| body.error)
        .unwrap_or_else(|_| status.to_string());

    match status {
        StatusCode::BAD_REQUEST => StatsError::Validation(message),
        StatusCode::NOT_FOUND => StatsError::NotFound(player_name.to_string()),
        _ => StatsError::Unavailable(format!("server returned {status}: {message}")),
    }
}

async fn parse_record(response: Response) -> StatsResult<PlayerRecord> {
    response
        .json()
        .await
        .map_err(|e| transport_error("Failed to parse player record", e))
}

#[async_trait]
impl StatsStore for ApiClient {
    async fn create_player(&self, player_name: &str) -> StatsResult<PlayerRecord> {
        let response = self
            .client
            .post(self.url("/players"))
            .timeout(self.timeout)
            .json(&CreatePlayerRequest { player_name })
            .send()
            .await
            .map_err(|e| transport_error("Failed to send create player request", e))?;

        if !response.status().is_success() {
            return Err(error_from_response(response, player_name).await);
        }
        parse_record(response).await
    }

    async fn get_player(&self, player_name: &str) -> StatsResult<Option<PlayerRecord>> {
        let response = self
            .client
            .get(self.url("/players"))
            .timeout(self.timeout)
            .query(&[("playerName", player_name)])
            .send()
            .await
            .map_err(|e| transport_error("Failed to send get player request", e))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(error_from_response(response, player_name).await);
        }
        parse_record(response).await.map(Some)
    }

    async fn increment_stat(&self, player_name: &str, won: bool) -> StatsResult<PlayerRecord> {
        let response = self
            .client
            .put(self.url("/players/stats"))
            .timeout(self.timeout)
            .json(&UpdateStatsRequest { player_name, won })
            .send()
            .await
            .map_err(|e| transport_error("Failed to send stats update", e))?;

        if !response.status().is_success() {
            return Err(error_from_response(response, player_name).await);
        }
        parse_record(response).await
    }

    async fn health_check(&self) -> StatsResult<()> {
        let response = self
            .client
            .get(format!("{}/health", self.base_url))
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| transport_error("Failed to reach server", e))?;

        if !response.status().is_success() {
            return Err(StatsError::Unavailable(format!(
                "server health check returned {}",
                response.status()
            )));
        }
        Ok(())
    }
}
