//! HTTP API client for the game server.

use anyhow::{Context, Result, bail};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use thumbs_up::{
    PlayerId,
    messages::{
        GameStateResponse, JoinResponse, StatusResponse, SubmitBetRequest, SubmitThumbsRequest,
        SubmitThumbsResponse,
    },
    router::PLAYER_ID_HEADER,
};

/// API client acting as one player
#[derive(Clone, Debug)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
    player_id: PlayerId,
}

impl ApiClient {
    /// Create a new API client for `player_id`
    pub fn new(base_url: impl Into<String>, player_id: PlayerId) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            player_id,
        }
    }

    pub fn player_id(&self) -> &PlayerId {
        &self.player_id
    }

    /// Join the game
    pub async fn join(&self) -> Result<JoinResponse> {
        let response = self
            .client
            .get(format!("{}/join", self.base_url))
            .header(PLAYER_ID_HEADER, self.player_id.as_str())
            .send()
            .await
            .context("Failed to send join request")?;

        read_envelope(response, "Join").await
    }

    /// Fetch the current game snapshot
    pub async fn game_state(&self) -> Result<GameStateResponse> {
        let response = self
            .client
            .get(format!("{}/game_state", self.base_url))
            .header(PLAYER_ID_HEADER, self.player_id.as_str())
            .send()
            .await
            .context("Failed to send game state request")?;

        read_envelope(response, "Game state").await
    }

    /// Open a bet on the total number of raised thumbs
    pub async fn submit_bet(&self, bet: i64, own_thumbs: i64) -> Result<StatusResponse> {
        let response = self
            .client
            .post(format!("{}/submit_bet", self.base_url))
            .header(PLAYER_ID_HEADER, self.player_id.as_str())
            .json(&SubmitBetRequest { bet, own_thumbs })
            .send()
            .await
            .context("Failed to send bet request")?;

        read_envelope(response, "Bet").await
    }

    /// Raise thumbs for the open bet
    pub async fn submit_thumbs(&self, thumbs: i64) -> Result<SubmitThumbsResponse> {
        let response = self
            .client
            .post(format!("{}/submit_thumbs", self.base_url))
            .header(PLAYER_ID_HEADER, self.player_id.as_str())
            .json(&SubmitThumbsRequest { thumbs })
            .send()
            .await
            .context("Failed to send thumbs request")?;

        read_envelope(response, "Thumbs submission").await
    }

    /// Poll the game state every `interval` until `done` accepts a snapshot.
    pub async fn poll_until<F>(&self, interval: Duration, mut done: F) -> Result<GameStateResponse>
    where
        F: FnMut(&GameStateResponse) -> bool,
    {
        loop {
            let state = self.game_state().await?;
            if done(&state) {
                return Ok(state);
            }
            tokio::time::sleep(interval).await;
        }
    }

    /// Poll until the open round has been evaluated or the game has a winner.
    pub async fn wait_for_round_end(&self, interval: Duration) -> Result<GameStateResponse> {
        self.poll_until(interval, |state| {
            state.view.current_bet.is_none() || state.view.winner.is_some()
        })
        .await
    }
}

/// Decode a response envelope, turning an `ERROR` status into an error.
async fn read_envelope<T: DeserializeOwned>(response: reqwest::Response, action: &str) -> Result<T> {
    let http_status = response.status();
    let body: Value = response
        .json()
        .await
        .with_context(|| format!("Failed to parse {action} response"))?;

    if body.get("status").and_then(Value::as_str) != Some("OK") {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("no message");
        bail!("{action} failed ({http_status}): {message}");
    }

    serde_json::from_value(body).with_context(|| format!("Unexpected {action} response shape"))
}
