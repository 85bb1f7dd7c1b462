//! Game API handlers.
//!
//! Thin wrappers over `thumbs_up::router`: they extract the caller, decode
//! the JSON body, and record logs and metrics for the outcome. Rule
//! violations are answered with `200` and an `ERROR` envelope.
//!
//! # Examples
//!
//! Join, then open a bet:
//! ```bash
//! curl -H "Player-ID: P1" http://localhost:55556/join
//! curl -X POST http://localhost:55556/submit_bet \
//!   -H "Player-ID: P1" \
//!   -H "Content-Type: application/json" \
//!   -d '{"bet": 2, "own_thumbs": 1}'
//! ```

use axum::{
    Json,
    body::Bytes,
    extract::{State, rejection::BytesRejection},
    http::StatusCode,
};
use serde::de::DeserializeOwned;
use thumbs_up::{
    messages::{
        GameStateResponse, JoinResponse, StatusResponse, SubmitBetRequest, SubmitThumbsRequest,
        SubmitThumbsResponse,
    },
    router,
};

use super::{
    AppState,
    player_id::{Player, Viewer},
};
use crate::{logging, metrics};

/// Rejection for requests that never reach the game
pub type ApiError = (StatusCode, Json<StatusResponse>);

/// Decode a JSON body regardless of `Content-Type`. A body over the
/// router's limit is answered with `413`.
fn parse_body<T: DeserializeOwned>(body: Result<Bytes, BytesRejection>) -> Result<T, ApiError> {
    let body = body.map_err(|rejection| {
        (
            rejection.status(),
            Json(StatusResponse::error(rejection.body_text())),
        )
    })?;
    serde_json::from_slice(&body).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(StatusResponse::error(format!("invalid JSON body: {e}"))),
        )
    })
}

/// Join the game.
///
/// # Response
///
/// `{"status": "OK", "message": "Joined game", "player_id": "P1", "game_started": false}`
/// or an `ERROR` envelope when the game is full or the id is taken.
pub async fn join(State(state): State<AppState>, Player(player_id): Player) -> Json<JoinResponse> {
    match router::join(&state.table, player_id.clone()).await {
        Ok(receipt) => {
            logging::log_join(&player_id, true, None);
            metrics::joins_total(true);
            metrics::players_seated(receipt.player_count);
            Json(JoinResponse::joined(receipt))
        }
        Err(e) => {
            let message = e.to_string();
            logging::log_join(&player_id, false, Some(&message));
            metrics::joins_total(false);
            Json(JoinResponse::error(e))
        }
    }
}

/// Snapshot of the game for the caller. `Player-ID` is optional here.
pub async fn game_state(
    State(state): State<AppState>,
    Viewer(viewer): Viewer,
) -> Result<Json<GameStateResponse>, Json<StatusResponse>> {
    router::game_state(&state.table, viewer)
        .await
        .map(|view| Json(GameStateResponse::from(view)))
        .map_err(|e| Json(StatusResponse::from(e)))
}

/// Open a bet for the player on turn.
pub async fn submit_bet(
    State(state): State<AppState>,
    Player(player_id): Player,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<StatusResponse>, ApiError> {
    let request: SubmitBetRequest = parse_body(body)?;

    let response = match router::submit_bet(&state.table, player_id.clone(), request).await {
        Ok(()) => {
            tracing::debug!(player_id = %player_id, bet = request.bet, "Bet opened");
            StatusResponse::ok()
        }
        Err(e) => {
            let response = StatusResponse::from(e);
            logging::log_rejected_action("submit_bet", &player_id, response.message.as_deref());
            response
        }
    };
    metrics::bets_total(response.is_ok());
    Ok(Json(response))
}

/// Raise thumbs for the open bet. The submission that completes the round
/// also reports its outcome.
pub async fn submit_thumbs(
    State(state): State<AppState>,
    Player(player_id): Player,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<SubmitThumbsResponse>, ApiError> {
    let request: SubmitThumbsRequest = parse_body(body)?;

    let response = match router::submit_thumbs(&state.table, player_id.clone(), request).await {
        Ok(round) => {
            metrics::thumbs_submissions_total(true);
            if let Some(round) = &round {
                logging::log_round(round);
                metrics::rounds_total(round.is_correct());
                if round.is_game_over() {
                    metrics::games_won_total();
                }
            }
            SubmitThumbsResponse::accepted(round)
        }
        Err(e) => {
            metrics::thumbs_submissions_total(false);
            let response = SubmitThumbsResponse::error(e);
            logging::log_rejected_action("submit_thumbs", &player_id, response.message.as_deref());
            response
        }
    };
    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_body_accepts_valid_json() {
        let body = Bytes::from_static(br#"{"bet": 3, "own_thumbs": 1}"#);
        let request: SubmitBetRequest = parse_body(Ok(body)).unwrap();
        assert_eq!(request, SubmitBetRequest { bet: 3, own_thumbs: 1 });
    }

    #[test]
    fn test_parse_body_rejects_malformed_json() {
        let body = Bytes::from_static(b"{\"thumbs\":");
        let (status, Json(response)) = parse_body::<SubmitThumbsRequest>(Ok(body)).unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!response.is_ok());

        let body = Bytes::from_static(br#"{"thumbs": "two"}"#);
        assert!(parse_body::<SubmitThumbsRequest>(Ok(body)).is_err());
    }
}
