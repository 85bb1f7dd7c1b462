//! JSON envelopes of the polling protocol.
//!
//! Every response carries a `status` of `OK` or `ERROR`. Optional fields are
//! left out of the JSON when unset, so an error reply is just
//! `{"status": "ERROR", "message": "..."}`.

use serde::{Deserialize, Serialize};

use crate::game::{GameError, GameView, PlayerId, RoundOutcome};
use crate::table::JoinReceipt;

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Status {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "ERROR")]
    Error,
}

/// Status with an optional message. Returned by `/submit_bet` and used for
/// every error that has no richer envelope.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct StatusResponse {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self {
            status: Status::Ok,
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            message: Some(message.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }
}

impl From<GameError> for StatusResponse {
    fn from(error: GameError) -> Self {
        Self::error(error.to_string())
    }
}

/// Reply to `GET /join`
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct JoinResponse {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_id: Option<PlayerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_started: Option<bool>,
}

impl JoinResponse {
    pub fn joined(receipt: JoinReceipt) -> Self {
        Self {
            status: Status::Ok,
            message: Some("Joined game".to_string()),
            player_id: Some(receipt.player_id),
            game_started: Some(receipt.game_started),
        }
    }

    pub fn error(error: GameError) -> Self {
        Self {
            status: Status::Error,
            message: Some(error.to_string()),
            player_id: None,
            game_started: None,
        }
    }
}

/// Reply to `GET /game_state`
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct GameStateResponse {
    pub status: Status,
    #[serde(flatten)]
    pub view: GameView,
}

impl From<GameView> for GameStateResponse {
    fn from(view: GameView) -> Self {
        Self {
            status: Status::Ok,
            view,
        }
    }
}

/// Body of `POST /submit_bet`
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SubmitBetRequest {
    pub bet: i64,
    pub own_thumbs: i64,
}

/// Body of `POST /submit_thumbs`
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SubmitThumbsRequest {
    pub thumbs: i64,
}

/// Reply to `POST /submit_thumbs`. When the submission closed the round it
/// also carries either `game_over` and `winner` or `next_turn`.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SubmitThumbsResponse {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_over: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<PlayerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_turn: Option<PlayerId>,
}

impl SubmitThumbsResponse {
    pub fn accepted(round: Option<RoundOutcome>) -> Self {
        let mut response = Self {
            status: Status::Ok,
            message: None,
            game_over: None,
            winner: None,
            next_turn: None,
        };
        if let Some(round) = round {
            if round.is_game_over() {
                response.game_over = Some(true);
                response.winner = round.winner().cloned();
            } else {
                response.next_turn = round.next_turn().cloned();
            }
        }
        response
    }

    pub fn error(error: GameError) -> Self {
        Self {
            status: Status::Error,
            message: Some(error.to_string()),
            game_over: None,
            winner: None,
            next_turn: None,
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over == Some(true)
    }
}
