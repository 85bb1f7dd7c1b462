//! Endpoint semantics shared by every transport.
//!
//! Each endpoint function talks to the table through its handle. Rule
//! violations are [`GameError`]s and are answered with `ERROR` envelopes;
//! only framing problems (unknown path, bad JSON, a missing or overlong
//! `Player-ID`) surface as [`RequestError`].

use serde::Serialize;

use super::errors::RequestError;
use super::messages::{
    GameStateResponse, JoinResponse, StatusResponse, SubmitBetRequest, SubmitThumbsRequest,
    SubmitThumbsResponse,
};
use super::request::Request;
use crate::game::{GameError, GameView, PlayerId, RoundOutcome, Thumbs, constants};
use crate::table::{JoinReceipt, TableHandle};

/// Header identifying the caller on every request.
pub const PLAYER_ID_HEADER: &str = "Player-ID";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Route {
    Join,
    GameState,
    SubmitBet,
    SubmitThumbs,
}

impl Route {
    pub const ALL: [Route; 4] = [
        Route::Join,
        Route::GameState,
        Route::SubmitBet,
        Route::SubmitThumbs,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Self::Join => "/join",
            Self::GameState => "/game_state",
            Self::SubmitBet => "/submit_bet",
            Self::SubmitThumbs => "/submit_thumbs",
        }
    }

    pub fn method(self) -> &'static str {
        match self {
            Self::Join | Self::GameState => "GET",
            Self::SubmitBet | Self::SubmitThumbs => "POST",
        }
    }

    /// Match a method and a query-free path to an endpoint.
    pub fn resolve(method: &str, path: &str) -> Result<Self, RequestError> {
        let route = Self::ALL
            .into_iter()
            .find(|route| route.path() == path)
            .ok_or_else(|| RequestError::NotFound(path.to_string()))?;

        if route.method() != method {
            return Err(RequestError::MethodNotAllowed {
                method: method.to_string(),
                path: path.to_string(),
            });
        }
        Ok(route)
    }
}

/// Player id from a raw header value. Absent and blank values are missing;
/// values over [`constants::MAX_PLAYER_ID_LENGTH`] characters are invalid.
pub fn player_id_from(value: Option<&str>) -> Result<PlayerId, RequestError> {
    let value = value
        .filter(|v| !v.trim().is_empty())
        .ok_or(RequestError::MissingHeader(PLAYER_ID_HEADER))?;

    PlayerId::try_new(value).ok_or_else(|| RequestError::InvalidHeader {
        name: PLAYER_ID_HEADER,
        reason: format!(
            "longer than {} characters",
            constants::MAX_PLAYER_ID_LENGTH
        ),
    })
}

/// Narrow a client-supplied thumb count to `0..=max`.
pub fn check_thumbs(thumbs: i64, max: Thumbs) -> Result<Thumbs, GameError> {
    Thumbs::try_from(thumbs)
        .ok()
        .filter(|t| *t <= max)
        .ok_or(GameError::InvalidThumbs { thumbs, max })
}

pub async fn join(table: &TableHandle, player_id: PlayerId) -> Result<JoinReceipt, GameError> {
    table.join(player_id).await
}

pub async fn game_state(
    table: &TableHandle,
    viewer: Option<PlayerId>,
) -> Result<GameView, GameError> {
    table.view(viewer).await
}

/// Open a bet after checking `own_thumbs` against the table's limit.
pub async fn submit_bet(
    table: &TableHandle,
    player_id: PlayerId,
    request: SubmitBetRequest,
) -> Result<(), GameError> {
    let own_thumbs = check_thumbs(request.own_thumbs, table.settings().max_raised_thumbs)?;
    table.submit_bet(player_id, request.bet, own_thumbs).await
}

/// Submit thumbs after checking them against the table's limit. Returns the
/// round outcome when this submission closed the round.
pub async fn submit_thumbs(
    table: &TableHandle,
    player_id: PlayerId,
    request: SubmitThumbsRequest,
) -> Result<Option<RoundOutcome>, GameError> {
    let thumbs = check_thumbs(request.thumbs, table.settings().max_raised_thumbs)?;
    table.submit_thumbs(player_id, thumbs).await
}

/// Status code and JSON body ready to be written to the wire.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub body: Vec<u8>,
}

impl Reply {
    pub fn json<T: Serialize>(status: u16, value: &T) -> Self {
        let body = serde_json::to_vec(value)
            .unwrap_or_else(|_| br#"{"status":"ERROR"}"#.to_vec());
        Self { status, body }
    }

    pub fn ok<T: Serialize>(value: &T) -> Self {
        Self::json(200, value)
    }

    /// `ERROR` envelope answered with the error's status code.
    pub fn request_error(error: &RequestError) -> Self {
        Self::json(error.status_code(), &StatusResponse::error(error.to_string()))
    }
}

/// Route a parsed request and run its endpoint.
pub async fn dispatch(table: &TableHandle, request: &Request) -> Reply {
    match route_request(table, request).await {
        Ok(reply) => reply,
        Err(e) => {
            log::debug!("{} {} rejected: {e}", request.method, request.path);
            Reply::request_error(&e)
        }
    }
}

async fn route_request(table: &TableHandle, request: &Request) -> Result<Reply, RequestError> {
    let route = Route::resolve(&request.method, &request.path)?;
    let header = request.header(PLAYER_ID_HEADER);

    let reply = match route {
        Route::Join => {
            let player_id = player_id_from(header)?;
            match join(table, player_id).await {
                Ok(receipt) => Reply::ok(&JoinResponse::joined(receipt)),
                Err(e) => Reply::ok(&JoinResponse::error(e)),
            }
        }
        Route::GameState => {
            let viewer = player_id_from(header).ok();
            match game_state(table, viewer).await {
                Ok(view) => Reply::ok(&GameStateResponse::from(view)),
                Err(e) => Reply::ok(&StatusResponse::from(e)),
            }
        }
        Route::SubmitBet => {
            let player_id = player_id_from(header)?;
            let body: SubmitBetRequest = serde_json::from_slice(&request.body)?;
            match submit_bet(table, player_id, body).await {
                Ok(()) => Reply::ok(&StatusResponse::ok()),
                Err(e) => Reply::ok(&StatusResponse::from(e)),
            }
        }
        Route::SubmitThumbs => {
            let player_id = player_id_from(header)?;
            let body: SubmitThumbsRequest = serde_json::from_slice(&request.body)?;
            match submit_thumbs(table, player_id, body).await {
                Ok(round) => Reply::ok(&SubmitThumbsResponse::accepted(round)),
                Err(e) => Reply::ok(&SubmitThumbsResponse::error(e)),
            }
        }
    };
    Ok(reply)
}
