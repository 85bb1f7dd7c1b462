//! `Player-ID` header extractors.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use thumbs_up::{
    PlayerId,
    messages::StatusResponse,
    router::{PLAYER_ID_HEADER, player_id_from},
};

fn header_value(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(PLAYER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
}

/// Caller identity required by an endpoint. A missing, blank or overlong
/// header is rejected with `400` and an `ERROR` envelope.
#[derive(Clone, Debug)]
pub struct Player(pub PlayerId);

impl<S> FromRequestParts<S> for Player
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<StatusResponse>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        player_id_from(header_value(parts))
            .map(Player)
            .map_err(|e| {
                (
                    StatusCode::BAD_REQUEST,
                    Json(StatusResponse::error(e.to_string())),
                )
            })
    }
}

/// Optional caller identity for read-only endpoints.
#[derive(Clone, Debug)]
pub struct Viewer(pub Option<PlayerId>);

impl<S> FromRequestParts<S> for Viewer
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Viewer(player_id_from(header_value(parts)).ok()))
    }
}
