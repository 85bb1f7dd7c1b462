//! Game error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::entities::Thumbs;

/// Reasons a game operation can be rejected.
///
/// A rejected operation never mutates the game, so every variant is
/// recoverable at the request boundary.
#[derive(Clone, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum GameError {
    #[error("game is full")]
    CapacityReached,
    #[error("player already joined")]
    AlreadyJoined,
    #[error("need 2+ players")]
    GameNotStarted,
    #[error("game is over")]
    GameOver,
    #[error("a bet is already open")]
    BetAlreadyOpen,
    #[error("not your turn")]
    OutOfTurnBet,
    #[error("cannot submit thumbs")]
    IneligibleThumbsSubmission,
    #[error("no open bet")]
    NoOpenBet,
    #[error("still waiting for thumbs")]
    RoundIncomplete,
    #[error("thumbs must be between 0 and {max}, got {thumbs}")]
    InvalidThumbs { thumbs: i64, max: Thumbs },
    #[error("game table is closed")]
    TableClosed,
}

impl GameError {
    /// Whether the error came from a join attempt.
    pub fn is_join_rejection(&self) -> bool {
        matches!(self, Self::CapacityReached | Self::AlreadyJoined)
    }

    /// Whether the error came from a bet placed at the wrong time or by the
    /// wrong player.
    pub fn is_bet_rejection(&self) -> bool {
        matches!(
            self,
            Self::GameNotStarted | Self::GameOver | Self::BetAlreadyOpen | Self::OutOfTurnBet
        )
    }
}
