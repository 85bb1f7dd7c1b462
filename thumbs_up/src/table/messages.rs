//! Table actor message types.

use crate::game::{GameError, GameView, PlayerId, RoundOutcome, Thumbs};
use tokio::sync::oneshot;

/// Reply channel for operations that can be rejected by the game.
pub type Reply<T> = oneshot::Sender<Result<T, GameError>>;

/// Messages that can be sent to a TableActor
#[derive(Debug)]
pub enum TableMessage {
    /// Join the game
    Join {
        player_id: PlayerId,
        response: Reply<JoinReceipt>,
    },

    /// Snapshot of the game for a poller
    GetView {
        viewer: Option<PlayerId>,
        response: oneshot::Sender<GameView>,
    },

    /// Open a bet for the player on turn
    SubmitBet {
        player_id: PlayerId,
        declared_total: i64,
        own_thumbs: Thumbs,
        response: Reply<()>,
    },

    /// Raise thumbs for the open bet. The round is evaluated in the same
    /// step when this was the last owed submission.
    SubmitThumbs {
        player_id: PlayerId,
        thumbs: Thumbs,
        response: Reply<Option<RoundOutcome>>,
    },

    /// Stop the actor
    Close { response: oneshot::Sender<()> },
}

/// Result of a successful join
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JoinReceipt {
    pub player_id: PlayerId,
    pub game_started: bool,
    pub player_count: usize,
}
