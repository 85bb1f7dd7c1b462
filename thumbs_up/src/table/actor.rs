//! Table actor implementation with async message handling.

use super::messages::{JoinReceipt, TableMessage};
use crate::game::{GameError, GameSettings, GameView, PlayerId, RoundOutcome, Thumbs, ThumbsUpGame};
use tokio::sync::{mpsc, oneshot};

/// Inbox depth before senders start waiting on the actor.
const INBOX_CAPACITY: usize = 100;

/// Table actor handle for sending messages
#[derive(Clone, Debug)]
pub struct TableHandle {
    sender: mpsc::Sender<TableMessage>,
    settings: GameSettings,
}

impl TableHandle {
    /// Create a new table handle
    pub fn new(sender: mpsc::Sender<TableMessage>, settings: GameSettings) -> Self {
        Self { sender, settings }
    }

    /// Settings the table's game was created with
    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    /// Send a message to the table
    pub async fn send(&self, message: TableMessage) -> Result<(), GameError> {
        self.sender
            .send(message)
            .await
            .map_err(|_| GameError::TableClosed)
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> TableMessage,
    ) -> Result<T, GameError> {
        let (response, rx) = oneshot::channel();
        self.send(build(response)).await?;
        rx.await.map_err(|_| GameError::TableClosed)
    }

    pub async fn join(&self, player_id: PlayerId) -> Result<JoinReceipt, GameError> {
        self.request(|response| TableMessage::Join {
            player_id,
            response,
        })
        .await?
    }

    pub async fn view(&self, viewer: Option<PlayerId>) -> Result<GameView, GameError> {
        self.request(|response| TableMessage::GetView { viewer, response })
            .await
    }

    pub async fn submit_bet(
        &self,
        player_id: PlayerId,
        declared_total: i64,
        own_thumbs: Thumbs,
    ) -> Result<(), GameError> {
        self.request(|response| TableMessage::SubmitBet {
            player_id,
            declared_total,
            own_thumbs,
            response,
        })
        .await?
    }

    /// Submit thumbs, returning the round outcome when this closed the round.
    pub async fn submit_thumbs(
        &self,
        player_id: PlayerId,
        thumbs: Thumbs,
    ) -> Result<Option<RoundOutcome>, GameError> {
        self.request(|response| TableMessage::SubmitThumbs {
            player_id,
            thumbs,
            response,
        })
        .await?
    }

    pub async fn close(&self) -> Result<(), GameError> {
        self.request(|response| TableMessage::Close { response })
            .await
    }
}

/// Actor owning one game.
///
/// Messages are handled one at a time to completion, so every game
/// operation is serialized without a lock.
pub struct TableActor {
    game: ThumbsUpGame,
    inbox: mpsc::Receiver<TableMessage>,
    is_closed: bool,
}

impl TableActor {
    /// Create a new table actor and the handle used to reach it
    pub fn new(settings: GameSettings) -> (Self, TableHandle) {
        let (sender, inbox) = mpsc::channel(INBOX_CAPACITY);
        let actor = Self {
            game: ThumbsUpGame::from(settings),
            inbox,
            is_closed: false,
        };
        (actor, TableHandle::new(sender, settings))
    }

    /// Create an actor and spawn it on the current Tokio runtime.
    pub fn spawn(settings: GameSettings) -> TableHandle {
        let (actor, handle) = Self::new(settings);
        tokio::spawn(actor.run());
        handle
    }

    /// Run the table actor event loop until closed or every handle is dropped
    pub async fn run(mut self) {
        log::info!(
            "Table starting ({} seats, {} thumbs each)",
            self.game.players().capacity(),
            self.game.settings().starting_thumbs
        );

        while let Some(message) = self.inbox.recv().await {
            self.handle_message(message);
            if self.is_closed {
                break;
            }
        }

        log::info!(
            "Table closed after {} round(s)",
            self.game.rounds_played()
        );
    }

    fn handle_message(&mut self, message: TableMessage) {
        match message {
            TableMessage::Join {
                player_id,
                response,
            } => {
                let result = self.handle_join(player_id);
                let _ = response.send(result);
            }

            TableMessage::GetView { viewer, response } => {
                let _ = response.send(self.game.view(viewer.as_ref()));
            }

            TableMessage::SubmitBet {
                player_id,
                declared_total,
                own_thumbs,
                response,
            } => {
                let result = self
                    .game
                    .submit_bet(&player_id, declared_total, own_thumbs);
                if let Err(e) = &result {
                    log::debug!("Rejected bet from {player_id}: {e}");
                }
                let _ = response.send(result);
            }

            TableMessage::SubmitThumbs {
                player_id,
                thumbs,
                response,
            } => {
                let result = self.handle_submit_thumbs(&player_id, thumbs);
                let _ = response.send(result);
            }

            TableMessage::Close { response } => {
                self.is_closed = true;
                let _ = response.send(());
            }
        }
    }

    fn handle_join(&mut self, player_id: PlayerId) -> Result<JoinReceipt, GameError> {
        if let Err(e) = self.game.add_player(&player_id) {
            log::debug!("Rejected join from {player_id}: {e}");
            return Err(e);
        }
        Ok(JoinReceipt {
            player_id,
            game_started: self.game.is_started(),
            player_count: self.game.player_count(),
        })
    }

    fn handle_submit_thumbs(
        &mut self,
        player_id: &PlayerId,
        thumbs: Thumbs,
    ) -> Result<Option<RoundOutcome>, GameError> {
        if let Err(e) = self.game.submit_thumbs(player_id, thumbs) {
            log::debug!("Rejected thumbs from {player_id}: {e}");
            return Err(e);
        }
        if self.game.all_submitted() {
            self.game.evaluate_round().map(Some)
        } else {
            Ok(None)
        }
    }
}
