//! What a polling player owes the game next.
//!
//! [`pending_action`] reads a snapshot the same way every client loop does:
//! a winner ends play, the player on turn bets once no bet is open, and a
//! player still listed as waiting raises thumbs. Anything else means wait.

use anyhow::Result;
use std::time::Duration;
use thumbs_up::{GameView, PlayerId, game::Bet};

use crate::api_client::ApiClient;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PendingAction {
    /// The game has a winner
    GameOver { winner: PlayerId },
    /// It is our turn and no bet is open
    PlaceBet,
    /// Someone else's bet is open and we still owe thumbs
    RaiseThumbs { bet: Bet },
    /// Nothing to do until the next poll
    Wait,
}

pub fn pending_action(view: &GameView, me: &PlayerId) -> PendingAction {
    if let Some(winner) = &view.winner {
        return PendingAction::GameOver {
            winner: winner.clone(),
        };
    }

    match &view.current_bet {
        None if view.is_my_turn => PendingAction::PlaceBet,
        Some(bet) if view.waiting_for_players.contains(me) => {
            PendingAction::RaiseThumbs { bet: bet.clone() }
        }
        _ => PendingAction::Wait,
    }
}

/// Decisions an automated player makes when it owes an action.
pub trait Strategy {
    /// Declared total and own raised thumbs for a new bet
    fn bet(&mut self, view: &GameView) -> (i64, i64);

    /// Thumbs to raise in answer to `bet`
    fn thumbs(&mut self, view: &GameView, bet: &Bet) -> i64;
}

/// Play until the game has a winner, polling every `interval`.
pub async fn play_until_game_over<S: Strategy>(
    client: &ApiClient,
    strategy: &mut S,
    interval: Duration,
) -> Result<PlayerId> {
    loop {
        let state = client.game_state().await?;
        match pending_action(&state.view, client.player_id()) {
            PendingAction::GameOver { winner } => return Ok(winner),
            PendingAction::PlaceBet => {
                let (bet, own_thumbs) = strategy.bet(&state.view);
                client.submit_bet(bet, own_thumbs).await?;
                client.wait_for_round_end(interval).await?;
            }
            PendingAction::RaiseThumbs { bet } => {
                let thumbs = strategy.thumbs(&state.view, &bet);
                client.submit_thumbs(thumbs).await?;
                client.wait_for_round_end(interval).await?;
            }
            PendingAction::Wait => tokio::time::sleep(interval).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thumbs_up::{GameSettings, ThumbsUpGame};

    fn id(s: &str) -> PlayerId {
        PlayerId::new(s)
    }

    fn two_player_game() -> ThumbsUpGame {
        let mut game = ThumbsUpGame::from(GameSettings::default());
        game.add_player(&id("P1")).unwrap();
        game.add_player(&id("P2")).unwrap();
        game
    }

    #[test]
    fn waiting_for_players_means_wait() {
        let mut game = ThumbsUpGame::from(GameSettings::default());
        game.add_player(&id("P1")).unwrap();
        assert_eq!(
            pending_action(&game.view(Some(&id("P1"))), &id("P1")),
            PendingAction::Wait
        );
    }

    #[test]
    fn bettor_places_bet_then_waits() {
        let mut game = two_player_game();
        assert_eq!(
            pending_action(&game.view(Some(&id("P1"))), &id("P1")),
            PendingAction::PlaceBet
        );
        assert_eq!(
            pending_action(&game.view(Some(&id("P2"))), &id("P2")),
            PendingAction::Wait
        );

        game.submit_bet(&id("P1"), 3, 1).unwrap();
        assert_eq!(
            pending_action(&game.view(Some(&id("P1"))), &id("P1")),
            PendingAction::Wait
        );
    }

    #[test]
    fn responder_raises_once() {
        let mut game = two_player_game();
        game.submit_bet(&id("P1"), 3, 1).unwrap();

        match pending_action(&game.view(Some(&id("P2"))), &id("P2")) {
            PendingAction::RaiseThumbs { bet } => {
                assert_eq!(bet.bettor, id("P1"));
                assert_eq!(bet.declared_total, 3);
            }
            other => panic!("expected RaiseThumbs, got {other:?}"),
        }

        game.submit_thumbs(&id("P2"), 1).unwrap();
        assert_eq!(
            pending_action(&game.view(Some(&id("P2"))), &id("P2")),
            PendingAction::Wait
        );
    }

    #[test]
    fn winner_ends_play_for_everyone() {
        let mut game = two_player_game();
        for _ in 0..2 {
            let bettor = game.current_turn().cloned().unwrap();
            let responder = game.players().next_after(&bettor).cloned().unwrap();
            game.submit_bet(&bettor, 0, 0).unwrap();
            game.submit_thumbs(&responder, 0).unwrap();
            game.evaluate_round().unwrap();
        }
        // P1 hit, then P2 hit: both at one thumb, P1 on turn
        game.submit_bet(&id("P1"), 0, 0).unwrap();
        game.submit_thumbs(&id("P2"), 0).unwrap();
        game.evaluate_round().unwrap();

        for player in ["P1", "P2"] {
            assert_eq!(
                pending_action(&game.view(Some(&id(player))), &id(player)),
                PendingAction::GameOver { winner: id("P1") }
            );
        }
    }
}
