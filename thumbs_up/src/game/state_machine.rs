//! Thumbs Up game state machine.
//!
//! The game moves through `WaitingForPlayers -> AwaitingBet -> AwaitingThumbs`
//! and back to `AwaitingBet` each round until a bettor loses their last
//! thumb, which ends it in `GameOver`. Every operation either succeeds or
//! returns a [`GameError`] without touching any state.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::{
    GameError,
    constants::{DEFAULT_MAX_RAISED_THUMBS, DEFAULT_STARTING_THUMBS, MAX_PLAYERS, MIN_PLAYERS},
    entities::{Bet, GameView, Phase, PlayerId, RoundOutcome, RoundResult, Submission, Thumbs},
    registry::SessionRegistry,
};

/// Game configuration settings
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct GameSettings {
    pub max_players: usize,
    pub starting_thumbs: Thumbs,
    pub max_raised_thumbs: Thumbs,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self::new(MAX_PLAYERS, DEFAULT_STARTING_THUMBS, DEFAULT_MAX_RAISED_THUMBS)
    }
}

impl GameSettings {
    #[must_use]
    pub const fn new(max_players: usize, starting_thumbs: Thumbs, max_raised_thumbs: Thumbs) -> Self {
        Self {
            max_players,
            starting_thumbs,
            max_raised_thumbs,
        }
    }
}

#[derive(Debug)]
pub struct ThumbsUpGame {
    registry: SessionRegistry,
    settings: GameSettings,
    game_started: bool,
    current_turn: Option<PlayerId>,
    current_bet: Option<Bet>,
    submissions: Vec<Submission>,
    waiting_for_players: Vec<PlayerId>,
    winner: Option<PlayerId>,
    last_round: Option<RoundOutcome>,
    rounds_played: u32,
}

impl Default for ThumbsUpGame {
    fn default() -> Self {
        GameSettings::default().into()
    }
}

impl From<GameSettings> for ThumbsUpGame {
    fn from(settings: GameSettings) -> Self {
        let capacity = settings.max_players.clamp(MIN_PLAYERS, MAX_PLAYERS);
        Self {
            registry: SessionRegistry::new(capacity, settings.starting_thumbs),
            settings,
            game_started: false,
            current_turn: None,
            current_bet: None,
            submissions: Vec::with_capacity(capacity),
            waiting_for_players: Vec::with_capacity(capacity),
            winner: None,
            last_round: None,
            rounds_played: 0,
        }
    }
}

impl ThumbsUpGame {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        if self.winner.is_some() {
            Phase::GameOver
        } else if !self.game_started {
            Phase::WaitingForPlayers
        } else if self.current_bet.is_some() {
            Phase::AwaitingThumbs
        } else {
            Phase::AwaitingBet
        }
    }

    /// Add a player to the roster. The second join starts the game with the
    /// first joiner on turn.
    pub fn add_player(&mut self, id: &PlayerId) -> Result<(), GameError> {
        let count = self.registry.join(id)?;
        info!("{id} joined ({count}/{})", self.registry.capacity());

        if count >= MIN_PLAYERS && !self.game_started {
            self.game_started = true;
            self.current_turn = self.registry.first().cloned();
            if let Some(first) = &self.current_turn {
                info!("game started, {first} bets first");
            }
        }
        Ok(())
    }

    /// Open a bet for the player on turn. Values are not range checked here.
    pub fn submit_bet(
        &mut self,
        id: &PlayerId,
        declared_total: i64,
        own_thumbs: Thumbs,
    ) -> Result<(), GameError> {
        match self.phase() {
            Phase::GameOver => return Err(GameError::GameOver),
            Phase::WaitingForPlayers => return Err(GameError::GameNotStarted),
            Phase::AwaitingThumbs => return Err(GameError::BetAlreadyOpen),
            Phase::AwaitingBet => {}
        }
        if self.current_turn.as_ref() != Some(id) {
            return Err(GameError::OutOfTurnBet);
        }

        self.current_bet = Some(Bet {
            bettor: id.clone(),
            declared_total,
            own_thumbs,
        });
        self.submissions.clear();
        self.submissions.push(Submission {
            player: id.clone(),
            thumbs: own_thumbs,
        });
        self.waiting_for_players = self.registry.others(id).cloned().collect();
        debug!(
            "{id} bet {declared_total}, waiting on {}",
            self.waiting_for_players.len()
        );
        Ok(())
    }

    /// Record a responder's raised thumbs. Each responder submits once per bet.
    pub fn submit_thumbs(&mut self, id: &PlayerId, thumbs: Thumbs) -> Result<(), GameError> {
        if self.winner.is_some() {
            return Err(GameError::GameOver);
        }
        let idx = self
            .waiting_for_players
            .iter()
            .position(|waiting| waiting == id)
            .ok_or(GameError::IneligibleThumbsSubmission)?;

        self.waiting_for_players.remove(idx);
        self.submissions.push(Submission {
            player: id.clone(),
            thumbs,
        });
        debug!("{id} raised {thumbs}");
        Ok(())
    }

    pub fn all_submitted(&self) -> bool {
        self.waiting_for_players.is_empty()
    }

    /// Close the open round once every responder has submitted.
    ///
    /// A correct bet costs the bettor a thumb; losing the last one wins the
    /// game and freezes the turn. Otherwise the turn passes to the next
    /// player in join order.
    pub fn evaluate_round(&mut self) -> Result<RoundOutcome, GameError> {
        if self.winner.is_some() {
            return Err(GameError::GameOver);
        }
        if !self.all_submitted() {
            return Err(GameError::RoundIncomplete);
        }
        let bet = self.current_bet.take().ok_or(GameError::NoOpenBet)?;

        let total_thumbs: i64 = self
            .submissions
            .iter()
            .map(|submission| i64::from(submission.thumbs))
            .sum();
        self.submissions.clear();
        self.rounds_played += 1;

        let bettor_out = total_thumbs == bet.declared_total
            && self.registry.take_thumb(&bet.bettor) == Some(0);

        let result = if bettor_out {
            self.winner = Some(bet.bettor.clone());
            RoundResult::Winner(bet.bettor.clone())
        } else {
            let next = self
                .registry
                .next_after(&bet.bettor)
                .cloned()
                .unwrap_or_else(|| bet.bettor.clone());
            self.current_turn = Some(next.clone());
            RoundResult::NextTurn(next)
        };

        let outcome = RoundOutcome {
            bettor: bet.bettor,
            declared_total: bet.declared_total,
            total_thumbs,
            result,
        };
        info!("round {}: {outcome}", self.rounds_played);
        self.last_round = Some(outcome.clone());
        Ok(outcome)
    }

    /// Snapshot of the game for `viewer`. Without a viewer nobody is on turn.
    pub fn view(&self, viewer: Option<&PlayerId>) -> GameView {
        let is_my_turn = self.winner.is_none()
            && viewer.is_some()
            && self.current_turn.as_ref() == viewer;
        GameView {
            players: self.registry.thumb_counts(),
            current_turn: self.current_turn.clone(),
            current_bet: self.current_bet.clone(),
            is_my_turn,
            winner: self.winner.clone(),
            waiting_for_players: self.waiting_for_players.clone(),
            phase: self.phase(),
            game_started: self.game_started,
            last_round: self.last_round.clone(),
        }
    }

    pub fn is_started(&self) -> bool {
        self.game_started
    }

    pub fn current_turn(&self) -> Option<&PlayerId> {
        self.current_turn.as_ref()
    }

    pub fn current_bet(&self) -> Option<&Bet> {
        self.current_bet.as_ref()
    }

    pub fn submissions(&self) -> &[Submission] {
        &self.submissions
    }

    pub fn waiting_for_players(&self) -> &[PlayerId] {
        &self.waiting_for_players
    }

    pub fn winner(&self) -> Option<&PlayerId> {
        self.winner.as_ref()
    }

    pub fn players(&self) -> &SessionRegistry {
        &self.registry
    }

    pub fn player_count(&self) -> usize {
        self.registry.len()
    }

    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> PlayerId {
        PlayerId::new(s)
    }

    fn game_with(ids: &[&str]) -> ThumbsUpGame {
        let mut game = ThumbsUpGame::new();
        for player in ids {
            game.add_player(&id(player)).unwrap();
        }
        game
    }

    /// Run a round where every responder raises `thumbs`.
    fn play_round(
        game: &mut ThumbsUpGame,
        bettor: &str,
        declared: i64,
        own: Thumbs,
        thumbs: Thumbs,
    ) -> RoundOutcome {
        game.submit_bet(&id(bettor), declared, own).unwrap();
        for responder in game.waiting_for_players().to_vec() {
            game.submit_thumbs(&responder, thumbs).unwrap();
        }
        game.evaluate_round().unwrap()
    }

    #[test]
    fn one_player_waits() {
        let game = game_with(&["P1"]);
        assert_eq!(game.phase(), Phase::WaitingForPlayers);
        assert!(!game.is_started());
        assert_eq!(game.current_turn(), None);
    }

    #[test]
    fn cannot_bet_before_game_starts() {
        let mut game = game_with(&["P1"]);
        assert_eq!(
            game.submit_bet(&id("P1"), 1, 1),
            Err(GameError::GameNotStarted)
        );
        assert_eq!(game.current_bet(), None);
    }

    #[test]
    fn second_join_starts_game_with_first_player() {
        let game = game_with(&["P1", "P2"]);
        assert!(game.is_started());
        assert_eq!(game.phase(), Phase::AwaitingBet);
        assert_eq!(game.current_turn(), Some(&id("P1")));
    }

    #[test]
    fn third_player_joins_running_game() {
        let mut game = game_with(&["P1", "P2"]);
        game.add_player(&id("P3")).unwrap();
        assert_eq!(game.current_turn(), Some(&id("P1")));
        assert_eq!(game.player_count(), 3);
    }

    #[test]
    fn scenario_a_correct_bet_costs_a_thumb() {
        let mut game = game_with(&["P1", "P2"]);
        game.submit_bet(&id("P1"), 2, 1).unwrap();
        assert_eq!(game.phase(), Phase::AwaitingThumbs);
        assert_eq!(game.waiting_for_players(), &[id("P2")]);

        game.submit_thumbs(&id("P2"), 1).unwrap();
        assert!(game.all_submitted());

        let outcome = game.evaluate_round().unwrap();
        assert!(outcome.is_correct());
        assert_eq!(outcome.total_thumbs, 2);
        assert_eq!(outcome.next_turn(), Some(&id("P2")));
        assert_eq!(game.players().remaining_thumbs(&id("P1")), Some(1));
        assert_eq!(game.current_turn(), Some(&id("P2")));
        assert_eq!(game.current_bet(), None);
        assert!(game.submissions().is_empty());
        assert_eq!(game.phase(), Phase::AwaitingBet);
    }

    #[test]
    fn scenario_b_missed_bet_wraps_turn() {
        let mut game = game_with(&["P1", "P2"]);
        play_round(&mut game, "P1", 2, 1, 1);

        let outcome = play_round(&mut game, "P2", 1, 0, 0);
        assert!(!outcome.is_correct());
        assert_eq!(outcome.total_thumbs, 0);
        assert_eq!(game.players().remaining_thumbs(&id("P2")), Some(2));
        assert_eq!(game.current_turn(), Some(&id("P1")));
        assert_eq!(game.current_bet(), None);
    }

    #[test]
    fn scenario_c_last_thumb_wins_and_freezes_game() {
        let mut game = game_with(&["P1", "P2"]);
        play_round(&mut game, "P1", 2, 1, 1);
        play_round(&mut game, "P2", 1, 0, 0);

        let outcome = play_round(&mut game, "P1", 0, 0, 0);
        assert!(outcome.is_game_over());
        assert_eq!(outcome.winner(), Some(&id("P1")));
        assert_eq!(game.winner(), Some(&id("P1")));
        assert_eq!(game.phase(), Phase::GameOver);
        assert_eq!(game.players().remaining_thumbs(&id("P1")), Some(0));
        // Turn does not advance past the winner.
        assert_eq!(game.current_turn(), Some(&id("P1")));

        assert_eq!(game.submit_bet(&id("P1"), 0, 0), Err(GameError::GameOver));
        assert_eq!(game.submit_bet(&id("P2"), 0, 0), Err(GameError::GameOver));
        assert_eq!(game.submit_thumbs(&id("P2"), 0), Err(GameError::GameOver));
        assert_eq!(game.evaluate_round(), Err(GameError::GameOver));
        assert_eq!(game.winner(), Some(&id("P1")));
    }

    #[test]
    fn scenario_d_fourth_join_is_rejected() {
        let mut game = game_with(&["P1", "P2", "P3"]);
        assert_eq!(game.add_player(&id("P4")), Err(GameError::CapacityReached));
        assert_eq!(game.player_count(), 3);
        let ids: Vec<_> = game.view(None).players.ids().cloned().collect();
        assert_eq!(ids, vec![id("P1"), id("P2"), id("P3")]);
    }

    #[test]
    fn scenario_e_out_of_turn_bet_is_rejected() {
        let mut game = game_with(&["P1", "P2"]);
        assert_eq!(
            game.submit_bet(&id("P2"), 1, 1),
            Err(GameError::OutOfTurnBet)
        );
        assert_eq!(game.current_bet(), None);
        assert_eq!(game.phase(), Phase::AwaitingBet);
    }

    #[test]
    fn second_bet_while_open_is_rejected() {
        let mut game = game_with(&["P1", "P2"]);
        game.submit_bet(&id("P1"), 2, 1).unwrap();
        assert_eq!(
            game.submit_bet(&id("P1"), 3, 2),
            Err(GameError::BetAlreadyOpen)
        );
        assert_eq!(game.current_bet().map(|bet| bet.declared_total), Some(2));
    }

    #[test]
    fn duplicate_thumbs_are_rejected() {
        let mut game = game_with(&["P1", "P2", "P3"]);
        game.submit_bet(&id("P1"), 3, 1).unwrap();
        game.submit_thumbs(&id("P2"), 1).unwrap();
        assert_eq!(
            game.submit_thumbs(&id("P2"), 2),
            Err(GameError::IneligibleThumbsSubmission)
        );
        // The bettor does not owe thumbs.
        assert_eq!(
            game.submit_thumbs(&id("P1"), 1),
            Err(GameError::IneligibleThumbsSubmission)
        );
        assert_eq!(game.submissions().len(), 2);
        assert_eq!(game.waiting_for_players(), &[id("P3")]);
    }

    #[test]
    fn thumbs_without_bet_are_rejected() {
        let mut game = game_with(&["P1", "P2"]);
        assert_eq!(
            game.submit_thumbs(&id("P2"), 1),
            Err(GameError::IneligibleThumbsSubmission)
        );
    }

    #[test]
    fn evaluate_requires_open_complete_round() {
        let mut game = game_with(&["P1", "P2"]);
        assert_eq!(game.evaluate_round(), Err(GameError::NoOpenBet));

        game.submit_bet(&id("P1"), 2, 1).unwrap();
        assert_eq!(game.evaluate_round(), Err(GameError::RoundIncomplete));
        assert!(game.current_bet().is_some());
        assert_eq!(game.rounds_played(), 0);
    }

    #[test]
    fn round_closes_exactly_once() {
        let mut game = game_with(&["P1", "P2"]);
        play_round(&mut game, "P1", 5, 1, 1);
        assert_eq!(game.evaluate_round(), Err(GameError::NoOpenBet));
        assert_eq!(game.rounds_played(), 1);
    }

    #[test]
    fn late_joiner_does_not_owe_thumbs_for_open_bet() {
        let mut game = game_with(&["P1", "P2"]);
        game.submit_bet(&id("P1"), 1, 0).unwrap();
        game.add_player(&id("P3")).unwrap();
        assert_eq!(game.waiting_for_players(), &[id("P2")]);
        assert_eq!(
            game.submit_thumbs(&id("P3"), 1),
            Err(GameError::IneligibleThumbsSubmission)
        );

        game.submit_thumbs(&id("P2"), 0).unwrap();
        let outcome = game.evaluate_round().unwrap();
        assert_eq!(outcome.next_turn(), Some(&id("P2")));

        play_round(&mut game, "P2", 9, 0, 0);
        assert_eq!(game.current_turn(), Some(&id("P3")));
    }

    #[test]
    fn turns_cycle_through_three_players() {
        let mut game = game_with(&["P1", "P2", "P3"]);
        let mut order = Vec::new();
        for _ in 0..6 {
            let bettor = game.current_turn().cloned().unwrap();
            order.push(bettor.to_string());
            play_round(&mut game, bettor.as_str(), 99, 0, 0);
        }
        assert_eq!(order, vec!["P1", "P2", "P3", "P1", "P2", "P3"]);
    }

    #[test]
    fn view_reports_turn_per_viewer() {
        let mut game = game_with(&["P1", "P2"]);
        game.submit_bet(&id("P1"), 2, 1).unwrap();

        let mine = game.view(Some(&id("P1")));
        assert!(mine.is_my_turn);
        assert_eq!(mine.phase, Phase::AwaitingThumbs);
        assert_eq!(mine.waiting_for_players, vec![id("P2")]);

        let theirs = game.view(Some(&id("P2")));
        assert!(!theirs.is_my_turn);
        assert!(!game.view(None).is_my_turn);
    }

    #[test]
    fn view_after_game_over() {
        let mut game = ThumbsUpGame::from(GameSettings::new(3, 1, 2));
        game.add_player(&id("P1")).unwrap();
        game.add_player(&id("P2")).unwrap();
        play_round(&mut game, "P1", 1, 1, 0);

        let view = game.view(Some(&id("P1")));
        assert_eq!(view.winner, Some(id("P1")));
        assert!(!view.is_my_turn);
        assert_eq!(view.current_bet, None);
        assert!(view.last_round.is_some_and(|round| round.is_game_over()));
    }

    #[test]
    fn settings_clamp_capacity() {
        let game = ThumbsUpGame::from(GameSettings::new(10, 2, 2));
        assert_eq!(game.players().capacity(), MAX_PLAYERS);
    }
}
