//! Session registry mapping caller-supplied ids to game membership.
//!
//! Players join once and are never removed. Join order is the turn order.

use super::{
    GameError,
    entities::{Player, PlayerId, ThumbCounts, Thumbs},
};

#[derive(Clone, Debug)]
pub struct SessionRegistry {
    players: Vec<Player>,
    capacity: usize,
    starting_thumbs: Thumbs,
}

impl SessionRegistry {
    #[must_use]
    pub fn new(capacity: usize, starting_thumbs: Thumbs) -> Self {
        Self {
            players: Vec::with_capacity(capacity),
            capacity,
            starting_thumbs,
        }
    }

    /// Register a player, returning the roster size after the join.
    pub fn join(&mut self, id: &PlayerId) -> Result<usize, GameError> {
        if self.contains(id) {
            return Err(GameError::AlreadyJoined);
        }
        if self.is_full() {
            return Err(GameError::CapacityReached);
        }
        self.players.push(Player {
            id: id.clone(),
            remaining_thumbs: self.starting_thumbs,
        });
        Ok(self.players.len())
    }

    pub fn contains(&self, id: &PlayerId) -> bool {
        self.position(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.players.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn first(&self) -> Option<&PlayerId> {
        self.players.first().map(|player| &player.id)
    }

    /// The player after `id` in join order, wrapping around.
    pub fn next_after(&self, id: &PlayerId) -> Option<&PlayerId> {
        let idx = self.position(id)?;
        let next = (idx + 1) % self.players.len();
        Some(&self.players[next].id)
    }

    /// Everyone except `id`, in join order.
    pub fn others<'a>(&'a self, id: &'a PlayerId) -> impl Iterator<Item = &'a PlayerId> + 'a {
        self.players
            .iter()
            .map(|player| &player.id)
            .filter(move |other| *other != id)
    }

    pub fn remaining_thumbs(&self, id: &PlayerId) -> Option<Thumbs> {
        self.position(id)
            .map(|idx| self.players[idx].remaining_thumbs)
    }

    /// Take one thumb from a player, returning what they have left.
    pub(super) fn take_thumb(&mut self, id: &PlayerId) -> Option<Thumbs> {
        let idx = self.position(id)?;
        let player = &mut self.players[idx];
        player.remaining_thumbs = player.remaining_thumbs.saturating_sub(1);
        Some(player.remaining_thumbs)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.iter()
    }

    pub fn thumb_counts(&self) -> ThumbCounts {
        ThumbCounts(self.players.clone())
    }

    fn position(&self, id: &PlayerId) -> Option<usize> {
        self.players.iter().position(|player| &player.id == id)
    }
}
