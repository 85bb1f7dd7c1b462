use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{MapAccess, Visitor},
};
use std::{borrow::Borrow, fmt};

use super::constants;

/// Raised or remaining thumbs. A player never has more than a handful.
pub type Thumbs = u8;

/// Caller-supplied player identifier, unique within a game.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct PlayerId(String);

impl PlayerId {
    /// Trimmed id. Length is not checked; see [`PlayerId::try_new`].
    pub fn new(s: &str) -> Self {
        Self(s.trim().to_string())
    }

    /// Trimmed id, or `None` when it is longer than
    /// [`constants::MAX_PLAYER_ID_LENGTH`] characters.
    pub fn try_new(s: &str) -> Option<Self> {
        let id = Self::new(s);
        (id.0.chars().count() <= constants::MAX_PLAYER_ID_LENGTH).then_some(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for PlayerId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::new(&s))
    }
}

impl From<String> for PlayerId {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

impl From<&str> for PlayerId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl Borrow<str> for PlayerId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A joined player and the thumbs they still have to lose.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Player {
    pub id: PlayerId,
    pub remaining_thumbs: Thumbs,
}

/// The open bet of the current round.
///
/// Field names on the wire follow the polling protocol: the bettor is
/// `player` and the declared total is `bet`.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Bet {
    #[serde(rename = "player")]
    pub bettor: PlayerId,
    #[serde(rename = "bet")]
    pub declared_total: i64,
    pub own_thumbs: Thumbs,
}

/// Raised thumbs for the open bet, one per player including the bettor.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Submission {
    pub player: PlayerId,
    pub thumbs: Thumbs,
}

/// Game phases, derived from the game's fields.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    WaitingForPlayers,
    AwaitingBet,
    AwaitingThumbs,
    GameOver,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::WaitingForPlayers => "waiting for players",
            Self::AwaitingBet => "awaiting bet",
            Self::AwaitingThumbs => "awaiting thumbs",
            Self::GameOver => "game over",
        };
        write!(f, "{repr}")
    }
}

/// What a closed round led to.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", content = "player", rename_all = "snake_case")]
pub enum RoundResult {
    Winner(PlayerId),
    NextTurn(PlayerId),
}

/// Summary of an evaluated round.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct RoundOutcome {
    pub bettor: PlayerId,
    pub declared_total: i64,
    pub total_thumbs: i64,
    pub result: RoundResult,
}

impl RoundOutcome {
    pub fn is_correct(&self) -> bool {
        self.declared_total == self.total_thumbs
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self.result, RoundResult::Winner(_))
    }

    pub fn winner(&self) -> Option<&PlayerId> {
        match &self.result {
            RoundResult::Winner(winner) => Some(winner),
            RoundResult::NextTurn(_) => None,
        }
    }

    pub fn next_turn(&self) -> Option<&PlayerId> {
        match &self.result {
            RoundResult::Winner(_) => None,
            RoundResult::NextTurn(next) => Some(next),
        }
    }
}

impl fmt::Display for RoundOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verdict = if self.is_correct() { "hit" } else { "missed" };
        write!(
            f,
            "{} bet {} and {verdict} ({} raised), ",
            self.bettor, self.declared_total, self.total_thumbs
        )?;
        match &self.result {
            RoundResult::Winner(winner) => write!(f, "{winner} wins"),
            RoundResult::NextTurn(next) => write!(f, "{next} is up"),
        }
    }
}

/// Remaining thumbs per player, in join order.
///
/// Serializes as a JSON object keyed by player id. Entry order is kept in
/// both directions so clients see the turn order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ThumbCounts(pub Vec<Player>);

impl ThumbCounts {
    pub fn get(&self, id: &str) -> Option<Thumbs> {
        self.0
            .iter()
            .find(|player| player.id.as_str() == id)
            .map(|player| player.remaining_thumbs)
    }

    pub fn ids(&self) -> impl Iterator<Item = &PlayerId> {
        self.0.iter().map(|player| &player.id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for ThumbCounts {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(
            self.0
                .iter()
                .map(|player| (&player.id, player.remaining_thumbs)),
        )
    }
}

impl<'de> Deserialize<'de> for ThumbCounts {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ThumbCountsVisitor;

        impl<'de> Visitor<'de> for ThumbCountsVisitor {
            type Value = ThumbCounts;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of player ids to remaining thumbs")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut players = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((id, remaining_thumbs)) = access.next_entry::<PlayerId, Thumbs>()? {
                    players.push(Player {
                        id,
                        remaining_thumbs,
                    });
                }
                Ok(ThumbCounts(players))
            }
        }

        deserializer.deserialize_map(ThumbCountsVisitor)
    }
}

/// Snapshot of the game as seen by one poller.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct GameView {
    pub players: ThumbCounts,
    pub current_turn: Option<PlayerId>,
    pub current_bet: Option<Bet>,
    pub is_my_turn: bool,
    pub winner: Option<PlayerId>,
    pub waiting_for_players: Vec<PlayerId>,
    pub phase: Phase,
    pub game_started: bool,
    pub last_round: Option<RoundOutcome>,
}
