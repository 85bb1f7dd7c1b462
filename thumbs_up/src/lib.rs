//! # Thumbs Up
//!
//! Game engine and network protocol for a small multiplayer guessing game.
//!
//! Two or three players take turns. The player on turn declares a bet, a
//! guess of how many thumbs everyone will raise in total, and raises some of
//! their own. Each other player then raises thumbs. When the total matches
//! the bet the bettor loses a thumb; the first player to run out of thumbs
//! wins. Otherwise the turn passes on in join order.
//!
//! ## Core Modules
//!
//! - [`game`]: rules, player registry and state machine
//! - [`table`]: actor that owns a game and serializes every operation on it
//! - [`net`]: JSON envelopes, request parser, router and a raw transport
//!
//! ## Example
//!
//! ```
//! use thumbs_up::{GameSettings, PlayerId, ThumbsUpGame};
//!
//! let mut game = ThumbsUpGame::from(GameSettings::default());
//! game.add_player(&PlayerId::new("P1")).unwrap();
//! game.add_player(&PlayerId::new("P2")).unwrap();
//! assert!(game.is_started());
//! ```

/// Game rules, entities and state machine.
pub mod game;
pub use game::{
    GameError, GameSettings, GameView, Phase, PlayerId, RoundOutcome, ThumbsUpGame,
    constants::{self, MAX_PLAYERS, MIN_PLAYERS},
};

/// Networking components: envelopes, parser, router and raw server.
pub mod net;
pub use net::{messages, router, server};

/// Actor owning a game.
pub mod table;
pub use table::{TableActor, TableHandle};
