//! Thumbs Up game engine.
//!
//! This module provides the rules of the game:
//! - Session registry of joined players in turn order
//! - Bet/thumbs/evaluation state machine
//! - Snapshot views for polling clients

pub mod constants;
pub mod entities;
pub mod errors;
pub mod registry;
pub mod state_machine;

pub use entities::{
    Bet, GameView, Phase, Player, PlayerId, RoundOutcome, RoundResult, Submission, ThumbCounts,
    Thumbs,
};
pub use errors::GameError;
pub use registry::SessionRegistry;
pub use state_machine::{GameSettings, ThumbsUpGame};
