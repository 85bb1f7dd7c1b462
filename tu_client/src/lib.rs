//! Client side of the Thumbs Up polling protocol.
//!
//! [`api_client::ApiClient`] wraps the four game endpoints for one player.
//! [`turn`] decides from a snapshot what that player owes next and can drive
//! an automated player to the end of a game.

pub mod api_client;
pub mod turn;

pub use api_client::ApiClient;
pub use turn::{PendingAction, Strategy, pending_action, play_until_game_over};
