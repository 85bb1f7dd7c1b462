//! Table module serializing all access to a game through an async actor.
//!
//! This module implements:
//! - TableActor: Tokio task owning a single `ThumbsUpGame`
//! - TableHandle: cloneable sender used by request handlers
//! - Message-based communication with mpsc inbox and oneshot replies
//!
//! ## Example
//!
//! ```no_run
//! use thumbs_up::game::{GameSettings, PlayerId};
//! use thumbs_up::table::TableActor;
//!
//! # async fn example() -> Result<(), thumbs_up::game::GameError> {
//! let table = TableActor::spawn(GameSettings::default());
//! table.join(PlayerId::new("alice")).await?;
//! let view = table.view(Some(PlayerId::new("alice"))).await?;
//! assert!(!view.game_started);
//! # Ok(())
//! # }
//! ```

pub mod actor;
pub mod messages;

pub use actor::{TableActor, TableHandle};
pub use messages::{JoinReceipt, TableMessage};
