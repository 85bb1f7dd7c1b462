/// Hard cap on players at a single game table.
pub const MAX_PLAYERS: usize = 3;

/// Players needed before the first bet can be placed.
pub const MIN_PLAYERS: usize = 2;

/// Thumbs each player starts with. Losing all of them wins the game.
pub const DEFAULT_STARTING_THUMBS: u8 = 2;

/// Upper bound on thumbs a player may raise in one round.
pub const DEFAULT_MAX_RAISED_THUMBS: u8 = 2;

/// Longest accepted `Player-ID`, in characters. Longer ids are rejected.
pub const MAX_PLAYER_ID_LENGTH: usize = 32;
