//! Server configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use std::net::SocketAddr;
use thumbs_up::{
    GameSettings,
    constants::{DEFAULT_MAX_RAISED_THUMBS, DEFAULT_STARTING_THUMBS, MAX_PLAYERS, MIN_PLAYERS},
};

/// Default listen address of the game endpoints
pub const DEFAULT_BIND: &str = "127.0.0.1:55556";

/// Complete server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Game endpoint bind address
    pub bind: SocketAddr,
    /// Prometheus exporter address; no exporter when unset
    pub metrics_bind: Option<SocketAddr>,
    /// Serve with the raw HTTP/1.1 transport instead of axum
    pub raw_transport: bool,
    /// Game rules configuration
    pub game: GameConfig,
}

/// Game rules configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    /// Seats at the table
    pub max_players: usize,
    /// Thumbs each player starts with
    pub starting_thumbs: u8,
    /// Largest thumb count a single player may raise
    pub max_raised_thumbs: u8,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_players: MAX_PLAYERS,
            starting_thumbs: DEFAULT_STARTING_THUMBS,
            max_raised_thumbs: DEFAULT_MAX_RAISED_THUMBS,
        }
    }
}

impl From<GameConfig> for GameSettings {
    fn from(config: GameConfig) -> Self {
        GameSettings::new(
            config.max_players,
            config.starting_thumbs,
            config.max_raised_thumbs,
        )
    }
}

/// Command-line values that take precedence over the environment
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub bind: Option<SocketAddr>,
    pub metrics_bind: Option<SocketAddr>,
    pub raw_transport: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns error if an address variable is set but does not parse
    pub fn from_env(overrides: Overrides) -> Result<Self, ConfigError> {
        let bind = match overrides.bind {
            Some(bind) => bind,
            None => parse_addr_env("SERVER_BIND")?
                .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 55556))),
        };

        let metrics_bind = match overrides.metrics_bind {
            Some(addr) => Some(addr),
            None => parse_addr_env("METRICS_BIND")?,
        };

        let raw_transport = overrides.raw_transport || parse_env_or("RAW_TRANSPORT", false);

        let defaults = GameConfig::default();
        let game = GameConfig {
            max_players: parse_env_or("GAME_MAX_PLAYERS", defaults.max_players),
            starting_thumbs: parse_env_or("GAME_STARTING_THUMBS", defaults.starting_thumbs),
            max_raised_thumbs: parse_env_or("GAME_MAX_RAISED_THUMBS", defaults.max_raised_thumbs),
        };

        Ok(ServerConfig {
            bind,
            metrics_bind,
            raw_transport,
            game,
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&self.game.max_players) {
            return Err(ConfigError::Invalid {
                var: "GAME_MAX_PLAYERS".to_string(),
                reason: format!("Must be between {MIN_PLAYERS} and {MAX_PLAYERS}"),
            });
        }

        if self.game.starting_thumbs == 0 {
            return Err(ConfigError::Invalid {
                var: "GAME_STARTING_THUMBS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.metrics_bind == Some(self.bind) {
            return Err(ConfigError::Invalid {
                var: "METRICS_BIND".to_string(),
                reason: format!("Must differ from the server bind address ({})", self.bind),
            });
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid address in {var}: {value}")]
    InvalidAddress { var: String, value: String },

    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Unset is `None`; set but unparsable is an error.
fn parse_addr_env(key: &str) -> Result<Option<SocketAddr>, ConfigError> {
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidAddress {
                var: key.to_string(),
                value,
            }),
        _ => Ok(None),
    }
}
