//! Structured logging configuration.
//!
//! Installs a `tracing` subscriber for the server. Records emitted by the
//! game library through the `log` facade are forwarded into the same
//! subscriber.

use thumbs_up::{PlayerId, RoundOutcome};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize structured logging
///
/// Levels are configurable via the `RUST_LOG` env var and default to
/// `info,hyper=warn`.
///
/// # Example
///
/// ```no_run
/// use tu_server::logging;
///
/// logging::init();
/// tracing::info!("Server starting");
/// ```
pub fn init() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,hyper=warn"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!("Structured logging initialized");
}

/// Log a player joining or being turned away
pub fn log_join(player_id: &PlayerId, accepted: bool, message: Option<&str>) {
    if accepted {
        tracing::info!(player_id = %player_id, "Player joined");
    } else {
        tracing::warn!(player_id = %player_id, reason = message, "Join rejected");
    }
}

/// Log a rejected game action
pub fn log_rejected_action(action: &str, player_id: &PlayerId, message: Option<&str>) {
    tracing::debug!(
        action = action,
        player_id = %player_id,
        reason = message,
        "Action rejected"
    );
}

/// Log a closed round with its outcome
pub fn log_round(round: &RoundOutcome) {
    match round.winner() {
        Some(winner) => tracing::info!(
            bettor = %round.bettor,
            declared_total = round.declared_total,
            total_thumbs = round.total_thumbs,
            winner = %winner,
            "Game over"
        ),
        None => tracing::info!(
            bettor = %round.bettor,
            declared_total = round.declared_total,
            total_thumbs = round.total_thumbs,
            hit = round.is_correct(),
            next_turn = round.next_turn().map(|p| p.as_str()),
            "Round closed"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thumbs_up::game::RoundResult;

    #[test]
    fn test_log_helpers_without_subscriber() {
        let p1 = PlayerId::new("P1");
        log_join(&p1, true, None);
        log_join(&p1, false, Some("game is full"));
        log_rejected_action("submit_bet", &p1, Some("not your turn"));
        log_round(&RoundOutcome {
            bettor: p1.clone(),
            declared_total: 2,
            total_thumbs: 2,
            result: RoundResult::NextTurn(PlayerId::new("P2")),
        });
        log_round(&RoundOutcome {
            bettor: p1.clone(),
            declared_total: 0,
            total_thumbs: 0,
            result: RoundResult::Winner(p1),
        });
    }
}
