//! Thumbs Up game server.
//!
//! Spawns a single table actor and serves it over HTTP, either with axum or
//! with the library's raw HTTP/1.1 transport.

use anyhow::{Context, Error};
use pico_args::Arguments;
use std::net::SocketAddr;
use thumbs_up::{GameSettings, TableActor, server};
use tu_server::{
    api,
    config::{Overrides, ServerConfig},
    logging, metrics,
};

const HELP: &str = "\
Run a Thumbs Up game server

USAGE:
  tu_server [OPTIONS]

OPTIONS:
  --bind          IP:PORT  Game endpoint bind address  [default: env SERVER_BIND or 127.0.0.1:55556]
  --metrics-bind  IP:PORT  Prometheus exporter address [default: env METRICS_BIND, disabled when unset]

FLAGS:
  --raw                    Serve with the raw HTTP/1.1 transport instead of axum
  -h, --help               Print help information

ENVIRONMENT:
  SERVER_BIND              Game endpoint bind address (e.g., 0.0.0.0:55556)
  METRICS_BIND             Prometheus exporter address
  RAW_TRANSPORT            Use the raw transport (true/false)
  GAME_MAX_PLAYERS         Seats at the table (2-3)
  GAME_STARTING_THUMBS     Thumbs each player starts with
  GAME_MAX_RAISED_THUMBS   Largest thumb count one player may raise
  RUST_LOG                 Log filter (default: info,hyper=warn)
";

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let overrides = Overrides {
        raw_transport: pargs.contains("--raw"),
        bind: pargs
            .opt_value_from_str::<_, SocketAddr>("--bind")
            .context("Invalid --bind address")?,
        metrics_bind: pargs
            .opt_value_from_str::<_, SocketAddr>("--metrics-bind")
            .context("Invalid --metrics-bind address")?,
    };

    let remaining = pargs.finish();
    if !remaining.is_empty() {
        anyhow::bail!("Unexpected arguments: {remaining:?}\n\n{HELP}");
    }

    let config = ServerConfig::from_env(overrides)?;
    config.validate()?;

    logging::init();

    if let Some(addr) = config.metrics_bind {
        metrics::init_metrics(addr).map_err(Error::msg)?;
        tracing::info!("Prometheus metrics exported at http://{addr}/metrics");
    }

    let settings = GameSettings::from(config.game);
    let table = TableActor::spawn(settings);
    tracing::info!(
        max_players = settings.max_players,
        starting_thumbs = settings.starting_thumbs,
        max_raised_thumbs = settings.max_raised_thumbs,
        "Game table ready"
    );

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind))?;

    tracing::info!(
        "Server is running at http://{}. Press Ctrl+C to stop.",
        config.bind
    );

    if config.raw_transport {
        tokio::select! {
            result = server::run(listener, table.clone()) => {
                result.context("Raw transport error")?;
            }
            () = shutdown_signal() => {}
        }
    } else {
        let app = api::create_router(api::AppState {
            table: table.clone(),
        });
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("Server error")?;
    }

    tracing::info!("Shutting down server...");
    let _ = table.close().await;

    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install CTRL+C signal handler: {e}");
        std::future::pending::<()>().await;
    }
}
