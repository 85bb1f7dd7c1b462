//! HTTP API for the game server.
//!
//! # Architecture
//!
//! The API is built with:
//! - **Axum**: Async web framework for HTTP
//! - **Tower**: Middleware for CORS and request ids
//! - **Actor Model**: Game state owned by a single table actor task
//!
//! # Modules
//!
//! - [`game`]: The four polling endpoints
//! - [`player_id`]: `Player-ID` header extractors
//! - [`request_id`]: Request id propagation for log correlation
//!
//! # Endpoints Overview
//!
//! ```text
//! GET  /join             - Join the game
//! GET  /game_state       - Poll the game snapshot
//! POST /submit_bet       - Open a bet {bet, own_thumbs}
//! POST /submit_thumbs    - Raise thumbs {thumbs}
//! GET  /health           - Server health status
//! ```
//!
//! Every request identifies the caller with a `Player-ID` header.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use tu_server::api::{create_router, AppState};
//! use thumbs_up::{GameSettings, TableActor};
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!
//! let state = AppState {
//!     table: TableActor::spawn(GameSettings::default()),
//! };
//! let app = create_router(state);
//!
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:55556").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # CORS
//!
//! CORS is configured permissively so browser clients on any origin can poll.

pub mod game;
pub mod player_id;
pub mod request_id;

use axum::{
    Router,
    extract::{DefaultBodyLimit, State},
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Json},
    routing::{get, post},
};
use serde_json::json;
use request_id::RequestId;
use thumbs_up::{
    TableHandle,
    messages::StatusResponse,
    net::{RequestError, request::MAX_BODY_SIZE},
    router::Route,
};
use tower_http::cors::CorsLayer;

/// Application state shared across all HTTP handlers.
///
/// Cloned per request; the table handle is a channel sender.
#[derive(Clone)]
pub struct AppState {
    pub table: TableHandle,
}

/// Create the complete API router with all endpoints and middleware.
///
/// Bodies are capped at the raw transport's [`MAX_BODY_SIZE`]. Unknown
/// paths, wrong methods and oversized bodies all answer with `ERROR`
/// envelopes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(Route::Join.path(), get(game::join))
        .route(Route::GameState.path(), get(game::game_state))
        .route(Route::SubmitBet.path(), post(game::submit_bet))
        .route(Route::SubmitThumbs.path(), post(game::submit_thumbs))
        .route("/health", get(health_check))
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint for monitoring.
///
/// Returns `200 OK` while the table actor answers, `503 Service Unavailable`
/// once it is gone.
///
/// # Example
///
/// ```bash
/// curl http://localhost:55556/health
/// # {"status":"healthy","version":"0.1.0","players":2,"phase":"awaiting_bet","timestamp":"2026-10-19T10:30:00Z"}
/// ```
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let view = state.table.view(None).await.ok();

    let status_code = if view.is_some() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = json!({
        "status": if view.is_some() { "healthy" } else { "unhealthy" },
        "version": env!("CARGO_PKG_VERSION"),
        "players": view.as_ref().map(|v| v.players.len()),
        "phase": view.as_ref().map(|v| v.phase),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (status_code, Json(response))
}

fn request_error(error: RequestError) -> (StatusCode, Json<StatusResponse>) {
    let status =
        StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::BAD_REQUEST);
    (status, Json(StatusResponse::error(error.to_string())))
}

async fn not_found(request_id: RequestId, uri: Uri) -> (StatusCode, Json<StatusResponse>) {
    tracing::debug!(request_id = %request_id.as_str(), path = %uri.path(), "Unknown path");
    request_error(RequestError::NotFound(uri.path().to_string()))
}

async fn method_not_allowed(method: Method, uri: Uri) -> (StatusCode, Json<StatusResponse>) {
    request_error(RequestError::MethodNotAllowed {
        method: method.to_string(),
        path: uri.path().to_string(),
    })
}
