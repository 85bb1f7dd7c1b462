//! Thumbs Up game server.
//!
//! Serves one game table over HTTP polling. The library half exposes the
//! router and ambient setup so integration tests can drive the server
//! in-process.

pub mod api;
pub mod config;
pub mod logging;
pub mod metrics;
