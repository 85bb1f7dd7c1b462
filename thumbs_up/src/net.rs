//! Networking layer for the polling protocol.
//!
//! Endpoint semantics live in [`router`] so that every transport answers the
//! same way. [`server`] is a small raw HTTP/1.1 transport over Tokio sockets
//! built on the [`request`] parser.

/// Error types for request framing and routing.
pub mod errors;

/// JSON request and response envelopes.
pub mod messages;

/// Minimal HTTP/1.1 request parser.
pub mod request;

/// Endpoint dispatch shared by all transports.
pub mod router;

/// Raw TCP transport serving one request per connection.
pub mod server;

pub use errors::RequestError;
pub use router::PLAYER_ID_HEADER;
