//! Network error types for request framing and routing.

use thiserror::Error;

/// Errors that can occur while reading or routing an HTTP request
#[derive(Debug, Error)]
pub enum RequestError {
    /// Socket error while reading the request
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Peer closed the connection before a full request arrived
    #[error("connection closed mid-request")]
    ConnectionClosed,

    /// Buffer ends before the blank line or before the declared body length
    #[error("incomplete request")]
    Incomplete,

    /// Nothing before the first line break
    #[error("missing request line")]
    MissingStartLine,

    /// Start line is not `METHOD PATH VERSION`
    #[error("malformed request line: {0}")]
    MalformedStartLine(String),

    /// Header line without a `:` separator
    #[error("malformed header line: {0}")]
    MalformedHeader(String),

    /// Content-Length is not a number
    #[error("invalid Content-Length: {0}")]
    InvalidContentLength(String),

    /// Head or body exceeded the allowed size
    #[error("request size {actual} exceeds maximum {max}")]
    TooLarge { actual: usize, max: usize },

    /// Request head or body is not valid UTF-8 where text is required
    #[error("request is not valid UTF-8")]
    InvalidEncoding,

    /// A required header is absent or empty
    #[error("missing {0} header")]
    MissingHeader(&'static str),

    /// A header is present but its value is unusable
    #[error("invalid {name} header: {reason}")]
    InvalidHeader { name: &'static str, reason: String },

    /// Body could not be decoded as the expected JSON payload
    #[error("invalid JSON body: {0}")]
    InvalidBody(#[from] serde_json::Error),

    /// No route for this path
    #[error("unknown path: {0}")]
    NotFound(String),

    /// Path exists but not for this method
    #[error("method {method} not allowed for {path}")]
    MethodNotAllowed { method: String, path: String },
}

impl RequestError {
    /// HTTP status code to answer this error with
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::MethodNotAllowed { .. } => 405,
            Self::TooLarge { .. } => 413,
            _ => 400,
        }
    }
}

/// Result type for request operations
pub type Result<T> = std::result::Result<T, RequestError>;
