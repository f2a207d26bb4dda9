//! Result and error types for the core library
//!
//! The variants map the failure taxonomy the workflows care about:
//! validation errors never reach the network, transport and parse errors are
//! recovered at the operation boundary, and server-reported failures carry
//! the backend's message through verbatim.

use thiserror::Error;

/// Core library error type
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or invalid input, caught before any network call
    #[error("Validation error: {0}")]
    Validation(String),

    /// Network unreachable, DNS failure, timeout
    #[error("Network error: {0}")]
    Transport(String),

    /// Malformed or unexpected response shape
    #[error("Invalid response from server")]
    InvalidResponse,

    /// Well-formed business-rule rejection; message is the server's, unmodified
    #[error("{0}")]
    Server(String),

    /// Operation requires a live authenticated session
    #[error("No active session")]
    NoSession,

    /// The same state machine already has an operation in flight
    #[error("Another operation is already in progress")]
    Busy,

    /// Camera acquisition or snapshot failure
    #[error("Capture error: {0}")]
    Capture(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a server-reported error, falling back to a generic message
    /// when the payload carried none
    pub fn server(msg: Option<String>, fallback: &str) -> Self {
        Self::Server(msg.unwrap_or_else(|| fallback.to_string()))
    }

    /// Create a capture error
    pub fn capture(msg: impl Into<String>) -> Self {
        Self::Capture(msg.into())
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;
