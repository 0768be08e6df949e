//! Error types for the Nghe API client.

use thiserror::Error;

/// Fallback shown when a 400 response carries no readable `message`.
pub const INVALID_REQUEST_MESSAGE: &str = "invalid request";

/// Errors that can occur when talking to the streaming server.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Connection, timeout or other transport failure
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Server rejected the session (401/403); the logout broadcast has already fired
    #[error("Session rejected by server ({status})")]
    Unauthorized { status: u16 },

    /// HTTP 400 with the server's explanation
    #[error("{0}")]
    Validation(String),

    /// Any other non-success status
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// The stream endpoint did not answer with a usable redirect
    #[error(transparent)]
    StreamResolution(#[from] StreamResolutionError),

    /// Response body did not match the expected shape
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Invalid server URL
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// Client configuration rejected
    #[error("Invalid client configuration: {0}")]
    Config(String),

    /// Token storage could not be read or written
    #[error("Token storage error: {0}")]
    Storage(String),
}

/// Ways the stream-URL redirect can go wrong.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StreamResolutionError {
    /// 3xx without a usable `Location` header
    #[error("Stream location header is empty")]
    EmptyLocation,

    /// The server answered without redirecting
    #[error("Server did not redirect to the stream (status {status})")]
    NotRedirect { status: u16 },
}

impl ClientError {
    /// Message suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Unauthorized { .. } => "Your session has expired, please log in again".to_string(),
            Self::Transport(e) if e.is_timeout() => "The server took too long to respond".to_string(),
            Self::Transport(e) if e.is_connect() => "Cannot reach the server".to_string(),
            Self::Server { status, message } if message.trim().is_empty() => {
                format!("Server error ({})", status)
            }
            other => other.to_string(),
        }
    }

    /// True when the error came from a rejected session.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
