//! Error types for playback coordination

use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Queue is empty
    #[error("Queue is empty")]
    EmptyQueue,

    /// Start index outside the queue
    #[error("Index {index} out of bounds for queue of {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Coordinator created outside a Tokio runtime
    #[error("No Tokio runtime available")]
    NoRuntime,

    /// Stream URL could not be resolved
    #[error("Stream resolution failed: {0}")]
    Resolution(String),

    /// Artwork could not be fetched or decoded
    #[error("Artwork error: {0}")]
    Artwork(String),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
