use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScreenError {
    /// Screens that schedule background work need a Tokio runtime
    #[error("No Tokio runtime available")]
    NoRuntime,

    #[error("Playback error: {0}")]
    Playback(#[from] nghe_playback::PlaybackError),
}

pub type Result<T> = std::result::Result<T, ScreenError>;
