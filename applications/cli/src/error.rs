/// CLI error types
use nghe_client::ClientError;
use nghe_playback::PlaybackError;
use nghe_screens::ScreenError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{}", .0.user_message())]
    Client(#[from] ClientError),

    #[error("Playback error: {0}")]
    Playback(#[from] PlaybackError),

    #[error(transparent)]
    Screen(#[from] ScreenError),

    /// A screen reported an error message
    #[error("{0}")]
    Command(String),
}
