//! Nghe CLI Library
//!
//! Command-line client for a Nghe streaming server: session handling,
//! catalog browsing, playlist management and headless stream resolution.
//!
//! This library exposes the command layer for testing purposes.

pub mod commands;
pub mod config;
pub mod error;
pub mod player;

pub use commands::{execute, Command};
pub use config::AppConfig;
pub use error::{CliError, Result};

use nghe_client::{ApiClient, ApiRepository, FileTokenStorage, SessionStore};
use std::sync::Arc;
use tracing::debug;

/// Load the stored session, connect, and run `command`
pub async fn run(command: Command, config: &AppConfig) -> Result<String> {
    let storage = Arc::new(FileTokenStorage::new(&config.session.token_path));
    let session = Arc::new(SessionStore::load(storage, config.session_load_timeout()).await);
    debug!(
        authenticated = session.is_authenticated(),
        base_url = %config.api.base_url,
        "Session loaded"
    );

    let client = Arc::new(ApiClient::new(config.client_config(), session)?);
    let repository = Arc::new(ApiRepository::new(client));
    execute(command, repository, config).await
}
