//! Types for Nghe API requests and client configuration.

use nghe_core::SongId;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default number of items per page.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Configuration for connecting to the streaming server.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the server (e.g., "https://music.example.com")
    pub base_url: String,
    /// Whole-request timeout
    pub timeout: Duration,
    /// TCP connect timeout
    pub connect_timeout: Duration,
    /// Items requested per page
    pub page_size: u32,
}

impl ClientConfig {
    /// Create a config with default timeouts and page size.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Override the page size.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

// =============================================================================
// Authentication Types
// =============================================================================

/// Request body for the login endpoint.
#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub pass: String,
}

/// Response from a successful login.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Request body for the register endpoint.
#[derive(Debug, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub pass: String,
}

// =============================================================================
// Playlist Types
// =============================================================================

/// Request body for creating or renaming a playlist.
#[derive(Debug, Serialize)]
pub struct PlaylistNameRequest {
    pub name: String,
}

/// Request body for adding a song to a playlist.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddSongRequest {
    pub song_id: SongId,
}

/// Error body returned alongside HTTP 400.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: Option<String>,
}
