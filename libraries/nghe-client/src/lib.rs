//! Nghe API Client
//!
//! HTTP client, auth session and data repository for the Nghe streaming server.
//!
//! # Features
//!
//! - **Authentication**: login/register, token persisted through [`TokenStorage`]
//! - **Session**: synchronous token access and a logout broadcast on 401/403
//! - **Library**: paged catalog, search, redirect-based stream URLs
//! - **Playlists**: paged listing, detail, create/rename/delete, song membership, privacy
//! - **Repository**: [`MusicRepository`], the async surface screens depend on
//!
//! # Example
//!
//! ```ignore
//! use nghe_client::{ApiClient, ApiRepository, ClientConfig, FileTokenStorage, MusicRepository, SessionStore};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let storage = Arc::new(FileTokenStorage::new("./data/session.json"));
//!     let session = Arc::new(SessionStore::load(storage, nghe_client::DEFAULT_LOAD_TIMEOUT).await);
//!
//!     let client = ApiClient::new(ClientConfig::new("https://music.example.com"), session)?;
//!     let repo = ApiRepository::new(Arc::new(client));
//!
//!     repo.login("an", "secret").await?;
//!     for playlist in repo.my_playlists(0).await? {
//!         println!("{} ({})", playlist.name, playlist.owner_username);
//!     }
//!
//!     Ok(())
//! }
//! ```

mod auth;
mod client;
mod error;
mod library;
mod playlists;
mod repository;
mod session;
mod storage;
mod types;

pub use client::ApiClient;
pub use error::{ClientError, Result, StreamResolutionError, INVALID_REQUEST_MESSAGE};
pub use repository::{ApiRepository, MusicRepository};
pub use session::{LogoutEvent, SessionStore, DEFAULT_LOAD_TIMEOUT};
pub use storage::{FileTokenStorage, MemoryTokenStorage, TokenStorage};
pub use types::{
    AddSongRequest, ClientConfig, LoginRequest, LoginResponse, PlaylistNameRequest,
    RegisterRequest, DEFAULT_PAGE_SIZE,
};

// Re-export sub-clients for direct use if needed
pub use auth::AuthClient;
pub use library::LibraryClient;
pub use playlists::PlaylistClient;
