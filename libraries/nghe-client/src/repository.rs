//! Data repository: the one surface screens talk to.

use crate::client::ApiClient;
use crate::error::Result;
use async_trait::async_trait;
use nghe_core::{PlaylistDetail, PlaylistId, PlaylistSummary, SearchResults, Song, SongId, User};
use std::sync::Arc;

/// Everything the app can ask of the streaming server.
///
/// Pages are zero-based; the page size is fixed by the implementation.
#[async_trait]
pub trait MusicRepository: Send + Sync {
    /// Log in and persist the token.
    async fn login(&self, username: &str, password: &str) -> Result<()>;

    async fn register(&self, username: &str, email: &str, password: &str) -> Result<User>;

    /// Forget the local session.
    async fn logout(&self) -> Result<()>;

    async fn my_playlists(&self, page: u32) -> Result<Vec<PlaylistSummary>>;

    async fn all_songs(&self, page: u32) -> Result<Vec<Song>>;

    async fn playlist_detail(&self, id: PlaylistId) -> Result<PlaylistDetail>;

    async fn playlist_songs(&self, id: PlaylistId, page: u32) -> Result<Vec<Song>>;

    async fn create_playlist(&self, name: &str) -> Result<PlaylistSummary>;

    async fn rename_playlist(&self, id: PlaylistId, name: &str) -> Result<()>;

    async fn delete_playlist(&self, id: PlaylistId) -> Result<()>;

    /// Add a song and return the playlist as the server now sees it.
    async fn add_song_to_playlist(&self, playlist: PlaylistId, song: SongId)
        -> Result<PlaylistDetail>;

    async fn remove_song_from_playlist(&self, playlist: PlaylistId, song: SongId) -> Result<()>;

    async fn toggle_privacy(&self, id: PlaylistId) -> Result<()>;

    async fn search(&self, query: &str) -> Result<SearchResults>;

    /// Resolve the audio URL for a song. Never cached.
    async fn song_stream_url(&self, song: SongId) -> Result<String>;
}

/// [`MusicRepository`] backed by the REST API.
#[derive(Clone)]
pub struct ApiRepository {
    client: Arc<ApiClient>,
}

impl ApiRepository {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }
}

#[async_trait]
impl MusicRepository for ApiRepository {
    async fn login(&self, username: &str, password: &str) -> Result<()> {
        self.client.auth().login(username, password).await
    }

    async fn register(&self, username: &str, email: &str, password: &str) -> Result<User> {
        self.client.auth().register(username, email, password).await
    }

    async fn logout(&self) -> Result<()> {
        self.client.auth().logout().await
    }

    async fn my_playlists(&self, page: u32) -> Result<Vec<PlaylistSummary>> {
        self.client.playlists().my_playlists(page).await
    }

    async fn all_songs(&self, page: u32) -> Result<Vec<Song>> {
        self.client.library().all_songs(page).await
    }

    async fn playlist_detail(&self, id: PlaylistId) -> Result<PlaylistDetail> {
        self.client.playlists().detail(id).await
    }

    async fn playlist_songs(&self, id: PlaylistId, page: u32) -> Result<Vec<Song>> {
        self.client.playlists().songs(id, page).await
    }

    async fn create_playlist(&self, name: &str) -> Result<PlaylistSummary> {
        self.client.playlists().create(name).await
    }

    async fn rename_playlist(&self, id: PlaylistId, name: &str) -> Result<()> {
        self.client.playlists().rename(id, name).await
    }

    async fn delete_playlist(&self, id: PlaylistId) -> Result<()> {
        self.client.playlists().delete(id).await
    }

    async fn add_song_to_playlist(
        &self,
        playlist: PlaylistId,
        song: SongId,
    ) -> Result<PlaylistDetail> {
        self.client.playlists().add_song(playlist, song).await
    }

    async fn remove_song_from_playlist(&self, playlist: PlaylistId, song: SongId) -> Result<()> {
        self.client.playlists().remove_song(playlist, song).await
    }

    async fn toggle_privacy(&self, id: PlaylistId) -> Result<()> {
        self.client.playlists().toggle_privacy(id).await
    }

    async fn search(&self, query: &str) -> Result<SearchResults> {
        self.client.library().search(query).await
    }

    async fn song_stream_url(&self, song: SongId) -> Result<String> {
        self.client.library().stream_url(song).await
    }
}
