//! Shared fakes for screen tests

use async_trait::async_trait;
use nghe_client::{ClientError, MusicRepository, Result};
use nghe_core::{PlaylistDetail, PlaylistId, PlaylistSummary, SearchResults, Song, SongId, User};
use nghe_playback::{CoordinatorConfig, MediaDescriptor, MediaSession, PlayerCoordinator, RepeatMode};
use nghe_screens::RepositoryStreamResolver;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn song(id: i64) -> Song {
    Song {
        id: SongId::new(id),
        title: format!("Song {}", id),
        duration_seconds: 200,
        artist_name: "Artist".to_string(),
        cover_art_url: Some(format!("https://img.test/{}.jpg", id)),
    }
}

pub fn playlist(id: i64, name: &str) -> PlaylistSummary {
    PlaylistSummary {
        id: PlaylistId::new(id),
        name: name.to_string(),
        owner_username: "alice".to_string(),
        is_public: false,
        thumbnails: Vec::new(),
    }
}

pub fn detail(id: i64, songs: Vec<Song>) -> PlaylistDetail {
    PlaylistDetail {
        id: PlaylistId::new(id),
        name: format!("Playlist {}", id),
        owner_username: "alice".to_string(),
        is_public: false,
        songs,
    }
}

/// In-memory repository with paged fixtures and per-operation failures
#[derive(Default)]
pub struct FakeRepository {
    pub playlist_pages: Mutex<Vec<Vec<PlaylistSummary>>>,
    pub song_pages: Mutex<Vec<Vec<Song>>>,
    pub playlist_song_pages: Mutex<Vec<Vec<Song>>>,
    pub details: Mutex<HashMap<PlaylistId, PlaylistDetail>>,
    pub search_results: Mutex<SearchResults>,
    failures: Mutex<HashMap<&'static str, String>>,
    delays: Mutex<HashMap<String, Duration>>,
    calls: Mutex<Vec<String>>,
}

impl FakeRepository {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make `operation` fail with a validation message
    pub fn fail(&self, operation: &'static str, message: &str) {
        self.failures
            .lock()
            .unwrap()
            .insert(operation, message.to_string());
    }

    /// Hold the response to `call` (e.g. `"all_songs:1"`) for `delay`
    pub fn delay(&self, call: &str, delay: Duration) {
        self.delays.lock().unwrap().insert(call.to_string(), delay);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    fn record(&self, operation: &'static str, call: String) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        match self.failures.lock().unwrap().get(operation) {
            Some(message) => Err(ClientError::Validation(message.clone())),
            None => Ok(()),
        }
    }

    async fn wait(&self, call: &str) {
        let delay = self.delays.lock().unwrap().get(call).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    fn page<T: Clone>(pages: &Mutex<Vec<Vec<T>>>, page: u32) -> Vec<T> {
        pages
            .lock()
            .unwrap()
            .get(page as usize)
            .cloned()
            .unwrap_or_default()
    }

    fn find_song(&self, id: SongId) -> Song {
        self.song_pages
            .lock()
            .unwrap()
            .iter()
            .flatten()
            .find(|s| s.id == id)
            .cloned()
            .unwrap_or_else(|| song(id.get()))
    }
}

#[async_trait]
impl MusicRepository for FakeRepository {
    async fn login(&self, username: &str, _password: &str) -> Result<()> {
        self.record("login", format!("login:{}", username))
    }

    async fn register(&self, username: &str, email: &str, _password: &str) -> Result<User> {
        self.record("register", format!("register:{}", username))?;
        Ok(User {
            id: 1,
            username: username.to_string(),
            email: Some(email.to_string()),
        })
    }

    async fn logout(&self) -> Result<()> {
        self.record("logout", "logout".to_string())
    }

    async fn my_playlists(&self, page: u32) -> Result<Vec<PlaylistSummary>> {
        let call = format!("my_playlists:{}", page);
        self.record("my_playlists", call.clone())?;
        self.wait(&call).await;
        Ok(Self::page(&self.playlist_pages, page))
    }

    async fn all_songs(&self, page: u32) -> Result<Vec<Song>> {
        let call = format!("all_songs:{}", page);
        self.record("all_songs", call.clone())?;
        self.wait(&call).await;
        Ok(Self::page(&self.song_pages, page))
    }

    async fn playlist_detail(&self, id: PlaylistId) -> Result<PlaylistDetail> {
        self.record("playlist_detail", format!("playlist_detail:{}", id))?;
        self.details
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| ClientError::Server {
                status: 404,
                message: "Playlist not found".to_string(),
            })
    }

    async fn playlist_songs(&self, id: PlaylistId, page: u32) -> Result<Vec<Song>> {
        self.record("playlist_songs", format!("playlist_songs:{}:{}", id, page))?;
        Ok(Self::page(&self.playlist_song_pages, page))
    }

    async fn create_playlist(&self, name: &str) -> Result<PlaylistSummary> {
        self.record("create_playlist", format!("create_playlist:{}", name))?;
        Ok(playlist(100, name))
    }

    async fn rename_playlist(&self, id: PlaylistId, name: &str) -> Result<()> {
        self.record("rename_playlist", format!("rename_playlist:{}:{}", id, name))
    }

    async fn delete_playlist(&self, id: PlaylistId) -> Result<()> {
        self.record("delete_playlist", format!("delete_playlist:{}", id))
    }

    async fn add_song_to_playlist(
        &self,
        playlist: PlaylistId,
        song: SongId,
    ) -> Result<PlaylistDetail> {
        self.record("add_song_to_playlist", format!("add_song:{}:{}", playlist, song))?;
        let added = self.find_song(song);
        let mut details = self.details.lock().unwrap();
        let entry = details
            .entry(playlist)
            .or_insert_with(|| detail(playlist.get(), Vec::new()));
        entry.songs.push(added);
        Ok(entry.clone())
    }

    async fn remove_song_from_playlist(&self, playlist: PlaylistId, song: SongId) -> Result<()> {
        self.record(
            "remove_song_from_playlist",
            format!("remove_song:{}:{}", playlist, song),
        )
    }

    async fn toggle_privacy(&self, id: PlaylistId) -> Result<()> {
        self.record("toggle_privacy", format!("toggle_privacy:{}", id))
    }

    async fn search(&self, query: &str) -> Result<SearchResults> {
        self.record("search", format!("search:{}", query))?;
        Ok(self.search_results.lock().unwrap().clone())
    }

    async fn song_stream_url(&self, song: SongId) -> Result<String> {
        self.record("song_stream_url", format!("stream:{}", song))?;
        Ok(format!("https://cdn.test/{}.mp3", song))
    }
}

/// Media session that accepts every command and never plays
#[derive(Default)]
pub struct SilentSession;

impl MediaSession for SilentSession {
    fn set_item(&self, _item: MediaDescriptor) {}
    fn prepare(&self) {}
    fn play(&self) {}
    fn pause(&self) {}
    fn stop(&self) {}
    fn clear_items(&self) {}
    fn seek_to(&self, _position: Duration) {}
    fn set_shuffle_enabled(&self, _enabled: bool) {}
    fn set_repeat_mode(&self, _mode: RepeatMode) {}
    fn position(&self) -> Duration {
        Duration::ZERO
    }
    fn duration(&self) -> Duration {
        Duration::ZERO
    }
    fn is_playing(&self) -> bool {
        false
    }
}

/// Coordinator resolving streams through `repository`
pub fn player(repository: Arc<FakeRepository>) -> Arc<PlayerCoordinator> {
    let coordinator = PlayerCoordinator::new(
        Arc::new(SilentSession),
        Arc::new(RepositoryStreamResolver::new(repository)),
        None,
        CoordinatorConfig::default(),
    )
    .unwrap();
    Arc::new(coordinator)
}
