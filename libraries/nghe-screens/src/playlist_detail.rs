//! Playlist detail screen

use crate::pager::{self, Pager};
use crate::playback::play_songs;
use nghe_client::MusicRepository;
use nghe_core::{PlaylistDetail, PlaylistId, PlaylistSummary, Song, SongId};
use nghe_playback::PlayerCoordinator;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistDetailState {
    pub is_loading: bool,
    pub playlist: Option<PlaylistDetail>,
    /// Paginated song list
    pub songs: Vec<Song>,
    /// Targets for "add to other playlist"
    pub my_playlists: Vec<PlaylistSummary>,
    pub song_to_add: Option<Song>,
    pub error: Option<String>,
}

impl Default for PlaylistDetailState {
    fn default() -> Self {
        Self {
            is_loading: true,
            playlist: None,
            songs: Vec::new(),
            my_playlists: Vec::new(),
            song_to_add: None,
            error: None,
        }
    }
}

pub struct PlaylistDetailScreen {
    playlist_id: PlaylistId,
    repository: Arc<dyn MusicRepository>,
    player: Arc<PlayerCoordinator>,
    state: watch::Sender<PlaylistDetailState>,
    pages: Mutex<Pager>,
}

impl PlaylistDetailScreen {
    pub fn new(
        playlist_id: PlaylistId,
        repository: Arc<dyn MusicRepository>,
        player: Arc<PlayerCoordinator>,
    ) -> Self {
        let (state, _) = watch::channel(PlaylistDetailState::default());
        Self {
            playlist_id,
            repository,
            player,
            state,
            pages: Mutex::new(Pager::default()),
        }
    }

    pub fn playlist_id(&self) -> PlaylistId {
        self.playlist_id
    }

    pub fn subscribe(&self) -> watch::Receiver<PlaylistDetailState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> PlaylistDetailState {
        self.state.borrow().clone()
    }

    pub fn is_last_page(&self) -> bool {
        pager::lock(&self.pages).is_last()
    }

    /// Fetch the detail, the first song page and the user's playlists
    pub async fn load(&self) {
        let first = {
            let mut pages = pager::lock(&self.pages);
            self.state.send_replace(PlaylistDetailState::default());
            pages.reset()
        };

        let id = self.playlist_id;
        let (detail, songs, mine) = tokio::join!(
            self.repository.playlist_detail(id),
            self.repository.playlist_songs(id, 0),
            self.repository.my_playlists(0)
        );

        let mut pages = pager::lock(&self.pages);
        if !pages.is_current(first) {
            debug!(playlist_id = %id, "Discarding superseded playlist load");
            return;
        }

        let mut error = None;
        let detail = detail
            .map_err(|e| {
                warn!(playlist_id = %id, error = %e, "Failed to load playlist");
                error = Some(e.user_message());
            })
            .ok();
        let songs = match songs {
            Ok(songs) => {
                pages.finish(first, songs.len());
                songs
            }
            Err(e) => {
                warn!(playlist_id = %id, error = %e, "Failed to load playlist songs");
                error.get_or_insert_with(|| e.user_message());
                Vec::new()
            }
        };
        // Only needed for the add-to-playlist sheet.
        let mine = mine.unwrap_or_else(|e| {
            debug!(error = %e, "Failed to load own playlists");
            Vec::new()
        });

        self.state.send_modify(|s| {
            s.is_loading = false;
            s.playlist = detail;
            s.songs = songs;
            s.my_playlists = mine;
            s.error = error;
        });
    }

    pub async fn load_more(&self) {
        let Some(claim) = pager::lock(&self.pages).begin_next() else {
            return;
        };
        let page = claim.page;

        let result = self.repository.playlist_songs(self.playlist_id, page).await;
        let mut pages = pager::lock(&self.pages);
        match result {
            Ok(more) => {
                if !pages.finish(claim, more.len()) {
                    debug!(page, "Discarding page loaded before reload");
                } else if !more.is_empty() {
                    self.state.send_modify(|s| s.songs.extend(more));
                }
            }
            Err(e) => {
                warn!(page, error = %e, "Failed to load more playlist songs");
                if pages.fail(claim) {
                    self.set_error(e.user_message());
                }
            }
        }
    }

    /// Queue the playlist's songs and start at `index`
    pub fn play_from(&self, index: usize) {
        let songs = self
            .state
            .borrow()
            .playlist
            .as_ref()
            .map(|p| p.songs.clone())
            .unwrap_or_default();

        if let Err(message) = play_songs(&self.player, &songs, index) {
            self.set_error(message);
        }
    }

    /// Add the selected song to another playlist
    pub async fn add_song_to_other_playlist(&self, target: PlaylistId) {
        let Some(song) = self.state.borrow().song_to_add.clone() else {
            return;
        };

        match self.repository.add_song_to_playlist(target, song.id).await {
            Ok(detail) => {
                self.state.send_modify(|s| {
                    if let Some(p) = s.my_playlists.iter_mut().find(|p| p.id == target) {
                        p.refresh_thumbnails(&detail.songs);
                    }
                    s.song_to_add = None;
                });
            }
            Err(e) => {
                warn!(%target, song_id = %song.id, error = %e, "Failed to add song");
                self.set_error(format!("Could not add song: {}", e.user_message()));
            }
        }
    }

    /// Remove a song from this playlist and drop it from the local lists
    pub async fn remove_song(&self, song_id: SongId) {
        match self
            .repository
            .remove_song_from_playlist(self.playlist_id, song_id)
            .await
        {
            Ok(()) => {
                self.state.send_modify(|s| {
                    s.songs.retain(|song| song.id != song_id);
                    if let Some(playlist) = s.playlist.as_mut() {
                        playlist.songs.retain(|song| song.id != song_id);
                    }
                });
            }
            Err(e) => {
                warn!(%song_id, error = %e, "Failed to remove song");
                self.set_error(format!("Could not remove song: {}", e.user_message()));
            }
        }
    }

    /// Flip the playlist's visibility
    pub async fn toggle_privacy(&self) {
        match self.repository.toggle_privacy(self.playlist_id).await {
            Ok(()) => {
                self.state.send_modify(|s| {
                    if let Some(playlist) = s.playlist.as_mut() {
                        playlist.is_public = !playlist.is_public;
                    }
                });
            }
            Err(e) => {
                warn!(playlist_id = %self.playlist_id, error = %e, "Failed to change visibility");
                self.set_error(e.user_message());
            }
        }
    }

    pub fn open_add_song_sheet(&self, song: Song) {
        self.state.send_modify(|s| s.song_to_add = Some(song));
    }

    pub fn close_add_song_sheet(&self) {
        self.state.send_modify(|s| s.song_to_add = None);
    }

    pub fn clear_error(&self) {
        self.state.send_modify(|s| s.error = None);
    }

    fn set_error(&self, message: String) {
        self.state.send_modify(|s| s.error = Some(message));
    }
}
