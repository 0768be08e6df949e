//! Home screen: the user's playlists and the song catalog
//!
//! Both lists are paginated. Mutations update the lists locally instead of
//! refetching; success messages go out on an mpsc channel for toasts.

use crate::pager::{self, Pager};
use crate::playback::play_songs;
use nghe_client::MusicRepository;
use nghe_core::{PlaylistId, PlaylistSummary, Song};
use nghe_playback::PlayerCoordinator;
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeState {
    pub is_loading: bool,
    pub playlists: Vec<PlaylistSummary>,
    pub songs: Vec<Song>,
    pub error: Option<String>,

    // Dialog selections
    pub create_dialog_open: bool,
    pub song_to_add: Option<Song>,
    pub playlist_to_delete: Option<PlaylistSummary>,
    pub playlist_to_rename: Option<PlaylistSummary>,
}

impl Default for HomeState {
    fn default() -> Self {
        Self {
            is_loading: true,
            playlists: Vec::new(),
            songs: Vec::new(),
            error: None,
            create_dialog_open: false,
            song_to_add: None,
            playlist_to_delete: None,
            playlist_to_rename: None,
        }
    }
}

pub struct HomeScreen {
    repository: Arc<dyn MusicRepository>,
    player: Arc<PlayerCoordinator>,
    state: watch::Sender<HomeState>,
    messages: mpsc::UnboundedSender<String>,
    playlist_pages: Mutex<Pager>,
    song_pages: Mutex<Pager>,
}

impl HomeScreen {
    /// Create the screen and the receiver for its messages
    pub fn new(
        repository: Arc<dyn MusicRepository>,
        player: Arc<PlayerCoordinator>,
    ) -> (Self, mpsc::UnboundedReceiver<String>) {
        let (state, _) = watch::channel(HomeState::default());
        let (messages, rx) = mpsc::unbounded_channel();
        let screen = Self {
            repository,
            player,
            state,
            messages,
            playlist_pages: Mutex::new(Pager::default()),
            song_pages: Mutex::new(Pager::default()),
        };
        (screen, rx)
    }

    pub fn subscribe(&self) -> watch::Receiver<HomeState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> HomeState {
        self.state.borrow().clone()
    }

    pub fn is_last_playlist_page(&self) -> bool {
        pager::lock(&self.playlist_pages).is_last()
    }

    pub fn is_last_song_page(&self) -> bool {
        pager::lock(&self.song_pages).is_last()
    }

    /// Fetch the first page of playlists and songs concurrently
    ///
    /// Pages still loading from before the refresh are discarded.
    pub async fn refresh(&self) {
        let (playlist_claim, song_claim) = {
            let mut playlist_pages = pager::lock(&self.playlist_pages);
            let mut song_pages = pager::lock(&self.song_pages);
            self.state.send_replace(HomeState::default());
            (playlist_pages.reset(), song_pages.reset())
        };

        let (playlists, songs) = tokio::join!(
            self.repository.my_playlists(playlist_claim.page),
            self.repository.all_songs(song_claim.page)
        );

        let mut playlist_pages = pager::lock(&self.playlist_pages);
        let mut song_pages = pager::lock(&self.song_pages);
        if !playlist_pages.is_current(playlist_claim) || !song_pages.is_current(song_claim) {
            debug!("Discarding superseded home refresh");
            return;
        }

        match (playlists, songs) {
            (Ok(playlists), Ok(songs)) => {
                debug!(
                    playlists = playlists.len(),
                    songs = songs.len(),
                    "Home data loaded"
                );
                playlist_pages.finish(playlist_claim, playlists.len());
                song_pages.finish(song_claim, songs.len());
                self.state.send_modify(|s| {
                    s.is_loading = false;
                    s.playlists = playlists;
                    s.songs = songs;
                });
            }
            (Err(e), _) | (_, Err(e)) => {
                warn!(error = %e, "Failed to load home data");
                self.state.send_modify(|s| {
                    s.is_loading = false;
                    s.error = Some(e.user_message());
                });
            }
        }
    }

    pub async fn load_more_playlists(&self) {
        let Some(claim) = pager::lock(&self.playlist_pages).begin_next() else {
            return;
        };
        let page = claim.page;

        let result = self.repository.my_playlists(page).await;
        let mut pages = pager::lock(&self.playlist_pages);
        match result {
            Ok(more) => {
                if !pages.finish(claim, more.len()) {
                    debug!(page, "Discarding playlist page loaded before refresh");
                } else if !more.is_empty() {
                    self.state.send_modify(|s| s.playlists.extend(more));
                }
            }
            Err(e) => {
                warn!(page, error = %e, "Failed to load more playlists");
                pages.fail(claim);
            }
        }
    }

    pub async fn load_more_songs(&self) {
        let Some(claim) = pager::lock(&self.song_pages).begin_next() else {
            return;
        };
        let page = claim.page;

        let result = self.repository.all_songs(page).await;
        let mut pages = pager::lock(&self.song_pages);
        match result {
            Ok(more) => {
                if !pages.finish(claim, more.len()) {
                    debug!(page, "Discarding song page loaded before refresh");
                } else if !more.is_empty() {
                    self.state.send_modify(|s| s.songs.extend(more));
                }
            }
            Err(e) => {
                warn!(page, error = %e, "Failed to load more songs");
                pages.fail(claim);
            }
        }
    }

    /// Queue the loaded catalog and start at `index`
    pub fn play_from(&self, index: usize) {
        let songs = self.state.borrow().songs.clone();
        if let Err(message) = play_songs(&self.player, &songs, index) {
            self.set_error(message);
        }
    }

    /// Create a playlist and put it at the top of the list
    pub async fn create_playlist(&self, name: &str) {
        match self.repository.create_playlist(name).await {
            Ok(created) => {
                self.state.send_modify(|s| {
                    s.playlists.insert(0, created);
                    s.create_dialog_open = false;
                });
                self.notify("Playlist created".to_string());
            }
            Err(e) => {
                warn!(error = %e, "Failed to create playlist");
                self.set_error(format!("Could not create playlist: {}", e.user_message()));
            }
        }
    }

    /// Add the selected song to `playlist_id`
    ///
    /// The target's thumbnails are recomputed from the returned detail.
    pub async fn add_song_to_playlist(&self, playlist_id: PlaylistId) {
        let Some(song) = self.state.borrow().song_to_add.clone() else {
            return;
        };

        match self
            .repository
            .add_song_to_playlist(playlist_id, song.id)
            .await
        {
            Ok(detail) => {
                self.state.send_modify(|s| {
                    if let Some(playlist) = s.playlists.iter_mut().find(|p| p.id == playlist_id) {
                        playlist.refresh_thumbnails(&detail.songs);
                    }
                    s.song_to_add = None;
                });
                self.notify("Song added to playlist".to_string());
            }
            Err(e) => {
                warn!(%playlist_id, song_id = %song.id, error = %e, "Failed to add song");
                self.set_error(e.user_message());
            }
        }
    }

    /// Delete the playlist selected in the delete dialog
    pub async fn delete_playlist(&self) {
        let Some(playlist) = self.state.borrow().playlist_to_delete.clone() else {
            return;
        };

        let result = self.repository.delete_playlist(playlist.id).await;
        self.state.send_modify(|s| s.playlist_to_delete = None);

        match result {
            Ok(()) => {
                self.state
                    .send_modify(|s| s.playlists.retain(|p| p.id != playlist.id));
                self.notify(format!("Deleted playlist: {}", playlist.name));
            }
            Err(e) => {
                warn!(playlist_id = %playlist.id, error = %e, "Failed to delete playlist");
                self.set_error(format!("Could not delete playlist: {}", e.user_message()));
            }
        }
    }

    /// Rename the playlist selected in the rename dialog
    pub async fn rename_playlist(&self, new_name: &str) {
        let Some(playlist) = self.state.borrow().playlist_to_rename.clone() else {
            return;
        };

        let result = self.repository.rename_playlist(playlist.id, new_name).await;
        self.state.send_modify(|s| s.playlist_to_rename = None);

        match result {
            Ok(()) => {
                self.state.send_modify(|s| {
                    if let Some(p) = s.playlists.iter_mut().find(|p| p.id == playlist.id) {
                        p.name = new_name.to_string();
                    }
                });
                self.notify(format!("Renamed to: {}", new_name));
            }
            Err(e) => {
                warn!(playlist_id = %playlist.id, error = %e, "Failed to rename playlist");
                self.set_error(format!("Could not rename playlist: {}", e.user_message()));
            }
        }
    }

    // Dialogs

    pub fn open_create_dialog(&self) {
        self.state.send_modify(|s| s.create_dialog_open = true);
    }

    pub fn close_create_dialog(&self) {
        self.state.send_modify(|s| s.create_dialog_open = false);
    }

    pub fn open_add_song_sheet(&self, song: Song) {
        self.state.send_modify(|s| s.song_to_add = Some(song));
    }

    pub fn close_add_song_sheet(&self) {
        self.state.send_modify(|s| s.song_to_add = None);
    }

    pub fn open_delete_dialog(&self, playlist: PlaylistSummary) {
        self.state.send_modify(|s| s.playlist_to_delete = Some(playlist));
    }

    pub fn close_delete_dialog(&self) {
        self.state.send_modify(|s| s.playlist_to_delete = None);
    }

    pub fn open_rename_dialog(&self, playlist: PlaylistSummary) {
        self.state.send_modify(|s| s.playlist_to_rename = Some(playlist));
    }

    pub fn close_rename_dialog(&self) {
        self.state.send_modify(|s| s.playlist_to_rename = None);
    }

    pub fn clear_error(&self) {
        self.state.send_modify(|s| s.error = None);
    }

    fn set_error(&self, message: String) {
        self.state.send_modify(|s| s.error = Some(message));
    }

    fn notify(&self, message: String) {
        // The receiver may be gone if the screen is being torn down.
        let _ = self.messages.send(message);
    }
}
