//! Search screen with debounced queries
//!
//! Each keystroke aborts the pending search and schedules a new one after the
//! debounce delay, so only the last query of a burst reaches the server.

use crate::error::{Result, ScreenError};
use crate::playback::play_songs;
use nghe_client::MusicRepository;
use nghe_core::{PlaylistSummary, Song};
use nghe_playback::PlayerCoordinator;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    pub query: String,
    pub is_loading: bool,
    pub songs: Vec<Song>,
    pub playlists: Vec<PlaylistSummary>,
    pub error: Option<String>,
}

pub struct SearchScreen {
    repository: Arc<dyn MusicRepository>,
    player: Arc<PlayerCoordinator>,
    state: Arc<watch::Sender<SearchState>>,
    pending: Mutex<Option<JoinHandle<()>>>,
    debounce: Duration,
    runtime: Handle,
}

impl SearchScreen {
    /// Must be called from within a Tokio runtime.
    pub fn new(
        repository: Arc<dyn MusicRepository>,
        player: Arc<PlayerCoordinator>,
        debounce: Duration,
    ) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|_| ScreenError::NoRuntime)?;
        let (state, _) = watch::channel(SearchState::default());
        Ok(Self {
            repository,
            player,
            state: Arc::new(state),
            pending: Mutex::new(None),
            debounce,
            runtime,
        })
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> SearchState {
        self.state.borrow().clone()
    }

    /// Record the query and schedule a search; a blank query resets the results
    pub fn on_query_change(&self, query: &str) {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(task) = pending.take() {
            task.abort();
        }

        if query.trim().is_empty() {
            self.state.send_replace(SearchState {
                query: query.to_string(),
                ..SearchState::default()
            });
            return;
        }

        self.state.send_modify(|s| s.query = query.to_string());

        let repository = self.repository.clone();
        let state = self.state.clone();
        let debounce = self.debounce;
        let query = query.to_string();

        *pending = Some(self.runtime.spawn(async move {
            tokio::time::sleep(debounce).await;
            state.send_modify(|s| s.is_loading = true);

            debug!(query = %query, "Searching");
            let next = match repository.search(&query).await {
                Ok(results) => SearchState {
                    query,
                    is_loading: false,
                    songs: results.songs,
                    playlists: results.playlists,
                    error: None,
                },
                Err(e) => {
                    warn!(error = %e, "Search failed");
                    SearchState {
                        query,
                        error: Some(e.user_message()),
                        ..SearchState::default()
                    }
                }
            };
            state.send_replace(next);
        }));
    }

    pub fn clear_query(&self) {
        self.on_query_change("");
    }

    /// Queue the matching songs and start at `index`
    pub fn play_from(&self, index: usize) {
        let songs = self.state.borrow().songs.clone();
        if let Err(message) = play_songs(&self.player, &songs, index) {
            self.state.send_modify(|s| s.error = Some(message));
        }
    }
}

impl Drop for SearchScreen {
    fn drop(&mut self) {
        let pending = self.pending.get_mut().unwrap_or_else(|e| e.into_inner());
        if let Some(task) = pending.take() {
            task.abort();
        }
    }
}
