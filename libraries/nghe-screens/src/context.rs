//! Application context and navigation
//!
//! Everything a screen needs is passed through [`AppContext`]; there are no
//! process-wide singletons. The logout listener ties the session's
//! [`LogoutEvent`](nghe_client::LogoutEvent) broadcast to the player and the
//! navigator.

use crate::auth::AuthScreen;
use crate::error::{Result, ScreenError};
use crate::home::HomeScreen;
use crate::playlist_detail::PlaylistDetailScreen;
use crate::search::SearchScreen;
use async_trait::async_trait;
use nghe_client::{MusicRepository, SessionStore};
use nghe_core::{PlaylistId, SongId};
use nghe_playback::{PlaybackError, PlayerCoordinator, StreamResolver};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Search debounce used when none is configured
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Top-level destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Auth,
    Home,
    Search,
    PlaylistDetail(PlaylistId),
}

/// Observable current route
#[derive(Clone)]
pub struct Navigator {
    route: Arc<watch::Sender<Route>>,
}

impl Navigator {
    pub fn new(initial: Route) -> Self {
        let (route, _) = watch::channel(initial);
        Self {
            route: Arc::new(route),
        }
    }

    pub fn navigate(&self, route: Route) {
        debug!(?route, "Navigating");
        self.route.send_replace(route);
    }

    pub fn current(&self) -> Route {
        *self.route.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Route> {
        self.route.subscribe()
    }
}

impl std::fmt::Debug for Navigator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Navigator")
            .field("route", &self.current())
            .finish()
    }
}

/// Stream lookups backed by the repository
pub struct RepositoryStreamResolver {
    repository: Arc<dyn MusicRepository>,
}

impl RepositoryStreamResolver {
    pub fn new(repository: Arc<dyn MusicRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl StreamResolver for RepositoryStreamResolver {
    async fn resolve(&self, song_id: SongId) -> nghe_playback::Result<String> {
        self.repository
            .song_stream_url(song_id)
            .await
            .map_err(|e| PlaybackError::Resolution(e.to_string()))
    }
}

/// Shared services for every screen
#[derive(Clone)]
pub struct AppContext {
    pub repository: Arc<dyn MusicRepository>,
    pub session: Arc<SessionStore>,
    pub player: Arc<PlayerCoordinator>,
    pub navigator: Navigator,
}

impl AppContext {
    /// Build the context; the first route depends on whether a token was loaded
    pub fn new(
        repository: Arc<dyn MusicRepository>,
        session: Arc<SessionStore>,
        player: Arc<PlayerCoordinator>,
    ) -> Self {
        let initial = if session.is_authenticated() {
            Route::Home
        } else {
            Route::Auth
        };
        Self {
            repository,
            session,
            player,
            navigator: Navigator::new(initial),
        }
    }

    /// Clear the player and return to the auth screen on every forced logout
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn_logout_listener(&self) -> Result<JoinHandle<()>> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| ScreenError::NoRuntime)?;
        let mut events = self.session.subscribe_logout();
        let player = self.player.clone();
        let navigator = self.navigator.clone();

        Ok(runtime.spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => {
                        info!(status = event.status, "Session rejected, logging out");
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Logout listener lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
                player.clear_data();
                navigator.navigate(Route::Auth);
            }
        }))
    }

    /// User-initiated logout; local only
    pub async fn logout(&self) {
        if let Err(e) = self.repository.logout().await {
            warn!(error = %e, "Failed to clear stored token");
        }
        self.player.clear_data();
        self.navigator.navigate(Route::Auth);
    }

    pub fn auth_screen(&self) -> AuthScreen {
        AuthScreen::new(self.repository.clone(), self.navigator.clone())
    }

    /// Home screen plus the receiver for its user-facing messages
    pub fn home_screen(&self) -> (HomeScreen, mpsc::UnboundedReceiver<String>) {
        HomeScreen::new(self.repository.clone(), self.player.clone())
    }

    pub fn playlist_screen(&self, playlist_id: PlaylistId) -> PlaylistDetailScreen {
        PlaylistDetailScreen::new(playlist_id, self.repository.clone(), self.player.clone())
    }

    pub fn search_screen(&self, debounce: Duration) -> Result<SearchScreen> {
        SearchScreen::new(self.repository.clone(), self.player.clone(), debounce)
    }
}
