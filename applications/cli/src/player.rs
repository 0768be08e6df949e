//! Headless playback for the `play` command
//!
//! Drives the real coordinator and playlist screen against a media session
//! that plays nothing and reports the first prepared item.

use crate::config::AppConfig;
use crate::error::{CliError, Result};
use nghe_client::MusicRepository;
use nghe_core::{PlaylistId, SongId};
use nghe_playback::{
    HttpArtworkPalette, MediaDescriptor, MediaSession, PlaybackNotice, PlayerCoordinator,
    RepeatMode, Rgb, SessionEvent,
};
use nghe_screens::{PlaylistDetailScreen, RepositoryStreamResolver};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tracing::debug;

/// First item the player prepared, with its artwork color when there is one
#[derive(Debug, Clone)]
pub struct PlayOutcome {
    pub item: MediaDescriptor,
    pub color: Option<Rgb>,
}

struct HeadlessSession {
    items: mpsc::UnboundedSender<MediaDescriptor>,
}

impl MediaSession for HeadlessSession {
    fn set_item(&self, item: MediaDescriptor) {
        debug!(song_id = %item.song_id, "Item prepared");
        let _ = self.items.send(item);
    }
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

/// Queue `playlist` from `start` and wait for the first resolved item
pub async fn play_once(
    repository: Arc<dyn MusicRepository>,
    config: &AppConfig,
    playlist: PlaylistId,
    start: usize,
) -> Result<PlayOutcome> {
    let (items, mut prepared) = mpsc::unbounded_channel();
    let palette = HttpArtworkPalette::new(Duration::from_secs(config.api.timeout_secs))?;
    let player = Arc::new(PlayerCoordinator::new(
        Arc::new(HeadlessSession { items }),
        Arc::new(RepositoryStreamResolver::new(repository.clone())),
        Some(Arc::new(palette)),
        config.coordinator_config(),
    )?);
    let mut notices = player.subscribe_notices();

    let screen = PlaylistDetailScreen::new(playlist, repository, player.clone());
    screen.load().await;
    if let Some(error) = screen.state().error {
        return Err(CliError::Command(error));
    }

    screen.play_from(start);
    if let Some(error) = screen.state().error {
        return Err(CliError::Command(error));
    }

    let item = tokio::select! {
        item = prepared.recv() => {
            item.ok_or_else(|| CliError::Command("Player stopped before playback".to_string()))?
        }
        notice = notices.recv() => match notice {
            Ok(PlaybackNotice::ResolutionFailed { message, .. }) => {
                return Err(CliError::Command(message));
            }
            _ => return Err(CliError::Command("Playback did not start".to_string())),
        },
    };

    // A real session reports the transition once the item is loaded.
    let _ = player
        .event_sender()
        .send(SessionEvent::ItemTransition(Some(item.clone())));

    let has_artwork = item
        .metadata
        .artwork_url
        .as_deref()
        .is_some_and(|url| !url.trim().is_empty());
    let color = if has_artwork {
        artwork_color(&player, &mut notices, item.song_id).await
    } else {
        None
    };

    Ok(PlayOutcome { item, color })
}

/// Wait until the coordinator publishes a color for `song_id` or gives up on it
async fn artwork_color(
    player: &PlayerCoordinator,
    notices: &mut broadcast::Receiver<PlaybackNotice>,
    song_id: SongId,
) -> Option<Rgb> {
    let mut snapshot = player.subscribe();
    let failed = async {
        loop {
            match notices.recv().await {
                Ok(PlaybackNotice::ArtworkUnavailable { song_id: failed }) if failed == song_id => {
                    break;
                }
                Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    };

    tokio::select! {
        ready = snapshot.wait_for(|s| s.current_id == Some(song_id) && s.dominant_color.is_some()) => {
            ready.ok().and_then(|s| s.dominant_color)
        }
        () = failed => {
            debug!(%song_id, "No artwork color");
            None
        }
    }
}
