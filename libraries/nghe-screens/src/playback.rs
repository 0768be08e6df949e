//! Starting playback from a visible song list

use nghe_core::Song;
use nghe_playback::{entries_from_songs, PlayerCoordinator};
use tracing::warn;

/// Shown when playback is requested for an empty song list
pub const NO_SONGS_MESSAGE: &str = "No songs to play";

/// Queue `songs` and start at `index`, returning the message to show on failure
pub(crate) fn play_songs(
    player: &PlayerCoordinator,
    songs: &[Song],
    index: usize,
) -> Result<(), String> {
    if songs.is_empty() {
        return Err(NO_SONGS_MESSAGE.to_string());
    }

    player
        .play_queue(entries_from_songs(songs), index)
        .map_err(|e| {
            warn!(index, len = songs.len(), error = %e, "Failed to start playback");
            e.to_string()
        })
}
