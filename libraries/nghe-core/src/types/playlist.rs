/// Playlist domain types
use crate::types::{null_as_default, PlaylistId, Song};
use serde::{Deserialize, Serialize};

/// Maximum number of cover URLs shown on a playlist card
pub const MAX_THUMBNAILS: usize = 4;

/// Playlist as listed on the home screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistSummary {
    /// Server-side identifier
    pub id: PlaylistId,

    /// Playlist name
    pub name: String,

    /// Username of the owner
    pub owner_username: String,

    /// Whether other users can see the playlist
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_public: bool,

    /// Up to four cover URLs for the card grid
    #[serde(default, deserialize_with = "null_as_default")]
    pub thumbnails: Vec<String>,
}

impl PlaylistSummary {
    /// Replace the thumbnails with the view derived from `songs`
    pub fn refresh_thumbnails(&mut self, songs: &[Song]) {
        self.thumbnails = thumbnails_from_songs(songs);
    }
}

/// Playlist with its songs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistDetail {
    /// Server-side identifier
    pub id: PlaylistId,

    /// Playlist name
    pub name: String,

    /// Username of the owner
    pub owner_username: String,

    /// Whether other users can see the playlist
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_public: bool,

    /// Songs in playlist order
    #[serde(default, deserialize_with = "null_as_default")]
    pub songs: Vec<Song>,
}

impl PlaylistDetail {
    /// Cover URLs derived from the song list
    pub fn thumbnails(&self) -> Vec<String> {
        thumbnails_from_songs(&self.songs)
    }

    /// Summary view of this playlist
    pub fn summary(&self) -> PlaylistSummary {
        PlaylistSummary {
            id: self.id,
            name: self.name.clone(),
            owner_username: self.owner_username.clone(),
            is_public: self.is_public,
            thumbnails: self.thumbnails(),
        }
    }
}

/// Derive playlist card thumbnails from an authoritative song list
///
/// Takes the first [`MAX_THUMBNAILS`] songs that have a cover, in playlist order.
pub fn thumbnails_from_songs(songs: &[Song]) -> Vec<String> {
    songs
        .iter()
        .filter_map(Song::cover_art)
        .take(MAX_THUMBNAILS)
        .map(str::to_owned)
        .collect()
}
