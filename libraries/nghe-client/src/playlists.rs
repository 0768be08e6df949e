//! Playlist endpoints.

use crate::client::{send_empty, send_json};
use crate::error::Result;
use crate::session::SessionStore;
use crate::types::{AddSongRequest, PlaylistNameRequest};
use nghe_core::{PlaylistDetail, PlaylistId, PlaylistSummary, Song, SongId};
use reqwest::Client;
use tracing::{debug, info};

/// Playlist client.
pub struct PlaylistClient<'a> {
    http: &'a Client,
    base_url: &'a str,
    session: &'a SessionStore,
    page_size: u32,
}

impl<'a> PlaylistClient<'a> {
    pub(crate) fn new(
        http: &'a Client,
        base_url: &'a str,
        session: &'a SessionStore,
        page_size: u32,
    ) -> Self {
        Self {
            http,
            base_url,
            session,
            page_size,
        }
    }

    fn playlist_url(&self, id: PlaylistId) -> String {
        format!("{}/api/v1/playlists/{}", self.base_url, id)
    }

    /// One page of the caller's own playlists.
    pub async fn my_playlists(&self, page: u32) -> Result<Vec<PlaylistSummary>> {
        let url = format!("{}/api/v1/playlists/my-playlists", self.base_url);
        debug!(url = %url, page, "Fetching my playlists");

        let playlists: Vec<PlaylistSummary> = send_json(
            self.http
                .get(&url)
                .query(&[("page", page), ("size", self.page_size)]),
            self.session,
            "playlist page",
        )
        .await?;

        debug!(count = playlists.len(), page, "Fetched playlists");
        Ok(playlists)
    }

    /// Playlist with its songs.
    pub async fn detail(&self, id: PlaylistId) -> Result<PlaylistDetail> {
        let url = self.playlist_url(id);
        debug!(url = %url, playlist_id = %id, "Fetching playlist detail");

        send_json(self.http.get(&url), self.session, "playlist detail").await
    }

    /// One page of a playlist's songs.
    pub async fn songs(&self, id: PlaylistId, page: u32) -> Result<Vec<Song>> {
        let url = format!("{}/songs", self.playlist_url(id));
        debug!(url = %url, playlist_id = %id, page, "Fetching playlist songs");

        send_json(
            self.http
                .get(&url)
                .query(&[("page", page), ("size", self.page_size)]),
            self.session,
            "playlist songs",
        )
        .await
    }

    pub async fn create(&self, name: &str) -> Result<PlaylistSummary> {
        let url = format!("{}/api/v1/playlists", self.base_url);
        debug!(url = %url, name = %name, "Creating playlist");

        let request = PlaylistNameRequest {
            name: name.to_string(),
        };
        let created: PlaylistSummary =
            send_json(self.http.post(&url).json(&request), self.session, "created playlist")
                .await?;

        info!(playlist_id = %created.id, name = %created.name, "Playlist created");
        Ok(created)
    }

    pub async fn rename(&self, id: PlaylistId, name: &str) -> Result<()> {
        let url = self.playlist_url(id);
        debug!(url = %url, playlist_id = %id, name = %name, "Renaming playlist");

        let request = PlaylistNameRequest {
            name: name.to_string(),
        };
        send_empty(self.http.put(&url).json(&request), self.session).await
    }

    pub async fn delete(&self, id: PlaylistId) -> Result<()> {
        let url = self.playlist_url(id);
        debug!(url = %url, playlist_id = %id, "Deleting playlist");

        send_empty(self.http.delete(&url), self.session).await?;
        info!(playlist_id = %id, "Playlist deleted");
        Ok(())
    }

    /// Append a song; the server returns the updated playlist.
    pub async fn add_song(&self, id: PlaylistId, song_id: SongId) -> Result<PlaylistDetail> {
        let url = format!("{}/songs", self.playlist_url(id));
        debug!(url = %url, playlist_id = %id, song_id = %song_id, "Adding song to playlist");

        let request = AddSongRequest { song_id };
        send_json(self.http.post(&url).json(&request), self.session, "playlist detail").await
    }

    pub async fn remove_song(&self, id: PlaylistId, song_id: SongId) -> Result<()> {
        let url = format!("{}/songs/{}", self.playlist_url(id), song_id);
        debug!(url = %url, playlist_id = %id, song_id = %song_id, "Removing song from playlist");

        send_empty(self.http.delete(&url), self.session).await
    }

    /// Flip the playlist between public and private.
    pub async fn toggle_privacy(&self, id: PlaylistId) -> Result<()> {
        let url = format!("{}/privacy", self.playlist_url(id));
        debug!(url = %url, playlist_id = %id, "Toggling playlist privacy");

        send_empty(self.http.put(&url), self.session).await
    }
}
