//! Song catalog, search and streaming endpoints.

use crate::client::{authorized, error_from_response, send_json};
use crate::error::{Result, StreamResolutionError};
use crate::session::SessionStore;
use nghe_core::{SearchResults, Song, SongId};
use reqwest::header::LOCATION;
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

/// Library client.
pub struct LibraryClient<'a> {
    http: &'a Client,
    base_url: &'a str,
    session: &'a SessionStore,
    page_size: u32,
}

impl<'a> LibraryClient<'a> {
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

    /// One page of the full song catalog (pages start at 0).
    pub async fn all_songs(&self, page: u32) -> Result<Vec<Song>> {
        let url = format!("{}/api/v1/songs", self.base_url);
        debug!(url = %url, page, "Fetching songs");

        let songs: Vec<Song> = send_json(
            self.http
                .get(&url)
                .query(&[("page", page), ("size", self.page_size)]),
            self.session,
            "song page",
        )
        .await?;

        debug!(count = songs.len(), page, "Fetched songs");
        Ok(songs)
    }

    /// Search songs and playlists.
    pub async fn search(&self, query: &str) -> Result<SearchResults> {
        let url = format!("{}/api/v1/songs/search", self.base_url);
        debug!(url = %url, query = %query, "Searching");

        let results: SearchResults = send_json(
            self.http.get(&url).query(&[("q", query)]),
            self.session,
            "search results",
        )
        .await?;

        debug!(
            songs = results.songs.len(),
            playlists = results.playlists.len(),
            "Search complete"
        );
        Ok(results)
    }

    /// Resolve the audio URL for a song.
    ///
    /// The server answers with a redirect whose `Location` is the audio file.
    /// Redirects are not followed, so a 3xx is the only success.
    pub async fn stream_url(&self, song_id: SongId) -> Result<String> {
        let url = format!("{}/api/v1/songs/stream/{}", self.base_url, song_id);
        debug!(url = %url, song_id = %song_id, "Resolving stream URL");

        let response = authorized(self.http.get(&url), self.session).send().await?;
        let status = response.status();

        if status.is_redirection() {
            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_owned);

            return match location {
                Some(location) => {
                    debug!(song_id = %song_id, "Stream URL resolved");
                    Ok(location)
                }
                None => {
                    warn!(song_id = %song_id, status = %status, "Redirect without location");
                    Err(StreamResolutionError::EmptyLocation.into())
                }
            };
        }

        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            // Still a failed resolution for the caller; the session is torn down as a side effect.
            let _ = error_from_response(response, self.session).await;
        } else {
            warn!(song_id = %song_id, status = %status, "Stream endpoint did not redirect");
        }

        Err(StreamResolutionError::NotRedirect {
            status: status.as_u16(),
        }
        .into())
    }
}
