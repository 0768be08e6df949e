/// Song domain type
use crate::types::SongId;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A song as returned by the catalog, search, and playlist endpoints
///
/// Songs are never mutated locally; a changed song arrives as a full replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    /// Server-side identifier
    pub id: SongId,

    /// Song title
    pub title: String,

    /// Length in whole seconds
    pub duration_seconds: u32,

    /// Display name of the artist
    pub artist_name: String,

    /// Cover art location, if the song has one
    #[serde(default)]
    pub cover_art_url: Option<String>,
}

impl Song {
    /// Song length as a `Duration`
    pub fn duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.duration_seconds))
    }

    /// Cover art URL, ignoring blank values sent by the server
    pub fn cover_art(&self) -> Option<&str> {
        self.cover_art_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}
