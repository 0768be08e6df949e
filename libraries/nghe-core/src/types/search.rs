/// Search result type
use crate::types::{null_as_default, PlaylistSummary, Song};
use serde::{Deserialize, Serialize};

/// Combined search results
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResults {
    /// Matching songs
    #[serde(default, deserialize_with = "null_as_default")]
    pub songs: Vec<Song>,

    /// Matching playlists
    #[serde(default, deserialize_with = "null_as_default")]
    pub playlists: Vec<PlaylistSummary>,
}

impl SearchResults {
    /// True when neither songs nor playlists matched
    pub fn is_empty(&self) -> bool {
        self.songs.is_empty() && self.playlists.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_and_missing_lists_are_empty() {
        let results: SearchResults =
            serde_json::from_str(r#"{"songs": null, "playlists": null}"#).unwrap();
        assert!(results.is_empty());

        let results: SearchResults = serde_json::from_str("{}").unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn present_lists_are_kept() {
        let json = r#"{
            "songs": [{"id": 1, "title": "Intro", "durationSeconds": 95, "artistName": "Band"}],
            "playlists": null
        }"#;
        let results: SearchResults = serde_json::from_str(json).unwrap();
        assert_eq!(results.songs.len(), 1);
        assert!(results.playlists.is_empty());
    }
}
