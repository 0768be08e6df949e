//! Core types for playback coordination

use nghe_core::{Song, SongId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Display metadata for the item in the session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NowPlaying {
    /// Song title
    pub title: String,

    /// Artist name
    pub artist: String,

    /// Cover art location (optional)
    pub artwork_url: Option<String>,
}

/// A song placed in the playback queue
///
/// Entries carry metadata only. The streaming URI is resolved when the
/// entry becomes active and bound into a [`MediaDescriptor`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEntry {
    /// Stable id used to resolve the stream and to track the current item
    pub song_id: SongId,

    /// Position in the original (unshuffled) order
    pub slot: usize,

    /// Song title
    pub title: String,

    /// Artist name
    pub artist: String,

    /// Cover art location (optional)
    pub artwork_url: Option<String>,

    /// Length reported by the catalog
    pub duration: Duration,
}

impl QueueEntry {
    /// Build an entry from a catalog song
    pub fn from_song(song: &Song, slot: usize) -> Self {
        Self {
            song_id: song.id,
            slot,
            title: song.title.clone(),
            artist: song.artist_name.clone(),
            artwork_url: song.cover_art().map(str::to_owned),
            duration: song.duration(),
        }
    }

    /// Display metadata for this entry
    pub fn now_playing(&self) -> NowPlaying {
        NowPlaying {
            title: self.title.clone(),
            artist: self.artist.clone(),
            artwork_url: self.artwork_url.clone(),
        }
    }

    /// Attach a resolved streaming URI
    pub fn bind(&self, uri: impl Into<String>) -> MediaDescriptor {
        MediaDescriptor {
            song_id: self.song_id,
            uri: uri.into(),
            metadata: self.now_playing(),
        }
    }
}

/// Build queue entries from songs, numbering slots in order
pub fn entries_from_songs(songs: &[Song]) -> Vec<QueueEntry> {
    songs
        .iter()
        .enumerate()
        .map(|(slot, song)| QueueEntry::from_song(song, slot))
        .collect()
}

/// A playable item handed to the media session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaDescriptor {
    /// Stable id of the song
    pub song_id: SongId,

    /// Resolved streaming URI
    pub uri: String,

    /// Display metadata
    pub metadata: NowPlaying,
}

/// Repeat mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RepeatMode {
    /// Stop when queue ends
    #[default]
    Off,

    /// Loop entire queue
    All,

    /// Loop current track only
    One,
}

impl RepeatMode {
    /// Next mode in the Off → All → One → Off cycle
    pub fn next(self) -> Self {
        match self {
            Self::Off => Self::All,
            Self::All => Self::One,
            Self::One => Self::Off,
        }
    }
}

/// Coordinator phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaybackPhase {
    /// No queue loaded
    #[default]
    Idle,

    /// Resolving or preparing the active entry
    Loading,

    /// Session reports audio playing
    Playing,

    /// Paused mid-track
    Paused,

    /// Advanced past the last entry without repeat
    Ended,
}

/// Color derived from cover art, used for theming
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Observable player state
///
/// Written only by the coordinator; observers read it through a
/// `tokio::sync::watch` receiver.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    /// Metadata of the item in the session
    pub now_playing: Option<NowPlaying>,

    /// Session reports audio playing
    pub is_playing: bool,

    /// Shuffle enabled
    pub shuffle: bool,

    /// Repeat mode
    pub repeat: RepeatMode,

    /// Position within the current item
    pub position: Duration,

    /// Length of the current item (zero while unknown)
    pub duration: Duration,

    /// Stable id of the current item
    pub current_id: Option<SongId>,

    /// Theming color from the current artwork
    pub dominant_color: Option<Rgb>,

    /// Coordinator phase
    pub phase: PlaybackPhase,
}

impl PlayerSnapshot {
    /// Playback progress in 0.0..=1.0, zero while the duration is unknown
    pub fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            return 0.0;
        }
        (self.position.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }
}

/// Configuration for the coordinator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinatorConfig {
    /// Position poll interval while playing (default: 500ms)
    pub poll_interval: Duration,

    /// Wait after a track change before reading the duration (default: 50ms)
    pub duration_settle: Duration,

    /// Capacity of the notice broadcast channel (default: 16)
    pub notice_capacity: usize,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(500),
            duration_settle: Duration::from_millis(50),
            notice_capacity: 16,
        }
    }
}

/// Format a position as `mm:ss`
///
/// Minutes are not wrapped at an hour.
pub fn format_clock(position: Duration) -> String {
    let total = position.as_secs();
    format!("{:02}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song(id: i64) -> Song {
        Song {
            id: SongId::new(id),
            title: format!("Song {}", id),
            duration_seconds: 125,
            artist_name: "Artist".to_string(),
            cover_art_url: Some(" ".to_string()),
        }
    }

    #[test]
    fn default_config() {
        let config = CoordinatorConfig::default();
        assert_eq!(config.poll_interval, Duration::from_millis(500));
        assert_eq!(config.duration_settle, Duration::from_millis(50));
    }

    #[test]
    fn repeat_mode_cycles() {
        assert_eq!(RepeatMode::Off.next(), RepeatMode::All);
        assert_eq!(RepeatMode::All.next(), RepeatMode::One);
        assert_eq!(RepeatMode::One.next(), RepeatMode::Off);
    }

    #[test]
    fn entries_are_numbered_by_slot() {
        let entries = entries_from_songs(&[song(10), song(20), song(30)]);
        let slots: Vec<usize> = entries.iter().map(|e| e.slot).collect();
        assert_eq!(slots, vec![0, 1, 2]);
        assert_eq!(entries[1].song_id, SongId::new(20));
        assert_eq!(entries[0].duration, Duration::from_secs(125));
        assert_eq!(entries[0].artwork_url, None);
    }

    #[test]
    fn bind_keeps_metadata() {
        let entry = QueueEntry::from_song(&song(4), 0);
        let item = entry.bind("https://cdn.example.com/4.mp3");
        assert_eq!(item.song_id, SongId::new(4));
        assert_eq!(item.metadata.title, "Song 4");
    }

    #[test]
    fn clock_formatting() {
        assert_eq!(format_clock(Duration::ZERO), "00:00");
        assert_eq!(format_clock(Duration::from_millis(65_900)), "01:05");
        assert_eq!(format_clock(Duration::from_secs(3725)), "62:05");
    }

    #[test]
    fn snapshot_progress() {
        let mut snapshot = PlayerSnapshot::default();
        assert_eq!(snapshot.progress(), 0.0);

        snapshot.duration = Duration::from_secs(200);
        snapshot.position = Duration::from_secs(50);
        assert!((snapshot.progress() - 0.25).abs() < f32::EPSILON);
    }

    #[test]
    fn rgb_hex() {
        assert_eq!(Rgb::new(255, 87, 51).to_string(), "#FF5733");
    }
}
