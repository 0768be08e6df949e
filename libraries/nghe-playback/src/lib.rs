//! Nghe - Playback Coordination
//!
//! Queue and player-state management for the Nghe client.
//!
//! This crate provides:
//! - Original/active queue orders with shuffle that pins the playing entry
//! - Repeat modes (Off, All, One) and the next/previous wrap rules
//! - Lazy stream-URL resolution guarded against stale results
//! - An observable [`PlayerSnapshot`] mirrored from media-session callbacks
//! - Dominant-color extraction from cover art
//!
//! # Architecture
//!
//! `nghe-playback` never touches audio. The media engine is reached through
//! the [`MediaSession`] trait and reports back with [`SessionEvent`]s; stream
//! URLs come from a [`StreamResolver`]. Both are supplied by the application.
//!
//! # Example: Playing a playlist
//!
//! ```rust,no_run
//! use nghe_playback::{
//!     entries_from_songs, CoordinatorConfig, MediaDescriptor, MediaSession, PlayerCoordinator,
//!     RepeatMode, Result, StreamResolver,
//! };
//! use nghe_core::SongId;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! struct Silent;
//!
//! impl MediaSession for Silent {
//!     fn set_item(&self, _item: MediaDescriptor) {}
//!     fn prepare(&self) {}
//!     fn play(&self) {}
//!     fn pause(&self) {}
//!     fn stop(&self) {}
//!     fn clear_items(&self) {}
//!     fn seek_to(&self, _position: Duration) {}
//!     fn set_shuffle_enabled(&self, _enabled: bool) {}
//!     fn set_repeat_mode(&self, _mode: RepeatMode) {}
//!     fn position(&self) -> Duration { Duration::ZERO }
//!     fn duration(&self) -> Duration { Duration::ZERO }
//!     fn is_playing(&self) -> bool { false }
//! }
//!
//! struct Cdn;
//!
//! #[async_trait::async_trait]
//! impl StreamResolver for Cdn {
//!     async fn resolve(&self, song_id: SongId) -> Result<String> {
//!         Ok(format!("https://cdn.example.com/{}.mp3", song_id))
//!     }
//! }
//!
//! # async fn run(songs: Vec<nghe_core::Song>) -> Result<()> {
//! let player = PlayerCoordinator::new(
//!     Arc::new(Silent),
//!     Arc::new(Cdn),
//!     None,
//!     CoordinatorConfig::default(),
//! )?;
//!
//! player.play_queue(entries_from_songs(&songs), 0)?;
//! player.toggle_repeat_mode();
//! player.next();
//! # Ok(())
//! # }
//! ```

mod coordinator;
mod error;
mod events;
mod palette;
mod queue;
mod session;
mod shuffle;
pub mod types;

// Public exports
pub use coordinator::PlayerCoordinator;
pub use error::{PlaybackError, Result};
pub use events::PlaybackNotice;
pub use palette::{dominant_color_from_bytes, ArtworkPalette, HttpArtworkPalette};
pub use queue::{Advance, PlaybackQueue};
pub use session::{MediaSession, SessionEvent, StreamResolver};
pub use shuffle::shuffle_with_pinned;
pub use types::{
    entries_from_songs, format_clock, CoordinatorConfig, MediaDescriptor, NowPlaying,
    PlaybackPhase, PlayerSnapshot, QueueEntry, RepeatMode, Rgb,
};
