//! Media session abstraction
//!
//! The media engine (decoding, buffering, audio output, system media
//! controls) lives outside this crate. The coordinator drives it through
//! [`MediaSession`] and hears back through [`SessionEvent`]s pushed into the
//! coordinator's event channel.

use crate::error::Result;
use crate::types::{MediaDescriptor, NowPlaying, RepeatMode};
use async_trait::async_trait;
use nghe_core::SongId;
use std::time::Duration;

/// Commands and queries the coordinator issues to the media engine
///
/// Calls are synchronous and must not block; implementations queue work
/// onto their own thread or event loop.
pub trait MediaSession: Send + Sync {
    /// Replace the session's item
    fn set_item(&self, item: MediaDescriptor);

    /// Start buffering the current item
    fn prepare(&self);

    fn play(&self);

    fn pause(&self);

    fn stop(&self);

    /// Remove all items
    fn clear_items(&self);

    fn seek_to(&self, position: Duration);

    fn set_shuffle_enabled(&self, enabled: bool);

    fn set_repeat_mode(&self, mode: RepeatMode);

    /// Position within the current item
    fn position(&self) -> Duration;

    /// Length of the current item, zero while unknown
    fn duration(&self) -> Duration;

    fn is_playing(&self) -> bool;
}

/// Callbacks from the media engine, plus transport commands from system controls
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Audio started or stopped
    IsPlayingChanged(bool),

    /// Metadata of the current item changed
    MetadataChanged(NowPlaying),

    /// The session moved to a different item (or to none)
    ItemTransition(Option<MediaDescriptor>),

    /// Session-side shuffle flag changed
    ShuffleChanged(bool),

    /// Session-side repeat mode changed
    RepeatChanged(RepeatMode),

    /// Current item played to its natural end
    PlaybackEnded,

    /// "Next" pressed on a notification or headset
    RemoteNext,

    /// "Previous" pressed on a notification or headset
    RemotePrevious,
}

/// Looks up the streaming URL for a song
#[async_trait]
pub trait StreamResolver: Send + Sync {
    async fn resolve(&self, song_id: SongId) -> Result<String>;
}
