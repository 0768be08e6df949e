//! Playback notices
//!
//! Transient, non-blocking signals for the UI. The snapshot never carries
//! these; a screen that wants to show a toast subscribes to the broadcast.

use nghe_core::SongId;
use serde::{Deserialize, Serialize};

/// Notices emitted by the coordinator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackNotice {
    /// Stream URL lookup failed for the entry being activated
    ResolutionFailed {
        /// Song whose stream could not be resolved
        song_id: SongId,
        /// Human-readable reason
        message: String,
    },

    /// Advanced past the last entry without repeat
    QueueEnded,

    /// Cover art could not be fetched or decoded; no color will follow
    ArtworkUnavailable {
        /// Song whose artwork failed
        song_id: SongId,
    },
}
