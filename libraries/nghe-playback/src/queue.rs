//! Playback queue: original order, active order and current position

use crate::error::{PlaybackError, Result};
use crate::shuffle::shuffle_with_pinned;
use crate::types::{QueueEntry, RepeatMode};
use rand::Rng;
use std::sync::Arc;

/// Where an advance request lands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Activate the entry at this active-order index
    Activate(usize),

    /// Past the end without repeat: stop
    End,
}

/// Queue with an original order and an active (possibly shuffled) order
///
/// While unshuffled both orders are the same allocation. Shuffling builds a
/// new permutation with the current entry at index 0; unshuffling restores
/// the original allocation.
#[derive(Debug, Clone)]
pub struct PlaybackQueue {
    original: Arc<[QueueEntry]>,
    active: Arc<[QueueEntry]>,
    current: Option<usize>,
    shuffled: bool,
}

impl Default for PlaybackQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackQueue {
    /// Create new empty queue
    pub fn new() -> Self {
        let empty: Arc<[QueueEntry]> = Arc::from(Vec::new());
        Self {
            original: empty.clone(),
            active: empty,
            current: None,
            shuffled: false,
        }
    }

    /// Replace the queue
    ///
    /// Slots are renumbered to match the given order. When `shuffle` is set the
    /// entry at `start` is pinned at the front of a fresh permutation and the
    /// current index becomes 0; otherwise it becomes `start`.
    pub fn load<R: Rng + ?Sized>(
        &mut self,
        mut entries: Vec<QueueEntry>,
        start: usize,
        shuffle: bool,
        rng: &mut R,
    ) -> Result<()> {
        if entries.is_empty() {
            return Err(PlaybackError::EmptyQueue);
        }
        if start >= entries.len() {
            return Err(PlaybackError::IndexOutOfBounds {
                index: start,
                len: entries.len(),
            });
        }

        for (slot, entry) in entries.iter_mut().enumerate() {
            entry.slot = slot;
        }

        self.original = Arc::from(entries);
        if shuffle {
            self.active = Arc::from(shuffle_with_pinned(&self.original, Some(start), rng));
            self.current = Some(0);
        } else {
            self.active = self.original.clone();
            self.current = Some(start);
        }
        self.shuffled = shuffle;
        Ok(())
    }

    /// Shuffle the active order, keeping the current entry playing at index 0
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let pinned = self.current_entry().map(|e| e.slot);
        self.active = Arc::from(shuffle_with_pinned(&self.original, pinned, rng));
        if !self.active.is_empty() {
            self.current = Some(0);
        }
        self.shuffled = true;
    }

    /// Restore the original order and find the current entry in it
    pub fn unshuffle(&mut self) {
        let slot = self.current_entry().map(|e| e.slot);
        self.active = self.original.clone();
        self.shuffled = false;

        if !self.active.is_empty() {
            let index = slot
                .and_then(|s| self.original.iter().position(|e| e.slot == s))
                .unwrap_or(0);
            self.current = Some(index);
        }
    }

    /// Drop everything
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// Check if queue is empty
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn is_shuffled(&self) -> bool {
        self.shuffled
    }

    /// Index into the active order, `None` when nothing is loaded
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_entry(&self) -> Option<&QueueEntry> {
        self.current.and_then(|i| self.active.get(i))
    }

    pub fn get(&self, index: usize) -> Option<&QueueEntry> {
        self.active.get(index)
    }

    /// Set the current index; ignored when out of range
    pub fn set_current(&mut self, index: usize) {
        if index < self.active.len() {
            self.current = Some(index);
        }
    }

    /// Order entries are played in
    pub fn active(&self) -> &Arc<[QueueEntry]> {
        &self.active
    }

    /// Order the queue was loaded in
    pub fn original(&self) -> &Arc<[QueueEntry]> {
        &self.original
    }

    /// Resolve a requested index: negatives clamp to 0, past-the-end wraps
    /// under repeat-all and otherwise ends.
    pub fn target(&self, index: isize, repeat: RepeatMode) -> Advance {
        let index = usize::try_from(index).unwrap_or(0);
        if index < self.len() {
            Advance::Activate(index)
        } else if repeat == RepeatMode::All && !self.is_empty() {
            Advance::Activate(0)
        } else {
            Advance::End
        }
    }

    /// Target of `next`: wraps only under repeat-all
    pub fn next_target(&self, repeat: RepeatMode) -> Option<Advance> {
        let current = self.current?;
        Some(self.target(current as isize + 1, repeat))
    }

    /// Target of `previous`: always wraps to the last entry
    pub fn previous_target(&self) -> Option<usize> {
        let current = self.current?;
        if self.is_empty() {
            return None;
        }
        Some(if current == 0 { self.len() - 1 } else { current - 1 })
    }
}
