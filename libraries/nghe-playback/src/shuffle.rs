//! Shuffle for queue randomization

use crate::types::QueueEntry;
use rand::seq::SliceRandom;
use rand::Rng;

/// Random permutation of `entries` with the entry at `pinned` moved to the front
///
/// The pinned entry is removed, the remainder shuffled (Fisher-Yates), and the
/// pinned entry reinserted at position 0. With no pinned entry the whole list
/// is shuffled.
pub fn shuffle_with_pinned<R: Rng + ?Sized>(
    entries: &[QueueEntry],
    pinned: Option<usize>,
    rng: &mut R,
) -> Vec<QueueEntry> {
    let mut shuffled = entries.to_vec();

    match pinned.filter(|&i| i < shuffled.len()) {
        Some(index) => {
            let front = shuffled.remove(index);
            shuffled.shuffle(rng);
            shuffled.insert(0, front);
        }
        None => shuffled.shuffle(rng),
    }

    shuffled
}
