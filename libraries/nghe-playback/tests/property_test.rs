//! Property-based tests for the playback queue
//!
//! Uses proptest to check shuffle and navigation invariants across random
//! queues and operation sequences.

use nghe_core::SongId;
use nghe_playback::{Advance, PlaybackQueue, QueueEntry, RepeatMode};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::Duration;

// ===== Helpers =====

fn arbitrary_entry() -> impl Strategy<Value = QueueEntry> {
    (
        1i64..10_000,      // song id
        "[A-Za-z ]{1,30}", // title
        "[A-Za-z ]{1,20}", // artist
        1u64..600,         // duration (1-600 seconds)
    )
        .prop_map(|(id, title, artist, duration_secs)| QueueEntry {
            song_id: SongId::new(id),
            slot: 0,
            title,
            artist,
            artwork_url: None,
            duration: Duration::from_secs(duration_secs),
        })
}

fn arbitrary_queue() -> impl Strategy<Value = (Vec<QueueEntry>, usize)> {
    prop::collection::vec(arbitrary_entry(), 1..40)
        .prop_flat_map(|entries| {
            let len = entries.len();
            (Just(entries), 0..len)
        })
}

fn slots(entries: &[QueueEntry]) -> Vec<usize> {
    entries.iter().map(|e| e.slot).collect()
}

// ===== Property Tests =====

proptest! {
    /// Property: shuffled active order is a permutation with the start entry first
    #[test]
    fn shuffle_pins_start_and_permutes(
        (entries, start) in arbitrary_queue(),
        seed in any::<u64>()
    ) {
        let mut queue = PlaybackQueue::new();
        queue.load(entries, start, true, &mut StdRng::seed_from_u64(seed)).unwrap();

        prop_assert_eq!(queue.current_index(), Some(0));
        prop_assert_eq!(queue.active()[0].slot, start);

        let mut active = slots(queue.active());
        active.sort_unstable();
        prop_assert_eq!(active, slots(queue.original()));
    }

    /// Property: toggling shuffle off restores the original order exactly
    #[test]
    fn unshuffle_restores_original(
        (entries, start) in arbitrary_queue(),
        toggles in 1usize..6,
        seed in any::<u64>()
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut queue = PlaybackQueue::new();
        queue.load(entries, start, false, &mut rng).unwrap();
        let original = queue.original().clone();

        for _ in 0..toggles {
            queue.shuffle(&mut rng);
            queue.unshuffle();
        }

        prop_assert!(Arc::ptr_eq(queue.active(), &original));
        prop_assert_eq!(queue.current_index(), Some(start));
    }

    /// Property: the playing entry survives any shuffle toggle
    #[test]
    fn shuffle_toggle_keeps_current_entry(
        (entries, start) in arbitrary_queue(),
        moves in prop::collection::vec(0u8..4, 0..30),
        seed in any::<u64>()
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut queue = PlaybackQueue::new();
        queue.load(entries, start, false, &mut rng).unwrap();

        for op in moves {
            let before = queue.current_entry().map(|e| e.slot);
            match op {
                0 => queue.shuffle(&mut rng),
                1 => queue.unshuffle(),
                2 => {
                    if let Some(Advance::Activate(i)) = queue.next_target(RepeatMode::All) {
                        queue.set_current(i);
                    }
                    continue;
                }
                _ => {
                    if let Some(i) = queue.previous_target() {
                        queue.set_current(i);
                    }
                    continue;
                }
            }
            prop_assert_eq!(queue.current_entry().map(|e| e.slot), before);
        }
    }

    /// Property: `len` nexts under repeat-all return to the starting entry
    #[test]
    fn repeat_all_cycles_back((entries, start) in arbitrary_queue()) {
        let mut queue = PlaybackQueue::new();
        queue.load(entries, start, false, &mut StdRng::seed_from_u64(0)).unwrap();
        let len = queue.len();

        for _ in 0..len {
            match queue.next_target(RepeatMode::All) {
                Some(Advance::Activate(i)) => queue.set_current(i),
                other => prop_assert!(false, "unexpected target {:?}", other),
            }
        }

        prop_assert_eq!(queue.current_index(), Some(start));
    }

    /// Property: previous always lands inside the queue, wrapping from 0
    #[test]
    fn previous_always_wraps((entries, start) in arbitrary_queue()) {
        let mut queue = PlaybackQueue::new();
        queue.load(entries, start, false, &mut StdRng::seed_from_u64(0)).unwrap();

        let target = queue.previous_target().unwrap();
        prop_assert!(target < queue.len());
        if start == 0 {
            prop_assert_eq!(target, queue.len() - 1);
        } else {
            prop_assert_eq!(target, start - 1);
        }
    }
}
