//! Player coordinator
//!
//! Owns the queue, current index, shuffle and repeat policy. Resolves stream
//! URLs lazily when an entry becomes active, drives the [`MediaSession`], and
//! mirrors session callbacks into a [`PlayerSnapshot`].
//!
//! # Activation
//!
//! Every activation bumps a generation counter. The stream lookup runs as a
//! spawned task; when it finishes the result is applied only if the
//! generation is still current, so a slow lookup can never replace a newer
//! selection in the session.

use crate::error::{PlaybackError, Result};
use crate::events::PlaybackNotice;
use crate::palette::ArtworkPalette;
use crate::queue::{Advance, PlaybackQueue};
use crate::session::{MediaSession, SessionEvent, StreamResolver};
use crate::types::{
    CoordinatorConfig, MediaDescriptor, PlaybackPhase, PlayerSnapshot, QueueEntry, RepeatMode,
};
use nghe_core::SongId;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use tokio::runtime::Handle;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Shuffle values sent to the session whose echoes have not arrived yet
const MAX_PENDING_ECHOES: usize = 8;

struct State {
    queue: PlaybackQueue,
    shuffle: bool,
    repeat: RepeatMode,
    generation: u64,
    /// Phase to fall back to when a lookup fails; never `Loading`
    settled_phase: PlaybackPhase,
    shuffle_echoes: VecDeque<bool>,
}

struct Inner {
    state: Mutex<State>,
    snapshot: watch::Sender<PlayerSnapshot>,
    notices: broadcast::Sender<PlaybackNotice>,
    session: Arc<dyn MediaSession>,
    resolver: Arc<dyn StreamResolver>,
    palette: Option<Arc<dyn ArtworkPalette>>,
    config: CoordinatorConfig,
    runtime: Handle,
}

/// Queue coordinator over an external media session
///
/// All commands are synchronous and return immediately; stream lookups and
/// snapshot updates happen on the Tokio runtime the coordinator was created on.
///
/// # Example
///
/// ```ignore
/// let coordinator = PlayerCoordinator::new(session, resolver, None, CoordinatorConfig::default())?;
/// coordinator.play_queue(entries_from_songs(&songs), 0)?;
///
/// let mut snapshot = coordinator.subscribe();
/// while snapshot.changed().await.is_ok() {
///     println!("{:?}", snapshot.borrow().now_playing);
/// }
/// ```
pub struct PlayerCoordinator {
    inner: Arc<Inner>,
    events: mpsc::UnboundedSender<SessionEvent>,
    tasks: Vec<JoinHandle<()>>,
}

impl PlayerCoordinator {
    /// Create a coordinator and start its event and position-poll tasks
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(
        session: Arc<dyn MediaSession>,
        resolver: Arc<dyn StreamResolver>,
        palette: Option<Arc<dyn ArtworkPalette>>,
        config: CoordinatorConfig,
    ) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|_| PlaybackError::NoRuntime)?;

        let (snapshot, _) = watch::channel(PlayerSnapshot::default());
        let (notices, _) = broadcast::channel(config.notice_capacity.max(1));
        let (events, events_rx) = mpsc::unbounded_channel();
        let poll_interval = config.poll_interval;

        let inner = Arc::new(Inner {
            state: Mutex::new(State {
                queue: PlaybackQueue::new(),
                shuffle: false,
                repeat: RepeatMode::Off,
                generation: 0,
                settled_phase: PlaybackPhase::Idle,
                shuffle_echoes: VecDeque::new(),
            }),
            snapshot,
            notices,
            session,
            resolver,
            palette,
            config,
            runtime,
        });

        let tasks = vec![
            inner
                .runtime
                .spawn(run_events(Arc::downgrade(&inner), events_rx)),
            inner
                .runtime
                .spawn(run_position_poll(Arc::downgrade(&inner), poll_interval)),
        ];

        Ok(Self {
            inner,
            events,
            tasks,
        })
    }

    /// Sender the media session adapter pushes its callbacks into
    pub fn event_sender(&self) -> mpsc::UnboundedSender<SessionEvent> {
        self.events.clone()
    }

    /// Watch the player snapshot
    pub fn subscribe(&self) -> watch::Receiver<PlayerSnapshot> {
        self.inner.snapshot.subscribe()
    }

    /// Current snapshot
    pub fn snapshot(&self) -> PlayerSnapshot {
        self.inner.snapshot.borrow().clone()
    }

    /// Subscribe to transient notices (failed lookups, queue end)
    pub fn subscribe_notices(&self) -> broadcast::Receiver<PlaybackNotice> {
        self.inner.notices.subscribe()
    }

    /// Index into the active order, `None` when no queue is loaded
    pub fn current_index(&self) -> Option<usize> {
        self.inner.lock().queue.current_index()
    }

    /// Entries in play order
    pub fn active_order(&self) -> Arc<[QueueEntry]> {
        self.inner.lock().queue.active().clone()
    }

    /// Entries in the order they were queued
    pub fn original_order(&self) -> Arc<[QueueEntry]> {
        self.inner.lock().queue.original().clone()
    }

    /// Replace the queue and start playing `start_index`
    ///
    /// With shuffle on, the chosen entry is moved to the front of a fresh
    /// permutation.
    pub fn play_queue(&self, queue: Vec<QueueEntry>, start_index: usize) -> Result<()> {
        let mut state = self.inner.lock();
        let shuffle = state.shuffle;
        state
            .queue
            .load(queue, start_index, shuffle, &mut rand::thread_rng())?;

        let index = state.queue.current_index().unwrap_or(0);
        info!(
            len = state.queue.len(),
            start_index,
            shuffle,
            "Playing new queue"
        );
        self.inner.activate(&mut state, index as isize);
        Ok(())
    }

    /// Skip forward; past the end this wraps only under repeat-all
    pub fn next(&self) {
        let mut state = self.inner.lock();
        self.inner.advance_next(&mut state);
    }

    /// Skip back; from the first entry this always wraps to the last
    pub fn previous(&self) {
        let mut state = self.inner.lock();
        self.inner.advance_previous(&mut state);
    }

    /// Flip shuffle without interrupting the current entry
    pub fn toggle_shuffle(&self) {
        let mut state = self.inner.lock();
        let enabled = !state.shuffle;
        if state.shuffle_echoes.len() == MAX_PENDING_ECHOES {
            state.shuffle_echoes.pop_front();
        }
        state.shuffle_echoes.push_back(enabled);
        self.inner.session.set_shuffle_enabled(enabled);
        self.inner.apply_shuffle(&mut state, enabled);
    }

    /// Cycle Off → All → One → Off
    pub fn toggle_repeat_mode(&self) {
        let mut state = self.inner.lock();
        let mode = state.repeat.next();
        state.repeat = mode;
        self.inner.session.set_repeat_mode(mode);
        self.inner.snapshot.send_if_modified(|s| replace(&mut s.repeat, mode));
        debug!(?mode, "Repeat mode changed");
    }

    /// Seek to a fraction of the current item; ignored while the duration is unknown
    pub fn seek_to(&self, fraction: f32) {
        let duration = self.inner.snapshot.borrow().duration;
        if duration.is_zero() {
            return;
        }
        let fraction = if fraction.is_finite() {
            fraction.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.inner.session.seek_to(duration.mul_f32(fraction));
    }

    pub fn play(&self) {
        self.inner.session.play();
    }

    pub fn pause(&self) {
        self.inner.session.pause();
    }

    /// Stop the session and forget the queue
    ///
    /// Pending stream lookups are discarded when they complete.
    pub fn clear_data(&self) {
        let mut state = self.inner.lock();
        state.generation += 1;
        state.queue.clear();
        state.shuffle = false;
        state.repeat = RepeatMode::Off;
        state.settled_phase = PlaybackPhase::Idle;
        state.shuffle_echoes.clear();

        self.inner.session.stop();
        self.inner.session.clear_items();
        self.inner.snapshot.send_replace(PlayerSnapshot::default());
        info!("Player cleared");
    }
}

impl Drop for PlayerCoordinator {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn advance_next(self: &Arc<Self>, state: &mut State) {
        match state.queue.next_target(state.repeat) {
            Some(Advance::Activate(index)) => self.activate(state, index as isize),
            Some(Advance::End) => self.end_of_queue(),
            None => {}
        }
    }

    fn advance_previous(self: &Arc<Self>, state: &mut State) {
        if let Some(index) = state.queue.previous_target() {
            self.activate(state, index as isize);
        }
    }

    /// Select `index` and start resolving its stream
    fn activate(self: &Arc<Self>, state: &mut State, index: isize) {
        if state.queue.is_empty() {
            return;
        }

        let index = match state.queue.target(index, state.repeat) {
            Advance::Activate(index) => index,
            Advance::End => {
                self.end_of_queue();
                return;
            }
        };

        state.queue.set_current(index);
        state.generation += 1;
        let generation = state.generation;

        let Some(entry) = state.queue.get(index).cloned() else {
            return;
        };

        let current_phase = self.snapshot.borrow().phase;
        if current_phase != PlaybackPhase::Loading {
            state.settled_phase = current_phase;
        }
        self.snapshot
            .send_if_modified(|s| replace(&mut s.phase, PlaybackPhase::Loading));

        debug!(index, generation, song_id = %entry.song_id, "Activating entry");

        let weak = Arc::downgrade(self);
        let resolver = self.resolver.clone();
        self.runtime.spawn(async move {
            let resolved = resolver.resolve(entry.song_id).await;
            if let Some(inner) = weak.upgrade() {
                inner.complete_activation(generation, &entry, resolved);
            }
        });
    }

    fn complete_activation(
        &self,
        generation: u64,
        entry: &QueueEntry,
        resolved: Result<String>,
    ) {
        let state = self.lock();
        if state.generation != generation {
            debug!(
                song_id = %entry.song_id,
                generation,
                current = state.generation,
                "Discarding stale stream resolution"
            );
            return;
        }

        match resolved {
            Ok(uri) => {
                self.session.set_item(entry.bind(uri));
                self.session.prepare();
                self.session.play();
            }
            Err(e) => {
                warn!(song_id = %entry.song_id, error = %e, "Failed to resolve stream");
                let settled = state.settled_phase;
                self.snapshot
                    .send_if_modified(|s| replace(&mut s.phase, settled));
                // Nobody listening is fine.
                let _ = self.notices.send(PlaybackNotice::ResolutionFailed {
                    song_id: entry.song_id,
                    message: e.to_string(),
                });
            }
        }
    }

    /// Advance past the last entry without repeat-all
    fn end_of_queue(&self) {
        self.session.stop();
        self.snapshot.send_if_modified(|s| {
            let playing = replace(&mut s.is_playing, false);
            let phase = replace(&mut s.phase, PlaybackPhase::Ended);
            playing || phase
        });
        let _ = self.notices.send(PlaybackNotice::QueueEnded);
        debug!("Reached end of queue");
    }

    fn apply_shuffle(&self, state: &mut State, enabled: bool) {
        state.shuffle = enabled;
        if enabled {
            state.queue.shuffle(&mut rand::thread_rng());
        } else {
            state.queue.unshuffle();
        }
        self.snapshot
            .send_if_modified(|s| replace(&mut s.shuffle, enabled));
        debug!(enabled, "Shuffle changed");
    }

    fn handle_event(self: &Arc<Self>, event: SessionEvent) {
        match event {
            SessionEvent::IsPlayingChanged(playing) => {
                self.snapshot.send_if_modified(|s| {
                    let changed = replace(&mut s.is_playing, playing);
                    let phase = match (playing, s.phase) {
                        (true, _) => PlaybackPhase::Playing,
                        (false, PlaybackPhase::Playing) => PlaybackPhase::Paused,
                        (false, other) => other,
                    };
                    replace(&mut s.phase, phase) || changed
                });
            }
            SessionEvent::MetadataChanged(metadata) => {
                self.snapshot
                    .send_if_modified(|s| replace(&mut s.now_playing, Some(metadata)));
            }
            SessionEvent::ItemTransition(item) => self.on_transition(item),
            SessionEvent::ShuffleChanged(enabled) => {
                let mut state = self.lock();
                if state.shuffle_echoes.front() == Some(&enabled) {
                    state.shuffle_echoes.pop_front();
                    return;
                }
                // Session-initiated change; older echoes will not arrive in order
                state.shuffle_echoes.clear();
                if state.shuffle != enabled {
                    self.apply_shuffle(&mut state, enabled);
                }
            }
            SessionEvent::RepeatChanged(mode) => {
                self.lock().repeat = mode;
                self.snapshot.send_if_modified(|s| replace(&mut s.repeat, mode));
            }
            SessionEvent::PlaybackEnded => {
                let mut state = self.lock();
                if state.repeat == RepeatMode::One {
                    if let Some(index) = state.queue.current_index() {
                        self.activate(&mut state, index as isize);
                    }
                } else {
                    self.advance_next(&mut state);
                }
            }
            SessionEvent::RemoteNext => {
                let mut state = self.lock();
                self.advance_next(&mut state);
            }
            SessionEvent::RemotePrevious => {
                let mut state = self.lock();
                self.advance_previous(&mut state);
            }
        }
    }

    fn on_transition(self: &Arc<Self>, item: Option<MediaDescriptor>) {
        let current_id = item.as_ref().map(|i| i.song_id);
        let artwork = item
            .as_ref()
            .and_then(|i| i.metadata.artwork_url.clone())
            .filter(|url| !url.trim().is_empty());

        self.snapshot.send_modify(|s| {
            s.now_playing = item.map(|i| i.metadata);
            s.current_id = current_id;
            if artwork.is_none() {
                s.dominant_color = None;
            }
        });

        let weak = Arc::downgrade(self);
        let settle = self.config.duration_settle;
        self.runtime.spawn(async move {
            tokio::time::sleep(settle).await;
            if let Some(inner) = weak.upgrade() {
                let duration = inner.session.duration();
                inner
                    .snapshot
                    .send_if_modified(|s| replace(&mut s.duration, duration));
            }
        });

        if let (Some(url), Some(song_id), Some(palette)) = (artwork, current_id, self.palette.clone()) {
            self.spawn_color_extraction(palette, url, song_id);
        }
    }

    fn spawn_color_extraction(
        self: &Arc<Self>,
        palette: Arc<dyn ArtworkPalette>,
        url: String,
        song_id: SongId,
    ) {
        let weak = Arc::downgrade(self);
        self.runtime.spawn(async move {
            let color = match palette.dominant_color(&url).await {
                Ok(color) => Some(color),
                Err(e) => {
                    debug!(song_id = %song_id, error = %e, "Color extraction failed");
                    if let Some(inner) = weak.upgrade() {
                        let _ = inner
                            .notices
                            .send(PlaybackNotice::ArtworkUnavailable { song_id });
                    }
                    None
                }
            };

            if let Some(inner) = weak.upgrade() {
                inner.snapshot.send_if_modified(|s| {
                    s.current_id == Some(song_id) && replace(&mut s.dominant_color, color)
                });
            }
        });
    }

    fn poll_position(&self) {
        if !self.snapshot.borrow().is_playing {
            return;
        }
        let position = self.session.position();
        let duration = self.session.duration();
        self.snapshot.send_if_modified(|s| {
            let p = replace(&mut s.position, position);
            let d = replace(&mut s.duration, duration);
            p || d
        });
    }
}

async fn run_events(inner: Weak<Inner>, mut events: mpsc::UnboundedReceiver<SessionEvent>) {
    while let Some(event) = events.recv().await {
        let Some(inner) = inner.upgrade() else {
            break;
        };
        inner.handle_event(event);
    }
}

async fn run_position_poll(inner: Weak<Inner>, interval: std::time::Duration) {
    let mut ticker = tokio::time::interval(interval.max(std::time::Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        let Some(inner) = inner.upgrade() else {
            break;
        };
        inner.poll_position();
    }
}
