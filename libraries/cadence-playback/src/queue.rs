//! Play queue with priority slots and shuffled continuation
//!
//! Layout of the queue around the current track:
//! ```text
//! [ ... history (linear) ... ] [current] [priority 1 .. priority N] [ ... continuation ... ]
//!                                         ^ user "add to queue"      ^ linear suffix, or the
//!                                                                      unplayed part of the
//!                                                                      shuffle order
//! ```
//!
//! Priority tracks always sit physically right after the current index,
//! whether or not shuffle is on. While shuffled, every other index lives in
//! a [`ShuffleOrder`] whose cursor points at the current index.

use crate::{
    error::{QueueError, Result},
    events::QueueEvent,
    shuffle::{shuffle_indices, ShuffleOrder},
    types::{PlaybackContext, QueueConfig, QueueTrack, RepeatMode, ShuffleStrategy},
    view::{QueueSnapshot, SnapshotEntry, UpcomingEntry},
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, trace, warn};

/// Playback queue engine
///
/// Owns the ordered tracks of the listening session, the current index,
/// the number of pending user-queued tracks and, while shuffled, the
/// shuffle order. Every mutator leaves all of these consistent before it
/// returns.
#[derive(Debug, Clone)]
pub struct PlayQueue {
    tracks: Vec<QueueTrack>,

    /// `None` exactly when `tracks` is empty
    index: Option<usize>,

    /// Pending user-queued tracks at `index + 1 ..= index + priority`
    priority: usize,

    shuffle: bool,
    strategy: ShuffleStrategy,

    /// Present exactly when shuffled with a track loaded
    order: Option<ShuffleOrder>,

    repeat: RepeatMode,
    context: PlaybackContext,
    rng: StdRng,

    pending_events: Vec<QueueEvent>,
}

impl PlayQueue {
    /// Create an empty queue
    pub fn new(config: QueueConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            tracks: Vec::new(),
            index: None,
            priority: 0,
            shuffle: config.shuffle,
            strategy: config.strategy,
            order: None,
            repeat: config.repeat,
            context: PlaybackContext::default(),
            rng,
            pending_events: Vec::new(),
        }
    }

    // ===== Sessions =====

    /// Start a new listening session
    ///
    /// The queue becomes exactly `tracks` with `start_index` playing. Any
    /// previous session, including its user-queued tracks, is discarded.
    pub fn replace(
        &mut self,
        tracks: Vec<QueueTrack>,
        start_index: usize,
        context: PlaybackContext,
    ) -> Result<()> {
        if tracks.is_empty() {
            warn!("Rejected replace with no tracks");
            return Err(QueueError::EmptyQueue);
        }
        if start_index >= tracks.len() {
            warn!(
                "Rejected replace: start index {} out of bounds for {} tracks",
                start_index,
                tracks.len()
            );
            return Err(QueueError::InvalidIndex(start_index));
        }

        self.begin(tracks, start_index, 0, context);
        Ok(())
    }

    /// Append tracks after everything else without touching history
    ///
    /// This is the path autoplay uses once the queue is exhausted. While
    /// shuffled the new tracks are shuffled among themselves and appended
    /// to the shuffle order. On an empty queue the batch starts a session.
    pub fn extend(&mut self, tracks: Vec<QueueTrack>) {
        if tracks.is_empty() {
            return;
        }
        if self.index.is_none() {
            self.begin(tracks, 0, 0, PlaybackContext::Queue);
            return;
        }

        let start = self.tracks.len();
        self.tracks.extend(tracks);

        if let Some(order) = self.order.as_mut() {
            let mut added: Vec<usize> = (start..self.tracks.len()).collect();
            shuffle_indices(&mut added, &self.tracks, self.strategy, &mut self.rng);
            order.append(&added);
        }

        debug!(
            "Extended queue by {} tracks (length {})",
            self.tracks.len() - start,
            self.tracks.len()
        );
        self.emit_queue_changed();
        self.check_invariants();
    }

    /// Drop the session entirely
    pub fn clear(&mut self) {
        self.tracks.clear();
        self.index = None;
        self.priority = 0;
        self.order = None;
        self.context = PlaybackContext::default();
        debug!("Cleared queue");
        self.emit_queue_changed();
    }

    fn begin(
        &mut self,
        tracks: Vec<QueueTrack>,
        start_index: usize,
        priority: usize,
        context: PlaybackContext,
    ) {
        self.tracks = tracks;
        self.index = Some(start_index);
        self.priority = priority;
        self.context = context;

        self.order = if self.shuffle {
            let rest: Vec<usize> = (0..self.tracks.len())
                .filter(|&i| i != start_index && !(start_index < i && i <= start_index + priority))
                .collect();
            Some(self.generate_order(Vec::new(), start_index, rest))
        } else {
            None
        };

        debug!(
            "Started session: {} tracks, start index {}, shuffle {}, context {:?}",
            self.tracks.len(),
            start_index,
            self.shuffle,
            self.context
        );
        self.pending_events.push(QueueEvent::SessionStarted {
            length: self.tracks.len(),
            start_index,
        });
        self.emit_track_changed();
        self.check_invariants();
    }

    // ===== Navigation =====

    /// Move to the next track
    ///
    /// Precedence: pending priority track, then the shuffle order or the
    /// next linear index. Returns the new current index, or `None` when
    /// there is nothing to play. Under repeat off running out emits
    /// [`QueueEvent::Exhausted`] and leaves the state as it was, so
    /// calling again is harmless.
    pub fn advance(&mut self) -> Option<usize> {
        let current = self.index?;

        if self.repeat == RepeatMode::One {
            trace!("Repeat one: staying on index {}", current);
            return Some(current);
        }

        if self.priority > 0 {
            let next = current + 1;
            self.priority -= 1;
            if let Some(order) = self.order.as_mut() {
                order.consume_after_cursor(&[next]);
            }
            trace!("Advanced into priority track at {}", next);
            return Some(self.move_to(next));
        }

        let next = match self.order.as_mut() {
            Some(order) => order.advance(),
            None => (current + 1 < self.tracks.len()).then_some(current + 1),
        };

        if let Some(next) = next {
            trace!("Advanced to index {}", next);
            return Some(self.move_to(next));
        }

        if self.repeat == RepeatMode::All {
            return Some(self.wrap(current));
        }

        debug!("Queue exhausted at index {}", current);
        self.pending_events.push(QueueEvent::Exhausted);
        None
    }

    /// Move to the previous track in the history view
    ///
    /// Returns `None` and changes nothing when there is no history.
    /// Pending priority tracks stay pending: they are re-seated right after
    /// the new current track, ahead of the track that was playing.
    pub fn retreat(&mut self) -> Option<usize> {
        let current = self.index?;

        let previous = match self.order.as_mut() {
            Some(order) => order.retreat()?,
            None => current.checked_sub(1)?,
        };
        self.index = Some(previous);

        if self.priority > 0 {
            let block: Vec<usize> = (current + 1..=current + self.priority).collect();
            let layout = self.layout_with_priority_after(previous, &block);
            self.relayout(&layout);
            self.emit_queue_changed();
        }

        let index = self.index?;
        trace!("Retreated to index {}", index);
        Some(self.move_to(index))
    }

    /// Jump straight to an upcoming track
    ///
    /// Upcoming tracks before it count as played, in play order. Returns
    /// the new current index (the same as `index`).
    pub fn skip_to(&mut self, index: usize) -> Result<usize> {
        let current = self.require_index(index)?;
        let position = self
            .upcoming_indices()
            .iter()
            .position(|&i| i == index)
            .ok_or_else(|| {
                warn!("Rejected skip to non-upcoming index {}", index);
                QueueError::InvalidRange {
                    from: current,
                    to: index,
                }
            })?;

        let consumed = (position + 1).min(self.priority);
        if let Some(order) = self.order.as_mut() {
            let block: Vec<usize> = (current + 1..=current + consumed).collect();
            order.consume_after_cursor(&block);
            order.skip(position + 1 - consumed);
        }
        self.priority -= consumed;

        debug!("Skipped {} upcoming tracks to index {}", position, index);
        Ok(self.move_to(index))
    }

    fn move_to(&mut self, index: usize) -> usize {
        self.index = Some(index);
        self.emit_track_changed();
        self.check_invariants();
        index
    }

    fn wrap(&mut self, current: usize) -> usize {
        let first = if self.shuffle {
            let mut all: Vec<usize> = (0..self.tracks.len()).collect();
            shuffle_indices(&mut all, &self.tracks, self.strategy, &mut self.rng);
            if all.len() > 1 && all[0] == current {
                let last = all.len() - 1;
                all.swap(0, last);
            }
            let first = all[0];
            self.order = Some(ShuffleOrder::new(all, 0));
            first
        } else {
            0
        };

        debug!("Repeat all: wrapped to index {}", first);
        self.pending_events.push(QueueEvent::Wrapped);
        self.move_to(first)
    }

    // ===== Mutation =====

    /// Queue tracks to play next, after any already queued
    pub fn insert_priority(&mut self, tracks: Vec<QueueTrack>) {
        if tracks.is_empty() {
            return;
        }
        let Some(current) = self.index else {
            let priority = tracks.len() - 1;
            self.begin(tracks, 0, priority, PlaybackContext::Queue);
            return;
        };

        let at = current + self.priority + 1;
        let count = tracks.len();
        if let Some(order) = self.order.as_mut() {
            order.shift_from(at, count);
        }
        self.tracks.splice(at..at, tracks);
        self.priority += count;

        debug!(
            "Queued {} priority tracks at {} ({} pending)",
            count, at, self.priority
        );
        self.emit_queue_changed();
        self.check_invariants();
    }

    /// Remove the track at an absolute queue index
    ///
    /// The current track cannot be removed; everything else keeps its
    /// identity and play order.
    pub fn remove_at(&mut self, index: usize) -> Result<QueueTrack> {
        let current = self.require_index(index)?;
        if index == current {
            warn!("Rejected removal of the current track at {}", index);
            return Err(QueueError::CannotRemoveCurrent(index));
        }

        if index > current && index <= current + self.priority {
            self.priority -= 1;
        }
        let removed = self.tracks.remove(index);
        if index < current {
            self.index = Some(current - 1);
        }
        if let Some(order) = self.order.as_mut() {
            order.remove_slot(index);
        }

        debug!("Removed '{}' from index {}", removed.id, index);
        self.emit_queue_changed();
        self.check_invariants();
        Ok(removed)
    }

    /// Move an upcoming track into the play slot of another upcoming track
    ///
    /// Both indices are absolute queue indices and must be upcoming. In
    /// linear order this is a plain move from `from_index` to `to_index`.
    pub fn reorder(&mut self, from_index: usize, to_index: usize) -> Result<()> {
        self.require_index(from_index)?;
        self.require_index(to_index)?;

        let view = self.upcoming_indices();
        let from = view.iter().position(|&i| i == from_index);
        let to = view.iter().position(|&i| i == to_index);

        match (from, to) {
            (Some(from), Some(to)) => self.move_upcoming(from, to),
            _ => {
                warn!(
                    "Rejected reorder {} -> {}: both must be upcoming",
                    from_index, to_index
                );
                Err(QueueError::InvalidRange {
                    from: from_index,
                    to: to_index,
                })
            }
        }
    }

    /// Move an entry of the upcoming view from one position to another
    ///
    /// Positions are indices into [`PlayQueue::upcoming`], which is what a
    /// drag-and-drop list reports. Dragging a queued track below the
    /// queued run makes it ordinary; dragging an ordinary track into the
    /// run makes it queued.
    pub fn move_upcoming(&mut self, from: usize, to: usize) -> Result<()> {
        let current = self.index.ok_or(QueueError::InvalidIndex(from))?;
        let mut view = self.upcoming_indices();
        if from >= view.len() {
            return Err(QueueError::InvalidIndex(from));
        }
        if to >= view.len() {
            return Err(QueueError::InvalidIndex(to));
        }
        if from == to {
            return Ok(());
        }

        let pending = self.priority;
        let priority = match (from < pending, to < pending) {
            (true, false) => pending - 1,
            (false, true) => pending + 1,
            _ => pending,
        };

        let moved = view.remove(from);
        view.insert(to, moved);

        let layout = if let Some(order) = self.order.as_mut() {
            let (queued, rest) = view.split_at(priority);
            order.set_upcoming(rest);
            self.layout_with_priority_after(current, queued)
        } else {
            let mut layout: Vec<usize> = (0..=current).collect();
            layout.extend_from_slice(&view);
            layout
        };
        self.priority = priority;
        self.relayout(&layout);

        debug!(
            "Moved upcoming entry {} -> {} ({} pending)",
            from, to, self.priority
        );
        self.emit_queue_changed();
        self.check_invariants();
        Ok(())
    }

    /// Drop every upcoming track, keeping history and the current track
    pub fn clear_upcoming(&mut self) {
        let Some(mut current) = self.index else {
            return;
        };

        let mut doomed = self.upcoming_indices();
        doomed.sort_unstable();
        for &index in doomed.iter().rev() {
            self.tracks.remove(index);
            if let Some(order) = self.order.as_mut() {
                order.remove_slot(index);
            }
            if index < current {
                current -= 1;
            }
        }
        self.index = Some(current);
        self.priority = 0;

        debug!(
            "Cleared {} upcoming tracks (length {})",
            doomed.len(),
            self.tracks.len()
        );
        self.emit_queue_changed();
        self.check_invariants();
    }

    // ===== Shuffle & Repeat =====

    /// Switch shuffle on or off
    ///
    /// Switching on keeps the current track and the linear history as the
    /// start of the shuffle order and shuffles everything else that is not
    /// user-queued. Switching off drops the order. Setting the current
    /// value again does nothing.
    pub fn set_shuffle(&mut self, enabled: bool) {
        if self.shuffle == enabled {
            return;
        }
        self.shuffle = enabled;

        self.order = match (enabled, self.index) {
            (true, Some(current)) => {
                let played: Vec<usize> = (0..current).collect();
                let rest: Vec<usize> = (current + self.priority + 1..self.tracks.len()).collect();
                Some(self.generate_order(played, current, rest))
            }
            _ => None,
        };

        debug!("Shuffle {}", if enabled { "enabled" } else { "disabled" });
        self.pending_events.push(QueueEvent::ShuffleChanged { enabled });
        self.check_invariants();
    }

    pub fn is_shuffled(&self) -> bool {
        self.shuffle
    }

    /// Change the shuffle algorithm
    ///
    /// Applies the next time a shuffle order is generated.
    pub fn set_shuffle_strategy(&mut self, strategy: ShuffleStrategy) {
        self.strategy = strategy;
    }

    pub fn shuffle_strategy(&self) -> ShuffleStrategy {
        self.strategy
    }

    pub fn set_repeat(&mut self, mode: RepeatMode) {
        if self.repeat == mode {
            return;
        }
        self.repeat = mode;
        debug!("Repeat mode set to {:?}", mode);
        self.pending_events.push(QueueEvent::RepeatChanged { mode });
    }

    pub fn repeat(&self) -> RepeatMode {
        self.repeat
    }

    // ===== Views =====

    /// Index of the current track
    pub fn current_index(&self) -> Option<usize> {
        self.index
    }

    /// The current track
    pub fn current_track(&self) -> Option<&QueueTrack> {
        self.index.and_then(|i| self.tracks.get(i))
    }

    /// Tracks already played, oldest first
    ///
    /// Shuffle order when shuffled, linear prefix otherwise.
    pub fn history(&self) -> Vec<&QueueTrack> {
        self.history_indices()
            .into_iter()
            .filter_map(|i| self.tracks.get(i))
            .collect()
    }

    /// Tracks still to play, in play order
    ///
    /// User-queued tracks come first and are tagged as priority.
    pub fn upcoming(&self) -> Vec<UpcomingEntry<'_>> {
        self.upcoming_indices()
            .into_iter()
            .enumerate()
            .filter_map(|(position, index)| {
                self.tracks.get(index).map(|track| UpcomingEntry {
                    index,
                    track,
                    priority: position < self.priority,
                })
            })
            .collect()
    }

    /// Owned picture of the queue for UI layers
    pub fn snapshot(&self) -> QueueSnapshot {
        QueueSnapshot {
            current_index: self.index,
            current: self.current_track().cloned(),
            history: self.history().into_iter().cloned().collect(),
            upcoming: self.upcoming().into_iter().map(SnapshotEntry::from).collect(),
            shuffle: self.shuffle,
            repeat: self.repeat,
            context: self.context.clone(),
        }
    }

    /// All tracks in queue order (not play order)
    pub fn tracks(&self) -> &[QueueTrack] {
        &self.tracks
    }

    /// Number of pending user-queued tracks
    pub fn priority_count(&self) -> usize {
        self.priority
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn context(&self) -> &PlaybackContext {
        &self.context
    }

    // ===== Events =====

    /// Take all events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<QueueEvent> {
        std::mem::take(&mut self.pending_events)
    }

    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    fn emit_track_changed(&mut self) {
        if let Some(index) = self.index {
            let track_id = self.tracks[index].id.clone();
            self.pending_events
                .push(QueueEvent::TrackChanged { index, track_id });
        }
    }

    fn emit_queue_changed(&mut self) {
        self.pending_events.push(QueueEvent::QueueChanged {
            length: self.tracks.len(),
        });
    }

    // ===== Internals =====

    fn require_index(&self, index: usize) -> Result<usize> {
        match self.index {
            Some(current) if index < self.tracks.len() => Ok(current),
            _ => {
                warn!(
                    "Index {} out of bounds for queue of {}",
                    index,
                    self.tracks.len()
                );
                Err(QueueError::InvalidIndex(index))
            }
        }
    }

    fn history_indices(&self) -> Vec<usize> {
        match (&self.order, self.index) {
            (Some(order), _) => order.history().to_vec(),
            (None, Some(current)) => (0..current).collect(),
            (None, None) => Vec::new(),
        }
    }

    fn upcoming_indices(&self) -> Vec<usize> {
        let Some(current) = self.index else {
            return Vec::new();
        };
        let queued = current + 1..=current + self.priority;
        match &self.order {
            Some(order) => queued.chain(order.upcoming().iter().copied()).collect(),
            None => (current + 1..self.tracks.len()).collect(),
        }
    }

    /// Build a shuffle order: `played` as history, then `current`, then a
    /// shuffle of `rest`
    fn generate_order(
        &mut self,
        mut played: Vec<usize>,
        current: usize,
        mut rest: Vec<usize>,
    ) -> ShuffleOrder {
        shuffle_indices(&mut rest, &self.tracks, self.strategy, &mut self.rng);
        let cursor = played.len();
        played.push(current);
        played.extend(rest);
        ShuffleOrder::new(played, cursor)
    }

    /// Queue order (as old indices) with `block` moved to directly follow
    /// `anchor` and every other index keeping its relative position
    fn layout_with_priority_after(&self, anchor: usize, block: &[usize]) -> Vec<usize> {
        let mut layout = Vec::with_capacity(self.tracks.len());
        for index in (0..self.tracks.len()).filter(|i| !block.contains(i)) {
            layout.push(index);
            if index == anchor {
                layout.extend_from_slice(block);
            }
        }
        layout
    }

    /// Physically reorder the queue
    ///
    /// `layout[new] = old`. The current index and the shuffle order are
    /// rewritten to follow their tracks.
    fn relayout(&mut self, layout: &[usize]) {
        debug_assert_eq!(layout.len(), self.tracks.len());

        let mut new_index_of = vec![0; layout.len()];
        for (new, &old) in layout.iter().enumerate() {
            new_index_of[old] = new;
        }

        let mut slots: Vec<(usize, QueueTrack)> = std::mem::take(&mut self.tracks)
            .into_iter()
            .enumerate()
            .map(|(old, track)| (new_index_of[old], track))
            .collect();
        slots.sort_unstable_by_key(|(new, _)| *new);
        self.tracks = slots.into_iter().map(|(_, track)| track).collect();

        self.index = self.index.map(|old| new_index_of[old]);
        if let Some(order) = self.order.as_mut() {
            order.remap(&new_index_of);
        }
    }

    fn check_invariants(&self) {
        debug_assert_eq!(self.index.is_none(), self.tracks.is_empty());
        if let Some(current) = self.index {
            debug_assert!(current < self.tracks.len());
            debug_assert!(current + self.priority < self.tracks.len());
        }
        debug_assert_eq!(self.order.is_some(), self.shuffle && self.index.is_some());
        if let Some(order) = &self.order {
            debug_assert_eq!(order.current(), self.index);
            debug_assert_eq!(order.entries().len() + self.priority, self.tracks.len());
        }
    }
}

impl Default for PlayQueue {
    fn default() -> Self {
        Self::new(QueueConfig::default())
    }
}
