//! Shuffle order management
//!
//! A shuffled session keeps the queue in place and walks a permutation of
//! queue indices instead. The permutation prefix before the cursor is the
//! shuffled history, the entry at the cursor is the current track and the
//! suffix is the shuffled continuation.
//!
//! Two generation algorithms are provided: pure random (Fisher-Yates) and
//! smart (artist interleaving).

use crate::types::{QueueTrack, ShuffleStrategy};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::collections::BTreeMap;

/// Permutation of queue indices plus a cursor into it
///
/// Invariant: `order[cursor]` is the current queue index whenever the
/// order is non-empty. Pending priority slots never appear in `order`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ShuffleOrder {
    order: Vec<usize>,
    cursor: usize,
}

impl ShuffleOrder {
    pub(crate) fn new(order: Vec<usize>, cursor: usize) -> Self {
        debug_assert!(order.is_empty() || cursor < order.len());
        Self { order, cursor }
    }

    /// Queue index at the cursor
    pub(crate) fn current(&self) -> Option<usize> {
        self.order.get(self.cursor).copied()
    }

    /// Entries already played, in play order
    pub(crate) fn history(&self) -> &[usize] {
        &self.order[..self.cursor]
    }

    /// Entries still to play after the cursor, in play order
    pub(crate) fn upcoming(&self) -> &[usize] {
        if self.order.is_empty() {
            &[]
        } else {
            &self.order[self.cursor + 1..]
        }
    }

    pub(crate) fn entries(&self) -> &[usize] {
        &self.order
    }

    /// Step the cursor forward
    pub(crate) fn advance(&mut self) -> Option<usize> {
        if self.cursor + 1 < self.order.len() {
            self.cursor += 1;
            self.current()
        } else {
            None
        }
    }

    /// Step the cursor back
    pub(crate) fn retreat(&mut self) -> Option<usize> {
        if self.cursor > 0 && !self.order.is_empty() {
            self.cursor -= 1;
            self.current()
        } else {
            None
        }
    }

    /// Insert entries right after the cursor and move onto the last of them
    pub(crate) fn consume_after_cursor(&mut self, indices: &[usize]) {
        if indices.is_empty() {
            return;
        }
        let at = self.cursor + 1;
        self.order.splice(at..at, indices.iter().copied());
        self.cursor += indices.len();
    }

    /// Make room for `count` queue slots inserted at `position`
    pub(crate) fn shift_from(&mut self, position: usize, count: usize) {
        for entry in &mut self.order {
            if *entry >= position {
                *entry += count;
            }
        }
    }

    /// Forget a removed queue slot
    ///
    /// Drops the entry equal to `index` (adjusting the cursor if it was
    /// history) and closes the gap in the remaining entries.
    pub(crate) fn remove_slot(&mut self, index: usize) {
        if let Some(pos) = self.order.iter().position(|&entry| entry == index) {
            self.order.remove(pos);
            if pos < self.cursor {
                self.cursor -= 1;
            }
        }
        for entry in &mut self.order {
            if *entry > index {
                *entry -= 1;
            }
        }
    }

    /// Rewrite entries through an old-index to new-index table
    pub(crate) fn remap(&mut self, new_index_of: &[usize]) {
        for entry in &mut self.order {
            *entry = new_index_of[*entry];
        }
    }

    /// Replace everything after the cursor
    pub(crate) fn set_upcoming(&mut self, upcoming: &[usize]) {
        self.order.truncate(self.cursor + 1);
        self.order.extend_from_slice(upcoming);
    }

    /// Append entries to the end of the shuffled continuation
    pub(crate) fn append(&mut self, indices: &[usize]) {
        self.order.extend_from_slice(indices);
    }

    /// Move the cursor forward by `steps` entries
    pub(crate) fn skip(&mut self, steps: usize) {
        self.cursor = (self.cursor + steps).min(self.order.len().saturating_sub(1));
    }
}

/// Shuffle queue indices in place
///
/// `tracks` is the whole queue; it is only consulted by the smart
/// strategy to look up artists.
pub(crate) fn shuffle_indices(
    indices: &mut [usize],
    tracks: &[QueueTrack],
    strategy: ShuffleStrategy,
    rng: &mut StdRng,
) {
    match strategy {
        ShuffleStrategy::Random => shuffle_random(indices, rng),
        ShuffleStrategy::Smart => shuffle_smart(indices, tracks, rng),
    }
}

/// Pure random shuffle using Fisher-Yates
///
/// Each index has equal probability of landing at any position.
fn shuffle_random(indices: &mut [usize], rng: &mut StdRng) {
    indices.shuffle(rng);
}

/// Smart shuffle
///
/// 1. Group indices by artist
/// 2. Randomize within each artist group and randomize the group order
/// 3. Round-robin through the groups so the same artist is spread out
fn shuffle_smart(indices: &mut [usize], tracks: &[QueueTrack], rng: &mut StdRng) {
    if indices.len() <= 2 {
        shuffle_random(indices, rng);
        return;
    }

    // BTreeMap keeps grouping independent of hasher state so seeded runs repeat
    let mut by_artist: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for &index in indices.iter() {
        let artist = tracks.get(index).map_or("", |track| track.artist.as_str());
        by_artist.entry(artist).or_default().push(index);
    }

    let mut groups: Vec<Vec<usize>> = by_artist.into_values().collect();
    for group in &mut groups {
        group.shuffle(rng);
    }
    groups.shuffle(rng);

    let mut result = Vec::with_capacity(indices.len());
    let mut round = 0;
    while result.len() < indices.len() {
        for group in &groups {
            if let Some(&index) = group.get(round) {
                result.push(index);
            }
        }
        round += 1;
    }

    indices.copy_from_slice(&result);
}
