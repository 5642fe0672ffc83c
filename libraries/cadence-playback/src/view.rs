//! Read-only projections of the queue
//!
//! Nothing here mutates: a reactive UI takes a [`QueueSnapshot`] after
//! every mutation instead of holding a reference into the queue.

use crate::types::{PlaybackContext, QueueTrack, RepeatMode};
use serde::{Deserialize, Serialize};

/// One entry of the upcoming view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpcomingEntry<'a> {
    /// Absolute queue index
    pub index: usize,

    /// The track at that index
    pub track: &'a QueueTrack,

    /// Whether the user queued this track explicitly
    pub priority: bool,
}

/// Owned upcoming entry, used in snapshots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub index: usize,
    pub track: QueueTrack,
    pub priority: bool,
}

impl From<UpcomingEntry<'_>> for SnapshotEntry {
    fn from(entry: UpcomingEntry<'_>) -> Self {
        Self {
            index: entry.index,
            track: entry.track.clone(),
            priority: entry.priority,
        }
    }
}

/// Owned, serializable picture of the whole queue state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueSnapshot {
    /// Queue index of the current track
    pub current_index: Option<usize>,

    /// The current track
    pub current: Option<QueueTrack>,

    /// Already played, oldest first
    pub history: Vec<QueueTrack>,

    /// Still to play, in play order
    pub upcoming: Vec<SnapshotEntry>,

    pub shuffle: bool,
    pub repeat: RepeatMode,
    pub context: PlaybackContext,
}

impl QueueSnapshot {
    /// Number of explicitly queued tracks at the head of `upcoming`
    pub fn priority_count(&self) -> usize {
        self.upcoming.iter().take_while(|entry| entry.priority).count()
    }
}
