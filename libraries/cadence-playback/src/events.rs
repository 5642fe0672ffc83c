//! Queue events
//!
//! The queue records notifications as it mutates; the owner drains them
//! after each call and forwards them to the audio player and the UI.

use crate::types::RepeatMode;
use serde::{Deserialize, Serialize};

/// Events emitted by the play queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueueEvent {
    /// A new listening session replaced the queue
    SessionStarted {
        /// Number of tracks in the new queue
        length: usize,
        /// Index of the first track to play
        start_index: usize,
    },

    /// The current track changed
    TrackChanged {
        /// Queue index of the new current track
        index: usize,
        /// ID of the new current track
        track_id: String,
    },

    /// Tracks were added, removed or reordered
    QueueChanged {
        /// New queue length
        length: usize,
    },

    /// Shuffle was switched on or off
    ShuffleChanged {
        /// New shuffle flag
        enabled: bool,
    },

    /// Repeat mode changed
    RepeatChanged {
        /// New repeat mode
        mode: RepeatMode,
    },

    /// The queue ran out and restarted under repeat all
    Wrapped,

    /// Nothing left to play under repeat off
    ///
    /// Not an error: the owner either stops or hands the queue more
    /// tracks (see [`crate::Autoplay`]).
    Exhausted,
}
