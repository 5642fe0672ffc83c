//! Core types for queue management

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Track reference held by the queue
///
/// Carries the stable identifier plus the cached display fields the
/// playback bar and queue lists need. The engine never mutates a track
/// once it is enqueued, it only moves it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueTrack {
    /// Stable track identifier from the library
    pub id: String,

    /// Track title
    pub title: String,

    /// Artist name
    pub artist: String,

    /// Album name (optional)
    pub album: Option<String>,

    /// Track duration
    pub duration: Duration,
}

impl QueueTrack {
    /// Create a track reference without album information
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        artist: impl Into<String>,
        duration: Duration,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artist: artist.into(),
            album: None,
            duration,
        }
    }

    /// Attach an album name
    #[must_use]
    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = Some(album.into());
        self
    }
}

/// Where a listening session was started from
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaybackContext {
    /// Tracks from a playlist
    Playlist { id: String, name: String },

    /// Tracks from an album
    Album { id: String, name: String },

    /// Artist discography
    Artist { id: String, name: String },

    /// Search results
    Search { query: String },

    /// "Play all" over the whole library
    Library,

    /// Tracks queued by hand with nothing else playing
    Queue,

    /// Individual track (no context)
    #[default]
    Single,
}

/// Repeat mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RepeatMode {
    /// Stop when the queue ends
    #[default]
    Off,

    /// Loop the entire queue
    All,

    /// Loop the current track only
    One,
}

/// How a shuffled visiting order is generated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShuffleStrategy {
    /// Uniform Fisher-Yates shuffle
    #[default]
    Random,

    /// Spread artists out so the same artist rarely plays back to back
    Smart,
}

/// Configuration for a play queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Initial shuffle flag (default: false)
    pub shuffle: bool,

    /// Shuffle algorithm (default: Random)
    pub strategy: ShuffleStrategy,

    /// Initial repeat mode (default: Off)
    pub repeat: RepeatMode,

    /// Seed for shuffle generation. `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            shuffle: false,
            strategy: ShuffleStrategy::Random,
            repeat: RepeatMode::Off,
            seed: None,
        }
    }
}
