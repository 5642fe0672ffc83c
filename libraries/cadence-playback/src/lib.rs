//! Cadence Player - Playback Queue
//!
//! Platform-agnostic "what plays next" engine for Cadence Player.
//!
//! This crate provides:
//! - One canonical queue per listening session
//! - User-queued priority tracks that play before any continuation
//! - Shuffle as a permutation over the queue (Random + Smart)
//! - Repeat modes (Off, All, One)
//! - Derived history and upcoming views
//! - Autoplay hook for when the queue runs out
//!
//! # Architecture
//!
//! `cadence-playback` has no audio, storage or UI dependencies. The owner
//! (desktop shell, server, tests) calls the mutators, then re-reads the
//! views or a [`QueueSnapshot`] and drains [`QueueEvent`]s. Loading tracks
//! from the library and starting audio happen outside the queue.
//!
//! # Example: Basic Session
//!
//! ```rust
//! use cadence_playback::{PlayQueue, PlaybackContext, QueueTrack};
//! use std::time::Duration;
//!
//! let mut queue = PlayQueue::default();
//!
//! let album: Vec<QueueTrack> = (1..=3)
//!     .map(|n| QueueTrack::new(format!("t{n}"), format!("Song {n}"), "Artist", Duration::from_secs(200)))
//!     .collect();
//!
//! queue.replace(album, 0, PlaybackContext::Album { id: "a1".into(), name: "Album".into() })?;
//!
//! // User "add to queue"
//! queue.insert_priority(vec![QueueTrack::new("x", "Queued", "Other", Duration::from_secs(100))]);
//!
//! assert_eq!(queue.upcoming()[0].track.id, "x");
//! assert!(queue.upcoming()[0].priority);
//!
//! queue.advance();
//! assert_eq!(queue.current_track().map(|t| t.id.as_str()), Some("x"));
//! # Ok::<(), cadence_playback::QueueError>(())
//! ```
//!
//! # Example: Shuffle and Repeat
//!
//! ```rust
//! use cadence_playback::{PlayQueue, QueueConfig, RepeatMode, ShuffleStrategy};
//!
//! let mut queue = PlayQueue::new(QueueConfig {
//!     strategy: ShuffleStrategy::Smart,
//!     ..Default::default()
//! });
//!
//! queue.set_shuffle(true);
//! queue.set_repeat(RepeatMode::All);
//! ```

mod autoplay;
mod error;
mod events;
mod queue;
mod shuffle;
pub mod types;
mod view;

// Public exports
pub use autoplay::{Autoplay, TrackProvider};
pub use error::{QueueError, Result};
pub use events::QueueEvent;
pub use queue::PlayQueue;
pub use types::{PlaybackContext, QueueConfig, QueueTrack, RepeatMode, ShuffleStrategy};
pub use view::{QueueSnapshot, SnapshotEntry, UpcomingEntry};
