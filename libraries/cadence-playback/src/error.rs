//! Error types for queue operations

use thiserror::Error;

/// Queue errors
///
/// All of these are local and recoverable: callers re-read the latest
/// views and retry or drop the request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    /// Index out of bounds for the queue or the upcoming view
    #[error("Index out of bounds: {0}")]
    InvalidIndex(usize),

    /// A session was started with no tracks
    #[error("Queue is empty")]
    EmptyQueue,

    /// Attempt to remove the track that is currently playing
    #[error("Cannot remove the current track at index {0}")]
    CannotRemoveCurrent(usize),

    /// Move touching history or the current track
    #[error("Invalid range: {from} -> {to} must both be upcoming")]
    InvalidRange { from: usize, to: usize },
}

/// Result type for queue operations
pub type Result<T> = std::result::Result<T, QueueError>;
