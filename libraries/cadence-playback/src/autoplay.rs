//! Autoplay when the queue runs out
//!
//! The queue itself only reports exhaustion. What to play afterwards
//! (random library picks, similar artists, ...) is decided by a
//! [`TrackProvider`] supplied by the platform.

use crate::{queue::PlayQueue, types::QueueTrack};
use tracing::debug;

/// Supplier of tracks once the queue is exhausted
///
/// Implemented by the library layer. Any I/O happens before returning;
/// the queue mutation that follows is synchronous.
pub trait TrackProvider {
    /// Pick tracks to continue with
    ///
    /// `recent` is the session so far (history then the current track),
    /// so implementations can avoid repeats. Returning an empty batch
    /// means playback stops.
    fn autoplay_batch(&mut self, recent: &[QueueTrack]) -> Vec<QueueTrack>;
}

impl<F> TrackProvider for F
where
    F: FnMut(&[QueueTrack]) -> Vec<QueueTrack>,
{
    fn autoplay_batch(&mut self, recent: &[QueueTrack]) -> Vec<QueueTrack> {
        self(recent)
    }
}

/// Drives [`PlayQueue::advance`] and refills the queue on exhaustion
pub struct Autoplay<P> {
    provider: P,
    enabled: bool,
}

impl<P: TrackProvider> Autoplay<P> {
    /// Create an enabled autoplay driver
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            enabled: true,
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    /// Advance, asking the provider for more tracks if the queue ran out
    ///
    /// Returns the new current index, or `None` if playback should stop.
    pub fn advance(&mut self, queue: &mut PlayQueue) -> Option<usize> {
        if let Some(index) = queue.advance() {
            return Some(index);
        }
        if !self.enabled || queue.is_empty() {
            return None;
        }

        let mut recent: Vec<QueueTrack> = queue.history().into_iter().cloned().collect();
        recent.extend(queue.current_track().cloned());

        let batch = self.provider.autoplay_batch(&recent);
        if batch.is_empty() {
            debug!("Autoplay provider returned nothing, stopping");
            return None;
        }

        debug!("Autoplay appending {} tracks", batch.len());
        queue.extend(batch);
        queue.advance()
    }
}
