//! Observability counters.
//!
//! Thread-safe metrics for handshake and secure-channel activity. Uses
//! atomic counters so worker threads and the event loop can record without
//! coordination.
//!
//! `stale_drops` counts results discarded because the owning channel was
//! torn down while the work was in flight; those drops are invisible to the
//! callback on purpose, so the counter is the only place they surface.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::info;

#[derive(Debug)]
pub struct ChannelMetrics {
    /// Handshake sessions that processed a first request
    pub handshakes_started: AtomicU64,
    /// Handshakes that reached the complete phase
    pub handshakes_completed: AtomicU64,
    /// Handshake steps that ended in an error delivery
    pub handshakes_failed: AtomicU64,
    /// Sessions re-pinned to the alternate encoding
    pub encoding_fallbacks: AtomicU64,
    /// Reply envelopes handed to the callback
    pub replies_delivered: AtomicU64,
    /// Results discarded because the channel was gone
    pub stale_drops: AtomicU64,
    /// Frames wrapped for the secure channel
    pub frames_wrapped: AtomicU64,
    /// Frames unwrapped from the secure channel
    pub frames_unwrapped: AtomicU64,
    start_time: Instant,
}

impl ChannelMetrics {
    pub fn new() -> Self {
        Self {
            handshakes_started: AtomicU64::new(0),
            handshakes_completed: AtomicU64::new(0),
            handshakes_failed: AtomicU64::new(0),
            encoding_fallbacks: AtomicU64::new(0),
            replies_delivered: AtomicU64::new(0),
            stale_drops: AtomicU64::new(0),
            frames_wrapped: AtomicU64::new(0),
            frames_unwrapped: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_handshake_started(&self) {
        self.handshakes_started.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_handshake_completed(&self) {
        self.handshakes_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_handshake_failed(&self) {
        self.handshakes_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_encoding_fallback(&self) {
        self.encoding_fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_reply_delivered(&self) {
        self.replies_delivered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_stale_drop(&self) {
        self.stale_drops.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_frame_wrapped(&self) {
        self.frames_wrapped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_frame_unwrapped(&self) {
        self.frames_unwrapped.fetch_add(1, Ordering::Relaxed);
    }

    /// Seconds since this collector was created.
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Log a one-line summary of all counters.
    pub fn log_summary(&self) {
        info!(
            uptime_secs = self.uptime_secs(),
            handshakes_started = self.handshakes_started.load(Ordering::Relaxed),
            handshakes_completed = self.handshakes_completed.load(Ordering::Relaxed),
            handshakes_failed = self.handshakes_failed.load(Ordering::Relaxed),
            encoding_fallbacks = self.encoding_fallbacks.load(Ordering::Relaxed),
            replies_delivered = self.replies_delivered.load(Ordering::Relaxed),
            stale_drops = self.stale_drops.load(Ordering::Relaxed),
            frames_wrapped = self.frames_wrapped.load(Ordering::Relaxed),
            frames_unwrapped = self.frames_unwrapped.load(Ordering::Relaxed),
            "channel metrics summary"
        );
    }
}

impl Default for ChannelMetrics {
    fn default() -> Self {
        Self::new()
    }
}
