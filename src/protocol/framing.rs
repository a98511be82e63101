//! Secure-channel framing.
//!
//! Once the handshake completes, application messages travel as
//! mechanism-wrapped payloads behind a 4-byte big-endian length prefix:
//!
//! ```text
//! [Length(4, BE)] [Wrapped payload(Length)]
//! ```
//!
//! A frame is only consumable once all `4 + L` bytes are buffered. `unwrap`
//! never blocks and never partially consumes a frame: either a full frame is
//! available and fully consumed, or nothing is consumed and the exact
//! shortfall is reported so the caller knows how many more bytes to wait
//! for.

use crate::error::{Result, SaslError};
use crate::protocol::session::{lock_session, SharedSession};
use crate::utils::metrics::ChannelMetrics;
use bytes::{Buf, BytesMut};
use std::sync::Arc;

/// Size of the length prefix preceding every wrapped payload.
pub const LENGTH_PREFIX: usize = 4;

/// Default upper bound on a single wrapped payload (16 MiB), preventing a
/// hostile length prefix from stalling a connection on unbounded input.
pub const MAX_FRAME_SIZE: usize = 16 * 1024 * 1024;

/// Wraps and unwraps application payloads for an established secure
/// channel, sharing the session (and thus the mechanism) with the
/// coordinator that performed the handshake.
#[derive(Clone)]
pub struct SecureFramer {
    session: SharedSession,
    max_frame_size: usize,
    metrics: Arc<ChannelMetrics>,
}

impl SecureFramer {
    pub fn new(session: SharedSession) -> Self {
        Self {
            session,
            max_frame_size: MAX_FRAME_SIZE,
            metrics: Arc::new(ChannelMetrics::new()),
        }
    }

    /// Override the per-frame size bound.
    pub fn with_max_frame_size(mut self, max_frame_size: usize) -> Self {
        self.max_frame_size = max_frame_size;
        self
    }

    /// Record framing activity into a shared metrics collector.
    pub fn with_metrics(mut self, metrics: Arc<ChannelMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Protect one application message and frame it for the wire.
    pub fn wrap(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let wrapped = {
            let mut session = lock_session(&self.session)?;
            session.mechanism_mut().wrap(plaintext)?
        };

        let wrap_len =
            u32::try_from(wrapped.len()).map_err(|_| SaslError::Oversized(wrapped.len()))?;

        let mut framed = Vec::with_capacity(LENGTH_PREFIX + wrapped.len());
        framed.extend_from_slice(&wrap_len.to_be_bytes());
        framed.extend_from_slice(&wrapped);
        self.metrics.record_frame_wrapped();
        Ok(framed)
    }

    /// Try to consume one frame from a queue of not-yet-fully-received
    /// bytes.
    ///
    /// Returns `(Some(plaintext), 0)` when a full frame was consumed, or
    /// `(None, bytes_still_needed)` when the queue holds less than a full
    /// frame; in that case nothing is consumed.
    ///
    /// # Errors
    /// [`SaslError::Oversized`] when the length prefix exceeds the frame
    /// bound; mechanism unwrap failures are propagated unchanged.
    pub fn unwrap(&self, queue: &mut BytesMut) -> Result<(Option<Vec<u8>>, usize)> {
        if queue.len() < LENGTH_PREFIX {
            return Ok((None, LENGTH_PREFIX - queue.len()));
        }

        let mut prefix = [0u8; LENGTH_PREFIX];
        prefix.copy_from_slice(&queue[..LENGTH_PREFIX]);
        let wrap_len = u32::from_be_bytes(prefix) as usize;

        if wrap_len > self.max_frame_size {
            return Err(SaslError::Oversized(wrap_len));
        }

        let frame_len = LENGTH_PREFIX + wrap_len;
        if queue.len() < frame_len {
            return Ok((None, frame_len - queue.len()));
        }

        queue.advance(LENGTH_PREFIX);
        let wrapped = queue.split_to(wrap_len);

        let mut session = lock_session(&self.session)?;
        let plaintext = session.mechanism_mut().unwrap(&wrapped)?;
        self.metrics.record_frame_unwrapped();
        Ok((Some(plaintext), 0))
    }
}
