//! Established secure channel over a byte stream.
//!
//! Packages the length-prefixed framer as a tokio codec so the protected
//! data path runs over any `AsyncRead + AsyncWrite` transport. Each
//! `decode` call either consumes one complete frame or reserves exactly the
//! shortfall the framer reported and waits for more bytes.

use crate::error::{Result, SaslError};
use crate::protocol::framing::SecureFramer;
use crate::utils::timeout::{with_timeout, DEFAULT_TIMEOUT};
use bytes::BytesMut;
use futures::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::{Decoder, Encoder, Framed};
use tracing::{debug, instrument};

/// Tokio codec delegating wrap/unwrap to a [`SecureFramer`].
pub struct SecureCodec {
    framer: SecureFramer,
}

impl SecureCodec {
    pub fn new(framer: SecureFramer) -> Self {
        Self { framer }
    }
}

impl Decoder for SecureCodec {
    type Item = Vec<u8>;
    type Error = SaslError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Vec<u8>>> {
        let (frame, needed) = self.framer.unwrap(src)?;
        if frame.is_none() && needed > 0 {
            src.reserve(needed);
        }
        Ok(frame)
    }
}

impl Encoder<Vec<u8>> for SecureCodec {
    type Error = SaslError;

    fn encode(&mut self, item: Vec<u8>, dst: &mut BytesMut) -> Result<()> {
        let framed = self.framer.wrap(&item)?;
        dst.extend_from_slice(&framed);
        Ok(())
    }
}

/// Post-handshake application channel: mechanism-wrapped, length-prefixed
/// messages over a streaming transport, with send/receive timeouts.
pub struct SecureChannel<T> {
    framed: Framed<T, SecureCodec>,
    send_timeout: Duration,
    recv_timeout: Duration,
}

impl<T: AsyncRead + AsyncWrite + Unpin> SecureChannel<T> {
    /// Build a channel from a transport and the framer obtained from the
    /// coordinator that completed the handshake.
    pub fn new(io: T, framer: SecureFramer) -> Self {
        Self {
            framed: Framed::new(io, SecureCodec::new(framer)),
            send_timeout: DEFAULT_TIMEOUT,
            recv_timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set custom timeout durations
    pub fn with_timeouts(mut self, send_timeout: Duration, recv_timeout: Duration) -> Self {
        self.send_timeout = send_timeout;
        self.recv_timeout = recv_timeout;
        self
    }

    #[instrument(skip(self, plaintext), level = "debug")]
    pub async fn send(&mut self, plaintext: Vec<u8>) -> Result<()> {
        debug!(bytes = plaintext.len(), "sending wrapped message");
        with_timeout(
            async {
                self.framed.send(plaintext).await?;
                Ok(())
            },
            self.send_timeout,
        )
        .await
    }

    #[instrument(skip(self), level = "debug")]
    pub async fn recv(&mut self) -> Result<Vec<u8>> {
        with_timeout(
            async {
                self.framed
                    .next()
                    .await
                    .ok_or(SaslError::ConnectionClosed)?
            },
            self.recv_timeout,
        )
        .await
    }
}
