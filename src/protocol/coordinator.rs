//! Handshake coordination.
//!
//! One [`HandshakeCoordinator`] per connection. It consumes opaque
//! authentication request bytes from the RPC layer, decodes them under the
//! negotiated wire encoding, drives the security mechanism, and delivers the
//! encoded reply (or the failure) back on the connection's event-loop
//! thread.
//!
//! Every mechanism and codec step runs on a worker-pool thread; the
//! event-loop thread only ever sees finalized byte buffers. Delivery crosses
//! back through the [`ChannelGuard`], so a connection torn down mid-step
//! silently swallows the result instead of racing the callback.
//!
//! The coordinator does not serialize overlapping `consume` calls for one
//! session; the surrounding RPC layer is responsible for sending one
//! handshake message at a time.

use crate::config::ChannelConfig;
use crate::core::codec::{decode_with_fallback, WireEncoding};
use crate::core::envelope::{
    Envelope, SaslReply, SaslRequest, SaslStart, METHOD_AUTH_FIRST, METHOD_AUTH_NEXT,
};
use crate::error::{Result, SaslError};
use crate::mechanism::{Phase, SecurityMechanism};
use crate::protocol::framing::{SecureFramer, MAX_FRAME_SIZE};
use crate::protocol::session::{lock_session, HandshakeSession, SharedSession};
use crate::runtime::{ChannelGuard, WorkerPool};
use crate::utils::metrics::ChannelMetrics;
use bytes::Bytes;
use std::sync::Arc;
use tracing::{debug, warn};

/// Callback surface exposed by the surrounding RPC layer.
///
/// All three operations are invoked only from the connection's event-loop
/// thread, with the single exception of a scheduling failure, which is
/// reported synchronously from `consume` because no work was ever scheduled.
pub trait SaslCallback: Send + Sync {
    /// Deliver an encoded reply envelope to the peer.
    fn send_reply(&self, reply: Vec<u8>);

    /// Deliver a fatal handshake error.
    fn handshake_error(&self, error: SaslError);

    /// Signal that mutual authentication is established.
    fn handshake_complete(&self);
}

/// What one worker-side handshake step produced.
struct StepOutcome {
    reply: Option<Vec<u8>>,
    complete: bool,
}

/// Drives one connection's handshake session.
pub struct HandshakeCoordinator {
    session: SharedSession,
    pool: Arc<dyn WorkerPool>,
    guard: ChannelGuard,
    metrics: Arc<ChannelMetrics>,
    max_frame_size: usize,
}

impl HandshakeCoordinator {
    /// Build a coordinator around a fresh mechanism instance.
    ///
    /// `encoding` is the session's initial (default) reply encoding; the
    /// compatibility fallback may re-pin it to the alternate one.
    pub fn new(
        mechanism: Box<dyn SecurityMechanism>,
        encoding: WireEncoding,
        pool: Arc<dyn WorkerPool>,
        guard: ChannelGuard,
    ) -> Self {
        Self {
            session: HandshakeSession::new(mechanism, encoding).into_shared(),
            pool,
            guard,
            metrics: Arc::new(ChannelMetrics::new()),
            max_frame_size: MAX_FRAME_SIZE,
        }
    }

    /// Build a coordinator from a channel configuration.
    pub fn from_config(
        mechanism: Box<dyn SecurityMechanism>,
        config: &ChannelConfig,
        pool: Arc<dyn WorkerPool>,
        guard: ChannelGuard,
    ) -> Self {
        let mut coordinator = Self::new(mechanism, config.handshake.initial_encoding, pool, guard);
        coordinator.max_frame_size = config.framing.max_frame_size;
        coordinator
    }

    /// Record coordinator activity into a shared metrics collector.
    pub fn with_metrics(mut self, metrics: Arc<ChannelMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// A framer sharing this coordinator's session, for the established
    /// secure channel.
    pub fn framer(&self) -> SecureFramer {
        SecureFramer::new(Arc::clone(&self.session))
            .with_max_frame_size(self.max_frame_size)
            .with_metrics(Arc::clone(&self.metrics))
    }

    /// Current handshake phase, mirrored from the mechanism.
    pub fn phase(&self) -> Phase {
        lock_session(&self.session)
            .map(|s| s.phase())
            .unwrap_or(Phase::Init)
    }

    /// The encoding outbound replies currently use.
    pub fn reply_encoding(&self) -> WireEncoding {
        lock_session(&self.session)
            .map(|s| s.reply_encoding())
            .unwrap_or_default()
    }

    /// Authenticated client identity; `None` until the handshake completes.
    pub fn client_identity(&self) -> Option<String> {
        lock_session(&self.session)
            .ok()
            .and_then(|s| s.client_principal())
    }

    /// Authenticated server identity; `None` until the handshake completes.
    pub fn server_identity(&self) -> Option<String> {
        lock_session(&self.session)
            .ok()
            .and_then(|s| s.server_principal())
    }

    /// Consume exactly one handshake message received from the peer.
    ///
    /// The message and codec work is scheduled onto the worker pool; the
    /// outcome reaches `callback` on the event-loop thread. If scheduling
    /// itself fails, the error is reported synchronously through the same
    /// callback and nothing else happens.
    pub fn consume(&self, message: Bytes, callback: Arc<dyn SaslCallback>) {
        let session = Arc::clone(&self.session);
        let guard = self.guard.clone();
        let metrics = Arc::clone(&self.metrics);
        let submit_callback = Arc::clone(&callback);

        let job = Box::new(move || {
            let outcome = process_step(&session, &message, &metrics);

            let delivery_metrics = Arc::clone(&metrics);
            let posted = guard.post(move || match outcome {
                Err(error) => {
                    warn!(%error, "handshake step failed");
                    delivery_metrics.record_handshake_failed();
                    callback.handshake_error(error);
                }
                Ok(step) => {
                    if let Some(reply) = step.reply {
                        delivery_metrics.record_reply_delivered();
                        callback.send_reply(reply);
                    }
                    if step.complete {
                        delivery_metrics.record_handshake_completed();
                        callback.handshake_complete();
                    }
                }
            });

            if !posted {
                // The connection no longer exists; nobody is listening.
                metrics.record_stale_drop();
            }
        });

        if let Err(error) = self.pool.submit(job) {
            self.metrics.record_handshake_failed();
            submit_callback.handshake_error(error);
        }
    }
}

/// One decode/validate/mechanism/encode round, run on a worker thread.
fn process_step(
    session: &SharedSession,
    message: &[u8],
    metrics: &ChannelMetrics,
) -> Result<StepOutcome> {
    let mut session = lock_session(session)?;

    let is_first_request = matches!(session.phase(), Phase::Init);
    let expected_method = if is_first_request {
        metrics.record_handshake_started();
        METHOD_AUTH_FIRST
    } else {
        METHOD_AUTH_NEXT
    };

    let primary = session.reply_encoding();
    let (envelope, encoding) = decode_with_fallback(message, primary)?;
    if encoding != primary {
        debug!(encoding = encoding.name(), "pinning reply encoding for session");
        metrics.record_encoding_fallback();
        session.set_reply_encoding(encoding);
    }

    let response = extract_response(&envelope, encoding, expected_method, session.mechanism())?;

    session.mechanism_mut().handle_response(&response)?;
    let token = session.mechanism_mut().next_token()?;
    let complete = session.mechanism().is_complete();

    let reply = match token {
        Some(token) => {
            let body = if complete {
                SaslReply::success()
            } else {
                SaslReply::challenge(token)
            };
            Some(encoding.encode_reply(&envelope.method, envelope.seq, &body)?)
        }
        None => None,
    };

    Ok(StepOutcome { reply, complete })
}

/// Validate the envelope against the expected method (and, on the first
/// request, the supported mechanism identifier), returning the opaque
/// response bytes.
fn extract_response(
    envelope: &Envelope,
    encoding: WireEncoding,
    expected_method: &str,
    mechanism: &dyn SecurityMechanism,
) -> Result<Vec<u8>> {
    if envelope.method != expected_method {
        return Err(SaslError::Protocol(format!(
            "Bad handshake call: expected {expected_method}, got {}",
            envelope.method
        )));
    }

    if expected_method == METHOD_AUTH_FIRST {
        let start: SaslStart = encoding.decode_body(&envelope.body)?;
        if start.mechanism != mechanism.name() {
            return Err(SaslError::Protocol(format!(
                "Unknown mechanism: {}",
                start.mechanism
            )));
        }
        Ok(start.response)
    } else {
        let request: SaslRequest = encoding.decode_body(&envelope.body)?;
        Ok(request.response)
    }
}
