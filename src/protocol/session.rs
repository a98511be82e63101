//! Per-connection handshake session state.
//!
//! A session owns the mechanism state machine and the wire encoding pinned
//! for outbound replies. It lives exactly as long as its connection and is
//! shared, behind a mutex, between the coordinator's worker-thread jobs and
//! the framer. All mutation happens on worker threads; the event-loop side
//! only ever reads already-finalized byte buffers.

use crate::core::codec::WireEncoding;
use crate::error::{constants, Result, SaslError};
use crate::mechanism::{Phase, SecurityMechanism};
use std::sync::{Arc, Mutex, MutexGuard};

/// One connection's handshake state.
pub struct HandshakeSession {
    mechanism: Box<dyn SecurityMechanism>,
    reply_encoding: WireEncoding,
}

/// Session handle shared between the coordinator and the framer.
pub type SharedSession = Arc<Mutex<HandshakeSession>>;

impl HandshakeSession {
    pub fn new(mechanism: Box<dyn SecurityMechanism>, reply_encoding: WireEncoding) -> Self {
        Self {
            mechanism,
            reply_encoding,
        }
    }

    /// Wrap into the shared handle the coordinator and framer expect.
    pub fn into_shared(self) -> SharedSession {
        Arc::new(Mutex::new(self))
    }

    pub fn phase(&self) -> Phase {
        self.mechanism.phase()
    }

    /// The encoding outbound replies use. Starts at the configured default
    /// and may be re-pinned once by the compatibility fallback.
    pub fn reply_encoding(&self) -> WireEncoding {
        self.reply_encoding
    }

    pub fn set_reply_encoding(&mut self, encoding: WireEncoding) {
        self.reply_encoding = encoding;
    }

    pub fn mechanism_mut(&mut self) -> &mut dyn SecurityMechanism {
        self.mechanism.as_mut()
    }

    pub fn mechanism(&self) -> &dyn SecurityMechanism {
        self.mechanism.as_ref()
    }

    /// Authenticated client identity; `None` until the context is
    /// established.
    pub fn client_principal(&self) -> Option<String> {
        if self.mechanism.is_complete() {
            self.mechanism.client_principal()
        } else {
            None
        }
    }

    /// Authenticated server identity; `None` until the context is
    /// established.
    pub fn server_principal(&self) -> Option<String> {
        if self.mechanism.is_complete() {
            self.mechanism.server_principal()
        } else {
            None
        }
    }
}

/// Lock the shared session, mapping poisoning to an internal error instead
/// of panicking on a worker thread.
pub(crate) fn lock_session(session: &SharedSession) -> Result<MutexGuard<'_, HandshakeSession>> {
    session
        .lock()
        .map_err(|_| SaslError::Internal(constants::ERR_LOCK_POISONED.into()))
}
