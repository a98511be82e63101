//! Shared test support: a real-ish security mechanism (AEAD-protected
//! wrap/unwrap, scripted challenge rounds) and callback recorders.
#![allow(dead_code)]
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};
use sasl_channel::core::envelope::{
    SaslReply, SaslRequest, SaslStart, METHOD_AUTH_FIRST, METHOD_AUTH_NEXT,
};
use sasl_channel::mechanism::{Phase, SecurityMechanism};
use sasl_channel::{Result, SaslCallback, SaslError, WireEncoding};
use std::sync::Mutex;

/// Fixed key shared by every test mechanism so independent instances can
/// unwrap each other's frames.
const TEST_KEY: [u8; 32] = [0x42; 32];

/// Response bytes that make the mechanism reject the step.
pub const POISONED_RESPONSE: &[u8] = b"reject-me";

/// Test mechanism: demands a fixed number of challenge rounds, then
/// completes; protects messages with ChaCha20-Poly1305 under a fixed key.
pub struct AeadMechanism {
    rounds: usize,
    seen: usize,
    cipher: ChaCha20Poly1305,
    send_seq: u64,
}

impl AeadMechanism {
    pub fn new(rounds: usize) -> Self {
        Self {
            rounds,
            seen: 0,
            cipher: ChaCha20Poly1305::new(Key::from_slice(&TEST_KEY)),
            send_seq: 0,
        }
    }

    /// A mechanism already past its handshake, for pure framing tests.
    pub fn established() -> Self {
        let mut mech = Self::new(1);
        mech.seen = 1;
        mech
    }
}

impl SecurityMechanism for AeadMechanism {
    fn name(&self) -> &str {
        "krb5"
    }

    fn handle_response(&mut self, response: &[u8]) -> Result<()> {
        if response == POISONED_RESPONSE {
            return Err(SaslError::Mechanism("credential verification failed".into()));
        }
        self.seen += 1;
        Ok(())
    }

    fn next_token(&mut self) -> Result<Option<Vec<u8>>> {
        Ok(Some(format!("server-token-{}", self.seen).into_bytes()))
    }

    fn phase(&self) -> Phase {
        match self.seen {
            0 => Phase::Init,
            n if n < self.rounds => Phase::Challenge,
            _ => Phase::Complete,
        }
    }

    fn client_principal(&self) -> Option<String> {
        Some("alice@EXAMPLE.COM".into())
    }

    fn server_principal(&self) -> Option<String> {
        Some("service/host.example.com@EXAMPLE.COM".into())
    }

    fn wrap(&mut self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let mut nonce_bytes = [0u8; 12];
        nonce_bytes[4..].copy_from_slice(&self.send_seq.to_be_bytes());
        self.send_seq += 1;

        let ciphertext = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce_bytes), plaintext)
            .map_err(|_| SaslError::Mechanism("wrap failed".into()))?;

        let mut out = nonce_bytes.to_vec();
        out.extend_from_slice(&ciphertext);
        Ok(out)
    }

    fn unwrap(&mut self, wrapped: &[u8]) -> Result<Vec<u8>> {
        if wrapped.len() < 12 {
            return Err(SaslError::Mechanism("wrapped frame too short".into()));
        }
        let (nonce_bytes, ciphertext) = wrapped.split_at(12);
        self.cipher
            .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
            .map_err(|_| SaslError::Mechanism("unwrap failed".into()))
    }
}

/// Everything a callback can observe, in delivery order.
#[derive(Debug, Clone, PartialEq)]
pub enum CallbackEvent {
    Reply(Vec<u8>),
    Error(String),
    Complete,
}

/// Callback that forwards events into a tokio channel so async tests can
/// await deliveries.
pub struct PipeCallback {
    tx: tokio::sync::mpsc::UnboundedSender<CallbackEvent>,
}

impl PipeCallback {
    pub fn new() -> (
        std::sync::Arc<Self>,
        tokio::sync::mpsc::UnboundedReceiver<CallbackEvent>,
    ) {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        (std::sync::Arc::new(Self { tx }), rx)
    }
}

impl SaslCallback for PipeCallback {
    fn send_reply(&self, reply: Vec<u8>) {
        let _ = self.tx.send(CallbackEvent::Reply(reply));
    }

    fn handshake_error(&self, error: SaslError) {
        let _ = self.tx.send(CallbackEvent::Error(error.to_string()));
    }

    fn handshake_complete(&self) {
        let _ = self.tx.send(CallbackEvent::Complete);
    }
}

/// Callback that records synchronously, for tests driving the event loop by
/// hand.
#[derive(Default)]
pub struct RecordingCallback {
    events: Mutex<Vec<CallbackEvent>>,
}

impl RecordingCallback {
    pub fn take(&self) -> Vec<CallbackEvent> {
        std::mem::take(&mut self.events.lock().unwrap())
    }
}

impl SaslCallback for RecordingCallback {
    fn send_reply(&self, reply: Vec<u8>) {
        self.events.lock().unwrap().push(CallbackEvent::Reply(reply));
    }

    fn handshake_error(&self, error: SaslError) {
        self.events
            .lock()
            .unwrap()
            .push(CallbackEvent::Error(error.to_string()));
    }

    fn handshake_complete(&self) {
        self.events.lock().unwrap().push(CallbackEvent::Complete);
    }
}

/// Encode a first request under `encoding`.
pub fn first_request(encoding: WireEncoding, mechanism: &str, seq: u32, response: &[u8]) -> Vec<u8> {
    encoding
        .encode_call(
            METHOD_AUTH_FIRST,
            seq,
            &SaslStart {
                mechanism: mechanism.into(),
                response: response.to_vec(),
            },
        )
        .expect("encode first request")
}

/// Encode a follow-up request under `encoding`.
pub fn next_request(encoding: WireEncoding, seq: u32, response: &[u8]) -> Vec<u8> {
    encoding
        .encode_call(
            METHOD_AUTH_NEXT,
            seq,
            &SaslRequest {
                response: response.to_vec(),
            },
        )
        .expect("encode next request")
}

/// Decode a reply envelope back into (method, seq, reply body).
pub fn decode_reply(bytes: &[u8], encoding: WireEncoding) -> (String, u32, SaslReply) {
    let envelope = encoding.decode_envelope(bytes).expect("decode reply");
    let reply: SaslReply = encoding.decode_body(&envelope.body).expect("reply body");
    (envelope.method, envelope.seq, reply)
}
