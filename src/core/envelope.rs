//! Wire envelope data model.
//!
//! An envelope carries one handshake message: a method name, a sequence id
//! echoed verbatim in the reply, and an opaque body whose shape depends on
//! the method and direction. Envelopes are transient; nothing here outlives
//! the request that produced it.

use serde::{Deserialize, Serialize};

/// Method name of the first handshake request (phase `Init`).
pub const METHOD_AUTH_FIRST: &str = "authFirstRequest";

/// Method name of every subsequent handshake request.
pub const METHOD_AUTH_NEXT: &str = "authNextRequest";

/// Direction marker of an envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageKind {
    Call,
    Reply,
}

/// One decoded wire message.
///
/// `body` is the encoding-specific serialization of [`SaslStart`],
/// [`SaslRequest`] or [`SaslReply`], kept opaque at this layer so the
/// envelope can be decoded before the expected body type is known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub kind: MessageKind,
    pub method: String,
    pub seq: u32,
    pub body: Vec<u8>,
}

/// Body of the first request: advertises the mechanism and carries the
/// initial client response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaslStart {
    pub mechanism: String,
    pub response: Vec<u8>,
}

/// Body of every subsequent request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaslRequest {
    pub response: Vec<u8>,
}

/// Final outcome of the handshake, set only once the phase is complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaslOutcome {
    pub success: bool,
}

/// Body of a reply: either a challenge token or a success outcome, never
/// both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaslReply {
    pub challenge: Option<Vec<u8>>,
    pub outcome: Option<SaslOutcome>,
}

impl SaslReply {
    /// A mid-handshake reply carrying the next token.
    pub fn challenge(token: Vec<u8>) -> Self {
        Self {
            challenge: Some(token),
            outcome: None,
        }
    }

    /// The terminal success reply.
    pub fn success() -> Self {
        Self {
            challenge: None,
            outcome: Some(SaslOutcome { success: true }),
        }
    }
}
