//! # Wire Encodings
//!
//! The two mutually-compatible serializations an envelope can travel in.
//!
//! Every message starts with a two-byte version marker identifying the
//! encoding of the rest:
//!
//! ```text
//! [Marker(2)] [Envelope(N)]
//! ```
//!
//! - **Binary** (`0x80 0x01`, the default): bincode
//! - **Compact** (`0x82 0x01`): MessagePack
//!
//! Older peers always sent Compact regardless of what the outer transport
//! header advertised. [`decode_with_fallback`] preserves compatibility with
//! them: a marker mismatch under the default encoding retries under Compact,
//! and a successful retry tells the caller to pin Compact for the rest of
//! the session. The mismatch is a classified error
//! ([`SaslError::EncodingMismatch`]), so fallback is explicit branching
//! rather than exception interception.

use crate::core::envelope::{Envelope, MessageKind};
use crate::error::{constants, Result, SaslError};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Length of the version marker preceding every envelope.
pub const MARKER_LEN: usize = 2;

const BINARY_MARKER: [u8; 2] = [0x80, 0x01];
const COMPACT_MARKER: [u8; 2] = [0x82, 0x01];

/// A selectable wire encoding for envelopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireEncoding {
    /// Strict binary format (bincode). The default.
    #[default]
    Binary,
    /// Compact binary format (MessagePack), kept for older peers.
    Compact,
}

impl WireEncoding {
    /// The version marker identifying this encoding on the wire.
    pub fn marker(self) -> [u8; 2] {
        match self {
            WireEncoding::Binary => BINARY_MARKER,
            WireEncoding::Compact => COMPACT_MARKER,
        }
    }

    /// Human-readable name
    pub fn name(self) -> &'static str {
        match self {
            WireEncoding::Binary => "binary",
            WireEncoding::Compact => "compact",
        }
    }

    /// Serialize any body value under this encoding.
    pub fn encode_body<T: Serialize>(self, value: &T) -> Result<Vec<u8>> {
        match self {
            WireEncoding::Binary => {
                bincode::serialize(value).map_err(|e| SaslError::Encode(e.to_string()))
            }
            WireEncoding::Compact => {
                rmp_serde::to_vec(value).map_err(|e| SaslError::Encode(e.to_string()))
            }
        }
    }

    /// Deserialize a body previously produced by [`Self::encode_body`].
    pub fn decode_body<T: DeserializeOwned>(self, bytes: &[u8]) -> Result<T> {
        match self {
            WireEncoding::Binary => {
                bincode::deserialize(bytes).map_err(|e| SaslError::Decode(e.to_string()))
            }
            WireEncoding::Compact => {
                rmp_serde::from_slice(bytes).map_err(|e| SaslError::Decode(e.to_string()))
            }
        }
    }

    /// Encode a full envelope, marker included.
    pub fn encode_envelope(self, envelope: &Envelope) -> Result<Vec<u8>> {
        let body = self.encode_body(envelope)?;
        let mut out = Vec::with_capacity(MARKER_LEN + body.len());
        out.extend_from_slice(&self.marker());
        out.extend_from_slice(&body);
        Ok(out)
    }

    /// Decode a full envelope.
    ///
    /// # Errors
    /// [`SaslError::EncodingMismatch`] if the version marker belongs to a
    /// different encoding; [`SaslError::Decode`] for anything else.
    pub fn decode_envelope(self, bytes: &[u8]) -> Result<Envelope> {
        if bytes.len() < MARKER_LEN {
            return Err(SaslError::Decode(constants::ERR_TRUNCATED_ENVELOPE.into()));
        }
        if bytes[..MARKER_LEN] != self.marker() {
            return Err(SaslError::EncodingMismatch);
        }
        self.decode_body(&bytes[MARKER_LEN..])
    }

    /// Encode a call envelope carrying an already-serialized body.
    pub fn encode_call<T: Serialize>(self, method: &str, seq: u32, body: &T) -> Result<Vec<u8>> {
        let body = self.encode_body(body)?;
        self.encode_envelope(&Envelope {
            kind: MessageKind::Call,
            method: method.to_string(),
            seq,
            body,
        })
    }

    /// Encode a reply envelope, echoing the request's method and sequence id.
    pub fn encode_reply<T: Serialize>(self, method: &str, seq: u32, body: &T) -> Result<Vec<u8>> {
        let body = self.encode_body(body)?;
        self.encode_envelope(&Envelope {
            kind: MessageKind::Reply,
            method: method.to_string(),
            seq,
            body,
        })
    }
}

/// Decode under `primary`, falling back to [`WireEncoding::Compact`] when the
/// failure is a marker mismatch *and* `primary` is the default encoding.
///
/// Returns the envelope together with the encoding that actually decoded it,
/// so the caller can pin replies to that encoding for the session.
pub fn decode_with_fallback(
    bytes: &[u8],
    primary: WireEncoding,
) -> Result<(Envelope, WireEncoding)> {
    match primary.decode_envelope(bytes) {
        Ok(envelope) => Ok((envelope, primary)),
        Err(SaslError::EncodingMismatch) if primary == WireEncoding::default() => {
            let envelope = WireEncoding::Compact.decode_envelope(bytes)?;
            Ok((envelope, WireEncoding::Compact))
        }
        Err(e) => Err(e),
    }
}
