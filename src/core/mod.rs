//! # Core Wire Components
//!
//! Envelope data model and the dual wire encodings.
//!
//! This module provides the wire-level foundation for the handshake: the
//! request/reply envelope types and the two mutually-compatible binary
//! encodings they travel in.
//!
//! ## Components
//! - **Envelope**: (method, sequence id, body) units with the SASL body types
//! - **Codec**: version-marker-prefixed Binary/Compact encodings with
//!   backward-compatible fallback decoding
pub mod codec;
pub mod envelope;
