//! # Error Types
//!
//! Error handling for the SASL channel.
//!
//! This module defines all error variants that can occur while coordinating a
//! handshake or framing secure-channel traffic, from I/O failures to protocol
//! violations.
//!
//! ## Error Categories
//! - **Scheduling**: work could not be handed to the worker pool; reported
//!   synchronously to the caller, no thread hop happens
//! - **Decode/Encode**: malformed envelopes, unrecognized wire encodings
//! - **Protocol**: wrong method name for the current phase, unsupported
//!   mechanism identifier
//! - **Mechanism**: the security mechanism rejected a handshake step
//!
//! A stale-channel drop is deliberately *not* an error: results computed for
//! a connection that no longer exists are discarded without any callback.
//!
//! All errors implement `std::error::Error` for interoperability.

use std::io;
use thiserror::Error;

/// Error message constants to reduce allocations in error paths.
/// Static strings are borrowed, avoiding heap allocations for common cases.
pub mod constants {
    /// Worker pool errors
    pub const ERR_POOL_SATURATED: &str = "Worker pool saturated";
    pub const ERR_POOL_CLOSED: &str = "Worker pool is shut down";

    /// Wire decoding errors
    pub const ERR_TRUNCATED_ENVELOPE: &str = "Envelope shorter than its version marker";

    /// Synchronization errors
    pub const ERR_LOCK_POISONED: &str = "Session lock poisoned";
}

/// Primary error type for all handshake and framing operations.
#[derive(Error, Debug)]
pub enum SaslError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Work could not be submitted to the worker pool.
    #[error("Scheduling failed: {0}")]
    Scheduling(String),

    /// The version marker did not match the encoding used for decoding.
    /// This is the one decode failure that triggers the compatibility
    /// fallback; every other decode failure is fatal for the request.
    #[error("Wire encoding version marker mismatch")]
    EncodingMismatch,

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Encode error: {0}")]
    Encode(String),

    /// Sequence violation: wrong method name for the current phase, or an
    /// unsupported mechanism identifier on the first request.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The security mechanism rejected the handshake step. The detail is
    /// mechanism-specific and opaque to this crate.
    #[error("Mechanism error: {0}")]
    Mechanism(String),

    #[error("Frame too large: {0} bytes")]
    Oversized(usize),

    #[error("Connection closed")]
    ConnectionClosed,

    #[error("Timeout occurred")]
    Timeout,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Type alias for Results using SaslError
pub type Result<T> = std::result::Result<T, SaslError>;
