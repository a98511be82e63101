//! # sasl-channel
//!
//! Server-side SASL handshake coordination and secure-channel framing for
//! RPC transports.
//!
//! This crate authenticates an RPC client to a server (and the server back
//! to the client) through a multi-round challenge-response handshake, then
//! protects application traffic on the established channel with
//! length-prefixed, mechanism-wrapped frames.
//!
//! The cryptographic mechanism itself (Kerberos/GSSAPI in the usual
//! deployment) is an external capability behind the
//! [`mechanism::SecurityMechanism`] trait; this crate supplies everything
//! around it:
//!
//! - **Wire layer** ([`core`]): request/reply envelopes under two
//!   mutually-compatible encodings (bincode and MessagePack) with
//!   backward-compatible fallback negotiation
//! - **Coordination** ([`protocol`]): the per-connection
//!   [`protocol::coordinator::HandshakeCoordinator`] driving the mechanism
//!   off the event-loop thread, and the
//!   [`protocol::framing::SecureFramer`] for the established channel
//! - **Runtime** ([`runtime`]): worker pool and event loop contracts, plus
//!   the teardown-safe [`runtime::ChannelGuard`]
//! - **Service** ([`service`]): the async [`service::SecureChannel`] running
//!   the framer over any tokio byte stream
//!
//! ## Handshake flow
//!
//! ```text
//! peer bytes -> consume() -> worker pool -> decode -> mechanism
//!                                             |
//!            callback <- event loop <- guard <- encoded reply
//! ```
//!
//! Delivery to the connection's callback happens only on that connection's
//! event-loop thread, and never after the connection begins teardown.

pub mod config;
pub mod core;
pub mod error;
pub mod mechanism;
pub mod protocol;
pub mod runtime;
pub mod service;
pub mod utils;

pub use config::ChannelConfig;
pub use core::codec::WireEncoding;
pub use error::{Result, SaslError};
pub use mechanism::{Phase, SecurityMechanism};
pub use protocol::coordinator::{HandshakeCoordinator, SaslCallback};
pub use protocol::framing::SecureFramer;
pub use runtime::{BlockingPool, ChannelGuard, EventLoop, EventLoopHandle, InlinePool, WorkerPool};
pub use service::SecureChannel;
pub use utils::metrics::ChannelMetrics;
