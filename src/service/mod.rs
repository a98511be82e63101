//! # Service Layer
//!
//! Async adapters that put the core components on real connections.

pub mod secure;

pub use secure::{SecureChannel, SecureCodec};
