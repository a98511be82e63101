//! Security mechanism contract.
//!
//! The mechanism is the pluggable engine performing the actual identity
//! verification (Kerberos/GSSAPI in the usual deployment). This crate treats
//! it as an opaque, stateful capability: the coordinator feeds it response
//! bytes, asks it for the next token, and mirrors its phase; the framer uses
//! its `wrap`/`unwrap` for post-handshake message protection.
//!
//! Implementations live outside this crate. They are driven exclusively from
//! worker-pool threads, so `Send` is required but `Sync` is not.

use crate::error::Result;

/// Current stage of the handshake, mirrored from the mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No message has been processed yet.
    Init,
    /// Mid-handshake: at least one challenge round is outstanding.
    Challenge,
    /// Mutual authentication established. Terminal for the handshake.
    Complete,
}

/// An opaque, stateful handshake engine.
///
/// Calls may block on network or cryptographic I/O; the coordinator never
/// invokes them on the event-loop thread.
pub trait SecurityMechanism: Send {
    /// The mechanism identifier advertised on the wire (e.g. `"krb5"`).
    /// The first request's advertised identifier must match this exactly.
    fn name(&self) -> &str;

    /// Feed one opaque client response into the state machine.
    fn handle_response(&mut self, response: &[u8]) -> Result<()>;

    /// Token to send back to the peer, if the current round produced one.
    fn next_token(&mut self) -> Result<Option<Vec<u8>>>;

    /// Current handshake phase.
    fn phase(&self) -> Phase;

    /// Whether the security context is fully established.
    fn is_complete(&self) -> bool {
        matches!(self.phase(), Phase::Complete)
    }

    /// Authenticated client identity. Meaningful only once complete.
    fn client_principal(&self) -> Option<String>;

    /// Authenticated server identity. Meaningful only once complete.
    fn server_principal(&self) -> Option<String>;

    /// Protect one application message for the established channel.
    fn wrap(&mut self, plaintext: &[u8]) -> Result<Vec<u8>>;

    /// Recover one application message from its protected form.
    fn unwrap(&mut self, wrapped: &[u8]) -> Result<Vec<u8>>;
}
