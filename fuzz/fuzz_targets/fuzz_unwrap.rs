#![no_main]

use bytes::BytesMut;
use libfuzzer_sys::fuzz_target;
use sasl_channel::mechanism::{Phase, SecurityMechanism};
use sasl_channel::protocol::framing::SecureFramer;
use sasl_channel::protocol::session::HandshakeSession;
use sasl_channel::{Result, WireEncoding};

struct PassthroughMechanism;

impl SecurityMechanism for PassthroughMechanism {
    fn name(&self) -> &str {
        "passthrough"
    }
    fn handle_response(&mut self, _response: &[u8]) -> Result<()> {
        Ok(())
    }
    fn next_token(&mut self) -> Result<Option<Vec<u8>>> {
        Ok(None)
    }
    fn phase(&self) -> Phase {
        Phase::Complete
    }
    fn client_principal(&self) -> Option<String> {
        None
    }
    fn server_principal(&self) -> Option<String> {
        None
    }
    fn wrap(&mut self, plaintext: &[u8]) -> Result<Vec<u8>> {
        Ok(plaintext.to_vec())
    }
    fn unwrap(&mut self, wrapped: &[u8]) -> Result<Vec<u8>> {
        Ok(wrapped.to_vec())
    }
}

fuzz_target!(|data: &[u8]| {
    let session =
        HandshakeSession::new(Box::new(PassthroughMechanism), WireEncoding::Binary).into_shared();
    let framer = SecureFramer::new(session);

    // Draining arbitrary bytes must never panic and never consume a
    // partial frame.
    let mut queue = BytesMut::from(data);
    loop {
        match framer.unwrap(&mut queue) {
            Ok((Some(_), _)) => continue,
            Ok((None, _)) | Err(_) => break,
        }
    }
});
