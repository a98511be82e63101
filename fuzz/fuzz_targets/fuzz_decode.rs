#![no_main]

use libfuzzer_sys::fuzz_target;
use sasl_channel::core::codec::{decode_with_fallback, WireEncoding};
use sasl_channel::core::envelope::{SaslReply, SaslStart};

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must never panic the decoder, under either primary
    // encoding, and body decoding must fail cleanly on garbage.
    for primary in [WireEncoding::Binary, WireEncoding::Compact] {
        if let Ok((envelope, used)) = decode_with_fallback(data, primary) {
            let _ = used.decode_body::<SaslStart>(&envelope.body);
            let _ = used.decode_body::<SaslReply>(&envelope.body);
        }
    }
});
