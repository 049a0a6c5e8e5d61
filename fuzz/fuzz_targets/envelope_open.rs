//! Envelope opening over hostile envelopes
//!
//! Run with: cargo fuzz run envelope_open

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use stratum_core::EnvelopeData;
use stratum_test::digital_envelope;

#[derive(Arbitrary, Debug)]
struct Input {
    authenticated: bool,
    key: Vec<u8>,
    iv: Vec<u8>,
    cipher_data: Vec<u8>,
    authentication_tag: Vec<u8>,
}

fuzz_target!(|input: Input| {
    let mut protocol = digital_envelope(input.authenticated);
    let envelope = EnvelopeData {
        key: input.key,
        iv: input.iv,
        cipher_data: input.cipher_data,
        authentication_tag: input.authentication_tag,
    };
    let _ = protocol.open_envelope(&envelope);
});
