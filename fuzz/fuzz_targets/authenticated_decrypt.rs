//! Authenticated decryption over hostile cipher data and tags
//!
//! Run with: cargo fuzz run authenticated_decrypt

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use stratum_core::{AuthenticationMode, CipherDataStructure};
use stratum_test::authenticated_encryption;

#[derive(Arbitrary, Debug)]
struct Input {
    mode: u8,
    cipher_data: Vec<u8>,
    authentication_tag: Vec<u8>,
}

fuzz_target!(|input: Input| {
    let mode = match AuthenticationMode::from_id(input.mode % 3 + 1) {
        Ok(mode) => mode,
        Err(_) => return,
    };
    let mut protocol = authenticated_encryption(mode);

    let forged = CipherDataStructure::new(input.cipher_data, input.authentication_tag);
    // A forgery must never authenticate
    if let Ok(plaintext) = protocol.authenticated_decrypt_data(forged) {
        panic!("forged structure accepted, {} bytes released", plaintext.len());
    }
});
