//! Layered decryption over hostile ciphertext and pads
//!
//! Run with: cargo fuzz run layered_decrypt

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use stratum_test::layered_encryption;

#[derive(Arbitrary, Debug)]
struct Input {
    ciphertext: Vec<u8>,
    one_time_pad: Vec<u8>,
}

fuzz_target!(|input: Input| {
    let cascade = layered_encryption();
    let _ = cascade.layered_decrypt_data(&input.ciphertext, &input.one_time_pad);
});
