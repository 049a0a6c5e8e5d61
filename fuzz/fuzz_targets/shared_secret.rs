//! Shared-secret computation over hostile key encodings
//!
//! Run with: cargo fuzz run shared_secret

#![no_main]

use std::sync::OnceLock;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use stratum_core::ExchangeInformation;
use stratum_test::key_exchange;

#[derive(Arbitrary, Debug)]
struct Input<'a> {
    remote_public: &'a str,
    local_private: &'a str,
    use_valid_private: bool,
}

fn local_request() -> &'static ExchangeInformation {
    static REQUEST: OnceLock<ExchangeInformation> = OnceLock::new();
    REQUEST.get_or_init(|| {
        key_exchange()
            .generate_exchange_request_information()
            .expect("fixture exchange failed")
    })
}

fuzz_target!(|input: Input| {
    let kx = key_exchange();
    let private = if input.use_valid_private {
        local_request().private_key.as_str()
    } else {
        input.local_private
    };
    let _ = kx.compute_shared_secret(input.remote_public, private);
});
