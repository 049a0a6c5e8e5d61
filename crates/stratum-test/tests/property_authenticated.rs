//! Authenticated encryption properties
//!
//! For every mode, decryption inverts encryption over arbitrary bytes,
//! and any single-bit change to a standalone tag is rejected as an
//! authentication failure.

use proptest::prelude::*;
use stratum_core::{AuthenticationMode, StratumError};
use stratum_test::{authenticated_encryption, flip_bit};

fn arb_mode() -> impl Strategy<Value = AuthenticationMode> {
    prop_oneof![
        Just(AuthenticationMode::EncryptAndMac),
        Just(AuthenticationMode::MacThenEncrypt),
        Just(AuthenticationMode::EncryptThenMac),
    ]
}

fn arb_tagged_mode() -> impl Strategy<Value = AuthenticationMode> {
    prop_oneof![
        Just(AuthenticationMode::EncryptAndMac),
        Just(AuthenticationMode::EncryptThenMac),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn decrypt_inverts_encrypt(mode in arb_mode(), message in prop::collection::vec(any::<u8>(), 0..512)) {
        let mut protocol = authenticated_encryption(mode);
        let sealed = protocol.authenticated_encrypt_data(&message).unwrap();
        prop_assert_eq!(sealed.authentication_tag.is_empty(), !mode.has_standalone_tag());
        prop_assert_eq!(protocol.authenticated_decrypt_data(sealed).unwrap(), message);
    }

    #[test]
    fn any_tag_bit_flip_is_rejected(
        mode in arb_tagged_mode(),
        message in prop::collection::vec(any::<u8>(), 0..128),
        bit in 0usize..384,
    ) {
        let mut protocol = authenticated_encryption(mode);
        let mut sealed = protocol.authenticated_encrypt_data(&message).unwrap();
        prop_assert!(flip_bit(&mut sealed.authentication_tag, bit));
        prop_assert_eq!(protocol.authenticated_decrypt_data(sealed), Err(StratumError::Authentication));
    }

    #[test]
    fn standalone_tag_rejected_in_mac_then_encrypt(
        message in prop::collection::vec(any::<u8>(), 0..128),
        tag in prop::collection::vec(any::<u8>(), 1..64),
    ) {
        let mut protocol = authenticated_encryption(AuthenticationMode::MacThenEncrypt);
        let mut sealed = protocol.authenticated_encrypt_data(&message).unwrap();
        sealed.authentication_tag = tag;
        prop_assert_eq!(protocol.authenticated_decrypt_data(sealed), Err(StratumError::Authentication));
    }

    #[test]
    fn ciphertext_bit_flip_never_yields_plaintext(
        mode in arb_mode(),
        message in prop::collection::vec(any::<u8>(), 1..128),
        bit_seed in any::<usize>(),
    ) {
        let mut protocol = authenticated_encryption(mode);
        let mut sealed = protocol.authenticated_encrypt_data(&message).unwrap();
        let bit = bit_seed % (sealed.cipher_data.len() * 8);
        flip_bit(&mut sealed.cipher_data, bit);
        prop_assert_eq!(protocol.authenticated_decrypt_data(sealed), Err(StratumError::Authentication));
    }
}
