//! Digital envelope properties
//!
//! Opening inverts sealing. Without a MAC the envelope carries no tag and
//! ciphertext tampering goes unnoticed; with a MAC any tampering of the
//! ciphertext or tag is rejected before decryption.

use proptest::prelude::*;
use stratum_core::StratumError;
use stratum_test::{digital_envelope, flip_bit};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn open_inverts_seal(authenticated in any::<bool>(), message in prop::collection::vec(any::<u8>(), 0..256)) {
        let mut protocol = digital_envelope(authenticated);
        let sealed = protocol.seal_envelope(&message).unwrap();
        prop_assert_eq!(sealed.authentication_tag.is_empty(), !authenticated);
        prop_assert_eq!(protocol.open_envelope(&sealed).unwrap(), message);
    }

    #[test]
    fn mac_rejects_ciphertext_tampering(
        message in prop::collection::vec(any::<u8>(), 1..128),
        bit_seed in any::<usize>(),
    ) {
        let mut protocol = digital_envelope(true);
        let mut sealed = protocol.seal_envelope(&message).unwrap();
        let bit = bit_seed % (sealed.cipher_data.len() * 8);
        flip_bit(&mut sealed.cipher_data, bit);
        prop_assert_eq!(protocol.open_envelope(&sealed), Err(StratumError::Authentication));
    }

    #[test]
    fn mac_rejects_tag_tampering(message in prop::collection::vec(any::<u8>(), 0..128), bit in 0usize..256) {
        let mut protocol = digital_envelope(true);
        let mut sealed = protocol.seal_envelope(&message).unwrap();
        flip_bit(&mut sealed.authentication_tag, bit);
        prop_assert_eq!(protocol.open_envelope(&sealed), Err(StratumError::Authentication));
    }
}

#[test]
fn test_unauthenticated_envelope_misses_tampering() {
    let mut protocol = digital_envelope(false);
    let message = b"thirty-two bytes of envelope msg".to_vec();
    let mut sealed = protocol.seal_envelope(&message).unwrap();
    assert!(sealed.authentication_tag.is_empty());

    // Flip a bit in the first block; CBC carries it into block two, the
    // padding block stays intact
    flip_bit(&mut sealed.cipher_data, 3);
    let opened = protocol.open_envelope(&sealed).unwrap();
    assert_eq!(opened.len(), message.len());
    assert_ne!(opened, message);
}

#[test]
fn test_envelope_key_and_iv_are_sealed_separately() {
    let mut protocol = digital_envelope(false);
    let sealed = protocol.seal_envelope(b"payload").unwrap();
    assert_eq!(sealed.key.len(), 256);
    assert_eq!(sealed.iv.len(), 256);
    assert_ne!(sealed.key, sealed.iv);
}
