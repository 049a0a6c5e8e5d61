//! Layered (cascade) encryption over heterogeneous ciphers
//!
//! Each layer is an independently keyed cipher resolved from an
//! [`EncryptionLayer`] record. An optional one-time pad is XORed into the
//! plaintext before the first layer.

use zeroize::Zeroizing;

use stratum_core::{EncryptionLayer, StratumError, StratumResult, SymmetricCipher};
use stratum_primitives::build_cipher;

/// Minimum number of layers in a cascade
pub const MIN_LAYERS: usize = 2;

/// Cascade of independently configured ciphers
#[derive(Clone, Debug)]
pub struct LayeredEncryption {
    layers: Vec<Box<dyn SymmetricCipher>>,
}

impl LayeredEncryption {
    /// Resolve every layer. Fewer than two layers, or an unregistered
    /// cipher identifier, is a configuration error.
    pub fn new(layers: &[EncryptionLayer]) -> StratumResult<Self> {
        if layers.len() < MIN_LAYERS {
            return Err(StratumError::configuration(format!(
                "layered encryption needs at least {} layers, got {}",
                MIN_LAYERS,
                layers.len()
            )));
        }

        let layers = layers.iter().map(build_cipher).collect::<StratumResult<Vec<_>>>()?;
        tracing::debug!(layers = layers.len(), "cascade configured");
        Ok(LayeredEncryption { layers })
    }

    /// Append a layer after the existing ones
    pub fn add_layer(&mut self, layer: &EncryptionLayer) -> StratumResult<()> {
        self.layers.push(build_cipher(layer)?);
        Ok(())
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn layers(&self) -> impl Iterator<Item = &dyn SymmetricCipher> {
        self.layers.iter().map(|layer| layer.as_ref())
    }

    /// Mask with `one_time_pad` (if not blank), then run every layer in
    /// declared order
    pub fn layered_encrypt_data(&self, plaintext: &[u8], one_time_pad: &[u8]) -> StratumResult<Vec<u8>> {
        tracing::debug!(
            layers = self.layers.len(),
            len = plaintext.len(),
            padded = !is_blank(one_time_pad),
            "layered encrypt"
        );

        let mut data = plaintext.to_vec();
        if !is_blank(one_time_pad) {
            apply_one_time_pad(&mut data, one_time_pad);
        }

        for layer in &self.layers {
            data = layer.encrypt_data(&data)?;
        }
        Ok(data)
    }

    /// Run every layer in reverse order, then remove the one-time pad
    pub fn layered_decrypt_data(&self, ciphertext: &[u8], one_time_pad: &[u8]) -> StratumResult<Vec<u8>> {
        tracing::debug!(layers = self.layers.len(), len = ciphertext.len(), "layered decrypt");

        let mut data = ciphertext.to_vec();
        for layer in self.layers.iter().rev() {
            data = layer.decrypt_data(&data)?;
        }

        if !is_blank(one_time_pad) {
            apply_one_time_pad(&mut data, one_time_pad);
        }
        Ok(data)
    }
}

/// Empty, or only whitespace and NUL bytes
fn is_blank(pad: &[u8]) -> bool {
    pad.iter()
        .all(|byte| matches!(byte, b' ' | b'\t' | b'\n' | b'\r' | b'\0' | 0x0b))
}

/// XOR `pad` into `data`. A pad shorter than the data is zero-extended to
/// the data length first, so bytes past the pad are left unmasked rather
/// than masked by a repeating pad.
fn apply_one_time_pad(data: &mut [u8], pad: &[u8]) {
    let mut pad = Zeroizing::new(pad.to_vec());
    if pad.len() < data.len() {
        pad.resize(data.len(), 0);
    }
    for (i, byte) in data.iter_mut().enumerate() {
        *byte ^= pad[i % pad.len()];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use stratum_core::{CipherFormat, Padding};

    fn two_layers() -> Vec<EncryptionLayer> {
        vec![
            EncryptionLayer::new("AES-256", b"first layer key", b"first iv", "CBC"),
            EncryptionLayer::new("Camellia128", b"second layer key", b"second iv", "CTR")
                .with_format(CipherFormat::Base64),
        ]
    }

    #[test]
    fn test_roundtrip_without_pad() {
        let cascade = LayeredEncryption::new(&two_layers()).unwrap();
        let ciphertext = cascade.layered_encrypt_data(b"cascade me", b"").unwrap();
        assert!(ciphertext.is_ascii());
        assert_eq!(cascade.layered_decrypt_data(&ciphertext, b"").unwrap(), b"cascade me");
    }

    #[test]
    fn test_roundtrip_with_pad() {
        let cascade = LayeredEncryption::new(&two_layers()).unwrap();
        let pads: [&[u8]; 3] = [b"k", b"a pad longer than the message itself", b"\x00secret\x00"];
        for pad in pads {
            let ciphertext = cascade.layered_encrypt_data(b"masked payload", pad).unwrap();
            assert_eq!(
                cascade.layered_decrypt_data(&ciphertext, pad).unwrap(),
                b"masked payload"
            );
        }
    }

    #[test]
    fn test_wrong_pad_garbles() {
        let cascade = LayeredEncryption::new(&two_layers()).unwrap();
        let ciphertext = cascade.layered_encrypt_data(b"masked payload", b"right").unwrap();
        let opened = cascade.layered_decrypt_data(&ciphertext, b"wrong").unwrap();
        assert_ne!(opened, b"masked payload");
    }

    #[test]
    fn test_short_pad_masks_prefix_only() {
        let mut data = b"abcdef".to_vec();
        apply_one_time_pad(&mut data, &[0xff, 0xff]);
        assert_eq!(data, [b'a' ^ 0xff, b'b' ^ 0xff, b'c', b'd', b'e', b'f']);
    }

    #[test]
    fn test_long_pad_uses_prefix() {
        let mut data = vec![0u8; 3];
        apply_one_time_pad(&mut data, b"xyzw");
        assert_eq!(data, b"xyz");
    }

    proptest! {
        #[test]
        fn test_pad_is_an_involution(
            data in prop::collection::vec(any::<u8>(), 0..128),
            pad in prop::collection::vec(any::<u8>(), 1..64),
        ) {
            let mut masked = data.clone();
            apply_one_time_pad(&mut masked, &pad);
            apply_one_time_pad(&mut masked, &pad);
            prop_assert_eq!(masked, data);
        }
    }

    #[test]
    fn test_blank_pads() {
        assert!(is_blank(b""));
        assert!(is_blank(b" \t\r\n\0\x0b"));
        assert!(!is_blank(b" x "));

        let cascade = LayeredEncryption::new(&two_layers()).unwrap();
        let plain = cascade.layered_encrypt_data(b"data", b"").unwrap();
        let blank = cascade.layered_encrypt_data(b"data", b"   ").unwrap();
        assert_eq!(plain, blank);
    }

    #[test]
    fn test_order_matters() {
        let forward = LayeredEncryption::new(&two_layers()).unwrap();
        let mut reversed_layers = two_layers();
        reversed_layers.reverse();
        let reversed = LayeredEncryption::new(&reversed_layers).unwrap();

        let ciphertext = forward.layered_encrypt_data(b"ordered", b"").unwrap();
        assert!(reversed
            .layered_decrypt_data(&ciphertext, b"")
            .map(|opened| opened != b"ordered")
            .unwrap_or(true));
    }

    #[test]
    fn test_requires_two_layers() {
        let mut layers = two_layers();
        layers.truncate(1);
        assert!(LayeredEncryption::new(&layers).unwrap_err().is_configuration());
        assert!(LayeredEncryption::new(&[]).unwrap_err().is_configuration());
    }

    #[test]
    fn test_unknown_cipher_rejected() {
        let mut layers = two_layers();
        layers.push(EncryptionLayer::new("Serpent-256", b"k", b"", "CBC"));
        assert!(LayeredEncryption::new(&layers).unwrap_err().is_configuration());
    }

    #[test]
    fn test_add_layer() {
        let mut cascade = LayeredEncryption::new(&two_layers()).unwrap();
        cascade
            .add_layer(
                &EncryptionLayer::new("AES-128", b"third", b"", "ECB").with_padding(Padding::Pkcs7),
            )
            .unwrap();
        assert_eq!(cascade.layer_count(), 3);
        let ciphertext = cascade.layered_encrypt_data(b"three deep", b"pad").unwrap();
        assert_eq!(cascade.layered_decrypt_data(&ciphertext, b"pad").unwrap(), b"three deep");
    }
}
