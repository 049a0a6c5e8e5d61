//! Resolution of cipher identifiers to configured cipher instances

use stratum_core::{BlockMode, EncryptionLayer, StratumResult, SymmetricCipher};

use crate::{SymmetricAlgorithm, SymmetricBlockCipher};

/// Identifiers accepted by [`build_cipher`], in canonical spelling
pub fn registered_ciphers() -> impl Iterator<Item = &'static str> {
    SymmetricAlgorithm::ALL.into_iter().map(SymmetricAlgorithm::name)
}

/// Build a fully configured cipher for one cascade layer.
///
/// Unknown cipher identifiers are configuration errors; unknown block
/// modes are unsupported-mode errors.
pub fn build_cipher(layer: &EncryptionLayer) -> StratumResult<Box<dyn SymmetricCipher>> {
    let algorithm: SymmetricAlgorithm = layer.cipher.parse()?;
    let mode: BlockMode = layer.mode.parse()?;

    let cipher = SymmetricBlockCipher::new(algorithm)
        .with_key(&layer.key)
        .with_iv(&layer.iv)
        .with_mode(mode)
        .with_padding(layer.padding)
        .with_format(layer.format);

    tracing::debug!(cipher = %algorithm, mode = %mode, "resolved cascade layer");
    Ok(Box::new(cipher))
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratum_core::CipherFormat;

    #[test]
    fn test_build_registered_cipher() {
        let layer = EncryptionLayer::new("aes-256", b"key", b"iv", "ctr").with_format(CipherFormat::Hex);
        let cipher = build_cipher(&layer).unwrap();
        assert_eq!(cipher.secret_key(), b"key");
        assert_eq!(cipher.cipher_format(), CipherFormat::Hex);

        let ciphertext = cipher.encrypt_data(b"layer").unwrap();
        assert_eq!(cipher.decrypt_data(&ciphertext).unwrap(), b"layer");
    }

    #[test]
    fn test_unknown_cipher_is_configuration_error() {
        let layer = EncryptionLayer::new("RC4-128", b"key", b"", "CBC");
        assert!(build_cipher(&layer).unwrap_err().is_configuration());
    }

    #[test]
    fn test_unknown_mode_is_unsupported() {
        let layer = EncryptionLayer::new("AES-128", b"key", b"", "GCM");
        assert!(build_cipher(&layer).unwrap_err().is_unsupported_mode());
    }

    #[test]
    fn test_registered_names_resolve() {
        for name in registered_ciphers() {
            assert!(name.parse::<SymmetricAlgorithm>().is_ok(), "{}", name);
        }
        assert_eq!(registered_ciphers().count(), 6);
    }
}
