//! RSA encryption (OAEP, PKCS#1 v1.5) and RSA-PSS signatures

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use rand::rngs::OsRng;
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey};
use rsa::pss::{Signature, SigningKey, VerifyingKey};
use rsa::signature::{RandomizedSigner, SignatureEncoding, Verifier};
use rsa::{Oaep, Pkcs1v15Encrypt, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;

use stratum_core::{
    AsymmetricCipher, CipherFormat, KeyPair, SignatureScheme, StratumError, StratumResult,
};

/// Supported RSA modulus sizes in bits
pub const RSA_KEY_SIZES: [usize; 4] = [1024, 2048, 3072, 4096];

/// Generate a fresh RSA key pair encoded as base64 DER
pub fn generate_key_pair(bits: usize) -> StratumResult<KeyPair> {
    if !RSA_KEY_SIZES.contains(&bits) {
        return Err(StratumError::validation(format!(
            "unsupported RSA key size {} bits, expected one of {:?}",
            bits, RSA_KEY_SIZES
        )));
    }

    let private = RsaPrivateKey::new(&mut OsRng, bits)
        .map_err(|e| StratumError::system(format!("RSA key generation failed: {}", e)))?;
    let public = RsaPublicKey::from(&private);

    let private_der = private
        .to_pkcs8_der()
        .map_err(|e| StratumError::system(format!("PKCS#8 encoding failed: {}", e)))?;
    let public_der = public
        .to_public_key_der()
        .map_err(|e| StratumError::system(format!("SPKI encoding failed: {}", e)))?;

    Ok(KeyPair::new(
        STANDARD.encode(private_der.as_bytes()),
        STANDARD.encode(public_der.as_bytes()),
    ))
}

/// Parsed RSA key material
#[derive(Clone, Default)]
struct RsaKeys {
    private: Option<RsaPrivateKey>,
    public: Option<RsaPublicKey>,
}

impl RsaKeys {
    fn parse(key_pair: &KeyPair) -> StratumResult<Self> {
        let private = if key_pair.has_private_key() {
            let der = STANDARD
                .decode(key_pair.private_key.as_bytes())
                .map_err(|_| StratumError::validation("private key is not valid base64"))?;
            Some(
                RsaPrivateKey::from_pkcs8_der(&der)
                    .map_err(|_| StratumError::validation("private key is not PKCS#8 RSA DER"))?,
            )
        } else {
            None
        };

        let public = if key_pair.public_key.is_empty() {
            private.as_ref().map(RsaPublicKey::from)
        } else {
            let der = STANDARD
                .decode(key_pair.public_key.as_bytes())
                .map_err(|_| StratumError::validation("public key is not valid base64"))?;
            Some(
                RsaPublicKey::from_public_key_der(&der)
                    .map_err(|_| StratumError::validation("public key is not SPKI RSA DER"))?,
            )
        };

        if let (Some(private), Some(public)) = (&private, &public) {
            if &RsaPublicKey::from(private) != public {
                return Err(StratumError::validation("public key does not match private key"));
            }
        }

        Ok(RsaKeys { private, public })
    }

    fn public(&self) -> StratumResult<&RsaPublicKey> {
        self.public
            .as_ref()
            .ok_or_else(|| StratumError::configuration("no RSA public key configured"))
    }

    fn private(&self) -> StratumResult<&RsaPrivateKey> {
        self.private
            .as_ref()
            .ok_or_else(|| StratumError::configuration("no RSA private key configured"))
    }
}

/// RSA encryption padding
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum RsaPadding {
    /// OAEP with SHA-256
    #[default]
    Oaep,
    Pkcs1v15,
}

/// RSA public-key encryption
#[derive(Clone, Default)]
pub struct RsaCipher {
    keys: RsaKeys,
    padding: RsaPadding,
    format: CipherFormat,
}

impl RsaCipher {
    pub fn new() -> Self {
        RsaCipher::default()
    }

    pub fn with_key_pair(mut self, key_pair: KeyPair) -> StratumResult<Self> {
        self.set_key_pair(key_pair)?;
        Ok(self)
    }

    pub fn with_padding(mut self, padding: RsaPadding) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_format(mut self, format: CipherFormat) -> Self {
        self.format = format;
        self
    }
}

impl AsymmetricCipher for RsaCipher {
    fn set_key_pair(&mut self, key_pair: KeyPair) -> StratumResult<()> {
        self.keys = RsaKeys::parse(&key_pair)?;
        Ok(())
    }

    fn has_public_key(&self) -> bool {
        self.keys.public.is_some()
    }

    fn has_private_key(&self) -> bool {
        self.keys.private.is_some()
    }

    fn encrypt_data(&self, plaintext: &[u8]) -> StratumResult<Vec<u8>> {
        let public = self.keys.public()?;
        let raw = match self.padding {
            RsaPadding::Oaep => public.encrypt(&mut OsRng, Oaep::new::<Sha256>(), plaintext),
            RsaPadding::Pkcs1v15 => public.encrypt(&mut OsRng, Pkcs1v15Encrypt, plaintext),
        }
        .map_err(|e| StratumError::system(format!("RSA encryption failed: {}", e)))?;
        Ok(self.format.encode(&raw))
    }

    fn decrypt_data(&self, ciphertext: &[u8]) -> StratumResult<Vec<u8>> {
        let private = self.keys.private()?;
        let raw = self.format.decode(ciphertext)?;
        match self.padding {
            RsaPadding::Oaep => private.decrypt(Oaep::new::<Sha256>(), &raw),
            RsaPadding::Pkcs1v15 => private.decrypt(Pkcs1v15Encrypt, &raw),
        }
        .map_err(|_| StratumError::system("RSA decryption failed"))
    }

    fn box_clone(&self) -> Box<dyn AsymmetricCipher> {
        Box::new(self.clone())
    }
}

impl fmt::Debug for RsaCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaCipher")
            .field("padding", &self.padding)
            .field("format", &self.format)
            .field("has_public_key", &self.has_public_key())
            .field("has_private_key", &self.has_private_key())
            .finish()
    }
}

/// RSA-PSS signatures with SHA-256
#[derive(Clone, Default)]
pub struct RsaSigner {
    keys: RsaKeys,
}

impl RsaSigner {
    pub fn new() -> Self {
        RsaSigner::default()
    }

    pub fn with_key_pair(mut self, key_pair: KeyPair) -> StratumResult<Self> {
        self.set_key_pair(key_pair)?;
        Ok(self)
    }
}

impl SignatureScheme for RsaSigner {
    fn set_key_pair(&mut self, key_pair: KeyPair) -> StratumResult<()> {
        self.keys = RsaKeys::parse(&key_pair)?;
        Ok(())
    }

    fn sign_data(&self, data: &[u8]) -> StratumResult<Vec<u8>> {
        let signing_key = SigningKey::<Sha256>::new(self.keys.private()?.clone());
        let signature = signing_key.sign_with_rng(&mut OsRng, data);
        Ok(signature.to_vec())
    }

    fn verify_data_signature(&self, signature: &[u8], data: &[u8]) -> StratumResult<bool> {
        let verifying_key = VerifyingKey::<Sha256>::new(self.keys.public()?.clone());
        let signature = Signature::try_from(signature)
            .map_err(|_| StratumError::validation("malformed RSA-PSS signature"))?;
        Ok(verifying_key.verify(data, &signature).is_ok())
    }

    fn box_clone(&self) -> Box<dyn SignatureScheme> {
        Box::new(self.clone())
    }
}

impl fmt::Debug for RsaSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaSigner")
            .field("has_public_key", &self.keys.public.is_some())
            .field("has_private_key", &self.keys.private.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::OnceLock;

    fn test_key_pair() -> KeyPair {
        static PAIR: OnceLock<KeyPair> = OnceLock::new();
        PAIR.get_or_init(|| generate_key_pair(1024).unwrap()).clone()
    }

    #[test]
    fn test_unsupported_size_rejected() {
        assert!(generate_key_pair(512).unwrap_err().is_validation());
    }

    #[test]
    fn test_oaep_roundtrip() {
        let cipher = RsaCipher::new().with_key_pair(test_key_pair()).unwrap();
        let ciphertext = cipher.encrypt_data(b"session key").unwrap();
        assert_eq!(ciphertext.len(), 128);
        assert_eq!(cipher.decrypt_data(&ciphertext).unwrap(), b"session key");
    }

    #[test]
    fn test_pkcs1v15_roundtrip_base64() {
        let cipher = RsaCipher::new()
            .with_padding(RsaPadding::Pkcs1v15)
            .with_format(CipherFormat::Base64)
            .with_key_pair(test_key_pair())
            .unwrap();
        let ciphertext = cipher.encrypt_data(b"iv material").unwrap();
        assert_eq!(cipher.decrypt_data(&ciphertext).unwrap(), b"iv material");
    }

    #[test]
    fn test_public_only_cannot_decrypt() {
        let pair = test_key_pair();
        let sealer = RsaCipher::new()
            .with_key_pair(KeyPair::public_only(pair.public_key.clone()))
            .unwrap();
        assert!(sealer.has_public_key());
        assert!(!sealer.has_private_key());

        let ciphertext = sealer.encrypt_data(b"x").unwrap();
        assert!(sealer.decrypt_data(&ciphertext).unwrap_err().is_configuration());
    }

    #[test]
    fn test_malformed_key_pair() {
        let err = RsaCipher::new()
            .with_key_pair(KeyPair::public_only("not base64!"))
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_pss_sign_verify() {
        let signer = RsaSigner::new().with_key_pair(test_key_pair()).unwrap();
        let signature = signer.sign_data(b"challenge").unwrap();
        assert!(signer.verify_data_signature(&signature, b"challenge").unwrap());
        assert!(!signer.verify_data_signature(&signature, b"other").unwrap());
    }

    #[test]
    fn test_debug_hides_key() {
        let cipher = RsaCipher::new().with_key_pair(test_key_pair()).unwrap();
        let printed = format!("{:?}", cipher);
        assert!(printed.contains("has_private_key: true"));
        assert!(!printed.contains("primes"));
    }
}
