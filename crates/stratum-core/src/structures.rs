//! Records exchanged between callers and protocols

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::{CipherFormat, Padding};

/// Output of authenticated encryption.
///
/// `authentication_tag` is empty when the tag travels inside
/// `cipher_data` (MAC-then-Encrypt).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CipherDataStructure {
    pub cipher_data: Vec<u8>,
    pub authentication_tag: Vec<u8>,
}

impl CipherDataStructure {
    pub fn new(cipher_data: Vec<u8>, authentication_tag: Vec<u8>) -> Self {
        CipherDataStructure {
            cipher_data,
            authentication_tag,
        }
    }
}

/// A sealed envelope; key and IV are encrypted for the recipient's key pair
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeData {
    pub key: Vec<u8>,
    pub iv: Vec<u8>,
    pub cipher_data: Vec<u8>,
    /// Empty when the envelope was sealed without a MAC function
    pub authentication_tag: Vec<u8>,
}

/// Diffie-Hellman parameters and key pair of one party.
///
/// `private_key` must stay local; only the other three fields go to the peer.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeInformation {
    /// Prime modulus, hexadecimal
    pub prime: String,
    /// Generator, hexadecimal
    pub generator: String,
    /// Base64 private record (domain parameters plus exponent)
    pub private_key: String,
    /// Base64 big-endian public value
    pub public_key: String,
}

impl ExchangeInformation {
    /// Copy without the private key, suitable for sending to the peer
    pub fn public_part(&self) -> ExchangeInformation {
        ExchangeInformation {
            prime: self.prime.clone(),
            generator: self.generator.clone(),
            private_key: String::new(),
            public_key: self.public_key.clone(),
        }
    }
}

impl Drop for ExchangeInformation {
    fn drop(&mut self) {
        self.private_key.zeroize();
    }
}

impl fmt::Debug for ExchangeInformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExchangeInformation")
            .field("prime", &self.prime)
            .field("generator", &self.generator)
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

/// Configuration of one cascade stage
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptionLayer {
    /// Registered cipher identifier, e.g. `"AES-256"` or `"Camellia128"`
    pub cipher: String,
    #[serde(default)]
    pub key: Vec<u8>,
    #[serde(default)]
    pub iv: Vec<u8>,
    /// Block mode identifier, e.g. `"CBC"`
    pub mode: String,
    #[serde(default)]
    pub padding: Padding,
    #[serde(default)]
    pub format: CipherFormat,
}

impl EncryptionLayer {
    pub fn new(cipher: impl Into<String>, key: &[u8], iv: &[u8], mode: impl Into<String>) -> Self {
        EncryptionLayer {
            cipher: cipher.into(),
            key: key.to_vec(),
            iv: iv.to_vec(),
            mode: mode.into(),
            padding: Padding::default(),
            format: CipherFormat::default(),
        }
    }

    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_format(mut self, format: CipherFormat) -> Self {
        self.format = format;
        self
    }
}

impl Drop for EncryptionLayer {
    fn drop(&mut self) {
        self.key.zeroize();
        self.iv.zeroize();
    }
}

impl fmt::Debug for EncryptionLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptionLayer")
            .field("cipher", &self.cipher)
            .field("mode", &self.mode)
            .field("padding", &self.padding)
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}

/// Challenge issued during entity authentication
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticationToken {
    /// Plaintext challenge, kept by the verifier
    pub token_data: Vec<u8>,
    /// Encrypted challenge, sent to the claimant
    pub cipher_data: Vec<u8>,
}

/// Asymmetric key pair as base64 DER (PKCS#8 private, SPKI public).
/// An empty `private_key` denotes a public-only pair.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPair {
    pub private_key: String,
    pub public_key: String,
}

impl KeyPair {
    pub fn new(private_key: impl Into<String>, public_key: impl Into<String>) -> Self {
        KeyPair {
            private_key: private_key.into(),
            public_key: public_key.into(),
        }
    }

    pub fn public_only(public_key: impl Into<String>) -> Self {
        KeyPair {
            private_key: String::new(),
            public_key: public_key.into(),
        }
    }

    pub fn has_private_key(&self) -> bool {
        !self.private_key.is_empty()
    }
}

impl Drop for KeyPair {
    fn drop(&mut self) {
        self.private_key.zeroize();
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &self.public_key)
            .field("has_private_key", &self.has_private_key())
            .finish()
    }
}
