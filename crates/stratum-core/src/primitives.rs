//! Capability contracts implemented by the primitive layer.
//!
//! Protocols own boxed trait objects; `box_clone` gives each clone its
//! own key state.

use std::fmt;

use crate::{CipherFormat, KeyPair, StratumResult};

/// Keyed symmetric cipher holding its own key, IV and output format.
///
/// Key and IV setters never fail: material of the wrong length is fitted
/// to the algorithm when an operation runs.
pub trait SymmetricCipher: Send + Sync + fmt::Debug {
    fn secret_key(&self) -> &[u8];

    fn set_secret_key(&mut self, key: &[u8]);

    fn initialization_vector(&self) -> &[u8];

    fn set_initialization_vector(&mut self, iv: &[u8]);

    fn cipher_format(&self) -> CipherFormat;

    fn set_cipher_format(&mut self, format: CipherFormat);

    /// Encrypt and encode in the configured format
    fn encrypt_data(&self, plaintext: &[u8]) -> StratumResult<Vec<u8>>;

    /// Decode from the configured format and decrypt
    fn decrypt_data(&self, ciphertext: &[u8]) -> StratumResult<Vec<u8>>;

    fn box_clone(&self) -> Box<dyn SymmetricCipher>;
}

impl Clone for Box<dyn SymmetricCipher> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}

/// Public-key encryption
pub trait AsymmetricCipher: Send + Sync + fmt::Debug {
    fn set_key_pair(&mut self, key_pair: KeyPair) -> StratumResult<()>;

    fn has_public_key(&self) -> bool;

    fn has_private_key(&self) -> bool;

    fn encrypt_data(&self, plaintext: &[u8]) -> StratumResult<Vec<u8>>;

    fn decrypt_data(&self, ciphertext: &[u8]) -> StratumResult<Vec<u8>>;

    fn box_clone(&self) -> Box<dyn AsymmetricCipher>;
}

impl Clone for Box<dyn AsymmetricCipher> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}

/// Public-key signatures
pub trait SignatureScheme: Send + Sync + fmt::Debug {
    fn set_key_pair(&mut self, key_pair: KeyPair) -> StratumResult<()>;

    fn sign_data(&self, data: &[u8]) -> StratumResult<Vec<u8>>;

    /// Returns `Ok(false)` for a well-formed but wrong signature
    fn verify_data_signature(&self, signature: &[u8], data: &[u8]) -> StratumResult<bool>;

    fn box_clone(&self) -> Box<dyn SignatureScheme>;
}

impl Clone for Box<dyn SignatureScheme> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}

/// Keyed hash (MAC) with an optional salt
pub trait KeyedHashFunction: Send + Sync + fmt::Debug {
    fn key(&self) -> &[u8];

    fn set_key(&mut self, key: &[u8]);

    fn salt(&self) -> &[u8];

    fn set_salt(&mut self, salt: &[u8]);

    /// Length of `hash_data` output in its configured format
    fn digest_size(&self) -> usize;

    fn hash_data(&self, data: &[u8]) -> StratumResult<Vec<u8>>;

    /// Recompute and compare in constant time
    fn verify_hash(&self, data: &[u8], tag: &[u8]) -> StratumResult<bool>;

    fn box_clone(&self) -> Box<dyn KeyedHashFunction>;
}

impl Clone for Box<dyn KeyedHashFunction> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}

/// Stretches or expands input into key material
pub trait KeyDerivationFunction: Send + Sync + fmt::Debug {
    fn hash_data(&self, input: &[u8]) -> StratumResult<Vec<u8>>;

    fn box_clone(&self) -> Box<dyn KeyDerivationFunction>;
}

impl Clone for Box<dyn KeyDerivationFunction> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}

/// Source of random bytes
pub trait RandomnessSource: Send + Sync + fmt::Debug {
    fn get_bytes(&mut self, len: usize) -> Vec<u8>;

    fn box_clone(&self) -> Box<dyn RandomnessSource>;
}

impl Clone for Box<dyn RandomnessSource> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}
