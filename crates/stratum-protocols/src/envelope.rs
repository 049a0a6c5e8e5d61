//! Digital envelope (hybrid encryption)
//!
//! The payload is encrypted under a fresh random session key and IV. Key
//! and IV are then encrypted separately for the recipient's public key.
//! An optional MAC over the symmetric ciphertext adds the integrity the
//! asymmetric layer does not provide.

use stratum_core::{
    AsymmetricCipher, CipherStateGuard, EnvelopeConfig, EnvelopeData, KeyedHashFunction,
    RandomnessSource, SecretBytes, StratumError, StratumResult, SymmetricCipher,
};

/// Hybrid encryption protocol
#[derive(Clone, Debug)]
pub struct DigitalEnvelope {
    random: Box<dyn RandomnessSource>,
    cipher: Box<dyn SymmetricCipher>,
    asymmetric: Box<dyn AsymmetricCipher>,
    hasher: Option<Box<dyn KeyedHashFunction>>,
    config: EnvelopeConfig,
}

impl DigitalEnvelope {
    /// Create an envelope protocol without integrity protection.
    ///
    /// The asymmetric cipher must hold at least a public key.
    pub fn new(
        random: Box<dyn RandomnessSource>,
        cipher: Box<dyn SymmetricCipher>,
        asymmetric: Box<dyn AsymmetricCipher>,
    ) -> StratumResult<Self> {
        Self::with_config(random, cipher, asymmetric, EnvelopeConfig::default())
    }

    pub fn with_config(
        random: Box<dyn RandomnessSource>,
        cipher: Box<dyn SymmetricCipher>,
        asymmetric: Box<dyn AsymmetricCipher>,
        config: EnvelopeConfig,
    ) -> StratumResult<Self> {
        if !asymmetric.has_public_key() {
            return Err(StratumError::configuration(
                "digital envelope requires an asymmetric cipher with a key pair",
            ));
        }
        if config.key_size == 0 {
            return Err(StratumError::configuration("envelope key size must be positive"));
        }

        Ok(DigitalEnvelope {
            random,
            cipher,
            asymmetric,
            hasher: None,
            config,
        })
    }

    /// Authenticate the symmetric ciphertext with `hasher`
    pub fn with_hasher(mut self, hasher: Box<dyn KeyedHashFunction>) -> Self {
        self.hasher = Some(hasher);
        self
    }

    /// Replace or remove the MAC
    pub fn set_hasher(&mut self, hasher: Option<Box<dyn KeyedHashFunction>>) {
        self.hasher = hasher;
    }

    pub fn has_hasher(&self) -> bool {
        self.hasher.is_some()
    }

    pub fn config(&self) -> &EnvelopeConfig {
        &self.config
    }

    pub fn cipher(&self) -> &dyn SymmetricCipher {
        self.cipher.as_ref()
    }

    /// Encrypt `plaintext` under a fresh session key and seal the key for
    /// the asymmetric key pair
    pub fn seal_envelope(&mut self, plaintext: &[u8]) -> StratumResult<EnvelopeData> {
        tracing::debug!(
            len = plaintext.len(),
            authenticated = self.has_hasher(),
            "sealing envelope"
        );

        let key = SecretBytes::new(self.random.get_bytes(self.config.key_size));
        let iv = SecretBytes::new(self.random.get_bytes(self.config.iv_size));

        let cipher_data = {
            let mut cipher = CipherStateGuard::acquire(self.cipher.as_mut());
            cipher.set_secret_key(&key);
            cipher.set_initialization_vector(&iv);
            cipher.encrypt_data(plaintext)?
        };

        let authentication_tag = match &self.hasher {
            Some(hasher) => hasher.hash_data(&cipher_data)?,
            None => Vec::new(),
        };

        Ok(EnvelopeData {
            key: self.asymmetric.encrypt_data(&key)?,
            iv: self.asymmetric.encrypt_data(&iv)?,
            cipher_data,
            authentication_tag,
        })
    }

    /// Recover the session key and decrypt.
    ///
    /// With a MAC configured the tag is checked before anything is
    /// decrypted; a missing tag counts as a mismatch.
    pub fn open_envelope(&mut self, envelope: &EnvelopeData) -> StratumResult<Vec<u8>> {
        tracing::debug!(len = envelope.cipher_data.len(), "opening envelope");

        if let Some(hasher) = &self.hasher {
            if envelope.authentication_tag.is_empty()
                || !hasher.verify_hash(&envelope.cipher_data, &envelope.authentication_tag)?
            {
                tracing::warn!("envelope authentication tag mismatch");
                return Err(StratumError::Authentication);
            }
        }

        let key = SecretBytes::new(self.asymmetric.decrypt_data(&envelope.key)?);
        let iv = SecretBytes::new(self.asymmetric.decrypt_data(&envelope.iv)?);

        let mut cipher = CipherStateGuard::acquire(self.cipher.as_mut());
        cipher.set_secret_key(&key);
        cipher.set_initialization_vector(&iv);
        cipher.decrypt_data(&envelope.cipher_data)
    }
}
