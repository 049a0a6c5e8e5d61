//! Authenticated encryption from a symmetric cipher and a keyed hash
//!
//! Three orderings are supported:
//! - Encrypt-then-MAC (default): the tag covers the ciphertext and is
//!   checked before anything is decrypted.
//! - Encrypt-and-MAC: cipher and MAC both run under a mutual key and
//!   the tag covers the plaintext.
//! - MAC-then-Encrypt: the tag is appended to the plaintext behind a
//!   delimiter and encrypted with it; no standalone tag is returned.
//!
//! The mutual key is `cipher.key || hasher.key` and the mutual subkey is
//! `cipher.iv || hasher.salt`. This concatenation is a non-standard
//! construction kept for compatibility; review it before reusing it in a
//! new protocol.

use zeroize::Zeroizing;

use stratum_core::{
    AuthenticatedEncryptionConfig, AuthenticationMode, CipherDataStructure, CipherStateGuard,
    HasherStateGuard, KeyedHashFunction, SecretBytes, StratumError, StratumResult,
    SymmetricCipher,
};

/// Separates plaintext from the embedded tag in MAC-then-Encrypt payloads
pub const MAC_DELIMITER: &[u8] = b"::STRATUM-MAC::";

/// Authenticated encryption protocol
#[derive(Clone, Debug)]
pub struct AuthenticatedEncryption {
    cipher: Box<dyn SymmetricCipher>,
    hasher: Box<dyn KeyedHashFunction>,
    config: AuthenticatedEncryptionConfig,
}

impl AuthenticatedEncryption {
    /// Create with the default Encrypt-then-MAC mode
    pub fn new(cipher: Box<dyn SymmetricCipher>, hasher: Box<dyn KeyedHashFunction>) -> Self {
        Self::with_config(cipher, hasher, AuthenticatedEncryptionConfig::default())
    }

    pub fn with_config(
        cipher: Box<dyn SymmetricCipher>,
        hasher: Box<dyn KeyedHashFunction>,
        config: AuthenticatedEncryptionConfig,
    ) -> Self {
        AuthenticatedEncryption {
            cipher,
            hasher,
            config,
        }
    }

    pub fn mode(&self) -> AuthenticationMode {
        self.config.mode
    }

    pub fn set_mode(&mut self, mode: AuthenticationMode) {
        self.config.mode = mode;
    }

    /// Set the mode from its numeric id (1 = E&M, 2 = MtE, 3 = EtM)
    pub fn set_mode_id(&mut self, id: u8) -> StratumResult<()> {
        self.config.mode = AuthenticationMode::from_id(id)?;
        Ok(())
    }

    pub fn cipher(&self) -> &dyn SymmetricCipher {
        self.cipher.as_ref()
    }

    pub fn cipher_mut(&mut self) -> &mut dyn SymmetricCipher {
        self.cipher.as_mut()
    }

    pub fn hasher(&self) -> &dyn KeyedHashFunction {
        self.hasher.as_ref()
    }

    pub fn hasher_mut(&mut self) -> &mut dyn KeyedHashFunction {
        self.hasher.as_mut()
    }

    /// Encrypt and authenticate `plaintext` in the configured mode
    pub fn authenticated_encrypt_data(
        &mut self,
        plaintext: &[u8],
    ) -> StratumResult<CipherDataStructure> {
        tracing::debug!(mode = ?self.config.mode, len = plaintext.len(), "authenticated encrypt");

        match self.config.mode {
            AuthenticationMode::EncryptThenMac => self.encrypt_then_mac(plaintext),
            AuthenticationMode::EncryptAndMac => self.encrypt_and_mac(plaintext),
            AuthenticationMode::MacThenEncrypt => self.mac_then_encrypt(plaintext),
        }
    }

    /// Authenticate and decrypt. No plaintext is returned unless the tag
    /// comparison succeeds.
    pub fn authenticated_decrypt_data(&mut self, data: CipherDataStructure) -> StratumResult<Vec<u8>> {
        tracing::debug!(
            mode = ?self.config.mode,
            len = data.cipher_data.len(),
            "authenticated decrypt"
        );

        let result = match self.config.mode {
            AuthenticationMode::EncryptThenMac => self.decrypt_encrypt_then_mac(data),
            AuthenticationMode::EncryptAndMac => self.decrypt_encrypt_and_mac(data),
            AuthenticationMode::MacThenEncrypt => self.decrypt_mac_then_encrypt(data),
        };

        if let Err(StratumError::Authentication) = &result {
            tracing::warn!(mode = ?self.config.mode, "authentication tag mismatch");
        }
        result
    }

    fn encrypt_then_mac(&self, plaintext: &[u8]) -> StratumResult<CipherDataStructure> {
        let cipher_data = self.cipher.encrypt_data(plaintext)?;
        let tag = self.hasher.hash_data(&cipher_data)?;
        Ok(CipherDataStructure::new(cipher_data, tag))
    }

    fn decrypt_encrypt_then_mac(&self, data: CipherDataStructure) -> StratumResult<Vec<u8>> {
        if !self.hasher.verify_hash(&data.cipher_data, &data.authentication_tag)? {
            return Err(StratumError::Authentication);
        }
        self.cipher.decrypt_data(&data.cipher_data)
    }

    fn encrypt_and_mac(&mut self, plaintext: &[u8]) -> StratumResult<CipherDataStructure> {
        let mut cipher = CipherStateGuard::acquire(self.cipher.as_mut());
        let mut hasher = HasherStateGuard::acquire(self.hasher.as_mut());
        install_mutual_material(&mut cipher, &mut hasher);

        let cipher_data = cipher.encrypt_data(plaintext)?;
        let tag = hasher.hash_data(plaintext)?;
        Ok(CipherDataStructure::new(cipher_data, tag))
    }

    fn decrypt_encrypt_and_mac(&mut self, data: CipherDataStructure) -> StratumResult<Vec<u8>> {
        let mut cipher = CipherStateGuard::acquire(self.cipher.as_mut());
        let mut hasher = HasherStateGuard::acquire(self.hasher.as_mut());
        install_mutual_material(&mut cipher, &mut hasher);

        let mut plaintext = Zeroizing::new(
            cipher
                .decrypt_data(&data.cipher_data)
                .map_err(|_| StratumError::Authentication)?,
        );
        if !hasher.verify_hash(&plaintext, &data.authentication_tag)? {
            return Err(StratumError::Authentication);
        }
        Ok(std::mem::take(&mut *plaintext))
    }

    fn mac_then_encrypt(&mut self, plaintext: &[u8]) -> StratumResult<CipherDataStructure> {
        let mut cipher = CipherStateGuard::acquire(self.cipher.as_mut());
        let mut hasher = HasherStateGuard::acquire(self.hasher.as_mut());
        install_mutual_material(&mut cipher, &mut hasher);

        let tag = hasher.hash_data(plaintext)?;
        let mut payload =
            Zeroizing::new(Vec::with_capacity(plaintext.len() + MAC_DELIMITER.len() + tag.len()));
        payload.extend_from_slice(plaintext);
        payload.extend_from_slice(MAC_DELIMITER);
        payload.extend_from_slice(&tag);

        let cipher_data = cipher.encrypt_data(&payload)?;
        Ok(CipherDataStructure::new(cipher_data, Vec::new()))
    }

    fn decrypt_mac_then_encrypt(&mut self, data: CipherDataStructure) -> StratumResult<Vec<u8>> {
        // A standalone tag means the structure came from another mode
        if !data.authentication_tag.is_empty() {
            return Err(StratumError::Authentication);
        }

        let mut cipher = CipherStateGuard::acquire(self.cipher.as_mut());
        let mut hasher = HasherStateGuard::acquire(self.hasher.as_mut());
        install_mutual_material(&mut cipher, &mut hasher);

        let payload = Zeroizing::new(
            cipher
                .decrypt_data(&data.cipher_data)
                .map_err(|_| StratumError::Authentication)?,
        );

        let tag_len = hasher.digest_size();
        if payload.len() < MAC_DELIMITER.len() + tag_len {
            return Err(StratumError::Authentication);
        }
        let (body, tag) = payload.split_at(payload.len() - tag_len);
        let (plaintext, delimiter) = body.split_at(body.len() - MAC_DELIMITER.len());
        if delimiter != MAC_DELIMITER {
            return Err(StratumError::Authentication);
        }

        if !hasher.verify_hash(plaintext, tag)? {
            return Err(StratumError::Authentication);
        }
        Ok(plaintext.to_vec())
    }
}

/// Point both primitives at the mutual key and subkey. The guards put the
/// original material back when they drop.
fn install_mutual_material<C, H>(cipher: &mut CipherStateGuard<'_, C>, hasher: &mut HasherStateGuard<'_, H>)
where
    C: SymmetricCipher + ?Sized,
    H: KeyedHashFunction + ?Sized,
{
    let key = SecretBytes::concat(cipher.original_key(), hasher.original_key());
    let subkey = SecretBytes::concat(cipher.original_iv(), hasher.original_salt());

    cipher.set_secret_key(&key);
    cipher.set_initialization_vector(&subkey);
    hasher.set_key(&key);
    hasher.set_salt(&subkey);
}
