//! Multiple encryption: one algorithm applied repeatedly under a
//! re-keyed schedule
//!
//! The schedule is a hash chain. Entry 0 is the cipher's own key and IV;
//! entry i is the KDF of entry i-1. Encryption walks the schedule forward,
//! decryption walks it backward. Only the outermost pass uses the
//! caller's output format.
//!
//! The iteration count is not recorded in the ciphertext. Decrypting with
//! a different count than was used to encrypt is not detected: it yields
//! garbage or a padding failure from the cipher.

use stratum_core::{
    validate_iterations, CipherFormat, CipherStateGuard, KeyDerivationFunction,
    MultipleEncryptionConfig, SecretBytes, StratumResult, SymmetricCipher,
};

/// Iterative re-keyed encryption
#[derive(Clone, Debug)]
pub struct MultipleEncryption {
    cipher: Box<dyn SymmetricCipher>,
    kdf: Box<dyn KeyDerivationFunction>,
    config: MultipleEncryptionConfig,
}

impl MultipleEncryption {
    pub fn new(cipher: Box<dyn SymmetricCipher>, kdf: Box<dyn KeyDerivationFunction>) -> Self {
        MultipleEncryption {
            cipher,
            kdf,
            config: MultipleEncryptionConfig::default(),
        }
    }

    pub fn with_config(
        cipher: Box<dyn SymmetricCipher>,
        kdf: Box<dyn KeyDerivationFunction>,
        config: MultipleEncryptionConfig,
    ) -> StratumResult<Self> {
        config.validate()?;
        Ok(MultipleEncryption {
            cipher,
            kdf,
            config,
        })
    }

    /// Iteration count used by [`encrypt`](Self::encrypt) and
    /// [`decrypt`](Self::decrypt)
    pub fn iterations(&self) -> usize {
        self.config.iterations
    }

    pub fn set_iterations(&mut self, iterations: usize) -> StratumResult<()> {
        validate_iterations(iterations)?;
        self.config.iterations = iterations;
        Ok(())
    }

    pub fn cipher(&self) -> &dyn SymmetricCipher {
        self.cipher.as_ref()
    }

    pub fn cipher_mut(&mut self) -> &mut dyn SymmetricCipher {
        self.cipher.as_mut()
    }

    /// Encrypt with the configured iteration count
    pub fn encrypt(&mut self, plaintext: &[u8]) -> StratumResult<Vec<u8>> {
        self.multiple_encrypt_data(plaintext, self.config.iterations)
    }

    /// Decrypt with the configured iteration count
    pub fn decrypt(&mut self, ciphertext: &[u8]) -> StratumResult<Vec<u8>> {
        self.multiple_decrypt_data(ciphertext, self.config.iterations)
    }

    pub fn multiple_encrypt_data(&mut self, plaintext: &[u8], iterations: usize) -> StratumResult<Vec<u8>> {
        validate_iterations(iterations)?;
        tracing::debug!(iterations, len = plaintext.len(), "multiple encrypt");

        let mut cipher = CipherStateGuard::acquire(self.cipher.as_mut());
        let schedule = key_schedule(
            self.kdf.as_ref(),
            cipher.original_key(),
            cipher.original_iv(),
            iterations,
        )?;
        let format = cipher.original_format();

        let mut data = plaintext.to_vec();
        for (pass, (key, iv)) in schedule.iter().enumerate() {
            let last = pass + 1 == iterations;
            cipher.set_secret_key(key);
            cipher.set_initialization_vector(iv);
            cipher.set_cipher_format(if last { format } else { CipherFormat::Raw });
            data = cipher.encrypt_data(&data)?;
        }
        Ok(data)
    }

    pub fn multiple_decrypt_data(&mut self, ciphertext: &[u8], iterations: usize) -> StratumResult<Vec<u8>> {
        validate_iterations(iterations)?;
        tracing::debug!(iterations, len = ciphertext.len(), "multiple decrypt");

        let mut cipher = CipherStateGuard::acquire(self.cipher.as_mut());
        let schedule = key_schedule(
            self.kdf.as_ref(),
            cipher.original_key(),
            cipher.original_iv(),
            iterations,
        )?;
        let format = cipher.original_format();

        let mut data = ciphertext.to_vec();
        for (pass, (key, iv)) in schedule.iter().rev().enumerate() {
            cipher.set_secret_key(key);
            cipher.set_initialization_vector(iv);
            cipher.set_cipher_format(if pass == 0 { format } else { CipherFormat::Raw });
            data = cipher.decrypt_data(&data)?;
        }
        Ok(data)
    }
}

/// Hash-chained (key, IV) pairs, starting from the given material
fn key_schedule(
    kdf: &dyn KeyDerivationFunction,
    key: &[u8],
    iv: &[u8],
    iterations: usize,
) -> StratumResult<Vec<(SecretBytes, SecretBytes)>> {
    let mut schedule = Vec::with_capacity(iterations);
    schedule.push((SecretBytes::from_slice(key), SecretBytes::from_slice(iv)));

    while schedule.len() < iterations {
        let next = match schedule.last() {
            Some((key, iv)) => (
                SecretBytes::new(kdf.hash_data(key)?),
                SecretBytes::new(kdf.hash_data(iv)?),
            ),
            None => break,
        };
        schedule.push(next);
    }
    Ok(schedule)
}
