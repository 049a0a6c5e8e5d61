//! HMAC keyed hash functions with optional salting

use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};

use stratum_core::{
    constant_time_eq, CipherFormat, KeyedHashFunction, SecretBytes, StratumError, StratumResult,
};

use crate::HashAlgorithm;

/// Where the salt goes relative to the message
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum SaltingMode {
    /// Salt is ignored
    None,
    #[default]
    Append,
    Prepend,
}

impl SaltingMode {
    fn apply(self, data: &[u8], salt: &[u8]) -> Vec<u8> {
        let mut message = Vec::with_capacity(data.len() + salt.len());
        match self {
            SaltingMode::None => message.extend_from_slice(data),
            SaltingMode::Append => {
                message.extend_from_slice(data);
                message.extend_from_slice(salt);
            }
            SaltingMode::Prepend => {
                message.extend_from_slice(salt);
                message.extend_from_slice(data);
            }
        }
        message
    }
}

macro_rules! hmac_digest {
    ($digest:ty, $key:expr, $message:expr) => {{
        let mut mac = Hmac::<$digest>::new_from_slice($key)
            .map_err(|_| StratumError::system("HMAC rejected key"))?;
        mac.update($message);
        mac.finalize().into_bytes().to_vec()
    }};
}

/// HMAC over SHA-2 with key, salt and output format
#[derive(Clone, Debug)]
pub struct HmacFunction {
    algorithm: HashAlgorithm,
    salting: SaltingMode,
    format: CipherFormat,
    key: SecretBytes,
    salt: SecretBytes,
}

impl HmacFunction {
    pub fn new(algorithm: HashAlgorithm) -> Self {
        HmacFunction {
            algorithm,
            salting: SaltingMode::default(),
            format: CipherFormat::default(),
            key: SecretBytes::empty(),
            salt: SecretBytes::empty(),
        }
    }

    pub fn with_key(mut self, key: &[u8]) -> Self {
        self.key = SecretBytes::from_slice(key);
        self
    }

    pub fn with_salt(mut self, salt: &[u8]) -> Self {
        self.salt = SecretBytes::from_slice(salt);
        self
    }

    pub fn with_salting(mut self, salting: SaltingMode) -> Self {
        self.salting = salting;
        self
    }

    pub fn with_format(mut self, format: CipherFormat) -> Self {
        self.format = format;
        self
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    pub fn salting(&self) -> SaltingMode {
        self.salting
    }

    pub fn format(&self) -> CipherFormat {
        self.format
    }

    fn raw_digest(&self, data: &[u8]) -> StratumResult<Vec<u8>> {
        let message = self.salting.apply(data, &self.salt);
        let digest = match self.algorithm {
            HashAlgorithm::Sha256 => hmac_digest!(Sha256, &self.key, &message),
            HashAlgorithm::Sha384 => hmac_digest!(Sha384, &self.key, &message),
            HashAlgorithm::Sha512 => hmac_digest!(Sha512, &self.key, &message),
        };
        Ok(digest)
    }
}

impl KeyedHashFunction for HmacFunction {
    fn key(&self) -> &[u8] {
        &self.key
    }

    fn set_key(&mut self, key: &[u8]) {
        self.key = SecretBytes::from_slice(key);
    }

    fn salt(&self) -> &[u8] {
        &self.salt
    }

    fn set_salt(&mut self, salt: &[u8]) {
        self.salt = SecretBytes::from_slice(salt);
    }

    fn digest_size(&self) -> usize {
        self.format.encoded_len(self.algorithm.output_size())
    }

    fn hash_data(&self, data: &[u8]) -> StratumResult<Vec<u8>> {
        let digest = self.raw_digest(data)?;
        Ok(self.format.encode(&digest))
    }

    fn verify_hash(&self, data: &[u8], tag: &[u8]) -> StratumResult<bool> {
        let expected = self.hash_data(data)?;
        Ok(constant_time_eq(&expected, tag))
    }

    fn box_clone(&self) -> Box<dyn KeyedHashFunction> {
        Box::new(self.clone())
    }
}
