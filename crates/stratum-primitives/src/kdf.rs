//! Key derivation functions (HKDF, PBKDF2)

use hkdf::Hkdf;
use sha2::{Sha256, Sha384, Sha512};

use stratum_core::{KeyDerivationFunction, SecretBytes, StratumError, StratumResult};

use crate::HashAlgorithm;

/// Default derived output length in bytes
pub const DEFAULT_OUTPUT_LENGTH: usize = 32;

/// Default PBKDF2 iteration count
pub const DEFAULT_PBKDF2_ITERATIONS: u32 = 10_000;

macro_rules! hkdf_expand {
    ($digest:ty, $salt:expr, $ikm:expr, $info:expr, $okm:expr) => {
        Hkdf::<$digest>::new(Some($salt), $ikm)
            .expand($info, $okm)
            .map_err(|_| StratumError::validation("HKDF output length too large"))
    };
}

/// HKDF extract-and-expand
#[derive(Clone, Debug)]
pub struct HkdfFunction {
    algorithm: HashAlgorithm,
    salt: SecretBytes,
    info: Vec<u8>,
    output_length: usize,
}

impl HkdfFunction {
    pub fn new(algorithm: HashAlgorithm) -> Self {
        HkdfFunction {
            algorithm,
            salt: SecretBytes::empty(),
            info: Vec::new(),
            output_length: DEFAULT_OUTPUT_LENGTH,
        }
    }

    pub fn with_salt(mut self, salt: &[u8]) -> Self {
        self.salt = SecretBytes::from_slice(salt);
        self
    }

    /// Context and application specific information
    pub fn with_info(mut self, info: &[u8]) -> Self {
        self.info = info.to_vec();
        self
    }

    pub fn with_output_length(mut self, output_length: usize) -> Self {
        self.output_length = output_length;
        self
    }

    pub fn output_length(&self) -> usize {
        self.output_length
    }
}

impl KeyDerivationFunction for HkdfFunction {
    fn hash_data(&self, input: &[u8]) -> StratumResult<Vec<u8>> {
        if self.output_length == 0 {
            return Err(StratumError::validation("HKDF output length must be positive"));
        }

        let mut okm = vec![0u8; self.output_length];
        match self.algorithm {
            HashAlgorithm::Sha256 => hkdf_expand!(Sha256, self.salt.as_bytes(), input, &self.info, &mut okm)?,
            HashAlgorithm::Sha384 => hkdf_expand!(Sha384, self.salt.as_bytes(), input, &self.info, &mut okm)?,
            HashAlgorithm::Sha512 => hkdf_expand!(Sha512, self.salt.as_bytes(), input, &self.info, &mut okm)?,
        }
        Ok(okm)
    }

    fn box_clone(&self) -> Box<dyn KeyDerivationFunction> {
        Box::new(self.clone())
    }
}

/// PBKDF2 with HMAC over SHA-2
#[derive(Clone, Debug)]
pub struct Pbkdf2Function {
    algorithm: HashAlgorithm,
    salt: SecretBytes,
    iterations: u32,
    output_length: usize,
}

impl Pbkdf2Function {
    pub fn new(algorithm: HashAlgorithm) -> Self {
        Pbkdf2Function {
            algorithm,
            salt: SecretBytes::empty(),
            iterations: DEFAULT_PBKDF2_ITERATIONS,
            output_length: DEFAULT_OUTPUT_LENGTH,
        }
    }

    pub fn with_salt(mut self, salt: &[u8]) -> Self {
        self.salt = SecretBytes::from_slice(salt);
        self
    }

    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_output_length(mut self, output_length: usize) -> Self {
        self.output_length = output_length;
        self
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }
}

impl KeyDerivationFunction for Pbkdf2Function {
    fn hash_data(&self, input: &[u8]) -> StratumResult<Vec<u8>> {
        if self.iterations == 0 {
            return Err(StratumError::validation("PBKDF2 iteration count must be positive"));
        }
        if self.output_length == 0 {
            return Err(StratumError::validation("PBKDF2 output length must be positive"));
        }

        let mut derived = vec![0u8; self.output_length];
        match self.algorithm {
            HashAlgorithm::Sha256 => {
                pbkdf2::pbkdf2_hmac::<Sha256>(input, &self.salt, self.iterations, &mut derived)
            }
            HashAlgorithm::Sha384 => {
                pbkdf2::pbkdf2_hmac::<Sha384>(input, &self.salt, self.iterations, &mut derived)
            }
            HashAlgorithm::Sha512 => {
                pbkdf2::pbkdf2_hmac::<Sha512>(input, &self.salt, self.iterations, &mut derived)
            }
        }
        Ok(derived)
    }

    fn box_clone(&self) -> Box<dyn KeyDerivationFunction> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hkdf_rfc5869_case_1() {
        let ikm = [0x0bu8; 22];
        let salt: Vec<u8> = (0x00u8..=0x0c).collect();
        let info: Vec<u8> = (0xf0u8..=0xf9).collect();
        let hkdf = HkdfFunction::new(HashAlgorithm::Sha256)
            .with_salt(&salt)
            .with_info(&info)
            .with_output_length(42);

        let okm = hkdf.hash_data(&ikm).unwrap();
        assert_eq!(
            hex::encode(okm),
            "3cb25f25faacd57a90434f64d0362f2a2d2d0a90cf1a5a4c5db02d56ecc4c5bf34007208d5b887185865"
        );
    }

    #[test]
    fn test_hkdf_output_too_long() {
        let hkdf = HkdfFunction::new(HashAlgorithm::Sha256).with_output_length(255 * 32 + 1);
        assert!(hkdf.hash_data(b"ikm").unwrap_err().is_validation());
    }

    #[test]
    fn test_pbkdf2_rfc6070_style_vector() {
        let pbkdf2 = Pbkdf2Function::new(HashAlgorithm::Sha256)
            .with_salt(b"salt")
            .with_iterations(1)
            .with_output_length(32);
        assert_eq!(
            hex::encode(pbkdf2.hash_data(b"password").unwrap()),
            "120fb6cffcf8b32c43e7225256c4f837a86548c92ccc35480805987cb70be17b"
        );
    }

    #[test]
    fn test_pbkdf2_zero_iterations_rejected() {
        let pbkdf2 = Pbkdf2Function::new(HashAlgorithm::Sha512).with_iterations(0);
        assert!(pbkdf2.hash_data(b"pw").unwrap_err().is_validation());
    }

    #[test]
    fn test_deterministic_chain() {
        let hkdf = HkdfFunction::new(HashAlgorithm::Sha384).with_output_length(64);
        let first = hkdf.hash_data(b"seed").unwrap();
        assert_eq!(first, hkdf.hash_data(b"seed").unwrap());
        assert_ne!(first, hkdf.hash_data(&first).unwrap());
    }
}
