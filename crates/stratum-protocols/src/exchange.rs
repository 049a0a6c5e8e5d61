//! Diffie-Hellman key exchange with key derivation
//!
//! The initiator publishes prime, generator and public value; the
//! responder builds its key pair in the same group. Each side combines
//! the peer's public value with its own private record and runs the raw
//! shared value through the KDF.

use stratum_core::{
    ExchangeInformation, KeyDerivationFunction, KeyExchangeConfig, SecretBytes, StratumResult,
};
use stratum_primitives::{DhKeyPair, DhParameters};

/// Key exchange protocol
#[derive(Clone, Debug)]
pub struct KeyExchange {
    kdf: Box<dyn KeyDerivationFunction>,
    config: KeyExchangeConfig,
}

impl KeyExchange {
    /// Create with 2048-bit key pairs
    pub fn new(kdf: Box<dyn KeyDerivationFunction>) -> Self {
        KeyExchange {
            kdf,
            config: KeyExchangeConfig::default(),
        }
    }

    pub fn with_config(
        kdf: Box<dyn KeyDerivationFunction>,
        config: KeyExchangeConfig,
    ) -> StratumResult<Self> {
        config.validate()?;
        Ok(KeyExchange { kdf, config })
    }

    pub fn key_exchange_size(&self) -> u32 {
        self.config.key_pair_size
    }

    pub fn set_key_exchange_size(&mut self, bits: u32) -> StratumResult<()> {
        let config = KeyExchangeConfig { key_pair_size: bits };
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Initiator side: group parameters and a fresh key pair.
    ///
    /// The prime and generator are the RFC 3526 MODP group for the
    /// configured size (generator 2), not a newly generated prime. Only
    /// the key pair is fresh on every call.
    pub fn generate_exchange_request_information(&self) -> StratumResult<ExchangeInformation> {
        tracing::debug!(bits = self.config.key_pair_size, "generating exchange request");

        let parameters = DhParameters::for_key_size(self.config.key_pair_size)?;
        exchange_information(&parameters.generate_key_pair())
    }

    /// Responder side: key pair in the initiator's group
    pub fn generate_exchange_response_information(
        &self,
        prime: &str,
        generator: &str,
    ) -> StratumResult<ExchangeInformation> {
        let parameters = DhParameters::from_hex(prime, generator)?;
        tracing::debug!(bits = parameters.prime_bits(), "generating exchange response");

        exchange_information(&parameters.generate_key_pair())
    }

    /// Combine the peer's public value with the local private record.
    ///
    /// Malformed encodings are validation errors. A remote value that does
    /// not belong to the local group is only detected here and surfaces as
    /// a system error.
    pub fn compute_shared_secret(
        &self,
        remote_public_key: &str,
        local_private_key: &str,
    ) -> StratumResult<SecretBytes> {
        let local = DhKeyPair::decode_private(local_private_key)?;
        let shared = local.shared_value(remote_public_key)?;

        tracing::debug!(bits = local.parameters().prime_bits(), "computed shared secret");
        Ok(SecretBytes::new(self.kdf.hash_data(&shared)?))
    }
}

fn exchange_information(key_pair: &DhKeyPair) -> StratumResult<ExchangeInformation> {
    let parameters = key_pair.parameters();
    Ok(ExchangeInformation {
        prime: parameters.prime_hex(),
        generator: parameters.generator_hex(),
        private_key: key_pair.encode_private()?,
        public_key: key_pair.encode_public(),
    })
}
