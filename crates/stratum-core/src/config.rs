//! Protocol configuration

use serde::{Deserialize, Serialize};

use crate::{StratumError, StratumResult};

/// Ordering of encryption and message authentication
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum AuthenticationMode {
    /// Encrypt and MAC the plaintext independently (E&M)
    EncryptAndMac = 1,
    /// MAC the plaintext, then encrypt plaintext and tag together (MtE)
    MacThenEncrypt = 2,
    /// Encrypt, then MAC the ciphertext (EtM)
    #[default]
    EncryptThenMac = 3,
}

impl AuthenticationMode {
    pub fn from_id(id: u8) -> StratumResult<Self> {
        match id {
            1 => Ok(AuthenticationMode::EncryptAndMac),
            2 => Ok(AuthenticationMode::MacThenEncrypt),
            3 => Ok(AuthenticationMode::EncryptThenMac),
            other => Err(StratumError::validation(format!(
                "authentication mode {} out of range 1..=3",
                other
            ))),
        }
    }

    #[inline]
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Whether the mode returns a standalone tag
    pub fn has_standalone_tag(self) -> bool {
        !matches!(self, AuthenticationMode::MacThenEncrypt)
    }
}

impl TryFrom<u8> for AuthenticationMode {
    type Error = StratumError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        AuthenticationMode::from_id(id)
    }
}

/// Authenticated encryption configuration
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedEncryptionConfig {
    pub mode: AuthenticationMode,
}

/// Digital envelope configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeConfig {
    /// Bytes of random session key drawn per envelope
    pub key_size: usize,
    /// Bytes of random IV drawn per envelope
    pub iv_size: usize,
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        EnvelopeConfig {
            key_size: 64,
            iv_size: 64,
        }
    }
}

/// Supported Diffie-Hellman key pair sizes in bits
pub const KEY_EXCHANGE_SIZES: [u32; 4] = [1536, 2048, 3072, 4096];

/// Key exchange configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyExchangeConfig {
    /// Key pair size in bits, one of [`KEY_EXCHANGE_SIZES`]
    pub key_pair_size: u32,
}

impl KeyExchangeConfig {
    pub fn validate(&self) -> StratumResult<()> {
        if KEY_EXCHANGE_SIZES.contains(&self.key_pair_size) {
            Ok(())
        } else {
            Err(StratumError::validation(format!(
                "unsupported key exchange size {} bits, expected one of {:?}",
                self.key_pair_size, KEY_EXCHANGE_SIZES
            )))
        }
    }
}

impl Default for KeyExchangeConfig {
    fn default() -> Self {
        KeyExchangeConfig {
            key_pair_size: 2048,
        }
    }
}

/// Minimum number of passes for multiple encryption
pub const MIN_ITERATIONS: usize = 2;

/// Multiple encryption configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultipleEncryptionConfig {
    /// Default pass count; no upper bound is enforced
    pub iterations: usize,
}

impl MultipleEncryptionConfig {
    pub fn validate(&self) -> StratumResult<()> {
        validate_iterations(self.iterations)
    }
}

impl Default for MultipleEncryptionConfig {
    fn default() -> Self {
        MultipleEncryptionConfig {
            iterations: MIN_ITERATIONS,
        }
    }
}

pub fn validate_iterations(iterations: usize) -> StratumResult<()> {
    if iterations < MIN_ITERATIONS {
        return Err(StratumError::validation(format!(
            "iteration count must be at least {}, got {}",
            MIN_ITERATIONS, iterations
        )));
    }
    Ok(())
}

/// Entity authentication challenge configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeConfig {
    /// Bytes of random challenge per token
    pub challenge_size: usize,
}

impl ChallengeConfig {
    pub fn validate(&self) -> StratumResult<()> {
        if self.challenge_size == 0 {
            return Err(StratumError::validation("challenge size must be positive"));
        }
        Ok(())
    }
}

impl Default for ChallengeConfig {
    fn default() -> Self {
        ChallengeConfig { challenge_size: 32 }
    }
}
