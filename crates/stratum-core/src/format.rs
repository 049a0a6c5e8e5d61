//! Output formats, padding schemes and block modes shared by all primitives

use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::{StratumError, StratumResult};

/// Encoding of cipher and digest output
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CipherFormat {
    /// Raw binary bytes
    #[default]
    Raw,
    /// Lower-case hexadecimal text (decoding accepts either case)
    Hex,
    /// Standard base64 with padding
    Base64,
    /// URL-safe base64 without padding
    Base64Url,
}

impl CipherFormat {
    /// Encode raw bytes into this format
    pub fn encode(self, raw: &[u8]) -> Vec<u8> {
        match self {
            CipherFormat::Raw => raw.to_vec(),
            CipherFormat::Hex => hex::encode(raw).into_bytes(),
            CipherFormat::Base64 => STANDARD.encode(raw).into_bytes(),
            CipherFormat::Base64Url => URL_SAFE_NO_PAD.encode(raw).into_bytes(),
        }
    }

    /// Decode bytes in this format back to raw bytes
    pub fn decode(self, encoded: &[u8]) -> StratumResult<Vec<u8>> {
        match self {
            CipherFormat::Raw => Ok(encoded.to_vec()),
            CipherFormat::Hex => hex::decode(encoded)
                .map_err(|e| StratumError::validation(format!("malformed hex input: {}", e))),
            CipherFormat::Base64 => STANDARD
                .decode(encoded)
                .map_err(|e| StratumError::validation(format!("malformed base64 input: {}", e))),
            CipherFormat::Base64Url => URL_SAFE_NO_PAD
                .decode(encoded)
                .map_err(|e| StratumError::validation(format!("malformed base64url input: {}", e))),
        }
    }

    /// Length of `raw_len` raw bytes once encoded
    pub fn encoded_len(self, raw_len: usize) -> usize {
        match self {
            CipherFormat::Raw => raw_len,
            CipherFormat::Hex => raw_len * 2,
            CipherFormat::Base64 => raw_len.div_ceil(3) * 4,
            CipherFormat::Base64Url => (raw_len * 4).div_ceil(3),
        }
    }
}

/// Block padding scheme
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Padding {
    #[default]
    Pkcs7,
    /// Zero bytes; trailing zeros of the plaintext are lost on unpad
    Zero,
    /// No padding, input must be block aligned
    None,
}

/// Block cipher mode of operation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BlockMode {
    #[default]
    Cbc,
    /// Counter mode, padding is ignored
    Ctr,
    /// Electronic codebook, the IV is ignored
    Ecb,
}

impl BlockMode {
    pub fn as_str(self) -> &'static str {
        match self {
            BlockMode::Cbc => "CBC",
            BlockMode::Ctr => "CTR",
            BlockMode::Ecb => "ECB",
        }
    }

    /// Whether the mode operates on whole blocks and therefore pads
    pub fn is_block_aligned(self) -> bool {
        matches!(self, BlockMode::Cbc | BlockMode::Ecb)
    }
}

impl fmt::Display for BlockMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockMode {
    type Err = StratumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CBC" => Ok(BlockMode::Cbc),
            "CTR" => Ok(BlockMode::Ctr),
            "ECB" => Ok(BlockMode::Ecb),
            other => Err(StratumError::UnsupportedMode(other.to_string())),
        }
    }
}
