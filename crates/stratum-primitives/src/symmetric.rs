//! Block ciphers (AES, Camellia) in CBC, CTR and ECB modes

use std::fmt;
use std::str::FromStr;

use aes::{Aes128, Aes192, Aes256};
use camellia::{Camellia128, Camellia192, Camellia256};
use cipher::block_padding::{NoPadding, Pkcs7, ZeroPadding};
use cipher::consts::U16;
use cipher::{
    BlockDecrypt, BlockDecryptMut, BlockEncrypt, BlockEncryptMut, BlockSizeUser, KeyInit,
    KeyIvInit, StreamCipher,
};

use stratum_core::{
    BlockMode, CipherFormat, Padding, SecretBytes, StratumError, StratumResult, SymmetricCipher,
};

use crate::material::fit_material;

/// Block size shared by every registered algorithm
pub const BLOCK_SIZE: usize = 16;

/// Registered symmetric block cipher algorithms
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SymmetricAlgorithm {
    Aes128,
    Aes192,
    Aes256,
    Camellia128,
    Camellia192,
    Camellia256,
}

impl SymmetricAlgorithm {
    pub const ALL: [SymmetricAlgorithm; 6] = [
        SymmetricAlgorithm::Aes128,
        SymmetricAlgorithm::Aes192,
        SymmetricAlgorithm::Aes256,
        SymmetricAlgorithm::Camellia128,
        SymmetricAlgorithm::Camellia192,
        SymmetricAlgorithm::Camellia256,
    ];

    /// Key size in bytes
    pub fn key_size(self) -> usize {
        match self {
            SymmetricAlgorithm::Aes128 | SymmetricAlgorithm::Camellia128 => 16,
            SymmetricAlgorithm::Aes192 | SymmetricAlgorithm::Camellia192 => 24,
            SymmetricAlgorithm::Aes256 | SymmetricAlgorithm::Camellia256 => 32,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SymmetricAlgorithm::Aes128 => "AES-128",
            SymmetricAlgorithm::Aes192 => "AES-192",
            SymmetricAlgorithm::Aes256 => "AES-256",
            SymmetricAlgorithm::Camellia128 => "Camellia-128",
            SymmetricAlgorithm::Camellia192 => "Camellia-192",
            SymmetricAlgorithm::Camellia256 => "Camellia-256",
        }
    }
}

impl fmt::Display for SymmetricAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SymmetricAlgorithm {
    type Err = StratumError;

    /// Case-insensitive; dashes, underscores and spaces are ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_uppercase();

        match normalized.as_str() {
            "AES128" => Ok(SymmetricAlgorithm::Aes128),
            "AES192" => Ok(SymmetricAlgorithm::Aes192),
            "AES256" => Ok(SymmetricAlgorithm::Aes256),
            "CAMELLIA128" => Ok(SymmetricAlgorithm::Camellia128),
            "CAMELLIA192" => Ok(SymmetricAlgorithm::Camellia192),
            "CAMELLIA256" => Ok(SymmetricAlgorithm::Camellia256),
            _ => Err(StratumError::configuration(format!(
                "'{}' is not a registered symmetric block cipher",
                s
            ))),
        }
    }
}

/// A keyed block cipher with mode, padding and output format
#[derive(Clone, Debug)]
pub struct SymmetricBlockCipher {
    algorithm: SymmetricAlgorithm,
    mode: BlockMode,
    padding: Padding,
    format: CipherFormat,
    key: SecretBytes,
    iv: SecretBytes,
}

impl SymmetricBlockCipher {
    /// Unkeyed cipher in CBC mode with PKCS#7 padding and raw output
    pub fn new(algorithm: SymmetricAlgorithm) -> Self {
        SymmetricBlockCipher {
            algorithm,
            mode: BlockMode::default(),
            padding: Padding::default(),
            format: CipherFormat::default(),
            key: SecretBytes::empty(),
            iv: SecretBytes::empty(),
        }
    }

    pub fn with_key(mut self, key: &[u8]) -> Self {
        self.key = SecretBytes::from_slice(key);
        self
    }

    pub fn with_iv(mut self, iv: &[u8]) -> Self {
        self.iv = SecretBytes::from_slice(iv);
        self
    }

    pub fn with_mode(mut self, mode: BlockMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_format(mut self, format: CipherFormat) -> Self {
        self.format = format;
        self
    }

    pub fn algorithm(&self) -> SymmetricAlgorithm {
        self.algorithm
    }

    pub fn mode(&self) -> BlockMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: BlockMode) {
        self.mode = mode;
    }

    pub fn padding(&self) -> Padding {
        self.padding
    }

    pub fn set_padding(&mut self, padding: Padding) {
        self.padding = padding;
    }

    /// Encrypt without output encoding
    pub fn encrypt_raw(&self, plaintext: &[u8]) -> StratumResult<Vec<u8>> {
        if self.mode.is_block_aligned()
            && self.padding == Padding::None
            && plaintext.len() % BLOCK_SIZE != 0
        {
            return Err(StratumError::validation(format!(
                "unpadded {} input must be a multiple of {} bytes, got {}",
                self.mode,
                BLOCK_SIZE,
                plaintext.len()
            )));
        }

        let key = fit_material(&self.key, self.algorithm.key_size());
        let iv = fit_material(&self.iv, BLOCK_SIZE);
        let (mode, padding) = (self.mode, self.padding);

        match self.algorithm {
            SymmetricAlgorithm::Aes128 => encrypt_with::<Aes128>(mode, padding, &key, &iv, plaintext),
            SymmetricAlgorithm::Aes192 => encrypt_with::<Aes192>(mode, padding, &key, &iv, plaintext),
            SymmetricAlgorithm::Aes256 => encrypt_with::<Aes256>(mode, padding, &key, &iv, plaintext),
            SymmetricAlgorithm::Camellia128 => {
                encrypt_with::<Camellia128>(mode, padding, &key, &iv, plaintext)
            }
            SymmetricAlgorithm::Camellia192 => {
                encrypt_with::<Camellia192>(mode, padding, &key, &iv, plaintext)
            }
            SymmetricAlgorithm::Camellia256 => {
                encrypt_with::<Camellia256>(mode, padding, &key, &iv, plaintext)
            }
        }
    }

    /// Decrypt raw (already decoded) ciphertext
    pub fn decrypt_raw(&self, ciphertext: &[u8]) -> StratumResult<Vec<u8>> {
        if self.mode.is_block_aligned() && ciphertext.len() % BLOCK_SIZE != 0 {
            return Err(StratumError::validation(format!(
                "{} ciphertext must be a multiple of {} bytes, got {}",
                self.mode,
                BLOCK_SIZE,
                ciphertext.len()
            )));
        }

        let key = fit_material(&self.key, self.algorithm.key_size());
        let iv = fit_material(&self.iv, BLOCK_SIZE);
        let (mode, padding) = (self.mode, self.padding);

        match self.algorithm {
            SymmetricAlgorithm::Aes128 => decrypt_with::<Aes128>(mode, padding, &key, &iv, ciphertext),
            SymmetricAlgorithm::Aes192 => decrypt_with::<Aes192>(mode, padding, &key, &iv, ciphertext),
            SymmetricAlgorithm::Aes256 => decrypt_with::<Aes256>(mode, padding, &key, &iv, ciphertext),
            SymmetricAlgorithm::Camellia128 => {
                decrypt_with::<Camellia128>(mode, padding, &key, &iv, ciphertext)
            }
            SymmetricAlgorithm::Camellia192 => {
                decrypt_with::<Camellia192>(mode, padding, &key, &iv, ciphertext)
            }
            SymmetricAlgorithm::Camellia256 => {
                decrypt_with::<Camellia256>(mode, padding, &key, &iv, ciphertext)
            }
        }
    }
}

impl SymmetricCipher for SymmetricBlockCipher {
    fn secret_key(&self) -> &[u8] {
        &self.key
    }

    fn set_secret_key(&mut self, key: &[u8]) {
        self.key = SecretBytes::from_slice(key);
    }

    fn initialization_vector(&self) -> &[u8] {
        &self.iv
    }

    fn set_initialization_vector(&mut self, iv: &[u8]) {
        self.iv = SecretBytes::from_slice(iv);
    }

    fn cipher_format(&self) -> CipherFormat {
        self.format
    }

    fn set_cipher_format(&mut self, format: CipherFormat) {
        self.format = format;
    }

    fn encrypt_data(&self, plaintext: &[u8]) -> StratumResult<Vec<u8>> {
        let raw = self.encrypt_raw(plaintext)?;
        Ok(self.format.encode(&raw))
    }

    fn decrypt_data(&self, ciphertext: &[u8]) -> StratumResult<Vec<u8>> {
        let raw = self.format.decode(ciphertext)?;
        self.decrypt_raw(&raw)
    }

    fn box_clone(&self) -> Box<dyn SymmetricCipher> {
        Box::new(self.clone())
    }
}

fn invalid_length(_: cipher::InvalidLength) -> StratumError {
    StratumError::system("cipher rejected fitted key or IV length")
}

fn encrypt_with<C>(
    mode: BlockMode,
    padding: Padding,
    key: &[u8],
    iv: &[u8],
    data: &[u8],
) -> StratumResult<Vec<u8>>
where
    C: cipher::BlockCipher + BlockEncrypt + KeyInit + BlockSizeUser<BlockSize = U16>,
{
    match mode {
        BlockMode::Cbc => {
            let encryptor = cbc::Encryptor::<C>::new_from_slices(key, iv).map_err(invalid_length)?;
            Ok(match padding {
                Padding::Pkcs7 => encryptor.encrypt_padded_vec_mut::<Pkcs7>(data),
                Padding::Zero => encryptor.encrypt_padded_vec_mut::<ZeroPadding>(data),
                Padding::None => encryptor.encrypt_padded_vec_mut::<NoPadding>(data),
            })
        }
        BlockMode::Ecb => {
            let encryptor = ecb::Encryptor::<C>::new_from_slice(key).map_err(invalid_length)?;
            Ok(match padding {
                Padding::Pkcs7 => encryptor.encrypt_padded_vec_mut::<Pkcs7>(data),
                Padding::Zero => encryptor.encrypt_padded_vec_mut::<ZeroPadding>(data),
                Padding::None => encryptor.encrypt_padded_vec_mut::<NoPadding>(data),
            })
        }
        BlockMode::Ctr => apply_ctr::<C>(key, iv, data),
    }
}

fn decrypt_with<C>(
    mode: BlockMode,
    padding: Padding,
    key: &[u8],
    iv: &[u8],
    data: &[u8],
) -> StratumResult<Vec<u8>>
where
    C: cipher::BlockCipher + BlockEncrypt + BlockDecrypt + KeyInit + BlockSizeUser<BlockSize = U16>,
{
    let unpadded = match mode {
        BlockMode::Cbc => {
            let decryptor = cbc::Decryptor::<C>::new_from_slices(key, iv).map_err(invalid_length)?;
            match padding {
                Padding::Pkcs7 => decryptor.decrypt_padded_vec_mut::<Pkcs7>(data),
                Padding::Zero => decryptor.decrypt_padded_vec_mut::<ZeroPadding>(data),
                Padding::None => decryptor.decrypt_padded_vec_mut::<NoPadding>(data),
            }
        }
        BlockMode::Ecb => {
            let decryptor = ecb::Decryptor::<C>::new_from_slice(key).map_err(invalid_length)?;
            match padding {
                Padding::Pkcs7 => decryptor.decrypt_padded_vec_mut::<Pkcs7>(data),
                Padding::Zero => decryptor.decrypt_padded_vec_mut::<ZeroPadding>(data),
                Padding::None => decryptor.decrypt_padded_vec_mut::<NoPadding>(data),
            }
        }
        BlockMode::Ctr => return apply_ctr::<C>(key, iv, data),
    };

    unpadded.map_err(|_| StratumError::system("invalid padding after decryption"))
}

fn apply_ctr<C>(key: &[u8], iv: &[u8], data: &[u8]) -> StratumResult<Vec<u8>>
where
    C: cipher::BlockCipher + BlockEncrypt + KeyInit + BlockSizeUser<BlockSize = U16>,
{
    let mut stream = ctr::Ctr128BE::<C>::new_from_slices(key, iv).map_err(invalid_length)?;
    let mut buffer = data.to_vec();
    stream.apply_keystream(&mut buffer);
    Ok(buffer)
}
