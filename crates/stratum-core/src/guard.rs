//! Scoped acquisition of primitive state.
//!
//! A guard snapshots a primitive's key material when acquired and writes
//! it back when dropped, so temporary re-keying is undone on every exit
//! path, early `?` returns included.

use std::ops::{Deref, DerefMut};

use crate::{CipherFormat, KeyedHashFunction, SecretBytes, SymmetricCipher};

/// Restores a cipher's key, IV and format on drop
pub struct CipherStateGuard<'a, C: SymmetricCipher + ?Sized> {
    cipher: &'a mut C,
    key: SecretBytes,
    iv: SecretBytes,
    format: CipherFormat,
}

impl<'a, C: SymmetricCipher + ?Sized> CipherStateGuard<'a, C> {
    pub fn acquire(cipher: &'a mut C) -> Self {
        let key = SecretBytes::from_slice(cipher.secret_key());
        let iv = SecretBytes::from_slice(cipher.initialization_vector());
        let format = cipher.cipher_format();
        CipherStateGuard {
            cipher,
            key,
            iv,
            format,
        }
    }

    pub fn original_key(&self) -> &[u8] {
        &self.key
    }

    pub fn original_iv(&self) -> &[u8] {
        &self.iv
    }

    pub fn original_format(&self) -> CipherFormat {
        self.format
    }
}

impl<C: SymmetricCipher + ?Sized> Deref for CipherStateGuard<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        self.cipher
    }
}

impl<C: SymmetricCipher + ?Sized> DerefMut for CipherStateGuard<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        self.cipher
    }
}

impl<C: SymmetricCipher + ?Sized> Drop for CipherStateGuard<'_, C> {
    fn drop(&mut self) {
        self.cipher.set_secret_key(&self.key);
        self.cipher.set_initialization_vector(&self.iv);
        self.cipher.set_cipher_format(self.format);
    }
}

/// Restores a keyed hash function's key and salt on drop
pub struct HasherStateGuard<'a, H: KeyedHashFunction + ?Sized> {
    hasher: &'a mut H,
    key: SecretBytes,
    salt: SecretBytes,
}

impl<'a, H: KeyedHashFunction + ?Sized> HasherStateGuard<'a, H> {
    pub fn acquire(hasher: &'a mut H) -> Self {
        let key = SecretBytes::from_slice(hasher.key());
        let salt = SecretBytes::from_slice(hasher.salt());
        HasherStateGuard { hasher, key, salt }
    }

    pub fn original_key(&self) -> &[u8] {
        &self.key
    }

    pub fn original_salt(&self) -> &[u8] {
        &self.salt
    }
}

impl<H: KeyedHashFunction + ?Sized> Deref for HasherStateGuard<'_, H> {
    type Target = H;

    fn deref(&self) -> &H {
        self.hasher
    }
}

impl<H: KeyedHashFunction + ?Sized> DerefMut for HasherStateGuard<'_, H> {
    fn deref_mut(&mut self) -> &mut H {
        self.hasher
    }
}

impl<H: KeyedHashFunction + ?Sized> Drop for HasherStateGuard<'_, H> {
    fn drop(&mut self) {
        self.hasher.set_key(&self.key);
        self.hasher.set_salt(&self.salt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{StratumError, StratumResult};

    #[derive(Debug, Clone, Default)]
    struct RecordingCipher {
        key: Vec<u8>,
        iv: Vec<u8>,
        format: CipherFormat,
    }

    impl SymmetricCipher for RecordingCipher {
        fn secret_key(&self) -> &[u8] {
            &self.key
        }
        fn set_secret_key(&mut self, key: &[u8]) {
            self.key = key.to_vec();
        }
        fn initialization_vector(&self) -> &[u8] {
            &self.iv
        }
        fn set_initialization_vector(&mut self, iv: &[u8]) {
            self.iv = iv.to_vec();
        }
        fn cipher_format(&self) -> CipherFormat {
            self.format
        }
        fn set_cipher_format(&mut self, format: CipherFormat) {
            self.format = format;
        }
        fn encrypt_data(&self, plaintext: &[u8]) -> StratumResult<Vec<u8>> {
            Ok(plaintext.to_vec())
        }
        fn decrypt_data(&self, _ciphertext: &[u8]) -> StratumResult<Vec<u8>> {
            Err(StratumError::system("always fails"))
        }
        fn box_clone(&self) -> Box<dyn SymmetricCipher> {
            Box::new(self.clone())
        }
    }

    fn rekey_then_fail(cipher: &mut dyn SymmetricCipher) -> StratumResult<Vec<u8>> {
        let mut guard = CipherStateGuard::acquire(cipher);
        guard.set_secret_key(b"temporary");
        guard.set_cipher_format(CipherFormat::Hex);
        guard.decrypt_data(b"data")
    }

    #[test]
    fn test_cipher_state_restored_on_error() {
        let mut cipher = RecordingCipher {
            key: b"original".to_vec(),
            iv: b"iv".to_vec(),
            format: CipherFormat::Base64,
        };

        assert!(rekey_then_fail(&mut cipher).is_err());

        assert_eq!(cipher.key, b"original");
        assert_eq!(cipher.iv, b"iv");
        assert_eq!(cipher.format, CipherFormat::Base64);
    }

    #[test]
    fn test_guard_exposes_snapshot() {
        let mut cipher = RecordingCipher {
            key: b"k".to_vec(),
            ..Default::default()
        };
        let mut guard = CipherStateGuard::acquire(&mut cipher);
        guard.set_secret_key(b"other");
        assert_eq!(guard.original_key(), b"k");
        assert_eq!(guard.secret_key(), b"other");
    }
}
