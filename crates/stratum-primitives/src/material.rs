//! Fitting arbitrary key material to fixed algorithm sizes

use hkdf::Hkdf;
use sha2::Sha256;
use stratum_core::SecretBytes;

const FIT_INFO: &[u8] = b"STRATUM_KEY_FIT_v1";

/// Fit `material` to exactly `len` bytes.
///
/// Exact length is used as is, shorter input is zero-extended and longer
/// input is compressed with HKDF-SHA-256.
pub fn fit_material(material: &[u8], len: usize) -> SecretBytes {
    if material.len() == len {
        return SecretBytes::from_slice(material);
    }

    let mut fitted = vec![0u8; len];
    if material.len() < len {
        fitted[..material.len()].copy_from_slice(material);
    } else {
        let hkdf = Hkdf::<Sha256>::new(None, material);
        // len is a key or block size, far below the 8160-byte HKDF limit
        hkdf.expand(FIT_INFO, &mut fitted)
            .expect("HKDF expand failed");
    }
    SecretBytes::new(fitted)
}
