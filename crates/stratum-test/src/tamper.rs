//! Tampering helpers for fail-closed checks

use rand::Rng;

/// Flip one bit, counted from the most significant bit of byte 0.
/// Out-of-range positions leave the data untouched and return false.
pub fn flip_bit(data: &mut [u8], bit: usize) -> bool {
    match data.get_mut(bit / 8) {
        Some(byte) => {
            *byte ^= 0x80 >> (bit % 8);
            true
        }
        None => false,
    }
}

/// Flip a random bit; returns its position, or `None` for empty data
pub fn flip_random_bit<R: Rng + ?Sized>(data: &mut [u8], rng: &mut R) -> Option<usize> {
    if data.is_empty() {
        return None;
    }
    let bit = rng.gen_range(0..data.len() * 8);
    flip_bit(data, bit);
    Some(bit)
}

/// Replace a byte with a different value
pub fn corrupt_byte(data: &mut [u8], index: usize) -> bool {
    match data.get_mut(index) {
        Some(byte) => {
            *byte = byte.wrapping_add(1);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_flip_bit_positions() {
        let mut data = [0u8; 2];
        assert!(flip_bit(&mut data, 0));
        assert!(flip_bit(&mut data, 15));
        assert_eq!(data, [0x80, 0x01]);
        assert!(!flip_bit(&mut data, 16));
    }

    #[test]
    fn test_flip_random_bit_changes_data() {
        let mut rng = StdRng::seed_from_u64(11);
        let original = [0x5au8; 8];
        let mut data = original;
        let bit = flip_random_bit(&mut data, &mut rng).unwrap();
        assert!(bit < 64);
        assert_ne!(data, original);
        assert!(flip_random_bit(&mut [], &mut rng).is_none());
    }

    #[test]
    fn test_corrupt_byte() {
        let mut data = [0xffu8];
        assert!(corrupt_byte(&mut data, 0));
        assert_eq!(data, [0x00]);
        assert!(!corrupt_byte(&mut data, 1));
    }
}
