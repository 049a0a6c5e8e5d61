//! Randomness sources

use rand::rngs::{OsRng, StdRng};
use rand::{RngCore, SeedableRng};

use stratum_core::RandomnessSource;

/// Operating system CSPRNG
#[derive(Clone, Copy, Debug, Default)]
pub struct OsRandom;

impl OsRandom {
    pub fn new() -> Self {
        OsRandom
    }
}

impl RandomnessSource for OsRandom {
    fn get_bytes(&mut self, len: usize) -> Vec<u8> {
        let mut bytes = vec![0u8; len];
        OsRng.fill_bytes(&mut bytes);
        bytes
    }

    fn box_clone(&self) -> Box<dyn RandomnessSource> {
        Box::new(*self)
    }
}

/// Deterministic generator for reproducible tests and simulations.
/// Not for production keys.
#[derive(Clone, Debug)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        SeededRandom {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomnessSource for SeededRandom {
    fn get_bytes(&mut self, len: usize) -> Vec<u8> {
        let mut bytes = vec![0u8; len];
        self.rng.fill_bytes(&mut bytes);
        bytes
    }

    fn box_clone(&self) -> Box<dyn RandomnessSource> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_os_random_length_and_variety() {
        let mut source = OsRandom::new();
        let a = source.get_bytes(32);
        let b = source.get_bytes(32);
        assert_eq!(a.len(), 32);
        assert_ne!(a, b);
        assert!(source.get_bytes(0).is_empty());
    }

    #[test]
    fn test_seeded_random_reproducible() {
        let mut a = SeededRandom::new(7);
        let mut b = SeededRandom::new(7);
        assert_eq!(a.get_bytes(64), b.get_bytes(64));
        assert_ne!(SeededRandom::new(8).get_bytes(64), SeededRandom::new(7).get_bytes(64));
    }

    #[test]
    fn test_clone_continues_independently() {
        let mut original = SeededRandom::new(1);
        let mut copy = original.box_clone();
        assert_eq!(original.get_bytes(16), copy.get_bytes(16));
    }
}
