//! Stratum Primitives - Concrete implementations of the capability contracts
//!
//! Provides the primitive layer the Stratum protocols compose:
//! - Block ciphers (AES, Camellia in CBC/CTR/ECB)
//! - HMAC keyed hashing (SHA-256/384/512)
//! - Key derivation (HKDF, PBKDF2)
//! - RSA encryption and RSA-PSS signatures
//! - Finite-field Diffie-Hellman (RFC 3526 groups)
//! - Randomness sources
//! - Cipher registry for cascade layers

pub mod asymmetric;
pub mod dh;
pub mod hash;
pub mod kdf;
pub mod mac;
pub mod material;
pub mod random;
pub mod registry;
pub mod symmetric;

pub use asymmetric::*;
pub use dh::*;
pub use hash::*;
pub use kdf::*;
pub use mac::*;
pub use material::*;
pub use random::*;
pub use registry::*;
pub use symmetric::*;
