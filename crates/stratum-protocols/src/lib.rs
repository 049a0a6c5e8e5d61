//! Stratum Protocols - Cryptographic protocol composition
//!
//! Combines the primitive contracts into complete protocols:
//! - Authenticated encryption (Encrypt-then-MAC, Encrypt-and-MAC, MAC-then-Encrypt)
//! - Digital envelopes (hybrid encryption with optional MAC)
//! - Diffie-Hellman key exchange with key derivation
//! - Multiple encryption under a hash-chained key schedule
//! - Layered encryption across heterogeneous ciphers
//! - Entity authentication (symmetric, public-key, password)

pub mod authenticated;
pub mod entity;
pub mod envelope;
pub mod exchange;
pub mod layered;
pub mod multiple;

pub use authenticated::*;
pub use entity::*;
pub use envelope::*;
pub use exchange::*;
pub use layered::*;
pub use multiple::*;
