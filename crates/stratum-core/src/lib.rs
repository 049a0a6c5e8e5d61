//! Stratum Core - Fundamental types and contracts
//!
//! This crate defines what every Stratum protocol builds on:
//! - Error taxonomy
//! - Protocol records (cipher data, envelopes, exchange information, layers)
//! - Output formats, padding and block modes
//! - Primitive capability traits
//! - Zero-on-drop secret buffers and scoped state guards
//! - Protocol configuration

pub mod config;
pub mod error;
pub mod format;
pub mod guard;
pub mod primitives;
pub mod secret;
pub mod structures;

pub use config::*;
pub use error::*;
pub use format::*;
pub use guard::*;
pub use primitives::*;
pub use secret::*;
pub use structures::*;
