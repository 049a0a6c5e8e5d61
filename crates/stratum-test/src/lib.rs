//! Stratum Test Harness - Fixtures and scenario drivers
//!
//! This crate provides:
//! - Deterministic primitive fixtures (embedded RSA key, fixed cipher and MAC keys)
//! - Tampering helpers for fail-closed checks
//! - End-to-end scenario drivers for every protocol
//! - Tracing setup for test runs
//!
//! Property suites live under `tests/`, benchmarks under `benches/`.

pub mod fixtures;
pub mod logging;
pub mod scenarios;
pub mod tamper;

pub use fixtures::*;
pub use logging::*;
pub use scenarios::*;
pub use tamper::*;
