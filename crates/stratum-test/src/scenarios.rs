//! End-to-end protocol scenarios
//!
//! Each driver runs one protocol over the fixtures and reports what it
//! observed instead of panicking, so the same drivers back the unit
//! tests, the property suites and ad-hoc runs.

use stratum_core::{AuthenticationMode, BlockMode, StratumError};

use crate::fixtures::{
    authenticated_encryption, digital_envelope, key_exchange, layered_encryption,
    multiple_encryption,
};
use crate::tamper::flip_bit;

// ============================================================================
// RESULT
// ============================================================================

/// Outcome of one scenario
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScenarioResult {
    pub name: String,
    pub passed: bool,
    /// Failure descriptions; empty when the scenario passed
    pub failures: Vec<String>,
}

impl ScenarioResult {
    fn new(name: impl Into<String>) -> Self {
        ScenarioResult {
            name: name.into(),
            passed: true,
            failures: Vec::new(),
        }
    }

    fn fail(&mut self, failure: impl Into<String>) {
        self.passed = false;
        self.failures.push(failure.into());
    }

    fn check(&mut self, condition: bool, failure: impl FnOnce() -> String) {
        if !condition {
            self.fail(failure());
        }
    }
}

// ============================================================================
// AUTHENTICATED ENCRYPTION
// ============================================================================

/// Round trip every message in `mode`
pub fn authenticated_roundtrip(mode: AuthenticationMode, messages: &[&[u8]]) -> ScenarioResult {
    let mut result = ScenarioResult::new(format!("authenticated_roundtrip_{:?}", mode));
    let mut protocol = authenticated_encryption(mode);

    for (i, message) in messages.iter().enumerate() {
        let opened = protocol
            .authenticated_encrypt_data(message)
            .and_then(|sealed| protocol.authenticated_decrypt_data(sealed));
        match opened {
            Ok(plaintext) => result.check(plaintext == *message, || format!("message {} altered", i)),
            Err(e) => result.fail(format!("message {}: {}", i, e)),
        }
    }
    result
}

/// Flip every bit of the standalone tag, one at a time, and expect an
/// authentication failure for each
pub fn tag_tamper_sweep(mode: AuthenticationMode, message: &[u8]) -> ScenarioResult {
    let mut result = ScenarioResult::new(format!("tag_tamper_sweep_{:?}", mode));
    let mut protocol = authenticated_encryption(mode);

    let sealed = match protocol.authenticated_encrypt_data(message) {
        Ok(sealed) => sealed,
        Err(e) => {
            result.fail(format!("encrypt failed: {}", e));
            return result;
        }
    };

    for bit in 0..sealed.authentication_tag.len() * 8 {
        let mut tampered = sealed.clone();
        flip_bit(&mut tampered.authentication_tag, bit);
        let outcome = protocol.authenticated_decrypt_data(tampered);
        result.check(outcome == Err(StratumError::Authentication), || {
            format!("bit {} accepted or misreported: {:?}", bit, outcome)
        });
    }
    result
}

// ============================================================================
// ENVELOPE, EXCHANGE, MULTIPLE, LAYERED
// ============================================================================

pub fn envelope_roundtrip(authenticated: bool, message: &[u8]) -> ScenarioResult {
    let mut result = ScenarioResult::new(format!("envelope_roundtrip_mac_{}", authenticated));
    let mut protocol = digital_envelope(authenticated);

    match protocol.seal_envelope(message) {
        Ok(sealed) => {
            result.check(sealed.authentication_tag.is_empty() != authenticated, || {
                "tag presence does not match MAC configuration".to_string()
            });
            match protocol.open_envelope(&sealed) {
                Ok(plaintext) => result.check(plaintext == message, || "payload altered".to_string()),
                Err(e) => result.fail(format!("open failed: {}", e)),
            }
        }
        Err(e) => result.fail(format!("seal failed: {}", e)),
    }
    result
}

/// Two parties agree on a secret over the group for `bits`
pub fn key_agreement(bits: u32) -> ScenarioResult {
    let mut result = ScenarioResult::new(format!("key_agreement_{}", bits));
    let mut initiator = key_exchange();
    let responder = key_exchange();

    if let Err(e) = initiator.set_key_exchange_size(bits) {
        result.fail(format!("size rejected: {}", e));
        return result;
    }

    let agreed = initiator.generate_exchange_request_information().and_then(|request| {
        let response =
            responder.generate_exchange_response_information(&request.prime, &request.generator)?;
        let ours = initiator.compute_shared_secret(&response.public_key, &request.private_key)?;
        let theirs = responder.compute_shared_secret(&request.public_key, &response.private_key)?;
        Ok(ours == theirs)
    });

    match agreed {
        Ok(equal) => result.check(equal, || "parties derived different secrets".to_string()),
        Err(e) => result.fail(format!("exchange failed: {}", e)),
    }
    result
}

pub fn multiple_roundtrip(mode: BlockMode, message: &[u8], iterations: usize) -> ScenarioResult {
    let mut result = ScenarioResult::new(format!("multiple_roundtrip_{}_{}", mode, iterations));
    let mut protocol = multiple_encryption(mode);

    let opened = protocol
        .multiple_encrypt_data(message, iterations)
        .and_then(|ciphertext| protocol.multiple_decrypt_data(&ciphertext, iterations));
    match opened {
        Ok(plaintext) => result.check(plaintext == message, || "payload altered".to_string()),
        Err(e) => result.fail(format!("round trip failed: {}", e)),
    }
    result
}

pub fn layered_roundtrip(message: &[u8], one_time_pad: &[u8]) -> ScenarioResult {
    let mut result = ScenarioResult::new("layered_roundtrip");
    let protocol = layered_encryption();

    let opened = protocol
        .layered_encrypt_data(message, one_time_pad)
        .and_then(|ciphertext| protocol.layered_decrypt_data(&ciphertext, one_time_pad));
    match opened {
        Ok(plaintext) => result.check(plaintext == message, || "payload altered".to_string()),
        Err(e) => result.fail(format!("round trip failed: {}", e)),
    }
    result
}

/// Every scenario over a fixed message set
pub fn run_all_scenarios() -> Vec<ScenarioResult> {
    let messages: [&[u8]; 3] = [b"", b"1234", "non-ascii \u{00e9}\u{4e16}".as_bytes()];
    let mut results = Vec::new();

    for mode in [
        AuthenticationMode::EncryptAndMac,
        AuthenticationMode::MacThenEncrypt,
        AuthenticationMode::EncryptThenMac,
    ] {
        results.push(authenticated_roundtrip(mode, &messages));
        if mode.has_standalone_tag() {
            results.push(tag_tamper_sweep(mode, b"sweep"));
        }
    }

    results.push(envelope_roundtrip(false, b"envelope"));
    results.push(envelope_roundtrip(true, b"envelope"));
    results.push(key_agreement(2048));
    for mode in [BlockMode::Cbc, BlockMode::Ctr] {
        results.push(multiple_roundtrip(mode, b"multiple", 3));
    }
    results.push(layered_roundtrip(b"layered", b"pad"));

    tracing::debug!(count = results.len(), "scenarios complete");
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::init_tracing;

    #[test]
    fn test_all_scenarios_pass() {
        init_tracing();
        for result in run_all_scenarios() {
            assert!(result.passed, "{}: {:?}", result.name, result.failures);
        }
    }

    #[test]
    fn test_failures_are_recorded() {
        let mut result = ScenarioResult::new("demo");
        result.check(true, || "unused".to_string());
        assert!(result.passed);
        result.fail("broken");
        assert!(!result.passed);
        assert_eq!(result.failures, vec!["broken".to_string()]);
    }

    #[test]
    fn test_unsupported_group_reported() {
        let result = key_agreement(1024);
        assert!(!result.passed);
        assert_eq!(result.failures.len(), 1);
    }
}
