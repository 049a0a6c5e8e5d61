//! Entity authentication built on the primitive contracts
//!
//! - Symmetric-key challenge/response
//! - Public-key challenge/response, with optional signed challenges
//! - Password hashing and verification through a KDF

use stratum_core::{
    constant_time_eq, AsymmetricCipher, AuthenticationToken, ChallengeConfig,
    KeyDerivationFunction, RandomnessSource, SignatureScheme, StratumError, StratumResult,
    SymmetricCipher,
};

/// Compare a claimant's response against the issued challenge
fn check_response(token: &AuthenticationToken, response: &[u8]) -> bool {
    let matches = constant_time_eq(&token.token_data, response);
    if !matches {
        tracing::warn!("challenge response mismatch");
    }
    matches
}

/// Challenge/response over a shared symmetric key
#[derive(Clone, Debug)]
pub struct SymmetricKeyAuthentication {
    cipher: Box<dyn SymmetricCipher>,
    random: Box<dyn RandomnessSource>,
    config: ChallengeConfig,
}

impl SymmetricKeyAuthentication {
    pub fn new(cipher: Box<dyn SymmetricCipher>, random: Box<dyn RandomnessSource>) -> Self {
        SymmetricKeyAuthentication {
            cipher,
            random,
            config: ChallengeConfig::default(),
        }
    }

    pub fn with_config(
        cipher: Box<dyn SymmetricCipher>,
        random: Box<dyn RandomnessSource>,
        config: ChallengeConfig,
    ) -> StratumResult<Self> {
        config.validate()?;
        Ok(SymmetricKeyAuthentication {
            cipher,
            random,
            config,
        })
    }

    /// Draw a random nonce and encrypt it for the claimant
    pub fn generate_challenge(&mut self) -> StratumResult<AuthenticationToken> {
        let token_data = self.random.get_bytes(self.config.challenge_size);
        let cipher_data = self.cipher.encrypt_data(&token_data)?;
        tracing::debug!(size = token_data.len(), "issued symmetric challenge");
        Ok(AuthenticationToken {
            token_data,
            cipher_data,
        })
    }

    /// Claimant side: recover the nonce
    pub fn extract_challenge(&self, cipher_data: &[u8]) -> StratumResult<Vec<u8>> {
        self.cipher.decrypt_data(cipher_data)
    }

    pub fn verify_challenge(&self, token: &AuthenticationToken, response: &[u8]) -> bool {
        check_response(token, response)
    }
}

/// Challenge/response over an asymmetric key pair
#[derive(Clone, Debug)]
pub struct PublicKeyAuthentication {
    asymmetric: Box<dyn AsymmetricCipher>,
    random: Box<dyn RandomnessSource>,
    signer: Option<Box<dyn SignatureScheme>>,
    config: ChallengeConfig,
}

impl PublicKeyAuthentication {
    pub fn new(
        asymmetric: Box<dyn AsymmetricCipher>,
        random: Box<dyn RandomnessSource>,
    ) -> StratumResult<Self> {
        Self::with_config(asymmetric, random, ChallengeConfig::default())
    }

    pub fn with_config(
        asymmetric: Box<dyn AsymmetricCipher>,
        random: Box<dyn RandomnessSource>,
        config: ChallengeConfig,
    ) -> StratumResult<Self> {
        if !asymmetric.has_public_key() {
            return Err(StratumError::configuration(
                "public-key authentication requires an asymmetric cipher with a key pair",
            ));
        }
        config.validate()?;
        Ok(PublicKeyAuthentication {
            asymmetric,
            random,
            signer: None,
            config,
        })
    }

    pub fn with_signer(mut self, signer: Box<dyn SignatureScheme>) -> Self {
        self.signer = Some(signer);
        self
    }

    /// Draw a nonce and encrypt it to the claimant's public key
    pub fn generate_challenge(&mut self) -> StratumResult<AuthenticationToken> {
        let token_data = self.random.get_bytes(self.config.challenge_size);
        let cipher_data = self.asymmetric.encrypt_data(&token_data)?;
        tracing::debug!(size = token_data.len(), "issued public-key challenge");
        Ok(AuthenticationToken {
            token_data,
            cipher_data,
        })
    }

    /// Claimant side: decrypt with the private key
    pub fn extract_challenge(&self, cipher_data: &[u8]) -> StratumResult<Vec<u8>> {
        self.asymmetric.decrypt_data(cipher_data)
    }

    pub fn verify_challenge(&self, token: &AuthenticationToken, response: &[u8]) -> bool {
        check_response(token, response)
    }

    /// Claimant side: prove possession of the signing key
    pub fn sign_challenge(&self, challenge: &[u8]) -> StratumResult<Vec<u8>> {
        self.signer()?.sign_data(challenge)
    }

    pub fn verify_signed_challenge(
        &self,
        token: &AuthenticationToken,
        signature: &[u8],
    ) -> StratumResult<bool> {
        let valid = self.signer()?.verify_data_signature(signature, &token.token_data)?;
        if !valid {
            tracing::warn!("challenge signature mismatch");
        }
        Ok(valid)
    }

    fn signer(&self) -> StratumResult<&dyn SignatureScheme> {
        self.signer
            .as_deref()
            .ok_or_else(|| StratumError::configuration("no signature scheme configured"))
    }
}

/// Password hashing through a key derivation function
#[derive(Clone, Debug)]
pub struct PasswordBasedAuthentication {
    kdf: Box<dyn KeyDerivationFunction>,
}

impl PasswordBasedAuthentication {
    pub fn new(kdf: Box<dyn KeyDerivationFunction>) -> Self {
        PasswordBasedAuthentication { kdf }
    }

    pub fn hash_password(&self, password: &[u8]) -> StratumResult<Vec<u8>> {
        if password.is_empty() {
            return Err(StratumError::validation("password must not be empty"));
        }
        self.kdf.hash_data(password)
    }

    pub fn verify_password(&self, password: &[u8], expected: &[u8]) -> StratumResult<bool> {
        let valid = constant_time_eq(&self.hash_password(password)?, expected);
        if !valid {
            tracing::warn!("password mismatch");
        }
        Ok(valid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::OnceLock;
    use stratum_core::KeyPair;
    use stratum_primitives::{
        generate_key_pair, HashAlgorithm, Pbkdf2Function, RsaCipher, RsaSigner, SeededRandom,
        SymmetricAlgorithm, SymmetricBlockCipher,
    };

    fn key_pair() -> KeyPair {
        static PAIR: OnceLock<KeyPair> = OnceLock::new();
        PAIR.get_or_init(|| generate_key_pair(1024).unwrap()).clone()
    }

    #[test]
    fn test_symmetric_challenge_response() {
        let cipher = SymmetricBlockCipher::new(SymmetricAlgorithm::Aes128).with_key(b"shared");
        let mut verifier = SymmetricKeyAuthentication::new(
            Box::new(cipher.clone()),
            Box::new(SeededRandom::new(3)),
        );
        let claimant = SymmetricKeyAuthentication::new(Box::new(cipher), Box::new(SeededRandom::new(4)));

        let token = verifier.generate_challenge().unwrap();
        assert_eq!(token.token_data.len(), 32);
        let response = claimant.extract_challenge(&token.cipher_data).unwrap();
        assert!(verifier.verify_challenge(&token, &response));
        assert!(!verifier.verify_challenge(&token, &response[1..]));
    }

    #[test]
    fn test_symmetric_wrong_key_fails() {
        let mut verifier = SymmetricKeyAuthentication::new(
            Box::new(SymmetricBlockCipher::new(SymmetricAlgorithm::Aes128).with_key(b"right")),
            Box::new(SeededRandom::new(5)),
        );
        let impostor = SymmetricKeyAuthentication::new(
            Box::new(SymmetricBlockCipher::new(SymmetricAlgorithm::Aes128).with_key(b"wrong")),
            Box::new(SeededRandom::new(6)),
        );

        let token = verifier.generate_challenge().unwrap();
        let verified = impostor
            .extract_challenge(&token.cipher_data)
            .map(|response| verifier.verify_challenge(&token, &response))
            .unwrap_or(false);
        assert!(!verified);
    }

    #[test]
    fn test_challenge_size_validation() {
        let err = SymmetricKeyAuthentication::with_config(
            Box::new(SymmetricBlockCipher::new(SymmetricAlgorithm::Aes128)),
            Box::new(SeededRandom::new(0)),
            ChallengeConfig { challenge_size: 0 },
        )
        .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_public_key_challenge_and_signature() {
        let pair = key_pair();
        let mut verifier = PublicKeyAuthentication::new(
            Box::new(RsaCipher::new().with_key_pair(KeyPair::public_only(pair.public_key.clone())).unwrap()),
            Box::new(SeededRandom::new(9)),
        )
        .unwrap()
        .with_signer(Box::new(
            RsaSigner::new().with_key_pair(KeyPair::public_only(pair.public_key.clone())).unwrap(),
        ));
        let claimant = PublicKeyAuthentication::new(
            Box::new(RsaCipher::new().with_key_pair(pair.clone()).unwrap()),
            Box::new(SeededRandom::new(10)),
        )
        .unwrap()
        .with_signer(Box::new(RsaSigner::new().with_key_pair(pair).unwrap()));

        let token = verifier.generate_challenge().unwrap();
        let response = claimant.extract_challenge(&token.cipher_data).unwrap();
        assert!(verifier.verify_challenge(&token, &response));

        let signature = claimant.sign_challenge(&response).unwrap();
        assert!(verifier.verify_signed_challenge(&token, &signature).unwrap());

        let other = verifier.generate_challenge().unwrap();
        assert!(!verifier.verify_signed_challenge(&other, &signature).unwrap());
    }

    #[test]
    fn test_public_key_without_signer() {
        let auth = PublicKeyAuthentication::new(
            Box::new(RsaCipher::new().with_key_pair(key_pair()).unwrap()),
            Box::new(SeededRandom::new(1)),
        )
        .unwrap();
        assert!(auth.sign_challenge(b"nonce").unwrap_err().is_configuration());
    }

    #[test]
    fn test_public_key_requires_key_pair() {
        let err = PublicKeyAuthentication::new(Box::new(RsaCipher::new()), Box::new(SeededRandom::new(1)))
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_password_hash_and_verify() {
        let kdf = Pbkdf2Function::new(HashAlgorithm::Sha256)
            .with_salt(b"per-user salt")
            .with_iterations(1_000);
        let auth = PasswordBasedAuthentication::new(Box::new(kdf));

        let stored = auth.hash_password(b"correct horse").unwrap();
        assert!(auth.verify_password(b"correct horse", &stored).unwrap());
        assert!(!auth.verify_password(b"battery staple", &stored).unwrap());
        assert!(auth.hash_password(b"").unwrap_err().is_validation());
        assert!(auth.verify_password(b"", &stored).unwrap_err().is_validation());
    }
}
