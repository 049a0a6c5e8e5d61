//! Deterministic fixtures shared by the scenario drivers, property
//! suites and benchmarks

use stratum_core::{
    AuthenticatedEncryptionConfig, AuthenticationMode, BlockMode, CipherFormat, EncryptionLayer,
    KeyPair,
};
use stratum_primitives::{
    HashAlgorithm, HkdfFunction, HmacFunction, RsaCipher, SeededRandom, SymmetricAlgorithm,
    SymmetricBlockCipher,
};
use stratum_protocols::{
    AuthenticatedEncryption, DigitalEnvelope, KeyExchange, LayeredEncryption, MultipleEncryption,
};

/// 2048-bit RSA test key, PKCS#8 DER in base64. Never use outside tests.
pub const TEST_RSA_PRIVATE_KEY: &str = concat!(
    "MIIEvgIBADANBgkqhkiG9w0BAQEFAASCBKgwggSkAgEAAoIBAQCmBypk+OE5sWnfVgVY8ivY8Nco",
    "RjsG5YPsmua5nCL44OuD4Q6HISYZExkJhW/792KpGC0k+AfUOo2RgL2Ddmz8v+BG8FmVeW7Hn/lz",
    "NXodMhei/Ko4+7wK0Pu5S9WmyUCYfOUIk5kCMaJObUQKA/vZGsKgAxZIOLKC60Aoep1KwQovuy7P",
    "224zl3quM1EDbPv8roboGftEQJuDqmjxoyWSY5+ekRtVwHIphsRJilHKY/9vEZtw4nhOjESHdAIw",
    "SmQ7boqM+o6ZxeW7RtUEtHShGPX9dN1erKBV2qpPtEhKJauB2Kz5Ks0rzucAWplIq2YTXwpnYE66",
    "SIhHK8tVa8RlAgMBAAECggEAAyZLJle3VBQaxU8ZMl8DuG2XM08jwwV7G3Oz0U0WN8DyjtGn6CXX",
    "lm2vkafroCzI/Rq1jog7A8ppkZtO3Q3T0vaj30yjcmu3j4doIMigrKmc261t4D9cSZs9zz3SS4Px",
    "WwMxiBhetHUzFkhJ3GPHdQ6mJwlv9IZI0qV6Vdo/niGkBDgRhwqaOhIaFXr2q0bt7rFmmz2VGlJ7",
    "VcF60tlpAi3ub9HVyXTpVN5ddQnP/SRwBkyX2aCebRTYLi+wuSopaJUthOSvyHMvWy+/NtcesSzj",
    "+FyGUrJPAhJjLFRkc8vDdE/INfcs1dXd2yF/e9hXeOo818EaVIQeDXrVlqRT+QKBgQDcU6rbi9TX",
    "4mfYbpkddzLXhcfpW3pjCh4EjAetF1GtvZ9As7axIV2qtWy9hK/l7PS0fls1BxGkyEJGF9uptm0a",
    "SdBxo/tRw8COgDER8J3kL5C8wc16CgGrdRfAJBpuI1HT8DN1tGWETiHyuu8BsuypfMJFNwOX9mBp",
    "Q3GAzbfbnQKBgQDA6N1Cg0Px9rkZgYku0E/tDIe7ORZVyeVMbgWOH8Pu1GtKORhfVYxdjp+y+5H8",
    "edcJuGw9s0f8nT5128bme26y9cT+YmQmT+A2q/R56QkE020dvk5YN6iZEN0D3VdI14725066b13N",
    "rUvTygGTSwj0PBIjcl49qiCG4Io/hMklaQKBgQCKUUBHGg7iBPG6jxwywl05rnPlTReVS4mywxIi",
    "mSwezZdHsEr2AoNiIwmEJOOkjdDF6zlpHen2r/3jMSEm9y6hPUvNu+uP1jtxeorTv2HwGehch7Ju",
    "dg+8SwNBDalGEYhSbE5yC3Fb0Q1A7BgV0fT/JiJz/2iTIwo9qyh7eyp8hQKBgBWIKGIrKqNQSZrK",
    "NZivEazA0Emadp6+uURNp3sUmpcGyK7xLoI9lzw+Fh8xKztGEjV4i0RbxXYxyu32yP2i21lIS2Ol",
    "cc5A7iLMEK6mzyXlv3Epc68vDzd+hVzQENUFkmSGrufqVEsHw8Xw7zoUjvxL1C52roQtgBHt8CBk",
    "3tq5AoGBAKZL8gnUof5GOxUEWzFDtO3Sr0RildINBRzn5NdyZ5lEXiWMt4C5cAVNUHfeShb6EJO2",
    "oC5m499QPQC9Wef6bVs49/lFynkz/Ap89znHYv76ADxyJ9KGfG6jz3Q0nZKnT6xIXaYGvO7mt6V6",
    "vks0m2b7g9DBoZJFeYKJzqwnkp0H",
);

/// SPKI DER in base64, matching [`TEST_RSA_PRIVATE_KEY`]
pub const TEST_RSA_PUBLIC_KEY: &str = concat!(
    "MIIBIjANBgkqhkiG9w0BAQEFAAOCAQ8AMIIBCgKCAQEApgcqZPjhObFp31YFWPIr2PDXKEY7BuWD",
    "7JrmuZwi+ODrg+EOhyEmGRMZCYVv+/diqRgtJPgH1DqNkYC9g3Zs/L/gRvBZlXlux5/5czV6HTIX",
    "ovyqOPu8CtD7uUvVpslAmHzlCJOZAjGiTm1ECgP72RrCoAMWSDiygutAKHqdSsEKL7suz9tuM5d6",
    "rjNRA2z7/K6G6Bn7RECbg6po8aMlkmOfnpEbVcByKYbESYpRymP/bxGbcOJ4ToxEh3QCMEpkO26K",
    "jPqOmcXlu0bVBLR0oRj1/XTdXqygVdqqT7RISiWrgdis+SrNK87nAFqZSKtmE18KZ2BOukiIRyvL",
    "VWvEZQIDAQAB",
);

/// Seed for every deterministic randomness source handed out here
pub const FIXTURE_SEED: u64 = 0x5EED_57A7;

pub fn test_key_pair() -> KeyPair {
    KeyPair::new(TEST_RSA_PRIVATE_KEY, TEST_RSA_PUBLIC_KEY)
}

pub fn test_public_key() -> KeyPair {
    KeyPair::public_only(TEST_RSA_PUBLIC_KEY)
}

/// AES-128-CBC, PKCS#7, raw output, all-zero key and IV
pub fn zero_key_aes128() -> SymmetricBlockCipher {
    SymmetricBlockCipher::new(SymmetricAlgorithm::Aes128)
        .with_key(&[0u8; 16])
        .with_iv(&[0u8; 16])
}

/// HMAC-SHA-384 with an all-zero 16-byte key and no salt
pub fn zero_key_hmac_sha384() -> HmacFunction {
    HmacFunction::new(HashAlgorithm::Sha384).with_key(&[0u8; 16])
}

pub fn hkdf_sha256() -> HkdfFunction {
    HkdfFunction::new(HashAlgorithm::Sha256).with_info(b"stratum test")
}

/// Authenticated encryption over the all-zero AES-128/HMAC-SHA-384 pair
pub fn authenticated_encryption(mode: AuthenticationMode) -> AuthenticatedEncryption {
    AuthenticatedEncryption::with_config(
        Box::new(zero_key_aes128()),
        Box::new(zero_key_hmac_sha384()),
        AuthenticatedEncryptionConfig { mode },
    )
}

/// Envelope sealed for the embedded test key, optionally with an
/// HMAC-SHA-256 over the ciphertext
pub fn digital_envelope(authenticated: bool) -> DigitalEnvelope {
    let cipher = SymmetricBlockCipher::new(SymmetricAlgorithm::Aes256);
    let rsa = RsaCipher::new()
        .with_key_pair(test_key_pair())
        .expect("embedded test key rejected");
    let random = SeededRandom::new(FIXTURE_SEED);

    let envelope = DigitalEnvelope::new(Box::new(random), Box::new(cipher), Box::new(rsa))
        .expect("envelope fixture rejected");

    if authenticated {
        envelope.with_hasher(Box::new(
            HmacFunction::new(HashAlgorithm::Sha256).with_key(b"stratum envelope mac"),
        ))
    } else {
        envelope
    }
}

pub fn key_exchange() -> KeyExchange {
    KeyExchange::new(Box::new(hkdf_sha256()))
}

/// Camellia-256 in the given mode, hex output, re-keyed through HKDF
pub fn multiple_encryption(mode: BlockMode) -> MultipleEncryption {
    let cipher = SymmetricBlockCipher::new(SymmetricAlgorithm::Camellia256)
        .with_key(b"multiple encryption fixture key")
        .with_iv(b"fixture iv")
        .with_mode(mode)
        .with_format(CipherFormat::Hex);
    MultipleEncryption::new(Box::new(cipher), Box::new(hkdf_sha256()))
}

/// Three layers mixing algorithms, modes and formats
pub fn standard_layers() -> Vec<EncryptionLayer> {
    vec![
        EncryptionLayer::new("AES-128", b"layer one key", b"layer one iv", "CBC"),
        EncryptionLayer::new("Camellia-192", b"layer two key", b"layer two iv", "CTR")
            .with_format(CipherFormat::Base64),
        EncryptionLayer::new("AES-256", b"layer three key", b"", "ECB").with_format(CipherFormat::Hex),
    ]
}

pub fn layered_encryption() -> LayeredEncryption {
    LayeredEncryption::new(&standard_layers()).expect("layer fixture rejected")
}
