//! Finite-field Diffie-Hellman over the RFC 3526 MODP groups

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use num_bigint::{BigUint, RandBigInt};
use rand::rngs::OsRng;
use zeroize::Zeroize;

use stratum_core::{SecretBytes, StratumError, StratumResult};

/// Smallest prime accepted from a remote party
pub const MIN_PRIME_BITS: u64 = 1024;

/// Largest prime accepted from a remote party or a private record
pub const MAX_PRIME_BITS: u64 = 8192;

const MODP_1536_PRIME: &str = concat!(
    "FFFFFFFFFFFFFFFFC90FDAA22168C234C4C6628B80DC1CD129024E088A67CC74",
    "020BBEA63B139B22514A08798E3404DDEF9519B3CD3A431B302B0A6DF25F1437",
    "4FE1356D6D51C245E485B576625E7EC6F44C42E9A637ED6B0BFF5CB6F406B7ED",
    "EE386BFB5A899FA5AE9F24117C4B1FE649286651ECE45B3DC2007CB8A163BF05",
    "98DA48361C55D39A69163FA8FD24CF5F83655D23DCA3AD961C62F356208552BB",
    "9ED529077096966D670C354E4ABC9804F1746C08CA237327FFFFFFFFFFFFFFFF",
);

const MODP_2048_PRIME: &str = concat!(
    "FFFFFFFFFFFFFFFFC90FDAA22168C234C4C6628B80DC1CD129024E088A67CC74",
    "020BBEA63B139B22514A08798E3404DDEF9519B3CD3A431B302B0A6DF25F1437",
    "4FE1356D6D51C245E485B576625E7EC6F44C42E9A637ED6B0BFF5CB6F406B7ED",
    "EE386BFB5A899FA5AE9F24117C4B1FE649286651ECE45B3DC2007CB8A163BF05",
    "98DA48361C55D39A69163FA8FD24CF5F83655D23DCA3AD961C62F356208552BB",
    "9ED529077096966D670C354E4ABC9804F1746C08CA18217C32905E462E36CE3B",
    "E39E772C180E86039B2783A2EC07A28FB5C55DF06F4C52C9DE2BCBF695581718",
    "3995497CEA956AE515D2261898FA051015728E5A8AACAA68FFFFFFFFFFFFFFFF",
);

const MODP_3072_PRIME: &str = concat!(
    "FFFFFFFFFFFFFFFFC90FDAA22168C234C4C6628B80DC1CD129024E088A67CC74",
    "020BBEA63B139B22514A08798E3404DDEF9519B3CD3A431B302B0A6DF25F1437",
    "4FE1356D6D51C245E485B576625E7EC6F44C42E9A637ED6B0BFF5CB6F406B7ED",
    "EE386BFB5A899FA5AE9F24117C4B1FE649286651ECE45B3DC2007CB8A163BF05",
    "98DA48361C55D39A69163FA8FD24CF5F83655D23DCA3AD961C62F356208552BB",
    "9ED529077096966D670C354E4ABC9804F1746C08CA18217C32905E462E36CE3B",
    "E39E772C180E86039B2783A2EC07A28FB5C55DF06F4C52C9DE2BCBF695581718",
    "3995497CEA956AE515D2261898FA051015728E5A8AAAC42DAD33170D04507A33",
    "A85521ABDF1CBA64ECFB850458DBEF0A8AEA71575D060C7DB3970F85A6E1E4C7",
    "ABF5AE8CDB0933D71E8C94E04A25619DCEE3D2261AD2EE6BF12FFA06D98A0864",
    "D87602733EC86A64521F2B18177B200CBBE117577A615D6C770988C0BAD946E2",
    "08E24FA074E5AB3143DB5BFCE0FD108E4B82D120A93AD2CAFFFFFFFFFFFFFFFF",
);

const MODP_4096_PRIME: &str = concat!(
    "FFFFFFFFFFFFFFFFC90FDAA22168C234C4C6628B80DC1CD129024E088A67CC74",
    "020BBEA63B139B22514A08798E3404DDEF9519B3CD3A431B302B0A6DF25F1437",
    "4FE1356D6D51C245E485B576625E7EC6F44C42E9A637ED6B0BFF5CB6F406B7ED",
    "EE386BFB5A899FA5AE9F24117C4B1FE649286651ECE45B3DC2007CB8A163BF05",
    "98DA48361C55D39A69163FA8FD24CF5F83655D23DCA3AD961C62F356208552BB",
    "9ED529077096966D670C354E4ABC9804F1746C08CA18217C32905E462E36CE3B",
    "E39E772C180E86039B2783A2EC07A28FB5C55DF06F4C52C9DE2BCBF695581718",
    "3995497CEA956AE515D2261898FA051015728E5A8AAAC42DAD33170D04507A33",
    "A85521ABDF1CBA64ECFB850458DBEF0A8AEA71575D060C7DB3970F85A6E1E4C7",
    "ABF5AE8CDB0933D71E8C94E04A25619DCEE3D2261AD2EE6BF12FFA06D98A0864",
    "D87602733EC86A64521F2B18177B200CBBE117577A615D6C770988C0BAD946E2",
    "08E24FA074E5AB3143DB5BFCE0FD108E4B82D120A92108011A723C12A787E6D7",
    "88719A10BDBA5B2699C327186AF4E23C1A946834B6150BDA2583E9CA2AD44CE8",
    "DBBBC2DB04DE8EF92E8EFC141FBECAA6287C59474E6BC05D99B2964FA090C3A2",
    "233BA186515BE7ED1F612970CEE2D7AFB81BDD762170481CD0069127D5B05AA9",
    "93B4EA988D8FDDC186FFB7DC90A6C08F4DF435C934063199FFFFFFFFFFFFFFFF",
);

/// Domain parameters (prime modulus and generator)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DhParameters {
    prime: BigUint,
    generator: BigUint,
}

impl DhParameters {
    /// Standard group for a key pair size in bits
    pub fn for_key_size(bits: u32) -> StratumResult<Self> {
        let prime_hex = match bits {
            1536 => MODP_1536_PRIME,
            2048 => MODP_2048_PRIME,
            3072 => MODP_3072_PRIME,
            4096 => MODP_4096_PRIME,
            other => {
                return Err(StratumError::validation(format!(
                    "no Diffie-Hellman group for {} bits",
                    other
                )))
            }
        };
        Self::from_hex(prime_hex, "2")
    }

    /// Parse and sanity-check parameters received from a peer.
    /// Primality is not tested.
    pub fn from_hex(prime: &str, generator: &str) -> StratumResult<Self> {
        let prime = parse_hex(prime, "prime")?;
        let generator = parse_hex(generator, "generator")?;

        if prime.bits() < MIN_PRIME_BITS || !prime.bit(0) {
            return Err(StratumError::validation(format!(
                "prime must be odd with at least {} bits",
                MIN_PRIME_BITS
            )));
        }
        if prime.bits() > MAX_PRIME_BITS {
            return Err(StratumError::validation(format!(
                "prime must not exceed {} bits",
                MAX_PRIME_BITS
            )));
        }

        let two = BigUint::from(2u8);
        if generator < two || generator > &prime - &two {
            return Err(StratumError::validation("generator must lie in [2, p-2]"));
        }

        Ok(DhParameters { prime, generator })
    }

    pub fn prime_hex(&self) -> String {
        format!("{:X}", self.prime)
    }

    pub fn generator_hex(&self) -> String {
        format!("{:X}", self.generator)
    }

    pub fn prime_bits(&self) -> u64 {
        self.prime.bits()
    }

    /// Byte length of the prime, used to left-pad shared values
    pub fn prime_len(&self) -> usize {
        self.prime.bits().div_ceil(8) as usize
    }

    /// Bit length of private exponents for this prime size
    pub fn exponent_bits(&self) -> u64 {
        match self.prime.bits() {
            0..=1536 => 224,
            1537..=2048 => 256,
            2049..=3072 => 320,
            _ => 384,
        }
    }

    /// Draw a fresh key pair
    pub fn generate_key_pair(&self) -> DhKeyPair {
        let low = BigUint::from(2u8);
        let bound = BigUint::from(1u8) << self.exponent_bits();
        let high = bound.min(&self.prime - 1u8);
        let exponent = OsRng.gen_biguint_range(&low, &high);
        let public = self.generator.modpow(&exponent, &self.prime);

        DhKeyPair {
            parameters: self.clone(),
            exponent,
            public,
        }
    }

    /// Check a remote public value and return it parsed
    fn check_public(&self, public: &BigUint) -> StratumResult<()> {
        let two = BigUint::from(2u8);
        if public < &two || public > &(&self.prime - &two) {
            return Err(StratumError::system(
                "public key is inconsistent with the prime and generator",
            ));
        }
        Ok(())
    }
}

fn parse_hex(value: &str, what: &str) -> StratumResult<BigUint> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(StratumError::validation(format!("{} is empty", what)));
    }
    BigUint::parse_bytes(trimmed.as_bytes(), 16)
        .ok_or_else(|| StratumError::validation(format!("{} is not hexadecimal", what)))
}

/// One party's private exponent and public value
#[derive(Clone)]
pub struct DhKeyPair {
    parameters: DhParameters,
    exponent: BigUint,
    public: BigUint,
}

impl DhKeyPair {
    pub fn parameters(&self) -> &DhParameters {
        &self.parameters
    }

    /// Base64 of the big-endian public value
    pub fn encode_public(&self) -> String {
        STANDARD.encode(self.public.to_bytes_be())
    }

    /// Base64 private record: `u16 len | prime | u16 len | generator | exponent`
    pub fn encode_private(&self) -> StratumResult<String> {
        let prime = self.parameters.prime.to_bytes_be();
        let generator = self.parameters.generator.to_bytes_be();
        let exponent = SecretBytes::new(self.exponent.to_bytes_be());

        let mut record = Vec::with_capacity(4 + prime.len() + generator.len() + exponent.len());
        record.extend_from_slice(&field_len(&prime)?.to_be_bytes());
        record.extend_from_slice(&prime);
        record.extend_from_slice(&field_len(&generator)?.to_be_bytes());
        record.extend_from_slice(&generator);
        record.extend_from_slice(&exponent);

        let encoded = STANDARD.encode(&record);
        record.zeroize();
        Ok(encoded)
    }

    /// Parse a private record produced by [`DhKeyPair::encode_private`]
    pub fn decode_private(encoded: &str) -> StratumResult<Self> {
        let record = SecretBytes::new(
            STANDARD
                .decode(encoded.trim().as_bytes())
                .map_err(|_| StratumError::validation("private key is not valid base64"))?,
        );

        let (prime, rest) = split_field(&record)?;
        let (generator, exponent) = split_field(rest)?;
        if exponent.is_empty() {
            return Err(StratumError::validation("private key record has no exponent"));
        }
        if exponent.len() > prime.len() {
            return Err(StratumError::validation(
                "private exponent is longer than the prime",
            ));
        }

        let prime = BigUint::from_bytes_be(prime);
        let generator = BigUint::from_bytes_be(generator);
        let parameters = DhParameters::from_hex(&format!("{:X}", prime), &format!("{:X}", generator))?;
        let exponent = BigUint::from_bytes_be(exponent);
        let public = parameters.generator.modpow(&exponent, &parameters.prime);

        Ok(DhKeyPair {
            parameters,
            exponent,
            public,
        })
    }

    /// Raw shared value with a peer's base64 public value, left-padded to
    /// the prime length
    pub fn shared_value(&self, remote_public: &str) -> StratumResult<SecretBytes> {
        let remote = decode_public(remote_public)?;
        self.parameters.check_public(&remote)?;

        let shared = remote.modpow(&self.exponent, &self.parameters.prime);
        let bytes = shared.to_bytes_be();
        let mut padded = vec![0u8; self.parameters.prime_len().saturating_sub(bytes.len())];
        padded.extend_from_slice(&bytes);
        Ok(SecretBytes::new(padded))
    }
}

impl std::fmt::Debug for DhKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DhKeyPair")
            .field("prime_bits", &self.parameters.prime_bits())
            .finish_non_exhaustive()
    }
}

/// Parse a base64 big-endian public value
pub fn decode_public(encoded: &str) -> StratumResult<BigUint> {
    let bytes = STANDARD
        .decode(encoded.trim().as_bytes())
        .map_err(|_| StratumError::validation("public key is not valid base64"))?;
    if bytes.is_empty() {
        return Err(StratumError::validation("public key is empty"));
    }
    Ok(BigUint::from_bytes_be(&bytes))
}

fn field_len(field: &[u8]) -> StratumResult<u16> {
    u16::try_from(field.len())
        .map_err(|_| StratumError::validation("private key record field too long"))
}

fn split_field(record: &[u8]) -> StratumResult<(&[u8], &[u8])> {
    if record.len() < 2 {
        return Err(StratumError::validation("private key record truncated"));
    }
    let len = u16::from_be_bytes([record[0], record[1]]) as usize;
    let body = &record[2..];
    if body.len() < len {
        return Err(StratumError::validation("private key record truncated"));
    }
    Ok(body.split_at(len))
}
