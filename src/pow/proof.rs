use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use super::{ChainType, PowError};

/// Prime-chain proof attached to a block.
///
/// `chain_length` is the miner's claim; verification recomputes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proof {
    pub nonce: u64,
    /// Full multiplier, primorial included. The origin is `digest * multiplier`.
    #[serde(with = "decimal")]
    pub multiplier: BigUint,
    pub chain_length: u32,
    pub chain_type: ChainType,
}

impl Proof {
    pub fn origin(&self, digest: &BigUint) -> BigUint {
        digest * &self.multiplier
    }
}

/// Parses a persisted decimal big integer.
pub fn parse_decimal(s: &str) -> Result<BigUint, PowError> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PowError::InvalidNumber(s.to_string()));
    }
    BigUint::parse_bytes(s.as_bytes(), 10).ok_or_else(|| PowError::InvalidNumber(s.to_string()))
}

/// Big integers travel as decimal strings.
pub mod decimal {
    use num_bigint::BigUint;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_str_radix(10))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigUint, D::Error> {
        let s = String::deserialize(deserializer)?;
        super::parse_decimal(&s).map_err(de::Error::custom)
    }
}
