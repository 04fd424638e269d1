use std::fmt;

use num_bigint::BigUint;
use sha2::{Digest, Sha256};

use super::HEADER_HASH_MIN;

/// SHA-256 of every block field except the proof, read as a big-endian integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderDigest([u8; 32]);

impl HeaderDigest {
    pub fn from_preimage(preimage: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(preimage);
        let mut out = [0u8; 32];
        out.copy_from_slice(&hasher.finalize()[..]);
        Self(out)
    }

    #[cfg(test)]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn to_biguint(&self) -> BigUint {
        BigUint::from_bytes_be(&self.0)
    }

    /// True once the digest is at least 2^255 (top bit set).
    pub fn is_proof_eligible(&self) -> bool {
        self.to_biguint() >= *HEADER_HASH_MIN
    }
}

impl fmt::Display for HeaderDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}
