use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::pow::{HeaderDigest, HeaderSource, Proof, claimed_length_holds, is_valid_proof};

/// Everything a miner hashes: the block minus its nonce and proof.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockTemplate {
    pub index: u64,
    pub timestamp: i64, // Unix timestamp (UTC)
    pub previous_hash: String,
    pub payload: Vec<String>,
}

impl BlockTemplate {
    pub fn new(index: u64, previous_hash: String, payload: Vec<String>) -> Self {
        Self {
            index,
            timestamp: Utc::now().timestamp(),
            previous_hash,
            payload,
        }
    }

    /// Header digest for `nonce`. Payload entries are serialized as JSON so
    /// the preimage is unambiguous.
    pub fn header_digest(&self, nonce: u64) -> HeaderDigest {
        let payload_json = serde_json::to_string(&self.payload).unwrap_or_default();
        let preimage = format!(
            "{}:{}:{}:{}:{}",
            self.index, self.timestamp, self.previous_hash, nonce, payload_json
        );
        HeaderDigest::from_preimage(preimage.as_bytes())
    }
}

impl HeaderSource for BlockTemplate {
    fn digest_with_nonce(&self, nonce: u64) -> HeaderDigest {
        self.header_digest(nonce)
    }
}

/// A single block sealed by a prime-chain proof.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub timestamp: i64,
    pub previous_hash: String,
    pub payload: Vec<String>,
    pub nonce: u64,
    /// `None` only for the genesis block.
    pub proof: Option<Proof>,
    pub hash: String, // Cached hash of the block
}

impl Block {
    /// Create the genesis block (first block in the chain).
    pub fn genesis() -> Self {
        let mut block = Self {
            index: 0,
            timestamp: Utc::now().timestamp(),
            previous_hash: String::from("0"),
            payload: Vec::new(),
            nonce: 0,
            proof: None,
            hash: String::new(),
        };
        block.hash = block.compute_hash();
        block
    }

    /// Seal a template with a proof found for it.
    pub fn seal(template: BlockTemplate, proof: Proof) -> Self {
        let mut block = Self {
            index: template.index,
            timestamp: template.timestamp,
            previous_hash: template.previous_hash,
            payload: template.payload,
            nonce: proof.nonce,
            proof: Some(proof),
            hash: String::new(),
        };
        block.hash = block.compute_hash();
        block
    }

    pub fn template(&self) -> BlockTemplate {
        BlockTemplate {
            index: self.index,
            timestamp: self.timestamp,
            previous_hash: self.previous_hash.clone(),
            payload: self.payload.clone(),
        }
    }

    pub fn header_digest(&self) -> HeaderDigest {
        self.template().header_digest(self.nonce)
    }

    /// SHA-256 over the header digest and the proof fields.
    pub fn compute_hash(&self) -> String {
        let proof_part = match &self.proof {
            Some(p) => format!("{}:{}:{}", p.multiplier, p.chain_length, p.chain_type),
            None => String::from("-"),
        };
        let preimage = format!("{}:{}", self.header_digest(), proof_part);
        let mut hasher = Sha256::new();
        hasher.update(preimage.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Cached hash matches the content, the proof recomputes to at least
    /// `target`, and the stored chain length is real. Does NOT validate
    /// chain linkage.
    pub fn is_valid(&self, target: u32) -> bool {
        if self.hash != self.compute_hash() {
            return false;
        }
        match &self.proof {
            Some(proof) => {
                let digest = self.header_digest();
                proof.nonce == self.nonce
                    && is_valid_proof(&digest, proof, target)
                    && claimed_length_holds(&digest, proof)
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Block, BlockTemplate};
    use crate::pow::{CancelToken, ProofSearch};

    fn mined(index: u64, payload: &[&str], target: u32) -> Block {
        let template = BlockTemplate::new(
            index,
            "prev".into(),
            payload.iter().map(|s| s.to_string()).collect(),
        );
        let mut search = ProofSearch::with_nonce(template.clone(), target, 0);
        let proof = search
            .run(32, &CancelToken::new(), |_| true)
            .expect("search without exit always finds a proof");
        Block::seal(template, proof)
    }

    #[test]
    fn genesis_has_valid_hash() {
        let b = Block::genesis();
        assert_eq!(b.hash, b.compute_hash());
        assert!(!b.hash.is_empty());
        assert!(!b.is_valid(1));
    }

    #[test]
    fn mining_produces_valid_proof() {
        let b = mined(1, &["hello"], 2);
        assert!(b.header_digest().is_proof_eligible());
        assert!(b.is_valid(2));
    }

    #[test]
    fn invalid_when_mutated() {
        let mut b = mined(2, &["a"], 1);
        let old_hash = b.hash.clone();

        // Mutate: append to the payload (tampering)
        b.payload.push("b".into());

        assert_ne!(old_hash, b.compute_hash());
        assert!(!b.is_valid(1));
    }

    #[test]
    fn invalid_when_nonce_and_proof_disagree() {
        let mut b = mined(3, &["a"], 1);
        b.nonce = b.nonce.wrapping_add(1);
        b.hash = b.compute_hash();
        assert!(!b.is_valid(1));
    }
}
