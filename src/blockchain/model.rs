use log::info;

use super::{Block, BlockError, BlockTemplate};

/// Simple in-memory blockchain sealed by prime-chain proofs.
#[derive(Debug)]
pub struct Blockchain {
    pub chain: Vec<Block>,
    pub target: u32,
}

impl Blockchain {
    /// Initialize a new blockchain with a genesis block.
    pub fn new(target: u32) -> Self {
        let mut bc = Self {
            chain: Vec::new(),
            target: target.max(1),
        };
        bc.chain.push(Block::genesis());
        bc
    }

    /// Return the last block in the chain.
    pub fn last_block(&self) -> &Block {
        self.chain
            .last()
            .expect("Blockchain should always have at least the genesis block")
    }

    /// Template for the next block on top of the current head.
    pub fn next_template(&self, payload: Vec<String>) -> BlockTemplate {
        BlockTemplate::new(self.chain.len() as u64, self.last_block().hash.clone(), payload)
    }

    /// Append a block mined elsewhere after checking it against the head.
    pub fn append_premined_block(&mut self, block: Block) -> Result<(), BlockError> {
        let head = self.last_block();
        if block.previous_hash != head.hash {
            return Err(BlockError::StaleParent);
        }
        let expected = self.chain.len() as u64;
        if block.index != expected {
            return Err(BlockError::IndexMismatch {
                expected,
                got: block.index,
            });
        }
        if block.hash != block.compute_hash() {
            return Err(BlockError::HashMismatch);
        }
        if block.proof.is_none() {
            return Err(BlockError::MissingProof);
        }
        if !block.is_valid(self.target) {
            return Err(BlockError::InvalidProof);
        }
        info!("appended block #{} hash={}", block.index, block.hash);
        self.chain.push(block);
        Ok(())
    }

    /// Validate the entire chain: linkage, hashes and proofs.
    pub fn is_valid_chain(&self) -> bool {
        if self.chain.is_empty() {
            return false;
        }

        // Validate genesis block immutability
        let genesis = &self.chain[0];
        if genesis.index != 0
            || genesis.previous_hash != "0"
            || genesis.proof.is_some()
            || genesis.hash != genesis.compute_hash()
        {
            return false;
        }

        // Validate the rest of the chain
        for i in 1..self.chain.len() {
            let current = &self.chain[i];
            let prev = &self.chain[i - 1];

            // Check linkage
            if current.previous_hash != prev.hash || current.index != i as u64 {
                return false;
            }

            // Check hash integrity + proof
            if !current.is_valid(self.target) {
                return false;
            }
        }

        true
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn target(&self) -> u32 {
        self.target
    }
}
