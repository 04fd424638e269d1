pub mod block;
pub mod model;

use thiserror::Error;

pub use block::{Block, BlockTemplate};
pub use model::Blockchain;

/// Default fixed target chain length. No retargeting.
pub const DEFAULT_TARGET: u32 = 3;

/// Default number of nonce/multiplier attempts per mining round.
pub const DEFAULT_ROUND_SIZE: u32 = 64;

/// How many recent intervals to average for stats
pub const STATS_WINDOW: usize = 10;

/// Why a block was refused by [`Blockchain::append_premined_block`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BlockError {
    #[error("stale block: parent is not the current head")]
    StaleParent,
    #[error("index mismatch: expected {expected}, got {got}")]
    IndexMismatch { expected: u64, got: u64 },
    #[error("hash mismatch")]
    HashMismatch,
    #[error("block has no proof")]
    MissingProof,
    #[error("proof does not verify")]
    InvalidProof,
}
