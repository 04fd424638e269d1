pub mod chain;
pub mod criterion;
pub mod digest;
pub mod error;
pub mod primality;
pub mod proof;
pub mod search;
pub mod selector;
pub mod verify;

use num_bigint::BigUint;
use num_traits::One;
use once_cell::sync::Lazy;

pub use chain::{ChainType, expand_chain};
pub use digest::HeaderDigest;
pub use error::PowError;
pub use proof::Proof;
pub use search::{CancelToken, HeaderSource, ProofSearch, RoundOutcome};
pub use verify::{claimed_length_holds, is_valid_proof};

/// Product of the primes <= 7. Every origin is a multiple of it.
pub const FIXED_PRIMORIAL: u32 = 210;

/// Miller-Rabin rounds run on numbers that already passed the Fermat filter.
pub const MILLER_RABIN_ROUNDS: usize = 25;

/// A header digest is only proof-eligible once its value reaches 2^255.
pub static HEADER_HASH_MIN: Lazy<BigUint> = Lazy::new(|| BigUint::one() << 255u32);

pub static PRIMORIAL: Lazy<BigUint> = Lazy::new(|| BigUint::from(FIXED_PRIMORIAL));
