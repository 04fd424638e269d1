use num_bigint::BigUint;

use super::chain::{ChainType, CunninghamKind, find_chain};

/// Best chain found around one origin. A length of 0 means no chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainMatch {
    pub length: u32,
    pub chain_type: ChainType,
}

/// Combined bi-twin length from the two one-sided lengths. The longer side
/// may contribute one unmatched extra member.
pub fn bitwin_length(first: u32, second: u32) -> u32 {
    if first > second {
        2 * second + 1
    } else {
        2 * first
    }
}

/// Runs both directions from `origin` and picks the longest shape.
/// Ties favour first kind, then second kind, then bi-twin.
pub fn find_prime_chain(origin: &BigUint, target: u32) -> ChainMatch {
    let first = CunninghamKind::First
        .start(origin)
        .map_or(0, |n| find_chain(&n, CunninghamKind::First, target));
    let second = CunninghamKind::Second
        .start(origin)
        .map_or(0, |n| find_chain(&n, CunninghamKind::Second, target));
    select(first, second)
}

fn select(first: u32, second: u32) -> ChainMatch {
    let bitwin = bitwin_length(first, second);
    let (length, chain_type) = if first >= second && first >= bitwin {
        (first, ChainType::CunninghamFirst)
    } else if second >= first && second >= bitwin {
        (second, ChainType::CunninghamSecond)
    } else {
        (bitwin, ChainType::BiTwin)
    };
    ChainMatch { length, chain_type }
}
