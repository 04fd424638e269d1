use std::fmt;
use std::str::FromStr;

use num_bigint::BigUint;
use num_traits::{CheckedSub, One};
use serde::{Deserialize, Serialize};

use super::PowError;
use super::criterion::euler_lagrange;
use super::primality::is_probable_prime;

/// Shape of a prime chain anchored at an origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChainType {
    /// origin-1, then `2n+1` steps
    #[serde(rename = "CUNNINGHAM_CHAIN_1")]
    CunninghamFirst,
    /// origin+1, then `2n-1` steps
    #[serde(rename = "CUNNINGHAM_CHAIN_2")]
    CunninghamSecond,
    /// both of the above, interleaved
    #[serde(rename = "BITWIN_CHAIN")]
    BiTwin,
}

impl ChainType {
    pub const fn tag(self) -> &'static str {
        match self {
            ChainType::CunninghamFirst => "CUNNINGHAM_CHAIN_1",
            ChainType::CunninghamSecond => "CUNNINGHAM_CHAIN_2",
            ChainType::BiTwin => "BITWIN_CHAIN",
        }
    }
}

impl fmt::Display for ChainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ChainType {
    type Err = PowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CUNNINGHAM_CHAIN_1" => Ok(ChainType::CunninghamFirst),
            "CUNNINGHAM_CHAIN_2" => Ok(ChainType::CunninghamSecond),
            "BITWIN_CHAIN" => Ok(ChainType::BiTwin),
            other => Err(PowError::UnknownChainType(other.to_string())),
        }
    }
}

/// One direction of a Cunningham chain. Only these two are ever walked;
/// a bi-twin chain is a pair of walks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CunninghamKind {
    First,
    Second,
}

impl CunninghamKind {
    /// Next chain member: `2n+1` (first kind) or `2n-1` (second kind).
    pub fn step(self, n: &BigUint) -> BigUint {
        let doubled: BigUint = n << 1u32;
        match self {
            CunninghamKind::First => doubled + 1u32,
            CunninghamKind::Second => doubled - 1u32,
        }
    }

    /// Chain start relative to an origin. `None` for a first-kind walk from 0.
    pub fn start(self, origin: &BigUint) -> Option<BigUint> {
        match self {
            CunninghamKind::First => origin.checked_sub(&BigUint::one()),
            CunninghamKind::Second => Some(origin + 1u32),
        }
    }
}

/// Walks a chain from `n` and returns how many members were confirmed prime.
///
/// Returns 0 when `n` itself is not prime. Stops as soon as the length reaches
/// `target`, so the result is capped at `max(target, 1)`. A successor endorsed
/// by the Euler-Lagrange criterion but rejected by the primality tester is
/// not counted.
pub fn find_chain(n: &BigUint, kind: CunninghamKind, target: u32) -> u32 {
    if !is_probable_prime(n) {
        return 0;
    }
    let mut length = 1u32;
    if length >= target {
        return length;
    }

    let mut current = n.clone();
    while euler_lagrange(&current, kind) {
        current = kind.step(&current);
        length += 1;
        if !is_probable_prime(&current) {
            length -= 1;
            break;
        }
        if length >= target {
            return length;
        }
    }
    length
}

/// Lists the `length` members of a chain rooted at `origin`, in walk order.
///
/// Bi-twin chains alternate between the first-kind and second-kind walks,
/// starting with `origin-1`.
pub fn expand_chain(
    origin: &BigUint,
    length: u32,
    chain_type: ChainType,
) -> Result<Vec<BigUint>, PowError> {
    if length < 1 {
        return Err(PowError::InvalidChainLength(length));
    }
    let walk = |kind: CunninghamKind, count: usize| -> Result<Vec<BigUint>, PowError> {
        let mut members = Vec::with_capacity(count);
        let mut n = kind
            .start(origin)
            .ok_or_else(|| PowError::InvalidNumber(origin.to_string()))?;
        for _ in 0..count {
            let next = kind.step(&n);
            members.push(n);
            n = next;
        }
        Ok(members)
    };

    let length = length as usize;
    let members = match chain_type {
        ChainType::CunninghamFirst => walk(CunninghamKind::First, length)?,
        ChainType::CunninghamSecond => walk(CunninghamKind::Second, length)?,
        ChainType::BiTwin => {
            let first = walk(CunninghamKind::First, length.div_ceil(2))?;
            let second = walk(CunninghamKind::Second, length / 2)?;
            let mut members = Vec::with_capacity(length);
            let mut second = second.into_iter();
            for n in first {
                members.push(n);
                if let Some(m) = second.next() {
                    members.push(m);
                }
            }
            members
        }
    };
    Ok(members)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pow::selector::bitwin_length;
    use CunninghamKind::{First, Second};
    use proptest::prelude::*;

    fn big(n: u64) -> BigUint {
        BigUint::from(n)
    }

    #[test]
    fn chain_from_two_reaches_target_one() {
        assert!(find_chain(&big(2), First, 1) >= 1);
    }

    #[test]
    fn first_kind_chain_from_two() {
        // 2, 5, 11, 23, 47
        assert_eq!(find_chain(&big(2), First, 10), 5);
    }

    #[test]
    fn second_kind_chain_from_nineteen() {
        // 19, 37, 73
        assert_eq!(find_chain(&big(19), Second, 10), 3);
    }

    #[test]
    fn composite_start_has_no_chain() {
        assert_eq!(find_chain(&big(16), First, 5), 0);
        assert_eq!(find_chain(&big(18), Second, 5), 0);
        assert_eq!(find_chain(&big(1), First, 5), 0);
    }

    #[test]
    fn stops_early_at_target() {
        assert_eq!(find_chain(&big(2), First, 3), 3);
        assert_eq!(find_chain(&big(2), First, 0), 1);
    }

    #[test]
    fn second_kind_chain_from_three() {
        // 3, 5; the criterion rejects 5 since 9 is composite
        assert_eq!(find_chain(&big(3), Second, 10), 2);
    }

    #[test]
    fn tag_round_trip_and_unknown_tag() {
        for ty in [ChainType::CunninghamFirst, ChainType::CunninghamSecond, ChainType::BiTwin] {
            assert_eq!(ty.tag().parse::<ChainType>().unwrap(), ty);
        }
        assert_eq!(
            "CUNNINGHAM_CHAIN_3".parse::<ChainType>(),
            Err(PowError::UnknownChainType("CUNNINGHAM_CHAIN_3".into()))
        );
    }

    #[test]
    fn expand_first_kind() {
        let members = expand_chain(&big(3), 5, ChainType::CunninghamFirst).unwrap();
        assert_eq!(members, vec![big(2), big(5), big(11), big(23), big(47)]);
    }

    #[test]
    fn expand_bitwin_interleaves() {
        let members = expand_chain(&big(6), 4, ChainType::BiTwin).unwrap();
        assert_eq!(members, vec![big(5), big(7), big(11), big(13)]);
        let members = expand_chain(&big(6), 3, ChainType::BiTwin).unwrap();
        assert_eq!(members, vec![big(5), big(7), big(11)]);
    }

    #[test]
    fn expand_rejects_first_kind_from_zero() {
        assert!(matches!(
            expand_chain(&big(0), 1, ChainType::CunninghamFirst),
            Err(PowError::InvalidNumber(_))
        ));
    }

    #[test]
    fn expand_rejects_zero_length() {
        assert_eq!(
            expand_chain(&big(18), 0, ChainType::CunninghamSecond),
            Err(PowError::InvalidChainLength(0))
        );
    }

    #[test]
    fn expansion_reproduces_search() {
        let origin = big(18);
        let len = find_chain(&Second.start(&origin).unwrap(), Second, 10);
        let members = expand_chain(&origin, len, ChainType::CunninghamSecond).unwrap();
        assert_eq!(members, vec![big(19), big(37), big(73)]);
        assert_eq!(find_chain(&members[0], Second, 10), len);
    }

    proptest! {
        #[test]
        fn prop_expansion_matches_walk(origin in 2u64..20_000, second in any::<bool>()) {
            let (kind, chain_type) = if second {
                (Second, ChainType::CunninghamSecond)
            } else {
                (First, ChainType::CunninghamFirst)
            };
            let origin = big(origin);
            let len = find_chain(&kind.start(&origin).unwrap(), kind, 20);
            if len == 0 {
                return Ok(());
            }

            let members = expand_chain(&origin, len, chain_type).unwrap();
            prop_assert_eq!(members.len() as u32, len);
            prop_assert!(members.iter().all(is_probable_prime));
            for pair in members.windows(2) {
                prop_assert_eq!(&kind.step(&pair[0]), &pair[1]);
            }
            prop_assert_eq!(find_chain(&members[0], kind, 20), len);
        }

        #[test]
        fn prop_bitwin_expansion_matches_walks(origin in 2u64..20_000) {
            let origin = big(origin);
            let first = find_chain(&First.start(&origin).unwrap(), First, 20);
            let second = find_chain(&Second.start(&origin).unwrap(), Second, 20);
            let len = bitwin_length(first, second);
            if len == 0 {
                return Ok(());
            }

            let members = expand_chain(&origin, len, ChainType::BiTwin).unwrap();
            prop_assert_eq!(members.len() as u32, len);
            prop_assert!(members.iter().all(is_probable_prime));

            let evens: Vec<_> = members.iter().step_by(2).collect();
            let odds: Vec<_> = members.iter().skip(1).step_by(2).collect();
            for pair in evens.windows(2) {
                prop_assert_eq!(&First.step(pair[0]), pair[1]);
            }
            for pair in odds.windows(2) {
                prop_assert_eq!(&Second.step(pair[0]), pair[1]);
            }

            let (want_first, want_second) = (len.div_ceil(2), len / 2);
            prop_assert_eq!(find_chain(&members[0], First, want_first), want_first);
            if want_second >= 1 {
                prop_assert_eq!(find_chain(&members[1], Second, want_second), want_second);
            }
        }
    }
}
