use log::debug;
use num_bigint::BigUint;

use super::chain::{ChainType, CunninghamKind, find_chain};
use super::{HeaderDigest, Proof};

/// Checks a proof against the digest of the block it claims to seal.
///
/// The chain is always walked again from the proof's own multiplier and
/// type; `proof.chain_length` only has to clear the target and is otherwise
/// ignored.
pub fn is_valid_proof(digest: &HeaderDigest, proof: &Proof, target: u32) -> bool {
    let target = target.max(1);
    if !digest.is_proof_eligible() {
        debug!("reject: digest {} below threshold", digest);
        return false;
    }
    if proof.chain_length < target || proof.multiplier < BigUint::from(2u32) {
        debug!(
            "reject: claimed length {} / multiplier {} out of range",
            proof.chain_length, proof.multiplier
        );
        return false;
    }

    let valid = reaches(&proof.origin(&digest.to_biguint()), proof.chain_type, target);
    if !valid {
        debug!(
            "reject: {} chain at nonce {} does not reach {}",
            proof.chain_type, proof.nonce, target
        );
    }
    valid
}

/// Checks that the chain really is as long as `proof.chain_length` says.
///
/// `is_valid_proof` only walks up to the target, so a proof can clear it
/// while overstating its length. Anything that later trusts the stored
/// length (expansion, stats) needs this as well.
pub fn claimed_length_holds(digest: &HeaderDigest, proof: &Proof) -> bool {
    if proof.chain_length < 1 {
        return false;
    }
    let holds = reaches(
        &proof.origin(&digest.to_biguint()),
        proof.chain_type,
        proof.chain_length,
    );
    if !holds {
        debug!(
            "reject: {} chain at nonce {} is shorter than the claimed {}",
            proof.chain_type, proof.nonce, proof.chain_length
        );
    }
    holds
}

/// Walks the chain of the given shape from `origin` and checks it reaches
/// `length`. Bi-twin lengths split as ceil/floor between the two sides.
fn reaches(origin: &BigUint, chain_type: ChainType, length: u32) -> bool {
    let walk = |kind: CunninghamKind, target: u32| {
        kind.start(origin).map_or(0, |n| find_chain(&n, kind, target))
    };
    match chain_type {
        ChainType::CunninghamFirst => walk(CunninghamKind::First, length) >= length,
        ChainType::CunninghamSecond => walk(CunninghamKind::Second, length) >= length,
        ChainType::BiTwin => {
            let first = walk(CunninghamKind::First, length.div_ceil(2));
            let second = walk(CunninghamKind::Second, length / 2);
            first + second >= length
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pow::PRIMORIAL;
    use crate::pow::selector::find_prime_chain;

    fn eligible_digest() -> HeaderDigest {
        let mut bytes = [0x3cu8; 32];
        bytes[0] = 0xa7;
        HeaderDigest::from_bytes(bytes)
    }

    /// First multiplier (primorial included) whose best chain does or does
    /// not reach `target`.
    fn scan(digest: &HeaderDigest, target: u32, want_hit: bool) -> (BigUint, u32, ChainType) {
        let d = digest.to_biguint();
        for m in 1u32..200_000 {
            let multiplier = &*PRIMORIAL * BigUint::from(m);
            let found = find_prime_chain(&(&d * &multiplier), target);
            if (found.length >= target) == want_hit {
                return (multiplier, found.length, found.chain_type);
            }
        }
        panic!("no multiplier found");
    }

    #[test]
    fn accepts_a_searched_proof() {
        let digest = eligible_digest();
        let (multiplier, chain_length, chain_type) = scan(&digest, 2, true);
        let proof = Proof { nonce: 9, multiplier, chain_length, chain_type };
        assert!(is_valid_proof(&digest, &proof, 2));
    }

    #[test]
    fn forged_length_is_not_trusted() {
        let digest = eligible_digest();
        let (multiplier, _, chain_type) = scan(&digest, 2, false);
        let proof = Proof { nonce: 9, multiplier, chain_length: 40, chain_type };
        assert!(!is_valid_proof(&digest, &proof, 2));
    }

    #[test]
    fn claimed_length_must_reach_target() {
        let digest = eligible_digest();
        let (multiplier, _, chain_type) = scan(&digest, 2, true);
        let proof = Proof { nonce: 9, multiplier, chain_length: 1, chain_type };
        assert!(!is_valid_proof(&digest, &proof, 2));
    }

    #[test]
    fn inflated_length_fails_the_claim_check() {
        let digest = eligible_digest();
        let (multiplier, chain_length, chain_type) = scan(&digest, 1, true);
        let honest = Proof { nonce: 9, multiplier, chain_length, chain_type };
        assert!(claimed_length_holds(&digest, &honest));

        for claimed in [300, u32::MAX] {
            let inflated = Proof { chain_length: claimed, ..honest.clone() };
            assert!(is_valid_proof(&digest, &inflated, 1));
            assert!(!claimed_length_holds(&digest, &inflated));
        }
    }

    #[test]
    fn small_multiplier_is_rejected() {
        let digest = eligible_digest();
        let proof = Proof {
            nonce: 0,
            multiplier: BigUint::from(1u32),
            chain_length: 5,
            chain_type: ChainType::CunninghamFirst,
        };
        assert!(!is_valid_proof(&digest, &proof, 1));
    }

    #[test]
    fn low_digest_is_rejected() {
        let digest = eligible_digest();
        let (multiplier, chain_length, chain_type) = scan(&digest, 1, true);
        let proof = Proof { nonce: 0, multiplier, chain_length, chain_type };
        let low = HeaderDigest::from_bytes([0x11; 32]);
        assert!(!is_valid_proof(&low, &proof, 1));
    }

    #[test]
    fn acceptance_implies_recomputation_reaches_target() {
        let digest = eligible_digest();
        let d = digest.to_biguint();
        let target = 2;
        for m in 1u32..400 {
            let multiplier = &*PRIMORIAL * BigUint::from(m);
            for chain_type in [
                ChainType::CunninghamFirst,
                ChainType::CunninghamSecond,
                ChainType::BiTwin,
            ] {
                let proof = Proof {
                    nonce: 0,
                    multiplier: multiplier.clone(),
                    chain_length: target,
                    chain_type,
                };
                if is_valid_proof(&digest, &proof, target) {
                    let found = find_prime_chain(&proof.origin(&d), target);
                    assert!(found.length >= target, "m = {m}, {chain_type}");
                }
            }
        }
    }
}
