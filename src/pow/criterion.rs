use num_bigint::BigUint;
use num_traits::{One, ToPrimitive, Zero};

use super::chain::CunninghamKind;

/// Generalized Euler-Lagrange test.
///
/// Given a chain member `p` (assumed probable prime), predicts whether the
/// next member (`2p+1` or `2p-1`) is prime with a single modpow. A `true`
/// result is necessary but not sufficient; callers confirm the successor
/// with the primality tester.
///
/// Residues 0 and 2 mod 4 never satisfy the criterion.
pub fn euler_lagrange(p: &BigUint, kind: CunninghamKind) -> bool {
    if p.is_zero() {
        return false;
    }
    if let Some(small) = p.to_u32().filter(|&v| v <= 4) {
        return small < 4 || kind == CunninghamKind::Second;
    }

    let two = BigUint::from(2u32);
    let r = (p % 4u32).to_u32().unwrap_or(0);
    match kind {
        CunninghamKind::First => {
            let m = (p << 1u32) + 1u32;
            let x = two.modpow(p, &m);
            match r {
                // 2^p + 1 == 0 (mod 2p+1)
                1 => x == &m - 1u32,
                // 2^p - 1 == 0 (mod 2p+1)
                3 => x.is_one(),
                _ => false,
            }
        }
        CunninghamKind::Second => {
            let m = (p << 1u32) - 1u32;
            let x = two.modpow(&(p - 1u32), &m);
            match r {
                1 => x.is_one(),
                3 => x == &m - 1u32,
                _ => false,
            }
        }
    }
}
