use num_bigint::{BigUint, RandBigInt};
use num_traits::{One, Zero};

use super::MILLER_RABIN_ROUNDS;

/// Base-2 Fermat filter: true iff `n == 2` or `2^(n-1) mod n == 1`.
///
/// Base-2 pseudoprimes (341, 561, ...) pass this, so it is only a cheap
/// pre-filter. Use [`is_probable_prime`] to accept a number as prime.
pub fn fermat_test(n: &BigUint) -> bool {
    let two = BigUint::from(2u32);
    if *n == two {
        return true;
    }
    if n.is_zero() {
        return false;
    }
    two.modpow(&(n - 1u32), n).is_one()
}

/// Miller-Rabin with `rounds` random bases in `[2, n-2]`.
pub fn miller_rabin(n: &BigUint, rounds: usize) -> bool {
    let two = BigUint::from(2u32);
    let three = BigUint::from(3u32);
    if *n < two {
        return false;
    }
    if *n == two || *n == three {
        return true;
    }
    if !n.bit(0) {
        return false;
    }

    // n - 1 = d * 2^s with d odd
    let n_minus_one = n - 1u32;
    let s = n_minus_one.trailing_zeros().unwrap_or(0);
    let d = &n_minus_one >> s;

    let mut rng = rand::thread_rng();
    let upper = n - 1u32; // exclusive bound, so bases stay <= n - 2
    'witness: for _ in 0..rounds {
        let a = rng.gen_biguint_range(&two, &upper);
        let mut x = a.modpow(&d, n);
        if x.is_one() || x == n_minus_one {
            continue;
        }
        for _ in 1..s {
            x = x.modpow(&two, n);
            if x == n_minus_one {
                continue 'witness;
            }
            if x.is_one() {
                return false;
            }
        }
        return false;
    }
    true
}

/// Two-stage test: the Fermat filter first, Miller-Rabin only on survivors.
pub fn is_probable_prime(n: &BigUint) -> bool {
    fermat_test(n) && miller_rabin(n, MILLER_RABIN_ROUNDS)
}
