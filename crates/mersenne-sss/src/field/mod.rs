//! Signed modular arithmetic over Mersenne prime fields.
//!
//! The splitter and combiner consume only a handful of operations:
//! Mersenne prime construction, mathematical (non-negative) modulo,
//! the extended Euclidean algorithm, and modular division via Bezout
//! coefficients.

use num_bigint::BigInt;
use num_traits::{One, Signed, Zero};

/// Compute the Mersenne number 2^exponent - 1.
///
/// # Arguments
/// * `exponent` - The exponent e; callers pass members of the known
///   Mersenne prime exponent table.
///
/// # Returns
/// The value 2^e - 1.
pub fn mersenne_prime(exponent: u32) -> BigInt {
    (BigInt::one() << exponent) - BigInt::one()
}

/// Mathematical modulo: `((a % p) + p) % p`.
///
/// The big-integer backend's `%` is truncated and follows the sign of the
/// dividend; this wrapper always yields a value in `[0, p)`.
///
/// # Arguments
/// * `a` - Any signed value.
/// * `p` - The modulus, must be positive.
///
/// # Returns
/// `a` reduced to the canonical non-negative residue.
pub fn normalize(a: &BigInt, p: &BigInt) -> BigInt {
    ((a % p) + p) % p
}

/// Extended Euclidean algorithm.
///
/// Returns `(g, s, t)` with `s * a + t * b = g`. The gcd `g` is
/// non-negative whenever it is defined, so for prime `p` and `a` not a
/// multiple of `p`, `s` is a modular inverse of `a` (up to normalization).
///
/// # Arguments
/// * `a` - First operand, any sign.
/// * `b` - Second operand, any sign.
///
/// # Returns
/// The tuple `(g, s, t)` of gcd and Bezout coefficients.
pub fn extended_gcd(a: &BigInt, b: &BigInt) -> (BigInt, BigInt, BigInt) {
    let (mut r_prev, mut r) = (a.clone(), b.clone());
    let (mut s_prev, mut s) = (BigInt::one(), BigInt::zero());
    let (mut t_prev, mut t) = (BigInt::zero(), BigInt::one());

    while !r.is_zero() {
        let q = &r_prev / &r;
        let next = &r_prev - &q * &r;
        r_prev = std::mem::replace(&mut r, next);
        let next = &s_prev - &q * &s;
        s_prev = std::mem::replace(&mut s, next);
        let next = &t_prev - &q * &t;
        t_prev = std::mem::replace(&mut t, next);
    }

    if r_prev.is_negative() {
        (-r_prev, -s_prev, -t_prev)
    } else {
        (r_prev, s_prev, t_prev)
    }
}

/// Modular division `n / d` in GF(p) via Bezout coefficients.
///
/// Computes `n * s * g` where `(g, s, _) = extended_gcd(d, p)`. With
/// `gcd(d, p) = 1` the factor `g` is 1 and `s` is the inverse of `d`, so
/// the result is congruent to `n * d^-1` (mod p). The multiplication by
/// `g` must stay: reconstruction has to agree bit-for-bit with existing
/// share sets. The result is not reduced; callers normalize downstream.
///
/// # Arguments
/// * `n` - Dividend, any sign.
/// * `d` - Divisor, any sign, non-zero.
/// * `p` - The field prime.
///
/// # Returns
/// A value congruent to `n / d` modulo `p`.
pub fn div_mod(n: &BigInt, d: &BigInt, p: &BigInt) -> BigInt {
    let (g, s, _) = extended_gcd(d, p);
    n * s * g
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big(v: i64) -> BigInt {
        BigInt::from(v)
    }

    #[test]
    fn test_mersenne_prime_values() {
        assert_eq!(mersenne_prime(5), big(31));
        assert_eq!(mersenne_prime(7), big(127));
        assert_eq!(mersenne_prime(13), big(8191));
        assert_eq!(mersenne_prime(31), big(2147483647));
    }

    #[test]
    fn test_normalize_positive() {
        assert_eq!(normalize(&big(10), &big(7)), big(3));
        assert_eq!(normalize(&big(6), &big(7)), big(6));
        assert_eq!(normalize(&big(0), &big(7)), big(0));
    }

    #[test]
    fn test_normalize_negative() {
        assert_eq!(normalize(&big(-1), &big(7)), big(6));
        assert_eq!(normalize(&big(-15), &big(7)), big(6));
        assert_eq!(normalize(&big(-7), &big(7)), big(0));
    }

    #[test]
    fn test_extended_gcd_bezout_identity() {
        let cases = [(240, 46), (46, 240), (-240, 46), (17, 8191), (8191, 17)];
        for (a, b) in cases {
            let (a, b) = (big(a), big(b));
            let (g, s, t) = extended_gcd(&a, &b);
            assert_eq!(&s * &a + &t * &b, g, "bezout identity for ({}, {})", a, b);
        }
    }

    #[test]
    fn test_extended_gcd_non_negative_gcd() {
        let (g, _, _) = extended_gcd(&big(-240), &big(46));
        assert_eq!(g, big(2));
        let (g, _, _) = extended_gcd(&big(240), &big(-46));
        assert_eq!(g, big(2));
    }

    #[test]
    fn test_extended_gcd_inverse_mod_prime() {
        let p = mersenne_prime(13);
        for a in [1i64, 2, 17, 4096, 8190] {
            let (g, s, _) = extended_gcd(&big(a), &p);
            assert_eq!(g, BigInt::one());
            assert_eq!(normalize(&(s * big(a)), &p), BigInt::one());
        }
    }

    #[test]
    fn test_div_mod_inverts_multiplication() {
        let p = mersenne_prime(13);
        let n = big(4242);
        let d = big(57);
        let q = div_mod(&n, &d, &p);
        assert_eq!(normalize(&(q * d), &p), normalize(&n, &p));
    }

    #[test]
    fn test_div_mod_negative_divisor() {
        let p = mersenne_prime(13);
        let n = big(100);
        let d = big(-3);
        let q = div_mod(&n, &d, &p);
        assert_eq!(normalize(&(q * d), &p), normalize(&n, &p));
    }
}
