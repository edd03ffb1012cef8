//! Polynomial sampling and evaluation in GF(p).
//!
//! A split builds a polynomial of degree k-1 whose constant term is the
//! secret; shares are its values at x = 1..n. All arithmetic reduces
//! modulo the Mersenne prime of the active security level.

use num_bigint::{BigInt, Sign};
use num_traits::Zero;
use rand::rngs::OsRng;
use rand::RngCore;

use crate::field::normalize;
use crate::security::SecurityLevel;

/// Sample the coefficients of a random polynomial of degree `threshold - 1`.
///
/// `coefficients[0]` is the secret value; every other coefficient is drawn
/// by reading `level.coefficient_bytes()` bytes from the OS random source,
/// interpreting them as an unsigned little-endian integer, and reducing
/// modulo the level's prime.
pub fn sample_coefficients(
    secret_value: &BigInt,
    threshold: u32,
    level: &SecurityLevel,
) -> Vec<BigInt> {
    let mut coefficients = Vec::with_capacity(threshold as usize);
    coefficients.push(secret_value.clone());

    let mut buf = vec![0u8; level.coefficient_bytes()];
    for _ in 1..threshold {
        OsRng.fill_bytes(&mut buf);
        let drawn = BigInt::from_bytes_le(Sign::Plus, &buf);
        coefficients.push(drawn % level.prime());
    }
    coefficients
}

/// Evaluate a polynomial at `x` by Horner's rule, reducing mod `p` after
/// each step. Equivalent to the power sum with the high coefficient
/// driving the innermost multiplication.
pub fn evaluate(coefficients: &[BigInt], x: &BigInt, prime: &BigInt) -> BigInt {
    let mut acc = BigInt::zero();
    for coefficient in coefficients.iter().rev() {
        acc = normalize(&(acc * x + coefficient), prime);
    }
    acc
}
