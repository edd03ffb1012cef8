//! Secret reconstruction.
//!
//! A `Combiner` re-infers the security level from the magnitude of the
//! supplied share values, then recovers the polynomial's constant term
//! by Lagrange interpolation at x = 0 over GF(p).

use std::collections::HashSet;

use num_bigint::BigInt;
use num_traits::{One, Zero};

use crate::field::{div_mod, mersenne_prime, normalize};
use crate::secret::Secret;
use crate::security::{legacy_mode, snap_index, SecurityLevel, MERSENNE_EXPONENTS};
use crate::share::{SharePoint, ShareSet};
use crate::SssError;

/// Reconstructs secrets from threshold share sets.
///
/// Holds a mutable current security level (and its cached prime) that
/// every reconstruction updates, so a `Combiner` is not safe for
/// concurrent use. Independent instances are.
#[derive(Debug, Clone)]
pub struct Combiner {
    level: SecurityLevel,
}

impl Combiner {
    /// Create a combiner at the default security level.
    ///
    /// # Returns
    /// A new `Combiner`.
    pub fn new() -> Self {
        Combiner {
            level: SecurityLevel::new(),
        }
    }

    /// The security level adopted by the most recent reconstruction, or
    /// the default before any.
    pub fn security_level(&self) -> u32 {
        self.level.exponent()
    }

    /// Reconstruct the secret from a share set.
    ///
    /// Requires at least two shares with pairwise distinct x-coordinates.
    /// The modulus is inferred from the largest share value, then the
    /// polynomial's constant term is interpolated and wrapped as a
    /// [`Secret`] with its canonical byte length.
    ///
    /// # Arguments
    /// * `shares` - The shares to combine.
    ///
    /// # Returns
    /// `Ok(Secret)` on success, or an error for too few or duplicate
    /// shares.
    pub fn reconstruct(&mut self, shares: &ShareSet) -> Result<Secret, SssError> {
        if shares.len() < 2 {
            return Err(SssError::InsufficientShares {
                needed: 2,
                got: shares.len(),
            });
        }

        // Deterministic processing order; duplicate x-coordinates reject
        // the whole reconstruction.
        let mut points = shares.points().to_vec();
        points.sort_unstable();
        let mut seen = HashSet::new();
        for point in &points {
            if !seen.insert(point.x().clone()) {
                return Err(SssError::DuplicateShare);
            }
        }

        self.infer_security_level(&points)?;
        let value = interpolate_at_zero(&points, self.level.prime());
        Ok(Secret::from_field_element(value))
    }

    /// Reconstruct from the newline-separated textual share form.
    ///
    /// # Arguments
    /// * `text` - Shares in wire form, one per line.
    ///
    /// # Returns
    /// `Ok(Secret)` on success, or a parse or reconstruction error.
    pub fn reconstruct_text(&mut self, text: &str) -> Result<Secret, SssError> {
        let shares: ShareSet = text.parse()?;
        self.reconstruct(&shares)
    }

    /// Pick the prime consistent with the share magnitudes.
    ///
    /// Starts from 8 times the byte length of the largest y (snapped up),
    /// walks the exponent table downward while the smaller modulus still
    /// fits that value, then steps back up once. This lands on the
    /// modulus a split chose when the secret's byte length determined the
    /// level. Point sets that did not come from a split may adopt an
    /// unintended modulus; that is accepted.
    fn infer_security_level(&mut self, points: &[SharePoint]) -> Result<(), SssError> {
        let max_y = points
            .iter()
            .map(SharePoint::y)
            .max()
            .ok_or(SssError::InsufficientShares { needed: 2, got: 0 })?;

        let byte_len = (max_y.bits() + 7) / 8;
        let mut i = snap_index(byte_len.max(1) * 8, legacy_mode())?;
        let mut exponent = MERSENNE_EXPONENTS[i];
        let mut prime = mersenne_prime(exponent);

        while normalize(max_y, &prime) == *max_y && i > 0 && exponent > 5 {
            i -= 1;
            exponent = MERSENNE_EXPONENTS[i];
            prime = mersenne_prime(exponent);
        }
        if exponent > 5 {
            i += 1;
        }
        self.level.set_exponent_unchecked(MERSENNE_EXPONENTS[i]);
        Ok(())
    }
}

impl Default for Combiner {
    fn default() -> Self {
        Self::new()
    }
}

/// Lagrange interpolation of f(0) over GF(p).
///
/// Per-point numerator and denominator products are carried as exact
/// signed integers; each term divides by its denominator via Bezout
/// coefficients and only the final sum is reduced into the field.
fn interpolate_at_zero(points: &[SharePoint], prime: &BigInt) -> BigInt {
    let m = points.len();
    let mut num_prod = Vec::with_capacity(m);
    let mut den_prod = Vec::with_capacity(m);

    for i in 0..m {
        let mut num = BigInt::one();
        let mut den = BigInt::one();
        for j in 0..m {
            if j != i {
                num *= -points[j].x();
                den *= points[i].x() - points[j].x();
            }
        }
        num_prod.push(num);
        den_prod.push(den);
    }

    let d: BigInt = den_prod.iter().product();
    let mut sum = BigInt::zero();
    for i in 0..m {
        let y = normalize(points[i].y(), prime);
        sum += div_mod(&(&num_prod[i] * &d * y), &den_prod[i], prime);
    }

    let a = div_mod(&sum, &d, prime) + prime;
    normalize(&a, prime)
}
