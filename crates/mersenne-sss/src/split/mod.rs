//! Secret splitting.
//!
//! A `Splitter` turns a secret into a (k, n) share set: it resolves the
//! security level, samples a random polynomial with the secret as its
//! constant term, and evaluates it at x = 1..n.

use num_bigint::{BigInt, RandBigInt};
use num_traits::Zero;
use rand::rngs::OsRng;

use crate::polynomial;
use crate::secret::Secret;
use crate::security::{legacy_mode, snap, SecurityLevel};
use crate::share::{SharePoint, ShareSet};
use crate::SssError;

/// Largest supported share count (exclusive): share indices fit in 31 bits.
const MAX_SHARES_EXCLUSIVE: u32 = 1 << 31;

/// Splits secrets into threshold share sets.
///
/// Holds a mutable current security level (and its cached prime) that any
/// call may update, so a `Splitter` is not safe for concurrent use.
/// Independent instances are.
#[derive(Debug, Clone)]
pub struct Splitter {
    level: SecurityLevel,
}

impl Splitter {
    /// Create a splitter at the default security level.
    ///
    /// The default is 13, or 7 under legacy mode.
    ///
    /// # Returns
    /// A new `Splitter`.
    pub fn new() -> Self {
        Splitter {
            level: SecurityLevel::new(),
        }
    }

    /// Create a splitter at a requested security level.
    ///
    /// # Arguments
    /// * `exponent` - The requested level, snapped up to a permitted
    ///   Mersenne exponent.
    ///
    /// # Returns
    /// `Ok(Splitter)`, or an error if the level is out of range.
    pub fn with_security_level(exponent: u32) -> Result<Self, SssError> {
        Ok(Splitter {
            level: SecurityLevel::with_exponent(exponent)?,
        })
    }

    /// The current security level exponent.
    pub fn security_level(&self) -> u32 {
        self.level.exponent()
    }

    /// Set the security level, snapping up to a permitted exponent.
    ///
    /// # Arguments
    /// * `exponent` - The requested level.
    ///
    /// # Returns
    /// `Ok(())`, or an error if the level is out of range.
    pub fn set_security_level(&mut self, exponent: u32) -> Result<(), SssError> {
        self.level.set_exponent(exponent)
    }

    /// Split a fresh random secret at the current security level.
    ///
    /// # Arguments
    /// * `k` - Minimum shares required for reconstruction, at least 2.
    /// * `n` - Total shares to produce, `k <= n < 2^31`.
    ///
    /// # Returns
    /// A `ShareSet` carrying the sampled secret and its n share points.
    pub fn make_shares(&mut self, k: u32, n: u32) -> Result<ShareSet, SssError> {
        check_parameters(k, n)?;
        let value = OsRng.gen_bigint_range(&BigInt::zero(), self.level.prime());
        self.split(k, n, Secret::from_field_element(value))
    }

    /// Split a caller-supplied secret.
    ///
    /// The security level is auto-raised to at least 8 times the secret's
    /// byte length (snapped up to a permitted exponent); it is never
    /// lowered here.
    ///
    /// # Arguments
    /// * `k` - Minimum shares required for reconstruction, at least 2.
    /// * `n` - Total shares to produce, `k <= n < 2^31`.
    /// * `secret` - The secret to split.
    ///
    /// # Returns
    /// A `ShareSet` carrying the secret and its n share points.
    pub fn make_shares_with_secret(
        &mut self,
        k: u32,
        n: u32,
        secret: &Secret,
    ) -> Result<ShareSet, SssError> {
        check_parameters(k, n)?;
        self.raise_level_for(secret)?;
        self.split(k, n, secret.clone())
    }

    /// Split with an explicit security level.
    ///
    /// The level is validated and snapped first. When a secret is
    /// supplied, the auto-raise rule still applies on top of the
    /// requested level; with no secret a uniform random one is sampled in
    /// [0, p).
    ///
    /// # Arguments
    /// * `k` - Minimum shares required for reconstruction, at least 2.
    /// * `n` - Total shares to produce, `k <= n < 2^31`.
    /// * `secret` - The secret to split, or `None` for a random one.
    /// * `exponent` - The requested security level.
    ///
    /// # Returns
    /// A `ShareSet` carrying the secret and its n share points.
    pub fn make_shares_with_level(
        &mut self,
        k: u32,
        n: u32,
        secret: Option<&Secret>,
        exponent: u32,
    ) -> Result<ShareSet, SssError> {
        check_parameters(k, n)?;
        self.level.set_exponent(exponent)?;
        match secret {
            Some(secret) => {
                self.raise_level_for(secret)?;
                self.split(k, n, secret.clone())
            }
            None => {
                let value = OsRng.gen_bigint_range(&BigInt::zero(), self.level.prime());
                self.split(k, n, Secret::from_field_element(value))
            }
        }
    }

    /// Raise the level to cover a secret of the given byte length.
    ///
    /// Never lowers the level.
    fn raise_level_for(&mut self, secret: &Secret) -> Result<(), SssError> {
        let required = secret.byte_len() as u64 * 8;
        if required > u64::from(self.level.exponent()) {
            let snapped = snap(required, legacy_mode())?;
            self.level.set_exponent_unchecked(snapped);
        }
        Ok(())
    }

    /// Sample the polynomial and evaluate it at x = 1..n.
    fn split(&mut self, k: u32, n: u32, secret: Secret) -> Result<ShareSet, SssError> {
        let coefficients = polynomial::sample_coefficients(secret.value(), k, &self.level);
        let points = (1..=n)
            .map(|i| {
                let x = BigInt::from(i);
                let y = polynomial::evaluate(&coefficients, &x, self.level.prime());
                SharePoint::new(x, y)
            })
            .collect();
        Ok(ShareSet::with_secret(secret, points))
    }
}

impl Default for Splitter {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate 2 <= k <= n < 2^31.
fn check_parameters(k: u32, n: u32) -> Result<(), SssError> {
    if k < 2 || n < k || n >= MAX_SHARES_EXCLUSIVE {
        return Err(SssError::InvalidThreshold { k, n });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_threshold_below_two() {
        let mut splitter = Splitter::with_security_level(13).unwrap();
        assert!(matches!(
            splitter.make_shares(1, 7),
            Err(SssError::InvalidThreshold { k: 1, n: 7 })
        ));
        assert!(matches!(
            splitter.make_shares(0, 7),
            Err(SssError::InvalidThreshold { .. })
        ));
    }

    #[test]
    fn test_rejects_more_required_than_issued() {
        let mut splitter = Splitter::with_security_level(13).unwrap();
        assert!(matches!(
            splitter.make_shares(3, 2),
            Err(SssError::InvalidThreshold { k: 3, n: 2 })
        ));
    }

    #[test]
    fn test_share_indices_run_from_one() {
        let mut splitter = Splitter::with_security_level(13).unwrap();
        let shares = splitter.make_shares(2, 5).unwrap();
        assert_eq!(shares.len(), 5);
        for (i, point) in shares.iter().enumerate() {
            assert_eq!(*point.x(), BigInt::from(i + 1));
        }
    }

    #[test]
    fn test_share_values_stay_in_field() {
        let mut splitter = Splitter::with_security_level(13).unwrap();
        let shares = splitter.make_shares(3, 8).unwrap();
        for point in shares.iter() {
            assert!(*point.y() >= BigInt::zero());
            assert!(point.y() < splitter.level.prime());
        }
    }

    #[test]
    fn test_split_keeps_original_secret() {
        let mut splitter = Splitter::with_security_level(13).unwrap();
        let secret = Secret::from(42u64);
        let shares = splitter.make_shares_with_secret(3, 5, &secret).unwrap();
        assert_eq!(shares.secret(), Some(&secret));
    }

    #[test]
    fn test_level_auto_raises_for_wide_secret() {
        let mut splitter = Splitter::with_security_level(13).unwrap();
        let secret = Secret::from_bytes(&[0xAB; 8]);
        splitter.make_shares_with_secret(2, 3, &secret).unwrap();
        // 8 bytes need 64 bits; the next permitted exponent is 89.
        assert_eq!(splitter.security_level(), 89);
    }

    #[test]
    fn test_level_never_lowers_for_narrow_secret() {
        let mut splitter = Splitter::with_security_level(521).unwrap();
        let secret = Secret::from(1u64);
        splitter.make_shares_with_secret(2, 3, &secret).unwrap();
        assert_eq!(splitter.security_level(), 521);
    }

    #[test]
    fn test_explicit_level_snaps_then_raises() {
        let mut splitter = Splitter::new();
        let secret = Secret::from_bytes(&[0x11; 20]);
        splitter
            .make_shares_with_level(2, 3, Some(&secret), 14)
            .unwrap();
        // Requested 14 snaps to 17; 20 bytes then force 8*20 = 160 -> 521.
        assert_eq!(splitter.security_level(), 521);
    }

    #[test]
    fn test_set_security_level_snaps_upward() {
        let mut splitter = Splitter::with_security_level(13).unwrap();
        splitter.set_security_level(100).unwrap();
        assert_eq!(splitter.security_level(), 107);
        assert!(splitter.set_security_level(4).is_err());
        assert!(splitter.set_security_level(u32::MAX).is_err());
    }

    #[test]
    fn test_random_secret_is_in_field() {
        let mut splitter = Splitter::with_security_level(31).unwrap();
        let shares = splitter.make_shares(2, 2).unwrap();
        let secret = shares.secret().unwrap();
        assert!(*secret.value() >= BigInt::zero());
        assert!(secret.value() < splitter.level.prime());
    }
}
