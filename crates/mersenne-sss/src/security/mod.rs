//! Security levels: permitted Mersenne exponents and the snap-up rules.
//!
//! A security level is a Mersenne prime exponent e; the share arithmetic
//! runs in GF(2^e - 1). Requested levels snap up to the next permitted
//! exponent, with a floor of 13 unless the process-wide legacy mode is
//! enabled.

use std::sync::atomic::{AtomicBool, Ordering};

use num_bigint::BigInt;

use crate::field::mersenne_prime;
use crate::SssError;

/// The known Mersenne prime exponents up to 43112609, ascending.
pub const MERSENNE_EXPONENTS: [u32; 45] = [
    5, 7, 13, 17, 19, 31, 61, 89, 107, 127, 521, 607, 1279, 2203, 2281,
    3217, 4253, 4423, 9689, 9941, 11213, 19937, 21701, 23209, 44497,
    86243, 110503, 132049, 216091, 756839, 859433, 1257787, 1398269,
    2976221, 3021377, 6972593, 13466917, 20996011, 24036583, 25964951,
    30402457, 32582657, 37156667, 42643801, 43112609,
];

/// Smallest exponent accepted at all (legacy mode).
pub const MIN_EXPONENT: u32 = 5;

/// Smallest exponent accepted when legacy mode is off.
pub const MIN_MODERN_EXPONENT: u32 = 13;

/// Default exponent at construction when legacy mode is off.
pub const DEFAULT_EXPONENT: u32 = 13;

/// Default exponent at construction under legacy mode.
pub const LEGACY_DEFAULT_EXPONENT: u32 = 7;

/// Process-wide legacy switch.
///
/// Read-mostly: flipping it concurrently with in-flight splits yields
/// unspecified level selection, so set it once at startup.
static LEGACY_MODE: AtomicBool = AtomicBool::new(false);

/// Enable or disable legacy mode process-wide.
///
/// Legacy mode lowers the minimum security level from 13 to 5 and the
/// default level at construction from 13 to 7.
///
/// # Arguments
/// * `enabled` - The new state of the switch.
pub fn set_legacy_mode(enabled: bool) {
    LEGACY_MODE.store(enabled, Ordering::Relaxed);
}

/// Read the process-wide legacy switch.
///
/// # Returns
/// `true` if legacy mode is enabled.
pub fn legacy_mode() -> bool {
    LEGACY_MODE.load(Ordering::Relaxed)
}

/// Snap a requested level to the index of a permitted exponent.
///
/// Semantics for a requested value v:
/// 1. v below 5 is out of range.
/// 2. With `legacy` off, v below 13 is treated as 13.
/// 3. v snaps up to the next member of [`MERSENNE_EXPONENTS`]; values
///    above the largest member are out of range.
///
/// # Arguments
/// * `requested` - The requested exponent.
/// * `legacy` - Whether legacy-mode minimums apply.
///
/// # Returns
/// The index of the snapped exponent in [`MERSENNE_EXPONENTS`].
pub fn snap_index(requested: u64, legacy: bool) -> Result<usize, SssError> {
    if requested < u64::from(MIN_EXPONENT) {
        return Err(SssError::SecurityLevelOutOfRange(requested));
    }
    let wanted = if !legacy && requested < u64::from(MIN_MODERN_EXPONENT) {
        u64::from(MIN_MODERN_EXPONENT)
    } else {
        requested
    };
    MERSENNE_EXPONENTS
        .iter()
        .position(|&e| u64::from(e) >= wanted)
        .ok_or(SssError::SecurityLevelOutOfRange(requested))
}

/// Snap a requested level to a permitted exponent.
///
/// Pure form of the level setter: see [`snap_index`] for the rules.
///
/// # Arguments
/// * `requested` - The requested exponent.
/// * `legacy` - Whether legacy-mode minimums apply.
///
/// # Returns
/// The snapped exponent.
pub fn snap(requested: u64, legacy: bool) -> Result<u32, SssError> {
    snap_index(requested, legacy).map(|i| MERSENNE_EXPONENTS[i])
}

/// A permitted Mersenne exponent paired with its cached prime 2^e - 1.
///
/// Splitter and combiner instances each own one of these; every split or
/// reconstruction may update it, which is why those types are not safe
/// for concurrent use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityLevel {
    exponent: u32,
    prime: BigInt,
}

impl SecurityLevel {
    /// Create a level at the default exponent.
    ///
    /// The default is 13, or 7 when legacy mode is enabled at the time of
    /// the call.
    ///
    /// # Returns
    /// A `SecurityLevel` at the default exponent with its prime cached.
    pub fn new() -> Self {
        let exponent = if legacy_mode() {
            LEGACY_DEFAULT_EXPONENT
        } else {
            DEFAULT_EXPONENT
        };
        SecurityLevel {
            exponent,
            prime: mersenne_prime(exponent),
        }
    }

    /// Create a level from a requested exponent, snapping per [`snap`].
    ///
    /// # Arguments
    /// * `requested` - The requested exponent.
    ///
    /// # Returns
    /// `Ok(SecurityLevel)` at the snapped exponent, or an error if the
    /// request is out of range.
    pub fn with_exponent(requested: u32) -> Result<Self, SssError> {
        let mut level = SecurityLevel::new();
        level.set_exponent(requested)?;
        Ok(level)
    }

    /// Set the exponent, snapping per [`snap`], and re-cache the prime.
    ///
    /// # Arguments
    /// * `requested` - The requested exponent.
    ///
    /// # Returns
    /// `Ok(())` on success, or an error if the request is out of range.
    pub fn set_exponent(&mut self, requested: u32) -> Result<(), SssError> {
        let snapped = snap(u64::from(requested), legacy_mode())?;
        self.set_exponent_unchecked(snapped);
        Ok(())
    }

    /// Install an exact table exponent without snapping.
    ///
    /// Used by the combiner's level-inference descent, which walks the
    /// exponent table directly and may pass below the non-legacy minimum.
    pub(crate) fn set_exponent_unchecked(&mut self, exponent: u32) {
        debug_assert!(MERSENNE_EXPONENTS.contains(&exponent));
        self.exponent = exponent;
        self.prime = mersenne_prime(exponent);
    }

    /// The current exponent e.
    pub fn exponent(&self) -> u32 {
        self.exponent
    }

    /// The cached prime 2^e - 1.
    pub fn prime(&self) -> &BigInt {
        &self.prime
    }

    /// Byte width of a polynomial coefficient at this level.
    ///
    /// # Returns
    /// The number of random bytes drawn per coefficient, `ceil(e / 8)`.
    pub fn coefficient_bytes(&self) -> usize {
        (self.exponent as usize + 7) / 8
    }
}

impl Default for SecurityLevel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- Snap rules (pure, no global state) --

    #[test]
    fn test_snap_exact_members() {
        for e in MERSENNE_EXPONENTS {
            if e >= MIN_MODERN_EXPONENT {
                assert_eq!(snap(u64::from(e), false).unwrap(), e);
            }
            assert_eq!(snap(u64::from(e), true).unwrap(), e);
        }
    }

    #[test]
    fn test_snap_rounds_up() {
        assert_eq!(snap(14, false).unwrap(), 17);
        assert_eq!(snap(40, false).unwrap(), 61);
        assert_eq!(snap(128, false).unwrap(), 521);
        assert_eq!(snap(1024, false).unwrap(), 1279);
        assert_eq!(snap(4152, false).unwrap(), 4253);
    }

    #[test]
    fn test_snap_modern_minimum() {
        assert_eq!(snap(5, false).unwrap(), 13);
        assert_eq!(snap(8, false).unwrap(), 13);
        assert_eq!(snap(12, false).unwrap(), 13);
    }

    #[test]
    fn test_snap_legacy_minimum() {
        assert_eq!(snap(5, true).unwrap(), 5);
        assert_eq!(snap(6, true).unwrap(), 7);
        assert_eq!(snap(8, true).unwrap(), 13);
    }

    #[test]
    fn test_snap_out_of_range() {
        for requested in [0u64, 1, 4] {
            assert!(matches!(
                snap(requested, false),
                Err(SssError::SecurityLevelOutOfRange(_))
            ));
            assert!(matches!(
                snap(requested, true),
                Err(SssError::SecurityLevelOutOfRange(_))
            ));
        }
        assert!(matches!(
            snap(43112610, false),
            Err(SssError::SecurityLevelOutOfRange(_))
        ));
    }

    // -- SecurityLevel state --

    #[test]
    fn test_with_exponent_caches_prime() {
        let level = SecurityLevel::with_exponent(13).unwrap();
        assert_eq!(level.exponent(), 13);
        assert_eq!(*level.prime(), BigInt::from(8191));
    }

    #[test]
    fn test_set_exponent_snaps() {
        let mut level = SecurityLevel::with_exponent(13).unwrap();
        level.set_exponent(62).unwrap();
        assert_eq!(level.exponent(), 89);
    }

    #[test]
    fn test_coefficient_bytes() {
        assert_eq!(SecurityLevel::with_exponent(13).unwrap().coefficient_bytes(), 2);
        assert_eq!(SecurityLevel::with_exponent(17).unwrap().coefficient_bytes(), 3);
        assert_eq!(SecurityLevel::with_exponent(61).unwrap().coefficient_bytes(), 8);
        assert_eq!(SecurityLevel::with_exponent(521).unwrap().coefficient_bytes(), 66);
    }

    // -- Legacy switch --
    //
    // This is the only test that touches the process-wide flag, so the
    // flag stays off for every other test in this binary.

    #[test]
    fn test_legacy_mode_switch_and_defaults() {
        assert!(!legacy_mode());
        assert_eq!(SecurityLevel::new().exponent(), DEFAULT_EXPONENT);

        set_legacy_mode(true);
        assert!(legacy_mode());
        assert_eq!(SecurityLevel::new().exponent(), LEGACY_DEFAULT_EXPONENT);
        assert_eq!(SecurityLevel::with_exponent(5).unwrap().exponent(), 5);

        set_legacy_mode(false);
        assert!(!legacy_mode());
        assert_eq!(SecurityLevel::new().exponent(), DEFAULT_EXPONENT);
    }
}
