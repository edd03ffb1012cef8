//! Share points and share sets with their hex wire format.
//!
//! A share is a point (x, y) on the split polynomial, written on the wire
//! as `HEX(x)-HEX(y)` with upper-case big-endian hex. A share set is one
//! share per line, optionally carrying the original secret right after a
//! split.

use std::cmp::Ordering;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use num_bigint::{BigInt, Sign};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::secret::Secret;
use crate::SssError;

/// A single share: a point (x, y) on the split polynomial.
///
/// x is the share index in 1..n; y is the polynomial value in [0, p).
/// Parsed shares may carry arbitrary magnitudes, so both coordinates are
/// big integers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharePoint {
    x: BigInt,
    y: BigInt,
}

/// Hash is the XOR of the two coordinates' independent hashes.
impl Hash for SharePoint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut hx = DefaultHasher::new();
        self.x.hash(&mut hx);
        let mut hy = DefaultHasher::new();
        self.y.hash(&mut hy);
        state.write_u64(hx.finish() ^ hy.finish());
    }
}

impl SharePoint {
    /// Create a share point from its coordinates.
    ///
    /// # Arguments
    /// * `x` - The share index.
    /// * `y` - The polynomial value at `x`.
    ///
    /// # Returns
    /// A new `SharePoint`.
    pub fn new(x: BigInt, y: BigInt) -> Self {
        SharePoint { x, y }
    }

    /// The x-coordinate (share index).
    pub fn x(&self) -> &BigInt {
        &self.x
    }

    /// The y-coordinate (polynomial value).
    pub fn y(&self) -> &BigInt {
        &self.y
    }

    /// Parse a share from its `HEX(x)-HEX(y)` wire form.
    ///
    /// The string must split on `-` into exactly two non-empty halves;
    /// each half is case-insensitive big-endian hex. Anything else is
    /// rejected; no character is ever silently mapped to zero.
    ///
    /// # Arguments
    /// * `s` - The wire string.
    ///
    /// # Returns
    /// `Ok(SharePoint)` on success, or an error describing the defect.
    pub fn from_wire(s: &str) -> Result<Self, SssError> {
        let halves: Vec<&str> = s.split('-').collect();
        if halves.len() != 2 {
            return Err(SssError::MalformedShare(format!(
                "expected two '-'-separated halves, got {}",
                halves.len()
            )));
        }
        if halves[0].is_empty() || halves[1].is_empty() {
            return Err(SssError::MalformedShare("empty coordinate".to_string()));
        }
        let x = hex::decode(halves[0])?;
        let y = hex::decode(halves[1])?;
        Ok(SharePoint {
            x: BigInt::from_bytes_be(Sign::Plus, &x),
            y: BigInt::from_bytes_be(Sign::Plus, &y),
        })
    }

    /// Format the share in its `HEX(x)-HEX(y)` wire form.
    ///
    /// # Returns
    /// The upper-case big-endian hex encoding, two characters per byte.
    pub fn to_wire(&self) -> String {
        format!(
            "{}-{}",
            hex::encode_upper(self.x.to_bytes_be().1),
            hex::encode_upper(self.y.to_bytes_be().1)
        )
    }

    /// Squared Euclidean magnitude x^2 + y^2, the ordering key.
    fn squared_magnitude(&self) -> BigInt {
        &self.x * &self.x + &self.y * &self.y
    }
}

/// Order by Euclidean magnitude (compared squared, which preserves the
/// order), then lexicographically by (x, y) so that equal ordering means
/// equal points.
impl Ord for SharePoint {
    fn cmp(&self, other: &Self) -> Ordering {
        self.squared_magnitude()
            .cmp(&other.squared_magnitude())
            .then_with(|| self.x.cmp(&other.x))
            .then_with(|| self.y.cmp(&other.y))
    }
}

impl PartialOrd for SharePoint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Display in wire form.
impl fmt::Display for SharePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_wire())
    }
}

/// Parse from wire form. Equivalent to [`SharePoint::from_wire`].
impl FromStr for SharePoint {
    type Err = SssError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SharePoint::from_wire(s)
    }
}

/// Serialize as the wire string.
impl Serialize for SharePoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_wire())
    }
}

/// Deserialize from the wire string.
impl<'de> Deserialize<'de> for SharePoint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        SharePoint::from_wire(&s).map_err(serde::de::Error::custom)
    }
}

/// An ordered collection of share points.
///
/// Carries the original secret only when produced by a split; parsed
/// share sets never have one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareSet {
    secret: Option<Secret>,
    points: Vec<SharePoint>,
}

impl ShareSet {
    /// Bind freshly split points to their original secret.
    pub(crate) fn with_secret(secret: Secret, points: Vec<SharePoint>) -> Self {
        ShareSet {
            secret: Some(secret),
            points,
        }
    }

    /// Build a share set from bare points, with no original secret.
    ///
    /// # Arguments
    /// * `points` - The share points.
    ///
    /// # Returns
    /// A `ShareSet` carrying only the points.
    pub fn from_points(points: Vec<SharePoint>) -> Self {
        ShareSet {
            secret: None,
            points,
        }
    }

    /// Parse a share set from individual share strings.
    ///
    /// Blank lines and surrounding whitespace are ignored.
    ///
    /// # Arguments
    /// * `lines` - The share strings, one share per item.
    ///
    /// # Returns
    /// `Ok(ShareSet)` with no original secret, or the first parse error.
    pub fn from_lines<'a, I>(lines: I) -> Result<Self, SssError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut points = Vec::new();
        for line in lines {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            points.push(SharePoint::from_wire(line)?);
        }
        Ok(ShareSet::from_points(points))
    }

    /// The original secret, present only right after a split.
    pub fn secret(&self) -> Option<&Secret> {
        self.secret.as_ref()
    }

    /// The share points, in order.
    pub fn points(&self) -> &[SharePoint] {
        &self.points
    }

    /// Number of shares in the set.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the set holds no shares.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterate over the share points.
    pub fn iter(&self) -> std::slice::Iter<'_, SharePoint> {
        self.points.iter()
    }

}

/// Display as newline-separated wire strings.
impl fmt::Display for ShareSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for point in &self.points {
            if !first {
                writeln!(f)?;
            }
            write!(f, "{}", point)?;
            first = false;
        }
        Ok(())
    }
}

/// Parse newline-separated wire strings; accepts any newline convention
/// and tolerates blank lines.
impl FromStr for ShareSet {
    type Err = SssError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ShareSet::from_lines(s.lines())
    }
}
