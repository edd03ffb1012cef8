//! Secret values and their byte codec.
//!
//! A secret is a field element plus the byte length of its canonical
//! representation. The canonical representation is the minimal
//! little-endian unsigned byte string; recording the length keeps
//! leading and trailing zero bytes from being silently dropped on the
//! way back out.

use num_bigint::{BigInt, Sign};
use num_traits::Signed;

use crate::SssError;

/// A secret: a non-negative field element with a recorded byte length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Secret {
    value: BigInt,
    byte_len: usize,
}

impl Secret {
    /// Encode a byte string as a secret.
    ///
    /// The bytes are interpreted as a little-endian unsigned integer and
    /// the input length is recorded, so zero bytes at either end survive
    /// a round trip through [`Secret::to_bytes`].
    ///
    /// # Arguments
    /// * `bytes` - The secret material.
    ///
    /// # Returns
    /// A `Secret` wrapping the encoded value.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Secret {
            value: BigInt::from_bytes_le(Sign::Plus, bytes),
            byte_len: bytes.len(),
        }
    }

    /// Encode a non-negative integer as a secret.
    ///
    /// The recorded byte length is that of the minimal little-endian
    /// encoding (one zero byte for the value 0).
    ///
    /// # Arguments
    /// * `value` - The secret value; must be non-negative.
    ///
    /// # Returns
    /// `Ok(Secret)`, or [`SssError::NegativeSecret`] for negative input.
    pub fn from_integer(value: BigInt) -> Result<Self, SssError> {
        if value.is_negative() {
            return Err(SssError::NegativeSecret);
        }
        Ok(Self::from_field_element(value))
    }

    /// Wrap a reconstructed field element as a secret.
    ///
    /// The recorded byte length is the canonical minimal length of the
    /// value. The caller guarantees the value is non-negative.
    ///
    /// # Arguments
    /// * `value` - A non-negative field element.
    ///
    /// # Returns
    /// A `Secret` with the canonical byte length recorded.
    pub fn from_field_element(value: BigInt) -> Self {
        let byte_len = value.to_bytes_le().1.len();
        Secret { value, byte_len }
    }

    /// The secret as a field element.
    pub fn value(&self) -> &BigInt {
        &self.value
    }

    /// The recorded byte length of the canonical representation.
    pub fn byte_len(&self) -> usize {
        self.byte_len
    }

    /// Decode the secret back to bytes.
    ///
    /// Emits the canonical little-endian bytes of the value, truncated or
    /// zero-padded to the recorded byte length.
    ///
    /// # Returns
    /// A `Vec<u8>` of exactly `byte_len()` bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let (_, mut bytes) = self.value.to_bytes_le();
        bytes.resize(self.byte_len, 0);
        bytes
    }

    /// Decode the secret as a UTF-8 string.
    ///
    /// # Returns
    /// The decoded string, or the UTF-8 error if the bytes are not valid
    /// UTF-8.
    pub fn to_utf8(&self) -> Result<String, std::string::FromUtf8Error> {
        String::from_utf8(self.to_bytes())
    }
}

impl From<&str> for Secret {
    /// Encode a string secret; the recorded length is the UTF-8 length.
    fn from(s: &str) -> Self {
        Secret::from_bytes(s.as_bytes())
    }
}

impl From<u64> for Secret {
    fn from(v: u64) -> Self {
        Secret::from_field_element(BigInt::from(v))
    }
}
