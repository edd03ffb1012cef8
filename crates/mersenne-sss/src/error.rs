/// Unified error type for all secret-sharing operations.
///
/// Covers errors from security-level selection, splitting, share parsing,
/// and reconstruction.
#[derive(Debug, thiserror::Error)]
pub enum SssError {
    /// Requested security level is below 5 or above the largest known
    /// Mersenne prime exponent.
    #[error("security level {0} is out of range")]
    SecurityLevelOutOfRange(u64),

    /// Threshold parameters fail 2 <= k <= n < 2^31.
    #[error("invalid threshold: need 2 <= k <= n < 2^31, got k={k}, n={n}")]
    InvalidThreshold {
        /// Minimum shares required for reconstruction.
        k: u32,
        /// Total shares requested.
        n: u32,
    },

    /// Not enough shares to attempt reconstruction.
    #[error("insufficient shares for recovery: need {needed}, got {got}")]
    InsufficientShares {
        /// Minimum shares required.
        needed: usize,
        /// Shares actually provided.
        got: usize,
    },

    /// Two shares carry the same x-coordinate.
    #[error("duplicate share detected")]
    DuplicateShare,

    /// Share string does not match the `HEX(x)-HEX(y)` wire format.
    #[error("malformed share: {0}")]
    MalformedShare(String),

    /// Negative integer offered as a secret.
    #[error("secret value must be non-negative")]
    NegativeSecret,

    /// Hex decoding error.
    #[error("hex decode error: {0}")]
    HexDecode(#[from] hex::FromHexError),
}
