//! Shamir threshold secret sharing over Mersenne prime fields.
//!
//! This crate provides the building blocks for (k, n)-threshold secret
//! sharing in GF(p) with p = 2^e - 1:
//! - Security levels drawn from the known Mersenne prime exponents
//! - Secret encoding between byte strings and field elements
//! - Polynomial sampling and Horner evaluation
//! - Share points with a hex wire format
//! - Splitting (secret -> shares) and combining (shares -> secret)

pub mod field;
pub mod security;
pub mod secret;
pub mod polynomial;
pub mod share;
pub mod split;
pub mod combine;

mod error;
pub use error::SssError;
