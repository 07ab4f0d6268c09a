//! Error type shared by all fallible operations.
//!
//! Arithmetic failures are deterministic functions of the input: nothing in
//! this crate retries internally, and no operation returns a partial result.
//! An `Err` means the inputs were rejected or the requested map has no
//! solution for them.

use thiserror::Error;

/// Failure conditions surfaced by curve and protocol operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// A 32-byte encoding is not a canonical, on-curve point.
    #[error("invalid point encoding")]
    InvalidPoint,

    /// A scalar encoding is out of canonical range (>= group order).
    #[error("non-canonical scalar encoding")]
    InvalidScalar,

    /// A signature failed verification.
    #[error("signature verification failed")]
    InvalidSignature,

    /// An operation produced the identity element where a valid public
    /// value is required.
    #[error("result is the identity element")]
    IdentityElement,

    /// The point lies outside the image of the uniform-encoding map, so it
    /// has no preimage to return.
    #[error("point has no uniform preimage")]
    NoPreimage,
}
