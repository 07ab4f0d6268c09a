//! Curve25519 arithmetic and the protocols built on it.
//!
//! This crate implements the twisted Edwards curve edwards25519 and its
//! Montgomery counterpart from the ground up: field arithmetic over
//! GF(2²⁵⁵ − 19), scalar arithmetic modulo the group order, the Edwards
//! group with precomputed base tables, the x-only Montgomery ladder, and
//! the Elligator 2 encodings. On top of that core sit the Ed25519
//! signature scheme (RFC 8032, including the Ed25519ctx and Ed25519ph
//! variants, key tweaking, and a cofactored verification mode) and X25519
//! key agreement (RFC 7748).
//!
//! The focus is on **clarity, predictability, and auditability** rather
//! than on breadth. All operations touching secret data are constant
//! time; variable-time shortcuts exist only where every operand is
//! public, and carry `vartime` in their name.
//!
//! # Module overview
//!
//! - `ed25519`
//!   Signing, verification, key generation, public-key algebra
//!   (addition, negation, tweaks, combination), torsion predicates,
//!   Diffie-Hellman over the Edwards form, and the uniform encodings
//!   built on Elligator 2.
//!
//! - `x25519`
//!   RFC 7748 key agreement on bare u-coordinates, conversions to and
//!   from the Edwards form, and the x-only counterparts of the
//!   predicates and uniform encodings.
//!
//! Randomness is always injected: operations that need it take a
//! [`rand_core::RngCore`] + [`rand_core::CryptoRng`] generator as an
//! argument, and nothing in the crate reaches for ambient entropy.
//!
//! # Design goals
//!
//! - No heap allocations in core arithmetic
//! - Minimal and explicit APIs
//! - Stable, well-defined semantics
//! - One auditable home for every timing-sensitive comparison

mod ct;
mod curve;
mod error;

pub mod ed25519;
pub mod x25519;

pub use curve::scalar::Scalar;
pub use error::Error;
