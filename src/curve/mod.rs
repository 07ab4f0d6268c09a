//! Arithmetic layers of the curve.
//!
//! Bottom up: field elements modulo `2^255 - 19`, scalars modulo the
//! group order, the Edwards group with its precomputed tables, the
//! Montgomery x-only ladder, and the Elligator 2 encodings. Everything
//! here is an internal building block; the protocol modules expose the
//! byte-oriented surface.

pub(crate) mod elligator;
pub(crate) mod field;
pub(crate) mod group;
pub(crate) mod montgomery;
pub(crate) mod scalar;
pub(crate) mod table;
