//! X25519 key agreement over the Montgomery form of the curve.

mod core;

pub use self::core::{
    derive, pubkey_convert, pubkey_create, pubkey_from_hash, pubkey_from_uniform,
    pubkey_has_torsion, pubkey_is_small, pubkey_to_hash, pubkey_to_uniform, pubkey_verify,
};
