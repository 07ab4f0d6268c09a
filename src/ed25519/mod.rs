//! The Ed25519 signature scheme and its key-level extensions.

mod core;
mod pubkey;

pub use self::core::{
    PrivateKey, PublicKey, Signature, generate_keypair, pubkey_from_scalar, sign, sign_tweak_add,
    sign_tweak_mul, sign_with_scalar, verify, verify_single,
};
pub use pubkey::{
    derive, derive_with_scalar, pubkey_add, pubkey_combine, pubkey_from_hash, pubkey_from_uniform,
    pubkey_negate, pubkey_to_hash, pubkey_to_uniform, pubkey_tweak_add, pubkey_tweak_mul,
};
