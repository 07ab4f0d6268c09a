//! Public-key predicates, algebra, conversions, and uniform encodings.
//!
//! Everything here operates on compressed encodings. Each operation
//! decompresses its inputs with the checked constant-time unpack, so a
//! non-canonical or off-curve encoding is rejected before any arithmetic
//! runs, and packs the result back to 32 bytes.

use rand_core::{CryptoRng, RngCore};

use super::core::{PrivateKey, PublicKey};
use crate::ct::ConstantTimeEq;
use crate::curve::elligator;
use crate::curve::group::GeP3;
use crate::curve::scalar::Scalar;
use crate::error::Error;

/// Compressed encoding of the neutral element, `y = 1` with even x.
const NEUTRAL: [u8; 32] = [
    1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0,
];

impl PublicKey {
    /// Returns `true` if the encoding is a canonical, on-curve point.
    pub fn is_valid(&self) -> bool {
        GeP3::unpack(&self.0).is_ok()
    }

    /// Returns `true` if the key encodes the neutral element.
    pub fn is_infinity(&self) -> bool {
        self.0.ct_eq(&NEUTRAL)
    }

    /// Returns `true` if the key is a point of order 1, 2, 4, or 8.
    ///
    /// Such keys live entirely in the torsion subgroup and make every
    /// signature equation degenerate. Invalid encodings report `false`.
    pub fn is_small(&self) -> bool {
        match GeP3::unpack(&self.0) {
            Ok(p) => p.is_small(),
            Err(_) => false,
        }
    }

    /// Returns `true` if the key has a torsion component, i.e. lies
    /// outside the prime-order subgroup. Invalid encodings report
    /// `false`.
    pub fn has_torsion(&self) -> bool {
        match GeP3::unpack(&self.0) {
            Ok(p) => p.has_torsion(),
            Err(_) => false,
        }
    }

    /// Converts the key to its X25519 counterpart.
    ///
    /// Applies the birational map `u = (1 + y) / (1 - y)` and returns the
    /// Montgomery u-coordinate. The neutral element has no image and is
    /// rejected.
    pub fn to_x25519(&self) -> Result<[u8; 32], Error> {
        let p = GeP3::unpack(&self.0)?;
        let (u, _) = p.to_mont()?;

        Ok(u.to_bytes())
    }
}

/// Adds two public keys as curve points.
pub fn pubkey_add(a: &PublicKey, b: &PublicKey) -> Result<PublicKey, Error> {
    let p = GeP3::unpack(&a.to_bytes())?;
    let q = GeP3::unpack(&b.to_bytes())?;

    Ok(PublicKey::from_bytes(p.add(&q).to_bytes()))
}

/// Sums a list of public keys. The empty sum is the neutral element.
pub fn pubkey_combine(keys: &[PublicKey]) -> Result<PublicKey, Error> {
    let mut acc = GeP3::ONE;

    for key in keys {
        let p = GeP3::unpack(&key.to_bytes())?;
        acc = acc.add(&p);
    }

    Ok(PublicKey::from_bytes(acc.to_bytes()))
}

/// Negates a public key.
pub fn pubkey_negate(key: &PublicKey) -> Result<PublicKey, Error> {
    let p = GeP3::unpack(&key.to_bytes())?;

    Ok(PublicKey::from_bytes((-p).to_bytes()))
}

/// Computes the additively tweaked key `A + t·B`.
///
/// The tweak is reduced modulo the group order before the fixed-base
/// multiplication.
pub fn pubkey_tweak_add(key: &PublicKey, tweak: &Scalar) -> Result<PublicKey, Error> {
    let p = GeP3::unpack(&key.to_bytes())?;

    let t = Scalar::reduce_bytes(&tweak.to_bytes());
    let tb = GeP3::from_scalar_mul(t);

    Ok(PublicKey::from_bytes(p.add(&tb).to_bytes()))
}

/// Computes the multiplicatively tweaked key `t·A`.
///
/// The tweak bytes are used as a full 256-bit scalar, matching the
/// constant-time ladder's treatment of secret multipliers.
pub fn pubkey_tweak_mul(key: &PublicKey, tweak: &Scalar) -> Result<PublicKey, Error> {
    let p = GeP3::unpack(&key.to_bytes())?;

    Ok(PublicKey::from_bytes(p.scalar_mul(tweak).to_bytes()))
}

/// Diffie-Hellman over the Edwards form with an externally supplied
/// scalar.
///
/// The scalar bytes are clamped like a freshly expanded secret, then
/// drive a constant-time multiplication of the peer's point. A result of
/// the neutral element is rejected; it would mean the peer's key was
/// torsion-only.
pub fn derive_with_scalar(public: &PublicKey, scalar: &Scalar) -> Result<PublicKey, Error> {
    let mut k = scalar.to_bytes();
    k[0] &= 248;
    k[31] &= 127;
    k[31] |= 64;

    let p = GeP3::unpack(&public.to_bytes())?;
    let out = p.scalar_mul(&Scalar(k)).to_bytes();

    if out.ct_eq(&NEUTRAL) {
        return Err(Error::IdentityElement);
    }

    Ok(PublicKey::from_bytes(out))
}

/// Diffie-Hellman over the Edwards form with a private key.
pub fn derive(public: &PublicKey, private: &PrivateKey) -> Result<PublicKey, Error> {
    derive_with_scalar(public, &private.scalar())
}

/// Maps 32 uniform bytes to a public key through the Elligator 2
/// forward map. Total: every input produces a valid point.
pub fn pubkey_from_uniform(bytes: &[u8; 32]) -> PublicKey {
    PublicKey::from_bytes(elligator::point_from_uniform(bytes).to_bytes())
}

/// Inverts [`pubkey_from_uniform`].
///
/// The low bit of `hint` picks the preimage class; `rng` supplies the
/// representative's top bit. Fails for keys outside the image of the
/// map.
pub fn pubkey_to_uniform<R: RngCore + CryptoRng>(
    key: &PublicKey,
    hint: u32,
    rng: &mut R,
) -> Result<[u8; 32], Error> {
    let p = GeP3::unpack(&key.to_bytes())?;

    elligator::point_to_uniform(&p, hint, rng)
}

/// Maps 64 uniform bytes to a public key, summing two Elligator 2
/// evaluations so the output distribution covers the whole group.
///
/// With `pake` set the result is multiplied by the cofactor, as PAKE
/// protocols require contributions free of torsion.
pub fn pubkey_from_hash(bytes: &[u8; 64], pake: bool) -> PublicKey {
    PublicKey::from_bytes(elligator::point_from_hash(bytes, pake).to_bytes())
}

/// Inverts [`pubkey_from_hash`] by rejection sampling with `rng`.
pub fn pubkey_to_hash<R: RngCore + CryptoRng>(
    key: &PublicKey,
    rng: &mut R,
) -> Result<[u8; 64], Error> {
    let p = GeP3::unpack(&key.to_bytes())?;

    Ok(elligator::point_to_hash(&p, rng))
}
