//! X25519 key agreement and the x-only public-key toolbox.
//!
//! Public keys are bare 32-byte u-coordinates as in RFC 7748; there is no
//! wrapper type because the wire format carries no structure to enforce.
//! Key generation runs over the Edwards form with the precomputed
//! fixed-base table and converts the result, which is faster than
//! laddering from the base point. Shared-secret derivation uses the
//! Montgomery ladder directly.

use rand_core::{CryptoRng, RngCore};

use crate::ct::ConstantTimeEq;
use crate::curve::elligator;
use crate::curve::field::FieldElement;
use crate::curve::group::GeP3;
use crate::curve::montgomery;
use crate::curve::scalar::Scalar;
use crate::ed25519::PublicKey;
use crate::error::Error;

/// RFC 7748 clamping: clear the low three bits, clear the top bit, set
/// bit 254.
fn clamp(secret: &[u8; 32]) -> [u8; 32] {
    let mut k = *secret;

    k[0] &= 248;
    k[31] &= 127;
    k[31] |= 64;

    k
}

/// Computes the public key for a 32-byte secret.
///
/// The clamped secret multiplies the Edwards base point, and the result
/// moves to the Montgomery form through `u = (z + y) / (z - y)`. The
/// division is undefined exactly when the product is the neutral element,
/// which a clamped scalar cannot reach; the check stays because the error
/// is cheap and the input is caller-supplied.
pub fn pubkey_create(secret: &[u8; 32]) -> Result<[u8; 32], Error> {
    let k = Scalar(clamp(secret));
    let a = GeP3::from_scalar_mul(k);

    let u = a.z + a.y;
    let z = a.z - a.y;

    if z.is_zero() {
        return Err(Error::IdentityElement);
    }

    Ok((u * z.invert()).to_bytes())
}

/// The RFC 7748 X25519 function: clamps the secret, runs the ladder on
/// the peer's u-coordinate, and normalizes the projective result.
///
/// An all-zero output means the peer's point was in the small-order
/// subgroup and the shared secret carries no entropy; it is rejected
/// after a constant-time comparison.
pub fn derive(secret: &[u8; 32], peer: &[u8; 32]) -> Result<[u8; 32], Error> {
    let k = clamp(secret);
    let u = FieldElement::from_bytes(peer);

    let (x, z) = montgomery::ladder(&u, &k);
    let out = (x * z.invert()).to_bytes();

    if out.ct_eq(&[0u8; 32]) {
        return Err(Error::IdentityElement);
    }

    Ok(out)
}

/// Converts an X25519 public key to its Edwards form.
///
/// Applies `y = (u - 1) / (u + 1)` and installs the requested sign bit.
/// The u-coordinate must lie on the curve. For `u = 0` the sign is
/// forced to zero, since the corresponding point `(0, -1)` has a unique
/// encoding.
pub fn pubkey_convert(public: &[u8; 32], sign: bool) -> Result<PublicKey, Error> {
    let u = FieldElement::from_bytes(public);

    if !montgomery::valid_x(&u) {
        return Err(Error::InvalidPoint);
    }

    let one = FieldElement::ONE;
    let y = (u - one) * (u + one).invert();

    let mut out = y.to_bytes();
    let sign = (sign as u8) & !u.is_zero() as u8;
    out[31] |= sign << 7;

    Ok(PublicKey::from_bytes(out))
}

/// Returns `true` if the bytes decode to the abscissa of a curve point.
pub fn pubkey_verify(public: &[u8; 32]) -> bool {
    montgomery::valid_x(&FieldElement::from_bytes(public))
}

/// Returns `true` if the key is a point of order 1, 2, 4, or 8.
pub fn pubkey_is_small(public: &[u8; 32]) -> bool {
    montgomery::is_small(&FieldElement::from_bytes(public))
}

/// Returns `true` if the key has a torsion component.
pub fn pubkey_has_torsion(public: &[u8; 32]) -> bool {
    montgomery::has_torsion(&FieldElement::from_bytes(public))
}

/// Maps 32 uniform bytes to an X25519 public key through the Elligator 2
/// forward map.
pub fn pubkey_from_uniform(bytes: &[u8; 32]) -> [u8; 32] {
    let (u, _) = elligator::map_to_curve(bytes);

    u.to_bytes()
}

/// Inverts [`pubkey_from_uniform`].
///
/// The ordinate recovered by the square root fixes which of the two
/// points above `u` is inverted; the low bit of `hint` picks the
/// preimage class. Fails for keys outside the image of the map.
pub fn pubkey_to_uniform<R: RngCore + CryptoRng>(
    public: &[u8; 32],
    hint: u32,
    rng: &mut R,
) -> Result<[u8; 32], Error> {
    let u = FieldElement::from_bytes(public);
    let (v, ok) = montgomery::solve_y(&u);

    if !ok {
        return Err(Error::InvalidPoint);
    }

    elligator::map_from_curve(&u, &v, hint, rng)
}

/// Maps 64 uniform bytes to an X25519 public key.
///
/// The sum of the two Elligator 2 evaluations can land on the neutral
/// element, which has no u-coordinate; that case is rejected.
pub fn pubkey_from_hash(bytes: &[u8; 64], pake: bool) -> Result<[u8; 32], Error> {
    let p = elligator::point_from_hash(bytes, pake);

    if p.is_neutral() {
        return Err(Error::IdentityElement);
    }

    let u = p.z + p.y;
    let z = p.z - p.y;

    Ok((u * z.invert()).to_bytes())
}

/// Inverts [`pubkey_from_hash`] by rejection sampling with `rng`.
pub fn pubkey_to_hash<R: RngCore + CryptoRng>(
    public: &[u8; 32],
    rng: &mut R,
) -> Result<[u8; 64], Error> {
    let u = FieldElement::from_bytes(public);
    let (v, ok) = montgomery::solve_y(&u);

    if !ok {
        return Err(Error::InvalidPoint);
    }

    let p = GeP3::from_mont(&u, &v);

    Ok(elligator::point_to_hash(&p, rng))
}
