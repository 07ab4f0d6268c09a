//! Elligator 2 maps between field elements and curve points.
//!
//! The forward map sends any 32-byte string to a point on the Montgomery
//! curve; the inverse map sends roughly half of all points back to a
//! uniformly distributed representative. Composites layered on top give
//! hash-to-point (two maps summed) and point-to-hash (rejection sampling
//! on the inverse).

use rand_core::{CryptoRng, RngCore};

use super::field::FieldElement;
use super::group::GeP3;
use super::montgomery::solve_y;
use super::table::MONT_A;
use crate::error::Error;

/// The Elligator 2 forward map, producing a Montgomery point `(u, v)`.
///
/// With `r` the field element decoded from `bytes` (top bit dropped), the
/// candidate abscissa is `x1 = -A / (1 + 2*r^2)`; when `x1` is not on the
/// curve, `x2 = -x1 - A` always is. The ordinate's parity is matched to
/// the parity of `r`, so the map commutes with negating the input. Every
/// step is constant time.
pub(crate) fn map_to_curve(bytes: &[u8; 32]) -> (FieldElement, FieldElement) {
    let one = FieldElement::ONE;
    let r = FieldElement::from_bytes(bytes);

    let r2 = r.square();
    let mut d = r2 + r2 + one;
    d.conditional_move(&one, d.is_zero() as u32);

    let x1 = -(MONT_A * d.invert());
    let x2 = -x1 - MONT_A;

    let (y1, alpha) = solve_y(&x1);
    let (y2, _) = solve_y(&x2);

    let mut x = x1;
    let mut y = y1;
    x.conditional_move(&x2, !alpha as u32);
    y.conditional_move(&y2, !alpha as u32);

    let flip = (y.is_negative() ^ r.is_negative()) as u32;
    y.conditional_negate(flip);

    (x, y)
}

/// The Elligator 2 inverse map.
///
/// Recovers a representative `r` with `map_to_curve(r) = (u, v)`, or fails
/// with [`Error::NoPreimage`] when the point is outside the image of the
/// map. The low bit of `hint` selects between the two preimage classes
/// (`r` from `x1` or from `x2`); the top bit of the output, which the
/// field decoding ignores, is drawn from `rng` so representatives cover
/// all 32-byte strings.
pub(crate) fn map_from_curve<R: RngCore + CryptoRng>(
    u: &FieldElement,
    v: &FieldElement,
    hint: u32,
    rng: &mut R,
) -> Result<[u8; 32], Error> {
    let mut n = *u + MONT_A;
    let mut d = *u;

    n.swap(&mut d, hint & 1);
    n = -n;
    d = d + d;

    let (mut r, ok) = FieldElement::isqrt(&n, &d);
    if !ok {
        return Err(Error::NoPreimage);
    }

    let flip = (r.is_negative() ^ v.is_negative()) as u32;
    r.conditional_negate(flip);

    let mut out = r.to_bytes();
    out[31] |= (rng.next_u32() as u8 & 1) << 7;

    Ok(out)
}

/// Maps 32 uniform bytes to an Edwards point.
pub(crate) fn point_from_uniform(bytes: &[u8; 32]) -> GeP3 {
    let (u, v) = map_to_curve(bytes);

    GeP3::from_mont(&u, &v)
}

/// Inverts [`point_from_uniform`], choosing the preimage class by `hint`.
pub(crate) fn point_to_uniform<R: RngCore + CryptoRng>(
    p: &GeP3,
    hint: u32,
    rng: &mut R,
) -> Result<[u8; 32], Error> {
    let (u, v) = p.to_mont()?;

    map_from_curve(&u, &v, hint, rng)
}

/// Maps 64 uniform bytes to an Edwards point as the sum of two forward
/// maps, which is statistically close to uniform over the whole group.
///
/// With `pake` set the sum is multiplied by the cofactor, trading
/// uniformity over the full group for a guaranteed torsion-free result.
pub(crate) fn point_from_hash(bytes: &[u8; 64], pake: bool) -> GeP3 {
    let head: &[u8; 32] = bytes[..32].try_into().expect("slice length is 32");
    let tail: &[u8; 32] = bytes[32..].try_into().expect("slice length is 32");

    let p1 = point_from_uniform(head);
    let p2 = point_from_uniform(tail);
    let sum = p1.add(&p2);

    if pake { sum.mul_cofactor() } else { sum }
}

/// Inverts [`point_from_hash`] by rejection sampling.
///
/// Draws a random point `p1` in the image of the forward map, then tries
/// to invert `p - p1`; on failure a fresh `p1` is drawn. Each attempt
/// succeeds with probability about one half, so the loop terminates
/// quickly. Variable time, like any rejection sampler.
pub(crate) fn point_to_hash<R: RngCore + CryptoRng>(p: &GeP3, rng: &mut R) -> [u8; 64] {
    let mut out = [0u8; 64];

    loop {
        let mut r1 = [0u8; 32];
        rng.fill_bytes(&mut r1);

        let p1 = point_from_uniform(&r1);

        // The 2-torsion point (0, -1) and the neutral element have no
        // Montgomery image, so a sum landing there cannot be inverted.
        if p1.x.is_zero() {
            continue;
        }

        let p2 = p.add(&(-p1));
        let hint = rng.next_u32();

        if let Ok(r2) = point_to_uniform(&p2, hint, rng) {
            out[..32].copy_from_slice(&r1);
            out[32..].copy_from_slice(&r2);
            break;
        }
    }

    out
}
