//! x-only arithmetic on the Montgomery form of the curve.
//!
//! The Montgomery model `v^2 = u^3 + A*u^2 + u` with `A = 486662` carries
//! the X25519 ladder and the Elligator maps. Only the `u` coordinate is
//! tracked here; `v` shows up when a full point is needed for the Edwards
//! conversions, and is recovered with [`solve_y`].

use super::field::FieldElement;
use super::table::{MONT_A, ORDER};

/// Right-hand side of the curve equation, `u^3 + A*u^2 + u`.
pub(crate) fn solve_y2(u: &FieldElement) -> FieldElement {
    let u2 = u.square();
    let u3 = u2 * *u;

    u3 + *u + u2 * MONT_A
}

/// Solves the curve equation for `v`.
///
/// The `bool` is `false` when `u` is not the abscissa of any point, in
/// which case the returned element is unspecified.
pub(crate) fn solve_y(u: &FieldElement) -> (FieldElement, bool) {
    solve_y2(u).sqrt()
}

/// Returns `true` if `u` is the abscissa of a curve point.
pub(crate) fn valid_x(u: &FieldElement) -> bool {
    let (_, ok) = solve_y2(u).sqrt();
    ok
}

/// x-only point doubling in projective coordinates `(X : Z)`.
fn double(x: &FieldElement, z: &FieldElement) -> (FieldElement, FieldElement) {
    let a = *x + *z;
    let aa = a.square();
    let b = *x - *z;
    let bb = b.square();
    let c = aa - bb;

    (aa * bb, c * (bb + c.mul121666()))
}

/// The RFC 7748 Montgomery ladder.
///
/// Computes the projective abscissa `(X : Z)` of `k * P` for the point
/// with affine abscissa `u`. The scalar bytes are used as given; callers
/// clamp them when they are secret key material. Constant time: the two
/// ladder legs are exchanged by masked swaps driven by the scalar bits,
/// one swap per bit, with a final swap resolving the last decision.
pub(crate) fn ladder(u: &FieldElement, k: &[u8; 32]) -> (FieldElement, FieldElement) {
    let x1 = *u;
    let mut x2 = FieldElement::ONE;
    let mut z2 = FieldElement::ZERO;
    let mut x3 = x1;
    let mut z3 = FieldElement::ONE;

    let mut swap = 0u32;

    for i in (0..255).rev() {
        let bit = ((k[i >> 3] >> (i & 7)) & 1) as u32;

        swap ^= bit;
        x2.swap(&mut x3, swap);
        z2.swap(&mut z3, swap);
        swap = bit;

        let t1 = x3 - z3;
        let t2 = x2 - z2;
        x2 = x2 + z2;
        z2 = x3 + z3;
        z3 = t1 * x2;
        z2 = z2 * t2;

        let t1 = t2.square();
        let t2 = x2.square();

        x3 = z3 + z2;
        z2 = z3 - z2;
        x2 = t2 * t1;

        let t2 = t2 - t1;
        z2 = z2.square();
        z3 = t2.mul121666();
        x3 = x3.square();

        let t1 = t1 + z3;
        z3 = x1 * z2;
        z2 = t2 * t1;
    }

    x2.swap(&mut x3, swap);
    z2.swap(&mut z3, swap);

    (x2, z2)
}

/// Small-order test on a bare abscissa.
///
/// A point is of small order when three doublings take it to infinity.
/// Invalid abscissas report `false`.
pub(crate) fn is_small(u: &FieldElement) -> bool {
    if !valid_x(u) {
        return false;
    }

    let mut x = *u;
    let mut z = FieldElement::ONE;

    for _ in 0..3 {
        (x, z) = double(&x, &z);
    }

    z.is_zero()
}

/// Torsion test on a bare abscissa.
///
/// Multiplies by the group order: a torsion-free point lands on infinity.
/// The 2-torsion abscissa `0` is reported as torsion directly, since the
/// ladder cannot distinguish it from the point at infinity. Invalid
/// abscissas report `false`.
pub(crate) fn has_torsion(u: &FieldElement) -> bool {
    if !valid_x(u) {
        return false;
    }

    let zero = u.is_zero();
    let (_, z) = ladder(u, &ORDER);

    !z.is_zero() || zero
}
