//! Curve constants and base-point tables.
//!
//! Field constants are stored directly in the 10-limb representation used
//! by [`FieldElement`]. The two generator tables cannot be written as
//! literals without an external generation step, so they are derived from
//! the packed generator encoding the first time they are touched.

use std::sync::LazyLock;

use super::field::FieldElement;
use super::group::{GeCached, GeP1, GeP3, GePrecomp};

/// Edwards curve constant `d = -121665 / 121666`.
pub(crate) const D: FieldElement = FieldElement([
    -10913610, 13857413, -15372611, 6949391, 114729, -8787816, -6275908, -3247719, -18696448,
    -12055116,
]);

/// `2 * d`.
pub(crate) const D2: FieldElement = FieldElement([
    -21827239, -5839606, -30745221, 13898782, 229458, 15978800, -12551817, -6495438, 29715968,
    9444199,
]);

/// A square root of `-1` modulo `p`.
pub(crate) const SQRTM1: FieldElement = FieldElement([
    -32595792, -7943725, 9377950, 3500415, 12389472, -272473, -25146209, -2005654, 326686,
    11406482,
]);

/// Montgomery curve coefficient `A = 486662`.
pub(crate) const MONT_A: FieldElement = FieldElement([486662, 0, 0, 0, 0, 0, 0, 0, 0, 0]);

/// `-486664`, the scaling constant of the Edwards to Montgomery change of
/// coordinates, before square-root extraction.
const M486664: FieldElement = FieldElement([-486664, 0, 0, 0, 0, 0, 0, 0, 0, 0]);

/// Group order `L = 2^252 + 27742317777372353535851937790883648493`,
/// little endian.
pub(crate) const ORDER: [u8; 32] = [
    0xed, 0xd3, 0xf5, 0x5c, 0x1a, 0x63, 0x12, 0x58, 0xd6, 0x9c, 0xf7, 0xa2, 0xde, 0xf9, 0xde,
    0x14, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x10,
];

/// Field prime `p = 2^255 - 19`, little endian.
pub(crate) const FIELD_PRIME: [u8; 32] = [
    0xed, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0x7f,
];

/// Packed encoding of the generator `B` (`y = 4/5`, even `x`).
const GENERATOR: [u8; 32] = [
    0x58, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66,
    0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66,
    0x66, 0x66,
];

/// `sqrt(-486664)`, shared by every Edwards/Montgomery conversion so the
/// chosen root stays consistent across the crate.
pub(crate) static SQRT_M486664: LazyLock<FieldElement> = LazyLock::new(|| {
    let (root, ok) = M486664.sqrt();
    debug_assert!(ok);
    root
});

fn generator() -> GeP3 {
    // The generator encoding is a constant, decoding it cannot fail.
    GeP3::unpack_vartime(&GENERATOR).unwrap()
}

fn to_precomp(p: &GeP3) -> GePrecomp {
    let recip = p.z.invert();
    let x = p.x * recip;
    let y = p.y * recip;

    GePrecomp {
        yplusx: y + x,
        yminusx: y - x,
        xy2d: x * y * D2,
    }
}

/// Returns `[start, start + step, start + 2 * step, ...]` in precomputed
/// affine form.
fn multiples(start: &GeP3, step: &GeP3) -> [GePrecomp; 8] {
    let cached = GeCached::from_p3(step);
    let mut acc = *start;
    let mut out = [GePrecomp::ZERO; 8];

    out[0] = to_precomp(&acc);
    for slot in out.iter_mut().skip(1) {
        acc = GeP3::from_gep1(&GeP1::from_sum(&acc, &cached));
        *slot = to_precomp(&acc);
    }

    out
}

/// Fixed-base table: `BASE[i][j] = (j + 1) * 256^i * B`.
///
/// Indexed by the radix-16 signed-digit decomposition used in
/// `GeP3::from_scalar_mul`, where digit `2 * i` and `2 * i + 1` of the
/// scalar both select from window `i`.
pub(crate) static BASE: LazyLock<[[GePrecomp; 8]; 32]> = LazyLock::new(|| {
    let mut window = generator();

    std::array::from_fn(|_| {
        let row = multiples(&window, &window);

        for _ in 0..8 {
            window = GeP3::from_gep1(&window.double());
        }

        row
    })
});

/// Odd multiples of the generator, `BI[i] = (2 * i + 1) * B`, used by the
/// sliding-window double-scalar multiplication.
pub(crate) static BI: LazyLock<[GePrecomp; 8]> = LazyLock::new(|| {
    let b = generator();
    let b2 = GeP3::from_gep1(&b.double());

    multiples(&b, &b2)
});
