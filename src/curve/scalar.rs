//! Scalar arithmetic modulo the group order.
//!
//! Scalars are integers modulo
//!
//! ```text
//! ℓ = 2²⁵² + 27742317777372353535851937790883648493
//! ```
//!
//! stored as 32 little-endian bytes. The representation enforces no
//! invariant by itself: reduction and canonicity are explicit, performed
//! by `reduce` / `from_mul_sum` (whose outputs are always canonical) and
//! checked by `is_canonical` (mandatory before trusting an externally
//! supplied scalar, notably a signature's S half).
//!
//! Internally the wide arithmetic uses a radix-2²¹ signed-limb
//! representation. The reduction coefficients encode
//! `2²⁵² ≡ 27742317777372353535851937790883648493 (mod ℓ)`.
//!
//! All operations are constant-time with respect to scalar values except
//! `slide`, which is a variable-time recoding reserved for verification
//! where the operands are public.

use std::array;

use zeroize::Zeroize;

use crate::ct::lt_bytes32;
use crate::curve::field::{load_3, load_4};
use crate::curve::table::ORDER;

const MASK21: i64 = 0x1f_ffff;

/// Folding coefficients for one radix-2²¹ limb of `2²⁵² mod ℓ`.
const REDUCE_COEFFS: [i64; 6] = [666_643, 470_296, 654_183, -997_805, 136_657, -683_901];

/// `ℓ - 1 ≡ -1 (mod ℓ)`, the negation multiplier.
const ORDER_MINUS_ONE: Scalar = Scalar([
    0xec, 0xd3, 0xf5, 0x5c, 0x1a, 0x63, 0x12, 0x58, 0xd6, 0x9c, 0xf7, 0xa2, 0xde, 0xf9, 0xde,
    0x14, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x10,
]);

/// `ℓ - 2`, the inversion exponent.
const ORDER_MINUS_TWO: [u8; 32] = [
    0xeb, 0xd3, 0xf5, 0x5c, 0x1a, 0x63, 0x12, 0x58, 0xd6, 0x9c, 0xf7, 0xa2, 0xde, 0xf9, 0xde,
    0x14, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x10,
];

/// Byte offsets, shifts, and load widths of the radix-2²¹ limbs. The
/// pattern repeats every 8 limbs / 21 bytes.
const L21_OFFSETS: [usize; 8] = [0, 2, 5, 7, 10, 13, 15, 18];
const L21_SHIFTS: [u32; 8] = [0, 5, 2, 7, 4, 1, 6, 3];
const L21_WIDE: [bool; 8] = [false, true, false, true, true, false, true, false];

#[inline(always)]
fn load_limb(data: &[u8], index: usize) -> i64 {
    let offset = (index / 8) * 21 + L21_OFFSETS[index % 8];
    let word = if L21_WIDE[index % 8] {
        load_4(&data[offset..])
    } else {
        load_3(&data[offset..])
    };

    ((word >> L21_SHIFTS[index % 8]) as i64) & MASK21
}

/// Decompose a 32-byte scalar into 12 limbs; the top limb keeps its
/// excess bits so no information is lost.
fn load_limbs(data: &[u8; 32]) -> [i64; 12] {
    let mut limbs = array::from_fn(|index| load_limb(data, index));
    limbs[11] = (load_4(&data[28..]) >> 7) as i64;
    limbs
}

/// Decompose a 64-byte wide value into 24 limbs, top limb unmasked.
fn load_limbs_wide(data: &[u8; 64]) -> [i64; 24] {
    let mut limbs = array::from_fn(|index| load_limb(data, index));
    limbs[23] = (load_4(&data[60..]) >> 3) as i64;
    limbs
}

/// One biased carry step: leaves `s[index]` centered in 21 bits.
#[inline(always)]
fn carry_at(s: &mut [i64; 24], index: usize) {
    let carry = (s[index] + (1 << 20)) >> 21;
    s[index + 1] += carry;
    s[index] -= carry << 21;
}

/// Fold the high limbs down and serialize the canonical 32-byte result.
///
/// Shared tail of `reduce` and `from_mul_sum`: both arrive here with a
/// 24-limb value whose entries fit comfortably in `i64`. The folds apply
/// the reduction coefficients limb by limb; the interleaved carry passes
/// keep every limb inside its 21-bit window until the final sweep
/// produces a fully reduced value below `ℓ`.
fn reduce_limbs(s: &mut [i64; 24]) -> [u8; 32] {
    for index in (18..=23).rev() {
        for (j, coeff) in REDUCE_COEFFS.iter().enumerate() {
            s[index - 12 + j] += s[index] * coeff;
        }
    }

    for &index in &[6, 8, 10, 12, 14, 16] {
        carry_at(s, index);
    }
    for &index in &[7, 9, 11, 13, 15] {
        carry_at(s, index);
    }

    for index in (12..=17).rev() {
        for (j, coeff) in REDUCE_COEFFS.iter().enumerate() {
            s[index - 12 + j] += s[index] * coeff;
        }
    }
    s[12] = 0;

    for &index in &[0, 2, 4, 6, 8, 10] {
        carry_at(s, index);
    }
    for &index in &[1, 3, 5, 7, 9, 11] {
        carry_at(s, index);
    }

    let s12 = s[12];
    for (slot, coeff) in s.iter_mut().zip(REDUCE_COEFFS.iter()) {
        *slot += s12 * coeff;
    }
    s[12] = 0;

    for index in 0..11 {
        let carry = s[index] >> 21;
        s[index + 1] += carry;
        s[index] -= carry << 21;
    }

    let carry = s[11] >> 21;
    s[12] += carry;
    s[11] -= carry << 21;

    let s12 = s[12];
    for (slot, coeff) in s.iter_mut().zip(REDUCE_COEFFS.iter()) {
        *slot += s12 * coeff;
    }

    for index in 0..11 {
        let carry = s[index] >> 21;
        s[index + 1] += carry;
        s[index] -= carry << 21;
    }

    // Pack 12 limbs of 21 bits into 32 little-endian bytes.
    let mut output = [0u8; 32];
    let mut acc = 0u64;
    let mut acc_bits = 0u32;
    let mut next = 0usize;

    for &limb in s.iter().take(12) {
        acc |= (limb as u64) << acc_bits;
        acc_bits += 21;

        while acc_bits >= 8 {
            output[next] = acc as u8;
            next += 1;
            acc >>= 8;
            acc_bits -= 8;
        }
    }

    output[31] = acc as u8;

    output
}

/// An integer modulo the group order `ℓ`, encoded as 32 little-endian
/// bytes.
///
/// Used for private scalars, deterministic nonces, hash-derived
/// challenges, and tweaks. Construction performs no implicit reduction;
/// the reducing constructors and `is_canonical` make normalization
/// explicit.
#[derive(Clone, Copy, Zeroize)]
pub struct Scalar(pub(crate) [u8; 32]);

impl Scalar {
    /// The scalar zero.
    pub const ZERO: Self = Scalar([0u8; 32]);

    /// The scalar one.
    pub const ONE: Self = Scalar([
        1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0,
    ]);

    /// Constructs a scalar from a 32-byte little-endian slice without
    /// validation or reduction.
    ///
    /// # Panics
    ///
    /// Panics if `bytes` is not exactly 32 bytes long.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let arr = bytes.try_into().expect("slice must be 32 bytes");
        Scalar(arr)
    }

    /// Returns the 32-byte little-endian encoding.
    pub fn to_bytes(self) -> [u8; 32] {
        self.0
    }

    /// Reduces a 512-bit little-endian integer modulo `ℓ`.
    ///
    /// The output is always canonical. Constant-time.
    pub fn reduce(wide: [u8; 64]) -> Self {
        let mut s = load_limbs_wide(&wide);
        Scalar(reduce_limbs(&mut s))
    }

    /// Reduces a 256-bit little-endian integer modulo `ℓ`.
    pub fn reduce_bytes(bytes: &[u8; 32]) -> Self {
        let mut wide = [0u8; 64];
        wide[..32].copy_from_slice(bytes);
        Self::reduce(wide)
    }

    /// Computes `a·b + c (mod ℓ)`.
    ///
    /// The workhorse of signing (`S = r + h·a`) and of every derived
    /// scalar operation below. A schoolbook convolution over the 12-limb
    /// decompositions accumulates `a·b` with `c` folded into the low
    /// limbs, then the shared reduction tail produces a canonical result.
    /// Constant-time.
    pub fn from_mul_sum(a: Scalar, b: Scalar, c: Scalar) -> Self {
        let a_limbs = load_limbs(&a.0);
        let b_limbs = load_limbs(&b.0);
        let c_limbs = load_limbs(&c.0);

        let mut s = [0i64; 24];

        for (slot, &limb) in s.iter_mut().zip(c_limbs.iter()) {
            *slot = limb;
        }

        for i in 0..12 {
            for j in 0..12 {
                s[i + j] += a_limbs[i] * b_limbs[j];
            }
        }

        for &index in &[0, 2, 4, 6, 8, 10, 12, 14, 16, 18, 20, 22] {
            carry_at(&mut s, index);
        }
        for &index in &[1, 3, 5, 7, 9, 11, 13, 15, 17, 19, 21] {
            carry_at(&mut s, index);
        }

        Scalar(reduce_limbs(&mut s))
    }

    /// Computes `self + rhs (mod ℓ)`.
    pub fn add(&self, rhs: &Self) -> Self {
        Self::from_mul_sum(*self, Self::ONE, *rhs)
    }

    /// Computes `self · rhs (mod ℓ)`.
    pub fn mul(&self, rhs: &Self) -> Self {
        Self::from_mul_sum(*self, *rhs, Self::ZERO)
    }

    /// Computes `-self (mod ℓ)` by multiplying with `ℓ - 1`.
    pub fn negate(&self) -> Self {
        Self::from_mul_sum(*self, ORDER_MINUS_ONE, Self::ZERO)
    }

    /// Computes `8·self (mod ℓ)`, the cofactor multiple used by
    /// cofactored verification.
    pub fn mulh(&self) -> Self {
        let two = self.add(self);
        let four = two.add(&two);
        four.add(&four)
    }

    /// Computes `self^(ℓ-2) = self⁻¹ (mod ℓ)`.
    ///
    /// Square-and-multiply over the bits of the public exponent `ℓ - 2`;
    /// the branches depend only on that fixed exponent, never on the
    /// operand. Zero has no inverse and maps to zero.
    pub fn invert(&self) -> Self {
        let mut result = Self::ONE;

        for index in (0..256).rev() {
            result = result.mul(&result);

            if (ORDER_MINUS_TWO[index >> 3] >> (index & 7)) & 1 == 1 {
                result = result.mul(self);
            }
        }

        result
    }

    /// Returns `true` if the scalar is zero, in constant time.
    pub fn is_zero(&self) -> bool {
        self.0.iter().fold(0u8, |acc, &b| acc | b) == 0
    }

    /// Returns `true` if the encoding is canonical, i.e. strictly below
    /// `ℓ`, in constant time.
    ///
    /// Externally supplied scalars (a signature's S half, a tweak meant
    /// as a group element multiplier) must pass this check before use.
    pub fn is_canonical(&self) -> bool {
        lt_bytes32(&self.0, &ORDER) == 1
    }

    /// Computes the signed sliding-window representation of the scalar.
    ///
    /// Produces 256 signed digits, sparse, with non-zero digits odd and
    /// in `[-15, 15]`, at most one per window of up to 6 bits. Consumed
    /// by variable-time double-scalar multiplication during verification;
    /// the recoding itself branches on scalar bits and must only see
    /// public values.
    pub(crate) fn slide(&self) -> Slide {
        let mut r = array::from_fn(|index| ((self.0[index >> 3] >> (index & 7)) & 1) as i8);

        for index in 0..256 {
            if r[index] == 0 {
                continue;
            }

            let mut b = 1;

            while b <= 6 && index + b < 256 {
                if r[index + b] != 0 {
                    let rb = (r[index + b] as i32) << b;
                    let ri = r[index] as i32;

                    if ri + rb <= 15 {
                        r[index] = (ri + rb) as i8;
                        r[index + b] = 0;
                    } else if ri - rb >= -15 {
                        r[index] = (ri - rb) as i8;

                        // Borrow: propagate +1 into the next clear digit.
                        for v in r.iter_mut().skip(index + b) {
                            if *v == 0 {
                                *v = 1;
                                break;
                            }

                            *v = 0;
                        }
                    } else {
                        break;
                    }
                }

                b += 1;
            }
        }

        r
    }
}

/// Signed sliding-window digits of a scalar, one entry per bit position.
pub(crate) type Slide = [i8; 256];
