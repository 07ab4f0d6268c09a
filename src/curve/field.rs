//! Arithmetic in the prime field GF(2²⁵⁵ − 19).
//!
//! Field elements use the 10-limb signed representation with alternating
//! limb widths:
//!
//! ```text
//! [26, 25, 26, 25, 26, 25, 26, 25, 26, 25] bits
//! ```
//!
//! This radix-2²⁵·⁵ layout keeps every intermediate product inside `i64`
//! and makes carry propagation a short fixed sweep.
//!
//! Additions, subtractions, and negations are lazy: they may return
//! loosely reduced limbs, which the next multiplication or encoding pass
//! normalizes. `to_bytes` always produces the unique canonical
//! representative in `[0, p)`.
//!
//! Everything here is constant-time with respect to limb values except
//! where a function is explicitly documented otherwise. Secret-dependent
//! selection goes through `swap` / `conditional_move`.

use std::array;
use std::ops::{Add, Mul, Neg, Sub};

use crate::ct::ConstantTimeEq;
use crate::curve::table::SQRTM1;

/// Bit width of each limb, least significant first.
const LIMB_BITS: [u32; 10] = [26, 25, 26, 25, 26, 25, 26, 25, 26, 25];

/// Load 3 bytes from a little-endian byte slice into a `u64`.
#[inline(always)]
pub(crate) fn load_3(input: &[u8]) -> u64 {
    (input[0] as u64) | ((input[1] as u64) << 8) | ((input[2] as u64) << 16)
}

/// Load 4 bytes from a little-endian byte slice into a `u64`.
#[inline(always)]
pub(crate) fn load_4(input: &[u8]) -> u64 {
    (input[0] as u64)
        | ((input[1] as u64) << 8)
        | ((input[2] as u64) << 16)
        | ((input[3] as u64) << 24)
}

/// One full carry sweep over unreduced 64-bit limbs.
///
/// Carries run from limb 0 upward; the carry out of limb 9 folds back into
/// limb 0 scaled by 19 (the reduction rule `2²⁵⁵ ≡ 19 (mod p)`), and one
/// trailing carry restores limb 0's bound. Biased shifts keep the limbs
/// centered around zero.
#[inline(always)]
fn carry_reduce(h: &mut [i64; 10]) {
    for index in 0..10 {
        let width = LIMB_BITS[index];
        let carry = (h[index] + (1i64 << (width - 1))) >> width;
        h[index] -= carry << width;

        if index == 9 {
            h[0] += carry * 19;
        } else {
            h[index + 1] += carry;
        }
    }

    let carry = (h[0] + (1i64 << 25)) >> 26;
    h[0] -= carry << 26;
    h[1] += carry;
}

/// Schoolbook limb multiplication without the final carry sweep.
///
/// The product `f[i]·g[j]` lands in limb `(i + j) mod 10`, scaled by 19
/// when it wraps past the top and doubled when both source limbs are
/// odd-indexed (the half-bit of the 25.5-bit radix).
#[inline(always)]
fn mul_acc(f: &[i32; 10], g: &[i32; 10]) -> [i64; 10] {
    let mut h = [0i64; 10];

    for i in 0..10 {
        for j in 0..10 {
            let mut term = (f[i] as i64) * (g[j] as i64);

            if (i & j & 1) == 1 {
                term *= 2;
            }

            if i + j >= 10 {
                term *= 19;
            }

            h[(i + j) % 10] += term;
        }
    }

    h
}

/// Field element modulo `2²⁵⁵ − 19` in the 10-limb signed representation.
#[derive(Clone, Copy)]
pub struct FieldElement(pub(crate) [i32; 10]);

impl FieldElement {
    /// The additive identity (0).
    pub const ZERO: Self = FieldElement([0i32; 10]);

    /// The multiplicative identity (1).
    pub const ONE: Self = FieldElement([1, 0, 0, 0, 0, 0, 0, 0, 0, 0]);

    /// Constant-time conditional swap.
    ///
    /// If `condition == 1`, swaps `self` and `rhs`; if `condition == 0`,
    /// leaves both untouched. Branch-free.
    pub fn swap(&mut self, rhs: &mut Self, condition: u32) {
        let mask = -(condition as i32);

        for (s, r) in self.0.iter_mut().zip(rhs.0.iter_mut()) {
            let tmp = (*s ^ *r) & mask;
            *s ^= tmp;
            *r ^= tmp;
        }
    }

    /// Constant-time conditional move.
    ///
    /// If `condition == 1`, replaces `self` with `rhs`; if `condition == 0`,
    /// leaves `self` unchanged. Branch-free.
    pub fn conditional_move(&mut self, rhs: &Self, condition: u32) {
        let mask = -(condition as i32);

        for (s, r) in self.0.iter_mut().zip(rhs.0.iter()) {
            let tmp = (*s ^ r) & mask;
            *s ^= tmp;
        }
    }

    /// Constant-time conditional negation keyed by a single-bit selector.
    pub fn conditional_negate(&mut self, condition: u32) {
        let negated = -*self;
        self.conditional_move(&negated, condition);
    }

    /// Decode a field element from its 32-byte little-endian encoding.
    ///
    /// The top bit of byte 31 is ignored, matching the reference decoding:
    /// the input is interpreted modulo `2²⁵⁵ − 19`, and non-canonical
    /// encodings are accepted here (callers that must reject them check
    /// canonicity on the byte level first).
    pub fn from_bytes(input: &[u8; 32]) -> FieldElement {
        let mut limbs = [0i64; 10];

        let mut acc = 0u64;
        let mut acc_bits = 0u32;
        let mut next = 0usize;

        for (index, limb) in limbs.iter_mut().enumerate() {
            let width = LIMB_BITS[index];

            while acc_bits < width {
                acc |= (input[next] as u64) << acc_bits;
                acc_bits += 8;
                next += 1;
            }

            *limb = (acc & ((1u64 << width) - 1)) as i64;
            acc >>= width;
            acc_bits -= width;
        }

        carry_reduce(&mut limbs);

        FieldElement(limbs.map(|x| x as i32))
    }

    /// Encode this field element into its canonical 32-byte form.
    ///
    /// Performs the final freeze: the quotient against `p` is computed by a
    /// carry scan, folded back via `19·q`, and the fully reduced limbs are
    /// packed little-endian into 255 bits. The output is the unique
    /// representative in `[0, p)`.
    pub fn to_bytes(self) -> [u8; 32] {
        let mut h = self.0.map(|x| x as i64);

        // Quotient scan: q = 1 exactly when the represented value >= p.
        let mut q = (19 * h[9] + (1i64 << 24)) >> 25;
        for (index, &limb) in h.iter().enumerate() {
            q = (limb + q) >> LIMB_BITS[index];
        }

        h[0] += 19 * q;

        for index in 0..9 {
            let width = LIMB_BITS[index];
            let carry = h[index] >> width;
            h[index] -= carry << width;
            h[index + 1] += carry;
        }

        // The carry out of the top limb is the multiple of 2^255 being
        // discarded; the 19·q fold above already accounted for it.
        let width = LIMB_BITS[9];
        h[9] -= (h[9] >> width) << width;

        let mut output = [0u8; 32];
        let mut acc = 0u64;
        let mut acc_bits = 0u32;
        let mut next = 0usize;

        for (index, &limb) in h.iter().enumerate() {
            acc |= (limb as u64) << acc_bits;
            acc_bits += LIMB_BITS[index];

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

    /// Returns `true` if this element is zero, in constant time.
    #[inline(always)]
    pub fn is_zero(&self) -> bool {
        self.to_bytes().iter().fold(0u8, |acc, &b| acc | b) == 0
    }

    /// Returns `true` if this element is negative, in constant time.
    ///
    /// The sign convention is the least significant bit of the canonical
    /// encoding, which is also the parity of the represented integer.
    #[inline(always)]
    pub fn is_negative(&self) -> bool {
        self.to_bytes()[0] & 1 == 1
    }

    /// Multiplies by the Montgomery ladder constant `121666 = (486662 + 2) / 4`.
    #[inline(always)]
    pub(crate) fn mul121666(&self) -> Self {
        let mut h = self.0.map(|x| x as i64 * 121_666);
        carry_reduce(&mut h);
        FieldElement(h.map(|x| x as i32))
    }

    /// Computes `self²`.
    pub fn square(self) -> FieldElement {
        let mut h = mul_acc(&self.0, &self.0);
        carry_reduce(&mut h);
        FieldElement(h.map(|x| x as i32))
    }

    /// Computes `self` squared `n` consecutive times, i.e. `self^(2ⁿ)`.
    ///
    /// The iteration count depends only on `n`, never on the value.
    pub fn n_square(self, n: usize) -> FieldElement {
        (0..n).fold(self, |acc, _| acc.square())
    }

    /// Computes `2·self²` in one pass.
    ///
    /// The doubling happens on the unreduced limbs before the carry sweep,
    /// so the input must be a carried (tightly bounded) element, which all
    /// multiplication outputs are.
    pub fn double_square(self) -> FieldElement {
        let mut h = mul_acc(&self.0, &self.0);
        h.iter_mut().for_each(|v| *v <<= 1);
        carry_reduce(&mut h);
        FieldElement(h.map(|x| x as i32))
    }

    /// Raises this element to `2²⁵² − 3 = (p − 5) / 8`.
    ///
    /// Fixed addition chain shared by the square-root routines and point
    /// decompression. Constant-time: the exponent is public.
    pub(crate) fn pow22523(&self) -> Self {
        let mut t0 = self.square();
        let mut t1 = t0.n_square(2);

        t1 = *self * t1;
        t0 = t0 * t1;

        t0 = t0.square();
        t0 = t1 * t0;

        t1 = t0.n_square(5);
        t0 = t1 * t0;

        t1 = t0.n_square(10);
        t1 = t1 * t0;

        let mut t2 = t1.n_square(20);
        t1 = t2 * t1;

        t1 = t1.n_square(10);
        t0 = t1 * t0;

        t1 = t0.n_square(50);
        t1 = t1 * t0;

        t2 = t1.n_square(100);
        t1 = t2 * t1;

        t1 = t1.n_square(50);
        t0 = t1 * t0;

        t0 = t0.n_square(2);

        t0 * *self
    }

    /// Computes the multiplicative inverse `self^(p − 2)`.
    ///
    /// Fixed addition chain, no branching on the operand. Zero has no
    /// inverse; by field convention the result for zero is zero, and the
    /// operation still terminates normally.
    pub fn invert(&self) -> Self {
        let mut t0 = self.square();
        let mut t1 = t0.n_square(2);

        t1 = *self * t1;
        t0 = t0 * t1;

        let mut t2 = t0.square();
        t1 = t1 * t2;

        t2 = t1.n_square(5);
        t1 = t2 * t1;

        t2 = t1.n_square(10);
        t2 = t2 * t1;

        let mut t3 = t2.n_square(20);
        t2 = t3 * t2;

        t2 = t2.n_square(10);
        t1 = t2 * t1;

        t2 = t1.n_square(50);
        t2 = t2 * t1;

        t3 = t2.n_square(100);
        t2 = t3 * t2;

        t2 = t2.n_square(50);
        t1 = t2 * t1;

        t1 = t1.n_square(5);

        t1 * t0
    }

    /// Computes a square root of this element, if one exists.
    ///
    /// The candidate `self^((p+3)/8)` squares to either `self` or `-self`;
    /// in the latter case it is corrected by the fixed non-residue
    /// `sqrt(-1)`. Returns the root and a success flag; the flag is `false`
    /// exactly when `self` is a non-residue, and callers must check it.
    /// Selection of the corrected candidate is branch-free.
    pub fn sqrt(&self) -> (Self, bool) {
        let mut root = self.pow22523() * *self;
        let check = root.square();

        let direct = (check - *self).is_zero();
        let flipped = (check + *self).is_zero();

        let corrected = root * SQRTM1;
        root.conditional_move(&corrected, !direct as u32);

        (root, direct | flipped)
    }

    /// Jointly computes a square root of the fraction `u / v`.
    ///
    /// Uses the combined chain `u·v³·(u·v⁷)^((p−5)/8)` so only one
    /// exponentiation is needed, then tries both the direct candidate and
    /// the one corrected by `sqrt(-1)`. Returns success only if `u / v` is
    /// actually a residue. Branch-free candidate selection.
    pub fn isqrt(u: &Self, v: &Self) -> (Self, bool) {
        let v3 = v.square() * *v;
        let v7 = v3.square() * *v;

        let mut root = (*u * v3) * (*u * v7).pow22523();
        let check = *v * root.square();

        let direct = (check - *u).is_zero();
        let flipped = (check + *u).is_zero();

        let corrected = root * SQRTM1;
        root.conditional_move(&corrected, !direct as u32);

        (root, direct | flipped)
    }
}

impl ConstantTimeEq for FieldElement {
    /// Equality on canonical encodings, so loosely reduced representations
    /// of the same value compare equal.
    fn ct_eq(&self, other: &Self) -> bool {
        self.to_bytes().ct_eq(&other.to_bytes())
    }
}

/// Limb-wise addition. Lazy: the result may be loosely reduced.
impl Add for FieldElement {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        FieldElement(array::from_fn(|index| self.0[index] + rhs.0[index]))
    }
}

/// Limb-wise subtraction. Lazy: the result may be loosely reduced.
impl Sub for FieldElement {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        FieldElement(array::from_fn(|index| self.0[index] - rhs.0[index]))
    }
}

/// Field multiplication with eager reduction.
impl Mul for FieldElement {
    type Output = FieldElement;

    fn mul(self, rhs: Self) -> Self::Output {
        let mut h = mul_acc(&self.0, &rhs.0);
        carry_reduce(&mut h);
        FieldElement(h.map(|x| x as i32))
    }
}

/// Limb-wise negation. Lazy: the result may be loosely reduced.
impl Neg for FieldElement {
    type Output = Self;

    fn neg(self) -> Self::Output {
        FieldElement(self.0.map(|x| -x))
    }
}
