//! Edwards25519 group arithmetic.
//!
//! Points live on the twisted Edwards curve `-x^2 + y^2 = 1 + d*x^2*y^2`
//! over GF(2^255 - 19). Several coordinate systems are used, each tuned
//! for a specific role in scalar multiplication:
//!
//! - [`GeP3`]: extended coordinates `(X : Y : Z : T)` with `T = X*Y/Z`.
//!   The primary working representation.
//! - [`GeP1`]: the transient output of additions and doublings, converted
//!   to `GeP2` or `GeP3` before further use.
//! - [`GeP2`]: projective coordinates `(X : Y : Z)`, sufficient for
//!   doubling and packing.
//! - [`GeCached`]: precomputed `(Y+X, Y-X, Z, 2dT)` form for repeated
//!   additions against the same point.
//! - [`GePrecomp`]: affine `(y+x, y-x, 2dxy)` entries of the static
//!   generator tables.
//!
//! Operations that touch secret scalars (`from_scalar_mul`, `scalar_mul`,
//! the table selection) are branch-free and perform no secret-dependent
//! memory access. Decompression and the `_vartime` multiplications operate
//! on public data and may branch.

use crate::ct::{ConstantTimeEq, lt_bytes32};
use crate::error::Error;

use super::field::FieldElement;
use super::scalar::Scalar;
use super::table::{BASE, BI, D, D2, FIELD_PRIME, ORDER, SQRTM1, SQRT_M486664};

/// Group element in the intermediate `P1xP1` representation.
///
/// Produced by additions and doublings, consumed immediately by the
/// conversions into [`GeP2`] or [`GeP3`]. Never stored.
pub(crate) struct GeP1 {
    pub(crate) x: FieldElement,
    pub(crate) y: FieldElement,
    pub(crate) z: FieldElement,
    pub(crate) t: FieldElement,
}

impl GeP1 {
    /// Adds a cached point to an extended point.
    ///
    /// Standard complete addition in mixed coordinates. Branch-free, safe
    /// for secret operands.
    pub(crate) fn from_sum(a: &GeP3, b: &GeCached) -> Self {
        let mut x = a.y + a.x;
        let mut y = a.y - a.x;
        let mut z = x * b.yplusx;
        let mut t = b.t2d * a.t;

        y = y * b.yminusx;
        x = a.z * b.z;

        let sumx = x + x;

        x = z - y;
        y = z + y;
        z = sumx + t;
        t = sumx - t;

        Self { x, y, z, t }
    }

    /// Adds a precomputed table entry to an extended point.
    ///
    /// Same formulas as [`GeP1::from_sum`], except the table entry is
    /// affine so the `Z` product collapses to a doubling.
    pub(crate) fn from_mixed_sum(a: &GeP3, b: &GePrecomp) -> Self {
        let mut x = a.y + a.x;
        let mut y = a.y - a.x;
        let mut z = x * b.yplusx;
        let mut t = b.xy2d * a.t;
        let sumz = a.z + a.z;

        y = y * b.yminusx;
        x = z - y;
        y = z + y;
        z = sumz + t;
        t = sumz - t;

        Self { x, y, z, t }
    }

    /// Subtracts a cached point from an extended point.
    ///
    /// Reuses the addition formulas with the `(Y+X, Y-X)` terms swapped,
    /// which avoids materializing the negated point.
    pub(crate) fn from_difference(a: &GeP3, b: &GeCached) -> Self {
        let mut x = a.y + a.x;
        let mut y = a.y - a.x;
        let mut z = x * b.yminusx;
        let mut t = b.t2d * a.t;

        y = y * b.yplusx;
        x = a.z * b.z;

        let sumx = x + x;

        x = z - y;
        y = z + y;
        z = sumx - t;
        t = sumx + t;

        Self { x, y, z, t }
    }

    /// Subtracts a precomputed table entry from an extended point.
    pub(crate) fn from_mixed_difference(a: &GeP3, b: &GePrecomp) -> Self {
        let mut x = a.y + a.x;
        let mut y = a.y - a.x;
        let mut z = x * b.yminusx;
        let mut t = b.xy2d * a.t;
        let sumz = a.z + a.z;

        y = y * b.yplusx;
        x = z - y;
        y = z + y;
        z = sumz - t;
        t = sumz + t;

        Self { x, y, z, t }
    }
}

/// Group element in projective coordinates `(X : Y : Z)`.
pub(crate) struct GeP2 {
    pub(crate) x: FieldElement,
    pub(crate) y: FieldElement,
    pub(crate) z: FieldElement,
}

impl GeP2 {
    /// The neutral element `(0, 1)`.
    pub(crate) const ONE: Self = Self {
        x: FieldElement::ZERO,
        y: FieldElement::ONE,
        z: FieldElement::ONE,
    };

    pub(crate) fn from_gep1(g: &GeP1) -> Self {
        let x = g.x * g.t;
        let y = g.y * g.z;
        let z = g.z * g.t;

        GeP2 { x, y, z }
    }

    pub(crate) fn from_gep3(g: &GeP3) -> Self {
        let x = g.x;
        let y = g.y;
        let z = g.z;

        GeP2 { x, y, z }
    }

    /// Doubles the point. The `Z` square is doubled before carrying, which
    /// requires the coordinates to be in carried form; every constructor
    /// in this module guarantees that.
    pub(crate) fn double(self) -> GeP1 {
        let mut x = self.x.square();
        let mut z = self.y.square();
        let mut t = self.z.double_square();
        let mut y = self.x + self.y;
        let ysquare = y.square();

        y = z + x;
        z = z - x;
        x = ysquare - y;
        t = t - z;

        GeP1 { x, y, z, t }
    }

    /// Returns `true` if this is the neutral element.
    pub(crate) fn is_neutral(&self) -> bool {
        self.x.to_bytes().ct_eq(&[0u8; 32]) && self.y.to_bytes().ct_eq(&self.z.to_bytes())
    }

    /// Packs the point into the 32-byte compressed encoding: the affine
    /// `y` coordinate in little endian, with the parity of `x` stored in
    /// the top bit of the last byte.
    pub(crate) fn to_bytes(&self) -> [u8; 32] {
        let recip = self.z.invert();
        let x = self.x * recip;
        let y = self.y * recip;

        let mut output = y.to_bytes();
        output[31] ^= (x.is_negative() as u8) << 7;

        output
    }
}

/// Group element in extended coordinates `(X : Y : Z : T)`.
///
/// Satisfies `x = X/Z`, `y = Y/Z` and `T = X*Y/Z`. The extra coordinate
/// makes the complete addition formulas inversion-free.
#[derive(Clone, Copy)]
pub(crate) struct GeP3 {
    pub(crate) x: FieldElement,
    pub(crate) y: FieldElement,
    pub(crate) z: FieldElement,
    pub(crate) t: FieldElement,
}

impl GeP3 {
    /// The neutral element `(0, 1)`.
    pub(crate) const ONE: Self = Self {
        x: FieldElement::ZERO,
        y: FieldElement::ONE,
        z: FieldElement::ONE,
        t: FieldElement::ZERO,
    };

    pub(crate) fn from_gep1(g: &GeP1) -> Self {
        let x = g.x * g.t;
        let y = g.y * g.z;
        let z = g.z * g.t;
        let t = g.x * g.y;

        Self { x, y, z, t }
    }

    #[inline(always)]
    pub(crate) fn double(&self) -> GeP1 {
        GeP2::from_gep3(self).double()
    }

    /// Full addition of two extended points.
    pub(crate) fn add(&self, rhs: &GeP3) -> Self {
        Self::from_gep1(&GeP1::from_sum(self, &GeCached::from_p3(rhs)))
    }

    /// Multiplies by the cofactor, three doublings.
    pub(crate) fn mul_cofactor(&self) -> Self {
        let mut r = Self::from_gep1(&self.double());
        r = Self::from_gep1(&r.double());
        Self::from_gep1(&r.double())
    }

    /// Packs the point into its 32-byte compressed encoding.
    pub(crate) fn to_bytes(&self) -> [u8; 32] {
        let recip = self.z.invert();
        let x = self.x * recip;
        let y = self.y * recip;

        let mut output = y.to_bytes();
        output[31] ^= (x.is_negative() as u8) << 7;

        output
    }

    /// Swaps `self` and `rhs` if `condition` is `1`, leaves both unchanged
    /// if it is `0`. Constant time.
    fn swap(&mut self, rhs: &mut Self, condition: u32) {
        self.x.swap(&mut rhs.x, condition);
        self.y.swap(&mut rhs.y, condition);
        self.z.swap(&mut rhs.z, condition);
        self.t.swap(&mut rhs.t, condition);
    }

    /// Returns `true` if this is the neutral element `(0, 1)`.
    ///
    /// Works on any projective representative: `x == 0` and `y == z`.
    pub(crate) fn is_neutral(&self) -> bool {
        self.x.to_bytes().ct_eq(&[0u8; 32]) && self.y.to_bytes().ct_eq(&self.z.to_bytes())
    }

    /// Returns `true` for points of small order (2, 4 or 8), excluding
    /// the neutral element itself.
    pub(crate) fn is_small(&self) -> bool {
        self.mul_cofactor().is_neutral() && !self.is_neutral()
    }

    /// Returns `true` if the point has a torsion component, that is, if
    /// it lies outside the prime-order subgroup.
    ///
    /// A point is torsion-free exactly when multiplying it by the group
    /// order yields the neutral element. Public data only.
    pub(crate) fn has_torsion(&self) -> bool {
        !self.scalar_mul_vartime(&Scalar(ORDER)).is_neutral()
    }

    /// Decompresses a 32-byte encoding into a point, rejecting anything
    /// that is not canonical and on the curve.
    ///
    /// The encoding stores the `y` coordinate with the sign of `x` in the
    /// top bit. `x` is recovered as `sqrt((y^2 - 1) / (d*y^2 + 1))`.
    /// The encoding is rejected when:
    ///
    /// - `y >= p` (non-canonical),
    /// - the fraction has no square root (off-curve),
    /// - `x == 0` with the sign bit set (the malleable negative zero).
    ///
    /// Apart from the early exits on invalid input, the computation is
    /// branch-free.
    pub(crate) fn unpack(s: &[u8; 32]) -> Result<Self, Error> {
        let sign = (s[31] >> 7) as u32;

        let mut masked = *s;
        masked[31] &= 0x7f;
        if lt_bytes32(&masked, &FIELD_PRIME) == 0 {
            return Err(Error::InvalidPoint);
        }

        let y = FieldElement::from_bytes(s);
        let z = FieldElement::ONE;
        let yy = y.square();
        let u = yy - z;
        let v = yy * D + z;

        let (mut x, ok) = FieldElement::isqrt(&u, &v);
        if !ok {
            return Err(Error::InvalidPoint);
        }

        if sign == 1 && x.is_zero() {
            return Err(Error::InvalidPoint);
        }

        let parity = x.is_negative() as u32;
        x.conditional_negate(parity ^ sign);

        Ok(Self { x, y, z, t: x * y })
    }

    /// Variable-time decompression for public encodings.
    ///
    /// Same contract as [`GeP3::unpack`], but the square root is computed
    /// with explicit branches on the candidate checks: the `(p-5)/8` power
    /// gives a candidate root, and multiplying by `sqrt(-1)` covers the
    /// other class.
    pub(crate) fn unpack_vartime(s: &[u8; 32]) -> Result<Self, Error> {
        let mut masked = *s;
        masked[31] &= 0x7f;
        if lt_bytes32(&masked, &FIELD_PRIME) == 0 {
            return Err(Error::InvalidPoint);
        }

        let mut h = Self {
            x: FieldElement::ZERO,
            y: FieldElement::from_bytes(s),
            z: FieldElement::ONE,
            t: FieldElement::ZERO,
        };

        let mut u = h.y.square();
        let mut v = u * D;
        u = u - h.z;
        v = v + h.z;

        let v3 = v.square() * v;

        // Candidate x = (u * v^7)^((p-5)/8) * u * v^3
        h.x = v3.square();
        h.x = h.x * v;
        h.x = h.x * u;
        h.x = h.x.pow22523();
        h.x = h.x * v3;
        h.x = h.x * u;

        let vxx = h.x.square() * v;
        let mut check = vxx - u;

        if !check.is_zero() {
            check = vxx + u;

            if !check.is_zero() {
                return Err(Error::InvalidPoint);
            }

            h.x = h.x * SQRTM1;
        }

        let sign = s[31] >> 7;

        if sign == 1 && h.x.is_zero() {
            return Err(Error::InvalidPoint);
        }

        if h.x.is_negative() != (sign == 1) {
            h.x = -h.x;
        }

        h.t = h.x * h.y;

        Ok(h)
    }

    /// Fixed-base scalar multiplication, `a * B`.
    ///
    /// The scalar is rewritten as 64 signed radix-16 digits in `[-8, 8)`,
    /// and the multiplication interleaves table additions with blocks of
    /// four doublings: odd digits first, then a shift by 16, then the even
    /// digits. Table entries are fetched with the constant-time
    /// [`GePrecomp::select`], so the execution trace does not depend on
    /// the scalar.
    pub(crate) fn from_scalar_mul(a: Scalar) -> Self {
        let mut e = [0i8; 64];
        for (i, &byte) in a.0.iter().enumerate() {
            e[2 * i] = (byte & 0x0f) as i8;
            e[2 * i + 1] = (byte >> 4) as i8;
        }

        let mut carry = 0i8;
        for v in e.iter_mut().take(63) {
            *v += carry;
            carry = (*v + 8) >> 4;
            *v -= carry << 4;
        }

        e[63] += carry;

        let mut h = Self::ONE;
        for i in (1..64).step_by(2) {
            let t = GePrecomp::select(i / 2, e[i]);
            h = GeP3::from_gep1(&GeP1::from_mixed_sum(&h, &t));
        }

        for _ in 0..4 {
            h = GeP3::from_gep1(&GeP2::from_gep3(&h).double());
        }

        for i in (0..64).step_by(2) {
            let t = GePrecomp::select(i / 2, e[i]);
            h = GeP3::from_gep1(&GeP1::from_mixed_sum(&h, &t));
        }

        h
    }

    /// Constant-time variable-base scalar multiplication, `s * self`.
    ///
    /// A conditional-swap ladder over the 256 scalar bits: every iteration
    /// performs exactly one addition and one doubling, and operand
    /// placement is fixed by conditional swaps rather than branches.
    pub(crate) fn scalar_mul(&self, s: &Scalar) -> Self {
        let e = s.to_bytes();
        let mut a = *self;
        let mut b = Self::ONE;
        let mut swap = 0u32;

        for i in (0..256).rev() {
            let bit = ((e[i >> 3] >> (i & 7)) & 1) as u32;

            a.swap(&mut b, swap ^ bit);
            a = a.add(&b);
            b = Self::from_gep1(&b.double());

            swap = bit;
        }

        a.swap(&mut b, swap);

        b
    }

    /// Builds the odd multiples `self, 3*self, ..., 15*self` in cached
    /// form, the per-point table of the sliding-window multiplications.
    fn odd_multiples(&self) -> [GeCached; 8] {
        let mut ai = [GeCached::ZERO; 8];

        ai[0] = GeCached::from_p3(self);

        let a2 = GeP3::from_gep1(&self.double());

        for j in 1..8 {
            let t = GeP1::from_sum(&a2, &ai[j - 1]);
            ai[j] = GeCached::from_p3(&GeP3::from_gep1(&t));
        }

        ai
    }

    /// Variable-time scalar multiplication for public operands.
    ///
    /// Sliding-window double-and-add over the signed-digit recoding of
    /// `a`. The scalar bytes are taken as given, without reduction, so
    /// callers may pass values at or above the group order.
    pub(crate) fn scalar_mul_vartime(&self, a: &Scalar) -> GeP2 {
        let aslide = a.slide();
        let ai = self.odd_multiples();

        let mut r = GeP2::ONE;
        let mut started = false;

        for &asi in aslide.iter().rev() {
            if !started {
                if asi == 0 {
                    continue;
                }
                started = true;
            }

            let mut t = r.double();

            if asi > 0 {
                t = GeP1::from_sum(&GeP3::from_gep1(&t), &ai[(asi / 2) as usize]);
            } else if asi < 0 {
                t = GeP1::from_difference(&GeP3::from_gep1(&t), &ai[(-asi / 2) as usize]);
            }

            r = GeP2::from_gep1(&t);
        }

        r
    }

    /// Computes `a * self + b * B` in variable time.
    ///
    /// Both scalars are recoded into sliding windows; `self` contributes
    /// through its odd-multiple table and the base point through the
    /// static `BI` table. Verification-only: the scalars are public there.
    pub(crate) fn double_scalar_mul_vartime(&self, a: Scalar, b: Scalar) -> GeP2 {
        let aslide = a.slide();
        let bslide = b.slide();
        let ai = self.odd_multiples();

        let mut r = GeP2::ONE;
        let mut started = false;

        for (&asi, &bsi) in aslide.iter().zip(bslide.iter()).rev() {
            if !started {
                if asi == 0 && bsi == 0 {
                    continue;
                }
                started = true;
            }

            let mut t = r.double();

            if asi > 0 {
                t = GeP1::from_sum(&GeP3::from_gep1(&t), &ai[(asi / 2) as usize]);
            } else if asi < 0 {
                t = GeP1::from_difference(&GeP3::from_gep1(&t), &ai[(-asi / 2) as usize]);
            }

            if bsi > 0 {
                t = GeP1::from_mixed_sum(&GeP3::from_gep1(&t), &BI[(bsi / 2) as usize]);
            } else if bsi < 0 {
                t = GeP1::from_mixed_difference(&GeP3::from_gep1(&t), &BI[(-bsi / 2) as usize]);
            }

            r = GeP2::from_gep1(&t);
        }

        r
    }

    /// Maps the point to affine Montgomery coordinates `(u, v)`.
    ///
    /// Uses the birational equivalence `u = (1 + y) / (1 - y)`,
    /// `v = sqrt(-486664) * u / x`. The neutral element has no affine
    /// image and is rejected; the 2-torsion point `(0, -1)` lands on
    /// `(0, 0)`. A single inversion covers both coordinates.
    pub(crate) fn to_mont(&self) -> Result<(FieldElement, FieldElement), Error> {
        if self.is_neutral() {
            return Err(Error::IdentityElement);
        }

        let uu = self.z + self.y;
        let uz = self.z - self.y;

        let vv = *SQRT_M486664 * self.z * uu;
        let vz = self.x * uz;

        let un = uu * vz;
        let vn = vv * uz;
        let zz = (uz * vz).invert();

        Ok((un * zz, vn * zz))
    }

    /// Maps affine Montgomery coordinates `(u, v)` back to an Edwards
    /// point, the inverse of [`GeP3::to_mont`].
    ///
    /// `x = sqrt(-486664) * u / v`, `y = (u - 1) / (u + 1)`. The special
    /// case `(0, 0)` is sent to the 2-torsion point `(0, -1)`.
    pub(crate) fn from_mont(u: &FieldElement, v: &FieldElement) -> Self {
        let one = FieldElement::ONE;

        let xx = *SQRT_M486664 * *u;
        let mut xz = *v;
        let yy = *u - one;
        let yz = *u + one;

        xz.conditional_move(&one, u.is_zero() as u32);

        Self {
            x: xx * yz,
            y: yy * xz,
            z: xz * yz,
            t: xx * yy,
        }
    }
}

impl std::ops::Neg for GeP3 {
    type Output = GeP3;

    fn neg(self) -> GeP3 {
        GeP3 {
            x: -self.x,
            y: self.y,
            z: self.z,
            t: -self.t,
        }
    }
}

/// Cached form of an extended point, `(Y+X, Y-X, Z, 2dT)`.
///
/// The second operand of repeated additions against the same point.
#[derive(Clone, Copy)]
pub(crate) struct GeCached {
    pub(crate) yplusx: FieldElement,
    pub(crate) yminusx: FieldElement,
    pub(crate) z: FieldElement,
    pub(crate) t2d: FieldElement,
}

impl GeCached {
    /// All-zero placeholder for table initialization. Not a curve point.
    pub(crate) const ZERO: Self = Self {
        yplusx: FieldElement::ZERO,
        yminusx: FieldElement::ZERO,
        z: FieldElement::ZERO,
        t2d: FieldElement::ZERO,
    };

    pub(crate) fn from_p3(g: &GeP3) -> GeCached {
        let yplusx = g.y + g.x;
        let yminusx = g.y - g.x;
        let z = g.z;
        let t2d = g.t * D2;

        GeCached {
            yplusx,
            yminusx,
            z,
            t2d,
        }
    }
}

/// Precomputed affine table entry, `(y+x, y-x, 2dxy)`.
///
/// Entries come from the static `BASE` and `BI` tables and are never
/// built during a multiplication.
#[derive(Clone, Copy)]
pub(crate) struct GePrecomp {
    pub(crate) yplusx: FieldElement,
    pub(crate) yminusx: FieldElement,
    pub(crate) xy2d: FieldElement,
}

impl GePrecomp {
    /// All-zero placeholder. Not a curve point.
    pub(crate) const ZERO: Self = Self {
        yplusx: FieldElement::ZERO,
        yminusx: FieldElement::ZERO,
        xy2d: FieldElement::ZERO,
    };

    /// The neutral element `(0, 1)` in precomputed form.
    pub(crate) const ONE: Self = Self {
        yplusx: FieldElement::ONE,
        yminusx: FieldElement::ONE,
        xy2d: FieldElement::ZERO,
    };

    /// Replaces `self` with `rhs` if `b == 1`, in constant time.
    pub(crate) fn conditional_move(&mut self, rhs: &Self, b: u8) {
        self.yplusx.conditional_move(&rhs.yplusx, b as u32);
        self.yminusx.conditional_move(&rhs.yminusx, b as u32);
        self.xy2d.conditional_move(&rhs.xy2d, b as u32);
    }

    /// Selects `b * BASE[pos]` for a signed digit `b` in `[-8, 8)`.
    ///
    /// The lookup scans the whole table row with conditional moves, and
    /// negative digits take the negated entry through a final conditional
    /// move, so neither the index nor the sign of `b` leaks.
    pub(crate) fn select(pos: usize, b: i8) -> Self {
        let mut minust = GePrecomp::ZERO;
        let mut t = GePrecomp::ONE;

        let bnegative = b.ct_neg();
        let babs = (b as i16 - (((-(bnegative as i16)) & (b as i16)) << 1)) as i8;

        for (i, base_elem) in BASE[pos].iter().enumerate() {
            t.conditional_move(base_elem, babs.ct_eq(&((i + 1) as i8)) as u8);
        }

        minust.yplusx = t.yminusx;
        minust.yminusx = t.yplusx;
        minust.xy2d = -t.xy2d;

        t.conditional_move(&minust, bnegative);

        t
    }
}
