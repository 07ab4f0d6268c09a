//! Ed25519 key, signature, and verification entry points.
//!
//! The scheme follows RFC 8032: SHA-512 everywhere, deterministic nonces,
//! compressed Edwards points. The `ph`/`ctx` parameters carried by the
//! signing and verification functions select the domain-separated variants
//! (Ed25519ctx and Ed25519ph); passing `None` with an empty context yields
//! classic Ed25519 with no domain header.
//!
//! Two verification modes are provided. [`verify`] is the strict equation
//! `S·B = R + h·A` over canonical encodings, which rejects every malleable
//! signature. [`verify_single`] multiplies both sides by the cofactor
//! first, accepting signatures from protocols that tolerate components
//! outside the prime-order subgroup.

use rand_core::{CryptoRng, RngCore};
use sha2::{Digest, Sha512};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::ct::{ConstantTimeEq, lt_bytes32};
use crate::curve::group::GeP3;
use crate::curve::scalar::Scalar;
use crate::curve::table::FIELD_PRIME;
use crate::error::Error;

/// Leading bytes of the domain-separation header from RFC 8032.
const DOMAIN_PREFIX: &[u8; 32] = b"SigEd25519 no Ed25519 collisions";

/// An Ed25519 public key: the canonical 32-byte compressed encoding of a
/// curve point, the affine y-coordinate with a sign bit for x.
///
/// Construction performs no validation. Operations that consume the key
/// decompress it and fail on a non-canonical or off-curve encoding;
/// [`PublicKey::is_valid`] runs that check on its own.
#[derive(Clone, Copy)]
pub struct PublicKey(pub(crate) [u8; 32]);

impl PublicKey {
    /// Wraps a 32-byte compressed point encoding.
    #[inline]
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the canonical byte encoding of this public key.
    #[inline]
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0
    }
}

/// An Ed25519 private key in expanded form.
///
/// Holds the clamped secret scalar and the 32-byte nonce prefix, the two
/// halves of `SHA-512(seed)`. Both are wiped from memory when the value is
/// dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey {
    scalar: Scalar,
    prefix: [u8; 32],
}

impl PrivateKey {
    /// Expands a 32-byte seed into a private key.
    ///
    /// The seed is hashed with SHA-512; the first half is clamped into the
    /// secret scalar (low three bits cleared, top bit cleared, bit 254
    /// set) and the second half becomes the nonce prefix.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let digest: [u8; 64] = Sha512::digest(seed).into();

        let mut scalar: [u8; 32] = digest[..32].try_into().expect("slice length is 32");
        scalar[0] &= 248;
        scalar[31] &= 127;
        scalar[31] |= 64;

        let prefix: [u8; 32] = digest[32..].try_into().expect("slice length is 32");

        PrivateKey {
            scalar: Scalar(scalar),
            prefix,
        }
    }

    /// Reassembles a private key from its 64-byte expanded encoding,
    /// `scalar ‖ prefix`.
    ///
    /// The bytes are taken as given, without clamping, so externally
    /// derived scalars (for example tweaked ones) can sign directly.
    pub fn from_expanded(bytes: &[u8; 64]) -> Self {
        let scalar: [u8; 32] = bytes[..32].try_into().expect("slice length is 32");
        let prefix: [u8; 32] = bytes[32..].try_into().expect("slice length is 32");

        PrivateKey {
            scalar: Scalar(scalar),
            prefix,
        }
    }

    /// Returns the secret scalar component.
    #[inline]
    pub fn scalar(&self) -> Scalar {
        self.scalar
    }

    /// Returns the nonce prefix component.
    #[inline]
    pub fn prefix(&self) -> [u8; 32] {
        self.prefix
    }

    /// Returns the expanded 64-byte encoding, `scalar ‖ prefix`.
    pub fn to_bytes(&self) -> [u8; 64] {
        let mut out = [0u8; 64];

        out[..32].copy_from_slice(&self.scalar.0);
        out[32..].copy_from_slice(&self.prefix);

        out
    }

    /// Computes the public key `A = a·B`.
    pub fn public_key(&self) -> PublicKey {
        PublicKey(GeP3::from_scalar_mul(self.scalar).to_bytes())
    }

    /// Converts the key to an X25519 secret.
    ///
    /// The Montgomery secret is the clamped scalar itself; the nonce
    /// prefix plays no role in Diffie-Hellman.
    pub fn to_x25519(&self) -> [u8; 32] {
        self.scalar.0
    }
}

/// An Ed25519 signature, the 64-byte concatenation `R ‖ S` of a
/// compressed point and a scalar.
#[derive(Clone, Copy)]
pub struct Signature([u8; 64]);

impl Signature {
    /// Wraps a raw 64-byte signature.
    ///
    /// No validation happens here; canonicity of both halves is checked
    /// during verification.
    #[inline]
    pub fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    /// Returns the raw byte encoding of this signature.
    #[inline]
    pub fn to_bytes(&self) -> [u8; 64] {
        self.0
    }

    fn r_bytes(&self) -> [u8; 32] {
        self.0[..32].try_into().expect("slice length is 32")
    }

    fn s_scalar(&self) -> Scalar {
        Scalar::from_bytes(&self.0[32..])
    }
}

/// Generates a fresh keypair from 32 random bytes.
pub fn generate_keypair<R: RngCore + CryptoRng>(rng: &mut R) -> (PublicKey, PrivateKey) {
    let mut seed = [0u8; 32];
    rng.fill_bytes(&mut seed);

    let private = PrivateKey::from_seed(&seed);
    let public = private.public_key();

    seed.zeroize();

    (public, private)
}

/// Computes the public key for an externally supplied scalar.
///
/// The scalar is reduced modulo the group order before the fixed-base
/// multiplication, so any 32-byte value is accepted.
pub fn pubkey_from_scalar(scalar: &Scalar) -> PublicKey {
    let reduced = Scalar::reduce_bytes(&scalar.to_bytes());

    PublicKey(GeP3::from_scalar_mul(reduced).to_bytes())
}

/// Starts a SHA-512 computation, absorbing the RFC 8032 domain header
/// when a variant is selected.
///
/// `ph = None` writes no header. `Some(false)` marks Ed25519ctx and
/// `Some(true)` marks Ed25519ph; both append the context string.
///
/// # Panics
///
/// Panics if a variant is selected and `ctx` exceeds 255 bytes, which the
/// one-byte length field cannot encode.
fn domain_hasher(ph: Option<bool>, ctx: &[u8]) -> Sha512 {
    let mut hasher = Sha512::new();

    if let Some(prehashed) = ph {
        assert!(ctx.len() <= 255, "context must be at most 255 bytes");

        hasher.update(DOMAIN_PREFIX);
        hasher.update([prehashed as u8, ctx.len() as u8]);
        hasher.update(ctx);
    }

    hasher
}

/// The challenge scalar `h = H(dom ‖ R ‖ A ‖ m) mod ℓ`.
fn challenge(
    ph: Option<bool>,
    ctx: &[u8],
    r_bytes: &[u8; 32],
    public: &PublicKey,
    message: &[u8],
) -> Scalar {
    let mut hasher = domain_hasher(ph, ctx);

    hasher.update(r_bytes);
    hasher.update(public.0);
    hasher.update(message);

    Scalar::reduce(hasher.finalize().into())
}

/// Returns `true` if the 32-byte point encoding is canonical, i.e. its
/// masked y-coordinate is strictly below the field prime.
fn is_canonical_point(bytes: &[u8; 32]) -> bool {
    let mut y = *bytes;
    y[31] &= 0x7f;

    lt_bytes32(&y, &FIELD_PRIME) == 1
}

/// Signs a message with an expanded key and its precomputed public key.
///
/// The RFC 8032 flow: the nonce is `r = H(dom ‖ prefix ‖ m) mod ℓ`, the
/// commitment is `R = r·B`, and the response is
/// `S = r + H(dom ‖ R ‖ A ‖ m)·a mod ℓ`. Deterministic; signing the same
/// message twice yields the same signature.
pub fn sign_with_scalar(
    message: &[u8],
    private: &PrivateKey,
    public: &PublicKey,
    ph: Option<bool>,
    ctx: &[u8],
) -> Signature {
    let mut hasher = domain_hasher(ph, ctx);
    hasher.update(private.prefix());
    hasher.update(message);
    let r = Scalar::reduce(hasher.finalize().into());

    let r_bytes = GeP3::from_scalar_mul(r).to_bytes();

    let h = challenge(ph, ctx, &r_bytes, public, message);
    let s = Scalar::from_mul_sum(h, private.scalar(), r);

    let mut out = [0u8; 64];
    out[..32].copy_from_slice(&r_bytes);
    out[32..].copy_from_slice(&s.to_bytes());

    Signature(out)
}

/// Signs a message, deriving the public key from the private key.
pub fn sign(message: &[u8], private: &PrivateKey, ph: Option<bool>, ctx: &[u8]) -> Signature {
    let public = private.public_key();

    sign_with_scalar(message, private, &public, ph, ctx)
}

/// Signs under the additively tweaked key `a + t`.
///
/// The nonce prefix is re-derived as `H(prefix ‖ t)` so signatures under
/// the tweaked key never reuse nonces with the untweaked one, and the
/// supplied public key is tweaked to match. Fails if the public key does
/// not decode.
pub fn sign_tweak_add(
    message: &[u8],
    private: &PrivateKey,
    public: &PublicKey,
    tweak: &Scalar,
    ph: Option<bool>,
    ctx: &[u8],
) -> Result<Signature, Error> {
    let scalar = private.scalar().add(tweak);
    let prefix = tweaked_prefix(&private.prefix(), tweak);
    let tweaked_public = super::pubkey::pubkey_tweak_add(public, tweak)?;

    let tweaked = PrivateKey { scalar, prefix };

    Ok(sign_with_scalar(message, &tweaked, &tweaked_public, ph, ctx))
}

/// Signs under the multiplicatively tweaked key `a·t`.
///
/// Same prefix re-derivation as [`sign_tweak_add`].
pub fn sign_tweak_mul(
    message: &[u8],
    private: &PrivateKey,
    public: &PublicKey,
    tweak: &Scalar,
    ph: Option<bool>,
    ctx: &[u8],
) -> Result<Signature, Error> {
    let scalar = private.scalar().mul(tweak);
    let prefix = tweaked_prefix(&private.prefix(), tweak);
    let tweaked_public = super::pubkey::pubkey_tweak_mul(public, tweak)?;

    let tweaked = PrivateKey { scalar, prefix };

    Ok(sign_with_scalar(message, &tweaked, &tweaked_public, ph, ctx))
}

fn tweaked_prefix(prefix: &[u8; 32], tweak: &Scalar) -> [u8; 32] {
    let mut hasher = Sha512::new();
    hasher.update(prefix);
    hasher.update(tweak.to_bytes());

    let digest: [u8; 64] = hasher.finalize().into();

    digest[..32].try_into().expect("slice length is 32")
}

/// Verifies a signature against the strict equation `S·B = R + h·A`.
///
/// Rejects non-canonical `S` (the encoding must be below the group
/// order), non-canonical `R`, and public keys that fail to decode. The
/// check computes `S·B - h·A` with one double-scalar multiplication and
/// compares the packed result to `R` byte for byte, so exactly one
/// encoding of each valid signature is accepted.
pub fn verify(
    signature: &Signature,
    message: &[u8],
    public: &PublicKey,
    ph: Option<bool>,
    ctx: &[u8],
) -> Result<(), Error> {
    let s = signature.s_scalar();
    let r_bytes = signature.r_bytes();

    if !s.is_canonical() || !is_canonical_point(&r_bytes) {
        return Err(Error::InvalidSignature);
    }

    let a = GeP3::unpack_vartime(&public.0).map_err(|_| Error::InvalidSignature)?;

    let h = challenge(ph, ctx, &r_bytes, public, message);

    let check = (-a).double_scalar_mul_vartime(h, s).to_bytes();

    if check.ct_eq(&r_bytes) {
        Ok(())
    } else {
        Err(Error::InvalidSignature)
    }
}

/// Verifies a signature with both sides multiplied by the cofactor,
/// `8·S·B = 8·R + 8·h·A`.
///
/// Unlike [`verify`] this accepts signatures whose `R` or `A` carry a
/// torsion component, as some higher-level protocols require. `S` must
/// still be canonical and `R` must decode to a curve point.
pub fn verify_single(
    signature: &Signature,
    message: &[u8],
    public: &PublicKey,
    ph: Option<bool>,
    ctx: &[u8],
) -> Result<(), Error> {
    let s = signature.s_scalar();
    let r_bytes = signature.r_bytes();

    if !s.is_canonical() {
        return Err(Error::InvalidSignature);
    }

    let r = GeP3::unpack_vartime(&r_bytes).map_err(|_| Error::InvalidSignature)?;
    let a = GeP3::unpack_vartime(&public.0).map_err(|_| Error::InvalidSignature)?;

    let expect = r.mul_cofactor().to_bytes();

    let h = challenge(ph, ctx, &r_bytes, public, message);
    let s8 = s.mulh();
    let a8 = -a.mul_cofactor();

    let check = a8.double_scalar_mul_vartime(h, s8).to_bytes();

    if check.ct_eq(&expect) {
        Ok(())
    } else {
        Err(Error::InvalidSignature)
    }
}
