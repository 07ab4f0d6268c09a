use rand::RngCore;
use rand::rngs::OsRng;
use sha2::{Digest, Sha512};

use curve25519::Scalar;
use curve25519::ed25519::{
    PrivateKey, PublicKey, Signature, derive, derive_with_scalar, generate_keypair, pubkey_add,
    pubkey_combine, pubkey_from_hash, pubkey_from_scalar, pubkey_from_uniform, pubkey_negate,
    pubkey_to_hash, pubkey_to_uniform, pubkey_tweak_add, pubkey_tweak_mul, sign, sign_tweak_add,
    sign_tweak_mul, sign_with_scalar, verify, verify_single,
};

fn unhex<const N: usize>(s: &str) -> [u8; N] {
    assert_eq!(s.len(), 2 * N, "hex literal has the wrong length");

    let mut out = [0u8; N];

    for (i, byte) in out.iter_mut().enumerate() {
        *byte = u8::from_str_radix(&s[2 * i..2 * i + 2], 16).expect("hex literal");
    }

    out
}

#[test]
fn test_sign_and_verify() {
    let (public, private) = generate_keypair(&mut OsRng);

    let message: &[u8] = b"The quick brown fox jumps over the lazy dog";
    let signature = sign(message, &private, None, &[]);

    assert!(
        verify(&signature, message, &public, None, &[]).is_ok(),
        "signature should be valid"
    );
    assert!(
        verify_single(&signature, message, &public, None, &[]).is_ok(),
        "cofactored verification should accept a valid signature"
    );

    let mut forged = signature.to_bytes();
    forged[17] ^= 0x04;
    assert!(
        verify(&Signature::from_bytes(forged), message, &public, None, &[]).is_err(),
        "signature modification must be detected"
    );

    assert!(
        verify(&signature, b"another message", &public, None, &[]).is_err(),
        "message modification must be detected"
    );
}

#[test]
fn test_rfc8032_empty_message() {
    let seed: [u8; 32] =
        unhex("9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60");
    let private = PrivateKey::from_seed(&seed);
    let public = private.public_key();

    let expected: [u8; 32] =
        unhex("d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a");
    assert_eq!(
        public.to_bytes(),
        expected,
        "public key must match the reference"
    );

    let signature = sign(&[], &private, None, &[]);
    let reference: [u8; 64] = unhex(
        "e5564300c360ac729086e2cc806e828a84877f1eb8e5d974d873e06522490155\
         5fb8821590a33bacc61e39701cf9b46bd25bf5f0595bbe24655141438e7a100b",
    );
    assert_eq!(
        signature.to_bytes(),
        reference,
        "signature must match the reference"
    );

    assert!(
        verify(&signature, &[], &public, None, &[]).is_ok(),
        "reference signature should verify"
    );
}

#[test]
fn test_rfc8032_one_byte_message() {
    let seed: [u8; 32] =
        unhex("4ccd089b28ff96da9db6c346ec114e0f5b8a319f35aba624da8cf6ed4fb8a6fb");
    let private = PrivateKey::from_seed(&seed);
    let public = private.public_key();

    let expected: [u8; 32] =
        unhex("3d4017c3e843895a92b70aa74d1b7ebc9c982ccf2ec4968cc0cd55f12af4660c");
    assert_eq!(
        public.to_bytes(),
        expected,
        "public key must match the reference"
    );

    let message = [0x72u8];
    let signature = sign(&message, &private, None, &[]);
    let reference: [u8; 64] = unhex(
        "92a009a9f0d4cab8720e820b5f642540a2b27b5416503f8fb3762223ebdb69da\
         085ac1e43e15996e458f3613d0f11d8c387b2eaeb4302aeeb00d291612bb0c00",
    );
    assert_eq!(
        signature.to_bytes(),
        reference,
        "signature must match the reference"
    );

    assert!(
        verify(&signature, &message, &public, None, &[]).is_ok(),
        "reference signature should verify"
    );
}

#[test]
fn test_rfc8032_prehashed_abc() {
    let seed: [u8; 32] =
        unhex("833fe62409237b9d62ec77587520911e9a759cec1d19755b7da901b96dca3d42");
    let private = PrivateKey::from_seed(&seed);
    let public = private.public_key();

    let expected: [u8; 32] =
        unhex("ec172b93ad5e563bf4932c70e1245034c35467ef2efd4d64ebf819683467e2bf");
    assert_eq!(
        public.to_bytes(),
        expected,
        "public key must match the reference"
    );

    let digest: [u8; 64] = Sha512::digest(b"abc").into();
    let signature = sign(&digest, &private, Some(true), &[]);
    let reference: [u8; 64] = unhex(
        "98a70222f0b8121aa9d30f813d683f809e462b469c7ff87639499bb94e6dae41\
         31f85042463c2a355a2003d062adf5aaa10b8c61e636062aaad11c2a26083406",
    );
    assert_eq!(
        signature.to_bytes(),
        reference,
        "signature must match the reference"
    );

    assert!(
        verify(&signature, &digest, &public, Some(true), &[]).is_ok(),
        "reference signature should verify"
    );
    assert!(
        verify(&signature, &digest, &public, None, &[]).is_err(),
        "the prehashed signature must not verify as classic Ed25519"
    );
}

#[test]
fn test_rfc8032_context_foo() {
    let seed: [u8; 32] =
        unhex("0305334e381af78f141cb666f6199f57bc3495335a256a95bd2a55bf546663f6");
    let private = PrivateKey::from_seed(&seed);
    let public = private.public_key();

    let expected: [u8; 32] =
        unhex("dfc9425e4f968f7f0c29f0259cf5f9aed6851c2bb4ad8bfb860cfee0ab248292");
    assert_eq!(
        public.to_bytes(),
        expected,
        "public key must match the reference"
    );

    let message: [u8; 16] = unhex("f726936d19c800494e3fdaff20b276a8");
    let signature = sign(&message, &private, Some(false), b"foo");
    let reference: [u8; 64] = unhex(
        "55a4cc2f70a54e04288c5f4cd1e45a7bb520b36292911876cada7323198dd87a\
         8b36950b95130022907a7fb7c4e9b2d5f6cca685a587b4b21f4b888e4e7edb0d",
    );
    assert_eq!(
        signature.to_bytes(),
        reference,
        "signature must match the reference"
    );

    assert!(
        verify(&signature, &message, &public, Some(false), b"foo").is_ok(),
        "reference signature should verify"
    );
    assert!(
        verify(&signature, &message, &public, Some(false), b"bar").is_err(),
        "a different context must be rejected"
    );
    assert!(
        verify(&signature, &message, &public, None, &[]).is_err(),
        "the contextual signature must not verify as classic Ed25519"
    );
}

#[test]
fn test_malleable_signature_is_rejected() {
    let (public, private) = generate_keypair(&mut OsRng);

    let message: &[u8] = b"malleability check";
    let signature = sign(message, &private, None, &[]);

    let order: [u8; 32] =
        unhex("edd3f55c1a631258d69cf7a2def9de1400000000000000000000000000000010");

    let mut bytes = signature.to_bytes();
    let mut carry = 0u16;
    for i in 0..32 {
        carry += bytes[32 + i] as u16 + order[i] as u16;
        bytes[32 + i] = carry as u8;
        carry >>= 8;
    }

    let shifted = Signature::from_bytes(bytes);
    assert!(
        verify(&shifted, message, &public, None, &[]).is_err(),
        "a scalar shifted by the group order must be rejected"
    );
    assert!(
        verify_single(&shifted, message, &public, None, &[]).is_err(),
        "cofactored verification must also reject a non-canonical scalar"
    );
}

#[test]
fn test_tweak_add_signing() {
    let (public, private) = generate_keypair(&mut OsRng);

    let mut raw = [0u8; 32];
    OsRng.fill_bytes(&mut raw);
    let tweak = Scalar::reduce_bytes(&raw);

    let message: &[u8] = b"additive tweak";
    let signature = sign_tweak_add(message, &private, &public, &tweak, None, &[])
        .expect("tweaked signing should succeed");

    let tweaked_public =
        pubkey_tweak_add(&public, &tweak).expect("the public key should decode");
    assert!(
        verify(&signature, message, &tweaked_public, None, &[]).is_ok(),
        "signature must verify under the tweaked key"
    );

    let direct = pubkey_from_scalar(&private.scalar().add(&tweak));
    assert_eq!(
        tweaked_public.to_bytes(),
        direct.to_bytes(),
        "tweaked key must equal the key derived from the tweaked scalar"
    );
}

#[test]
fn test_tweak_mul_signing() {
    let (public, private) = generate_keypair(&mut OsRng);

    let mut raw = [0u8; 32];
    OsRng.fill_bytes(&mut raw);
    let tweak = Scalar::reduce_bytes(&raw);

    let message: &[u8] = b"multiplicative tweak";
    let signature = sign_tweak_mul(message, &private, &public, &tweak, None, &[])
        .expect("tweaked signing should succeed");

    let tweaked_public =
        pubkey_tweak_mul(&public, &tweak).expect("the public key should decode");
    assert!(
        verify(&signature, message, &tweaked_public, None, &[]).is_ok(),
        "signature must verify under the tweaked key"
    );

    let direct = pubkey_from_scalar(&private.scalar().mul(&tweak));
    assert_eq!(
        tweaked_public.to_bytes(),
        direct.to_bytes(),
        "tweaked key must equal the key derived from the tweaked scalar"
    );
}

#[test]
fn test_pubkey_algebra() {
    let (a_public, _) = generate_keypair(&mut OsRng);
    let (b_public, _) = generate_keypair(&mut OsRng);

    let negated = pubkey_negate(&a_public).expect("negation should succeed");
    let cancelled = pubkey_add(&a_public, &negated).expect("addition should succeed");
    assert!(
        cancelled.is_infinity(),
        "a key plus its negation must be the neutral element"
    );

    let restored = pubkey_negate(&negated).expect("negation should succeed");
    assert_eq!(
        restored.to_bytes(),
        a_public.to_bytes(),
        "double negation must restore the original key"
    );

    let combined = pubkey_combine(&[a_public, b_public]).expect("combination should succeed");
    let added = pubkey_add(&a_public, &b_public).expect("addition should succeed");
    assert_eq!(
        combined.to_bytes(),
        added.to_bytes(),
        "combining two keys must match pairwise addition"
    );

    let empty = pubkey_combine(&[]).expect("the empty combination should succeed");
    assert!(
        empty.is_infinity(),
        "the empty combination is the neutral element"
    );
}

#[test]
fn test_small_order_classification() {
    let neutral = PublicKey::from_bytes(unhex(
        "0100000000000000000000000000000000000000000000000000000000000000",
    ));
    assert!(neutral.is_valid(), "the neutral element decodes");
    assert!(neutral.is_infinity(), "the neutral element is infinity");
    assert!(
        !neutral.is_small(),
        "the neutral element is not reported as small"
    );
    assert!(
        !neutral.has_torsion(),
        "the neutral element carries no torsion"
    );

    let order2 = PublicKey::from_bytes(unhex(
        "ecffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff7f",
    ));
    assert!(
        order2.is_small() && order2.has_torsion(),
        "the order-2 point is pure torsion"
    );

    let order4 = PublicKey::from_bytes([0u8; 32]);
    assert!(
        order4.is_small() && order4.has_torsion(),
        "the order-4 point is pure torsion"
    );

    let order8 = PublicKey::from_bytes(unhex(
        "26e8958fc2b227b045c3f489f2ef98f0d5dfac05d3c63339b13802886d53fc05",
    ));
    assert!(
        order8.is_small() && order8.has_torsion(),
        "the order-8 point is pure torsion"
    );

    let (public, _) = generate_keypair(&mut OsRng);
    assert!(!public.is_small(), "a generated key is not small");
    assert!(!public.has_torsion(), "a generated key is torsion free");

    let mixed = pubkey_add(&public, &order8).expect("addition should succeed");
    assert!(
        mixed.has_torsion(),
        "adding a torsion point must leave a torsion component"
    );
    assert!(!mixed.is_small(), "the mixed key is not small");

    let non_canonical = PublicKey::from_bytes(unhex(
        "edffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff7f",
    ));
    assert!(
        !non_canonical.is_valid(),
        "a y-coordinate at the field prime must not decode"
    );
    assert!(
        !non_canonical.is_small() && !non_canonical.has_torsion(),
        "invalid encodings report no torsion properties"
    );
}

#[test]
fn test_cofactored_verification_tolerates_torsion() {
    let (public, private) = generate_keypair(&mut OsRng);

    let order8 = PublicKey::from_bytes(unhex(
        "26e8958fc2b227b045c3f489f2ef98f0d5dfac05d3c63339b13802886d53fc05",
    ));
    let dirty = pubkey_add(&public, &order8).expect("addition should succeed");

    let message: &[u8] = b"cofactored";
    let signature = sign_with_scalar(message, &private, &dirty, None, &[]);

    assert!(
        verify_single(&signature, message, &dirty, None, &[]).is_ok(),
        "cofactored verification should accept a torsion-bearing key"
    );
}

#[test]
fn test_edwards_diffie_hellman_commutes() {
    let (a_public, a_private) = generate_keypair(&mut OsRng);
    let (b_public, b_private) = generate_keypair(&mut OsRng);

    let ab = derive(&b_public, &a_private).expect("derivation should succeed");
    let ba = derive(&a_public, &b_private).expect("derivation should succeed");
    assert_eq!(ab.to_bytes(), ba.to_bytes(), "shared secrets must match");

    let with_scalar = derive_with_scalar(&b_public, &a_private.scalar())
        .expect("derivation should succeed");
    assert_eq!(
        with_scalar.to_bytes(),
        ab.to_bytes(),
        "scalar-level derivation must match the key-level one"
    );
}

#[test]
fn test_uniform_encoding_round_trip() {
    let mut preimage = [0u8; 32];
    OsRng.fill_bytes(&mut preimage);

    let key = pubkey_from_uniform(&preimage);

    let mut recovered = None;
    for hint in 0..2u32 {
        if let Ok(bytes) = pubkey_to_uniform(&key, hint, &mut OsRng) {
            recovered = Some(bytes);
            break;
        }
    }

    let bytes = recovered.expect("a key in the image of the map must have a preimage");
    assert_eq!(
        pubkey_from_uniform(&bytes).to_bytes(),
        key.to_bytes(),
        "the recovered preimage must map back to the key"
    );
}

#[test]
fn test_hash_encoding_round_trip() {
    let mut wide = [0u8; 64];
    OsRng.fill_bytes(&mut wide);

    let key = pubkey_from_hash(&wide, false);
    let recovered = pubkey_to_hash(&key, &mut OsRng).expect("hash inversion should succeed");

    assert_eq!(
        pubkey_from_hash(&recovered, false).to_bytes(),
        key.to_bytes(),
        "the recovered hash must map back to the key"
    );
}

#[test]
fn test_private_key_round_trip() {
    let (public, private) = generate_keypair(&mut OsRng);

    let restored = PrivateKey::from_expanded(&private.to_bytes());
    assert_eq!(
        restored.public_key().to_bytes(),
        public.to_bytes(),
        "the expanded encoding must reproduce the public key"
    );

    assert_eq!(
        pubkey_from_scalar(&private.scalar()).to_bytes(),
        public.to_bytes(),
        "the secret scalar must reproduce the public key"
    );

    let message: &[u8] = b"round trip";
    let first = sign(message, &private, None, &[]);
    let second = sign(message, &restored, None, &[]);
    assert_eq!(
        first.to_bytes(),
        second.to_bytes(),
        "signing must be deterministic across the encoding round trip"
    );
}
