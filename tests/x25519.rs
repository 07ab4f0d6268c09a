use rand::RngCore;
use rand::rngs::OsRng;

use curve25519::ed25519::{self, PrivateKey, PublicKey, generate_keypair};
use curve25519::x25519::{
    derive, pubkey_convert, pubkey_create, pubkey_from_hash, pubkey_from_uniform,
    pubkey_has_torsion, pubkey_is_small, pubkey_to_hash, pubkey_to_uniform, pubkey_verify,
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
fn test_rfc7748_ladder_vectors() {
    let scalar: [u8; 32] =
        unhex("a546e36bf0527c9d3b16154b82465edd62144c0ac1fc5a18506a2244ba449ac4");
    let u: [u8; 32] =
        unhex("e6db6867583030db3594c1a424b15f7c726624ec26b3353b10a903a6d0ab1c4c");
    let expected: [u8; 32] =
        unhex("c3da55379de9c6908e94ea4df28d084f32eccf03491c71f754b4075577a28552");

    let out = derive(&scalar, &u).expect("derivation should succeed");
    assert_eq!(out, expected, "output must match the reference");

    let scalar: [u8; 32] =
        unhex("4b66e9d4d1b4673c5ad22691957d6af5c11b6421e0ea01d42ca4169e7918ba0d");
    let u: [u8; 32] =
        unhex("e5210f12786811d3f4b7959d0538ae2c31dbe7106fc03c3efc4cd549c715a493");
    let expected: [u8; 32] =
        unhex("95cbde9476e8907d7aade45cb4b873f88b595a68799fa152e6f8f7647aac7957");

    let out = derive(&scalar, &u).expect("derivation should succeed");
    assert_eq!(
        out, expected,
        "the masked top bit of the abscissa must be ignored"
    );
}

#[test]
fn test_rfc7748_diffie_hellman() {
    let alice_secret: [u8; 32] =
        unhex("77076d0a7318a57d3c16c17251b26645df4c2f87ebc0992ab177fba51db92c2a");
    let bob_secret: [u8; 32] =
        unhex("5dab087e624a8a4b79e17f8b83800ee66f3bb1292618b6fd1c2f8b27ff88e0eb");

    let alice_public = pubkey_create(&alice_secret).expect("key creation should succeed");
    let bob_public = pubkey_create(&bob_secret).expect("key creation should succeed");

    let expected: [u8; 32] =
        unhex("8520f0098930a754748b7ddcb43ef75a0dbf3a0d26381af4eba4a98eaa9b4e6a");
    assert_eq!(
        alice_public, expected,
        "alice's public key must match the reference"
    );

    let expected: [u8; 32] =
        unhex("de9edb7d7b7dc1b4d35b61c2ece435373f8343c85b78674dadfc7e146f882b4f");
    assert_eq!(
        bob_public, expected,
        "bob's public key must match the reference"
    );

    let alice_shared = derive(&alice_secret, &bob_public).expect("derivation should succeed");
    let bob_shared = derive(&bob_secret, &alice_public).expect("derivation should succeed");

    let expected: [u8; 32] =
        unhex("4a5d9d5ba4ce2de1728e3bf480350f25e07e21c947d19e3376f09b3c1e161742");
    assert_eq!(
        alice_shared, expected,
        "the shared secret must match the reference"
    );
    assert_eq!(bob_shared, expected, "both sides must agree");
}

#[test]
fn test_derive_commutes() {
    let mut a = [0u8; 32];
    let mut b = [0u8; 32];
    OsRng.fill_bytes(&mut a);
    OsRng.fill_bytes(&mut b);

    let a_public = pubkey_create(&a).expect("key creation should succeed");
    let b_public = pubkey_create(&b).expect("key creation should succeed");

    let ab = derive(&a, &b_public).expect("derivation should succeed");
    let ba = derive(&b, &a_public).expect("derivation should succeed");

    assert_eq!(ab, ba, "shared secrets must match");
}

#[test]
fn test_small_order_inputs_are_rejected() {
    let mut secret = [0u8; 32];
    OsRng.fill_bytes(&mut secret);

    let zero = [0u8; 32];
    let mut one = [0u8; 32];
    one[0] = 1;
    let minus_one: [u8; 32] =
        unhex("ecffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff7f");

    assert!(
        derive(&secret, &zero).is_err(),
        "the order-2 abscissa must yield no secret"
    );
    assert!(
        derive(&secret, &one).is_err(),
        "the order-4 abscissa must yield no secret"
    );
    assert!(
        derive(&secret, &minus_one).is_err(),
        "a small-order twist abscissa must yield no secret"
    );
}

#[test]
fn test_torsion_predicates() {
    let zero = [0u8; 32];
    let mut one = [0u8; 32];
    one[0] = 1;

    assert!(
        pubkey_is_small(&zero) && pubkey_has_torsion(&zero),
        "the order-2 abscissa is pure torsion"
    );
    assert!(
        pubkey_is_small(&one) && pubkey_has_torsion(&one),
        "the order-4 abscissa is pure torsion"
    );

    let order8 = PublicKey::from_bytes(unhex(
        "26e8958fc2b227b045c3f489f2ef98f0d5dfac05d3c63339b13802886d53fc05",
    ))
    .to_x25519()
    .expect("the order-8 point has a Montgomery image");
    assert!(
        pubkey_is_small(&order8) && pubkey_has_torsion(&order8),
        "the order-8 abscissa is pure torsion"
    );

    let mut secret = [0u8; 32];
    OsRng.fill_bytes(&mut secret);
    let public = pubkey_create(&secret).expect("key creation should succeed");
    assert!(
        !pubkey_is_small(&public) && !pubkey_has_torsion(&public),
        "a generated key lies in the prime-order subgroup"
    );
}

#[test]
fn test_pubkey_verify() {
    let mut base = [0u8; 32];
    base[0] = 9;
    assert!(
        pubkey_verify(&base),
        "the base point abscissa is on the curve"
    );

    let minus_one: [u8; 32] =
        unhex("ecffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff7f");
    assert!(
        !pubkey_verify(&minus_one),
        "a twist abscissa is not on the curve"
    );
    assert!(
        !pubkey_is_small(&minus_one) && !pubkey_has_torsion(&minus_one),
        "twist abscissas report no torsion properties"
    );

    let (public, _) = generate_keypair(&mut OsRng);
    let u = public.to_x25519().expect("conversion should succeed");
    assert!(pubkey_verify(&u), "a converted key is on the curve");
}

#[test]
fn test_pubkey_convert_round_trip() {
    let (public, _) = generate_keypair(&mut OsRng);

    let u = public.to_x25519().expect("conversion should succeed");
    let sign = public.to_bytes()[31] >> 7 == 1;

    let back = pubkey_convert(&u, sign).expect("conversion back should succeed");
    assert_eq!(
        back.to_bytes(),
        public.to_bytes(),
        "the round trip must restore the Edwards key"
    );
}

#[test]
fn test_pubkey_convert_edge_cases() {
    let minus_one: [u8; 32] =
        unhex("ecffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff7f");
    assert!(
        pubkey_convert(&minus_one, false).is_err(),
        "a twist abscissa must be rejected"
    );

    let converted = pubkey_convert(&[0u8; 32], true).expect("the order-2 abscissa converts");
    assert_eq!(
        converted.to_bytes()[31] & 0x80,
        0,
        "the sign of the zero abscissa is forced to zero"
    );
}

#[test]
fn test_pubkey_create_matches_edwards() {
    let mut seed = [0u8; 32];
    OsRng.fill_bytes(&mut seed);
    let private = PrivateKey::from_seed(&seed);

    let from_montgomery =
        pubkey_create(&private.to_x25519()).expect("key creation should succeed");
    let from_edwards = private
        .public_key()
        .to_x25519()
        .expect("conversion should succeed");

    assert_eq!(
        from_montgomery, from_edwards,
        "both routes must agree on the public key"
    );
}

#[test]
fn test_edwards_montgomery_agreement() {
    let (_, a_private) = generate_keypair(&mut OsRng);
    let (b_public, _) = generate_keypair(&mut OsRng);

    let edwards = ed25519::derive(&b_public, &a_private).expect("derivation should succeed");
    let montgomery = derive(
        &a_private.to_x25519(),
        &b_public.to_x25519().expect("conversion should succeed"),
    )
    .expect("derivation should succeed");

    assert_eq!(
        edwards.to_x25519().expect("conversion should succeed"),
        montgomery,
        "both forms must agree on the shared point"
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
        pubkey_from_uniform(&bytes),
        key,
        "the recovered preimage must map back to the key"
    );
}

#[test]
fn test_hash_encoding_round_trip() {
    let mut wide = [0u8; 64];
    OsRng.fill_bytes(&mut wide);

    let key = pubkey_from_hash(&wide, false).expect("the mapped sum should not be neutral");
    let recovered = pubkey_to_hash(&key, &mut OsRng).expect("hash inversion should succeed");

    let back = pubkey_from_hash(&recovered, false).expect("the mapped sum should not be neutral");
    assert_eq!(back, key, "the recovered hash must map back to the key");
}
