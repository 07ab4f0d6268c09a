use proptest::prelude::*;

use curve25519::Scalar;

const ORDER: [u8; 32] = [
    0xed, 0xd3, 0xf5, 0x5c, 0x1a, 0x63, 0x12, 0x58, 0xd6, 0x9c, 0xf7, 0xa2, 0xde, 0xf9, 0xde,
    0x14, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x10,
];

fn reduced(bytes: [u8; 32]) -> Scalar {
    Scalar::reduce_bytes(&bytes)
}

#[test]
fn test_order_reduces_to_zero() {
    assert!(
        !Scalar::from_bytes(&ORDER).is_canonical(),
        "the group order must not be canonical"
    );
    assert!(
        Scalar::reduce_bytes(&ORDER).is_zero(),
        "the group order must reduce to zero"
    );
}

#[test]
fn test_constants() {
    assert!(Scalar::ZERO.is_zero(), "zero is zero");
    assert!(Scalar::ZERO.is_canonical(), "zero is canonical");
    assert!(Scalar::ONE.is_canonical(), "one is canonical");
    assert_eq!(
        Scalar::ONE.invert().to_bytes(),
        Scalar::ONE.to_bytes(),
        "one is its own inverse"
    );
}

proptest! {
    #[test]
    fn test_addition_commutes(a in any::<[u8; 32]>(), b in any::<[u8; 32]>()) {
        let (a, b) = (reduced(a), reduced(b));

        prop_assert_eq!(a.add(&b).to_bytes(), b.add(&a).to_bytes());
    }

    #[test]
    fn test_multiplication_commutes(a in any::<[u8; 32]>(), b in any::<[u8; 32]>()) {
        let (a, b) = (reduced(a), reduced(b));

        prop_assert_eq!(a.mul(&b).to_bytes(), b.mul(&a).to_bytes());
    }

    #[test]
    fn test_multiplication_associates(
        a in any::<[u8; 32]>(),
        b in any::<[u8; 32]>(),
        c in any::<[u8; 32]>(),
    ) {
        let (a, b, c) = (reduced(a), reduced(b), reduced(c));

        prop_assert_eq!(a.mul(&b).mul(&c).to_bytes(), a.mul(&b.mul(&c)).to_bytes());
    }

    #[test]
    fn test_multiplication_distributes(
        a in any::<[u8; 32]>(),
        b in any::<[u8; 32]>(),
        c in any::<[u8; 32]>(),
    ) {
        let (a, b, c) = (reduced(a), reduced(b), reduced(c));

        prop_assert_eq!(
            a.mul(&b.add(&c)).to_bytes(),
            a.mul(&b).add(&a.mul(&c)).to_bytes()
        );
    }

    #[test]
    fn test_negation_cancels(a in any::<[u8; 32]>()) {
        let a = reduced(a);

        prop_assert!(a.add(&a.negate()).is_zero());
    }

    #[test]
    fn test_inversion(a in any::<[u8; 32]>()) {
        let a = reduced(a);
        prop_assume!(!a.is_zero());

        prop_assert_eq!(a.mul(&a.invert()).to_bytes(), Scalar::ONE.to_bytes());
    }

    #[test]
    fn test_mulh_is_eight_additions(a in any::<[u8; 32]>()) {
        let a = reduced(a);

        let x2 = a.add(&a);
        let x4 = x2.add(&x2);
        let x8 = x4.add(&x4);

        prop_assert_eq!(a.mulh().to_bytes(), x8.to_bytes());
    }

    #[test]
    fn test_from_mul_sum_matches(
        a in any::<[u8; 32]>(),
        b in any::<[u8; 32]>(),
        c in any::<[u8; 32]>(),
    ) {
        let (a, b, c) = (reduced(a), reduced(b), reduced(c));

        prop_assert_eq!(
            Scalar::from_mul_sum(a, b, c).to_bytes(),
            a.mul(&b).add(&c).to_bytes()
        );
    }

    #[test]
    fn test_wide_reduction_is_canonical(wide in any::<[u8; 64]>()) {
        prop_assert!(Scalar::reduce(wide).is_canonical());
    }

    #[test]
    fn test_reduction_is_idempotent(a in any::<[u8; 32]>()) {
        let once = reduced(a);
        let twice = Scalar::reduce_bytes(&once.to_bytes());

        prop_assert!(once.is_canonical());
        prop_assert_eq!(twice.to_bytes(), once.to_bytes());
    }
}
