use galois::{BinaryField, Element, Polynomial, RandomField};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

proptest! {
    #[test]
    fn int_element_round_trip(m in 1u32..=32, raw in any::<u64>()) {
        let field = BinaryField::new(m).unwrap();
        let x = raw & (field.order() - 1);
        let e = field.element(x).unwrap();
        prop_assert_eq!(field.to_int(e).unwrap(), x);
    }

    #[test]
    fn oversized_integers_are_rejected(m in 1u32..=31, raw in any::<u64>()) {
        let field = BinaryField::new(m).unwrap();
        let x = raw | field.order();
        prop_assert!(field.element(x).is_err());
    }

    #[test]
    fn bits_round_trip(m in 1u32..=32, raw in any::<u64>()) {
        let field = BinaryField::new(m).unwrap();
        let e = field.element(raw & (field.order() - 1)).unwrap();
        prop_assert_eq!(field.element_from_bits(&e.to_bits()).unwrap(), e);
    }

    #[test]
    fn multiplication_is_commutative_and_associative(seed in any::<u64>(), m in 1u32..=32) {
        let field = BinaryField::new(m).unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        let a = field.random(&mut rng);
        let b = field.random(&mut rng);
        let c = field.random(&mut rng);
        prop_assert_eq!(field.mul(a, b), field.mul(b, a));
        prop_assert_eq!(field.mul(field.mul(a, b), c), field.mul(a, field.mul(b, c)));
    }

    #[test]
    fn inverse_is_two_sided(seed in any::<u64>(), m in 1u32..=32) {
        let field = BinaryField::new(m).unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        let a = field.random_nonzero(&mut rng);
        let inv = field.inv(a).unwrap();
        prop_assert_eq!(field.mul(a, inv), Element::ONE);
        prop_assert_eq!(field.mul(inv, a), Element::ONE);
    }

    #[test]
    fn interpolation_inverts_evaluation(seed in any::<u64>(), degree in 0usize..12) {
        let field = BinaryField::new(32).unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        let secret = Polynomial::new((0..=degree).map(|_| field.random(&mut rng)).collect());

        let mut xs: Vec<Element> = Vec::new();
        while xs.len() <= degree {
            let x = field.random(&mut rng);
            if !xs.contains(&x) {
                xs.push(x);
            }
        }
        let points: Vec<_> = xs.iter().map(|&x| (x, secret.evaluate(x, &field))).collect();
        prop_assert_eq!(Polynomial::interpolate(&points, &field).unwrap(), secret);
    }
}
