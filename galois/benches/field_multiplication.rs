use criterion::{black_box, criterion_group, criterion_main, Criterion};
use galois::{BinaryField, Element, Polynomial, RandomField};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn bench_gf32_mul(c: &mut Criterion) {
    let field = BinaryField::new(32).expect("field");
    c.bench_function("gf32_mul", |bencher| {
        let a = Element::from_raw(0xDEAD_BEEF);
        let b = Element::from_raw(0x1234_5678);
        bencher.iter(|| black_box(field.mul(black_box(a), black_box(b))))
    });
}

fn bench_gf32_inv(c: &mut Criterion) {
    let field = BinaryField::new(32).expect("field");
    c.bench_function("gf32_inv", |bencher| {
        let a = Element::from_raw(0xDEAD_BEEF);
        bencher.iter(|| black_box(field.inv(black_box(a)).expect("non-zero")))
    });
}

fn bench_gf32_interpolate_degree8(c: &mut Criterion) {
    let field = BinaryField::new(32).expect("field");
    let mut rng = StdRng::seed_from_u64(42);
    let secret = Polynomial::new((0..9).map(|_| field.random(&mut rng)).collect());
    let points: Vec<_> = (1..=9u64)
        .map(|x| {
            let x = Element::from_raw(x * 0x0101_0101);
            (x, secret.evaluate(x, &field))
        })
        .collect();

    c.bench_function("gf32_interpolate_degree8", |bencher| {
        bencher.iter(|| black_box(Polynomial::interpolate(black_box(&points), &field).expect("distinct")))
    });
}

criterion_group!(
    benches,
    bench_gf32_mul,
    bench_gf32_inv,
    bench_gf32_interpolate_degree8
);
criterion_main!(benches);
