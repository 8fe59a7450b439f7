use criterion::{black_box, Criterion, criterion_group, criterion_main};
use faer::Mat;
use linop::{Array, LinearOperator, MatmatOptions};

fn bench_composite_vs_dense(c: &mut Criterion) {
    let n = 200;
    let data: Vec<f64> = (0..n * n).map(|i| (i as f64).sin()).collect();
    let a = Mat::from_fn(n, n, |i, j| data[j * n + i]);
    let b = Mat::from_fn(n, n, |i, j| data[i * n + j]);
    let x = Array::from_vec((0..n).map(|i| (i as f64).cos()).collect());

    let op_a = LinearOperator::from_matrix(a.clone()).unwrap();
    let op_b = LinearOperator::from_matrix(b.clone()).unwrap();
    let lazy = (&(&op_a + &op_b).unwrap() * &op_a).unwrap();
    let explicit = LinearOperator::from_matrix(&(&a + &b) * &a).unwrap();

    c.bench_function("lazy (A + B) A matvec", |ben| {
        ben.iter(|| lazy.matvec(black_box(&x)).unwrap())
    });

    c.bench_function("assembled (A + B) A matvec", |ben| {
        ben.iter(|| explicit.matvec(black_box(&x)).unwrap())
    });

    let block = Array::from_column_major(n, 32, (0..n * 32).map(|i| (i as f64).sin()).collect()).unwrap();
    for (name, options) in [("sequential", MatmatOptions::sequential()), ("default", MatmatOptions::default())] {
        let wrapped = op_a.clone();
        let custom = LinearOperator::custom((n, n))
            .matvec(move |v| wrapped.matvec(v).unwrap())
            .options(options)
            .build()
            .unwrap();
        c.bench_function(&format!("column fallback matmat ({name})"), |ben| {
            ben.iter(|| custom.matmat(black_box(&block)).unwrap())
        });
    }
}

criterion_group!(benches, bench_composite_vs_dense);
criterion_main!(benches);
