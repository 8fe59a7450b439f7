use faer::Mat;
use linop::{Array, LinOpError, LinearOperator};
use rand::Rng;

fn main() -> Result<(), LinOpError> {
    let n = 4;
    let mut rng = rand::thread_rng();
    let data: Vec<f64> = (0..n * n).map(|_| rng.r#gen()).collect();
    let a = LinearOperator::from_matrix(Mat::from_fn(n, n, |i, j| data[j * n + i]))?;

    // a 1-D Laplacian stencil, never assembled
    let laplacian = LinearOperator::custom((n, n))
        .matvec(move |x| {
            let v = x.to_real_vec().unwrap_or_default();
            Array::from_vec(
                (0..n)
                    .map(|i| {
                        let left = if i > 0 { v[i - 1] } else { 0.0 };
                        let right = if i + 1 < n { v[i + 1] } else { 0.0 };
                        2.0 * v[i] - left - right
                    })
                    .collect(),
            )
        })
        .build()?;

    let id = LinearOperator::identity((n, n), None)?;
    let shifted = (&laplacian - &(0.5 * &id)?)?;
    let system = (&shifted * &a.pow(2)?)?;
    println!("system = {system}");

    let x = Array::from_vec(vec![1.0; n]);
    let y = system.matvec(&x)?;
    println!("y = {:?}", y.to_real_vec());

    // the adjoint of `a` is a cached view over the same matrix
    let h = a.adjoint()?;
    println!("a.H = {h}, a.H.H is a: {}", h.adjoint()?.ptr_eq(&a));

    match laplacian.adjoint() {
        Ok(_) => println!("laplacian has an adjoint"),
        Err(e) => println!("laplacian has no adjoint: {e}"),
    }
    Ok(())
}
