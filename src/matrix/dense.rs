//! Dense-matrix products on top of Faer.
//!
//! Same-type products go through Faer's matrix multiplication. Mixed
//! real/complex products, which Faer does not multiply directly, use a
//! promoting kernel that reads `Aᴴ` without forming it.

use crate::core::array::Element;
use faer::Mat;
use num_complex::Complex64;

/// `A · X`, or `Aᵀ · X` when `adjoint` is set, for real `A` and `X`.
pub(crate) fn real_apply(a: &Mat<f64>, x: &Mat<f64>, adjoint: bool) -> Mat<f64> {
    if adjoint { a.transpose() * x.as_ref() } else { a.as_ref() * x.as_ref() }
}

/// `A · X`, or `Aᴴ · X` when `adjoint` is set, for complex `A` and `X`.
pub(crate) fn complex_apply(a: &Mat<Complex64>, x: &Mat<Complex64>, adjoint: bool) -> Mat<Complex64> {
    if adjoint { a.adjoint() * x.as_ref() } else { a.as_ref() * x.as_ref() }
}

/// Computes `A · X`, or `Aᴴ · X` when `adjoint` is set, promoting entries to `Y`.
///
/// `Aᴴ` is never formed; entries are conjugated as they are read.
pub(crate) fn dense_apply<A, X, Y>(a: &Mat<A>, x: &Mat<X>, adjoint: bool) -> Mat<Y>
where
    A: Element,
    X: Element,
    Y: Element + From<A> + From<X>,
{
    let (m, n) = (a.nrows(), a.ncols());
    let (rows, inner) = if adjoint { (n, m) } else { (m, n) };
    debug_assert_eq!(x.nrows(), inner);
    Mat::from_fn(rows, x.ncols(), |i, k| {
        (0..inner).fold(Y::zero(), |acc, j| {
            let aij = if adjoint { a[(j, i)].conj() } else { a[(i, j)] };
            acc + <Y as From<A>>::from(aij) * <Y as From<X>>::from(x[(j, k)])
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn complex_mat(nrows: usize, ncols: usize) -> Mat<Complex64> {
        Mat::from_fn(nrows, ncols, |i, j| Complex64::new((i + 2 * j) as f64, i as f64 - j as f64))
    }

    #[test]
    fn real_product() {
        // [[1,2,3],[4,5,6]] · [1,1,1]
        let a = Mat::from_fn(2, 3, |i, j| (3 * i + j + 1) as f64);
        let x = Mat::from_fn(3, 1, |_, _| 1.0);
        let y = real_apply(&a, &x, false);
        assert_eq!((y[(0, 0)], y[(1, 0)]), (6.0, 15.0));
        let z = real_apply(&a, &Mat::from_fn(2, 1, |_, _| 1.0), true);
        assert_eq!((z[(0, 0)], z[(1, 0)], z[(2, 0)]), (5.0, 7.0, 9.0));
    }

    #[test]
    fn adjoint_conjugates_entries() {
        let i = Complex64::new(0.0, 1.0);
        let a = Mat::from_fn(1, 2, |_, j| if j == 0 { i } else { Complex64::new(2.0, 0.0) });
        let x = Mat::from_fn(1, 1, |_, _| 1.0);
        let y: Mat<Complex64> = dense_apply(&a, &x, true);
        assert_eq!(y.nrows(), 2);
        assert_eq!(y[(0, 0)], -i);
        assert_eq!(y[(1, 0)], Complex64::new(2.0, 0.0));
    }

    #[test]
    fn faer_product_agrees_with_promoting_kernel() {
        let a = complex_mat(3, 4);
        for adjoint in [false, true] {
            let inner = if adjoint { 3 } else { 4 };
            let x = complex_mat(inner, 2);
            let fast = complex_apply(&a, &x, adjoint);
            let slow: Mat<Complex64> = dense_apply(&a, &x, adjoint);
            assert_eq!((fast.nrows(), fast.ncols()), (slow.nrows(), slow.ncols()));
            for j in 0..fast.ncols() {
                for i in 0..fast.nrows() {
                    assert_abs_diff_eq!(fast[(i, j)].re, slow[(i, j)].re, epsilon = 1e-12);
                    assert_abs_diff_eq!(fast[(i, j)].im, slow[(i, j)].im, epsilon = 1e-12);
                }
            }
        }
    }

    #[test]
    fn empty_block() {
        let a = Mat::from_fn(2, 3, |i, j| (i + j) as f64);
        let y = real_apply(&a, &Mat::<f64>::zeros(3, 0), false);
        assert_eq!((y.nrows(), y.ncols()), (2, 0));
    }
}
