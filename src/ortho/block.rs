//! Block Gram-Schmidt.
//!
//! Columns are processed in contiguous blocks of `block_size`:
//!
//! 1. project the whole block against every completed Q column with two
//!    matrix products (`C = Qᵀ·W`, `W -= Q·C`)
//! 2. orthogonalize inside the block with Modified Gram-Schmidt
//!
//! In exact arithmetic this yields the same Q and R as the column-wise
//! variants; it only changes the granularity of the work.

use nalgebra::DMatrix;

use super::Factors;
use super::gram_schmidt::sweep_later_columns;
use crate::math::normalize_into;

pub fn bgs(a: &DMatrix<f64>, block_size: usize, tol: f64) -> Factors {
    let (m, n) = a.shape();
    let k = m.min(n);
    let width = block_size.max(1);

    let mut q = DMatrix::zeros(m, k);
    let mut r = DMatrix::zeros(k, n);
    let mut w = a.clone();

    let mut start = 0;
    while start < n {
        let end = (start + width).min(n);
        let cols = end - start;
        let done = start.min(k);

        if done > 0 {
            let coeffs = q.columns(0, done).tr_mul(&w.columns(start, cols));
            let update = q.columns(0, done) * &coeffs;
            for jj in 0..cols {
                for i in 0..m {
                    w[(i, start + jj)] -= update[(i, jj)];
                }
                for i in 0..done {
                    r[(i, start + jj)] = coeffs[(i, jj)];
                }
            }
        }

        for j in start..end.min(k) {
            r[(j, j)] = normalize_into(&mut q, j, &w.column(j), tol);
            if r[(j, j)] == 0.0 {
                continue;
            }
            sweep_later_columns(&q, j, &mut w, &mut r, j + 1, end);
        }

        start = end;
    }

    Factors::new(q, r)
}
