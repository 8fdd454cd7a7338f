//! QR via Givens rotations.
//!
//! Each entry `W[i, j]` below the pivot row `p` is annihilated by a plane
//! rotation of rows `p` and `i`. The pivot row is the first row no earlier
//! column has claimed; a degenerate column claims none. Entries that are
//! already exactly zero are skipped, so structured inputs (banded,
//! Hessenberg, mostly upper-triangular) cost only as many rotations as they
//! have non-zeros below the diagonal.

use nalgebra::DMatrix;

use super::{Factors, gather_pivots};
use crate::math::{givens as rotation, is_degenerate};

pub fn givens(a: &DMatrix<f64>, tol: f64) -> Factors {
    let (m, n) = a.shape();
    let k = m.min(n);
    let mut w = a.clone();
    let mut q_full = DMatrix::<f64>::identity(m, m);
    let mut pivot_rows = Vec::with_capacity(k);
    // Row the next pivot is rotated onto; degenerate columns leave it unclaimed.
    let mut p = 0;

    for j in 0..k {
        if is_degenerate(w.column(j).rows(p, m - p).norm(), tol) {
            pivot_rows.push(None);
            continue;
        }

        for i in (p + 1)..m {
            let b = w[(i, j)];
            if b == 0.0 {
                continue;
            }
            let (c, s, r) = rotation(w[(p, j)], b);
            w[(p, j)] = r;
            w[(i, j)] = 0.0;
            for col in (j + 1)..n {
                let top = w[(p, col)];
                let bot = w[(i, col)];
                w[(p, col)] = c * top + s * bot;
                w[(i, col)] = -s * top + c * bot;
            }
            // Q ← Q·Gᵀ touches columns p and i only.
            for row in 0..m {
                let left = q_full[(row, p)];
                let right = q_full[(row, i)];
                q_full[(row, p)] = c * left + s * right;
                q_full[(row, i)] = -s * left + c * right;
            }
        }

        pivot_rows.push(Some(p));
        p += 1;
    }

    gather_pivots(&q_full, &w, &pivot_rows, tol)
}
