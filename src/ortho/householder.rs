//! QR via Householder reflections.
//!
//! For each column `j < k` we reflect the sub-column `W[p.., j]` onto a
//! multiple of `e_p`, `p` being the first row no earlier pivot has claimed
//! (`p == j` for full-rank input):
//!
//! ```text
//! H = I - 2 v vᵀ / (vᵀ v),   v = x - α e_1,   α = -sign(x_0) ‖x‖
//! ```
//!
//! Choosing `α` with the opposite sign of `x_0` avoids cancellation in `v_0`.
//! Reflections are applied to the trailing columns of the working matrix and
//! accumulated into `Q = H_0 H_1 ⋯ H_{k-1}`. A degenerate column gets no
//! reflection and leaves its row to the next column, so the thin factors keep
//! the whole range of `A`. Diagonal signs are normalised afterwards (see
//! `settle_diagonal`).

use nalgebra::{DMatrix, DVector};

use super::{Factors, gather_pivots};
use crate::math::is_degenerate;

pub fn householder(a: &DMatrix<f64>, tol: f64) -> Factors {
    let (m, n) = a.shape();
    let k = m.min(n);
    let mut w = a.clone();
    let mut q_full = DMatrix::<f64>::identity(m, m);
    let mut pivot_rows = Vec::with_capacity(k);
    // Next row a reflection may claim; stays put across degenerate columns.
    let mut p = 0;

    for j in 0..k {
        let len = m - p;
        let mut v = DVector::from_iterator(len, w.column(j).iter().skip(p).copied());
        let norm = v.norm();
        if is_degenerate(norm, tol) {
            pivot_rows.push(None);
            continue;
        }

        let alpha = if v[0] >= 0.0 { -norm } else { norm };
        v[0] -= alpha;
        let beta = 2.0 / v.norm_squared();

        // W[p.., j+1..] -= beta v (vᵀ W[p.., j+1..])
        for col in (j + 1)..n {
            let mut s = 0.0;
            for t in 0..len {
                s += v[t] * w[(p + t, col)];
            }
            let s = s * beta;
            for t in 0..len {
                w[(p + t, col)] -= s * v[t];
            }
        }
        w[(p, j)] = alpha;
        for t in 1..len {
            w[(p + t, j)] = 0.0;
        }

        // Q[:, p..] -= beta (Q[:, p..] v) vᵀ
        for row in 0..m {
            let mut s = 0.0;
            for t in 0..len {
                s += q_full[(row, p + t)] * v[t];
            }
            let s = s * beta;
            for t in 0..len {
                q_full[(row, p + t)] -= s * v[t];
            }
        }

        pivot_rows.push(Some(p));
        p += 1;
    }

    gather_pivots(&q_full, &w, &pivot_rows, tol)
}
